use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skillmatrix_application::CreateSkillInput;
use skillmatrix_core::AppResult;
use skillmatrix_domain::{
    EmployeeSkill, EmployeeSkillEdit, SkillDefinition, SkillLevel, SkillPriority,
};

/// Incoming payload for skill catalog entries.
#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
}

impl From<CreateSkillRequest> for CreateSkillInput {
    fn from(request: CreateSkillRequest) -> Self {
        Self {
            name: request.name,
            category: request.category,
            description: request.description,
        }
    }
}

/// API representation of a catalog skill.
#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub skill_id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
}

impl From<SkillDefinition> for SkillResponse {
    fn from(skill: SkillDefinition) -> Self {
        Self {
            skill_id: skill.id().to_string(),
            name: skill.name().as_str().to_owned(),
            category: skill.category().as_str().to_owned(),
            description: skill.description().map(ToOwned::to_owned),
        }
    }
}

/// Incoming payload for a direct employee skill edit.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeSkillRequest {
    pub current_level: Option<u8>,
    pub target_level: Option<u8>,
    pub priority: Option<String>,
}

impl UpdateEmployeeSkillRequest {
    pub fn into_edit(self) -> AppResult<EmployeeSkillEdit> {
        Ok(EmployeeSkillEdit {
            current_level: self.current_level.map(SkillLevel::new).transpose()?,
            target_level: self.target_level.map(SkillLevel::new).transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(SkillPriority::from_str)
                .transpose()?,
        })
    }
}

/// API representation of an employee skill row.
#[derive(Debug, Serialize)]
pub struct EmployeeSkillResponse {
    pub user_id: String,
    pub skill_id: String,
    pub current_level: u8,
    pub target_level: u8,
    pub priority: String,
    pub last_assessed: Option<String>,
}

impl From<EmployeeSkill> for EmployeeSkillResponse {
    fn from(skill: EmployeeSkill) -> Self {
        Self {
            user_id: skill.user_id.to_string(),
            skill_id: skill.skill_id.to_string(),
            current_level: skill.current_level.value(),
            target_level: skill.target_level.value(),
            priority: skill.priority.as_str().to_owned(),
            last_assessed: skill.last_assessed.map(|value| value.to_rfc3339()),
        }
    }
}
