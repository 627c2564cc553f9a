use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skillmatrix_application::{CreateDepartmentInput, CreateEmployeeInput, CreateJobProfileInput};
use skillmatrix_core::{AppResult, DepartmentId, Role, SkillId};
use skillmatrix_domain::{Department, Employee, JobProfile, JobProfileSkill, SkillLevel};

use super::parse_id;

/// Incoming payload for employee creation.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
    pub department_id: Option<String>,
    pub job_title: Option<String>,
}

impl CreateEmployeeRequest {
    pub fn into_input(self) -> AppResult<CreateEmployeeInput> {
        Ok(CreateEmployeeInput {
            email: self.email,
            password: self.password,
            display_name: self.display_name,
            role: Role::from_str(self.role.as_str())?,
            department_id: self
                .department_id
                .as_deref()
                .map(parse_id::<DepartmentId>)
                .transpose()?,
            job_title: self.job_title,
        })
    }
}

/// API representation of an employee.
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub department_id: Option<String>,
    pub job_title: Option<String>,
    pub created_at: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            user_id: employee.id.to_string(),
            email: employee.email.as_str().to_owned(),
            display_name: employee.display_name.as_str().to_owned(),
            role: employee.role.as_str().to_owned(),
            department_id: employee.department_id.map(|id| id.to_string()),
            job_title: employee.job_title,
            created_at: employee.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for department creation.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub description: Option<String>,
}

impl From<CreateDepartmentRequest> for CreateDepartmentInput {
    fn from(request: CreateDepartmentRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

/// API representation of a department.
#[derive(Debug, Serialize)]
pub struct DepartmentResponse {
    pub department_id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            department_id: department.id.to_string(),
            name: department.name.as_str().to_owned(),
            description: department.description,
        }
    }
}

/// One required skill in a job profile payload.
#[derive(Debug, Deserialize, Serialize)]
pub struct JobProfileRequirementRequest {
    pub skill_id: String,
    pub minimum_level: u8,
}

/// Incoming payload for job profile creation.
#[derive(Debug, Deserialize)]
pub struct CreateJobProfileRequest {
    pub title: String,
    pub department_id: Option<String>,
    #[serde(default)]
    pub skills: Vec<JobProfileRequirementRequest>,
}

impl CreateJobProfileRequest {
    pub fn into_input(self) -> AppResult<CreateJobProfileInput> {
        let skills = self
            .skills
            .into_iter()
            .map(|requirement| {
                Ok(JobProfileSkill {
                    skill_id: parse_id::<SkillId>(&requirement.skill_id)?,
                    minimum_level: SkillLevel::new(requirement.minimum_level)?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(CreateJobProfileInput {
            title: self.title,
            department_id: self
                .department_id
                .as_deref()
                .map(parse_id::<DepartmentId>)
                .transpose()?,
            skills,
        })
    }
}

/// API representation of a job profile.
#[derive(Debug, Serialize)]
pub struct JobProfileResponse {
    pub job_profile_id: String,
    pub title: String,
    pub department_id: Option<String>,
    pub skills: Vec<JobProfileRequirementRequest>,
}

impl From<JobProfile> for JobProfileResponse {
    fn from(profile: JobProfile) -> Self {
        Self {
            job_profile_id: profile.id().to_string(),
            title: profile.title().as_str().to_owned(),
            department_id: profile.department_id().map(|id| id.to_string()),
            skills: profile
                .skills()
                .iter()
                .map(|requirement| JobProfileRequirementRequest {
                    skill_id: requirement.skill_id.to_string(),
                    minimum_level: requirement.minimum_level.value(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use skillmatrix_core::{AppError, Role, SkillId};

    use super::{CreateEmployeeRequest, CreateJobProfileRequest, JobProfileRequirementRequest};

    #[test]
    fn employee_request_parses_role_name() {
        let request = CreateEmployeeRequest {
            email: "ada@example.com".to_owned(),
            password: "correct horse battery".to_owned(),
            display_name: "Ada".to_owned(),
            role: "team_lead".to_owned(),
            department_id: None,
            job_title: None,
        };

        let input = request.into_input();
        assert!(matches!(input, Ok(input) if input.role == Role::TeamLead));
    }

    #[test]
    fn job_profile_request_rejects_out_of_range_levels() {
        let request = CreateJobProfileRequest {
            title: "Engineer".to_owned(),
            department_id: None,
            skills: vec![JobProfileRequirementRequest {
                skill_id: SkillId::new().to_string(),
                minimum_level: 6,
            }],
        };

        assert!(matches!(request.into_input(), Err(AppError::Validation(_))));
    }
}
