use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillmatrix_core::{AppError, AppResult, NonEmptyString, SkillId, UserId};

/// Proficiency level on the 1 to 5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SkillLevel(u8);

impl SkillLevel {
    /// Lowest level; also the implicit level of an untracked skill.
    pub const FLOOR: Self = Self(1);
    /// Highest level.
    pub const CEILING: Self = Self(5);

    /// Creates a validated level.
    pub fn new(value: u8) -> AppResult<Self> {
        if !(Self::FLOOR.0..=Self::CEILING.0).contains(&value) {
            return Err(AppError::Validation(format!(
                "skill level must be between 1 and 5, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Creates a level from a stored integer column.
    pub fn from_storage(value: i16) -> AppResult<Self> {
        u8::try_from(value)
            .map_err(|_| AppError::Internal(format!("stored skill level {value} is out of range")))
            .and_then(|value| {
                Self::new(value).map_err(|error| AppError::Internal(error.to_string()))
            })
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SkillLevel> for u8 {
    fn from(value: SkillLevel) -> Self {
        value.0
    }
}

impl Display for SkillLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Development priority of an employee skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillPriority {
    /// Nice to have.
    Low,
    /// Default priority.
    Medium,
    /// Needed soon.
    High,
    /// Blocking for the role.
    Critical,
}

impl SkillPriority {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for SkillPriority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(AppError::Validation(format!(
                "unknown skill priority '{value}'"
            ))),
        }
    }
}

/// Skill catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    id: SkillId,
    name: NonEmptyString,
    category: NonEmptyString,
    description: Option<String>,
}

impl SkillDefinition {
    /// Creates a validated catalog entry.
    pub fn new(
        id: SkillId,
        name: impl Into<String>,
        category: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            category: NonEmptyString::new(category)?,
            description: description.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> SkillId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &NonEmptyString {
        &self.category
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Cached current and target level for one (employee, skill) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSkill {
    /// Owning employee.
    pub user_id: UserId,
    /// Tracked skill.
    pub skill_id: SkillId,
    /// Level reflected by the latest applied assessment or direct edit.
    pub current_level: SkillLevel,
    /// Level the employee is working towards.
    pub target_level: SkillLevel,
    /// Development priority.
    pub priority: SkillPriority,
    /// Time of the latest applied assessment.
    pub last_assessed: Option<DateTime<Utc>>,
}

/// Direct edit of an employee skill row; does not produce history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeSkillEdit {
    /// New current level.
    pub current_level: Option<SkillLevel>,
    /// New target level.
    pub target_level: Option<SkillLevel>,
    /// New priority.
    pub priority: Option<SkillPriority>,
}

impl EmployeeSkill {
    /// Applies a direct edit, creating the row when the pair is untracked.
    #[must_use]
    pub fn edited(
        existing: Option<Self>,
        user_id: UserId,
        skill_id: SkillId,
        edit: &EmployeeSkillEdit,
    ) -> Self {
        match existing {
            Some(mut skill) => {
                if let Some(level) = edit.current_level {
                    skill.current_level = level;
                }
                if let Some(level) = edit.target_level {
                    skill.target_level = level;
                }
                if let Some(priority) = edit.priority {
                    skill.priority = priority;
                }
                skill
            }
            None => {
                let current_level = edit.current_level.unwrap_or(SkillLevel::FLOOR);
                Self {
                    user_id,
                    skill_id,
                    current_level,
                    target_level: edit
                        .target_level
                        .unwrap_or_else(|| default_target_level(current_level)),
                    priority: edit.priority.unwrap_or(SkillPriority::Medium),
                    last_assessed: None,
                }
            }
        }
    }
}

/// Default target for a newly tracked skill: the current level, raised to at least 3.
#[must_use]
pub fn default_target_level(current_level: SkillLevel) -> SkillLevel {
    current_level.max(SkillLevel(3))
}
