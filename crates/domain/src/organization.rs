//! Employees, departments and job profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillmatrix_core::{
    AppError, AppResult, DepartmentId, JobProfileId, NonEmptyString, Role, SkillId, UserId,
};

use crate::scope::ResourceTarget;
use crate::skill::SkillLevel;

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_lowercase();

        let Some((local, domain)) = value.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@' and a local part".to_owned(),
            ));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one inner '.'".to_owned(),
            ));
        }

        if value.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Maximum accepted password length.
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates an initial account password.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Employee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier.
    pub id: UserId,
    /// Login email.
    pub email: EmailAddress,
    /// Display name.
    pub display_name: NonEmptyString,
    /// Organisational role.
    pub role: Role,
    /// Department membership.
    pub department_id: Option<DepartmentId>,
    /// Job title.
    pub job_title: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Returns the scope target describing this employee.
    #[must_use]
    pub fn as_target(&self) -> ResourceTarget {
        ResourceTarget::Employee {
            user_id: self.id,
            department_id: self.department_id,
        }
    }
}

/// Organisational department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Identifier.
    pub id: DepartmentId,
    /// Unique name.
    pub name: NonEmptyString,
    /// Optional description.
    pub description: Option<String>,
}

/// Minimum level a job profile requires for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProfileSkill {
    /// Required skill.
    pub skill_id: SkillId,
    /// Required minimum level.
    pub minimum_level: SkillLevel,
}

/// Role description with skill requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProfile {
    id: JobProfileId,
    title: NonEmptyString,
    department_id: Option<DepartmentId>,
    skills: Vec<JobProfileSkill>,
}

impl JobProfile {
    /// Creates a validated job profile. A skill may be listed only once.
    pub fn new(
        id: JobProfileId,
        title: impl Into<String>,
        department_id: Option<DepartmentId>,
        skills: Vec<JobProfileSkill>,
    ) -> AppResult<Self> {
        let title = NonEmptyString::new(title)?;

        for (index, skill) in skills.iter().enumerate() {
            if skills[..index]
                .iter()
                .any(|other| other.skill_id == skill.skill_id)
            {
                return Err(AppError::Validation(format!(
                    "job profile '{}' lists skill '{}' more than once",
                    title.as_str(),
                    skill.skill_id
                )));
            }
        }

        Ok(Self {
            id,
            title,
            department_id,
            skills,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> JobProfileId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the department the profile applies to.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the skill requirements.
    #[must_use]
    pub fn skills(&self) -> &[JobProfileSkill] {
        &self.skills
    }

    /// Returns the minimum level required for a skill, if listed.
    #[must_use]
    pub fn minimum_level_for(&self, skill_id: SkillId) -> Option<SkillLevel> {
        self.skills
            .iter()
            .find(|skill| skill.skill_id == skill_id)
            .map(|skill| skill.minimum_level)
    }
}

#[cfg(test)]
mod tests {
    use skillmatrix_core::{JobProfileId, SkillId};

    use super::{EmailAddress, JobProfile, JobProfileSkill, validate_password};
    use crate::skill::SkillLevel;

    #[test]
    fn email_is_lower_cased() {
        let email = EmailAddress::new("  Ada@Example.COM ");
        assert_eq!(
            email.map(|value| value.as_str().to_owned()).ok(),
            Some("ada@example.com".to_owned())
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        assert!(EmailAddress::new("no-at-sign").is_err());
        assert!(EmailAddress::new("@example.com").is_err());
        assert!(EmailAddress::new("ada@localhost").is_err());
        assert!(EmailAddress::new("ada@b@example.com").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("a-reasonable-passphrase").is_ok());
    }

    #[test]
    fn duplicate_job_profile_skill_is_rejected() {
        let skill_id = SkillId::new();
        let requirement = JobProfileSkill {
            skill_id,
            minimum_level: SkillLevel::FLOOR,
        };

        let profile = JobProfile::new(
            JobProfileId::new(),
            "Backend Engineer",
            None,
            vec![requirement, requirement],
        );
        assert!(profile.is_err());
    }
}
