//! Row shapes shared by the PostgreSQL adapters and their domain mappings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use skillmatrix_core::{
    AppError, AppResult, AssessmentId, DepartmentId, NonEmptyString, Role, SkillId, UserId,
};
use skillmatrix_domain::{
    Assessment, AssessmentParts, EmailAddress, Employee, EmployeeSkill, ScopeFilter,
    SkillDefinition, SkillLevel, SkillPriority,
};

pub(crate) const EMPLOYEE_COLUMNS: &str =
    "id, email, display_name, role, department_id, job_title, created_at";

pub(crate) const EMPLOYEE_SKILL_COLUMNS: &str =
    "user_id, skill_id, current_level, target_level, priority, last_assessed";

pub(crate) const ASSESSMENT_COLUMNS: &str = "id, employee_id, assessor_id, skill_id, previous_level, new_level, notes, evidence, next_review_date, assessment_date";

#[derive(Debug, FromRow)]
pub(crate) struct EmployeeRow {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) display_name: String,
    pub(crate) role: String,
    pub(crate) department_id: Option<Uuid>,
    pub(crate) job_title: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = AppError;

    fn try_from(row: EmployeeRow) -> AppResult<Self> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: EmailAddress::new(row.email).map_err(stored_value_error)?,
            display_name: NonEmptyString::new(row.display_name).map_err(stored_value_error)?,
            role: Role::from_str(row.role.as_str()).map_err(stored_value_error)?,
            department_id: row.department_id.map(DepartmentId::from_uuid),
            job_title: row.job_title,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SkillRow {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) description: Option<String>,
}

impl TryFrom<SkillRow> for SkillDefinition {
    type Error = AppError;

    fn try_from(row: SkillRow) -> AppResult<Self> {
        Self::new(
            SkillId::from_uuid(row.id),
            row.name,
            row.category,
            row.description,
        )
        .map_err(stored_value_error)
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EmployeeSkillRow {
    pub(crate) user_id: Uuid,
    pub(crate) skill_id: Uuid,
    pub(crate) current_level: i16,
    pub(crate) target_level: i16,
    pub(crate) priority: String,
    pub(crate) last_assessed: Option<DateTime<Utc>>,
}

impl TryFrom<EmployeeSkillRow> for EmployeeSkill {
    type Error = AppError;

    fn try_from(row: EmployeeSkillRow) -> AppResult<Self> {
        Ok(Self {
            user_id: UserId::from_uuid(row.user_id),
            skill_id: SkillId::from_uuid(row.skill_id),
            current_level: SkillLevel::from_storage(row.current_level)?,
            target_level: SkillLevel::from_storage(row.target_level)?,
            priority: SkillPriority::from_str(row.priority.as_str()).map_err(stored_value_error)?,
            last_assessed: row.last_assessed,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct AssessmentRow {
    pub(crate) id: Uuid,
    pub(crate) employee_id: Uuid,
    pub(crate) assessor_id: Uuid,
    pub(crate) skill_id: Uuid,
    pub(crate) previous_level: i16,
    pub(crate) new_level: i16,
    pub(crate) notes: Option<String>,
    pub(crate) evidence: Option<String>,
    pub(crate) next_review_date: Option<NaiveDate>,
    pub(crate) assessment_date: DateTime<Utc>,
}

impl TryFrom<AssessmentRow> for Assessment {
    type Error = AppError;

    fn try_from(row: AssessmentRow) -> AppResult<Self> {
        Ok(Self::from_parts(AssessmentParts {
            id: AssessmentId::from_uuid(row.id),
            employee_id: UserId::from_uuid(row.employee_id),
            assessor_id: UserId::from_uuid(row.assessor_id),
            skill_id: SkillId::from_uuid(row.skill_id),
            previous_level: SkillLevel::from_storage(row.previous_level)?,
            new_level: SkillLevel::from_storage(row.new_level)?,
            notes: row.notes,
            evidence: row.evidence,
            next_review_date: row.next_review_date,
            assessment_date: row.assessment_date,
        }))
    }
}

/// Maps a batch of rows, failing on the first invalid one.
pub(crate) fn map_rows<R, T>(rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Stored levels are SMALLINT columns.
pub(crate) fn level_column(level: SkillLevel) -> i16 {
    i16::from(level.value())
}

fn stored_value_error(error: AppError) -> AppError {
    AppError::Internal(format!("stored row is invalid: {error}"))
}

/// Bind values that express a [`ScopeFilter`] over employee-owned rows.
///
/// Used as `($1 OR <id> = $2 OR <department> = $3)`; a NULL bind never matches.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EmployeeScopeBinds {
    pub(crate) all: bool,
    pub(crate) user_id: Option<Uuid>,
    pub(crate) department_id: Option<Uuid>,
}

impl EmployeeScopeBinds {
    pub(crate) fn from_scope(scope: &ScopeFilter) -> Self {
        let none = Self {
            all: false,
            user_id: None,
            department_id: None,
        };

        match scope {
            ScopeFilter::Unrestricted => Self { all: true, ..none },
            ScopeFilter::SelfOnly { user_id } => Self {
                user_id: Some(user_id.as_uuid()),
                ..none
            },
            ScopeFilter::Department { department_id } => Self {
                department_id: department_id.map(|id| id.as_uuid()),
                ..none
            },
            ScopeFilter::Participant { .. } => none,
        }
    }
}

/// Bind values that express a [`ScopeFilter`] over assessment rows.
///
/// Used as `($1 OR employee_id = $2 OR assessor_id = $2)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AssessmentScopeBinds {
    pub(crate) all: bool,
    pub(crate) participant: Option<Uuid>,
}

impl AssessmentScopeBinds {
    pub(crate) fn from_scope(scope: &ScopeFilter) -> Self {
        match scope {
            ScopeFilter::Unrestricted => Self {
                all: true,
                participant: None,
            },
            ScopeFilter::Participant { user_id } => Self {
                all: false,
                participant: Some(user_id.as_uuid()),
            },
            ScopeFilter::SelfOnly { .. } | ScopeFilter::Department { .. } => Self {
                all: false,
                participant: None,
            },
        }
    }
}

/// Maps a unique violation to a conflict, anything else to an internal error.
pub(crate) fn map_unique_violation(
    error: sqlx::Error,
    conflict: impl FnOnce() -> String,
    context: &str,
) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict());
    }

    AppError::Internal(format!("failed to {context}: {error}"))
}

#[cfg(test)]
mod tests {
    use skillmatrix_core::{DepartmentId, UserId};
    use skillmatrix_domain::ScopeFilter;

    use super::{AssessmentScopeBinds, EmployeeScopeBinds};

    #[test]
    fn department_scope_without_department_binds_nothing() {
        let binds = EmployeeScopeBinds::from_scope(&ScopeFilter::Department {
            department_id: None,
        });

        assert!(!binds.all);
        assert!(binds.user_id.is_none());
        assert!(binds.department_id.is_none());
    }

    #[test]
    fn employee_binds_follow_scope_variant() {
        let user_id = UserId::new();
        let department_id = DepartmentId::new();

        let own = EmployeeScopeBinds::from_scope(&ScopeFilter::SelfOnly { user_id });
        assert_eq!(own.user_id, Some(user_id.as_uuid()));

        let department = EmployeeScopeBinds::from_scope(&ScopeFilter::Department {
            department_id: Some(department_id),
        });
        assert_eq!(department.department_id, Some(department_id.as_uuid()));

        assert!(EmployeeScopeBinds::from_scope(&ScopeFilter::Unrestricted).all);
    }

    #[test]
    fn assessment_binds_only_widen_for_participants() {
        let user_id = UserId::new();

        let participant =
            AssessmentScopeBinds::from_scope(&ScopeFilter::Participant { user_id });
        assert_eq!(participant.participant, Some(user_id.as_uuid()));

        let own = AssessmentScopeBinds::from_scope(&ScopeFilter::SelfOnly { user_id });
        assert!(!own.all);
        assert!(own.participant.is_none());
    }
}
