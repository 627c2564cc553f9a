use serde::{Deserialize, Serialize};
use skillmatrix_core::{DepartmentId, UserId};

/// Resource kinds guarded by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Employee (user account) records.
    Employee,
    /// Employee skill rows, scoped through the owning employee.
    EmployeeSkill,
    /// Assessment history records.
    Assessment,
    /// Department records.
    Department,
    /// Job profile records.
    JobProfile,
    /// Skill catalog entries.
    SkillCatalog,
}

impl ResourceKind {
    /// Returns a stable value used in audit entries and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::EmployeeSkill => "employee_skill",
            Self::Assessment => "assessment",
            Self::Department => "department",
            Self::JobProfile => "job_profile",
            Self::SkillCatalog => "skill",
        }
    }
}

/// Operation requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// Listing rows.
    ReadList,
    /// Reading one row.
    ReadOne,
    /// Creating a row.
    Create,
    /// Updating a row.
    Update,
    /// Deleting a row.
    Delete,
}

impl AccessAction {
    /// Returns a stable value used in error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadList => "read-list",
            Self::ReadOne => "read-one",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns whether the action changes state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// Identity of one concrete row checked against a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTarget {
    /// An employee, or a row owned by an employee.
    Employee {
        /// Employee identifier.
        user_id: UserId,
        /// Department the employee belongs to.
        department_id: Option<DepartmentId>,
    },
    /// An assessment and its two participants.
    Assessment {
        /// Assessed employee.
        employee_id: UserId,
        /// Recording assessor.
        assessor_id: UserId,
    },
    /// A row with no row-level ownership (department, job profile, catalog).
    Shared,
}

/// Predicate limiting which rows of a kind an actor may see or change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeFilter {
    /// Every row.
    Unrestricted,
    /// Only the actor's own row.
    SelfOnly {
        /// The actor.
        user_id: UserId,
    },
    /// Rows in one department. `None` matches nothing.
    Department {
        /// The actor's department.
        department_id: Option<DepartmentId>,
    },
    /// Assessments where the actor is the employee or the assessor.
    Participant {
        /// The actor.
        user_id: UserId,
    },
}

impl ScopeFilter {
    /// Returns whether a concrete row satisfies the filter.
    #[must_use]
    pub fn matches(&self, target: &ResourceTarget) -> bool {
        match (self, target) {
            (Self::Unrestricted, _) => true,
            (_, ResourceTarget::Shared) => false,
            (Self::SelfOnly { user_id }, ResourceTarget::Employee { user_id: owner, .. }) => {
                user_id == owner
            }
            (
                Self::Department { department_id },
                ResourceTarget::Employee {
                    department_id: owner_department,
                    ..
                },
            ) => department_id.is_some() && department_id == owner_department,
            (
                Self::Participant { user_id },
                ResourceTarget::Assessment {
                    employee_id,
                    assessor_id,
                },
            ) => user_id == employee_id || user_id == assessor_id,
            _ => false,
        }
    }

    /// Returns whether the filter places no restriction on rows.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}
