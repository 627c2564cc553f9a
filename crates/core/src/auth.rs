use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, DepartmentId, UserId};

/// Closed set of organisational roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full platform administrator.
    Admin,
    /// Human-resources manager with organisation-wide visibility.
    HrManager,
    /// Manager of a single department.
    DepartmentManager,
    /// Lead of a team inside a department.
    TeamLead,
    /// Regular employee.
    Employee,
    /// Dedicated skill assessor.
    Assessor,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::HrManager => "hr_manager",
            Self::DepartmentManager => "department_manager",
            Self::TeamLead => "team_lead",
            Self::Employee => "employee",
            Self::Assessor => "assessor",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Admin,
            Role::HrManager,
            Role::DepartmentManager,
            Role::TeamLead,
            Role::Employee,
            Role::Assessor,
        ];

        ALL
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "hr_manager" => Ok(Self::HrManager),
            "department_manager" => Ok(Self::DepartmentManager),
            "team_lead" => Ok(Self::TeamLead),
            "employee" => Ok(Self::Employee),
            "assessor" => Ok(Self::Assessor),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Authenticated identity performing an operation.
///
/// Rebuilt from the verified session on every request and passed explicitly
/// into each application call; it is never persisted by the core crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
    department_id: Option<DepartmentId>,
}

impl Actor {
    /// Creates an actor from verified identity data.
    #[must_use]
    pub fn new(id: UserId, role: Role, department_id: Option<DepartmentId>) -> Self {
        Self {
            id,
            role,
            department_id,
        }
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the actor's department, if any.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }
}
