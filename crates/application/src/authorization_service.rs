use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use skillmatrix_core::{Actor, AppError, AppResult, Role};
use skillmatrix_domain::{
    AccessAction, Permission, PermissionRegistry, ResourceKind, ResourceTarget, ScopeFilter,
};

mod guard;
mod scope;

#[cfg(test)]
mod tests;

/// Stable code attached to a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyCode {
    /// Permission or scope check failed.
    AccessDenied,
    /// Actor tried to delete their own account.
    SelfDeleteForbidden,
}

impl DenyCode {
    /// Returns the transport value of the code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "ACCESS_DENIED",
            Self::SelfDeleteForbidden => "SELF_DELETE_FORBIDDEN",
        }
    }
}

/// Condition the actor failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequirement {
    /// A single permission.
    Permission(Permission),
    /// Any one of the listed permissions.
    AnyPermission(&'static [Permission]),
    /// The target must satisfy the actor's scope.
    WithinScope(ScopeFilter),
    /// Self-assessment, `conduct_assessments`, or an admin/HR role.
    AssessmentAuthor,
    /// Only the recording assessor may correct an assessment.
    RecordedAssessor,
    /// The action needs a concrete target row.
    ConcreteTarget,
    /// The target must not be the actor.
    NotSelf,
}

impl Display for AccessRequirement {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permission(permission) => {
                write!(formatter, "permission '{}'", permission.as_str())
            }
            Self::AnyPermission(permissions) => {
                let names: Vec<&str> = permissions.iter().map(Permission::as_str).collect();
                write!(formatter, "one of permissions [{}]", names.join(", "))
            }
            Self::WithinScope(scope) => write!(formatter, "target within scope {scope:?}"),
            Self::AssessmentAuthor => formatter.write_str(
                "self-assessment, permission 'conduct_assessments', or role admin/hr_manager",
            ),
            Self::RecordedAssessor => formatter.write_str("actor to be the recorded assessor"),
            Self::ConcreteTarget => formatter.write_str("a concrete target"),
            Self::NotSelf => formatter.write_str("a target other than the actor"),
        }
    }
}

/// Structured reason for a denial, carrying required-vs-actual context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyReason {
    /// Stable code.
    pub code: DenyCode,
    /// What was required.
    pub requirement: AccessRequirement,
    /// The actor's role.
    pub role: Role,
    /// Requested resource kind.
    pub resource_kind: ResourceKind,
    /// Requested action.
    pub action: AccessAction,
}

impl Display for DenyReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}: role '{}' cannot {} {}; requires {}",
            self.code.as_str(),
            self.role.as_str(),
            self.action.as_str(),
            self.resource_kind.as_str(),
            self.requirement
        )
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Allowed; list queries must be narrowed by the scope.
    Allow(ScopeFilter),
    /// Denied.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns whether the decision allows the operation.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Pure permission and visibility checks over the fixed role registry.
#[derive(Clone)]
pub struct AuthorizationService {
    registry: Arc<PermissionRegistry>,
}

impl AuthorizationService {
    /// Creates a service over an immutable registry.
    #[must_use]
    pub fn new(registry: Arc<PermissionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the permission set granted to a role.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> BTreeSet<Permission> {
        self.registry.permissions_for(role)
    }

    /// Returns whether the actor's role grants the permission.
    #[must_use]
    pub fn has_permission(&self, actor: &Actor, permission: Permission) -> bool {
        self.registry.role_has(actor.role(), permission)
    }

    /// Ensures the actor's role grants the permission.
    pub fn require_permission(&self, actor: &Actor, permission: Permission) -> AppResult<()> {
        if self.has_permission(actor, permission) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "{}: role '{}' is missing permission '{}'",
            DenyCode::AccessDenied.as_str(),
            actor.role().as_str(),
            permission.as_str()
        )))
    }

    /// Authorizes an operation and converts a denial into [`AppError::Forbidden`].
    pub fn require(
        &self,
        actor: &Actor,
        resource_kind: ResourceKind,
        action: AccessAction,
        target: Option<&ResourceTarget>,
    ) -> AppResult<ScopeFilter> {
        match self.authorize(actor, resource_kind, action, target) {
            AccessDecision::Allow(scope) => Ok(scope),
            AccessDecision::Deny(reason) => Err(AppError::Forbidden(reason.to_string())),
        }
    }

    /// Role-management check converting a denial into [`AppError::Forbidden`].
    pub fn require_role_management(
        &self,
        actor: &Actor,
        role: Role,
        action: AccessAction,
    ) -> AppResult<()> {
        match self.authorize_role_management(actor, role, action) {
            AccessDecision::Allow(_) => Ok(()),
            AccessDecision::Deny(reason) => Err(AppError::Forbidden(reason.to_string())),
        }
    }
}
