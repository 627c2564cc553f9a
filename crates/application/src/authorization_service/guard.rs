use super::*;

const EMPLOYEE_DELETE_PERMISSIONS: &[Permission] =
    &[Permission::ManageUsers, Permission::EditEmployeeProfiles];

impl AuthorizationService {
    /// Decides whether the actor may perform an action on a resource kind.
    ///
    /// List reads are allowed with the resolved scope, which the caller must apply.
    /// Single-row reads and mutations check the target against that scope.
    #[must_use]
    pub fn authorize(
        &self,
        actor: &Actor,
        resource_kind: ResourceKind,
        action: AccessAction,
        target: Option<&ResourceTarget>,
    ) -> AccessDecision {
        let deny = |code: DenyCode, requirement: AccessRequirement| {
            AccessDecision::Deny(DenyReason {
                code,
                requirement,
                role: actor.role(),
                resource_kind,
                action,
            })
        };

        if resource_kind == ResourceKind::Employee
            && action == AccessAction::Delete
            && matches!(target, Some(ResourceTarget::Employee { user_id, .. }) if *user_id == actor.id())
        {
            return deny(DenyCode::SelfDeleteForbidden, AccessRequirement::NotSelf);
        }

        let scope = self.resolve_scope(actor, resource_kind);

        if action == AccessAction::ReadList {
            return AccessDecision::Allow(scope);
        }

        if let Some(requirement) = self.missing_mutation_requirement(actor, resource_kind, action)
        {
            return deny(DenyCode::AccessDenied, requirement);
        }

        let Some(target) = target else {
            return deny(DenyCode::AccessDenied, AccessRequirement::ConcreteTarget);
        };

        if resource_kind == ResourceKind::Assessment && action == AccessAction::Create {
            return if self.may_author_assessment(actor, target) {
                AccessDecision::Allow(scope)
            } else {
                deny(DenyCode::AccessDenied, AccessRequirement::AssessmentAuthor)
            };
        }

        if !scope.matches(target) {
            return deny(DenyCode::AccessDenied, AccessRequirement::WithinScope(scope));
        }

        if resource_kind == ResourceKind::Assessment
            && matches!(action, AccessAction::Update | AccessAction::Delete)
            && !scope.is_unrestricted()
            && !matches!(target, ResourceTarget::Assessment { assessor_id, .. } if *assessor_id == actor.id())
        {
            return deny(DenyCode::AccessDenied, AccessRequirement::RecordedAssessor);
        }

        AccessDecision::Allow(scope)
    }

    /// Decides whether the actor may create or delete an account holding `role`.
    ///
    /// Accounts whose role outranks the actor's own permission set need
    /// `manage_permissions` to create and `manage_users` to delete.
    #[must_use]
    pub fn authorize_role_management(
        &self,
        actor: &Actor,
        role: Role,
        action: AccessAction,
    ) -> AccessDecision {
        let scope = self.resolve_scope(actor, ResourceKind::Employee);
        if self.registry.role_covers(actor.role(), role) {
            return AccessDecision::Allow(scope);
        }

        let required = match action {
            AccessAction::Delete => Permission::ManageUsers,
            _ => Permission::ManagePermissions,
        };
        if self.has_permission(actor, required) {
            return AccessDecision::Allow(scope);
        }

        AccessDecision::Deny(DenyReason {
            code: DenyCode::AccessDenied,
            requirement: AccessRequirement::Permission(required),
            role: actor.role(),
            resource_kind: ResourceKind::Employee,
            action,
        })
    }

    fn missing_mutation_requirement(
        &self,
        actor: &Actor,
        resource_kind: ResourceKind,
        action: AccessAction,
    ) -> Option<AccessRequirement> {
        if !action.is_mutation() {
            return None;
        }

        let required = match (resource_kind, action) {
            (ResourceKind::Department, _) => Permission::SystemConfiguration,
            (ResourceKind::JobProfile | ResourceKind::SkillCatalog, _) => {
                Permission::ManageJobProfiles
            }
            (ResourceKind::Employee, AccessAction::Create) => Permission::EditEmployeeProfiles,
            (ResourceKind::Employee, AccessAction::Delete) => {
                let granted = EMPLOYEE_DELETE_PERMISSIONS
                    .iter()
                    .any(|permission| self.has_permission(actor, *permission));
                return (!granted)
                    .then_some(AccessRequirement::AnyPermission(EMPLOYEE_DELETE_PERMISSIONS));
            }
            _ => return None,
        };

        (!self.has_permission(actor, required)).then_some(AccessRequirement::Permission(required))
    }

    fn may_author_assessment(&self, actor: &Actor, target: &ResourceTarget) -> bool {
        let ResourceTarget::Assessment { employee_id, .. } = target else {
            return false;
        };

        *employee_id == actor.id()
            || self.has_permission(actor, Permission::ConductAssessments)
            || matches!(actor.role(), Role::Admin | Role::HrManager)
    }
}
