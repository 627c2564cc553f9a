use skillmatrix_core::Role;

use super::*;

impl AuthorizationService {
    /// Resolves the rows of a kind the actor may read or change.
    ///
    /// Rules are checked in a fixed order and exactly one filter is returned.
    #[must_use]
    pub fn resolve_scope(&self, actor: &Actor, resource_kind: ResourceKind) -> ScopeFilter {
        match resource_kind {
            ResourceKind::Employee | ResourceKind::EmployeeSkill => self.employee_scope(actor),
            ResourceKind::Assessment => assessment_scope(actor),
            ResourceKind::Department | ResourceKind::JobProfile | ResourceKind::SkillCatalog => {
                ScopeFilter::Unrestricted
            }
        }
    }

    fn employee_scope(&self, actor: &Actor) -> ScopeFilter {
        if self.has_permission(actor, Permission::ViewAllEmployees) {
            return ScopeFilter::Unrestricted;
        }

        match actor.role() {
            Role::DepartmentManager | Role::TeamLead => ScopeFilter::Department {
                department_id: actor.department_id(),
            },
            _ => ScopeFilter::SelfOnly {
                user_id: actor.id(),
            },
        }
    }
}

fn assessment_scope(actor: &Actor) -> ScopeFilter {
    match actor.role() {
        Role::Admin | Role::HrManager => ScopeFilter::Unrestricted,
        _ => ScopeFilter::Participant {
            user_id: actor.id(),
        },
    }
}
