use std::sync::Arc;

use skillmatrix_core::{Actor, DepartmentId, Role, UserId};
use skillmatrix_domain::{
    AccessAction, Permission, PermissionRegistry, ResourceKind, ResourceTarget, ScopeFilter,
};

use super::{AccessDecision, AccessRequirement, AuthorizationService, DenyCode};

fn service() -> AuthorizationService {
    AuthorizationService::new(Arc::new(PermissionRegistry::standard()))
}

fn actor(role: Role, department_id: Option<DepartmentId>) -> Actor {
    Actor::new(UserId::new(), role, department_id)
}

fn employee_target(user_id: UserId, department_id: Option<DepartmentId>) -> ResourceTarget {
    ResourceTarget::Employee {
        user_id,
        department_id,
    }
}

fn deny_code(decision: &AccessDecision) -> Option<DenyCode> {
    match decision {
        AccessDecision::Deny(reason) => Some(reason.code),
        AccessDecision::Allow(_) => None,
    }
}

#[test]
fn employee_scope_is_self_only_for_plain_employees() {
    let service = service();
    let employee = actor(Role::Employee, Some(DepartmentId::new()));

    assert_eq!(
        service.resolve_scope(&employee, ResourceKind::Employee),
        ScopeFilter::SelfOnly {
            user_id: employee.id()
        }
    );

    let colleague = employee_target(UserId::new(), employee.department_id());
    let decision = service.authorize(
        &employee,
        ResourceKind::Employee,
        AccessAction::ReadOne,
        Some(&colleague),
    );
    assert_eq!(deny_code(&decision), Some(DenyCode::AccessDenied));

    let own = employee_target(employee.id(), employee.department_id());
    assert!(
        service
            .authorize(
                &employee,
                ResourceKind::Employee,
                AccessAction::ReadOne,
                Some(&own)
            )
            .is_allowed()
    );
}

#[test]
fn assessor_sees_only_own_profile() {
    let service = service();
    let assessor = actor(Role::Assessor, Some(DepartmentId::new()));

    assert_eq!(
        service.resolve_scope(&assessor, ResourceKind::Employee),
        ScopeFilter::SelfOnly {
            user_id: assessor.id()
        }
    );
}

#[test]
fn managers_and_team_leads_are_scoped_to_department() {
    let service = service();
    let department_id = DepartmentId::new();

    for role in [Role::DepartmentManager, Role::TeamLead] {
        let manager = actor(role, Some(department_id));
        assert_eq!(
            service.resolve_scope(&manager, ResourceKind::Employee),
            ScopeFilter::Department {
                department_id: Some(department_id)
            }
        );

        let outsider = employee_target(UserId::new(), Some(DepartmentId::new()));
        assert!(
            !service
                .authorize(
                    &manager,
                    ResourceKind::EmployeeSkill,
                    AccessAction::Update,
                    Some(&outsider)
                )
                .is_allowed()
        );
    }
}

#[test]
fn hr_and_admin_see_everything() {
    let service = service();

    for role in [Role::Admin, Role::HrManager] {
        let actor = actor(role, None);
        assert_eq!(
            service.resolve_scope(&actor, ResourceKind::Employee),
            ScopeFilter::Unrestricted
        );
        assert_eq!(
            service.resolve_scope(&actor, ResourceKind::Assessment),
            ScopeFilter::Unrestricted
        );
    }
}

#[test]
fn assessment_scope_covers_both_participants() {
    let service = service();
    let lead = actor(Role::TeamLead, Some(DepartmentId::new()));

    assert_eq!(
        service.resolve_scope(&lead, ResourceKind::Assessment),
        ScopeFilter::Participant { user_id: lead.id() }
    );

    let recorded_by_lead = ResourceTarget::Assessment {
        employee_id: UserId::new(),
        assessor_id: lead.id(),
    };
    assert!(
        service
            .authorize(
                &lead,
                ResourceKind::Assessment,
                AccessAction::ReadOne,
                Some(&recorded_by_lead)
            )
            .is_allowed()
    );

    let unrelated = ResourceTarget::Assessment {
        employee_id: UserId::new(),
        assessor_id: UserId::new(),
    };
    assert!(
        !service
            .authorize(
                &lead,
                ResourceKind::Assessment,
                AccessAction::ReadOne,
                Some(&unrelated)
            )
            .is_allowed()
    );
}

#[test]
fn self_deletion_is_forbidden_for_every_role() {
    let service = service();

    for role in Role::all() {
        let actor = actor(*role, None);
        let own = employee_target(actor.id(), None);
        let decision = service.authorize(
            &actor,
            ResourceKind::Employee,
            AccessAction::Delete,
            Some(&own),
        );
        assert_eq!(deny_code(&decision), Some(DenyCode::SelfDeleteForbidden));
    }
}

#[test]
fn admin_may_delete_other_accounts() {
    let service = service();
    let admin = actor(Role::Admin, None);
    let other = employee_target(UserId::new(), None);

    assert!(
        service
            .authorize(
                &admin,
                ResourceKind::Employee,
                AccessAction::Delete,
                Some(&other)
            )
            .is_allowed()
    );
}

#[test]
fn hr_manager_cannot_hand_out_or_remove_admin_accounts() {
    let service = service();
    let hr = actor(Role::HrManager, None);

    let create = service.authorize_role_management(&hr, Role::Admin, AccessAction::Create);
    assert!(matches!(
        create,
        AccessDecision::Deny(ref reason)
            if reason.requirement == AccessRequirement::Permission(Permission::ManagePermissions)
    ));

    let delete = service.authorize_role_management(&hr, Role::Admin, AccessAction::Delete);
    assert!(matches!(
        delete,
        AccessDecision::Deny(ref reason)
            if reason.requirement == AccessRequirement::Permission(Permission::ManageUsers)
    ));

    for role in [Role::HrManager, Role::DepartmentManager, Role::Assessor] {
        assert!(
            service
                .authorize_role_management(&hr, role, AccessAction::Create)
                .is_allowed()
        );
    }
    assert!(
        service
            .authorize_role_management(&actor(Role::Admin, None), Role::Admin, AccessAction::Create)
            .is_allowed()
    );
}

#[test]
fn department_manager_cannot_delete_department_members() {
    let service = service();
    let department_id = DepartmentId::new();
    let manager = actor(Role::DepartmentManager, Some(department_id));
    let member = employee_target(UserId::new(), Some(department_id));

    let decision = service.authorize(
        &manager,
        ResourceKind::Employee,
        AccessAction::Delete,
        Some(&member),
    );
    assert!(matches!(
        decision,
        AccessDecision::Deny(ref reason)
            if matches!(reason.requirement, AccessRequirement::AnyPermission(_))
    ));
}

#[test]
fn job_profile_creation_requires_manage_job_profiles() {
    let service = service();

    let hr = actor(Role::HrManager, None);
    assert!(
        service
            .authorize(
                &hr,
                ResourceKind::JobProfile,
                AccessAction::Create,
                Some(&ResourceTarget::Shared)
            )
            .is_allowed()
    );

    let manager = actor(Role::DepartmentManager, Some(DepartmentId::new()));
    let decision = service.authorize(
        &manager,
        ResourceKind::JobProfile,
        AccessAction::Create,
        Some(&ResourceTarget::Shared),
    );
    assert!(matches!(
        decision,
        AccessDecision::Deny(ref reason)
            if reason.requirement == AccessRequirement::Permission(
                skillmatrix_domain::Permission::ManageJobProfiles
            )
    ));
}

#[test]
fn department_reads_are_open_but_writes_need_system_configuration() {
    let service = service();
    let hr = actor(Role::HrManager, None);

    assert!(
        service
            .authorize(
                &hr,
                ResourceKind::Department,
                AccessAction::ReadOne,
                Some(&ResourceTarget::Shared)
            )
            .is_allowed()
    );
    assert!(
        !service
            .authorize(
                &hr,
                ResourceKind::Department,
                AccessAction::Create,
                Some(&ResourceTarget::Shared)
            )
            .is_allowed()
    );
    assert!(
        service
            .authorize(
                &actor(Role::Admin, None),
                ResourceKind::Department,
                AccessAction::Create,
                Some(&ResourceTarget::Shared)
            )
            .is_allowed()
    );
}

#[test]
fn assessment_creation_rules() {
    let service = service();

    let employee = actor(Role::Employee, None);
    let self_assessment = ResourceTarget::Assessment {
        employee_id: employee.id(),
        assessor_id: employee.id(),
    };
    assert!(
        service
            .authorize(
                &employee,
                ResourceKind::Assessment,
                AccessAction::Create,
                Some(&self_assessment)
            )
            .is_allowed()
    );

    let peer_assessment = ResourceTarget::Assessment {
        employee_id: UserId::new(),
        assessor_id: employee.id(),
    };
    assert!(
        !service
            .authorize(
                &employee,
                ResourceKind::Assessment,
                AccessAction::Create,
                Some(&peer_assessment)
            )
            .is_allowed()
    );

    let assessor = actor(Role::Assessor, None);
    let assessed = ResourceTarget::Assessment {
        employee_id: UserId::new(),
        assessor_id: assessor.id(),
    };
    assert!(
        service
            .authorize(
                &assessor,
                ResourceKind::Assessment,
                AccessAction::Create,
                Some(&assessed)
            )
            .is_allowed()
    );
}

#[test]
fn only_recorded_assessor_may_amend_when_scoped() {
    let service = service();
    let employee = actor(Role::Employee, None);
    let reviewed_by_other = ResourceTarget::Assessment {
        employee_id: employee.id(),
        assessor_id: UserId::new(),
    };

    assert!(
        service
            .authorize(
                &employee,
                ResourceKind::Assessment,
                AccessAction::ReadOne,
                Some(&reviewed_by_other)
            )
            .is_allowed()
    );

    let decision = service.authorize(
        &employee,
        ResourceKind::Assessment,
        AccessAction::Update,
        Some(&reviewed_by_other),
    );
    assert!(matches!(
        decision,
        AccessDecision::Deny(ref reason) if reason.requirement == AccessRequirement::RecordedAssessor
    ));

    let hr = actor(Role::HrManager, None);
    assert!(
        service
            .authorize(
                &hr,
                ResourceKind::Assessment,
                AccessAction::Update,
                Some(&reviewed_by_other)
            )
            .is_allowed()
    );
}

#[test]
fn single_row_actions_need_a_target() {
    let service = service();
    let admin = actor(Role::Admin, None);

    let decision = service.authorize(&admin, ResourceKind::Employee, AccessAction::ReadOne, None);
    assert_eq!(deny_code(&decision), Some(DenyCode::AccessDenied));
}

#[test]
fn require_maps_denial_to_forbidden_with_code() {
    let service = service();
    let employee = actor(Role::Employee, None);

    let result = service.require(
        &employee,
        ResourceKind::SkillCatalog,
        AccessAction::Create,
        Some(&ResourceTarget::Shared),
    );

    let message = result.err().map(|error| error.to_string()).unwrap_or_default();
    assert!(message.starts_with("forbidden: ACCESS_DENIED"));
    assert!(message.contains("manage_job_profiles"));
}

#[test]
fn list_reads_return_scope_for_caller() {
    let service = service();
    let employee = actor(Role::Employee, None);

    let decision = service.authorize(
        &employee,
        ResourceKind::Assessment,
        AccessAction::ReadList,
        None,
    );
    assert_eq!(
        decision,
        AccessDecision::Allow(ScopeFilter::Participant {
            user_id: employee.id()
        })
    );
}

#[test]
fn team_lead_without_department_reaches_no_colleagues() {
    let service = service();
    let lead = actor(Role::TeamLead, None);
    let unassigned = employee_target(UserId::new(), None);

    assert_eq!(
        service.resolve_scope(&lead, ResourceKind::Employee),
        ScopeFilter::Department {
            department_id: None
        }
    );
    assert!(
        !service
            .authorize(
                &lead,
                ResourceKind::Employee,
                AccessAction::ReadOne,
                Some(&unassigned)
            )
            .is_allowed()
    );
}
