use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skillmatrix_core::{AppError, Role};

/// Permissions granted to roles by the fixed registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows reading one's own profile.
    ViewOwnProfile,
    /// Allows editing one's own skill rows.
    EditOwnSkills,
    /// Allows reading one's own assessment history.
    ViewOwnAssessments,
    /// Allows reading profiles of team members.
    ViewTeamProfiles,
    /// Allows reading profiles in the actor's department.
    ViewDepartmentProfiles,
    /// Allows recording assessments for other employees.
    ConductAssessments,
    /// Allows reading every employee record.
    ViewAllEmployees,
    /// Allows creating and editing employee records.
    EditEmployeeProfiles,
    /// Allows managing job profiles and the skill catalog.
    ManageJobProfiles,
    /// Allows reading organisation-wide dashboards.
    ViewOrganizationDashboard,
    /// Allows managing user accounts.
    ManageUsers,
    /// Allows managing permission assignments.
    ManagePermissions,
    /// Allows changing system configuration such as departments.
    SystemConfiguration,
    /// Allows reading the audit log.
    ViewAuditLogs,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewOwnProfile => "view_own_profile",
            Self::EditOwnSkills => "edit_own_skills",
            Self::ViewOwnAssessments => "view_own_assessments",
            Self::ViewTeamProfiles => "view_team_profiles",
            Self::ViewDepartmentProfiles => "view_department_profiles",
            Self::ConductAssessments => "conduct_assessments",
            Self::ViewAllEmployees => "view_all_employees",
            Self::EditEmployeeProfiles => "edit_employee_profiles",
            Self::ManageJobProfiles => "manage_job_profiles",
            Self::ViewOrganizationDashboard => "view_organization_dashboard",
            Self::ManageUsers => "manage_users",
            Self::ManagePermissions => "manage_permissions",
            Self::SystemConfiguration => "system_configuration",
            Self::ViewAuditLogs => "view_audit_logs",
        }
    }
}

impl Permission {
    /// Returns the wider permissions that include this one.
    #[must_use]
    pub fn implied_by(&self) -> &'static [Permission] {
        match self {
            Self::ViewTeamProfiles => &[Self::ViewDepartmentProfiles, Self::ViewAllEmployees],
            Self::ViewDepartmentProfiles => &[Self::ViewAllEmployees],
            _ => &[],
        }
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view_own_profile" => Ok(Self::ViewOwnProfile),
            "edit_own_skills" => Ok(Self::EditOwnSkills),
            "view_own_assessments" => Ok(Self::ViewOwnAssessments),
            "view_team_profiles" => Ok(Self::ViewTeamProfiles),
            "view_department_profiles" => Ok(Self::ViewDepartmentProfiles),
            "conduct_assessments" => Ok(Self::ConductAssessments),
            "view_all_employees" => Ok(Self::ViewAllEmployees),
            "edit_employee_profiles" => Ok(Self::EditEmployeeProfiles),
            "manage_job_profiles" => Ok(Self::ManageJobProfiles),
            "view_organization_dashboard" => Ok(Self::ViewOrganizationDashboard),
            "manage_users" => Ok(Self::ManageUsers),
            "manage_permissions" => Ok(Self::ManagePermissions),
            "system_configuration" => Ok(Self::SystemConfiguration),
            "view_audit_logs" => Ok(Self::ViewAuditLogs),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnProfile,
    Permission::EditOwnSkills,
    Permission::ViewOwnAssessments,
    Permission::ViewTeamProfiles,
    Permission::ViewDepartmentProfiles,
    Permission::ConductAssessments,
    Permission::ViewAllEmployees,
    Permission::EditEmployeeProfiles,
    Permission::ManageJobProfiles,
    Permission::ViewOrganizationDashboard,
    Permission::ManageUsers,
    Permission::ManagePermissions,
    Permission::SystemConfiguration,
    Permission::ViewAuditLogs,
];

const HR_MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnProfile,
    Permission::EditOwnSkills,
    Permission::ViewOwnAssessments,
    Permission::ViewAllEmployees,
    Permission::EditEmployeeProfiles,
    Permission::ConductAssessments,
    Permission::ManageJobProfiles,
    Permission::ViewOrganizationDashboard,
];

const DEPARTMENT_MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnProfile,
    Permission::EditOwnSkills,
    Permission::ViewOwnAssessments,
    Permission::ViewDepartmentProfiles,
    Permission::ConductAssessments,
    Permission::ViewOrganizationDashboard,
];

const TEAM_LEAD_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnProfile,
    Permission::EditOwnSkills,
    Permission::ViewOwnAssessments,
    Permission::ViewTeamProfiles,
    Permission::ConductAssessments,
];

const ASSESSOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnProfile,
    Permission::EditOwnSkills,
    Permission::ViewOwnAssessments,
    Permission::ConductAssessments,
    Permission::ViewTeamProfiles,
];

const EMPLOYEE_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnProfile,
    Permission::EditOwnSkills,
    Permission::ViewOwnAssessments,
];

/// Returns the fixed permission grants of a role.
#[must_use]
pub fn role_grants(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN_PERMISSIONS,
        Role::HrManager => HR_MANAGER_PERMISSIONS,
        Role::DepartmentManager => DEPARTMENT_MANAGER_PERMISSIONS,
        Role::TeamLead => TEAM_LEAD_PERMISSIONS,
        Role::Assessor => ASSESSOR_PERMISSIONS,
        Role::Employee => EMPLOYEE_PERMISSIONS,
    }
}

/// Immutable role to permission mapping.
///
/// Built once at start-up and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRegistry {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl PermissionRegistry {
    /// Builds the registry from the fixed role table.
    #[must_use]
    pub fn standard() -> Self {
        let grants = Role::all()
            .iter()
            .map(|role| (*role, role_grants(*role).iter().copied().collect()))
            .collect();

        Self { grants }
    }

    /// Returns the permission set for a role.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> BTreeSet<Permission> {
        self.grants.get(&role).cloned().unwrap_or_default()
    }

    /// Returns the permission set for a role storage value.
    ///
    /// Unknown role names resolve to the empty set.
    #[must_use]
    pub fn permissions_for_role_name(&self, role_name: &str) -> BTreeSet<Permission> {
        Role::from_str(role_name)
            .map(|role| self.permissions_for(role))
            .unwrap_or_default()
    }

    /// Returns whether a role holds a permission.
    #[must_use]
    pub fn role_has(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|permissions| permissions.contains(&permission))
    }

    /// Returns whether `holder` holds every permission of `role`.
    ///
    /// A wider visibility permission stands in for the narrower ones.
    #[must_use]
    pub fn role_covers(&self, holder: Role, role: Role) -> bool {
        self.permissions_for(role).iter().all(|permission| {
            permission
                .implied_by()
                .iter()
                .chain(std::iter::once(permission))
                .any(|granting| self.role_has(holder, *granting))
        })
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when an assessment is recorded.
    AssessmentRecorded,
    /// Emitted when an assessment is amended.
    AssessmentAmended,
    /// Emitted when an assessment is deleted.
    AssessmentDeleted,
    /// Emitted when an employee skill is edited directly.
    EmployeeSkillUpdated,
    /// Emitted when an employee account is created.
    EmployeeCreated,
    /// Emitted when an employee account is deleted.
    EmployeeDeleted,
    /// Emitted when a department is created.
    DepartmentCreated,
    /// Emitted when a job profile is created.
    JobProfileCreated,
    /// Emitted when a skill catalog entry is created.
    SkillCreated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssessmentRecorded => "assessment.recorded",
            Self::AssessmentAmended => "assessment.amended",
            Self::AssessmentDeleted => "assessment.deleted",
            Self::EmployeeSkillUpdated => "employee_skill.updated",
            Self::EmployeeCreated => "employee.created",
            Self::EmployeeDeleted => "employee.deleted",
            Self::DepartmentCreated => "department.created",
            Self::JobProfileCreated => "job_profile.created",
            Self::SkillCreated => "skill.created",
        }
    }
}
