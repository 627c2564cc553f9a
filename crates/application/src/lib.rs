//! Application services and ports.

#![forbid(unsafe_code)]

mod assessment_service;
mod audit_service;
mod authorization_service;
mod directory_service;
mod job_profile_service;
mod ports;
mod reporting_service;
mod skill_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use assessment_service::{AssessmentService, RecordAssessmentInput};
pub use audit_service::{AUDIT_LOG_MAX_LIMIT, AuditService};
pub use authorization_service::{
    AccessDecision, AccessRequirement, AuthorizationService, DenyCode, DenyReason,
};
pub use directory_service::{CreateDepartmentInput, CreateEmployeeInput, DirectoryService};
pub use job_profile_service::{CreateJobProfileInput, JobProfileService};
pub use ports::{
    AssessmentListQuery, AssessmentRepository, AssessmentUnitOfWork, AuditEvent, AuditLogEntry,
    AuditLogQuery, AuditLogRepository, AuditRepository, DepartmentRepository,
    EmployeeCredentials, EmployeeRepository, EmployeeSkillRepository, JobProfileRepository,
    NewEmployee, PasswordHasher, ReportingRepository, SkillCatalogRepository,
};
pub use reporting_service::{OrganizationSummary, ReportingService};
pub use skill_service::{CreateSkillInput, SkillService};
pub use user_service::{AuthOutcome, UserService};
