mod assessments;
mod audit;
mod directory;
mod job_profiles;
mod reporting;
mod skills;

pub use assessments::{AssessmentListQuery, AssessmentRepository};
pub use audit::{AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository};
pub use directory::{
    DepartmentRepository, EmployeeCredentials, EmployeeRepository, NewEmployee, PasswordHasher,
};
pub use job_profiles::JobProfileRepository;
pub use reporting::ReportingRepository;
pub use skills::{AssessmentUnitOfWork, EmployeeSkillRepository, SkillCatalogRepository};
