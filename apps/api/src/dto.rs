mod assessments;
mod auth;
mod common;
mod organization;
mod reports;
mod skills;

pub use assessments::{
    AmendAssessmentRequest, AssessmentListParams, AssessmentResponse, RecordAssessmentRequest,
};
pub use auth::{ActorResponse, LoginRequest, PermissionsResponse};
pub use common::{HealthResponse, parse_id};
pub use organization::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateJobProfileRequest, DepartmentResponse,
    EmployeeResponse, JobProfileRequirementRequest, JobProfileResponse,
};
pub use reports::{
    AuditLogEntryResponse, AuditLogParams, OrganizationSummaryResponse, ScoreReportResponse,
    SkillGapParams, SkillGapResponse,
};
pub use skills::{
    CreateSkillRequest, EmployeeSkillResponse, SkillResponse, UpdateEmployeeSkillRequest,
};
