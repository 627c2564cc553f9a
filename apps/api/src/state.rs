use skillmatrix_application::{
    AssessmentService, AuditService, AuthorizationService, DirectoryService, JobProfileService,
    ReportingService, SkillService, UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub user_service: UserService,
    pub directory_service: DirectoryService,
    pub skill_service: SkillService,
    pub assessment_service: AssessmentService,
    pub job_profile_service: JobProfileService,
    pub reporting_service: ReportingService,
    pub audit_service: AuditService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
