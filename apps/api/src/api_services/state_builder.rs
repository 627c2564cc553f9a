use std::sync::Arc;

use skillmatrix_application::{
    AssessmentService, AuditService, AuthorizationService, DirectoryService, JobProfileService,
    ReportingService, SkillService, UserService,
};
use skillmatrix_domain::PermissionRegistry;
use skillmatrix_infrastructure::{
    Argon2PasswordHasher, PostgresAuditRepository, PostgresDirectoryRepository,
    PostgresJobProfileRepository, PostgresReportingRepository, PostgresSkillRepository,
};
use sqlx::PgPool;

use crate::state::AppState;

pub fn build_app_state(pool: PgPool, frontend_url: String) -> AppState {
    let directory_repository = Arc::new(PostgresDirectoryRepository::new(pool.clone()));
    let skill_repository = Arc::new(PostgresSkillRepository::new(pool.clone()));
    let job_profile_repository = Arc::new(PostgresJobProfileRepository::new(pool.clone()));
    let reporting_repository = Arc::new(PostgresReportingRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());

    let authorization_service = AuthorizationService::new(Arc::new(PermissionRegistry::standard()));

    AppState {
        user_service: UserService::new(directory_repository.clone(), password_hasher.clone()),
        directory_service: DirectoryService::new(
            authorization_service.clone(),
            directory_repository.clone(),
            directory_repository.clone(),
            password_hasher,
            audit_repository.clone(),
        ),
        skill_service: SkillService::new(
            authorization_service.clone(),
            skill_repository.clone(),
            skill_repository.clone(),
            directory_repository.clone(),
            audit_repository.clone(),
        ),
        assessment_service: AssessmentService::new(
            authorization_service.clone(),
            skill_repository.clone(),
            skill_repository.clone(),
            directory_repository.clone(),
            skill_repository.clone(),
        ),
        job_profile_service: JobProfileService::new(
            authorization_service.clone(),
            job_profile_repository,
            directory_repository.clone(),
            skill_repository,
            audit_repository.clone(),
        ),
        reporting_service: ReportingService::new(
            authorization_service.clone(),
            reporting_repository,
            directory_repository,
        ),
        audit_service: AuditService::new(authorization_service.clone(), audit_repository),
        authorization_service,
        postgres_pool: pool,
        frontend_url,
    }
}
