use std::sync::Arc;

use skillmatrix_core::{Actor, AppError, AppResult, DepartmentId, JobProfileId};
use skillmatrix_domain::{
    AccessAction, AuditAction, JobProfile, JobProfileSkill, ResourceKind, ResourceTarget,
};

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, DepartmentRepository,
    JobProfileRepository, SkillCatalogRepository,
};

/// Input for creating a job profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobProfileInput {
    /// Profile title.
    pub title: String,
    /// Department the profile applies to.
    pub department_id: Option<DepartmentId>,
    /// Required minimum levels.
    pub skills: Vec<JobProfileSkill>,
}

/// Application service for job profiles.
#[derive(Clone)]
pub struct JobProfileService {
    authorization_service: AuthorizationService,
    job_profile_repository: Arc<dyn JobProfileRepository>,
    department_repository: Arc<dyn DepartmentRepository>,
    skill_catalog_repository: Arc<dyn SkillCatalogRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl JobProfileService {
    /// Creates a new job profile service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        job_profile_repository: Arc<dyn JobProfileRepository>,
        department_repository: Arc<dyn DepartmentRepository>,
        skill_catalog_repository: Arc<dyn SkillCatalogRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            job_profile_repository,
            department_repository,
            skill_catalog_repository,
            audit_repository,
        }
    }

    /// Lists job profiles.
    pub async fn list_job_profiles(&self, actor: &Actor) -> AppResult<Vec<JobProfile>> {
        self.authorization_service.require(
            actor,
            ResourceKind::JobProfile,
            AccessAction::ReadList,
            None,
        )?;

        self.job_profile_repository.list_job_profiles().await
    }

    /// Creates a job profile after checking its department and skills exist.
    pub async fn create_job_profile(
        &self,
        actor: &Actor,
        input: CreateJobProfileInput,
    ) -> AppResult<JobProfile> {
        self.authorization_service.require(
            actor,
            ResourceKind::JobProfile,
            AccessAction::Create,
            Some(&ResourceTarget::Shared),
        )?;

        let job_profile = JobProfile::new(
            JobProfileId::new(),
            input.title,
            input.department_id,
            input.skills,
        )?;

        if let Some(department_id) = job_profile.department_id() {
            self.department_repository
                .find_department(department_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("department '{department_id}' does not exist"))
                })?;
        }

        for requirement in job_profile.skills() {
            self.skill_catalog_repository
                .find_skill(requirement.skill_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "skill '{}' does not exist",
                        requirement.skill_id
                    ))
                })?;
        }

        self.job_profile_repository
            .create_job_profile(job_profile.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: actor.id(),
                action: AuditAction::JobProfileCreated,
                resource_type: ResourceKind::JobProfile.as_str().to_owned(),
                resource_id: job_profile.id().to_string(),
                detail: Some(format!(
                    "'{}' with {} requirement(s)",
                    job_profile.title().as_str(),
                    job_profile.skills().len()
                )),
            })
            .await?;

        Ok(job_profile)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use skillmatrix_core::{AppError, DepartmentId, Role, SkillId};
    use skillmatrix_domain::{JobProfileSkill, SkillLevel};

    use crate::test_support::{FakeStore, actor_with_role, authorization};

    use super::{CreateJobProfileInput, JobProfileService};

    fn service(store: &Arc<FakeStore>) -> JobProfileService {
        JobProfileService::new(
            authorization(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        )
    }

    #[tokio::test]
    async fn hr_manager_creates_profile_for_existing_skills() {
        let store = Arc::new(FakeStore::default());
        let department = store.seed_department("Engineering").await;
        let skill = store.seed_skill("Rust").await;
        let service = service(&store);

        let created = service
            .create_job_profile(
                &actor_with_role(Role::HrManager, None),
                CreateJobProfileInput {
                    title: "Backend Engineer".to_owned(),
                    department_id: Some(department.id),
                    skills: vec![JobProfileSkill {
                        skill_id: skill.id(),
                        minimum_level: SkillLevel::new(4).unwrap_or(SkillLevel::CEILING),
                    }],
                },
            )
            .await;

        assert!(created.is_ok());
        let listed = service
            .list_job_profiles(&actor_with_role(Role::Employee, None))
            .await
            .unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(store.audit_actions().await, vec!["job_profile.created"]);
    }

    #[tokio::test]
    async fn unknown_skill_is_not_found() {
        let store = Arc::new(FakeStore::default());
        let service = service(&store);

        let result = service
            .create_job_profile(
                &actor_with_role(Role::Admin, None),
                CreateJobProfileInput {
                    title: "Analyst".to_owned(),
                    department_id: None,
                    skills: vec![JobProfileSkill {
                        skill_id: SkillId::new(),
                        minimum_level: SkillLevel::FLOOR,
                    }],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn team_lead_cannot_create_profiles() {
        let store = Arc::new(FakeStore::default());
        let service = service(&store);

        let result = service
            .create_job_profile(
                &actor_with_role(Role::TeamLead, Some(DepartmentId::new())),
                CreateJobProfileInput {
                    title: "Lead".to_owned(),
                    department_id: None,
                    skills: Vec::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(store.audit_actions().await.is_empty());
    }
}
