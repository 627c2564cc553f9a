use std::sync::Arc;

use skillmatrix_core::{Actor, AppError, AppResult, SkillId, UserId};
use skillmatrix_domain::{
    AccessAction, AuditAction, Employee, EmployeeSkill, EmployeeSkillEdit, ResourceKind,
    ResourceTarget, SkillDefinition,
};

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, EmployeeRepository,
    EmployeeSkillRepository, SkillCatalogRepository,
};


/// Input for creating a skill catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSkillInput {
    /// Unique name.
    pub name: String,
    /// Category, e.g. `engineering`.
    pub category: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Application service for the skill catalog and employee skill rows.
#[derive(Clone)]
pub struct SkillService {
    authorization_service: AuthorizationService,
    skill_catalog_repository: Arc<dyn SkillCatalogRepository>,
    employee_skill_repository: Arc<dyn EmployeeSkillRepository>,
    employee_repository: Arc<dyn EmployeeRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SkillService {
    /// Creates a new skill service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        skill_catalog_repository: Arc<dyn SkillCatalogRepository>,
        employee_skill_repository: Arc<dyn EmployeeSkillRepository>,
        employee_repository: Arc<dyn EmployeeRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            skill_catalog_repository,
            employee_skill_repository,
            employee_repository,
            audit_repository,
        }
    }

    /// Lists the skill catalog.
    pub async fn list_skills(&self, actor: &Actor) -> AppResult<Vec<SkillDefinition>> {
        self.authorization_service.require(
            actor,
            ResourceKind::SkillCatalog,
            AccessAction::ReadList,
            None,
        )?;

        self.skill_catalog_repository.list_skills().await
    }

    /// Adds a skill to the catalog.
    pub async fn create_skill(
        &self,
        actor: &Actor,
        input: CreateSkillInput,
    ) -> AppResult<SkillDefinition> {
        self.authorization_service.require(
            actor,
            ResourceKind::SkillCatalog,
            AccessAction::Create,
            Some(&ResourceTarget::Shared),
        )?;

        let skill = SkillDefinition::new(
            SkillId::new(),
            input.name,
            input.category,
            input.description,
        )?;
        self.skill_catalog_repository
            .create_skill(skill.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: actor.id(),
                action: AuditAction::SkillCreated,
                resource_type: ResourceKind::SkillCatalog.as_str().to_owned(),
                resource_id: skill.id().to_string(),
                detail: Some(skill.name().as_str().to_owned()),
            })
            .await?;

        Ok(skill)
    }

    /// Lists one employee's skill rows.
    pub async fn list_employee_skills(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> AppResult<Vec<EmployeeSkill>> {
        let employee = self.find_employee(user_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::EmployeeSkill,
            AccessAction::ReadOne,
            Some(&employee.as_target()),
        )?;

        self.employee_skill_repository
            .list_employee_skills(user_id)
            .await
    }

    /// Edits an employee skill row directly, creating it when untracked.
    ///
    /// No assessment is recorded. The edit takes the same pair lock as
    /// assessment recording.
    pub async fn update_employee_skill(
        &self,
        actor: &Actor,
        user_id: UserId,
        skill_id: SkillId,
        edit: EmployeeSkillEdit,
    ) -> AppResult<EmployeeSkill> {
        if edit == EmployeeSkillEdit::default() {
            return Err(AppError::Validation(
                "employee skill edit must change at least one field".to_owned(),
            ));
        }

        let employee = self.find_employee(user_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::EmployeeSkill,
            AccessAction::Update,
            Some(&employee.as_target()),
        )?;

        self.skill_catalog_repository
            .find_skill(skill_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("skill '{skill_id}' does not exist")))?;

        let mut unit = self
            .employee_skill_repository
            .begin_pair(user_id, skill_id)
            .await?;
        let current = unit.employee_skill().await?;
        let skill = EmployeeSkill::edited(current, user_id, skill_id, &edit);
        unit.save_employee_skill(&skill).await?;
        unit.append_audit_event(AuditEvent {
            actor_id: actor.id(),
            action: AuditAction::EmployeeSkillUpdated,
            resource_type: ResourceKind::EmployeeSkill.as_str().to_owned(),
            resource_id: format!("{user_id}:{skill_id}"),
            detail: Some(format!(
                "current {} target {} priority {}",
                skill.current_level,
                skill.target_level,
                skill.priority.as_str()
            )),
        })
        .await?;
        unit.commit().await?;

        Ok(skill)
    }

    async fn find_employee(&self, user_id: UserId) -> AppResult<Employee> {
        self.employee_repository
            .find_employee(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("employee '{user_id}' does not exist")))
    }
}
