use async_trait::async_trait;
use skillmatrix_core::{AppResult, AssessmentId, SkillId, UserId};
use skillmatrix_domain::{Assessment, EmployeeSkill, SkillDefinition};

use super::AuditEvent;

/// Repository port for the skill catalog.
#[async_trait]
pub trait SkillCatalogRepository: Send + Sync {
    /// Lists catalog entries ordered by category and name.
    async fn list_skills(&self) -> AppResult<Vec<SkillDefinition>>;

    /// Finds one catalog entry.
    async fn find_skill(&self, skill_id: SkillId) -> AppResult<Option<SkillDefinition>>;

    /// Inserts a catalog entry. Fails with a conflict on duplicate name.
    async fn create_skill(&self, skill: SkillDefinition) -> AppResult<()>;
}

/// Atomic unit of work over one (employee, skill) pair.
///
/// Holds the pair's exclusive lock from `begin_pair` until commit or drop.
/// Writes become visible only on [`AssessmentUnitOfWork::commit`]; dropping
/// the unit discards them.
#[async_trait]
pub trait AssessmentUnitOfWork: Send {
    /// Reads the pair's employee skill row.
    async fn employee_skill(&mut self) -> AppResult<Option<EmployeeSkill>>;

    /// Reads an assessment of this pair.
    async fn assessment(&mut self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>>;

    /// Stages a new assessment.
    async fn insert_assessment(&mut self, assessment: &Assessment) -> AppResult<()>;

    /// Stages mutable-field changes of an existing assessment.
    async fn update_assessment(&mut self, assessment: &Assessment) -> AppResult<()>;

    /// Stages removal of an assessment of this pair.
    ///
    /// Fails with not-found when the assessment does not belong to the pair.
    async fn delete_assessment(&mut self, assessment_id: AssessmentId) -> AppResult<()>;

    /// Stages an insert or overwrite of the pair's employee skill row.
    async fn save_employee_skill(&mut self, skill: &EmployeeSkill) -> AppResult<()>;

    /// Stages an audit event written in the same commit as the pair's rows.
    async fn append_audit_event(&mut self, event: AuditEvent) -> AppResult<()>;

    /// Applies every staged write as one unit.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Repository port for employee skill rows.
#[async_trait]
pub trait EmployeeSkillRepository: Send + Sync {
    /// Lists one employee's skill rows.
    async fn list_employee_skills(&self, user_id: UserId) -> AppResult<Vec<EmployeeSkill>>;

    /// Opens an exclusive unit of work for one pair.
    async fn begin_pair(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> AppResult<Box<dyn AssessmentUnitOfWork>>;
}
