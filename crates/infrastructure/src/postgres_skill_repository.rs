use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use skillmatrix_application::{
    AssessmentListQuery, AssessmentRepository, AssessmentUnitOfWork, EmployeeSkillRepository,
    SkillCatalogRepository,
};
use skillmatrix_core::{AppError, AppResult, AssessmentId, SkillId, UserId};
use skillmatrix_domain::{Assessment, EmployeeSkill, ScopeFilter, SkillDefinition};

use crate::rows::{
    ASSESSMENT_COLUMNS, AssessmentRow, AssessmentScopeBinds, EMPLOYEE_SKILL_COLUMNS,
    EmployeeSkillRow, SkillRow, map_rows, map_unique_violation,
};

mod unit_of_work;


pub use unit_of_work::PostgresAssessmentUnitOfWork;

/// PostgreSQL-backed repository for the skill catalog, employee skills and assessments.
#[derive(Clone)]
pub struct PostgresSkillRepository {
    pool: PgPool,
}

impl PostgresSkillRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SkillCatalogRepository for PostgresSkillRepository {
    async fn list_skills(&self) -> AppResult<Vec<SkillDefinition>> {
        let rows = sqlx::query_as::<_, SkillRow>(
            r#"
            SELECT id, name, category, description
            FROM skills
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list skills: {error}")))?;

        map_rows(rows)
    }

    async fn find_skill(&self, skill_id: SkillId) -> AppResult<Option<SkillDefinition>> {
        let row = sqlx::query_as::<_, SkillRow>(
            r#"
            SELECT id, name, category, description
            FROM skills
            WHERE id = $1
            "#,
        )
        .bind(skill_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find skill: {error}")))?;

        row.map(SkillDefinition::try_from).transpose()
    }

    async fn create_skill(&self, skill: SkillDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO skills (id, name, category, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(skill.id().as_uuid())
        .bind(skill.name().as_str())
        .bind(skill.category().as_str())
        .bind(skill.description())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                || format!("skill '{}' already exists", skill.name().as_str()),
                "create skill",
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl EmployeeSkillRepository for PostgresSkillRepository {
    async fn list_employee_skills(&self, user_id: UserId) -> AppResult<Vec<EmployeeSkill>> {
        let rows = sqlx::query_as::<_, EmployeeSkillRow>(&format!(
            r#"
            SELECT {EMPLOYEE_SKILL_COLUMNS}
            FROM employee_skills
            WHERE user_id = $1
            ORDER BY skill_id
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list employee skills: {error}"))
        })?;

        map_rows(rows)
    }

    async fn begin_pair(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> AppResult<Box<dyn AssessmentUnitOfWork>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        // Serializes units on the pair even while no skill row exists yet.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("employee_skill:{user_id}:{skill_id}"))
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock employee skill pair: {error}"))
            })?;

        debug!(%user_id, %skill_id, "employee skill pair locked");
        Ok(Box::new(PostgresAssessmentUnitOfWork::new(
            transaction,
            user_id,
            skill_id,
        )))
    }
}

#[async_trait]
impl AssessmentRepository for PostgresSkillRepository {
    async fn find_assessment(&self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            r#"
            SELECT {ASSESSMENT_COLUMNS}
            FROM assessments
            WHERE id = $1
            "#
        ))
        .bind(assessment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find assessment: {error}")))?;

        row.map(Assessment::try_from).transpose()
    }

    async fn list_assessments(
        &self,
        scope: &ScopeFilter,
        query: AssessmentListQuery,
    ) -> AppResult<Vec<Assessment>> {
        let binds = AssessmentScopeBinds::from_scope(scope);
        let rows = sqlx::query_as::<_, AssessmentRow>(&format!(
            r#"
            SELECT {ASSESSMENT_COLUMNS}
            FROM assessments
            WHERE ($1 OR employee_id = $2 OR assessor_id = $2)
                AND ($3::UUID IS NULL OR employee_id = $3)
                AND ($4::UUID IS NULL OR skill_id = $4)
            ORDER BY assessment_date DESC, id
            "#
        ))
        .bind(binds.all)
        .bind(binds.participant)
        .bind(query.employee_id.map(|id| id.as_uuid()))
        .bind(query.skill_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list assessments: {error}")))?;

        map_rows(rows)
    }
}
