use sqlx::{Postgres, Transaction};
use tracing::warn;

use skillmatrix_application::AuditEvent;

use super::*;
use crate::postgres_audit_repository::insert_audit_event;
use crate::rows::level_column;

/// Transaction over one (employee, skill) pair holding its advisory lock.
///
/// Dropping the unit without committing rolls the transaction back.
pub struct PostgresAssessmentUnitOfWork {
    transaction: Transaction<'static, Postgres>,
    user_id: UserId,
    skill_id: SkillId,
}

impl PostgresAssessmentUnitOfWork {
    pub(super) fn new(
        transaction: Transaction<'static, Postgres>,
        user_id: UserId,
        skill_id: SkillId,
    ) -> Self {
        Self {
            transaction,
            user_id,
            skill_id,
        }
    }
}

#[async_trait]
impl AssessmentUnitOfWork for PostgresAssessmentUnitOfWork {
    async fn employee_skill(&mut self) -> AppResult<Option<EmployeeSkill>> {
        let row = sqlx::query_as::<_, EmployeeSkillRow>(&format!(
            r#"
            SELECT {EMPLOYEE_SKILL_COLUMNS}
            FROM employee_skills
            WHERE user_id = $1 AND skill_id = $2
            FOR UPDATE
            "#
        ))
        .bind(self.user_id.as_uuid())
        .bind(self.skill_id.as_uuid())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load employee skill: {error}")))?;

        row.map(EmployeeSkill::try_from).transpose()
    }

    async fn assessment(&mut self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>> {
        let row = sqlx::query_as::<_, AssessmentRow>(&format!(
            r#"
            SELECT {ASSESSMENT_COLUMNS}
            FROM assessments
            WHERE id = $1 AND employee_id = $2 AND skill_id = $3
            FOR UPDATE
            "#
        ))
        .bind(assessment_id.as_uuid())
        .bind(self.user_id.as_uuid())
        .bind(self.skill_id.as_uuid())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load assessment: {error}")))?;

        row.map(Assessment::try_from).transpose()
    }

    async fn insert_assessment(&mut self, assessment: &Assessment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO assessments (
                id,
                employee_id,
                assessor_id,
                skill_id,
                previous_level,
                new_level,
                notes,
                evidence,
                next_review_date,
                assessment_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(assessment.id().as_uuid())
        .bind(assessment.employee_id().as_uuid())
        .bind(assessment.assessor_id().as_uuid())
        .bind(assessment.skill_id().as_uuid())
        .bind(level_column(assessment.previous_level()))
        .bind(level_column(assessment.new_level()))
        .bind(assessment.notes())
        .bind(assessment.evidence())
        .bind(assessment.next_review_date())
        .bind(assessment.assessment_date())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert assessment: {error}")))?;

        Ok(())
    }

    async fn update_assessment(&mut self, assessment: &Assessment) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE assessments
            SET new_level = $2,
                notes = $3,
                evidence = $4,
                next_review_date = $5
            WHERE id = $1
            "#,
        )
        .bind(assessment.id().as_uuid())
        .bind(level_column(assessment.new_level()))
        .bind(assessment.notes())
        .bind(assessment.evidence())
        .bind(assessment.next_review_date())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update assessment: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "assessment '{}' does not exist",
                assessment.id()
            )));
        }

        Ok(())
    }

    async fn delete_assessment(&mut self, assessment_id: AssessmentId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM assessments
            WHERE id = $1 AND employee_id = $2 AND skill_id = $3
            "#,
        )
        .bind(assessment_id.as_uuid())
        .bind(self.user_id.as_uuid())
        .bind(self.skill_id.as_uuid())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete assessment: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "assessment '{assessment_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn save_employee_skill(&mut self, skill: &EmployeeSkill) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employee_skills (
                user_id,
                skill_id,
                current_level,
                target_level,
                priority,
                last_assessed
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, skill_id) DO UPDATE
            SET current_level = EXCLUDED.current_level,
                target_level = EXCLUDED.target_level,
                priority = EXCLUDED.priority,
                last_assessed = EXCLUDED.last_assessed,
                updated_at = now()
            "#,
        )
        .bind(skill.user_id.as_uuid())
        .bind(skill.skill_id.as_uuid())
        .bind(level_column(skill.current_level))
        .bind(level_column(skill.target_level))
        .bind(skill.priority.as_str())
        .bind(skill.last_assessed)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save employee skill: {error}"))
        })?;

        Ok(())
    }

    async fn append_audit_event(&mut self, event: AuditEvent) -> AppResult<()> {
        insert_audit_event(&mut *self.transaction, event).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let (user_id, skill_id) = (self.user_id, self.skill_id);
        self.transaction.commit().await.map_err(|error| {
            warn!(%user_id, %skill_id, %error, "employee skill unit rolled back");
            AppError::InconsistentWrite(format!(
                "failed to commit employee skill '{user_id}:{skill_id}': {error}"
            ))
        })
    }
}
