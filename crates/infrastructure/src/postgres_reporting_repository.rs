use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use skillmatrix_application::ReportingRepository;
use skillmatrix_core::{AppError, AppResult, DepartmentId, UserId};
use skillmatrix_domain::metrics::RECENT_ASSESSMENT_WINDOW_DAYS;
use skillmatrix_domain::{
    ActivitySummary, EmployeePlacement, LearningProgress, PerformanceSnapshot, ScopeFilter,
    SkillGapSnapshot,
};

use crate::postgres_job_profile_repository::load_job_profiles;
use crate::rows::{EMPLOYEE_SKILL_COLUMNS, EmployeeScopeBinds, EmployeeSkillRow, map_rows};

/// PostgreSQL-backed snapshot loader for skill gap and performance reports.
///
/// Each snapshot is read inside one `REPEATABLE READ` transaction.
#[derive(Clone)]
pub struct PostgresReportingRepository {
    pool: PgPool,
}

impl PostgresReportingRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin_snapshot(&self) -> AppResult<Transaction<'static, Postgres>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to open report snapshot: {error}"))
            })?;

        Ok(transaction)
    }
}

#[derive(Debug, FromRow)]
struct PlacementRow {
    id: Uuid,
    department_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct LearningRow {
    course_name: String,
    progress_percent: i16,
    completed_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl ReportingRepository for PostgresReportingRepository {
    async fn skill_gap_snapshot(&self, scope: &ScopeFilter) -> AppResult<SkillGapSnapshot> {
        let binds = EmployeeScopeBinds::from_scope(scope);
        let mut transaction = self.begin_snapshot().await?;

        let placements = sqlx::query_as::<_, PlacementRow>(
            r#"
            SELECT id, department_id
            FROM employees
            WHERE ($1 OR id = $2 OR department_id = $3)
            ORDER BY id
            "#,
        )
        .bind(binds.all)
        .bind(binds.user_id)
        .bind(binds.department_id)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load placements: {error}")))?
        .into_iter()
        .map(|row| EmployeePlacement {
            user_id: UserId::from_uuid(row.id),
            department_id: row.department_id.map(DepartmentId::from_uuid),
        })
        .collect();

        let skill_rows = sqlx::query_as::<_, EmployeeSkillRow>(&format!(
            r#"
            SELECT {EMPLOYEE_SKILL_COLUMNS}
            FROM employee_skills
            WHERE user_id IN (
                SELECT id
                FROM employees
                WHERE ($1 OR id = $2 OR department_id = $3)
            )
            "#
        ))
        .bind(binds.all)
        .bind(binds.user_id)
        .bind(binds.department_id)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load employee skills: {error}")))?;

        let job_profiles = load_job_profiles(&mut transaction).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to close report snapshot: {error}"))
        })?;

        Ok(SkillGapSnapshot {
            placements,
            employee_skills: map_rows(skill_rows)?,
            job_profiles,
        })
    }

    async fn performance_snapshot(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<PerformanceSnapshot> {
        let mut transaction = self.begin_snapshot().await?;

        let skill_rows = sqlx::query_as::<_, EmployeeSkillRow>(&format!(
            r#"
            SELECT {EMPLOYEE_SKILL_COLUMNS}
            FROM employee_skills
            WHERE user_id = $1
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load employee skills: {error}")))?;

        let assessment_dates = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT assessment_date
            FROM assessments
            WHERE employee_id = $1
                AND assessment_date >= $2
                AND assessment_date <= $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(as_of - Duration::days(RECENT_ASSESSMENT_WINDOW_DAYS))
        .bind(as_of)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load assessment dates: {error}"))
        })?;

        let learning_progress = sqlx::query_as::<_, LearningRow>(
            r#"
            SELECT course_name, progress_percent, completed_at
            FROM learning_progress
            WHERE user_id = $1
            ORDER BY course_name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load learning progress: {error}"))
        })?
        .into_iter()
        .map(|row| LearningProgress {
            user_id,
            course_name: row.course_name,
            progress_percent: u8::try_from(row.progress_percent.clamp(0, 100)).unwrap_or(0),
            completed_at: row.completed_at,
        })
        .collect();

        let activity = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT active_days_last_30
            FROM activity_summaries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load activity: {error}")))?
        .map(|active_days| ActivitySummary {
            user_id,
            active_days_last_30: u32::try_from(active_days).unwrap_or(0),
        });

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to close report snapshot: {error}"))
        })?;

        Ok(PerformanceSnapshot {
            user_id,
            employee_skills: map_rows(skill_rows)?,
            assessment_dates,
            learning_progress,
            activity,
            as_of,
        })
    }
}
