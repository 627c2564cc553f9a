use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use skillmatrix_application::JobProfileRepository;
use skillmatrix_core::{AppError, AppResult, DepartmentId, JobProfileId, SkillId};
use skillmatrix_domain::{JobProfile, JobProfileSkill, SkillLevel};

use crate::rows::level_column;

/// PostgreSQL-backed repository for job profiles and their requirements.
#[derive(Clone)]
pub struct PostgresJobProfileRepository {
    pool: PgPool,
}

impl PostgresJobProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct JobProfileRow {
    profile_id: Uuid,
    title: String,
    department_id: Option<Uuid>,
    skill_id: Option<Uuid>,
    minimum_level: Option<i16>,
}

pub(crate) const JOB_PROFILE_QUERY: &str = r#"
    SELECT
        profiles.id AS profile_id,
        profiles.title,
        profiles.department_id,
        requirements.skill_id,
        requirements.minimum_level
    FROM job_profiles AS profiles
    LEFT JOIN job_profile_skills AS requirements
        ON requirements.job_profile_id = profiles.id
    ORDER BY profiles.title, profiles.id, requirements.skill_id
"#;

/// Folds joined profile/requirement rows into profiles, keeping row order.
pub(crate) fn aggregate_job_profiles(rows: Vec<JobProfileRow>) -> AppResult<Vec<JobProfile>> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut grouped: BTreeMap<Uuid, (String, Option<Uuid>, Vec<JobProfileSkill>)> =
        BTreeMap::new();

    for row in rows {
        let entry = grouped.entry(row.profile_id).or_insert_with(|| {
            order.push(row.profile_id);
            (row.title, row.department_id, Vec::new())
        });

        if let (Some(skill_id), Some(minimum_level)) = (row.skill_id, row.minimum_level) {
            entry.2.push(JobProfileSkill {
                skill_id: SkillId::from_uuid(skill_id),
                minimum_level: SkillLevel::from_storage(minimum_level)?,
            });
        }
    }

    order
        .into_iter()
        .filter_map(|profile_id| grouped.remove(&profile_id).map(|group| (profile_id, group)))
        .map(|(profile_id, (title, department_id, skills))| {
            JobProfile::new(
                JobProfileId::from_uuid(profile_id),
                title,
                department_id.map(DepartmentId::from_uuid),
                skills,
            )
            .map_err(|error| AppError::Internal(format!("stored job profile is invalid: {error}")))
        })
        .collect()
}

/// Loads every job profile inside an open transaction.
pub(crate) async fn load_job_profiles(
    transaction: &mut Transaction<'_, Postgres>,
) -> AppResult<Vec<JobProfile>> {
    let rows = sqlx::query_as::<_, JobProfileRow>(JOB_PROFILE_QUERY)
        .fetch_all(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list job profiles: {error}")))?;

    aggregate_job_profiles(rows)
}

#[async_trait]
impl JobProfileRepository for PostgresJobProfileRepository {
    async fn list_job_profiles(&self) -> AppResult<Vec<JobProfile>> {
        let rows = sqlx::query_as::<_, JobProfileRow>(JOB_PROFILE_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list job profiles: {error}"))
            })?;

        aggregate_job_profiles(rows)
    }

    async fn create_job_profile(&self, job_profile: JobProfile) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO job_profiles (id, title, department_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(job_profile.id().as_uuid())
        .bind(job_profile.title().as_str())
        .bind(job_profile.department_id().map(|id| id.as_uuid()))
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create job profile: {error}")))?;

        for requirement in job_profile.skills() {
            sqlx::query(
                r#"
                INSERT INTO job_profile_skills (job_profile_id, skill_id, minimum_level)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(job_profile.id().as_uuid())
            .bind(requirement.skill_id.as_uuid())
            .bind(level_column(requirement.minimum_level))
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist job profile skills: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
