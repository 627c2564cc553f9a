use async_trait::async_trait;
use skillmatrix_core::AppResult;
use skillmatrix_domain::JobProfile;

/// Repository port for job profiles.
#[async_trait]
pub trait JobProfileRepository: Send + Sync {
    /// Lists job profiles with their requirements, ordered by title.
    async fn list_job_profiles(&self) -> AppResult<Vec<JobProfile>>;

    /// Inserts a job profile with its requirements.
    async fn create_job_profile(&self, job_profile: JobProfile) -> AppResult<()>;
}
