use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skillmatrix_core::{AppResult, UserId};
use skillmatrix_domain::{PerformanceSnapshot, ScopeFilter, SkillGapSnapshot};

/// Repository port producing consistent row snapshots for the metrics aggregator.
#[async_trait]
pub trait ReportingRepository: Send + Sync {
    /// Loads placements, skill rows and job profiles for employees in scope.
    async fn skill_gap_snapshot(&self, scope: &ScopeFilter) -> AppResult<SkillGapSnapshot>;

    /// Loads one employee's scoring inputs.
    async fn performance_snapshot(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<PerformanceSnapshot>;
}
