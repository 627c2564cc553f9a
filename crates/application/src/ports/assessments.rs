use async_trait::async_trait;
use skillmatrix_core::{AppResult, AssessmentId, SkillId, UserId};
use skillmatrix_domain::{Assessment, ScopeFilter};

/// Optional narrowing of an assessment listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssessmentListQuery {
    /// Only assessments of this employee.
    pub employee_id: Option<UserId>,
    /// Only assessments of this skill.
    pub skill_id: Option<SkillId>,
}

/// Repository port for reading assessment history.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Finds one assessment.
    async fn find_assessment(&self, assessment_id: AssessmentId)
    -> AppResult<Option<Assessment>>;

    /// Lists assessments matching the scope and query, newest first.
    async fn list_assessments(
        &self,
        scope: &ScopeFilter,
        query: AssessmentListQuery,
    ) -> AppResult<Vec<Assessment>>;
}
