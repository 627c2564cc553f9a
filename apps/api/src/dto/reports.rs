use serde::{Deserialize, Serialize};
use skillmatrix_application::{AuditLogEntry, OrganizationSummary};
use skillmatrix_domain::{
    DepartmentGapSummary, PerformanceStatus, RequirementSource, ScoreReport, SkillGapEntry,
};

/// Query string for the skill gap report.
#[derive(Debug, Default, Deserialize)]
pub struct SkillGapParams {
    pub employee_id: Option<String>,
}

/// API representation of one skill gap.
#[derive(Debug, Serialize)]
pub struct SkillGapResponse {
    pub user_id: String,
    pub skill_id: String,
    pub current_level: u8,
    pub required_level: u8,
    pub gap: u8,
    pub high_priority: bool,
    pub source: RequirementSource,
}

impl From<SkillGapEntry> for SkillGapResponse {
    fn from(entry: SkillGapEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            skill_id: entry.skill_id.to_string(),
            current_level: entry.current_level.value(),
            required_level: entry.required_level.value(),
            gap: entry.gap,
            high_priority: entry.high_priority,
            source: entry.source,
        }
    }
}

/// API representation of a performance score.
#[derive(Debug, Serialize)]
pub struct ScoreReportResponse {
    pub user_id: String,
    pub average_skill_level: Option<f64>,
    pub recent_assessment_count: usize,
    pub skills_score: Option<f64>,
    pub assessment_score: f64,
    pub learning_score: Option<f64>,
    pub system_usage_score: Option<f64>,
    pub overall_score: u32,
    pub status: PerformanceStatus,
}

impl From<ScoreReport> for ScoreReportResponse {
    fn from(report: ScoreReport) -> Self {
        Self {
            user_id: report.user_id.to_string(),
            average_skill_level: report.average_skill_level,
            recent_assessment_count: report.recent_assessment_count,
            skills_score: report.skills_score,
            assessment_score: report.assessment_score,
            learning_score: report.learning_score,
            system_usage_score: report.system_usage_score,
            overall_score: report.overall_score,
            status: report.status,
        }
    }
}

/// Gap totals for one department.
#[derive(Debug, Serialize)]
pub struct DepartmentGapResponse {
    pub department_id: Option<String>,
    pub gap_count: usize,
    pub high_priority_count: usize,
    pub employees_with_gaps: usize,
}

impl From<DepartmentGapSummary> for DepartmentGapResponse {
    fn from(summary: DepartmentGapSummary) -> Self {
        Self {
            department_id: summary.department_id.map(|id| id.to_string()),
            gap_count: summary.gap_count,
            high_priority_count: summary.high_priority_count,
            employees_with_gaps: summary.employees_with_gaps,
        }
    }
}

/// Organisation dashboard payload.
#[derive(Debug, Serialize)]
pub struct OrganizationSummaryResponse {
    pub employee_count: usize,
    pub gap_count: usize,
    pub high_priority_count: usize,
    pub departments: Vec<DepartmentGapResponse>,
}

impl From<OrganizationSummary> for OrganizationSummaryResponse {
    fn from(summary: OrganizationSummary) -> Self {
        Self {
            employee_count: summary.employee_count,
            gap_count: summary.gap_count,
            high_priority_count: summary.high_priority_count,
            departments: summary
                .departments
                .into_iter()
                .map(DepartmentGapResponse::from)
                .collect(),
        }
    }
}

/// Query string for audit log reads.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub actor_id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            event_id: entry.event_id,
            actor_id: entry.actor_id.to_string(),
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            detail: entry.detail,
            created_at: entry.created_at,
        }
    }
}
