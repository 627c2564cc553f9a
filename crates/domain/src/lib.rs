//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assessment;
/// Skill-gap and performance metrics.
pub mod metrics;
mod organization;
mod scope;
mod security;
mod skill;

pub use assessment::{
    Assessment, AssessmentAmendment, AssessmentParts, AssessmentTransition, SkillTrackingState,
    apply_assessment,
};
pub use metrics::{
    ActivitySummary, DepartmentGapSummary, EmployeePlacement, LearningProgress,
    PerformanceSnapshot, PerformanceStatus, RequirementSource, ScoreReport, SkillGapEntry,
    SkillGapSnapshot, compute_performance, compute_skill_gaps, summarize_gaps_by_department,
};
pub use organization::{
    Department, EmailAddress, Employee, JobProfile, JobProfileSkill, PASSWORD_MAX_LENGTH,
    PASSWORD_MIN_LENGTH, validate_password,
};
pub use scope::{AccessAction, ResourceKind, ResourceTarget, ScopeFilter};
pub use security::{AuditAction, Permission, PermissionRegistry, role_grants};
pub use skill::{
    EmployeeSkill, EmployeeSkillEdit, SkillDefinition, SkillLevel, SkillPriority,
    default_target_level,
};
