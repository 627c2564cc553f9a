//! Skill-gap and performance computations over row snapshots.
//!
//! Every function here is pure: the same snapshot always yields the same output.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use skillmatrix_core::{DepartmentId, SkillId, UserId};

use crate::organization::JobProfile;
use crate::skill::{EmployeeSkill, SkillLevel};

/// Gap size from which a gap is reported as high priority.
pub const HIGH_PRIORITY_GAP: u8 = 2;

/// Window counted as "recent" for assessment activity.
pub const RECENT_ASSESSMENT_WINDOW_DAYS: i64 = 30;

/// Employee to department placement used to pick job profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePlacement {
    /// Employee.
    pub user_id: UserId,
    /// Department, if assigned.
    pub department_id: Option<DepartmentId>,
}

/// Rows needed to compute skill gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillGapSnapshot {
    /// Employee placements.
    pub placements: Vec<EmployeePlacement>,
    /// Employee skill rows.
    pub employee_skills: Vec<EmployeeSkill>,
    /// Job profiles with requirements.
    pub job_profiles: Vec<JobProfile>,
}

/// Where a required level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSource {
    /// A department job profile's minimum level.
    JobProfile,
    /// The employee skill's own target level.
    TargetLevel,
}

/// One skill shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGapEntry {
    /// Employee.
    pub user_id: UserId,
    /// Skill.
    pub skill_id: SkillId,
    /// Current level.
    pub current_level: SkillLevel,
    /// Required level.
    pub required_level: SkillLevel,
    /// `required_level - current_level`, always positive.
    pub gap: u8,
    /// Whether the gap is at least [`HIGH_PRIORITY_GAP`].
    pub high_priority: bool,
    /// Origin of the required level.
    pub source: RequirementSource,
}

/// Computes skill gaps, largest first.
///
/// Equal gaps are ordered by employee and skill identifier.
#[must_use]
pub fn compute_skill_gaps(snapshot: &SkillGapSnapshot) -> Vec<SkillGapEntry> {
    let departments: HashMap<UserId, DepartmentId> = snapshot
        .placements
        .iter()
        .filter_map(|placement| {
            placement
                .department_id
                .map(|department_id| (placement.user_id, department_id))
        })
        .collect();

    let mut gaps: Vec<SkillGapEntry> = snapshot
        .employee_skills
        .iter()
        .filter_map(|skill| {
            let profile_level = departments.get(&skill.user_id).and_then(|department_id| {
                department_minimum_level(&snapshot.job_profiles, *department_id, skill.skill_id)
            });

            let (required_level, source) = match profile_level {
                Some(level) => (level, RequirementSource::JobProfile),
                None => (skill.target_level, RequirementSource::TargetLevel),
            };

            (skill.current_level < required_level).then(|| {
                let gap = required_level.value() - skill.current_level.value();
                SkillGapEntry {
                    user_id: skill.user_id,
                    skill_id: skill.skill_id,
                    current_level: skill.current_level,
                    required_level,
                    gap,
                    high_priority: gap >= HIGH_PRIORITY_GAP,
                    source,
                }
            })
        })
        .collect();

    gaps.sort_by(|left, right| {
        right
            .gap
            .cmp(&left.gap)
            .then_with(|| left.user_id.cmp(&right.user_id))
            .then_with(|| left.skill_id.cmp(&right.skill_id))
    });

    gaps
}

fn department_minimum_level(
    job_profiles: &[JobProfile],
    department_id: DepartmentId,
    skill_id: SkillId,
) -> Option<SkillLevel> {
    job_profiles
        .iter()
        .filter(|profile| profile.department_id() == Some(department_id))
        .filter_map(|profile| profile.minimum_level_for(skill_id))
        .max()
}

/// Gap totals for one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentGapSummary {
    /// Department, `None` for unassigned employees.
    pub department_id: Option<DepartmentId>,
    /// Number of gaps.
    pub gap_count: usize,
    /// Number of high-priority gaps.
    pub high_priority_count: usize,
    /// Number of distinct employees with at least one gap.
    pub employees_with_gaps: usize,
}

/// Groups gap entries by the employees' departments.
#[must_use]
pub fn summarize_gaps_by_department(
    gaps: &[SkillGapEntry],
    placements: &[EmployeePlacement],
) -> Vec<DepartmentGapSummary> {
    let departments: HashMap<UserId, Option<DepartmentId>> = placements
        .iter()
        .map(|placement| (placement.user_id, placement.department_id))
        .collect();

    let mut grouped: BTreeMap<Option<DepartmentId>, (usize, usize, BTreeSet<UserId>)> =
        BTreeMap::new();
    for gap in gaps {
        let department_id = departments.get(&gap.user_id).copied().flatten();
        let entry = grouped.entry(department_id).or_default();
        entry.0 += 1;
        if gap.high_priority {
            entry.1 += 1;
        }
        entry.2.insert(gap.user_id);
    }

    grouped
        .into_iter()
        .map(
            |(department_id, (gap_count, high_priority_count, employees))| DepartmentGapSummary {
                department_id,
                gap_count,
                high_priority_count,
                employees_with_gaps: employees.len(),
            },
        )
        .collect()
}

/// Learning course progress for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProgress {
    /// Employee.
    pub user_id: UserId,
    /// Course name.
    pub course_name: String,
    /// Completion percentage, clamped to 100.
    pub progress_percent: u8,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Platform activity counts for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Employee.
    pub user_id: UserId,
    /// Days with activity in the last 30 days.
    pub active_days_last_30: u32,
}

/// Rows needed to score one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceSnapshot {
    /// Employee.
    pub user_id: UserId,
    /// The employee's skill rows.
    pub employee_skills: Vec<EmployeeSkill>,
    /// Dates of the employee's assessments.
    pub assessment_dates: Vec<DateTime<Utc>>,
    /// The employee's learning progress.
    pub learning_progress: Vec<LearningProgress>,
    /// The employee's activity summary.
    pub activity: Option<ActivitySummary>,
    /// Reference time for the recent window.
    pub as_of: DateTime<Utc>,
}

/// Performance band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceStatus {
    /// Overall score of 85 or more.
    ExceedsExpectations,
    /// Overall score between 60 and 84.
    OnTrack,
    /// Overall score below 60.
    NeedsImprovement,
}

impl PerformanceStatus {
    /// Bands an overall score.
    #[must_use]
    pub fn from_score(overall_score: u32) -> Self {
        if overall_score >= 85 {
            Self::ExceedsExpectations
        } else if overall_score < 60 {
            Self::NeedsImprovement
        } else {
            Self::OnTrack
        }
    }
}

/// Composite performance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Employee.
    pub user_id: UserId,
    /// Average current level, `None` without skills.
    pub average_skill_level: Option<f64>,
    /// Assessments inside the recent window.
    pub recent_assessment_count: usize,
    /// `min(100, average × 20)`.
    pub skills_score: Option<f64>,
    /// `min(100, recent × 25)`.
    pub assessment_score: f64,
    /// Mean learning progress.
    pub learning_score: Option<f64>,
    /// `min(100, active days × 5)`.
    pub system_usage_score: Option<f64>,
    /// Rounded mean of the assessment score and the other applicable sub-scores.
    pub overall_score: u32,
    /// Band of the overall score.
    pub status: PerformanceStatus,
}

/// Computes the composite performance score.
#[must_use]
pub fn compute_performance(snapshot: &PerformanceSnapshot) -> ScoreReport {
    let average_skill_level = average_level(&snapshot.employee_skills);
    let skills_score = average_skill_level.map(|average| (average * 20.0).min(100.0));

    let cutoff = snapshot.as_of - Duration::days(RECENT_ASSESSMENT_WINDOW_DAYS);
    let recent_assessment_count = snapshot
        .assessment_dates
        .iter()
        .filter(|date| **date >= cutoff && **date <= snapshot.as_of)
        .count();
    let assessment_score = (recent_assessment_count as f64 * 25.0).min(100.0);

    let learning_score = learning_score(&snapshot.learning_progress);
    let system_usage_score = snapshot.activity.map(|activity| system_usage_score(&activity));

    // The assessment score always takes part in the mean.
    let (total, applicable) = [skills_score, learning_score, system_usage_score]
        .into_iter()
        .flatten()
        .fold((assessment_score, 1.0), |(total, count), score| {
            (total + score, count + 1.0)
        });
    let overall_score = (total / applicable).round() as u32;

    ScoreReport {
        user_id: snapshot.user_id,
        average_skill_level,
        recent_assessment_count,
        skills_score,
        assessment_score,
        learning_score,
        system_usage_score,
        overall_score,
        status: PerformanceStatus::from_score(overall_score),
    }
}

fn average_level(skills: &[EmployeeSkill]) -> Option<f64> {
    if skills.is_empty() {
        return None;
    }

    let total: u32 = skills
        .iter()
        .map(|skill| u32::from(skill.current_level.value()))
        .sum();
    Some(f64::from(total) / skills.len() as f64)
}

/// Unrounded mean course progress, `None` when there are no learning records.
#[must_use]
pub fn learning_score(progress: &[LearningProgress]) -> Option<f64> {
    if progress.is_empty() {
        return None;
    }

    let total: u32 = progress
        .iter()
        .map(|entry| u32::from(entry.progress_percent.min(100)))
        .sum();
    Some(f64::from(total) / progress.len() as f64)
}

/// Usage score from active days, capped at 100.
#[must_use]
pub fn system_usage_score(activity: &ActivitySummary) -> f64 {
    (f64::from(activity.active_days_last_30) * 5.0).min(100.0)
}
