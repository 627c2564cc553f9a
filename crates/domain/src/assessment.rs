//! Assessment history records and the per-pair skill tracking state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use skillmatrix_core::{AssessmentId, SkillId, UserId};

use crate::skill::{EmployeeSkill, SkillLevel, SkillPriority, default_target_level};

/// Tracking state of one (employee, skill) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillTrackingState {
    /// No employee skill row exists yet.
    Untracked,
    /// A row exists with the given current level.
    Tracked(SkillLevel),
}

impl SkillTrackingState {
    /// Derives the state from the stored row, if any.
    #[must_use]
    pub fn of(skill: Option<&EmployeeSkill>) -> Self {
        skill
            .map(|skill| Self::Tracked(skill.current_level))
            .unwrap_or(Self::Untracked)
    }

    /// Level captured as `previous_level` when an assessment is applied.
    #[must_use]
    pub fn previous_level(&self) -> SkillLevel {
        match self {
            Self::Untracked => SkillLevel::FLOOR,
            Self::Tracked(level) => *level,
        }
    }
}

/// Result of applying one assessment to a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentTransition {
    /// Snapshot of the level before the assessment.
    pub previous_level: SkillLevel,
    /// Employee skill row to persist.
    pub employee_skill: EmployeeSkill,
    /// Whether the row is new.
    pub created_skill: bool,
}

/// Applies a new assessment level to the pair's stored skill row.
///
/// Untracked pairs start at the floor level and get a medium-priority row whose
/// target is at least 3; tracked pairs keep target and priority.
#[must_use]
pub fn apply_assessment(
    existing: Option<EmployeeSkill>,
    employee_id: UserId,
    skill_id: SkillId,
    new_level: SkillLevel,
    assessed_at: DateTime<Utc>,
) -> AssessmentTransition {
    let state = SkillTrackingState::of(existing.as_ref());
    let previous_level = state.previous_level();

    match existing {
        Some(mut skill) => {
            skill.current_level = new_level;
            skill.last_assessed = Some(assessed_at);
            AssessmentTransition {
                previous_level,
                employee_skill: skill,
                created_skill: false,
            }
        }
        None => AssessmentTransition {
            previous_level,
            employee_skill: EmployeeSkill {
                user_id: employee_id,
                skill_id,
                current_level: new_level,
                target_level: default_target_level(new_level),
                priority: SkillPriority::Medium,
                last_assessed: Some(assessed_at),
            },
            created_skill: true,
        },
    }
}

/// Stored columns of an assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentParts {
    /// Identifier.
    pub id: AssessmentId,
    /// Assessed employee.
    pub employee_id: UserId,
    /// Recording assessor.
    pub assessor_id: UserId,
    /// Assessed skill.
    pub skill_id: SkillId,
    /// Level before the assessment.
    pub previous_level: SkillLevel,
    /// Assessed level.
    pub new_level: SkillLevel,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Supporting evidence.
    pub evidence: Option<String>,
    /// Planned follow-up date.
    pub next_review_date: Option<NaiveDate>,
    /// Time the assessment was taken.
    pub assessment_date: DateTime<Utc>,
}

/// Historical skill evaluation.
///
/// `previous_level` is fixed at creation; only the fields in
/// [`AssessmentAmendment`] can change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    id: AssessmentId,
    employee_id: UserId,
    assessor_id: UserId,
    skill_id: SkillId,
    previous_level: SkillLevel,
    new_level: SkillLevel,
    notes: Option<String>,
    evidence: Option<String>,
    next_review_date: Option<NaiveDate>,
    assessment_date: DateTime<Utc>,
}

/// Correction applied to an existing assessment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssessmentAmendment {
    /// Corrected level.
    pub new_level: Option<SkillLevel>,
    /// Replacement notes.
    pub notes: Option<String>,
    /// Replacement evidence.
    pub evidence: Option<String>,
    /// Replacement review date.
    pub next_review_date: Option<NaiveDate>,
}

impl AssessmentAmendment {
    /// Returns whether the amendment carries no change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_level.is_none()
            && self.notes.is_none()
            && self.evidence.is_none()
            && self.next_review_date.is_none()
    }
}

impl Assessment {
    /// Rebuilds an assessment from stored columns.
    #[must_use]
    pub fn from_parts(parts: AssessmentParts) -> Self {
        Self {
            id: parts.id,
            employee_id: parts.employee_id,
            assessor_id: parts.assessor_id,
            skill_id: parts.skill_id,
            previous_level: parts.previous_level,
            new_level: parts.new_level,
            notes: normalize_text(parts.notes),
            evidence: normalize_text(parts.evidence),
            next_review_date: parts.next_review_date,
            assessment_date: parts.assessment_date,
        }
    }

    /// Applies a correction. `previous_level` is left untouched.
    pub fn amend(&mut self, amendment: &AssessmentAmendment) {
        if let Some(level) = amendment.new_level {
            self.new_level = level;
        }
        if let Some(notes) = &amendment.notes {
            self.notes = normalize_text(Some(notes.clone()));
        }
        if let Some(evidence) = &amendment.evidence {
            self.evidence = normalize_text(Some(evidence.clone()));
        }
        if let Some(date) = amendment.next_review_date {
            self.next_review_date = Some(date);
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> AssessmentId {
        self.id
    }

    /// Returns the assessed employee.
    #[must_use]
    pub fn employee_id(&self) -> UserId {
        self.employee_id
    }

    /// Returns the recording assessor.
    #[must_use]
    pub fn assessor_id(&self) -> UserId {
        self.assessor_id
    }

    /// Returns the assessed skill.
    #[must_use]
    pub fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    /// Returns the level captured before this assessment.
    #[must_use]
    pub fn previous_level(&self) -> SkillLevel {
        self.previous_level
    }

    /// Returns the assessed level.
    #[must_use]
    pub fn new_level(&self) -> SkillLevel {
        self.new_level
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the evidence.
    #[must_use]
    pub fn evidence(&self) -> Option<&str> {
        self.evidence.as_deref()
    }

    /// Returns the planned review date.
    #[must_use]
    pub fn next_review_date(&self) -> Option<NaiveDate> {
        self.next_review_date
    }

    /// Returns when the assessment was taken.
    #[must_use]
    pub fn assessment_date(&self) -> DateTime<Utc> {
        self.assessment_date
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
