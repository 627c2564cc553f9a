use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skillmatrix_application::{AssessmentListQuery, RecordAssessmentInput};
use skillmatrix_core::{AppResult, SkillId, UserId};
use skillmatrix_domain::{Assessment, AssessmentAmendment, SkillLevel};

use super::parse_id;

/// Incoming payload for recording an assessment.
///
/// The assessor is always the authenticated actor.
#[derive(Debug, Deserialize)]
pub struct RecordAssessmentRequest {
    pub employee_id: String,
    pub skill_id: String,
    pub new_level: u8,
    pub notes: Option<String>,
    pub evidence: Option<String>,
    pub next_review_date: Option<NaiveDate>,
}

impl RecordAssessmentRequest {
    pub fn into_input(self) -> AppResult<RecordAssessmentInput> {
        Ok(RecordAssessmentInput {
            employee_id: parse_id::<UserId>(&self.employee_id)?,
            skill_id: parse_id::<SkillId>(&self.skill_id)?,
            new_level: SkillLevel::new(self.new_level)?,
            notes: self.notes,
            evidence: self.evidence,
            next_review_date: self.next_review_date,
        })
    }
}

/// Incoming payload for amending an assessment.
#[derive(Debug, Default, Deserialize)]
pub struct AmendAssessmentRequest {
    pub new_level: Option<u8>,
    pub notes: Option<String>,
    pub evidence: Option<String>,
    pub next_review_date: Option<NaiveDate>,
}

impl AmendAssessmentRequest {
    pub fn into_amendment(self) -> AppResult<AssessmentAmendment> {
        Ok(AssessmentAmendment {
            new_level: self.new_level.map(SkillLevel::new).transpose()?,
            notes: self.notes,
            evidence: self.evidence,
            next_review_date: self.next_review_date,
        })
    }
}

/// Query string for assessment listings.
#[derive(Debug, Default, Deserialize)]
pub struct AssessmentListParams {
    pub employee_id: Option<String>,
    pub skill_id: Option<String>,
}

impl AssessmentListParams {
    pub fn into_query(self) -> AppResult<AssessmentListQuery> {
        Ok(AssessmentListQuery {
            employee_id: self
                .employee_id
                .as_deref()
                .map(parse_id::<UserId>)
                .transpose()?,
            skill_id: self
                .skill_id
                .as_deref()
                .map(parse_id::<SkillId>)
                .transpose()?,
        })
    }
}

/// API representation of an assessment.
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub assessment_id: String,
    pub employee_id: String,
    pub assessor_id: String,
    pub skill_id: String,
    pub previous_level: u8,
    pub new_level: u8,
    pub notes: Option<String>,
    pub evidence: Option<String>,
    pub next_review_date: Option<NaiveDate>,
    pub assessment_date: String,
}

impl From<Assessment> for AssessmentResponse {
    fn from(assessment: Assessment) -> Self {
        Self {
            assessment_id: assessment.id().to_string(),
            employee_id: assessment.employee_id().to_string(),
            assessor_id: assessment.assessor_id().to_string(),
            skill_id: assessment.skill_id().to_string(),
            previous_level: assessment.previous_level().value(),
            new_level: assessment.new_level().value(),
            notes: assessment.notes().map(ToOwned::to_owned),
            evidence: assessment.evidence().map(ToOwned::to_owned),
            next_review_date: assessment.next_review_date(),
            assessment_date: assessment.assessment_date().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use skillmatrix_core::{AppError, SkillId, UserId};

    use super::{AmendAssessmentRequest, RecordAssessmentRequest};

    #[test]
    fn record_request_parses_body_from_json() {
        let employee_id = UserId::new();
        let skill_id = SkillId::new();
        let body = serde_json::json!({
            "employee_id": employee_id.to_string(),
            "skill_id": skill_id.to_string(),
            "new_level": 4,
            "next_review_date": "2026-12-01",
        });

        let input = serde_json::from_value::<RecordAssessmentRequest>(body)
            .map_err(|error| AppError::Validation(error.to_string()))
            .and_then(RecordAssessmentRequest::into_input);

        assert!(matches!(
            input,
            Ok(input) if input.employee_id == employee_id
                && input.skill_id == skill_id
                && input.new_level.value() == 4
                && input.next_review_date.is_some()
        ));
    }

    #[test]
    fn empty_amend_request_yields_empty_amendment() {
        let amendment = AmendAssessmentRequest::default().into_amendment();
        assert!(matches!(amendment, Ok(amendment) if amendment.is_empty()));
    }
}
