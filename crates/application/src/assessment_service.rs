//! Assessment recording and the write-through to employee skill levels.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use skillmatrix_core::{Actor, AppError, AppResult, AssessmentId, SkillId, UserId};
use skillmatrix_domain::{
    AccessAction, Assessment, AssessmentAmendment, AssessmentParts, AuditAction, ResourceKind,
    ResourceTarget, SkillLevel, apply_assessment,
};

use crate::{
    AssessmentListQuery, AssessmentRepository, AssessmentUnitOfWork, AuditEvent,
    AuthorizationService, EmployeeRepository, EmployeeSkillRepository, SkillCatalogRepository,
};


/// Input for recording a new assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAssessmentInput {
    /// Assessed employee.
    pub employee_id: UserId,
    /// Assessed skill.
    pub skill_id: SkillId,
    /// Assessed level.
    pub new_level: SkillLevel,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Supporting evidence.
    pub evidence: Option<String>,
    /// Planned follow-up date.
    pub next_review_date: Option<NaiveDate>,
}

/// Application service synchronizing assessments with employee skill rows.
#[derive(Clone)]
pub struct AssessmentService {
    authorization_service: AuthorizationService,
    assessment_repository: Arc<dyn AssessmentRepository>,
    employee_skill_repository: Arc<dyn EmployeeSkillRepository>,
    employee_repository: Arc<dyn EmployeeRepository>,
    skill_catalog_repository: Arc<dyn SkillCatalogRepository>,
}

impl AssessmentService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        assessment_repository: Arc<dyn AssessmentRepository>,
        employee_skill_repository: Arc<dyn EmployeeSkillRepository>,
        employee_repository: Arc<dyn EmployeeRepository>,
        skill_catalog_repository: Arc<dyn SkillCatalogRepository>,
    ) -> Self {
        Self {
            authorization_service,
            assessment_repository,
            employee_skill_repository,
            employee_repository,
            skill_catalog_repository,
        }
    }

    /// Records an assessment by the actor and updates or creates the skill row.
    ///
    /// The assessment insert and the skill write commit together or not at all.
    pub async fn record_assessment(
        &self,
        actor: &Actor,
        input: RecordAssessmentInput,
    ) -> AppResult<Assessment> {
        let target = ResourceTarget::Assessment {
            employee_id: input.employee_id,
            assessor_id: actor.id(),
        };
        self.authorization_service.require(
            actor,
            ResourceKind::Assessment,
            AccessAction::Create,
            Some(&target),
        )?;

        self.employee_repository
            .find_employee(input.employee_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("employee '{}' does not exist", input.employee_id))
            })?;
        self.skill_catalog_repository
            .find_skill(input.skill_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("skill '{}' does not exist", input.skill_id)))?;

        let mut unit = self
            .employee_skill_repository
            .begin_pair(input.employee_id, input.skill_id)
            .await?;

        let assessed_at = Utc::now();
        let existing = unit.employee_skill().await?;
        let transition = apply_assessment(
            existing,
            input.employee_id,
            input.skill_id,
            input.new_level,
            assessed_at,
        );

        let assessment = Assessment::from_parts(AssessmentParts {
            id: AssessmentId::new(),
            employee_id: input.employee_id,
            assessor_id: actor.id(),
            skill_id: input.skill_id,
            previous_level: transition.previous_level,
            new_level: input.new_level,
            notes: input.notes,
            evidence: input.evidence,
            next_review_date: input.next_review_date,
            assessment_date: assessed_at,
        });

        unit.insert_assessment(&assessment).await?;
        unit.save_employee_skill(&transition.employee_skill)
            .await
            .map_err(|error| {
                AppError::InconsistentWrite(format!(
                    "assessment '{}' was not applied because the skill row write failed: {error}",
                    assessment.id()
                ))
            })?;
        unit.append_audit_event(AuditEvent {
            actor_id: actor.id(),
            action: AuditAction::AssessmentRecorded,
            resource_type: ResourceKind::Assessment.as_str().to_owned(),
            resource_id: assessment.id().to_string(),
            detail: Some(format!(
                "employee '{}' skill '{}' level {} -> {}{}",
                assessment.employee_id(),
                assessment.skill_id(),
                assessment.previous_level(),
                assessment.new_level(),
                if transition.created_skill {
                    " (skill now tracked)"
                } else {
                    ""
                }
            )),
        })
        .await?;
        commit_unit(unit, assessment.id()).await?;

        Ok(assessment)
    }

    /// Corrects an assessment's mutable fields.
    ///
    /// A corrected level is written straight to the skill row. History is
    /// frozen: `previous_level` of this and later assessments is never rewritten.
    pub async fn amend_assessment(
        &self,
        actor: &Actor,
        assessment_id: AssessmentId,
        amendment: AssessmentAmendment,
    ) -> AppResult<Assessment> {
        if amendment.is_empty() {
            return Err(AppError::Validation(
                "assessment amendment must change at least one field".to_owned(),
            ));
        }

        let existing = self.find_existing(assessment_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::Assessment,
            AccessAction::Update,
            Some(&assessment_target(&existing)),
        )?;

        let mut unit = self
            .employee_skill_repository
            .begin_pair(existing.employee_id(), existing.skill_id())
            .await?;

        let mut assessment = unit.assessment(assessment_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("assessment '{assessment_id}' does not exist"))
        })?;

        let skill_update = match amendment.new_level {
            Some(level) => {
                let mut skill = unit.employee_skill().await?.ok_or_else(|| {
                    AppError::InvalidTransition(format!(
                        "cannot amend level of assessment '{assessment_id}': employee '{}' no longer tracks skill '{}'",
                        assessment.employee_id(),
                        assessment.skill_id()
                    ))
                })?;
                skill.current_level = level;
                skill.last_assessed = Some(Utc::now());
                Some(skill)
            }
            None => None,
        };

        assessment.amend(&amendment);
        unit.update_assessment(&assessment).await?;
        if let Some(skill) = skill_update {
            unit.save_employee_skill(&skill).await.map_err(|error| {
                AppError::InconsistentWrite(format!(
                    "amendment of assessment '{assessment_id}' was not applied because the skill row write failed: {error}"
                ))
            })?;
        }
        unit.append_audit_event(AuditEvent {
            actor_id: actor.id(),
            action: AuditAction::AssessmentAmended,
            resource_type: ResourceKind::Assessment.as_str().to_owned(),
            resource_id: assessment_id.to_string(),
            detail: amendment
                .new_level
                .map(|level| format!("level corrected to {level}")),
        })
        .await?;
        commit_unit(unit, assessment_id).await?;

        Ok(assessment)
    }

    /// Deletes an assessment. The skill row keeps its current level.
    ///
    /// Runs under the pair lock so it cannot interleave with an amendment.
    pub async fn delete_assessment(
        &self,
        actor: &Actor,
        assessment_id: AssessmentId,
    ) -> AppResult<()> {
        let existing = self.find_existing(assessment_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::Assessment,
            AccessAction::Delete,
            Some(&assessment_target(&existing)),
        )?;

        let mut unit = self
            .employee_skill_repository
            .begin_pair(existing.employee_id(), existing.skill_id())
            .await?;
        unit.delete_assessment(assessment_id).await?;
        unit.append_audit_event(AuditEvent {
            actor_id: actor.id(),
            action: AuditAction::AssessmentDeleted,
            resource_type: ResourceKind::Assessment.as_str().to_owned(),
            resource_id: assessment_id.to_string(),
            detail: None,
        })
        .await?;
        commit_unit(unit, assessment_id).await
    }

    /// Returns one assessment visible to the actor.
    pub async fn get_assessment(
        &self,
        actor: &Actor,
        assessment_id: AssessmentId,
    ) -> AppResult<Assessment> {
        let assessment = self.find_existing(assessment_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::Assessment,
            AccessAction::ReadOne,
            Some(&assessment_target(&assessment)),
        )?;

        Ok(assessment)
    }

    /// Lists assessments visible to the actor.
    pub async fn list_assessments(
        &self,
        actor: &Actor,
        query: AssessmentListQuery,
    ) -> AppResult<Vec<Assessment>> {
        let scope = self.authorization_service.require(
            actor,
            ResourceKind::Assessment,
            AccessAction::ReadList,
            None,
        )?;

        self.assessment_repository
            .list_assessments(&scope, query)
            .await
    }

    async fn find_existing(&self, assessment_id: AssessmentId) -> AppResult<Assessment> {
        self.assessment_repository
            .find_assessment(assessment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("assessment '{assessment_id}' does not exist")))
    }
}

fn assessment_target(assessment: &Assessment) -> ResourceTarget {
    ResourceTarget::Assessment {
        employee_id: assessment.employee_id(),
        assessor_id: assessment.assessor_id(),
    }
}

async fn commit_unit(
    unit: Box<dyn AssessmentUnitOfWork>,
    assessment_id: AssessmentId,
) -> AppResult<()> {
    unit.commit().await.map_err(|error| match error {
        AppError::InconsistentWrite(message) => AppError::InconsistentWrite(message),
        other => AppError::InconsistentWrite(format!(
            "assessment '{assessment_id}' and its skill row were rolled back: {other}"
        )),
    })
}
