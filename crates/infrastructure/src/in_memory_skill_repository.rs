use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use skillmatrix_application::{
    AssessmentListQuery, AssessmentRepository, AssessmentUnitOfWork, AuditEvent, AuditLogEntry,
    AuditLogQuery, AuditLogRepository, AuditRepository, EmployeeSkillRepository,
    SkillCatalogRepository,
};
use skillmatrix_core::{AppError, AppResult, AssessmentId, SkillId, UserId};
use skillmatrix_domain::{Assessment, EmployeeSkill, ResourceTarget, ScopeFilter, SkillDefinition};
use uuid::Uuid;


type PairKey = (UserId, SkillId);
type PairLocks = Arc<Mutex<HashMap<PairKey, Arc<Mutex<()>>>>>;

#[derive(Debug, Default)]
struct SkillTables {
    employee_skills: HashMap<PairKey, EmployeeSkill>,
    assessments: HashMap<AssessmentId, Assessment>,
    audit_events: Vec<StoredAuditEvent>,
}

/// In-memory skill catalog, assessment store and audit trail.
///
/// Units of work on the same (employee, skill) pair are serialized by a
/// per-pair mutex; writes are staged and applied together on commit.
/// A pair's mutex is dropped from the lock table once nobody holds or awaits it.
#[derive(Debug, Default)]
pub struct InMemorySkillRepository {
    catalog: RwLock<HashMap<SkillId, SkillDefinition>>,
    tables: Arc<RwLock<SkillTables>>,
    pair_locks: PairLocks,
}

impl InMemorySkillRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the audit events committed so far, oldest first.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.tables
            .read()
            .await
            .audit_events
            .iter()
            .map(|stored| stored.event.clone())
            .collect()
    }

    async fn lease_pair(&self, key: PairKey) -> PairLease {
        let mut locks = self.pair_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let lock = locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        drop(locks);

        PairLease {
            key,
            locks: self.pair_locks.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }
}

/// Exclusive hold on one pair's mutex.
struct PairLease {
    key: PairKey,
    locks: PairLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PairLease {
    fn drop(&mut self) {
        let guard = self.guard.take();
        // A busy lock table leaves the entry for the next lease to prune.
        let Ok(mut locks) = self.locks.try_lock() else {
            return;
        };
        drop(guard);

        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

#[async_trait]
impl SkillCatalogRepository for InMemorySkillRepository {
    async fn list_skills(&self) -> AppResult<Vec<SkillDefinition>> {
        let mut skills: Vec<SkillDefinition> = self.catalog.read().await.values().cloned().collect();
        skills.sort_by(|left, right| {
            (left.category().as_str(), left.name().as_str())
                .cmp(&(right.category().as_str(), right.name().as_str()))
        });
        Ok(skills)
    }

    async fn find_skill(&self, skill_id: SkillId) -> AppResult<Option<SkillDefinition>> {
        Ok(self.catalog.read().await.get(&skill_id).cloned())
    }

    async fn create_skill(&self, skill: SkillDefinition) -> AppResult<()> {
        let mut catalog = self.catalog.write().await;

        if catalog
            .values()
            .any(|existing| existing.name().as_str() == skill.name().as_str())
        {
            return Err(AppError::Conflict(format!(
                "skill '{}' already exists",
                skill.name().as_str()
            )));
        }

        catalog.insert(skill.id(), skill);
        Ok(())
    }
}

#[async_trait]
impl EmployeeSkillRepository for InMemorySkillRepository {
    async fn list_employee_skills(&self, user_id: UserId) -> AppResult<Vec<EmployeeSkill>> {
        let mut skills: Vec<EmployeeSkill> = self
            .tables
            .read()
            .await
            .employee_skills
            .values()
            .filter(|skill| skill.user_id == user_id)
            .cloned()
            .collect();
        skills.sort_by_key(|skill| skill.skill_id);
        Ok(skills)
    }

    async fn begin_pair(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> AppResult<Box<dyn AssessmentUnitOfWork>> {
        let lease = self.lease_pair((user_id, skill_id)).await;

        Ok(Box::new(InMemoryAssessmentUnitOfWork {
            _lease: lease,
            tables: self.tables.clone(),
            key: (user_id, skill_id),
            staged_writes: Vec::new(),
            staged_skill: None,
            staged_audit_events: Vec::new(),
        }))
    }
}

#[async_trait]
impl AssessmentRepository for InMemorySkillRepository {
    async fn find_assessment(&self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>> {
        Ok(self
            .tables
            .read()
            .await
            .assessments
            .get(&assessment_id)
            .cloned())
    }

    async fn list_assessments(
        &self,
        scope: &ScopeFilter,
        query: AssessmentListQuery,
    ) -> AppResult<Vec<Assessment>> {
        let tables = self.tables.read().await;
        let mut assessments: Vec<Assessment> = tables
            .assessments
            .values()
            .filter(|assessment| {
                scope.matches(&ResourceTarget::Assessment {
                    employee_id: assessment.employee_id(),
                    assessor_id: assessment.assessor_id(),
                })
            })
            .filter(|assessment| {
                query
                    .employee_id
                    .is_none_or(|employee_id| assessment.employee_id() == employee_id)
                    && query
                        .skill_id
                        .is_none_or(|skill_id| assessment.skill_id() == skill_id)
            })
            .cloned()
            .collect();

        assessments.sort_by(|left, right| {
            right
                .assessment_date()
                .cmp(&left.assessment_date())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(assessments)
    }
}

#[async_trait]
impl AuditRepository for InMemorySkillRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.tables.write().await.audit_events.push(StoredAuditEvent::new(event));
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemorySkillRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let tables = self.tables.read().await;

        Ok(tables
            .audit_events
            .iter()
            .rev()
            .filter(|stored| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| stored.event.action.as_str() == action)
            })
            .skip(query.offset)
            .take(query.limit)
            .map(StoredAuditEvent::to_entry)
            .collect())
    }
}

#[derive(Debug, Clone)]
struct StoredAuditEvent {
    id: Uuid,
    event: AuditEvent,
    created_at: DateTime<Utc>,
}

impl StoredAuditEvent {
    fn new(event: AuditEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            created_at: Utc::now(),
        }
    }

    fn to_entry(&self) -> AuditLogEntry {
        AuditLogEntry {
            event_id: self.id.to_string(),
            actor_id: self.event.actor_id,
            action: self.event.action.as_str().to_owned(),
            resource_type: self.event.resource_type.clone(),
            resource_id: self.event.resource_id.clone(),
            detail: self.event.detail.clone(),
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Debug, Clone)]
enum StagedWrite {
    Insert(Assessment),
    Update(Assessment),
    Delete(AssessmentId),
}

/// Staged writes for one pair, holding the pair's mutex until dropped.
struct InMemoryAssessmentUnitOfWork {
    _lease: PairLease,
    tables: Arc<RwLock<SkillTables>>,
    key: PairKey,
    staged_writes: Vec<StagedWrite>,
    staged_skill: Option<EmployeeSkill>,
    staged_audit_events: Vec<AuditEvent>,
}

#[async_trait]
impl AssessmentUnitOfWork for InMemoryAssessmentUnitOfWork {
    async fn employee_skill(&mut self) -> AppResult<Option<EmployeeSkill>> {
        if let Some(skill) = &self.staged_skill {
            return Ok(Some(skill.clone()));
        }

        Ok(self
            .tables
            .read()
            .await
            .employee_skills
            .get(&self.key)
            .cloned())
    }

    async fn assessment(&mut self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>> {
        let staged = self.staged_writes.iter().rev().find_map(|write| match write {
            StagedWrite::Insert(assessment) | StagedWrite::Update(assessment)
                if assessment.id() == assessment_id =>
            {
                Some(Some(assessment.clone()))
            }
            StagedWrite::Delete(id) if *id == assessment_id => Some(None),
            _ => None,
        });
        if let Some(staged) = staged {
            return Ok(staged);
        }

        Ok(self
            .tables
            .read()
            .await
            .assessments
            .get(&assessment_id)
            .filter(|assessment| {
                (assessment.employee_id(), assessment.skill_id()) == self.key
            })
            .cloned())
    }

    async fn insert_assessment(&mut self, assessment: &Assessment) -> AppResult<()> {
        let exists = self
            .tables
            .read()
            .await
            .assessments
            .contains_key(&assessment.id());
        if exists {
            return Err(AppError::Conflict(format!(
                "assessment '{}' already exists",
                assessment.id()
            )));
        }

        self.staged_writes
            .push(StagedWrite::Insert(assessment.clone()));
        Ok(())
    }

    async fn update_assessment(&mut self, assessment: &Assessment) -> AppResult<()> {
        if self.assessment(assessment.id()).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "assessment '{}' does not exist",
                assessment.id()
            )));
        }

        self.staged_writes
            .push(StagedWrite::Update(assessment.clone()));
        Ok(())
    }

    async fn delete_assessment(&mut self, assessment_id: AssessmentId) -> AppResult<()> {
        if self.assessment(assessment_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "assessment '{assessment_id}' does not exist"
            )));
        }

        self.staged_writes.push(StagedWrite::Delete(assessment_id));
        Ok(())
    }

    async fn save_employee_skill(&mut self, skill: &EmployeeSkill) -> AppResult<()> {
        if (skill.user_id, skill.skill_id) != self.key {
            return Err(AppError::Internal(format!(
                "employee skill '{}:{}' is outside the locked pair",
                skill.user_id, skill.skill_id
            )));
        }

        self.staged_skill = Some(skill.clone());
        Ok(())
    }

    async fn append_audit_event(&mut self, event: AuditEvent) -> AppResult<()> {
        self.staged_audit_events.push(event);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        for write in self.staged_writes.drain(..) {
            match write {
                StagedWrite::Insert(assessment) => {
                    tables.assessments.insert(assessment.id(), assessment);
                }
                StagedWrite::Update(assessment) => {
                    // Rows removed outside this unit stay removed.
                    if let Some(row) = tables.assessments.get_mut(&assessment.id()) {
                        *row = assessment;
                    }
                }
                StagedWrite::Delete(assessment_id) => {
                    tables.assessments.remove(&assessment_id);
                }
            }
        }
        if let Some(skill) = self.staged_skill.take() {
            tables.employee_skills.insert(self.key, skill);
        }
        tables.audit_events.extend(
            self.staged_audit_events
                .drain(..)
                .map(StoredAuditEvent::new),
        );

        Ok(())
    }
}
