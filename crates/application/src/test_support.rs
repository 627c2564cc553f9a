//! In-memory fakes shared by service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use skillmatrix_core::{
    Actor, AppError, AppResult, AssessmentId, DepartmentId, JobProfileId, NonEmptyString, Role,
    SkillId, UserId,
};
use skillmatrix_domain::{
    ActivitySummary, Assessment, AssessmentParts, Department, EmailAddress, Employee,
    EmployeePlacement, EmployeeSkill, JobProfile, JobProfileSkill, LearningProgress,
    PerformanceSnapshot, PermissionRegistry, ScopeFilter, SkillDefinition, SkillGapSnapshot,
    SkillLevel, SkillPriority,
};

use crate::{
    AssessmentListQuery, AssessmentRepository, AssessmentUnitOfWork, AuditEvent, AuditLogEntry,
    AuditLogQuery, AuditLogRepository, AuditRepository, AuthorizationService,
    DepartmentRepository, EmployeeCredentials, EmployeeRepository, EmployeeSkillRepository,
    JobProfileRepository, NewEmployee, PasswordHasher, ReportingRepository,
    SkillCatalogRepository,
};

pub(crate) const SEED_PASSWORD: &str = "correct horse battery";

pub(crate) fn authorization() -> AuthorizationService {
    AuthorizationService::new(Arc::new(PermissionRegistry::standard()))
}

pub(crate) fn actor_for(employee: &Employee) -> Actor {
    Actor::new(employee.id, employee.role, employee.department_id)
}

pub(crate) fn actor_with_role(role: Role, department_id: Option<DepartmentId>) -> Actor {
    Actor::new(UserId::new(), role, department_id)
}

pub(crate) fn level(value: u8) -> SkillLevel {
    SkillLevel::new(value).unwrap_or(SkillLevel::FLOOR)
}

#[derive(Default)]
pub(crate) struct FakePasswordHasher {
    hash_calls: AtomicUsize,
}

impl FakePasswordHasher {
    pub(crate) fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

#[derive(Default)]
pub(crate) struct SkillTables {
    pub(crate) skills: Vec<EmployeeSkill>,
    pub(crate) assessments: Vec<Assessment>,
}

/// Fake implementing every port over shared vectors.
///
/// `begin_pair` locks all skill tables at once, which is coarser than a
/// per-pair lock but gives the same serialization for tests.
#[derive(Default)]
pub(crate) struct FakeStore {
    employees: Mutex<Vec<EmployeeCredentials>>,
    departments: Mutex<Vec<Department>>,
    catalog: Mutex<Vec<SkillDefinition>>,
    job_profiles: Mutex<Vec<JobProfile>>,
    learning: Mutex<Vec<LearningProgress>>,
    activity: Mutex<Vec<ActivitySummary>>,
    audit_events: Arc<Mutex<Vec<AuditEvent>>>,
    tables: Arc<Mutex<SkillTables>>,
    fail_skill_writes: AtomicBool,
    fail_commits: AtomicBool,
    fail_audit_writes: AtomicBool,
}

impl FakeStore {
    pub(crate) fn fail_skill_writes(&self) {
        self.fail_skill_writes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_commits(&self) {
        self.fail_commits.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_audit_writes_failing(&self, failing: bool) {
        self.fail_audit_writes.store(failing, Ordering::SeqCst);
    }

    pub(crate) async fn seed_department(&self, name: &str) -> Department {
        let department = Department {
            id: DepartmentId::new(),
            name: NonEmptyString::new(name).unwrap_or_else(|_| unreachable!()),
            description: None,
        };
        self.departments.lock().await.push(department.clone());
        department
    }

    pub(crate) async fn seed_employee(
        &self,
        email: &str,
        role: Role,
        department_id: Option<DepartmentId>,
    ) -> Employee {
        let employee = Employee {
            id: UserId::new(),
            email: EmailAddress::new(email).unwrap_or_else(|_| unreachable!()),
            display_name: NonEmptyString::new(email).unwrap_or_else(|_| unreachable!()),
            role,
            department_id,
            job_title: None,
            created_at: Utc::now(),
        };
        self.employees.lock().await.push(EmployeeCredentials {
            employee: employee.clone(),
            password_hash: format!("hashed:{SEED_PASSWORD}"),
        });
        employee
    }

    pub(crate) async fn seed_skill(&self, name: &str) -> SkillDefinition {
        let skill = SkillDefinition::new(SkillId::new(), name, "engineering", None)
            .unwrap_or_else(|_| unreachable!());
        self.catalog.lock().await.push(skill.clone());
        skill
    }

    pub(crate) async fn seed_employee_skill(
        &self,
        user_id: UserId,
        skill_id: SkillId,
        current_level: SkillLevel,
        target_level: SkillLevel,
    ) {
        self.tables.lock().await.skills.push(EmployeeSkill {
            user_id,
            skill_id,
            current_level,
            target_level,
            priority: SkillPriority::Medium,
            last_assessed: None,
        });
    }

    pub(crate) async fn seed_job_profile(
        &self,
        title: &str,
        department_id: Option<DepartmentId>,
        skills: Vec<JobProfileSkill>,
    ) {
        let profile = JobProfile::new(JobProfileId::new(), title, department_id, skills)
            .unwrap_or_else(|_| unreachable!());
        self.job_profiles.lock().await.push(profile);
    }

    pub(crate) async fn seed_recent_assessments(
        &self,
        user_id: UserId,
        skill_id: SkillId,
        count: i64,
    ) {
        let mut tables = self.tables.lock().await;
        for day in 1..=count {
            tables.assessments.push(Assessment::from_parts(AssessmentParts {
                id: AssessmentId::new(),
                employee_id: user_id,
                assessor_id: user_id,
                skill_id,
                previous_level: SkillLevel::FLOOR,
                new_level: SkillLevel::FLOOR,
                notes: None,
                evidence: None,
                next_review_date: None,
                assessment_date: Utc::now() - Duration::days(day),
            }));
        }
    }

    pub(crate) async fn seed_learning(&self, progress: LearningProgress) {
        self.learning.lock().await.push(progress);
    }

    pub(crate) async fn seed_activity(&self, activity: ActivitySummary) {
        self.activity.lock().await.push(activity);
    }

    pub(crate) async fn employee_skill(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> Option<EmployeeSkill> {
        self.tables
            .lock()
            .await
            .skills
            .iter()
            .find(|skill| skill.user_id == user_id && skill.skill_id == skill_id)
            .cloned()
    }

    pub(crate) async fn assessment_count(&self) -> usize {
        self.tables.lock().await.assessments.len()
    }

    pub(crate) async fn audit_actions(&self) -> Vec<&'static str> {
        self.audit_events
            .lock()
            .await
            .iter()
            .map(|event| event.action.as_str())
            .collect()
    }

    async fn employee_by_id(&self, user_id: UserId) -> Option<Employee> {
        self.employees
            .lock()
            .await
            .iter()
            .find(|credentials| credentials.employee.id == user_id)
            .map(|credentials| credentials.employee.clone())
    }
}

#[async_trait]
impl EmployeeRepository for FakeStore {
    async fn list_employees(&self, scope: &ScopeFilter) -> AppResult<Vec<Employee>> {
        Ok(self
            .employees
            .lock()
            .await
            .iter()
            .map(|credentials| credentials.employee.clone())
            .filter(|employee| scope.matches(&employee.as_target()))
            .collect())
    }

    async fn find_employee(&self, user_id: UserId) -> AppResult<Option<Employee>> {
        Ok(self.employee_by_id(user_id).await)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<EmployeeCredentials>> {
        Ok(self
            .employees
            .lock()
            .await
            .iter()
            .find(|credentials| credentials.employee.email.as_str() == email)
            .cloned())
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<()> {
        let mut employees = self.employees.lock().await;
        if employees
            .iter()
            .any(|existing| existing.employee.email == employee.employee.email)
        {
            return Err(AppError::Conflict(format!(
                "email '{}' is already registered",
                employee.employee.email.as_str()
            )));
        }

        employees.push(EmployeeCredentials {
            employee: employee.employee,
            password_hash: employee.password_hash,
        });
        Ok(())
    }

    async fn delete_employee(&self, user_id: UserId) -> AppResult<()> {
        self.employees
            .lock()
            .await
            .retain(|credentials| credentials.employee.id != user_id);
        self.tables
            .lock()
            .await
            .skills
            .retain(|skill| skill.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for FakeStore {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        Ok(self.departments.lock().await.clone())
    }

    async fn find_department(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .await
            .iter()
            .find(|department| department.id == department_id)
            .cloned())
    }

    async fn create_department(&self, department: Department) -> AppResult<()> {
        let mut departments = self.departments.lock().await;
        if departments
            .iter()
            .any(|existing| existing.name == department.name)
        {
            return Err(AppError::Conflict(format!(
                "department '{}' already exists",
                department.name.as_str()
            )));
        }
        departments.push(department);
        Ok(())
    }
}

#[async_trait]
impl SkillCatalogRepository for FakeStore {
    async fn list_skills(&self) -> AppResult<Vec<SkillDefinition>> {
        Ok(self.catalog.lock().await.clone())
    }

    async fn find_skill(&self, skill_id: SkillId) -> AppResult<Option<SkillDefinition>> {
        Ok(self
            .catalog
            .lock()
            .await
            .iter()
            .find(|skill| skill.id() == skill_id)
            .cloned())
    }

    async fn create_skill(&self, skill: SkillDefinition) -> AppResult<()> {
        self.catalog.lock().await.push(skill);
        Ok(())
    }
}

pub(crate) struct FakeUnitOfWork {
    tables: OwnedMutexGuard<SkillTables>,
    user_id: UserId,
    skill_id: SkillId,
    audit_events: Arc<Mutex<Vec<AuditEvent>>>,
    staged_assessments: Vec<Assessment>,
    staged_deletes: Vec<AssessmentId>,
    staged_skill: Option<EmployeeSkill>,
    staged_audit_events: Vec<AuditEvent>,
    fail_skill_writes: bool,
    fail_commit: bool,
    fail_audit_writes: bool,
}

#[async_trait]
impl AssessmentUnitOfWork for FakeUnitOfWork {
    async fn employee_skill(&mut self) -> AppResult<Option<EmployeeSkill>> {
        if let Some(skill) = &self.staged_skill {
            return Ok(Some(skill.clone()));
        }

        Ok(self
            .tables
            .skills
            .iter()
            .find(|skill| skill.user_id == self.user_id && skill.skill_id == self.skill_id)
            .cloned())
    }

    async fn assessment(&mut self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>> {
        if self.staged_deletes.contains(&assessment_id) {
            return Ok(None);
        }

        Ok(self
            .staged_assessments
            .iter()
            .chain(self.tables.assessments.iter())
            .find(|assessment| assessment.id() == assessment_id)
            .filter(|assessment| {
                assessment.employee_id() == self.user_id && assessment.skill_id() == self.skill_id
            })
            .cloned())
    }

    async fn insert_assessment(&mut self, assessment: &Assessment) -> AppResult<()> {
        self.staged_assessments.push(assessment.clone());
        Ok(())
    }

    async fn update_assessment(&mut self, assessment: &Assessment) -> AppResult<()> {
        self.staged_assessments.push(assessment.clone());
        Ok(())
    }

    async fn delete_assessment(&mut self, assessment_id: AssessmentId) -> AppResult<()> {
        if self.assessment(assessment_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "assessment '{assessment_id}' does not exist"
            )));
        }

        self.staged_deletes.push(assessment_id);
        Ok(())
    }

    async fn save_employee_skill(&mut self, skill: &EmployeeSkill) -> AppResult<()> {
        if self.fail_skill_writes {
            return Err(AppError::Internal("skill table unavailable".to_owned()));
        }

        self.staged_skill = Some(skill.clone());
        Ok(())
    }

    async fn append_audit_event(&mut self, event: AuditEvent) -> AppResult<()> {
        if self.fail_audit_writes {
            return Err(AppError::Internal("audit store unavailable".to_owned()));
        }

        self.staged_audit_events.push(event);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> AppResult<()> {
        if self.fail_commit {
            return Err(AppError::Internal("commit rejected".to_owned()));
        }

        let staged_assessments = std::mem::take(&mut self.staged_assessments);
        for assessment in staged_assessments {
            match self
                .tables
                .assessments
                .iter_mut()
                .find(|existing| existing.id() == assessment.id())
            {
                Some(existing) => *existing = assessment,
                None => self.tables.assessments.push(assessment),
            }
        }

        if let Some(skill) = self.staged_skill.take() {
            let (user_id, skill_id) = (self.user_id, self.skill_id);
            self.tables
                .skills
                .retain(|existing| !(existing.user_id == user_id && existing.skill_id == skill_id));
            self.tables.skills.push(skill);
        }

        let staged_deletes = std::mem::take(&mut self.staged_deletes);
        self.tables
            .assessments
            .retain(|assessment| !staged_deletes.contains(&assessment.id()));

        let staged_audit_events = std::mem::take(&mut self.staged_audit_events);
        self.audit_events.lock().await.extend(staged_audit_events);

        Ok(())
    }
}

#[async_trait]
impl EmployeeSkillRepository for FakeStore {
    async fn list_employee_skills(&self, user_id: UserId) -> AppResult<Vec<EmployeeSkill>> {
        Ok(self
            .tables
            .lock()
            .await
            .skills
            .iter()
            .filter(|skill| skill.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn begin_pair(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> AppResult<Box<dyn AssessmentUnitOfWork>> {
        Ok(Box::new(FakeUnitOfWork {
            tables: self.tables.clone().lock_owned().await,
            user_id,
            skill_id,
            audit_events: self.audit_events.clone(),
            staged_assessments: Vec::new(),
            staged_deletes: Vec::new(),
            staged_skill: None,
            staged_audit_events: Vec::new(),
            fail_skill_writes: self.fail_skill_writes.load(Ordering::SeqCst),
            fail_commit: self.fail_commits.load(Ordering::SeqCst),
            fail_audit_writes: self.fail_audit_writes.load(Ordering::SeqCst),
        }))
    }
}

#[async_trait]
impl AssessmentRepository for FakeStore {
    async fn find_assessment(&self, assessment_id: AssessmentId) -> AppResult<Option<Assessment>> {
        Ok(self
            .tables
            .lock()
            .await
            .assessments
            .iter()
            .find(|assessment| assessment.id() == assessment_id)
            .cloned())
    }

    async fn list_assessments(
        &self,
        scope: &ScopeFilter,
        query: AssessmentListQuery,
    ) -> AppResult<Vec<Assessment>> {
        let mut assessments: Vec<Assessment> = self
            .tables
            .lock()
            .await
            .assessments
            .iter()
            .filter(|assessment| {
                scope.matches(&skillmatrix_domain::ResourceTarget::Assessment {
                    employee_id: assessment.employee_id(),
                    assessor_id: assessment.assessor_id(),
                })
            })
            .filter(|assessment| {
                query
                    .employee_id
                    .is_none_or(|employee_id| assessment.employee_id() == employee_id)
            })
            .filter(|assessment| {
                query
                    .skill_id
                    .is_none_or(|skill_id| assessment.skill_id() == skill_id)
            })
            .cloned()
            .collect();
        assessments.sort_by_key(|assessment| std::cmp::Reverse(assessment.assessment_date()));
        Ok(assessments)
    }
}

#[async_trait]
impl JobProfileRepository for FakeStore {
    async fn list_job_profiles(&self) -> AppResult<Vec<JobProfile>> {
        Ok(self.job_profiles.lock().await.clone())
    }

    async fn create_job_profile(&self, job_profile: JobProfile) -> AppResult<()> {
        self.job_profiles.lock().await.push(job_profile);
        Ok(())
    }
}

#[async_trait]
impl ReportingRepository for FakeStore {
    async fn skill_gap_snapshot(&self, scope: &ScopeFilter) -> AppResult<SkillGapSnapshot> {
        let placements: Vec<EmployeePlacement> = self
            .list_employees(scope)
            .await?
            .into_iter()
            .map(|employee| EmployeePlacement {
                user_id: employee.id,
                department_id: employee.department_id,
            })
            .collect();
        let employee_skills = self
            .tables
            .lock()
            .await
            .skills
            .iter()
            .filter(|skill| {
                placements
                    .iter()
                    .any(|placement| placement.user_id == skill.user_id)
            })
            .cloned()
            .collect();

        Ok(SkillGapSnapshot {
            placements,
            employee_skills,
            job_profiles: self.job_profiles.lock().await.clone(),
        })
    }

    async fn performance_snapshot(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<PerformanceSnapshot> {
        let (employee_skills, assessment_dates) = {
            let tables = self.tables.lock().await;
            (
                tables
                    .skills
                    .iter()
                    .filter(|skill| skill.user_id == user_id)
                    .cloned()
                    .collect(),
                tables
                    .assessments
                    .iter()
                    .filter(|assessment| assessment.employee_id() == user_id)
                    .map(Assessment::assessment_date)
                    .collect(),
            )
        };

        Ok(PerformanceSnapshot {
            user_id,
            employee_skills,
            assessment_dates,
            learning_progress: self
                .learning
                .lock()
                .await
                .iter()
                .filter(|entry| entry.user_id == user_id)
                .cloned()
                .collect(),
            activity: self
                .activity
                .lock()
                .await
                .iter()
                .find(|activity| activity.user_id == user_id)
                .copied(),
            as_of,
        })
    }
}

#[async_trait]
impl AuditRepository for FakeStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        if self.fail_audit_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("audit store unavailable".to_owned()));
        }

        self.audit_events.lock().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for FakeStore {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .audit_events
            .lock()
            .await
            .iter()
            .rev()
            .filter(|event| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| event.action.as_str() == action)
            })
            .skip(query.offset)
            .take(query.limit)
            .enumerate()
            .map(|(index, event)| AuditLogEntry {
                event_id: index.to_string(),
                actor_id: event.actor_id,
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type.clone(),
                resource_id: event.resource_id.clone(),
                detail: event.detail.clone(),
                created_at: Utc::now().to_rfc3339(),
            })
            .collect())
    }
}
