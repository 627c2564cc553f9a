use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use skillmatrix_application::{
    AssessmentService, AuditService, AuthorizationService, DepartmentRepository, DirectoryService,
    EmployeeCredentials, EmployeeRepository, JobProfileRepository, JobProfileService, NewEmployee,
    PasswordHasher, ReportingRepository, ReportingService, SkillCatalogRepository, SkillService,
    UserService,
};
use skillmatrix_core::{AppError, AppResult, DepartmentId, NonEmptyString, Role, SkillId, UserId};
use skillmatrix_domain::{
    Department, EmailAddress, Employee, JobProfile, PerformanceSnapshot, PermissionRegistry,
    ScopeFilter, SkillDefinition, SkillGapSnapshot,
};
use skillmatrix_infrastructure::{Argon2PasswordHasher, InMemorySkillRepository};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::RwLock;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;

use super::build_router;

const FRONTEND: &str = "http://localhost:3000";
const PASSWORD: &str = "correct horse battery staple";

#[derive(Default)]
struct InMemoryDirectory {
    employees: RwLock<Vec<EmployeeCredentials>>,
    departments: RwLock<Vec<Department>>,
}

#[async_trait]
impl EmployeeRepository for InMemoryDirectory {
    async fn list_employees(&self, scope: &ScopeFilter) -> AppResult<Vec<Employee>> {
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .map(|credentials| credentials.employee.clone())
            .filter(|employee| scope.matches(&employee.as_target()))
            .collect())
    }

    async fn find_employee(&self, user_id: UserId) -> AppResult<Option<Employee>> {
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .find(|credentials| credentials.employee.id == user_id)
            .map(|credentials| credentials.employee.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<EmployeeCredentials>> {
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .find(|credentials| credentials.employee.email.as_str() == email)
            .cloned())
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<()> {
        let mut employees = self.employees.write().await;
        if employees
            .iter()
            .any(|credentials| credentials.employee.email == employee.employee.email)
        {
            return Err(AppError::Conflict("email already registered".to_owned()));
        }

        employees.push(EmployeeCredentials {
            employee: employee.employee,
            password_hash: employee.password_hash,
        });
        Ok(())
    }

    async fn delete_employee(&self, user_id: UserId) -> AppResult<()> {
        self.employees
            .write()
            .await
            .retain(|credentials| credentials.employee.id != user_id);
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDirectory {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        Ok(self.departments.read().await.clone())
    }

    async fn find_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .read()
            .await
            .iter()
            .find(|department| department.id == department_id)
            .cloned())
    }

    async fn create_department(&self, department: Department) -> AppResult<()> {
        self.departments.write().await.push(department);
        Ok(())
    }
}

#[async_trait]
impl JobProfileRepository for InMemoryDirectory {
    async fn list_job_profiles(&self) -> AppResult<Vec<JobProfile>> {
        Ok(Vec::new())
    }

    async fn create_job_profile(&self, _job_profile: JobProfile) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ReportingRepository for InMemoryDirectory {
    async fn skill_gap_snapshot(&self, _scope: &ScopeFilter) -> AppResult<SkillGapSnapshot> {
        Ok(SkillGapSnapshot::default())
    }

    async fn performance_snapshot(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<PerformanceSnapshot> {
        Ok(PerformanceSnapshot {
            user_id,
            employee_skills: Vec::new(),
            assessment_dates: Vec::new(),
            learning_progress: Vec::new(),
            activity: None,
            as_of,
        })
    }
}

struct TestApp {
    router: Router,
    directory: Arc<InMemoryDirectory>,
    skills: Arc<InMemorySkillRepository>,
}

impl TestApp {
    fn new() -> Self {
        let directory = Arc::new(InMemoryDirectory::default());
        let skills = Arc::new(InMemorySkillRepository::new());
        let password_hasher = Arc::new(Argon2PasswordHasher::new());
        let authorization_service =
            AuthorizationService::new(Arc::new(PermissionRegistry::standard()));
        let postgres_pool = PgPoolOptions::new()
            .connect_lazy("postgres://skillmatrix@localhost/skillmatrix")
            .unwrap_or_else(|_| unreachable!());

        let app_state = AppState {
            user_service: UserService::new(directory.clone(), password_hasher.clone()),
            directory_service: DirectoryService::new(
                authorization_service.clone(),
                directory.clone(),
                directory.clone(),
                password_hasher,
                skills.clone(),
            ),
            skill_service: SkillService::new(
                authorization_service.clone(),
                skills.clone(),
                skills.clone(),
                directory.clone(),
                skills.clone(),
            ),
            assessment_service: AssessmentService::new(
                authorization_service.clone(),
                skills.clone(),
                skills.clone(),
                directory.clone(),
                skills.clone(),
            ),
            job_profile_service: JobProfileService::new(
                authorization_service.clone(),
                directory.clone(),
                directory.clone(),
                skills.clone(),
                skills.clone(),
            ),
            reporting_service: ReportingService::new(
                authorization_service.clone(),
                directory.clone(),
                directory.clone(),
            ),
            audit_service: AuditService::new(authorization_service.clone(), skills.clone()),
            authorization_service,
            postgres_pool,
            frontend_url: FRONTEND.to_owned(),
        };

        let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
        let router = build_router(app_state, session_layer).unwrap_or_else(|_| unreachable!());

        Self {
            router,
            directory,
            skills,
        }
    }

    async fn seed_employee(&self, email: &str, role: Role) -> Employee {
        let employee = Employee {
            id: UserId::new(),
            email: EmailAddress::new(email).unwrap_or_else(|_| unreachable!()),
            display_name: NonEmptyString::new("Seeded Employee")
                .unwrap_or_else(|_| unreachable!()),
            role,
            department_id: None,
            job_title: None,
            created_at: Utc::now(),
        };
        let password_hash = Argon2PasswordHasher::new()
            .hash_password(PASSWORD)
            .unwrap_or_else(|_| unreachable!());

        assert!(
            self.directory
                .create_employee(NewEmployee {
                    employee: employee.clone(),
                    password_hash,
                })
                .await
                .is_ok()
        );
        employee
    }

    async fn seed_skill(&self, name: &str) -> SkillDefinition {
        let skill = SkillDefinition::new(SkillId::new(), name, "Engineering", None)
            .unwrap_or_else(|_| unreachable!());
        assert!(self.skills.create_skill(skill.clone()).await.is_ok());
        skill
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|_| unreachable!())
    }

    /// Logs in and returns the session cookie.
    async fn login(&self, email: &str) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/auth/login",
                None,
                &json!({ "email": email, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

fn json_request(method: Method, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| unreachable!())
}

fn empty_request(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder
        .body(Body::empty())
        .unwrap_or_else(|_| unreachable!())
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or_default()
}

#[tokio::test]
async fn protected_routes_need_a_session() {
    let app = TestApp::new();

    let response = app
        .send(empty_request(Method::GET, "/api/employees", None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "unauthorized: authentication required");
}

#[tokio::test]
async fn deleting_own_account_returns_forbidden_with_code() {
    let app = TestApp::new();
    let admin = app.seed_employee("admin@example.com", Role::Admin).await;
    let cookie = app.login("admin@example.com").await;

    let response = app
        .send(empty_request(
            Method::DELETE,
            &format!("/api/employees/{}", admin.id),
            Some(&cookie),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.contains("SELF_DELETE_FORBIDDEN"))
    );
}

#[tokio::test]
async fn recorded_assessment_is_created_and_readable() {
    let app = TestApp::new();
    app.seed_employee("assessor@example.com", Role::Assessor)
        .await;
    let employee = app.seed_employee("dev@example.com", Role::Employee).await;
    let skill = app.seed_skill("Rust").await;
    let cookie = app.login("assessor@example.com").await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/assessments",
            Some(&cookie),
            &json!({
                "employee_id": employee.id.to_string(),
                "skill_id": skill.id().to_string(),
                "new_level": 3,
                "notes": "pairing session",
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["previous_level"], 1);
    assert_eq!(created["new_level"], 3);

    let assessment_id = created["assessment_id"].as_str().unwrap_or_default();
    let fetched = app
        .send(empty_request(
            Method::GET,
            &format!("/api/assessments/{assessment_id}"),
            Some(&cookie),
        ))
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(json_body(fetched).await["notes"], "pairing session");

    let audit_actions: Vec<_> = app
        .skills
        .audit_events()
        .await
        .iter()
        .map(|event| event.action.as_str())
        .collect();
    assert_eq!(audit_actions, vec!["assessment.recorded"]);
}

#[tokio::test]
async fn cross_origin_mutations_are_rejected_before_reaching_handlers() {
    let app = TestApp::new();
    app.seed_employee("admin@example.com", Role::Admin).await;
    let cookie = app.login("admin@example.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/skills")
        .header(header::ORIGIN, "https://attacker.test")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from(
            json!({ "name": "Go", "category": "Engineering" }).to_string(),
        ))
        .unwrap_or_else(|_| unreachable!());
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "unauthorized: origin validation failed");
    assert!(app.skills.audit_events().await.is_empty());
}
