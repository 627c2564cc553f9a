use std::sync::Arc;

use chrono::Utc;
use skillmatrix_core::{Actor, AppError, AppResult, DepartmentId, NonEmptyString, Role, UserId};
use skillmatrix_domain::{
    AccessAction, AuditAction, Department, EmailAddress, Employee, ResourceKind, ResourceTarget,
    validate_password,
};

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, DepartmentRepository, EmployeeRepository,
    NewEmployee, PasswordHasher,
};


/// Input for creating an employee account.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Login email.
    pub email: String,
    /// Initial password in plaintext.
    pub password: String,
    /// Display name.
    pub display_name: String,
    /// Organisational role.
    pub role: Role,
    /// Department membership.
    pub department_id: Option<DepartmentId>,
    /// Job title.
    pub job_title: Option<String>,
}

/// Input for creating a department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDepartmentInput {
    /// Unique name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Application service for employees and departments.
#[derive(Clone)]
pub struct DirectoryService {
    authorization_service: AuthorizationService,
    employee_repository: Arc<dyn EmployeeRepository>,
    department_repository: Arc<dyn DepartmentRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl DirectoryService {
    /// Creates a new directory service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        employee_repository: Arc<dyn EmployeeRepository>,
        department_repository: Arc<dyn DepartmentRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            employee_repository,
            department_repository,
            password_hasher,
            audit_repository,
        }
    }

    /// Lists employees visible to the actor.
    pub async fn list_employees(&self, actor: &Actor) -> AppResult<Vec<Employee>> {
        let scope = self.authorization_service.require(
            actor,
            ResourceKind::Employee,
            AccessAction::ReadList,
            None,
        )?;

        self.employee_repository.list_employees(&scope).await
    }

    /// Returns one employee visible to the actor.
    pub async fn get_employee(&self, actor: &Actor, user_id: UserId) -> AppResult<Employee> {
        let employee = self.find_employee(user_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::Employee,
            AccessAction::ReadOne,
            Some(&employee.as_target()),
        )?;

        Ok(employee)
    }

    /// Creates an employee account with a hashed initial password.
    pub async fn create_employee(
        &self,
        actor: &Actor,
        input: CreateEmployeeInput,
    ) -> AppResult<Employee> {
        let employee_id = UserId::new();
        self.authorization_service.require(
            actor,
            ResourceKind::Employee,
            AccessAction::Create,
            Some(&ResourceTarget::Employee {
                user_id: employee_id,
                department_id: input.department_id,
            }),
        )?;
        self.authorization_service.require_role_management(
            actor,
            input.role,
            AccessAction::Create,
        )?;

        let email = EmailAddress::new(input.email)?;
        validate_password(&input.password)?;
        let display_name = NonEmptyString::new(input.display_name)?;

        if let Some(department_id) = input.department_id {
            self.find_department(department_id).await?;
        }

        let employee = Employee {
            id: employee_id,
            email,
            display_name,
            role: input.role,
            department_id: input.department_id,
            job_title: input
                .job_title
                .map(|title| title.trim().to_owned())
                .filter(|title| !title.is_empty()),
            created_at: Utc::now(),
        };
        let password_hash = self.password_hasher.hash_password(&input.password)?;

        self.employee_repository
            .create_employee(NewEmployee {
                employee: employee.clone(),
                password_hash,
            })
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: actor.id(),
                action: AuditAction::EmployeeCreated,
                resource_type: ResourceKind::Employee.as_str().to_owned(),
                resource_id: employee.id.to_string(),
                detail: Some(format!(
                    "created '{}' with role '{}'",
                    employee.email.as_str(),
                    employee.role.as_str()
                )),
            })
            .await?;

        Ok(employee)
    }

    /// Deletes another employee's account.
    pub async fn delete_employee(&self, actor: &Actor, user_id: UserId) -> AppResult<()> {
        let employee = self.find_employee(user_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::Employee,
            AccessAction::Delete,
            Some(&employee.as_target()),
        )?;
        self.authorization_service.require_role_management(
            actor,
            employee.role,
            AccessAction::Delete,
        )?;

        self.employee_repository.delete_employee(user_id).await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: actor.id(),
                action: AuditAction::EmployeeDeleted,
                resource_type: ResourceKind::Employee.as_str().to_owned(),
                resource_id: user_id.to_string(),
                detail: Some(format!("deleted '{}'", employee.email.as_str())),
            })
            .await
    }

    /// Lists all departments.
    pub async fn list_departments(&self, actor: &Actor) -> AppResult<Vec<Department>> {
        self.authorization_service.require(
            actor,
            ResourceKind::Department,
            AccessAction::ReadList,
            None,
        )?;

        self.department_repository.list_departments().await
    }

    /// Creates a department.
    pub async fn create_department(
        &self,
        actor: &Actor,
        input: CreateDepartmentInput,
    ) -> AppResult<Department> {
        self.authorization_service.require(
            actor,
            ResourceKind::Department,
            AccessAction::Create,
            Some(&ResourceTarget::Shared),
        )?;

        let department = Department {
            id: DepartmentId::new(),
            name: NonEmptyString::new(input.name)?,
            description: input
                .description
                .map(|description| description.trim().to_owned())
                .filter(|description| !description.is_empty()),
        };

        self.department_repository
            .create_department(department.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor_id: actor.id(),
                action: AuditAction::DepartmentCreated,
                resource_type: ResourceKind::Department.as_str().to_owned(),
                resource_id: department.id.to_string(),
                detail: Some(department.name.as_str().to_owned()),
            })
            .await?;

        Ok(department)
    }

    async fn find_employee(&self, user_id: UserId) -> AppResult<Employee> {
        self.employee_repository
            .find_employee(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("employee '{user_id}' does not exist")))
    }

    async fn find_department(&self, department_id: DepartmentId) -> AppResult<Department> {
        self.department_repository
            .find_department(department_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("department '{department_id}' does not exist"))
            })
    }
}
