use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use skillmatrix_application::{
    DepartmentRepository, EmployeeCredentials, EmployeeRepository, NewEmployee,
};
use skillmatrix_core::{AppError, AppResult, DepartmentId, NonEmptyString, UserId};
use skillmatrix_domain::{Department, Employee, ScopeFilter};

use crate::rows::{
    EMPLOYEE_COLUMNS, EmployeeRow, EmployeeScopeBinds, map_rows, map_unique_violation,
};

/// PostgreSQL-backed repository for employees and departments.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    employee: EmployeeRow,
    password_hash: String,
}

#[derive(Debug, FromRow)]
struct DepartmentRow {
    id: Uuid,
    name: String,
    description: Option<String>,
}

impl TryFrom<DepartmentRow> for Department {
    type Error = AppError;

    fn try_from(row: DepartmentRow) -> AppResult<Self> {
        Ok(Self {
            id: DepartmentId::from_uuid(row.id),
            name: NonEmptyString::new(row.name).map_err(|error| {
                AppError::Internal(format!("stored department name is invalid: {error}"))
            })?,
            description: row.description,
        })
    }
}

#[async_trait]
impl EmployeeRepository for PostgresDirectoryRepository {
    async fn list_employees(&self, scope: &ScopeFilter) -> AppResult<Vec<Employee>> {
        let binds = EmployeeScopeBinds::from_scope(scope);
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}
            FROM employees
            WHERE ($1 OR id = $2 OR department_id = $3)
            ORDER BY display_name, id
            "#
        ))
        .bind(binds.all)
        .bind(binds.user_id)
        .bind(binds.department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list employees: {error}")))?;

        map_rows(rows)
    }

    async fn find_employee(&self, user_id: UserId) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}
            FROM employees
            WHERE id = $1
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find employee: {error}")))?;

        row.map(Employee::try_from).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<EmployeeCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}, password_hash
            FROM employees
            WHERE email = $1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find credentials: {error}")))?;

        row.map(|row| {
            Ok(EmployeeCredentials {
                employee: Employee::try_from(row.employee)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn create_employee(&self, new_employee: NewEmployee) -> AppResult<()> {
        let employee = new_employee.employee;
        sqlx::query(
            r#"
            INSERT INTO employees (
                id,
                email,
                display_name,
                role,
                department_id,
                job_title,
                password_hash,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(employee.id.as_uuid())
        .bind(employee.email.as_str())
        .bind(employee.display_name.as_str())
        .bind(employee.role.as_str())
        .bind(employee.department_id.map(|id| id.as_uuid()))
        .bind(employee.job_title.as_deref())
        .bind(new_employee.password_hash)
        .bind(employee.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                || format!("email '{}' is already registered", employee.email.as_str()),
                "create employee",
            )
        })?;

        info!(employee_id = %employee.id, role = employee.role.as_str(), "employee created");
        Ok(())
    }

    async fn delete_employee(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete employee: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "employee '{user_id}' does not exist"
            )));
        }

        info!(employee_id = %user_id, "employee deleted");
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDirectoryRepository {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, description
            FROM departments
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?;

        map_rows(rows)
    }

    async fn find_department(&self, department_id: DepartmentId) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, description
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(department_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find department: {error}")))?;

        row.map(Department::try_from).transpose()
    }

    async fn create_department(&self, department: Department) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, name, description)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(department.id.as_uuid())
        .bind(department.name.as_str())
        .bind(department.description.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                || format!("department '{}' already exists", department.name.as_str()),
                "create department",
            )
        })?;

        Ok(())
    }
}
