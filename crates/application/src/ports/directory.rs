use async_trait::async_trait;
use skillmatrix_core::{AppResult, DepartmentId, UserId};
use skillmatrix_domain::{Department, Employee, ScopeFilter};

/// Employee row together with its stored password hash.
#[derive(Debug, Clone)]
pub struct EmployeeCredentials {
    /// Employee record.
    pub employee: Employee,
    /// Argon2id hash.
    pub password_hash: String,
}

/// Employee row to insert, with its password already hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Employee record.
    pub employee: Employee,
    /// Argon2id hash.
    pub password_hash: String,
}

/// Repository port for employee accounts.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Lists employees matching the scope, ordered by display name.
    async fn list_employees(&self, scope: &ScopeFilter) -> AppResult<Vec<Employee>>;

    /// Finds one employee.
    async fn find_employee(&self, user_id: UserId) -> AppResult<Option<Employee>>;

    /// Finds an employee and password hash by login email.
    async fn find_credentials_by_email(&self, email: &str)
    -> AppResult<Option<EmployeeCredentials>>;

    /// Inserts an employee. Fails with a conflict on duplicate email.
    async fn create_employee(&self, employee: NewEmployee) -> AppResult<()>;

    /// Deletes an employee and their owned rows.
    async fn delete_employee(&self, user_id: UserId) -> AppResult<()>;
}

/// Repository port for departments.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Lists all departments ordered by name.
    async fn list_departments(&self) -> AppResult<Vec<Department>>;

    /// Finds one department.
    async fn find_department(&self, department_id: DepartmentId)
    -> AppResult<Option<Department>>;

    /// Inserts a department. Fails with a conflict on duplicate name.
    async fn create_department(&self, department: Department) -> AppResult<()>;
}

/// Port for password hashing, keeping application code free of crypto crates.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
