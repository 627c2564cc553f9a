//! Password authentication for employee accounts.
//!
//! Failures are reported generically so callers cannot tell an unknown
//! email from a wrong password.

use std::sync::Arc;

use skillmatrix_core::AppResult;
use skillmatrix_domain::{EmailAddress, Employee};

use crate::{EmployeeRepository, PasswordHasher};

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Credentials matched. A session can be established.
    Authenticated(Employee),
    /// Credentials did not match.
    Failed,
}

/// Application service for employee authentication.
#[derive(Clone)]
pub struct UserService {
    employee_repository: Arc<dyn EmployeeRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        employee_repository: Arc<dyn EmployeeRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            employee_repository,
            password_hasher,
        }
    }

    /// Authenticates an employee with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let Ok(email) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let Some(credentials) = self
            .employee_repository
            .find_credentials_by_email(email.as_str())
            .await?
        else {
            // Hash anyway so unknown emails take as long as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if !self
            .password_hasher
            .verify_password(password, &credentials.password_hash)?
        {
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(credentials.employee))
    }
}
