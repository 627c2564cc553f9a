use chrono::Utc;
use skillmatrix_application::{EmployeeRepository, NewEmployee, PasswordHasher};
use skillmatrix_core::{AppResult, NonEmptyString, Role, UserId};
use skillmatrix_domain::{EmailAddress, Employee, validate_password};
use skillmatrix_infrastructure::{Argon2PasswordHasher, PostgresDirectoryRepository};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::BootstrapAdminConfig;

/// Creates the configured administrator unless an account already uses the email.
pub async fn ensure_bootstrap_admin(pool: PgPool, config: &BootstrapAdminConfig) -> AppResult<()> {
    let repository = PostgresDirectoryRepository::new(pool);
    let email = EmailAddress::new(config.email.as_str())?;

    if repository
        .find_credentials_by_email(email.as_str())
        .await?
        .is_some()
    {
        return Ok(());
    }

    validate_password(&config.password)?;
    let password_hash = Argon2PasswordHasher::new().hash_password(&config.password)?;
    let employee = Employee {
        id: UserId::new(),
        email,
        display_name: NonEmptyString::new(config.display_name.as_str())?,
        role: Role::Admin,
        department_id: None,
        job_title: None,
        created_at: Utc::now(),
    };
    let user_id = employee.id;

    repository
        .create_employee(NewEmployee {
            employee,
            password_hash,
        })
        .await?;

    info!(%user_id, "bootstrap administrator created");
    Ok(())
}
