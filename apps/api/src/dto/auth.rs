use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use skillmatrix_domain::{Employee, Permission};

/// Incoming payload for password login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of the authenticated employee.
#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub department_id: Option<String>,
    pub permissions: Vec<String>,
}

impl ActorResponse {
    pub fn from_employee(employee: &Employee, permissions: BTreeSet<Permission>) -> Self {
        Self {
            user_id: employee.id.to_string(),
            email: employee.email.as_str().to_owned(),
            display_name: employee.display_name.as_str().to_owned(),
            role: employee.role.as_str().to_owned(),
            department_id: employee.department_id.map(|id| id.to_string()),
            permissions: permission_names(permissions),
        }
    }
}

/// Permission set of the current role.
#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub role: String,
    pub permissions: Vec<String>,
}

impl PermissionsResponse {
    pub fn new(role: &str, permissions: BTreeSet<Permission>) -> Self {
        Self {
            role: role.to_owned(),
            permissions: permission_names(permissions),
        }
    }
}

fn permission_names(permissions: BTreeSet<Permission>) -> Vec<String> {
    permissions
        .into_iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}
