use std::sync::Arc;

use skillmatrix_core::{Actor, AppError, AppResult};
use skillmatrix_domain::Permission;

use crate::{AuditLogEntry, AuditLogQuery, AuditLogRepository, AuthorizationService};

/// Largest page an audit log query may request.
pub const AUDIT_LOG_MAX_LIMIT: usize = 500;

/// Read access to the audit log for administrators.
#[derive(Clone)]
pub struct AuditService {
    authorization_service: AuthorizationService,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl AuditService {
    /// Creates a new audit service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            authorization_service,
            audit_log_repository,
        }
    }

    /// Lists the most recent audit entries.
    pub async fn list_audit_log(
        &self,
        actor: &Actor,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.authorization_service
            .require_permission(actor, Permission::ViewAuditLogs)?;

        if query.limit == 0 || query.limit > AUDIT_LOG_MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "audit log limit must be between 1 and {AUDIT_LOG_MAX_LIMIT}"
            )));
        }

        self.audit_log_repository.list_recent_entries(query).await
    }
}
