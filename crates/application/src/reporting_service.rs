use std::sync::Arc;

use chrono::Utc;
use skillmatrix_core::{Actor, AppError, AppResult, UserId};
use skillmatrix_domain::{
    AccessAction, DepartmentGapSummary, Employee, Permission, ResourceKind, ScopeFilter,
    ScoreReport, SkillGapEntry, compute_performance, compute_skill_gaps,
    summarize_gaps_by_department,
};

use crate::{AuthorizationService, EmployeeRepository, ReportingRepository};

/// Organisation-wide gap overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSummary {
    /// Employees covered by the summary.
    pub employee_count: usize,
    /// Total gaps.
    pub gap_count: usize,
    /// Gaps at or above the high-priority threshold.
    pub high_priority_count: usize,
    /// Per-department breakdown.
    pub departments: Vec<DepartmentGapSummary>,
}

/// Read-only reports computed in-process from repository snapshots.
#[derive(Clone)]
pub struct ReportingService {
    authorization_service: AuthorizationService,
    reporting_repository: Arc<dyn ReportingRepository>,
    employee_repository: Arc<dyn EmployeeRepository>,
}

impl ReportingService {
    /// Creates a new reporting service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        reporting_repository: Arc<dyn ReportingRepository>,
        employee_repository: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            authorization_service,
            reporting_repository,
            employee_repository,
        }
    }

    /// Returns skill gaps for one employee, or for every employee in the actor's scope.
    pub async fn skill_gaps(
        &self,
        actor: &Actor,
        employee_id: Option<UserId>,
    ) -> AppResult<Vec<SkillGapEntry>> {
        let scope = match employee_id {
            Some(user_id) => {
                let employee = self.find_employee(user_id).await?;
                self.authorization_service.require(
                    actor,
                    ResourceKind::EmployeeSkill,
                    AccessAction::ReadOne,
                    Some(&employee.as_target()),
                )?;
                ScopeFilter::SelfOnly { user_id }
            }
            None => self.authorization_service.require(
                actor,
                ResourceKind::EmployeeSkill,
                AccessAction::ReadList,
                None,
            )?,
        };

        let snapshot = self.reporting_repository.skill_gap_snapshot(&scope).await?;
        Ok(compute_skill_gaps(&snapshot))
    }

    /// Scores one employee's performance as of now.
    pub async fn performance(&self, actor: &Actor, employee_id: UserId) -> AppResult<ScoreReport> {
        let employee = self.find_employee(employee_id).await?;
        self.authorization_service.require(
            actor,
            ResourceKind::Employee,
            AccessAction::ReadOne,
            Some(&employee.as_target()),
        )?;

        let snapshot = self
            .reporting_repository
            .performance_snapshot(employee_id, Utc::now())
            .await?;
        Ok(compute_performance(&snapshot))
    }

    /// Summarizes gaps per department for dashboard viewers.
    pub async fn organization_summary(&self, actor: &Actor) -> AppResult<OrganizationSummary> {
        self.authorization_service
            .require_permission(actor, Permission::ViewOrganizationDashboard)?;
        let scope = self.authorization_service.require(
            actor,
            ResourceKind::Employee,
            AccessAction::ReadList,
            None,
        )?;

        let snapshot = self.reporting_repository.skill_gap_snapshot(&scope).await?;
        let gaps = compute_skill_gaps(&snapshot);

        Ok(OrganizationSummary {
            employee_count: snapshot.placements.len(),
            gap_count: gaps.len(),
            high_priority_count: gaps.iter().filter(|gap| gap.high_priority).count(),
            departments: summarize_gaps_by_department(&gaps, &snapshot.placements),
        })
    }

    async fn find_employee(&self, user_id: UserId) -> AppResult<Employee> {
        self.employee_repository
            .find_employee(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("employee '{user_id}' does not exist")))
    }
}
