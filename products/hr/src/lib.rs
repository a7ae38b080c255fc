//! HR vertical slice.
//!
//! [`HrModule`] owns a [`Repository`] and answers every question on behalf of
//! a logged-in [`Session`]. Visibility and permission decisions are delegated
//! to `platform-authz`; this crate only resolves ids into roles and records.

mod attendance;
mod dashboard;
mod directory;
mod error;
mod messages;
mod model;
mod repository;
mod salary;
pub mod seed;
mod tasks;

use platform_authz::{PolicyEngine, Principal, Role};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use attendance::AttendanceStats;
pub use dashboard::DashboardSummary;
pub use error::{HrError, HrResult};
pub use model::{
    AttendanceRecord, AttendanceStatus, Department, Employee, Message, MessageDraft, MessageType,
    Task, TaskDraft, TaskPriority, TaskStatus,
};
pub use repository::{InMemoryRepository, Repository};
pub use salary::{SalaryBreakdown, TeamSalary};
pub use tasks::{TaskCounts, filter_tasks, task_counts};

/// The employee currently acting in the suite.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub employee_id: String,
    pub name: String,
    pub role: Role,
}

impl Principal for Session {
    fn id(&self) -> &str {
        &self.employee_id
    }

    fn role(&self) -> Role {
        self.role
    }
}

#[derive(Debug)]
pub struct HrModule<R = InMemoryRepository> {
    repo: R,
    policy: PolicyEngine,
}

impl HrModule<InMemoryRepository> {
    /// Module preloaded with the demo organisation.
    pub fn demo() -> Self {
        Self::new(seed::demo_repository())
    }
}

impl<R: Repository> HrModule<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            policy: PolicyEngine,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn login(&self, employee_id: &str) -> HrResult<Session> {
        let session = self.session(employee_id)?;
        info!(employee_id = %session.employee_id, role = %session.role, "login");
        Ok(session)
    }

    /// Rebuilds a session from a stored employee id.
    pub fn session(&self, employee_id: &str) -> HrResult<Session> {
        let id = employee_id.trim();
        let emp = self
            .repo
            .employee(id)
            .ok_or_else(|| HrError::UnknownEmployee(id.to_string()))?;
        Ok(Session {
            employee_id: emp.id.clone(),
            name: emp.name.clone(),
            role: emp.role,
        })
    }

    fn require_employee(&self, id: &str) -> HrResult<&Employee> {
        self.repo
            .employee(id)
            .ok_or_else(|| HrError::UnknownEmployee(id.to_string()))
    }
}

fn require_text(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_resolves_role_from_directory() {
        let hr = HrModule::demo();
        let session = hr.login("9").unwrap();
        assert_eq!(session.name, "Ashwin Krishnan");
        assert_eq!(session.role, Role::Manager);
    }

    #[test]
    fn login_rejects_unknown_ids() {
        let hr = HrModule::demo();
        assert_eq!(
            hr.login("404"),
            Err(HrError::UnknownEmployee("404".to_string()))
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("title", "   ").is_err());
        assert_eq!(require_text("title", " Ship it ").unwrap(), "Ship it");
    }
}
