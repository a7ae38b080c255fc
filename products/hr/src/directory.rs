use platform_authz::{Action, PolicyContext, visible_employees};

use crate::{Department, Employee, HrError, HrModule, HrResult, Repository, Session};

impl<R: Repository> HrModule<R> {
    pub fn visible_employees(&self, session: &Session) -> Vec<&Employee> {
        visible_employees(self.repo.employees(), session)
    }

    /// Visible employees other than the session holder.
    pub fn team(&self, session: &Session) -> Vec<&Employee> {
        self.visible_employees(session)
            .into_iter()
            .filter(|emp| emp.id != session.employee_id)
            .collect()
    }

    pub fn search_employees(
        &self,
        session: &Session,
        term: &str,
        department: Option<Department>,
    ) -> Vec<&Employee> {
        let needle = term.trim().to_lowercase();
        self.visible_employees(session)
            .into_iter()
            .filter(|emp| {
                needle.is_empty()
                    || emp.name.to_lowercase().contains(&needle)
                    || emp.email.to_lowercase().contains(&needle)
                    || emp.role.as_str().to_lowercase().contains(&needle)
            })
            .filter(|emp| department.is_none_or(|dept| emp.department == dept))
            .collect()
    }

    /// Looks up a visible employee. Hidden records read as missing.
    pub fn employee(&self, session: &Session, id: &str) -> HrResult<&Employee> {
        self.repo
            .employee(id)
            .filter(|emp| self.can_view(session, emp))
            .ok_or_else(|| HrError::not_found("employee", id))
    }

    pub fn manager_name(&self, employee_id: &str) -> Option<&str> {
        let manager_id = self.repo.employee(employee_id)?.reporting_manager_id.as_deref()?;
        self.repo.employee(manager_id).map(|mgr| mgr.name.as_str())
    }

    pub fn direct_reports(&self, manager_id: &str) -> Vec<&Employee> {
        self.repo
            .employees()
            .iter()
            .filter(|emp| emp.reporting_manager_id.as_deref() == Some(manager_id))
            .collect()
    }

    pub(crate) fn can_view(&self, session: &Session, target: &Employee) -> bool {
        target.id == session.employee_id
            || self
                .policy
                .check(&PolicyContext::new(session.role, Action::View, target.role))
                .is_ok()
    }

    /// Pay and attendance of other people are only open to task assigners.
    pub(crate) fn personal_records_of(
        &self,
        session: &Session,
        employee_id: &str,
    ) -> HrResult<&Employee> {
        if employee_id != session.employee_id {
            self.policy.require_assigner(session.role)?;
        }
        self.employee(session, employee_id)
    }

    /// Resolves `target_id` into a team member the session may act on.
    pub(crate) fn team_member(
        &self,
        session: &Session,
        target_id: &str,
        action: Action,
    ) -> HrResult<&Employee> {
        let target = self
            .repo
            .employee(target_id)
            .ok_or_else(|| HrError::not_found("employee", target_id))?;
        if target.id == session.employee_id {
            return Err(HrError::InvalidInput(format!("cannot {action} yourself")));
        }
        self.policy
            .check(&PolicyContext::new(session.role, action, target.role))?;
        Ok(target)
    }
}
