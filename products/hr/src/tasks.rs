use chrono::NaiveDate;
use platform_authz::Action;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    HrError, HrModule, HrResult, Repository, Session, Task, TaskDraft, TaskStatus, require_text,
};

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn task_counts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> TaskCounts {
    tasks.into_iter().fold(TaskCounts::default(), |mut acc, task| {
        acc.total += 1;
        match task.status {
            TaskStatus::Pending => acc.pending += 1,
            TaskStatus::InProgress => acc.in_progress += 1,
            TaskStatus::Completed => acc.completed += 1,
        }
        acc
    })
}

/// Case-insensitive title/description match plus an optional status filter.
pub fn filter_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    term: &str,
    status: Option<TaskStatus>,
) -> Vec<&'a Task> {
    let needle = term.trim().to_lowercase();
    tasks
        .into_iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
        })
        .filter(|task| status.is_none_or(|s| task.status == s))
        .collect()
}

impl<R: Repository> HrModule<R> {
    #[instrument(skip(self, session, draft), fields(assigner = %session.employee_id))]
    pub fn create_task(
        &mut self,
        session: &Session,
        draft: TaskDraft,
        today: NaiveDate,
    ) -> HrResult<Task> {
        self.policy.require_assigner(session.role)?;
        let title = require_text("title", &draft.title)?;
        let description = require_text("description", &draft.description)?;
        let assignee = self.team_member(session, &draft.assigned_to, Action::AssignTask)?;
        let task = Task {
            id: format!("t-{}", Uuid::new_v4().simple()),
            title,
            description,
            assigned_to: assignee.id.clone(),
            assigned_by: session.employee_id.clone(),
            status: TaskStatus::Pending,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: today,
            updated_at: today,
        };
        info!(task_id = %task.id, assignee = %task.assigned_to, "task created");
        self.repo.insert_task(task.clone());
        Ok(task)
    }

    /// Only the assignee or the assigner may move a task.
    #[instrument(skip(self, session), fields(employee = %session.employee_id))]
    pub fn update_task_status(
        &mut self,
        session: &Session,
        task_id: &str,
        status: TaskStatus,
        today: NaiveDate,
    ) -> HrResult<Task> {
        let task = self
            .repo
            .task_mut(task_id)
            .ok_or_else(|| HrError::not_found("task", task_id))?;
        if task.assigned_to != session.employee_id && task.assigned_by != session.employee_id {
            return Err(HrError::not_found("task", task_id));
        }
        task.status = status;
        task.updated_at = today;
        info!(?status, "task status updated");
        Ok(task.clone())
    }

    pub fn my_tasks(&self, session: &Session) -> Vec<&Task> {
        self.repo
            .tasks()
            .iter()
            .filter(|task| task.assigned_to == session.employee_id)
            .collect()
    }

    pub fn assigned_by_me(&self, session: &Session) -> Vec<&Task> {
        self.repo
            .tasks()
            .iter()
            .filter(|task| task.assigned_by == session.employee_id)
            .collect()
    }

    pub fn tasks_for(&self, session: &Session, employee_id: &str) -> HrResult<Vec<&Task>> {
        let employee = self.employee(session, employee_id)?;
        Ok(self
            .repo
            .tasks()
            .iter()
            .filter(|task| task.assigned_to == employee.id)
            .collect())
    }
}
