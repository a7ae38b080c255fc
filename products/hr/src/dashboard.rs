use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    AttendanceRecord, AttendanceStats, HrModule, Repository, Session, TaskCounts, task_counts,
};

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub tasks: TaskCounts,
    /// Visible employees other than the viewer.
    pub team_size: usize,
    pub unread_messages: usize,
    pub today: Option<AttendanceRecord>,
    /// The viewer's own attendance over every recorded day.
    pub attendance: AttendanceStats,
}

impl<R: Repository> HrModule<R> {
    pub fn dashboard(&self, session: &Session, today: NaiveDate) -> DashboardSummary {
        DashboardSummary {
            tasks: task_counts(self.my_tasks(session)),
            team_size: self.team(session).len(),
            unread_messages: self.unread_count(session),
            today: self.attendance_on(&session.employee_id, today).cloned(),
            attendance: AttendanceStats::from_records(self.my_attendance(session)),
        }
    }
}
