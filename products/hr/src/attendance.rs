use chrono::{NaiveDate, NaiveTime, Timelike};
use platform_authz::Action;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    AttendanceRecord, AttendanceStatus, HrError, HrModule, HrResult, Repository, Session,
};

const SHIFT_START: (u32, u32) = (9, 0);
const SHIFT_END: (u32, u32) = (18, 0);
const HALF_DAY_END: (u32, u32) = (13, 0);

fn clock(hm: (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hm.0, hm.1, 0).unwrap_or(NaiveTime::MIN)
}

/// Attendance times are kept to the minute.
fn to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub half_day: usize,
    pub leave: usize,
    /// Whole percent of records marked Present.
    pub present_percentage: u32,
    /// Present days with half days counted as 0.5.
    pub effective_present: f64,
}

impl AttendanceStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut stats = records
            .into_iter()
            .fold(Self::default(), |mut acc, rec| {
                acc.total += 1;
                match rec.status {
                    AttendanceStatus::Present => acc.present += 1,
                    AttendanceStatus::Absent => acc.absent += 1,
                    AttendanceStatus::HalfDay => acc.half_day += 1,
                    AttendanceStatus::Leave => acc.leave += 1,
                }
                acc
            });
        if stats.total > 0 {
            stats.present_percentage =
                ((stats.present as f64 / stats.total as f64) * 100.0).round() as u32;
        }
        stats.effective_present = stats.present as f64 + stats.half_day as f64 * 0.5;
        stats
    }
}

impl<R: Repository> HrModule<R> {
    /// Replaces today's record for the session holder.
    #[instrument(skip(self, session), fields(employee = %session.employee_id))]
    pub fn mark_attendance(
        &mut self,
        session: &Session,
        status: AttendanceStatus,
        today: NaiveDate,
        now: NaiveTime,
    ) -> HrResult<AttendanceRecord> {
        let record = AttendanceRecord {
            id: AttendanceRecord::record_id(&session.employee_id, today),
            employee_id: session.employee_id.clone(),
            date: today,
            status,
            check_in: status.is_on_site().then(|| to_minute(now)),
            check_out: None,
            notes: None,
        };
        match self.repo.attendance_mut(&session.employee_id, today) {
            Some(existing) => *existing = record.clone(),
            None => self.repo.insert_attendance(record.clone()),
        }
        info!(?status, "attendance marked");
        Ok(record)
    }

    #[instrument(skip(self, session), fields(employee = %session.employee_id))]
    pub fn check_in(
        &mut self,
        session: &Session,
        today: NaiveDate,
        now: NaiveTime,
    ) -> HrResult<AttendanceRecord> {
        let at = to_minute(now);
        if let Some(existing) = self.repo.attendance_mut(&session.employee_id, today) {
            existing.status = AttendanceStatus::Present;
            existing.check_in = Some(at);
            return Ok(existing.clone());
        }
        let record = AttendanceRecord {
            id: AttendanceRecord::record_id(&session.employee_id, today),
            employee_id: session.employee_id.clone(),
            date: today,
            status: AttendanceStatus::Present,
            check_in: Some(at),
            check_out: None,
            notes: None,
        };
        self.repo.insert_attendance(record.clone());
        info!(%at, "checked in");
        Ok(record)
    }

    #[instrument(skip(self, session), fields(employee = %session.employee_id))]
    pub fn check_out(
        &mut self,
        session: &Session,
        today: NaiveDate,
        now: NaiveTime,
    ) -> HrResult<AttendanceRecord> {
        let existing = self
            .repo
            .attendance_mut(&session.employee_id, today)
            .ok_or(HrError::NoAttendanceToday)?;
        existing.check_out = Some(to_minute(now));
        Ok(existing.clone())
    }

    /// Manager override of a team member's record on any date.
    #[instrument(skip(self, session), fields(manager = %session.employee_id))]
    pub fn update_attendance(
        &mut self,
        session: &Session,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> HrResult<AttendanceRecord> {
        self.policy.require_assigner(session.role)?;
        if employee_id == session.employee_id {
            return Err(HrError::InvalidInput(
                "cannot override your own attendance".into(),
            ));
        }
        let target_id = self.team_member(session, employee_id, Action::View)?.id.clone();

        let default_out = match status {
            AttendanceStatus::Present => Some(clock(SHIFT_END)),
            AttendanceStatus::HalfDay => Some(clock(HALF_DAY_END)),
            _ => None,
        };
        let record = match self.repo.attendance_mut(&target_id, date) {
            Some(existing) => {
                existing.status = status;
                existing.check_in = if status.is_on_site() {
                    existing.check_in.or(Some(clock(SHIFT_START)))
                } else {
                    None
                };
                existing.check_out = match status {
                    AttendanceStatus::Present => existing.check_out.or(default_out),
                    _ => default_out,
                };
                existing.clone()
            }
            None => {
                let record = AttendanceRecord {
                    id: AttendanceRecord::record_id(&target_id, date),
                    employee_id: target_id.clone(),
                    date,
                    status,
                    check_in: status.is_on_site().then(|| clock(SHIFT_START)),
                    check_out: default_out,
                    notes: None,
                };
                self.repo.insert_attendance(record.clone());
                record
            }
        };
        info!(employee = %target_id, %date, ?status, "attendance overridden");
        Ok(record)
    }

    pub fn my_attendance(&self, session: &Session) -> Vec<&AttendanceRecord> {
        self.records_of(&session.employee_id)
    }

    /// Own records, or a visible employee's when the caller can assign work.
    pub fn attendance_for(
        &self,
        session: &Session,
        employee_id: &str,
    ) -> HrResult<Vec<&AttendanceRecord>> {
        let employee = self.personal_records_of(session, employee_id)?;
        Ok(self.records_of(&employee.id))
    }

    pub fn attendance_on(&self, employee_id: &str, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.repo
            .attendance()
            .iter()
            .find(|rec| rec.employee_id == employee_id && rec.date == date)
    }

    fn records_of(&self, employee_id: &str) -> Vec<&AttendanceRecord> {
        self.repo
            .attendance()
            .iter()
            .filter(|rec| rec.employee_id == employee_id)
            .collect()
    }
}
