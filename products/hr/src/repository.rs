use chrono::NaiveDate;

use crate::model::{AttendanceRecord, Employee, Message, Task};

/// Storage seam for the HR module.
///
/// Collections are append/update only. Implementations keep insertion order
/// so listings stay stable.
pub trait Repository {
    fn employees(&self) -> &[Employee];

    fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees().iter().find(|emp| emp.id == id)
    }

    fn tasks(&self) -> &[Task];
    fn insert_task(&mut self, task: Task);
    fn task_mut(&mut self, id: &str) -> Option<&mut Task>;

    fn messages(&self) -> &[Message];
    fn insert_message(&mut self, message: Message);
    fn message_mut(&mut self, id: &str) -> Option<&mut Message>;

    fn attendance(&self) -> &[AttendanceRecord];
    fn attendance_mut(&mut self, employee_id: &str, date: NaiveDate)
    -> Option<&mut AttendanceRecord>;
    fn insert_attendance(&mut self, record: AttendanceRecord);
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    employees: Vec<Employee>,
    tasks: Vec<Task>,
    messages: Vec<Message>,
    attendance: Vec<AttendanceRecord>,
}

impl InMemoryRepository {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees,
            ..Self::default()
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_attendance(mut self, attendance: Vec<AttendanceRecord>) -> Self {
        self.attendance = attendance;
        self
    }
}

impl Repository for InMemoryRepository {
    fn employees(&self) -> &[Employee] {
        &self.employees
    }

    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn insert_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn insert_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|msg| msg.id == id)
    }

    fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    fn attendance_mut(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Option<&mut AttendanceRecord> {
        self.attendance
            .iter_mut()
            .find(|rec| rec.employee_id == employee_id && rec.date == date)
    }

    fn insert_attendance(&mut self, record: AttendanceRecord) {
        self.attendance.push(record);
    }
}
