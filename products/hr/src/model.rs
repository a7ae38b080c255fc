use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use platform_authz::{Principal, Role};
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Department {
    Executive,
    Engineering,
    Product,
    Marketing,
    Sales,
    #[serde(rename = "Human Resources")]
    HumanResources,
    Finance,
    Operations,
    #[serde(rename = "Customer Success")]
    CustomerSuccess,
}

impl Department {
    pub fn as_str(self) -> &'static str {
        match self {
            Department::Executive => "Executive",
            Department::Engineering => "Engineering",
            Department::Product => "Product",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::HumanResources => "Human Resources",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::CustomerSuccess => "Customer Success",
        }
    }
}

/// With the `graphql` feature the derived `id`/`role` field resolvers are
/// inherent methods and shadow [`Principal`]; call `Principal::role(emp)` or
/// read the fields directly.
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Department,
    pub reporting_manager_id: Option<String>,
    /// Monthly gross, whole currency units.
    pub salary: i64,
    pub join_date: NaiveDate,
}

impl Principal for Employee {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        self.role
    }
}

#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    pub assigned_by: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

/// Input for a new task; the assigner comes from the session.
#[cfg_attr(feature = "graphql", derive(async_graphql::InputObject))]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    #[serde(default)]
    #[cfg_attr(feature = "graphql", graphql(default))]
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
}

#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(rename = "Half Day")]
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    /// Statuses that imply the employee clocked in.
    pub fn is_on_site(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::HalfDay)
    }
}

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl AttendanceRecord {
    pub fn record_id(employee_id: &str, date: NaiveDate) -> String {
        format!("att-{employee_id}-{}", date.format("%Y-%m-%d"))
    }
}

#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Direct,
    Feedback,
    Instruction,
}

#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "graphql", graphql(name = "type"))]
    pub kind: MessageType,
    pub subject: String,
    pub content: String,
    pub task_id: Option<String>,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[cfg_attr(feature = "graphql", derive(async_graphql::InputObject))]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub receiver_id: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "graphql", graphql(name = "type"))]
    pub kind: MessageType,
    pub subject: String,
    pub content: String,
    pub task_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statuses_serialize_with_display_labels() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("In Progress")
        );
        assert_eq!(
            serde_json::to_value(AttendanceStatus::HalfDay).unwrap(),
            json!("Half Day")
        );
        assert_eq!(
            serde_json::to_value(MessageType::Instruction).unwrap(),
            json!("instruction")
        );
        assert_eq!(
            serde_json::to_value(Department::CustomerSuccess).unwrap(),
            json!("Customer Success")
        );
    }

    #[test]
    fn employee_json_uses_camel_case() {
        let raw = json!({
            "id": "9",
            "name": "Ashwin Krishnan",
            "email": "ashwin.krishnan@cognifyz.com",
            "role": "Manager",
            "department": "Engineering",
            "reportingManagerId": "7",
            "salary": 150000,
            "joinDate": "2020-01-20"
        });
        let emp: Employee = serde_json::from_value(raw).unwrap();
        assert_eq!(emp.role, Role::Manager);
        assert_eq!(emp.reporting_manager_id.as_deref(), Some("7"));
        assert_eq!(emp.join_date, NaiveDate::from_ymd_opt(2020, 1, 20).unwrap());
    }

    #[test]
    fn attendance_ids_are_keyed_by_employee_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
        assert_eq!(AttendanceRecord::record_id("17", date), "att-17-2024-11-04");
    }
}
