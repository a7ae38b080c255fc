mod errors;
mod me;

use std::sync::Arc;

use anyhow::anyhow;
use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, ID, Object, Schema, SimpleObject,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use platform_api::ApiError;
use platform_authz::Role;
use products_hr::{
    AttendanceRecord, AttendanceStats, AttendanceStatus, DashboardSummary, Department, Employee,
    HrModule, Message, MessageDraft, SalaryBreakdown, Session, Task, TaskDraft, TaskStatus,
    TeamSalary, filter_tasks,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::instrument;

pub use me::{MePayload, RolePayload};

use errors::hr_error;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;
pub type SharedHr = Arc<RwLock<HrModule>>;

/// Source of "today" and "now" for attendance, tasks and messages.
#[derive(Clone, Copy, Debug, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Clone)]
pub struct GraphqlData {
    pub hr: SharedHr,
    pub clock: Clock,
}

pub fn build_schema(data: GraphqlData) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(data)
        .finish()
}

/// SDL snapshot; resolvers are not run so no data is attached.
pub fn sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

fn data<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a GraphqlData> {
    ctx.data_opt::<GraphqlData>().ok_or_else(|| {
        ApiError::internal(anyhow!("schema built without GraphqlData")).extend()
    })
}

fn session<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Session> {
    ctx.data_opt::<Session>()
        .ok_or_else(|| ApiError::Unauthorized.extend())
}

fn owned<T: Clone>(items: Vec<&T>) -> Vec<T> {
    items.into_iter().cloned().collect()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> async_graphql::Result<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> async_graphql::Result<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    /// The role hierarchy, most senior first.
    async fn roles(&self) -> Vec<RolePayload> {
        Role::ALL.into_iter().map(RolePayload::from).collect()
    }

    #[instrument(name = "graphql.me", skip_all)]
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<MePayload> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        MePayload::from_session(&hr, session).map_err(hr_error)
    }

    #[instrument(name = "graphql.employees", skip_all)]
    async fn employees(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        department: Option<Department>,
    ) -> async_graphql::Result<Vec<Employee>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        let term = search.unwrap_or_default();
        Ok(owned(hr.search_employees(session, &term, department)))
    }

    async fn employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<Employee>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(hr.employee(session, id.as_str()).ok().cloned())
    }

    /// Visible employees other than the caller.
    async fn team(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Employee>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(owned(hr.team(session)))
    }

    async fn direct_reports(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Employee>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(owned(hr.direct_reports(&session.employee_id)))
    }

    #[instrument(name = "graphql.my_tasks", skip_all)]
    async fn my_tasks(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        status: Option<TaskStatus>,
    ) -> async_graphql::Result<Vec<Task>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        let term = search.unwrap_or_default();
        Ok(owned(filter_tasks(hr.my_tasks(session), &term, status)))
    }

    async fn assigned_tasks(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        status: Option<TaskStatus>,
    ) -> async_graphql::Result<Vec<Task>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        let term = search.unwrap_or_default();
        Ok(owned(filter_tasks(hr.assigned_by_me(session), &term, status)))
    }

    async fn tasks_for(&self, ctx: &Context<'_>, employee_id: ID) -> async_graphql::Result<Vec<Task>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        hr.tasks_for(session, employee_id.as_str())
            .map(owned)
            .map_err(hr_error)
    }

    async fn inbox(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Message>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(owned(hr.inbox(session)))
    }

    async fn sent(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Message>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(owned(hr.sent(session)))
    }

    async fn unread_count(&self, ctx: &Context<'_>) -> async_graphql::Result<usize> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(hr.unread_count(session))
    }

    async fn my_attendance(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AttendanceRecord>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(owned(hr.my_attendance(session)))
    }

    async fn attendance_for(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
    ) -> async_graphql::Result<Vec<AttendanceRecord>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        hr.attendance_for(session, employee_id.as_str())
            .map(owned)
            .map_err(hr_error)
    }

    /// Stats for the caller, or for `employeeId` when the caller can assign work.
    async fn attendance_stats(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<ID>,
    ) -> async_graphql::Result<AttendanceStats> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        let records = match employee_id {
            Some(id) => hr.attendance_for(session, id.as_str()).map_err(hr_error)?,
            None => hr.my_attendance(session),
        };
        Ok(AttendanceStats::from_records(records))
    }

    async fn my_salary(&self, ctx: &Context<'_>) -> async_graphql::Result<SalaryBreakdown> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        hr.my_salary(session).map_err(hr_error)
    }

    async fn team_salaries(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TeamSalary>> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        Ok(hr.team_salaries(session))
    }

    async fn salary_for(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
    ) -> async_graphql::Result<SalaryBreakdown> {
        let session = session(ctx)?;
        let hr = data(ctx)?.hr.read().await;
        hr.salary_for(session, employee_id.as_str())
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.dashboard", skip_all)]
    async fn dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<DashboardSummary> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let hr = data.hr.read().await;
        Ok(hr.dashboard(session, data.clock.today()))
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.create_task", skip_all)]
    async fn create_task(&self, ctx: &Context<'_>, input: TaskDraft) -> async_graphql::Result<Task> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let mut hr = data.hr.write().await;
        hr.create_task(session, input, data.clock.today())
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.update_task_status", skip_all)]
    async fn update_task_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: TaskStatus,
    ) -> async_graphql::Result<Task> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let mut hr = data.hr.write().await;
        hr.update_task_status(session, id.as_str(), status, data.clock.today())
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.send_message", skip_all)]
    async fn send_message(
        &self,
        ctx: &Context<'_>,
        input: MessageDraft,
    ) -> async_graphql::Result<Message> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let mut hr = data.hr.write().await;
        hr.send_message(session, input, data.clock.now())
            .map_err(hr_error)
    }

    async fn mark_message_read(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Message> {
        let session = session(ctx)?;
        let mut hr = data(ctx)?.hr.write().await;
        hr.mark_message_read(session, id.as_str()).map_err(hr_error)
    }

    async fn mark_attendance(
        &self,
        ctx: &Context<'_>,
        status: AttendanceStatus,
    ) -> async_graphql::Result<AttendanceRecord> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let now = data.clock.now();
        let mut hr = data.hr.write().await;
        hr.mark_attendance(session, status, now.date(), now.time())
            .map_err(hr_error)
    }

    async fn check_in(&self, ctx: &Context<'_>) -> async_graphql::Result<AttendanceRecord> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let now = data.clock.now();
        let mut hr = data.hr.write().await;
        hr.check_in(session, now.date(), now.time()).map_err(hr_error)
    }

    async fn check_out(&self, ctx: &Context<'_>) -> async_graphql::Result<AttendanceRecord> {
        let session = session(ctx)?;
        let data = data(ctx)?;
        let now = data.clock.now();
        let mut hr = data.hr.write().await;
        hr.check_out(session, now.date(), now.time()).map_err(hr_error)
    }

    #[instrument(name = "graphql.update_attendance", skip_all)]
    async fn update_attendance(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> async_graphql::Result<AttendanceRecord> {
        let session = session(ctx)?;
        let mut hr = data(ctx)?.hr.write().await;
        hr.update_attendance(session, employee_id.as_str(), date, status)
            .map_err(hr_error)
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Request, Response, Value, Variables};
    use serde_json::{Value as Json, json};

    fn fixed_clock() -> Clock {
        Clock::Fixed(
            NaiveDate::from_ymd_opt(2024, 12, 9)
                .unwrap()
                .and_hms_opt(9, 12, 30)
                .unwrap(),
        )
    }

    fn schema() -> (SchemaType, SharedHr) {
        let hr = Arc::new(RwLock::new(HrModule::demo()));
        let schema = build_schema(GraphqlData {
            hr: hr.clone(),
            clock: fixed_clock(),
        });
        (schema, hr)
    }

    async fn exec_as(
        schema: &SchemaType,
        hr: &SharedHr,
        employee: &str,
        query: &str,
        vars: Json,
    ) -> Response {
        let session = hr.read().await.session(employee).unwrap();
        let request = Request::new(query)
            .variables(Variables::from_json(vars))
            .data(session);
        schema.execute(request).await
    }

    fn code(response: &Response) -> Option<Value> {
        response.errors.first().and_then(|err| {
            err.extensions
                .as_ref()
                .and_then(|map| map.get("code"))
                .cloned()
        })
    }

    #[tokio::test]
    async fn health_query_returns_ok() {
        let (schema, _) = schema();
        let response = schema.execute(Request::new("{ health { ok } }")).await;
        assert!(response.errors.is_empty());
        let body = response.data.into_json().unwrap();
        assert_eq!(body, json!({"health": {"ok": true}}));
    }

    #[tokio::test]
    async fn roles_list_the_hierarchy() {
        let (schema, _) = schema();
        let response = schema
            .execute(Request::new("{ roles { label rank canAssignTasks } }"))
            .await;
        assert!(response.errors.is_empty());
        let body = response.data.into_json().unwrap();
        let roles = body["roles"].as_array().unwrap();
        assert_eq!(roles.len(), 12);
        assert_eq!(roles[0], json!({"label": "Founder / Director", "rank": 0, "canAssignTasks": true}));
        assert_eq!(roles[3]["label"], "CTO");
        assert_eq!(roles[3]["rank"], 2);
        assert_eq!(roles[8], json!({"label": "Team Lead", "rank": 7, "canAssignTasks": false}));
    }

    #[tokio::test]
    async fn session_is_required() {
        let (schema, _) = schema();
        let response = schema.execute(Request::new("{ me { id } }")).await;
        assert_eq!(code(&response), Some(Value::from("UNAUTHORIZED")));
    }

    #[tokio::test]
    async fn me_reports_permissions() {
        let (schema, hr) = schema();
        let response = exec_as(
            &schema,
            &hr,
            "9",
            "{ me { name role managerName canAssignTasks messageable { id } } }",
            json!({}),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let body = response.data.into_json().unwrap();
        assert_eq!(body["me"]["name"], "Ashwin Krishnan");
        assert_eq!(body["me"]["role"], "MANAGER");
        assert_eq!(body["me"]["managerName"], "Raghav Chandrasekar");
        assert_eq!(body["me"]["canAssignTasks"], true);
        assert_eq!(body["me"]["messageable"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn employees_are_filtered_by_visibility() {
        let (schema, hr) = schema();
        let response = exec_as(&schema, &hr, "3", "{ employees { id } }", json!({})).await;
        let body = response.data.into_json().unwrap();
        let ids: Vec<&str> = body["employees"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&"3"));
        assert!(!ids.contains(&"4"), "CTO must not see the COO");
        assert!(!ids.contains(&"2"));

        let response = exec_as(
            &schema,
            &hr,
            "3",
            r#"query($id: ID!) { employee(id: $id) { id } }"#,
            json!({"id": "4"}),
        )
        .await;
        assert!(response.errors.is_empty());
        assert!(response.data.into_json().unwrap()["employee"].is_null());
    }

    #[tokio::test]
    async fn task_assignment_flow() {
        let (schema, hr) = schema();
        let create = r#"
            mutation Create($input: TaskDraft!) {
                createTask(input: $input) { id status priority assignedBy createdAt }
            }
        "#;
        let vars = json!({
            "input": {
                "title": "Prepare sprint demo",
                "description": "Show the new login flow",
                "assignedTo": "17",
                "priority": "HIGH",
                "dueDate": "2024-12-13"
            }
        });
        let response = exec_as(&schema, &hr, "9", create, vars.clone()).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let body = response.data.into_json().unwrap();
        let task = &body["createTask"];
        assert_eq!(task["status"], "PENDING");
        assert_eq!(task["priority"], "HIGH");
        assert_eq!(task["assignedBy"], "9");
        assert_eq!(task["createdAt"], "2024-12-09");
        let task_id = task["id"].as_str().unwrap().to_string();

        let denied = exec_as(&schema, &hr, "13", create, vars).await;
        assert_eq!(code(&denied), Some(Value::from("FORBIDDEN")));

        let update = r#"
            mutation Move($id: ID!) { updateTaskStatus(id: $id, status: IN_PROGRESS) { status } }
        "#;
        let moved = exec_as(&schema, &hr, "17", update, json!({"id": task_id})).await;
        assert!(moved.errors.is_empty(), "{:?}", moved.errors);
        assert_eq!(
            moved.data.into_json().unwrap()["updateTaskStatus"]["status"],
            "IN_PROGRESS"
        );

        let mine = exec_as(
            &schema,
            &hr,
            "17",
            r#"{ myTasks(search: "sprint demo") { id } }"#,
            json!({}),
        )
        .await;
        let body = mine.data.into_json().unwrap();
        assert_eq!(body["myTasks"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn peers_cannot_message_each_other() {
        let (schema, hr) = schema();
        let send = r#"
            mutation Send($input: MessageDraft!) { sendMessage(input: $input) { id read type } }
        "#;
        let to_coo = json!({
            "input": {"receiverId": "4", "type": "DIRECT", "subject": "Sync", "content": "Got a minute?"}
        });
        let denied = exec_as(&schema, &hr, "3", send, to_coo).await;
        assert_eq!(code(&denied), Some(Value::from("FORBIDDEN")));

        let to_vp = json!({
            "input": {"receiverId": "5", "type": "INSTRUCTION", "subject": "Sync", "content": "Got a minute?"}
        });
        let sent = exec_as(&schema, &hr, "3", send, to_vp).await;
        assert!(sent.errors.is_empty(), "{:?}", sent.errors);
        let body = sent.data.into_json().unwrap();
        assert_eq!(body["sendMessage"]["read"], false);
        assert_eq!(body["sendMessage"]["type"], "INSTRUCTION");
    }

    #[tokio::test]
    async fn attendance_uses_the_clock() {
        let (schema, hr) = schema();
        let response = exec_as(
            &schema,
            &hr,
            "17",
            "mutation { checkIn { date status checkIn } }",
            json!({}),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let body = response.data.into_json().unwrap();
        assert_eq!(body["checkIn"]["date"], "2024-12-09");
        assert_eq!(body["checkIn"]["status"], "PRESENT");
        assert_eq!(body["checkIn"]["checkIn"], "09:12:00");

        let dash = exec_as(
            &schema,
            &hr,
            "17",
            "{ dashboard { teamSize today { status } attendance { total } } }",
            json!({}),
        )
        .await;
        let body = dash.data.into_json().unwrap();
        assert_eq!(body["dashboard"]["teamSize"], 1);
        assert_eq!(body["dashboard"]["today"]["status"], "PRESENT");
        assert_eq!(body["dashboard"]["attendance"]["total"], 27);
    }

    #[tokio::test]
    async fn team_salaries_need_assignment_rights() {
        let (schema, hr) = schema();
        let lead = exec_as(&schema, &hr, "13", "{ teamSalaries { employee { id } } }", json!({})).await;
        assert_eq!(
            lead.data.into_json().unwrap()["teamSalaries"],
            json!([])
        );
        let mine = exec_as(&schema, &hr, "13", "{ mySalary { gross net } }", json!({})).await;
        let body = mine.data.into_json().unwrap();
        assert_eq!(body["mySalary"]["gross"], 9_000_000);
        assert_eq!(body["mySalary"]["net"], 9_000_000 - 540_000 - 450_000);

        let other = exec_as(
            &schema,
            &hr,
            "13",
            r#"{ salaryFor(employeeId: "20") { gross } }"#,
            json!({}),
        )
        .await;
        assert_eq!(code(&other), Some(Value::from("FORBIDDEN")));
        let stats = exec_as(
            &schema,
            &hr,
            "13",
            r#"{ attendanceStats(employeeId: "20") { total } }"#,
            json!({}),
        )
        .await;
        assert_eq!(code(&stats), Some(Value::from("FORBIDDEN")));
    }

    #[tokio::test]
    async fn missing_schema_data_is_masked_as_internal() {
        let bare = Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish();
        let session = HrModule::demo().session("17").unwrap();
        let response = bare
            .execute(Request::new("{ unreadCount }").data(session))
            .await;
        assert_eq!(code(&response), Some(Value::from("INTERNAL")));
        assert_eq!(response.errors[0].message, "internal server error");
    }

    #[test]
    fn sdl_mentions_core_types() {
        let sdl = sdl();
        assert!(sdl.contains("type Employee"));
        assert!(sdl.contains("createTask"));
        assert!(sdl.contains("FOUNDER_DIRECTOR"));
    }
}
