use async_graphql::SimpleObject;
use platform_authz::{Role, can_assign_tasks, can_message};
use products_hr::{Employee, HrModule, HrResult, Repository, Session};

#[derive(Clone, Debug, SimpleObject)]
pub struct MePayload {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub employee: Employee,
    pub manager_name: Option<String>,
    pub can_assign_tasks: bool,
    pub unread_messages: usize,
    /// Team members this employee may message.
    pub messageable: Vec<Employee>,
}

impl MePayload {
    pub fn from_session<R: Repository>(hr: &HrModule<R>, session: &Session) -> HrResult<Self> {
        let employee = hr.employee(session, &session.employee_id)?.clone();
        let messageable = hr
            .team(session)
            .into_iter()
            .filter(|emp| can_message(session.role, emp.role))
            .cloned()
            .collect();
        Ok(Self {
            id: session.employee_id.clone(),
            name: session.name.clone(),
            role: session.role,
            manager_name: hr.manager_name(&session.employee_id).map(str::to_string),
            can_assign_tasks: can_assign_tasks(session.role),
            unread_messages: hr.unread_count(session),
            messageable,
            employee,
        })
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RolePayload {
    pub role: Role,
    pub label: String,
    pub rank: u8,
    pub can_assign_tasks: bool,
}

impl From<Role> for RolePayload {
    fn from(role: Role) -> Self {
        Self {
            role,
            label: role.as_str().to_string(),
            rank: role.rank(),
            can_assign_tasks: can_assign_tasks(role),
        }
    }
}
