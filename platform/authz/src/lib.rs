//! Access control over the organisation role hierarchy.
//!
//! Every rule compares role ranks strictly: a role only has authority over
//! roles with a larger rank number. Equal ranks (the COO/CTO pair) never see,
//! assign to, or message each other. `Founder / Director` bypasses the checks
//! for visibility and messaging.

mod role;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use role::{Role, UnknownRole};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("{subject} may not {action} {target}")]
    Denied {
        subject: Role,
        action: Action,
        target: Role,
    },
    #[error("{subject} may not assign tasks")]
    CannotAssign { subject: Role },
}

/// Anything in the directory that has an identity and a role.
pub trait Principal {
    fn id(&self) -> &str;
    fn role(&self) -> Role;
}

impl<T: Principal + ?Sized> Principal for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn role(&self) -> Role {
        (**self).role()
    }
}

/// Strict authority relation: `viewer` ranks above `target`.
pub fn outranks(viewer: Role, target: Role) -> bool {
    viewer.rank() < target.rank()
}

pub fn can_assign_tasks(role: Role) -> bool {
    role.rank() <= Role::TASK_ASSIGNER_FLOOR.rank()
}

pub fn can_message(sender: Role, receiver: Role) -> bool {
    sender.is_top() || outranks(sender, receiver)
}

pub fn outranks_label(viewer: &str, target: &str) -> bool {
    match (Role::parse(viewer), Role::parse(target)) {
        (Some(viewer), Some(target)) => outranks(viewer, target),
        _ => false,
    }
}

pub fn can_assign_tasks_label(role: &str) -> bool {
    Role::parse(role).is_some_and(can_assign_tasks)
}

pub fn can_message_label(sender: &str, receiver: &str) -> bool {
    match (Role::parse(sender), Role::parse(receiver)) {
        (Some(sender), Some(receiver)) => can_message(sender, receiver),
        _ => false,
    }
}

/// Records `viewer` may see, in input order.
///
/// The top role sees everything. Everyone else sees their own record plus
/// the records of roles they outrank.
pub fn visible_employees<'a, P, V>(all: &'a [P], viewer: &V) -> Vec<&'a P>
where
    P: Principal,
    V: Principal + ?Sized,
{
    let role = viewer.role();
    if role.is_top() {
        return all.iter().collect();
    }
    all.iter()
        .filter(|emp| emp.id() == viewer.id() || outranks(role, emp.role()))
        .collect()
}

/// Records whose role `viewer_role` outranks. No self or top-role special case.
pub fn subordinates<P: Principal>(all: &[P], viewer_role: Role) -> Vec<&P> {
    all.iter()
        .filter(|emp| outranks(viewer_role, emp.role()))
        .collect()
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    AssignTask,
    Message,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::View => "view",
            Action::AssignTask => "assign tasks to",
            Action::Message => "message",
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PolicyContext {
    pub subject: Role,
    pub action: Action,
    pub target: Role,
}

impl PolicyContext {
    pub fn new(subject: Role, action: Action, target: Role) -> Self {
        Self {
            subject,
            action,
            target,
        }
    }
}

/// Typed front door over the rule functions for callers that want an error.
#[derive(Default, Debug)]
pub struct PolicyEngine;

impl PolicyEngine {
    pub fn check(&self, ctx: &PolicyContext) -> Result<(), AuthzError> {
        let allowed = match ctx.action {
            Action::View => ctx.subject.is_top() || outranks(ctx.subject, ctx.target),
            Action::AssignTask => {
                if !can_assign_tasks(ctx.subject) {
                    debug!(subject = %ctx.subject, "task assignment denied");
                    return Err(AuthzError::CannotAssign {
                        subject: ctx.subject,
                    });
                }
                ctx.subject.is_top() || outranks(ctx.subject, ctx.target)
            }
            Action::Message => can_message(ctx.subject, ctx.target),
        };
        if allowed {
            Ok(())
        } else {
            debug!(
                subject = %ctx.subject,
                action = %ctx.action,
                target = %ctx.target,
                "policy check denied"
            );
            Err(AuthzError::Denied {
                subject: ctx.subject,
                action: ctx.action,
                target: ctx.target,
            })
        }
    }

    pub fn require_assigner(&self, subject: Role) -> Result<(), AuthzError> {
        if can_assign_tasks(subject) {
            Ok(())
        } else {
            Err(AuthzError::CannotAssign { subject })
        }
    }
}
