use chrono::NaiveDateTime;
use platform_authz::Action;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    HrError, HrModule, HrResult, Message, MessageDraft, Repository, Session, require_text,
};

impl<R: Repository> HrModule<R> {
    #[instrument(skip(self, session, draft), fields(sender = %session.employee_id))]
    pub fn send_message(
        &mut self,
        session: &Session,
        draft: MessageDraft,
        now: NaiveDateTime,
    ) -> HrResult<Message> {
        let subject = require_text("subject", &draft.subject)?;
        let content = require_text("content", &draft.content)?;
        let receiver = self.team_member(session, &draft.receiver_id, Action::Message)?;
        let task_id = draft
            .task_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        if let Some(id) = task_id.as_deref()
            && !self.repo.tasks().iter().any(|task| task.id == id)
        {
            return Err(HrError::not_found("task", id));
        }
        let message = Message {
            id: format!("m-{}", Uuid::new_v4().simple()),
            sender_id: session.employee_id.clone(),
            receiver_id: receiver.id.clone(),
            kind: draft.kind,
            subject,
            content,
            task_id,
            read: false,
            created_at: now,
        };
        info!(message_id = %message.id, receiver = %message.receiver_id, "message sent");
        self.repo.insert_message(message.clone());
        Ok(message)
    }

    /// Only the receiver may mark a message as read.
    pub fn mark_message_read(&mut self, session: &Session, message_id: &str) -> HrResult<Message> {
        let message = self
            .repo
            .message_mut(message_id)
            .filter(|msg| msg.receiver_id == session.employee_id)
            .ok_or_else(|| HrError::not_found("message", message_id))?;
        message.read = true;
        Ok(message.clone())
    }

    pub fn inbox(&self, session: &Session) -> Vec<&Message> {
        self.repo
            .messages()
            .iter()
            .filter(|msg| msg.receiver_id == session.employee_id)
            .collect()
    }

    pub fn sent(&self, session: &Session) -> Vec<&Message> {
        self.repo
            .messages()
            .iter()
            .filter(|msg| msg.sender_id == session.employee_id)
            .collect()
    }

    pub fn unread_count(&self, session: &Session) -> usize {
        self.repo
            .messages()
            .iter()
            .filter(|msg| msg.receiver_id == session.employee_id && !msg.read)
            .count()
    }
}
