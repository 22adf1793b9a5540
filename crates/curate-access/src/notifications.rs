//! Operator mailbox.

use crate::batch::BatchReport;
use curate_core::effects::{MailboxEffects, Notification, PhysicalTimeEffects};
use curate_core::{Result, UserId};
use std::fmt::Write as _;
use tracing::{debug, info};
use uuid::Uuid;

/// Alert shown after clearing an inbox.
pub const DELETED_ALL: &str = "Notifications have been deleted";
/// Alert shown after deleting one message.
pub const DELETED_ONE: &str = "Notification deleted";
/// Alert shown when the message does not exist.
pub const NOT_FOUND: &str = "Notification not found";

/// One user's view of their inbox.
#[derive(Debug)]
pub struct UserMailbox<'a, E> {
    effects: &'a E,
    user: UserId,
}

impl<'a, E> UserMailbox<'a, E>
where
    E: MailboxEffects,
{
    /// Mailbox of `user`.
    pub fn new(effects: &'a E, user: UserId) -> Self {
        Self { effects, user }
    }

    /// Owner.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Messages, newest first.
    pub async fn inbox(&self) -> Result<Vec<Notification>> {
        self.effects.inbox(&self.user).await
    }

    /// Remove every message and return the alert text.
    pub async fn delete_all(&self) -> Result<String> {
        let removed = self.effects.clear(&self.user).await?;
        info!(user = %self.user, removed, "notifications cleared");
        Ok(DELETED_ALL.to_string())
    }

    /// Remove one message by id and return the alert text.
    ///
    /// Ids that do not parse, or that belong to another user, read as not found.
    pub async fn destroy(&self, id: &str) -> Result<String> {
        let Ok(id) = Uuid::parse_str(id.trim()) else {
            debug!(user = %self.user, id, "notification id does not parse");
            return Ok(NOT_FOUND.to_string());
        };
        if self.effects.remove(&self.user, id).await? {
            Ok(DELETED_ONE.to_string())
        } else {
            Ok(NOT_FOUND.to_string())
        }
    }
}

/// Delivers operator notifications.
#[derive(Debug)]
pub struct Notifier<'a, E> {
    effects: &'a E,
}

impl<'a, E> Notifier<'a, E>
where
    E: MailboxEffects + PhysicalTimeEffects,
{
    /// Notifier over `effects`.
    pub fn new(effects: &'a E) -> Self {
        Self { effects }
    }

    /// Deliver a message stamped with the current time.
    pub async fn notify(
        &self,
        recipient: &UserId,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient: recipient.clone(),
            subject: subject.into(),
            body: body.into(),
            created_at: self.effects.now().await,
        };
        self.effects.deliver(notification.clone()).await?;
        debug!(recipient = %recipient, id = %notification.id, "notification delivered");
        Ok(notification)
    }

    /// Deliver the summary of a batch deactivation.
    pub async fn report_batch(
        &self,
        recipient: &UserId,
        subject: &str,
        report: &BatchReport,
    ) -> Result<Notification> {
        self.notify(recipient, subject, batch_body(report)).await
    }
}

fn batch_body(report: &BatchReport) -> String {
    let mut body = report.message();
    for entry in &report.entries {
        let _ = write!(body, "\n- {}: {}", entry.id, entry.outcome);
    }
    body
}
