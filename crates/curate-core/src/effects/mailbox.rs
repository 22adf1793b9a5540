//! Operator notification mailbox.

use crate::{Result, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A message in a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Message id
    pub id: Uuid,
    /// Recipient
    pub recipient: UserId,
    /// Short subject line
    pub subject: String,
    /// Message body
    pub body: String,
    /// Delivery time
    pub created_at: DateTime<Utc>,
}

/// Per-user message store.
#[async_trait]
pub trait MailboxEffects: Send + Sync {
    /// Deliver a message.
    async fn deliver(&self, notification: Notification) -> Result<()>;

    /// Messages for `user`, newest first.
    async fn inbox(&self, user: &UserId) -> Result<Vec<Notification>>;

    /// Remove one message. Returns whether it existed in `user`'s inbox.
    async fn remove(&self, user: &UserId, id: Uuid) -> Result<bool>;

    /// Remove every message for `user`. Returns how many were removed.
    async fn clear(&self, user: &UserId) -> Result<usize>;
}

#[async_trait]
impl<T: MailboxEffects + ?Sized> MailboxEffects for Arc<T> {
    async fn deliver(&self, notification: Notification) -> Result<()> {
        (**self).deliver(notification).await
    }

    async fn inbox(&self, user: &UserId) -> Result<Vec<Notification>> {
        (**self).inbox(user).await
    }

    async fn remove(&self, user: &UserId, id: Uuid) -> Result<bool> {
        (**self).remove(user, id).await
    }

    async fn clear(&self, user: &UserId) -> Result<usize> {
        (**self).clear(user).await
    }
}
