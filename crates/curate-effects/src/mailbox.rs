//! Mailbox handlers.

use async_trait::async_trait;
use curate_core::effects::{MailboxEffects, Notification};
use curate_core::{CurateError, Result, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use uuid::Uuid;

fn newest_first(mut messages: Vec<Notification>) -> Vec<Notification> {
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages
}

/// In-memory mailbox
#[derive(Debug, Clone, Default)]
pub struct MemoryMailbox {
    boxes: Arc<RwLock<HashMap<UserId, Vec<Notification>>>>,
}

impl MemoryMailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MailboxEffects for MemoryMailbox {
    async fn deliver(&self, notification: Notification) -> Result<()> {
        self.boxes
            .write()
            .entry(notification.recipient.clone())
            .or_default()
            .push(notification);
        Ok(())
    }

    async fn inbox(&self, user: &UserId) -> Result<Vec<Notification>> {
        let messages = self.boxes.read().get(user).cloned().unwrap_or_default();
        Ok(newest_first(messages))
    }

    async fn remove(&self, user: &UserId, id: Uuid) -> Result<bool> {
        let mut boxes = self.boxes.write();
        let Some(messages) = boxes.get_mut(user) else {
            return Ok(false);
        };
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() != before)
    }

    async fn clear(&self, user: &UserId) -> Result<usize> {
        Ok(self
            .boxes
            .write()
            .remove(user)
            .map(|m| m.len())
            .unwrap_or(0))
    }
}

/// Mailbox persisted as one JSON file per recipient
#[derive(Debug, Clone)]
pub struct FilesystemMailbox {
    root: PathBuf,
}

impl FilesystemMailbox {
    /// Create a mailbox under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, user: &UserId) -> Result<PathBuf> {
        let raw = user.as_str();
        if raw.is_empty() || raw.starts_with('.') || raw.contains(['/', '\\']) {
            return Err(CurateError::invalid(format!(
                "user id '{raw}' cannot be used as a mailbox name"
            )));
        }
        Ok(self.root.join(format!("{raw}.json")))
    }

    async fn read(&self, user: &UserId) -> Result<Vec<Notification>> {
        let path = self.path_for(user)?;
        match fs::read(&path).await {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(CurateError::persist(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write(&self, user: &UserId, messages: &[Notification]) -> Result<()> {
        let path = self.path_for(user)?;
        fs::create_dir_all(&self.root).await.map_err(|e| {
            CurateError::persist(format!("failed to create {}: {e}", self.root.display()))
        })?;
        let body = serde_json::to_vec_pretty(messages)?;
        fs::write(&path, body)
            .await
            .map_err(|e| CurateError::persist(format!("failed to write {}: {e}", path.display())))
    }
}

#[async_trait]
impl MailboxEffects for FilesystemMailbox {
    async fn deliver(&self, notification: Notification) -> Result<()> {
        let user = notification.recipient.clone();
        let mut messages = self.read(&user).await?;
        messages.push(notification);
        self.write(&user, &messages).await
    }

    async fn inbox(&self, user: &UserId) -> Result<Vec<Notification>> {
        Ok(newest_first(self.read(user).await?))
    }

    async fn remove(&self, user: &UserId, id: Uuid) -> Result<bool> {
        let mut messages = self.read(user).await?;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Ok(false);
        }
        self.write(user, &messages).await?;
        Ok(true)
    }

    async fn clear(&self, user: &UserId) -> Result<usize> {
        let messages = self.read(user).await?;
        if !messages.is_empty() {
            self.write(user, &[]).await?;
        }
        Ok(messages.len())
    }
}
