//! Background task dispatch.
//!
//! Tasks are plain descriptions (parent id plus operation kind). The queue
//! behind [`JobQueueEffects`] must run at most one task per [`TaskKey`] at a
//! time; retries and backoff belong to the queue, not to the tasks.

use crate::{ObjectId, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A unit of background access work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AccessTask {
    /// Copy the parent's access-control entries onto its file members
    CopyPermissions {
        /// Parent work id
        parent: ObjectId,
    },
    /// Copy the parent's visibility onto its file members
    CopyVisibility {
        /// Parent work id
        parent: ObjectId,
    },
}

impl AccessTask {
    /// Parent the task operates on.
    pub fn parent(&self) -> &ObjectId {
        match self {
            AccessTask::CopyPermissions { parent } | AccessTask::CopyVisibility { parent } => {
                parent
            }
        }
    }

    /// Queue the task is routed to.
    pub fn queue_name(&self) -> &'static str {
        match self {
            AccessTask::CopyPermissions { .. } => "permissions",
            AccessTask::CopyVisibility { .. } => "visibility",
        }
    }

    /// Serialization key: at most one task per key runs at a time.
    pub fn key(&self) -> TaskKey {
        TaskKey {
            queue: self.queue_name(),
            parent: self.parent().clone(),
        }
    }

    /// Encode for transport.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from transport.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Per-object serialization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey {
    /// Queue name
    pub queue: &'static str,
    /// Parent id
    pub parent: ObjectId,
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.queue, self.parent)
    }
}

/// Job queue accepting access tasks.
#[async_trait]
pub trait JobQueueEffects: Send + Sync {
    /// Enqueue a task. Returns `false` when an identical key was already pending.
    async fn enqueue(&self, task: AccessTask) -> Result<bool>;
}

#[async_trait]
impl<T: JobQueueEffects + ?Sized> JobQueueEffects for Arc<T> {
    async fn enqueue(&self, task: AccessTask) -> Result<bool> {
        (**self).enqueue(task).await
    }
}
