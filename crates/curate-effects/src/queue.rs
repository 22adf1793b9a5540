//! In-memory keyed job queue.
//!
//! Pending tasks are coalesced by [`TaskKey`]: enqueueing a task whose key is
//! already waiting is a no-op. A task popped for execution frees its key, so
//! work submitted while it runs is queued again behind it. With a single
//! consumer this gives the at-most-one-per-key guarantee the access tasks
//! rely on.

use async_trait::async_trait;
use curate_core::effects::{AccessTask, JobQueueEffects, TaskKey};
use curate_core::Result;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<AccessTask>,
    keys: HashSet<TaskKey>,
}

/// FIFO queue of access tasks
#[derive(Debug, Clone, Default)]
pub struct MemoryJobQueue {
    state: Arc<Mutex<QueueState>>,
}

impl MemoryJobQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest pending task
    pub fn pop(&self) -> Option<AccessTask> {
        let mut state = self.state.lock();
        let task = state.pending.pop_front()?;
        state.keys.remove(&task.key());
        Some(task)
    }

    /// Snapshot of pending tasks, oldest first
    pub fn pending(&self) -> Vec<AccessTask> {
        self.state.lock().pending.iter().cloned().collect()
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }
}

#[async_trait]
impl JobQueueEffects for MemoryJobQueue {
    async fn enqueue(&self, task: AccessTask) -> Result<bool> {
        let mut state = self.state.lock();
        if !state.keys.insert(task.key()) {
            tracing::debug!(key = %task.key(), "task already pending, coalesced");
            return Ok(false);
        }
        tracing::debug!(key = %task.key(), "task enqueued");
        state.pending.push_back(task);
        Ok(true)
    }
}
