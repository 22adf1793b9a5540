//! Execution of queued access tasks.
//!
//! The runner holds no queue of its own. Callers pop tasks from whatever
//! queue they use and hand them over one at a time, which keeps per-key
//! serialization a property of the queue.

use crate::fanout::{copy_visibility_to_members, ChildOutcome};
use crate::propagation::{PermissionPropagator, PropagationReport};
use curate_core::effects::{AccessTask, ObjectStoreEffects, PhysicalTimeEffects};
use curate_core::{CurateError, ObjectId, Result};
use tracing::{debug, info, warn};

/// Result of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Permission propagation ran
    Permissions(PropagationReport),
    /// Visibility was copied onto members
    Visibility {
        /// Parent work
        parent: ObjectId,
        /// One outcome per member
        children: Vec<ChildOutcome>,
    },
    /// Visibility task whose parent vanished or carries no members
    NotApplicable {
        /// Requested parent
        parent: ObjectId,
        /// Why
        reason: String,
    },
}

impl TaskOutcome {
    /// Member failures reported by the task.
    pub fn failures(&self) -> usize {
        match self {
            TaskOutcome::Permissions(report) => report.failures().len(),
            TaskOutcome::Visibility { children, .. } => {
                children.iter().filter(|c| c.status.is_failure()).count()
            }
            TaskOutcome::NotApplicable { .. } => 0,
        }
    }
}

/// Runs [`AccessTask`]s against an effect system.
#[derive(Debug)]
pub struct TaskRunner<'a, E> {
    effects: &'a E,
}

impl<'a, E> TaskRunner<'a, E>
where
    E: ObjectStoreEffects + PhysicalTimeEffects,
{
    /// Runner over `effects`.
    pub fn new(effects: &'a E) -> Self {
        Self { effects }
    }

    /// Execute one task.
    pub async fn run(&self, task: &AccessTask) -> Result<TaskOutcome> {
        debug!(key = %task.key(), "running task");
        match task {
            AccessTask::CopyPermissions { parent } => {
                let report = PermissionPropagator::new(self.effects).run(parent).await?;
                Ok(TaskOutcome::Permissions(report))
            }
            AccessTask::CopyVisibility { parent } => self.copy_visibility(parent).await,
        }
    }

    /// Pop and run tasks until `next` yields nothing.
    ///
    /// A failing task is logged and returned in its slot; later tasks still run.
    pub async fn run_until_empty<F>(&self, mut next: F) -> Vec<(AccessTask, Result<TaskOutcome>)>
    where
        F: FnMut() -> Option<AccessTask>,
    {
        let mut results = Vec::new();
        while let Some(task) = next() {
            let result = self.run(&task).await;
            if let Err(e) = &result {
                warn!(key = %task.key(), error = %e, "task failed");
            }
            results.push((task, result));
        }
        if !results.is_empty() {
            info!(tasks = results.len(), "task queue drained");
        }
        results
    }

    async fn copy_visibility(&self, parent_id: &ObjectId) -> Result<TaskOutcome> {
        let parent = match self.effects.load(parent_id).await {
            Ok(parent) => parent,
            Err(CurateError::NotFound { message }) => {
                return Ok(TaskOutcome::NotApplicable {
                    parent: parent_id.clone(),
                    reason: message,
                })
            }
            Err(e) => return Err(e),
        };
        if parent.members().is_none() {
            return Ok(TaskOutcome::NotApplicable {
                parent: parent_id.clone(),
                reason: format!("{parent_id} does not carry file members"),
            });
        }
        let children = copy_visibility_to_members(self.effects, &parent).await;
        Ok(TaskOutcome::Visibility {
            parent: parent_id.clone(),
            children,
        })
    }
}
