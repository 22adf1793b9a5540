//! Command handlers.

pub mod deactivate;
pub mod list;
pub mod notifications;
pub mod permissions;
pub mod sweep;

use curate_access::{
    ChildStatus, LifecyclePolicy, PropagationReport, TaskOutcome, TaskRunner, VisibilityLifecycle,
};
use curate_core::{CurateConfig, Principal};
use curate_effects::CurateEffectSystem;
use tracing::warn;

/// Effect system, configuration and acting principal for one invocation.
pub struct Session {
    pub config: CurateConfig,
    pub effects: CurateEffectSystem,
    pub principal: Principal,
}

impl Session {
    pub fn new(config: CurateConfig, user: &str, groups: Vec<String>) -> Self {
        let effects = CurateEffectSystem::from_config(&config);
        let principal = groups
            .into_iter()
            .fold(Principal::new(user), Principal::with_group);
        Self {
            config,
            effects,
            principal,
        }
    }

    pub fn lifecycle(&self) -> VisibilityLifecycle<'_, CurateEffectSystem> {
        VisibilityLifecycle::with_policy(&self.effects, LifecyclePolicy::from_config(&self.config))
    }

    /// Run queued tasks before the process exits; the queue is in memory.
    pub async fn drain_tasks(&self) {
        let queue = self.effects.queue().clone();
        let results = TaskRunner::new(&self.effects)
            .run_until_empty(|| queue.pop())
            .await;
        for (task, result) in results {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    println!("{}: {e}", task.key());
                    continue;
                }
            };
            if outcome.failures() > 0 {
                warn!(
                    key = %task.key(),
                    failures = outcome.failures(),
                    "task finished with member failures"
                );
            }
            match &outcome {
                TaskOutcome::Permissions(PropagationReport::NotApplicable { reason, .. })
                | TaskOutcome::NotApplicable { reason, .. } => {
                    println!("{}: not applicable ({reason})", task.key());
                }
                TaskOutcome::Permissions(PropagationReport::Completed { children, .. })
                | TaskOutcome::Visibility { children, .. } => {
                    println!("{}:", task.key());
                    for child in children {
                        println!("  {}: {}", child.id, describe(&child.status));
                    }
                }
            }
        }
    }
}

fn describe(status: &ChildStatus) -> String {
    match status {
        ChildStatus::Updated => "updated".to_string(),
        ChildStatus::Unchanged => "unchanged".to_string(),
        ChildStatus::NotApplicable => "not applicable".to_string(),
        ChildStatus::Skipped(reason) => format!("skipped, {reason}"),
        ChildStatus::Failed(e) => format!("failed, {e}"),
    }
}
