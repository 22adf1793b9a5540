//! Copying a released visibility onto a work's file members.

use chrono::{DateTime, Utc};
use curate_core::effects::{ObjectStoreEffects, PhysicalTimeEffects};
use curate_core::{CurateError, ObjectId, RepositoryObject};
use tracing::{debug, warn};

/// What happened to one member during a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildStatus {
    /// Written
    Updated,
    /// Already in the target state, no write
    Unchanged,
    /// Member kind does not take part
    NotApplicable,
    /// Left alone on purpose
    Skipped(String),
    /// Load or save failed
    Failed(CurateError),
}

impl ChildStatus {
    /// True for [`ChildStatus::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, ChildStatus::Failed(_))
    }
}

/// Per-member outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildOutcome {
    /// Member id
    pub id: ObjectId,
    /// Result
    pub status: ChildStatus,
}

impl ChildOutcome {
    /// Pair a member with its status.
    pub fn new(id: ObjectId, status: ChildStatus) -> Self {
        Self { id, status }
    }
}

/// How the visibility of a deactivated object reached its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOut {
    /// Caller did not ask for members to be updated
    NotRequested,
    /// Object carries no members
    NoMembers,
    /// Members were updated in the same call
    Inline(Vec<ChildOutcome>),
    /// A visibility task was handed to the queue
    Queued {
        /// `false` when an identical task was already pending
        newly: bool,
    },
    /// The queue refused the task; the object itself was still saved
    EnqueueFailed(CurateError),
}

impl FanOut {
    /// Member failures, inline or enqueue.
    pub fn failures(&self) -> usize {
        match self {
            FanOut::Inline(children) => children.iter().filter(|c| c.status.is_failure()).count(),
            FanOut::EnqueueFailed(_) => 1,
            FanOut::NotRequested | FanOut::NoMembers | FanOut::Queued { .. } => 0,
        }
    }
}

/// Copy `parent.visibility` onto each file member.
///
/// Members that are not file sets are reported as not applicable. Members
/// carrying their own active embargo or lease keep their locked visibility
/// and are reported as skipped.
pub async fn copy_visibility_to_members<E>(
    effects: &E,
    parent: &RepositoryObject,
) -> Vec<ChildOutcome>
where
    E: ObjectStoreEffects + PhysicalTimeEffects,
{
    let Some(members) = parent.members() else {
        return Vec::new();
    };
    let now = effects.now().await;

    let mut outcomes = Vec::with_capacity(members.len());
    for member in members {
        let status = match effects.load(member).await {
            Err(e) => {
                warn!(
                    parent = %parent.id,
                    member = %member,
                    error = %e,
                    "member could not be loaded"
                );
                ChildStatus::Failed(e)
            }
            Ok(child) => apply_visibility(effects, parent, child, now).await,
        };
        outcomes.push(ChildOutcome::new(member.clone(), status));
    }
    outcomes
}

async fn apply_visibility<E>(
    effects: &E,
    parent: &RepositoryObject,
    mut child: RepositoryObject,
    now: DateTime<Utc>,
) -> ChildStatus
where
    E: ObjectStoreEffects,
{
    if !child.supports_file_acl() {
        return ChildStatus::NotApplicable;
    }
    if let Some(state) = child.timed.as_ref().filter(|t| !t.is_expired(now)) {
        debug!(member = %child.id, kind = %state.kind(), "member holds its own active timed state");
        return ChildStatus::Skipped(format!("{} has its own active {}", child.id, state.kind()));
    }
    if child.visibility == parent.visibility {
        return ChildStatus::Unchanged;
    }

    child.visibility = parent.visibility;
    match effects.save(&child).await {
        Ok(()) => ChildStatus::Updated,
        Err(e) => {
            warn!(
                parent = %parent.id,
                member = %child.id,
                error = %e,
                "member visibility not persisted"
            );
            ChildStatus::Failed(e)
        }
    }
}
