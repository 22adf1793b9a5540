//! Embargo and lease lifecycle.
//!
//! A timed state is *active* while `now < deadline` and *expired-pending*
//! once the deadline has passed but nobody has deactivated it yet. The
//! pending phase is derived from the clock and never stored. Deactivation is
//! the one-shot transition into the terminal state: visibility takes the
//! "after" value, the timed state is cleared and a history record is
//! appended, all in a single save.
//!
//! Every mutating operation loads the object, checks edit rights against the
//! supplied [`Principal`] and only then touches the object.

use crate::fanout::{copy_visibility_to_members, FanOut};
use chrono::{DateTime, Utc};
use curate_core::effects::{AccessEffects, AccessTask};
use curate_core::{
    CurateConfig, CurateError, DeactivationRecord, FanOutMode, ObjectId, Principal,
    RepositoryObject, Result, TimedVisibility, Visibility,
};
use tracing::{debug, info, warn};

/// Deployment choices for the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecyclePolicy {
    /// Inline or queued visibility fan-out
    pub fan_out: FanOutMode,
}

impl LifecyclePolicy {
    /// Policy taken from configuration.
    pub fn from_config(config: &CurateConfig) -> Self {
        Self {
            fan_out: config.lifecycle.fan_out,
        }
    }
}

/// A completed deactivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeactivationReport {
    /// Deactivated object
    pub object_id: ObjectId,
    /// History entry that was appended
    pub record: DeactivationRecord,
    /// Visibility now in force
    pub visibility: Visibility,
    /// What happened to file members
    pub fan_out: FanOut,
}

/// Result of a deactivation request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deactivation {
    /// The timed state was removed
    Applied(DeactivationReport),
    /// Nothing to deactivate; the object was not written
    NoActiveTimedState,
}

impl Deactivation {
    /// The report, when something was applied.
    pub fn report(&self) -> Option<&DeactivationReport> {
        match self {
            Deactivation::Applied(report) => Some(report),
            Deactivation::NoActiveTimedState => None,
        }
    }
}

/// Embargo and lease transitions over an effect system.
#[derive(Debug)]
pub struct VisibilityLifecycle<'a, E> {
    effects: &'a E,
    policy: LifecyclePolicy,
}

impl<'a, E> VisibilityLifecycle<'a, E>
where
    E: AccessEffects,
{
    /// Lifecycle with the default (inline) policy.
    pub fn new(effects: &'a E) -> Self {
        Self::with_policy(effects, LifecyclePolicy::default())
    }

    /// Lifecycle with an explicit policy.
    pub fn with_policy(effects: &'a E, policy: LifecyclePolicy) -> Self {
        Self { effects, policy }
    }

    /// Active policy.
    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    /// Deactivate an expired embargo or lease.
    ///
    /// # Errors
    ///
    /// - `NotFound` when `id` does not resolve
    /// - `Unauthorized` when `principal` may not edit the object
    /// - `StillActive` when the deadline has not passed
    /// - `Persist` when the save fails
    ///
    /// An object without a timed state yields
    /// [`Deactivation::NoActiveTimedState`], so repeated calls are harmless.
    pub async fn deactivate(
        &self,
        principal: &Principal,
        id: &ObjectId,
        copy_visibility: bool,
    ) -> Result<Deactivation> {
        self.transition(principal, id, copy_visibility, false).await
    }

    /// Lift an embargo or lease regardless of its deadline.
    ///
    /// Same checks and effects as [`deactivate`](Self::deactivate) except
    /// that an active state is accepted and recorded as an early release.
    pub async fn release_early(
        &self,
        principal: &Principal,
        id: &ObjectId,
        copy_visibility: bool,
    ) -> Result<Deactivation> {
        self.transition(principal, id, copy_visibility, true).await
    }

    /// Assign an embargo or lease, replacing whichever one the object held.
    ///
    /// The object's visibility is locked to the new state's "during" value.
    /// Returns the replaced state, if any.
    pub async fn apply_timed_visibility(
        &self,
        principal: &Principal,
        id: &ObjectId,
        state: TimedVisibility,
    ) -> Result<Option<TimedVisibility>> {
        let mut object = self.load_authorized(principal, id).await?;
        if !object.supports_timed_visibility() {
            return Err(CurateError::not_applicable(format!(
                "{id} cannot carry an embargo or lease"
            )));
        }
        let now = self.effects.now().await;
        require_future(&state.deadline(), now)?;

        let kind = state.kind();
        let replaced = object.set_timed(state);
        self.effects.save(&object).await?;

        info!(
            object_id = %id,
            kind = %kind,
            replaced = ?replaced.as_ref().map(|r| r.kind()),
            visibility = %object.visibility,
            "timed visibility applied"
        );
        Ok(replaced)
    }

    /// Move the deadline of an active embargo or lease.
    pub async fn update_deadline(
        &self,
        principal: &Principal,
        id: &ObjectId,
        deadline: DateTime<Utc>,
    ) -> Result<TimedVisibility> {
        let mut object = self.load_authorized(principal, id).await?;
        let Some(state) = object.timed.clone() else {
            return Err(CurateError::no_active_timed_state(id.as_str()));
        };
        let now = self.effects.now().await;
        if state.is_expired(now) {
            return Err(CurateError::invalid(format!(
                "{} on {id} expired at {}; deactivate it instead",
                state.kind(),
                state.deadline().to_rfc3339()
            )));
        }
        require_future(&deadline, now)?;

        let updated = state.with_deadline(deadline);
        object.set_timed(updated.clone());
        self.effects.save(&object).await?;

        info!(
            object_id = %id,
            kind = %updated.kind(),
            deadline = %deadline.to_rfc3339(),
            "deadline updated"
        );
        Ok(updated)
    }

    async fn transition(
        &self,
        principal: &Principal,
        id: &ObjectId,
        copy_visibility: bool,
        allow_active: bool,
    ) -> Result<Deactivation> {
        let mut object = self.load_authorized(principal, id).await?;
        let Some(state) = object.timed.clone() else {
            debug!(object_id = %id, "no embargo or lease to deactivate");
            return Ok(Deactivation::NoActiveTimedState);
        };

        let now = self.effects.now().await;
        let expired = state.is_expired(now);
        if !expired && !allow_active {
            debug!(
                object_id = %id,
                kind = %state.kind(),
                "deactivation rejected, state still active"
            );
            return Err(CurateError::still_active(
                id.as_str(),
                state.kind().as_str(),
                state.deadline().to_rfc3339(),
            ));
        }

        let record = DeactivationRecord::from_state(&state, now, !expired);
        object.visibility = state.after();
        object.timed = None;
        object.history.push(record.clone());
        self.effects.save(&object).await?;

        info!(
            object_id = %id,
            kind = %record.kind,
            visibility = %object.visibility,
            early = record.early,
            "timed visibility deactivated"
        );

        let fan_out = self.fan_out(&object, copy_visibility).await;
        Ok(Deactivation::Applied(DeactivationReport {
            object_id: id.clone(),
            record,
            visibility: object.visibility,
            fan_out,
        }))
    }

    async fn load_authorized(
        &self,
        principal: &Principal,
        id: &ObjectId,
    ) -> Result<RepositoryObject> {
        let object = self.effects.load(id).await?;
        if !self.effects.can_edit(principal, &object).await {
            warn!(object_id = %id, user = %principal.user, "edit denied");
            return Err(CurateError::unauthorized(format!(
                "{} may not edit {id}",
                principal.user
            )));
        }
        Ok(object)
    }

    async fn fan_out(&self, object: &RepositoryObject, copy_visibility: bool) -> FanOut {
        if !copy_visibility {
            return FanOut::NotRequested;
        }
        if !object.has_members() {
            return FanOut::NoMembers;
        }
        match self.policy.fan_out {
            FanOutMode::Inline => {
                FanOut::Inline(copy_visibility_to_members(self.effects, object).await)
            }
            FanOutMode::Queued => {
                let task = AccessTask::CopyVisibility {
                    parent: object.id.clone(),
                };
                match self.effects.enqueue(task).await {
                    Ok(newly) => FanOut::Queued { newly },
                    Err(e) => {
                        warn!(object_id = %object.id, error = %e, "visibility task not enqueued");
                        FanOut::EnqueueFailed(e)
                    }
                }
            }
        }
    }
}

fn require_future(deadline: &DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if *deadline <= now {
        return Err(CurateError::invalid(format!(
            "deadline {} is not in the future",
            deadline.to_rfc3339()
        )));
    }
    Ok(())
}
