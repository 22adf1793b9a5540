//! Classification of objects by timed-visibility phase.
//!
//! [`classify`] and [`Listing::build`] are pure; [`ExpirationScan`] loads
//! the store and is reserved for repository managers.

use chrono::{DateTime, Utc};
use curate_core::effects::{
    AuthorizationEffects, ObjectStoreEffects, PhysicalTimeEffects, StoreSnapshot,
};
use curate_core::{
    CurateError, DeactivationRecord, ObjectId, Principal, RepositoryObject, Result, TimedKind,
    TimedPhase, Visibility,
};
use serde::Serialize;
use tracing::{debug, warn};

/// An object's timed state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedStatus {
    /// Object id
    pub id: ObjectId,
    /// Embargo or lease
    pub kind: TimedKind,
    /// Active or expired-pending
    pub phase: TimedPhase,
    /// Release or expiration date
    pub deadline: DateTime<Utc>,
    /// Visibility the object currently has
    pub visibility: Visibility,
    /// Active state whose "during" visibility the object no longer matches
    pub drifted: bool,
}

impl TimedStatus {
    /// Status of `object`, or `None` when it carries no timed state.
    pub fn of(object: &RepositoryObject, now: DateTime<Utc>) -> Option<Self> {
        let state = object.timed.as_ref()?;
        Some(Self {
            id: object.id.clone(),
            kind: state.kind(),
            phase: state.phase(now),
            deadline: state.deadline(),
            visibility: object.visibility,
            drifted: object.visibility_drifted(now),
        })
    }

    /// True once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.phase == TimedPhase::ExpiredPending
    }
}

/// Statuses of every object carrying an embargo or lease, in input order.
pub fn classify<'a, I>(objects: I, now: DateTime<Utc>) -> Vec<TimedStatus>
where
    I: IntoIterator<Item = &'a RepositoryObject>,
{
    objects
        .into_iter()
        .filter_map(|object| TimedStatus::of(object, now))
        .collect()
}

/// Snapshot backing the embargo and lease index pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    statuses: Vec<TimedStatus>,
    history: Vec<(ObjectId, DeactivationRecord)>,
    unreadable: Vec<(ObjectId, CurateError)>,
}

impl Listing {
    /// Build from loaded objects.
    pub fn build<'a, I>(objects: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a RepositoryObject>,
    {
        let mut listing = Self::default();
        for object in objects {
            if let Some(status) = TimedStatus::of(object, now) {
                listing.statuses.push(status);
            }
            listing.history.extend(
                object
                    .history
                    .iter()
                    .map(|record| (object.id.clone(), record.clone())),
            );
        }
        listing
    }

    /// Build from a store snapshot, keeping the ids that failed to load.
    pub fn from_snapshot(snapshot: &StoreSnapshot, now: DateTime<Utc>) -> Self {
        let mut listing = Self::build(&snapshot.objects, now);
        listing.unreadable = snapshot.unreadable.clone();
        listing
    }

    /// Every object with a timed state.
    pub fn all(&self) -> &[TimedStatus] {
        &self.statuses
    }

    /// Objects of `kind` whose deadline is still ahead.
    pub fn active(&self, kind: TimedKind) -> Vec<&TimedStatus> {
        self.filter(Some(kind), TimedPhase::Active)
    }

    /// Objects past their deadline awaiting deactivation. `None` means either kind.
    pub fn expired(&self, kind: Option<TimedKind>) -> Vec<&TimedStatus> {
        self.filter(kind, TimedPhase::ExpiredPending)
    }

    /// Ids awaiting deactivation.
    pub fn expired_ids(&self) -> Vec<ObjectId> {
        self.expired(None).into_iter().map(|s| s.id.clone()).collect()
    }

    /// Past deactivations of `kind`, most recent first.
    pub fn deactivated(&self, kind: TimedKind) -> Vec<(&ObjectId, &DeactivationRecord)> {
        let mut records: Vec<_> = self
            .history
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(id, record)| (id, record))
            .collect();
        records.sort_by(|a, b| b.1.deactivated_at.cmp(&a.1.deactivated_at));
        records
    }

    /// Active objects whose visibility disagrees with their state.
    pub fn drifted(&self) -> Vec<&TimedStatus> {
        self.statuses.iter().filter(|s| s.drifted).collect()
    }

    /// Objects the scan could not read, with the load failure.
    pub fn unreadable(&self) -> &[(ObjectId, CurateError)] {
        &self.unreadable
    }

    fn filter(&self, kind: Option<TimedKind>, phase: TimedPhase) -> Vec<&TimedStatus> {
        self.statuses
            .iter()
            .filter(|s| s.phase == phase && kind.map_or(true, |k| s.kind == k))
            .collect()
    }
}

/// Store-wide scan for repository managers.
#[derive(Debug)]
pub struct ExpirationScan<'a, E> {
    effects: &'a E,
}

impl<'a, E> ExpirationScan<'a, E>
where
    E: ObjectStoreEffects + AuthorizationEffects + PhysicalTimeEffects,
{
    /// Scan over `effects`.
    pub fn new(effects: &'a E) -> Self {
        Self { effects }
    }

    /// Load every object and classify it at the current time.
    pub async fn scan(&self, principal: &Principal) -> Result<Listing> {
        if !self.effects.is_repository_manager(principal).await {
            warn!(user = %principal.user, "listing denied");
            return Err(CurateError::unauthorized(format!(
                "{} is not a repository manager",
                principal.user
            )));
        }
        let snapshot = self.effects.load_all().await?;
        let now = self.effects.now().await;
        let listing = Listing::from_snapshot(&snapshot, now);
        for (id, error) in listing.unreadable() {
            warn!(object_id = %id, error = %error, "object could not be read during scan");
        }
        debug!(
            objects = snapshot.objects.len(),
            unreadable = snapshot.unreadable.len(),
            timed = listing.all().len(),
            expired = listing.expired(None).len(),
            "store scanned"
        );
        Ok(listing)
    }
}
