//! Time-bound visibility states: embargoes and leases.
//!
//! Both variants carry a deadline, a visibility enforced until the deadline
//! and a visibility to apply once it has passed. The lifecycle treats them
//! identically; only the field names differ.

use super::Visibility;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Restriction that holds until `release_date`, then opens up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embargo {
    /// Moment after which the embargo no longer applies
    pub release_date: DateTime<Utc>,
    /// Visibility enforced while the embargo is active
    pub visibility_during_embargo: Visibility,
    /// Visibility applied once the embargo is deactivated
    pub visibility_after_embargo: Visibility,
}

impl Embargo {
    /// Create a new embargo.
    pub fn new(release_date: DateTime<Utc>, during: Visibility, after: Visibility) -> Self {
        Self {
            release_date,
            visibility_during_embargo: during,
            visibility_after_embargo: after,
        }
    }
}

/// Access granted until `expiration_date`, then restricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    /// Moment after which the lease no longer applies
    pub expiration_date: DateTime<Utc>,
    /// Visibility granted for the lease period
    pub visibility_during_lease: Visibility,
    /// Visibility applied once the lease is deactivated
    pub visibility_after_lease: Visibility,
}

impl Lease {
    /// Create a new lease.
    pub fn new(expiration_date: DateTime<Utc>, during: Visibility, after: Visibility) -> Self {
        Self {
            expiration_date,
            visibility_during_lease: during,
            visibility_after_lease: after,
        }
    }
}

/// Which variant of timed visibility a state or record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimedKind {
    /// Embargo
    Embargo,
    /// Lease
    Lease,
}

impl TimedKind {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimedKind::Embargo => "embargo",
            TimedKind::Lease => "lease",
        }
    }
}

impl fmt::Display for TimedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived phase of a timed state. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimedPhase {
    /// Deadline still in the future
    Active,
    /// Deadline passed, deactivation not yet applied
    ExpiredPending,
}

/// Either an embargo or a lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TimedVisibility {
    /// Embargo variant
    Embargo(Embargo),
    /// Lease variant
    Lease(Lease),
}

impl TimedVisibility {
    /// Variant tag.
    pub fn kind(&self) -> TimedKind {
        match self {
            TimedVisibility::Embargo(_) => TimedKind::Embargo,
            TimedVisibility::Lease(_) => TimedKind::Lease,
        }
    }

    /// Release or expiration date.
    pub fn deadline(&self) -> DateTime<Utc> {
        match self {
            TimedVisibility::Embargo(e) => e.release_date,
            TimedVisibility::Lease(l) => l.expiration_date,
        }
    }

    /// Visibility enforced while active.
    pub fn during(&self) -> Visibility {
        match self {
            TimedVisibility::Embargo(e) => e.visibility_during_embargo,
            TimedVisibility::Lease(l) => l.visibility_during_lease,
        }
    }

    /// Visibility applied on deactivation.
    pub fn after(&self) -> Visibility {
        match self {
            TimedVisibility::Embargo(e) => e.visibility_after_embargo,
            TimedVisibility::Lease(l) => l.visibility_after_lease,
        }
    }

    /// `now >= deadline`. Pure.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline()
    }

    /// Phase at `now`.
    pub fn phase(&self, now: DateTime<Utc>) -> TimedPhase {
        if self.is_expired(now) {
            TimedPhase::ExpiredPending
        } else {
            TimedPhase::Active
        }
    }

    /// Same state with a different deadline.
    pub fn with_deadline(&self, deadline: DateTime<Utc>) -> Self {
        match self {
            TimedVisibility::Embargo(e) => TimedVisibility::Embargo(Embargo {
                release_date: deadline,
                ..e.clone()
            }),
            TimedVisibility::Lease(l) => TimedVisibility::Lease(Lease {
                expiration_date: deadline,
                ..l.clone()
            }),
        }
    }
}

impl From<Embargo> for TimedVisibility {
    fn from(value: Embargo) -> Self {
        TimedVisibility::Embargo(value)
    }
}

impl From<Lease> for TimedVisibility {
    fn from(value: Lease) -> Self {
        TimedVisibility::Lease(value)
    }
}

/// Free-standing form of [`TimedVisibility::is_expired`].
pub fn is_expired(state: &TimedVisibility, now: DateTime<Utc>) -> bool {
    state.is_expired(now)
}

/// History entry written when a timed state is deactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationRecord {
    /// Embargo or lease
    pub kind: TimedKind,
    /// Deadline the state carried
    pub deadline: DateTime<Utc>,
    /// Visibility while active
    pub visibility_during: Visibility,
    /// Visibility applied
    pub visibility_after: Visibility,
    /// When the transition ran
    pub deactivated_at: DateTime<Utc>,
    /// Released before its deadline by an editor
    #[serde(default)]
    pub early: bool,
}

impl DeactivationRecord {
    /// Build a record from the state being removed.
    pub fn from_state(state: &TimedVisibility, deactivated_at: DateTime<Utc>, early: bool) -> Self {
        Self {
            kind: state.kind(),
            deadline: state.deadline(),
            visibility_during: state.during(),
            visibility_after: state.after(),
            deactivated_at,
            early,
        }
    }
}

impl fmt::Display for DeactivationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.early { "An active" } else { "An expired" };
        write!(
            f,
            "{state} {} was deactivated on {}. Its deadline was {}. Visibility during the {} was {} and intended visibility after was {}.",
            self.kind,
            self.deactivated_at.date_naive(),
            self.deadline.date_naive(),
            self.kind,
            self.visibility_during,
            self.visibility_after,
        )
    }
}
