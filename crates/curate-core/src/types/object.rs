//! Repository objects as seen by the access lifecycle.

use super::{
    AccessControlEntry, DeactivationRecord, Embargo, Lease, ObjectId, TimedPhase,
    TimedVisibility, Visibility,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability-tagged object variant.
///
/// Only works carry file members, and only file sets accept file-level
/// access entries copied from a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    /// A work with ordered file members
    Work {
        /// Member ids in display order
        #[serde(default)]
        members: Vec<ObjectId>,
    },
    /// A file set belonging to a work
    FileSet,
    /// A collection; neither file bearing nor a file
    Collection,
}

/// An object held by the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryObject {
    /// Stable identifier
    pub id: ObjectId,
    /// Capability variant
    pub kind: ObjectKind,
    /// Whole-object visibility
    pub visibility: Visibility,
    /// Embargo or lease, if any. At most one at a time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed: Option<TimedVisibility>,
    /// Fine-grained grants
    #[serde(default)]
    pub permissions: Vec<AccessControlEntry>,
    /// Deactivated timed states, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<DeactivationRecord>,
}

impl RepositoryObject {
    /// Create an object of the given kind.
    pub fn new(id: impl Into<ObjectId>, kind: ObjectKind, visibility: Visibility) -> Self {
        Self {
            id: id.into(),
            kind,
            visibility,
            timed: None,
            permissions: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Create a work without members.
    pub fn work(id: impl Into<ObjectId>, visibility: Visibility) -> Self {
        Self::new(
            id,
            ObjectKind::Work {
                members: Vec::new(),
            },
            visibility,
        )
    }

    /// Create a file set.
    pub fn file_set(id: impl Into<ObjectId>, visibility: Visibility) -> Self {
        Self::new(id, ObjectKind::FileSet, visibility)
    }

    /// Create a collection.
    pub fn collection(id: impl Into<ObjectId>, visibility: Visibility) -> Self {
        Self::new(id, ObjectKind::Collection, visibility)
    }

    /// Member ids, or `None` when the object cannot carry files.
    pub fn members(&self) -> Option<&[ObjectId]> {
        match &self.kind {
            ObjectKind::Work { members } => Some(members),
            ObjectKind::FileSet | ObjectKind::Collection => None,
        }
    }

    /// True for works with at least one member.
    pub fn has_members(&self) -> bool {
        self.members().is_some_and(|m| !m.is_empty())
    }

    /// Whether entries inherited from a parent may be copied onto this object.
    pub fn supports_file_acl(&self) -> bool {
        matches!(self.kind, ObjectKind::FileSet)
    }

    /// Whether an embargo or lease may be assigned. Collections cannot carry one.
    pub fn supports_timed_visibility(&self) -> bool {
        !matches!(self.kind, ObjectKind::Collection)
    }

    /// Append a member. Ignored for non-work objects.
    pub fn add_member(&mut self, member: impl Into<ObjectId>) -> bool {
        match &mut self.kind {
            ObjectKind::Work { members } => {
                members.push(member.into());
                true
            }
            ObjectKind::FileSet | ObjectKind::Collection => false,
        }
    }

    /// Active embargo, if the timed state is one.
    pub fn embargo(&self) -> Option<&Embargo> {
        match &self.timed {
            Some(TimedVisibility::Embargo(e)) => Some(e),
            _ => None,
        }
    }

    /// Active lease, if the timed state is one.
    pub fn lease(&self) -> Option<&Lease> {
        match &self.timed {
            Some(TimedVisibility::Lease(l)) => Some(l),
            _ => None,
        }
    }

    /// Phase of the timed state at `now`.
    pub fn timed_phase(&self, now: DateTime<Utc>) -> Option<TimedPhase> {
        self.timed.as_ref().map(|t| t.phase(now))
    }

    /// Install a timed state and lock visibility to its "during" value.
    ///
    /// Replaces any existing embargo or lease and returns it.
    pub fn set_timed(&mut self, state: TimedVisibility) -> Option<TimedVisibility> {
        self.visibility = state.during();
        self.timed.replace(state)
    }

    /// True when an active timed state and the object's visibility disagree.
    pub fn visibility_drifted(&self, now: DateTime<Utc>) -> bool {
        self.timed
            .as_ref()
            .is_some_and(|t| !t.is_expired(now) && t.during() != self.visibility)
    }
}
