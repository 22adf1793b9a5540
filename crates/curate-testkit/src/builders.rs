//! Fluent builders for repository objects.

use chrono::{DateTime, Utc};
use curate_core::{
    AccessControlEntry, AccessLevel, Embargo, Lease, ObjectId, RepositoryObject,
    TimedVisibility, Visibility,
};

/// Builder for works, file sets and collections.
#[derive(Debug, Clone)]
pub struct WorkBuilder {
    object: RepositoryObject,
}

impl WorkBuilder {
    /// A restricted work with no members.
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self {
            object: RepositoryObject::work(id, Visibility::Restricted),
        }
    }

    /// A restricted file set.
    pub fn file_set(id: impl Into<ObjectId>) -> Self {
        Self {
            object: RepositoryObject::file_set(id, Visibility::Restricted),
        }
    }

    /// A restricted collection.
    pub fn collection(id: impl Into<ObjectId>) -> Self {
        Self {
            object: RepositoryObject::collection(id, Visibility::Restricted),
        }
    }

    /// Override the visibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.object.visibility = visibility;
        self
    }

    /// Append a member id.
    pub fn member(mut self, id: impl Into<ObjectId>) -> Self {
        self.object.add_member(id);
        self
    }

    /// Append several member ids.
    pub fn members<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectId>,
    {
        for id in ids {
            self.object.add_member(id);
        }
        self
    }

    /// Append an access-control entry.
    pub fn entry(mut self, entry: AccessControlEntry) -> Self {
        self.object.permissions.push(entry);
        self
    }

    /// Grant `access` to a group.
    pub fn group(self, name: &str, access: AccessLevel) -> Self {
        self.entry(AccessControlEntry::group(name, access))
    }

    /// Grant `access` to a person.
    pub fn person(self, name: &str, access: AccessLevel) -> Self {
        self.entry(AccessControlEntry::person(name, access))
    }

    /// Install a timed state, locking visibility to its "during" value.
    pub fn timed(mut self, state: impl Into<TimedVisibility>) -> Self {
        self.object.set_timed(state.into());
        self
    }

    /// Private until `release`, public afterwards.
    pub fn embargoed_until(self, release: DateTime<Utc>) -> Self {
        self.timed(Embargo::new(release, Visibility::Restricted, Visibility::Open))
    }

    /// Public until `expiry`, private afterwards.
    pub fn leased_until(self, expiry: DateTime<Utc>) -> Self {
        self.timed(Lease::new(expiry, Visibility::Open, Visibility::Restricted))
    }

    /// Finish.
    pub fn build(self) -> RepositoryObject {
        self.object
    }
}

/// A work with `n` restricted file sets named `<work>-f<i>`.
pub fn work_with_files(id: &str, n: usize) -> (RepositoryObject, Vec<RepositoryObject>) {
    let files: Vec<_> = (0..n)
        .map(|i| WorkBuilder::file_set(format!("{id}-f{i}")).build())
        .collect();
    let work = WorkBuilder::new(id)
        .members(files.iter().map(|f| f.id.clone()))
        .build();
    (work, files)
}
