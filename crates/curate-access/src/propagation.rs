//! Permission propagation from a work onto its file sets.
//!
//! For each file member the parent's entries are appended to the member's
//! own, then deduplicated by (agent, access level) keeping the first
//! occurrence. The result is written only when it differs from what the
//! member already stored. Entries the member held that the parent lacks are
//! never removed, and running the job again changes nothing.

use crate::fanout::{ChildOutcome, ChildStatus};
use curate_core::effects::ObjectStoreEffects;
use curate_core::{AccessControlEntry, CurateError, ObjectId, RepositoryObject, Result};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

/// Deduplicate entries, keeping the first occurrence of each in order.
pub fn dedup_entries(entries: &[AccessControlEntry]) -> Vec<AccessControlEntry> {
    entries
        .iter()
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// `existing ++ inherited`, deduplicated.
pub fn merge_entries(
    existing: &[AccessControlEntry],
    inherited: &[AccessControlEntry],
) -> Vec<AccessControlEntry> {
    existing
        .iter()
        .chain(inherited)
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Result of merging inherited entries into a child's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntries {
    /// Post-merge collection
    pub entries: Vec<AccessControlEntry>,
    /// Whether it differs from the child's stored collection
    pub changed: bool,
}

/// Merge and diff in one step. Pure.
pub fn propagate_entries(
    existing: &[AccessControlEntry],
    inherited: &[AccessControlEntry],
) -> MergedEntries {
    let entries = merge_entries(existing, inherited);
    let changed = entries.as_slice() != existing;
    MergedEntries { entries, changed }
}

/// Outcome of one propagation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationReport {
    /// Parent unknown or unable to carry files; nothing was done
    NotApplicable {
        /// Requested parent
        parent: ObjectId,
        /// Why
        reason: String,
    },
    /// Members were visited
    Completed {
        /// Parent work
        parent: ObjectId,
        /// One outcome per member, in member order
        children: Vec<ChildOutcome>,
    },
}

impl PropagationReport {
    /// Members whose collection was written.
    pub fn writes(&self) -> usize {
        self.children()
            .iter()
            .filter(|c| c.status == ChildStatus::Updated)
            .count()
    }

    /// Members that failed to load or persist.
    pub fn failures(&self) -> Vec<&ChildOutcome> {
        self.children()
            .iter()
            .filter(|c| c.status.is_failure())
            .collect()
    }

    /// Per-member outcomes; empty when not applicable.
    pub fn children(&self) -> &[ChildOutcome] {
        match self {
            PropagationReport::NotApplicable { .. } => &[],
            PropagationReport::Completed { children, .. } => children,
        }
    }

    /// True when the job was not applicable.
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, PropagationReport::NotApplicable { .. })
    }
}

/// Copies a work's entries onto its file members.
#[derive(Debug)]
pub struct PermissionPropagator<'a, E> {
    effects: &'a E,
}

impl<'a, E> PermissionPropagator<'a, E>
where
    E: ObjectStoreEffects,
{
    /// Create a propagator over `effects`.
    pub fn new(effects: &'a E) -> Self {
        Self { effects }
    }

    /// Run propagation for `parent_id`.
    ///
    /// Only storage errors loading the parent itself surface as `Err`.
    /// Member failures are reported per child.
    pub async fn run(&self, parent_id: &ObjectId) -> Result<PropagationReport> {
        let parent = match self.effects.load(parent_id).await {
            Ok(parent) => parent,
            Err(CurateError::NotFound { message }) => {
                debug!(parent = %parent_id, "propagation parent not found");
                return Ok(PropagationReport::NotApplicable {
                    parent: parent_id.clone(),
                    reason: message,
                });
            }
            Err(e) => return Err(e),
        };
        Ok(self.run_for(&parent).await)
    }

    /// Run propagation for an already loaded parent.
    pub async fn run_for(&self, parent: &RepositoryObject) -> PropagationReport {
        let Some(members) = parent.members() else {
            return PropagationReport::NotApplicable {
                parent: parent.id.clone(),
                reason: format!("{} does not carry file members", parent.id),
            };
        };

        let mut children = Vec::with_capacity(members.len());
        for member in members {
            let status = self.propagate_to(member, &parent.permissions).await;
            children.push(ChildOutcome::new(member.clone(), status));
        }

        let report = PropagationReport::Completed {
            parent: parent.id.clone(),
            children,
        };
        info!(
            parent = %parent.id,
            members = members.len(),
            writes = report.writes(),
            failures = report.failures().len(),
            "permissions propagated"
        );
        report
    }

    async fn propagate_to(
        &self,
        member: &ObjectId,
        inherited: &[AccessControlEntry],
    ) -> ChildStatus {
        let mut child = match self.effects.load(member).await {
            Ok(child) => child,
            Err(e) => {
                warn!(member = %member, error = %e, "member could not be loaded");
                return ChildStatus::Failed(e);
            }
        };
        if !child.supports_file_acl() {
            return ChildStatus::NotApplicable;
        }

        let merged = propagate_entries(&child.permissions, inherited);
        if !merged.changed {
            return ChildStatus::Unchanged;
        }

        child.permissions = merged.entries;
        match self.effects.save(&child).await {
            Ok(()) => ChildStatus::Updated,
            Err(e) => {
                warn!(member = %member, error = %e, "member permissions not persisted");
                ChildStatus::Failed(e)
            }
        }
    }
}
