//! Batch deactivation.
//!
//! Each id is deactivated on its own. A failure on one object is recorded in
//! its entry and the batch moves on to the next.

use crate::lifecycle::{Deactivation, VisibilityLifecycle};
use curate_core::effects::AccessEffects;
use curate_core::{CurateError, ErrorKind, ObjectId, Principal, Result, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::info;

/// Objects to deactivate and which of them fan out to their members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Objects, processed in order
    pub ids: Vec<ObjectId>,
    /// Subset whose released visibility is copied onto file members
    #[serde(default)]
    pub copy_visibility: BTreeSet<ObjectId>,
}

impl BatchRequest {
    /// Request without any visibility copying.
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            copy_visibility: BTreeSet::new(),
        }
    }

    /// Copy visibility for every requested id.
    pub fn copy_all(mut self) -> Self {
        self.copy_visibility = self.ids.iter().cloned().collect();
        self
    }

    /// Copy visibility for one id.
    pub fn copy_for(mut self, id: impl Into<ObjectId>) -> Self {
        self.copy_visibility.insert(id.into());
        self
    }

    fn copies(&self, id: &ObjectId) -> bool {
        self.copy_visibility.contains(id)
    }
}

/// What happened to one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Timed state removed
    Deactivated {
        /// Visibility now in force
        visibility: Visibility,
        /// Members that could not be updated
        child_failures: usize,
    },
    /// No embargo or lease present
    NothingToDo,
    /// Deadline not reached
    StillActive {
        /// RFC 3339 deadline
        deadline: String,
    },
    /// Caller lacks edit rights
    Denied,
    /// Id did not resolve
    NotFound,
    /// Store read or write failed
    StorageFailure {
        /// Store message
        message: String,
    },
    /// Anything else
    Failed {
        /// Error message
        message: String,
    },
}

impl BatchOutcome {
    /// Classify the result of a single deactivation.
    pub fn from_result(result: Result<Deactivation>) -> Self {
        match result {
            Ok(Deactivation::Applied(report)) => BatchOutcome::Deactivated {
                visibility: report.visibility,
                child_failures: report.fan_out.failures(),
            },
            Ok(Deactivation::NoActiveTimedState) => BatchOutcome::NothingToDo,
            Err(CurateError::StillActive { deadline, .. }) => {
                BatchOutcome::StillActive { deadline }
            }
            Err(e) => match e.kind() {
                ErrorKind::NotFound => BatchOutcome::NotFound,
                ErrorKind::NothingToDo => BatchOutcome::NothingToDo,
                ErrorKind::Denied => BatchOutcome::Denied,
                ErrorKind::Storage => BatchOutcome::StorageFailure {
                    message: e.to_string(),
                },
                ErrorKind::StillActive | ErrorKind::Invalid | ErrorKind::Internal => {
                    BatchOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            },
        }
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::Deactivated {
                visibility,
                child_failures: 0,
            } => write!(f, "deactivated, now {visibility}"),
            BatchOutcome::Deactivated {
                visibility,
                child_failures,
            } => write!(
                f,
                "deactivated, now {visibility}; {child_failures} file members not updated"
            ),
            BatchOutcome::NothingToDo => f.write_str("nothing to do"),
            BatchOutcome::StillActive { deadline } => write!(f, "still active until {deadline}"),
            BatchOutcome::Denied => f.write_str("authorization denied"),
            BatchOutcome::NotFound => f.write_str("not found"),
            BatchOutcome::StorageFailure { message } => write!(f, "storage failure: {message}"),
            BatchOutcome::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

/// One object's line in a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Object id
    pub id: ObjectId,
    /// Outcome
    pub outcome: BatchOutcome,
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Timed state removed
    pub deactivated: usize,
    /// No embargo or lease present
    pub nothing_to_do: usize,
    /// Deadline not reached
    pub still_active: usize,
    /// Edit rights missing
    pub denied: usize,
    /// Unknown ids
    pub not_found: usize,
    /// Store failures
    pub storage_failures: usize,
    /// Other errors
    pub failed: usize,
    /// Member failures across all deactivated objects
    pub child_failures: usize,
}

impl BatchSummary {
    /// True when every object was deactivated or had nothing to do.
    pub fn is_clean(&self) -> bool {
        self.still_active == 0
            && self.denied == 0
            && self.not_found == 0
            && self.storage_failures == 0
            && self.failed == 0
            && self.child_failures == 0
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-object entries in request order
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Tally the entries.
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for entry in &self.entries {
            match &entry.outcome {
                BatchOutcome::Deactivated { child_failures, .. } => {
                    summary.deactivated += 1;
                    summary.child_failures += child_failures;
                }
                BatchOutcome::NothingToDo => summary.nothing_to_do += 1,
                BatchOutcome::StillActive { .. } => summary.still_active += 1,
                BatchOutcome::Denied => summary.denied += 1,
                BatchOutcome::NotFound => summary.not_found += 1,
                BatchOutcome::StorageFailure { .. } => summary.storage_failures += 1,
                BatchOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    /// Ids with a given kind of outcome.
    pub fn ids_where(&self, pred: impl Fn(&BatchOutcome) -> bool) -> Vec<&ObjectId> {
        self.entries
            .iter()
            .filter(|e| pred(&e.outcome))
            .map(|e| &e.id)
            .collect()
    }

    /// Operator-facing summary line.
    ///
    /// Authorization denials, no-ops and storage failures are named
    /// separately since each calls for a different response.
    pub fn message(&self) -> String {
        if self.entries.is_empty() {
            return "No objects were selected.".to_string();
        }
        let s = self.summary();
        let mut parts = Vec::new();
        if s.deactivated > 0 {
            parts.push(format!("{} deactivated", s.deactivated));
        }
        if s.nothing_to_do > 0 {
            parts.push(format!("nothing to do for {}", s.nothing_to_do));
        }
        if s.still_active > 0 {
            parts.push(format!("{} still active", s.still_active));
        }
        if s.denied > 0 {
            parts.push(format!("authorization denied for {}", s.denied));
        }
        if s.not_found > 0 {
            parts.push(format!("{} not found", s.not_found));
        }
        if s.storage_failures > 0 {
            parts.push(format!("storage failure for {}", s.storage_failures));
        }
        if s.failed > 0 {
            parts.push(format!("{} failed", s.failed));
        }
        if s.child_failures > 0 {
            parts.push(format!("{} file members not updated", s.child_failures));
        }
        let mut message = parts.join("; ");
        if let Some(first) = message.get(..1) {
            message = first.to_uppercase() + &message[1..];
        }
        message.push('.');
        message
    }
}

/// Deactivate every requested object and collect the outcomes.
pub async fn deactivate_batch<E>(
    lifecycle: &VisibilityLifecycle<'_, E>,
    principal: &Principal,
    request: &BatchRequest,
) -> BatchReport
where
    E: AccessEffects,
{
    let mut entries = Vec::with_capacity(request.ids.len());
    for id in &request.ids {
        let result = lifecycle
            .deactivate(principal, id, request.copies(id))
            .await;
        entries.push(BatchEntry {
            id: id.clone(),
            outcome: BatchOutcome::from_result(result),
        });
    }

    let report = BatchReport { entries };
    let summary = report.summary();
    info!(
        user = %principal.user,
        requested = request.ids.len(),
        deactivated = summary.deactivated,
        denied = summary.denied,
        storage_failures = summary.storage_failures,
        "batch deactivation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<BatchOutcome>) -> BatchReport {
        BatchReport {
            entries: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| BatchEntry {
                    id: ObjectId::new(format!("w{i}")),
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn message_names_each_failure_class() {
        let report = report(vec![
            BatchOutcome::Deactivated {
                visibility: Visibility::Open,
                child_failures: 0,
            },
            BatchOutcome::NothingToDo,
            BatchOutcome::Denied,
            BatchOutcome::StorageFailure {
                message: "disk".into(),
            },
        ]);
        assert_eq!(
            report.message(),
            "1 deactivated; nothing to do for 1; authorization denied for 1; storage failure for 1."
        );
        assert!(!report.summary().is_clean());
    }

    #[test]
    fn message_capitalises_leading_clause() {
        let report = report(vec![BatchOutcome::NothingToDo, BatchOutcome::NothingToDo]);
        assert_eq!(report.message(), "Nothing to do for 2.");
        assert!(report.summary().is_clean());
    }

    #[test]
    fn errors_map_to_outcomes() {
        assert_eq!(
            BatchOutcome::from_result(Err(CurateError::unauthorized("no"))),
            BatchOutcome::Denied
        );
        assert_eq!(
            BatchOutcome::from_result(Err(CurateError::not_found("w9"))),
            BatchOutcome::NotFound
        );
        assert!(matches!(
            BatchOutcome::from_result(Err(CurateError::serialization("bad json"))),
            BatchOutcome::StorageFailure { .. }
        ));
        assert_eq!(
            BatchOutcome::from_result(Err(CurateError::still_active(
                "w1",
                "lease",
                "2030-01-01T00:00:00+00:00"
            ))),
            BatchOutcome::StillActive {
                deadline: "2030-01-01T00:00:00+00:00".into()
            }
        );
    }

    #[test]
    fn copy_set_follows_builder() {
        let request = BatchRequest::new(["a", "b"]).copy_for("b");
        assert!(!request.copies(&ObjectId::new("a")));
        assert!(request.copies(&ObjectId::new("b")));
        assert_eq!(BatchRequest::new(["a", "b"]).copy_all().copy_visibility.len(), 2);
    }
}
