//! # Curate Access - Layer 2: Domain Logic
//!
//! **Purpose**: Time-bound visibility lifecycle and permission propagation for
//! repository works.
//!
//! ## Core Concepts
//!
//! - **Lifecycle**: embargo and lease expiry detection, deactivation, early
//!   release, assignment and deadline updates
//! - **Propagation**: additive, deduplicating copy of a work's access-control
//!   entries onto its file sets
//! - **Fan-out**: copying a released visibility onto file members, inline or
//!   through the job queue
//! - **Batch and sweep**: per-object outcomes collected without unwinding
//! - **Scan**: side-effect free classification of objects by timed phase
//!
//! Every operation is generic over the effect traits in `curate_core::effects`;
//! nothing here touches a clock, disk or queue directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Batch deactivation with per-object outcomes
pub mod batch;
/// Visibility fan-out onto file members
pub mod fanout;
/// Embargo and lease lifecycle
pub mod lifecycle;
/// Operator mailbox and batch notifications
pub mod notifications;
/// Permission propagation
pub mod propagation;
/// Timed-visibility classification and listing
pub mod scan;
/// Expiration sweep
pub mod sweep;
/// Background task execution
pub mod tasks;

pub use batch::{
    deactivate_batch, BatchEntry, BatchOutcome, BatchReport, BatchRequest, BatchSummary,
};
pub use fanout::{copy_visibility_to_members, ChildOutcome, ChildStatus, FanOut};
pub use lifecycle::{Deactivation, DeactivationReport, LifecyclePolicy, VisibilityLifecycle};
pub use notifications::{Notifier, UserMailbox};
pub use propagation::{
    dedup_entries, merge_entries, propagate_entries, MergedEntries, PermissionPropagator,
    PropagationReport,
};
pub use scan::{classify, ExpirationScan, Listing, TimedStatus};
pub use sweep::{SweepReport, Sweeper};
pub use tasks::{TaskOutcome, TaskRunner};

pub use curate_core::is_expired;
