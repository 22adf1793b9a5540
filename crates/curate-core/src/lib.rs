//! # Curate Core - Layer 1: Foundation
//!
//! **Purpose**: Define the repository access model shared by every Curate crate.
//!
//! This crate holds the types the access lifecycle manipulates, the unified
//! error type, configuration, and the effect traits that describe the
//! external collaborators (object store, authorization, clock, job queue,
//! mailbox).
//!
//! # Architecture Constraints
//!
//! - YES Domain types: objects, visibility, access-control entries, timed states
//! - YES Effect trait definitions (what can be done)
//! - NO effect handler implementations (those live in `curate-effects`)
//! - NO lifecycle or propagation logic (that's `curate-access`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration loading, merging and validation
pub mod config;

/// Effect trait definitions for external collaborators
pub mod effects;

/// Unified error type
pub mod errors;

/// Domain types
pub mod types;

pub use config::{CurateConfig, FanOutMode};
pub use errors::{CurateError, ErrorKind, Result};
pub use types::{
    AccessControlEntry, AccessLevel, Agent, DeactivationRecord, Embargo, Lease, ObjectId,
    ObjectKind, Principal, RepositoryObject, TimedKind, TimedPhase, TimedVisibility, UserId,
    Visibility,
};
pub use types::timed::is_expired;
