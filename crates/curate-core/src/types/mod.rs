//! Domain types for the repository access model.

/// Access-control entries
pub mod access;
/// Identifiers
pub mod identifiers;
/// Repository objects
pub mod object;
/// Authenticated caller
pub mod principal;
/// Embargoes and leases
pub mod timed;
/// Visibility levels
pub mod visibility;

pub use access::{AccessControlEntry, AccessLevel, Agent};
pub use identifiers::{ObjectId, UserId};
pub use object::{ObjectKind, RepositoryObject};
pub use principal::Principal;
pub use timed::{DeactivationRecord, Embargo, Lease, TimedKind, TimedPhase, TimedVisibility};
pub use visibility::Visibility;
