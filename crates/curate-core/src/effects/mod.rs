//! Layer 1: Effect Trait Definitions
//!
//! Pure trait definitions for every side effect the access lifecycle needs.
//! This module defines **what** can be done; handlers in `curate-effects`
//! define **how**.
//!
//! - **Store**: load and save repository objects
//! - **Authorization**: edit rights and repository-manager checks
//! - **Time**: wall-clock time for expiration decisions
//! - **Queue**: background task dispatch keyed by object id
//! - **Mailbox**: operator notifications

/// Authorization checks
pub mod authorization;
/// Operator mailbox
pub mod mailbox;
/// Background task dispatch
pub mod queue;
/// Object store
pub mod store;
/// Wall-clock time
pub mod time;

pub use authorization::AuthorizationEffects;
pub use mailbox::{MailboxEffects, Notification};
pub use queue::{AccessTask, JobQueueEffects, TaskKey};
pub use store::{ObjectStoreEffects, StoreSnapshot};
pub use time::PhysicalTimeEffects;

/// Effects needed by lifecycle and propagation operations.
pub trait AccessEffects:
    ObjectStoreEffects + AuthorizationEffects + PhysicalTimeEffects + JobQueueEffects
{
}

/// Automatic implementation for types that satisfy the required bounds
impl<T> AccessEffects for T where
    T: ObjectStoreEffects + AuthorizationEffects + PhysicalTimeEffects + JobQueueEffects
{
}

/// Access effects plus operator notifications.
pub trait OperatorEffects: AccessEffects + MailboxEffects {}

/// Automatic implementation for types that satisfy the required bounds
impl<T> OperatorEffects for T where T: AccessEffects + MailboxEffects {}
