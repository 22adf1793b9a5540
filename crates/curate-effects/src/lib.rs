//! # Curate Effects - Layer 3: Effect Handlers
//!
//! Implementations of the effect traits declared in `curate-core`.
//!
//! - `store/` - in-memory and filesystem object stores
//! - `time` - real and simulated clocks
//! - `authorization` - ACL based edit checks with admin groups
//! - `queue` - in-memory keyed job queue
//! - `mailbox` - in-memory and filesystem mailboxes
//! - `system` - [`CurateEffectSystem`], one value implementing every effect trait
//!
//! Fault-injecting handlers for tests live in `curate-testkit`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// ACL based authorization
pub mod authorization;
/// Mailbox handlers
pub mod mailbox;
/// In-memory job queue
pub mod queue;
/// Object store handlers
pub mod store;
/// Composed effect system
pub mod system;
/// Clock handlers
pub mod time;

pub use authorization::AclAuthorizationHandler;
pub use mailbox::{FilesystemMailbox, MemoryMailbox};
pub use queue::MemoryJobQueue;
pub use store::{FilesystemObjectStore, MemoryObjectStore};
pub use system::CurateEffectSystem;
pub use time::{RealTimeHandler, SimulatedTimeHandler};
