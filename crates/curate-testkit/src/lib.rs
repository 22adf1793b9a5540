//! Curate Testing Infrastructure
//!
//! Common setup for lifecycle and propagation tests: object builders, a fixed
//! clock origin, principals, fault-injecting handlers and proptest
//! strategies.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! curate-testkit = { path = "../curate-testkit" }
//! ```
//!
//! ```rust,no_run
//! use curate_testkit::*;
//!
//! # async fn demo() {
//! let fixture = Fixture::new();
//! fixture
//!     .insert(WorkBuilder::new("w1").embargoed_until(fixture.days(-1)).build())
//!     .await;
//! # }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod builders;
pub mod fixtures;
pub mod mocks;
pub mod strategies;

pub use builders::*;
pub use fixtures::*;
pub use mocks::*;
