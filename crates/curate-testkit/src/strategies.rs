//! Property test strategies for Curate types
//!
//! Agent names are drawn from a small pool so generated collections contain
//! plenty of duplicates, which is what the dedup laws care about.

use crate::fixtures::test_start_time;
use chrono::{DateTime, Duration, Utc};
use curate_core::{AccessControlEntry, AccessLevel, Agent, Visibility};
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

const NAMES: &[&str] = &["alice", "bob", "staff", "public", "admin", "library"];

/// Any visibility level
pub fn arb_visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![
        Just(Visibility::Restricted),
        Just(Visibility::Authenticated),
        Just(Visibility::Open),
    ]
}

/// Any access level
pub fn arb_access_level() -> impl Strategy<Value = AccessLevel> {
    prop_oneof![
        Just(AccessLevel::Discover),
        Just(AccessLevel::Read),
        Just(AccessLevel::Edit),
    ]
}

/// Person or group from a small name pool
pub fn arb_agent() -> impl Strategy<Value = Agent> {
    (any::<bool>(), prop::sample::select(NAMES)).prop_map(|(person, name)| {
        if person {
            Agent::person(name)
        } else {
            Agent::group(name)
        }
    })
}

/// A single access-control entry
pub fn arb_entry() -> impl Strategy<Value = AccessControlEntry> {
    (arb_agent(), arb_access_level())
        .prop_map(|(agent, access)| AccessControlEntry::new(agent, access))
}

/// Up to `max` entries, duplicates likely
pub fn arb_entries(max: usize) -> impl Strategy<Value = Vec<AccessControlEntry>> {
    prop::collection::vec(arb_entry(), 0..=max)
}

/// Instant within a year either side of the fixture origin
pub fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (-365 * 24i64..=365 * 24).prop_map(|hours| test_start_time() + Duration::hours(hours))
}
