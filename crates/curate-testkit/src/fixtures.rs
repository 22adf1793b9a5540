//! Reusable fixtures: a fixed clock origin, principals and an in-memory
//! effect system wired to a simulated clock.

use crate::mocks::{FailingObjectStore, UnreachableMailbox};
use chrono::{DateTime, Duration, TimeZone, Utc};
use curate_core::effects::{MailboxEffects, ObjectStoreEffects};
use curate_core::{Principal, RepositoryObject};
use curate_effects::{
    AclAuthorizationHandler, CurateEffectSystem, MemoryMailbox, MemoryObjectStore,
    SimulatedTimeHandler,
};
use std::sync::Arc;

/// Group whose members are repository managers in fixtures.
pub const ADMIN_GROUP: &str = "admin";

/// Fixed origin for simulated clocks.
pub fn test_start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Repository manager.
pub fn admin() -> Principal {
    Principal::new("archivist").with_group(ADMIN_GROUP)
}

/// Depositor holding edit rights through a person entry.
pub fn depositor() -> Principal {
    Principal::new("depositor")
}

/// User with no rights anywhere.
pub fn stranger() -> Principal {
    Principal::new("stranger").with_group("public")
}

/// In-memory store, simulated clock and composed system.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Backing store, bypassing any injected faults
    pub store: MemoryObjectStore,
    /// Shared simulated clock
    pub clock: SimulatedTimeHandler,
    /// System under test
    pub system: CurateEffectSystem,
}

impl Fixture {
    /// Empty store, clock at [`test_start_time`].
    pub fn new() -> Self {
        let store = MemoryObjectStore::new();
        let clock = SimulatedTimeHandler::new(test_start_time());
        let system = CurateEffectSystem::in_memory(store.clone(), clock.clone(), &[ADMIN_GROUP]);
        Self {
            store,
            clock,
            system,
        }
    }

    /// Same wiring, but the system reaches the store through a
    /// [`FailingObjectStore`]. Direct `insert`/`get` bypass the faults.
    pub fn with_faults() -> (Self, FailingObjectStore) {
        let store = MemoryObjectStore::new();
        let faults = FailingObjectStore::new(store.clone());
        let fixture = Self::wired(
            store,
            Arc::new(faults.clone()),
            Arc::new(MemoryMailbox::new()),
        );
        (fixture, faults)
    }

    /// Healthy store, but every mailbox operation fails.
    pub fn with_unreachable_mailbox() -> Self {
        let store = MemoryObjectStore::new();
        Self::wired(
            store.clone(),
            Arc::new(store),
            Arc::new(UnreachableMailbox),
        )
    }

    fn wired(
        store: MemoryObjectStore,
        handler: Arc<dyn ObjectStoreEffects>,
        mailbox: Arc<dyn MailboxEffects>,
    ) -> Self {
        let clock = SimulatedTimeHandler::new(test_start_time());
        let system = CurateEffectSystem::new(
            handler,
            AclAuthorizationHandler::new([ADMIN_GROUP]),
            Arc::new(clock.clone()),
            mailbox,
        );
        Self {
            store,
            clock,
            system,
        }
    }

    /// `days` from the clock origin; negative for the past.
    pub fn days(&self, days: i64) -> DateTime<Utc> {
        test_start_time() + Duration::days(days)
    }

    /// Seed an object.
    pub async fn insert(&self, object: RepositoryObject) {
        self.store.insert(object).await;
    }

    /// Seed several objects.
    pub async fn insert_all(&self, objects: impl IntoIterator<Item = RepositoryObject>) {
        for object in objects {
            self.store.insert(object).await;
        }
    }

    /// Current stored copy; panics if absent.
    pub async fn get(&self, id: &str) -> RepositoryObject {
        self.store.load(&id.into()).await.unwrap()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
