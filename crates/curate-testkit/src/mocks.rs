//! Fault-injecting handlers.

use async_trait::async_trait;
use curate_core::effects::{MailboxEffects, Notification, ObjectStoreEffects};
use curate_core::{CurateError, ObjectId, RepositoryObject, Result, UserId};
use curate_effects::MemoryObjectStore;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Faults {
    fail_saves: BTreeSet<ObjectId>,
    fail_loads: BTreeSet<ObjectId>,
    saves: Vec<ObjectId>,
}

/// Wraps a [`MemoryObjectStore`], failing chosen ids and recording writes.
#[derive(Debug, Clone)]
pub struct FailingObjectStore {
    inner: MemoryObjectStore,
    faults: Arc<Mutex<Faults>>,
}

impl FailingObjectStore {
    /// Wrap `inner` with no faults.
    pub fn new(inner: MemoryObjectStore) -> Self {
        Self {
            inner,
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    /// Make every save of `id` fail with a persist error.
    pub fn fail_saves_for(&self, id: impl Into<ObjectId>) {
        self.faults.lock().fail_saves.insert(id.into());
    }

    /// Make every load of `id` fail with a persist error.
    pub fn fail_loads_for(&self, id: impl Into<ObjectId>) {
        self.faults.lock().fail_loads.insert(id.into());
    }

    /// Remove all injected faults.
    pub fn heal(&self) {
        let mut faults = self.faults.lock();
        faults.fail_saves.clear();
        faults.fail_loads.clear();
    }

    /// Ids of successful saves, in order.
    pub fn saves(&self) -> Vec<ObjectId> {
        self.faults.lock().saves.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.faults.lock().saves.len()
    }
}

#[async_trait]
impl ObjectStoreEffects for FailingObjectStore {
    async fn load(&self, id: &ObjectId) -> Result<RepositoryObject> {
        if self.faults.lock().fail_loads.contains(id) {
            return Err(CurateError::persist(format!("injected read failure for {id}")));
        }
        self.inner.load(id).await
    }

    async fn save(&self, object: &RepositoryObject) -> Result<()> {
        if self.faults.lock().fail_saves.contains(&object.id) {
            return Err(CurateError::persist(format!(
                "injected write failure for {}",
                object.id
            )));
        }
        self.inner.save(object).await?;
        self.faults.lock().saves.push(object.id.clone());
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<ObjectId>> {
        self.inner.list_ids().await
    }
}

/// Mailbox whose every operation fails with a persist error.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableMailbox;

impl UnreachableMailbox {
    fn refuse<T>(&self) -> Result<T> {
        Err(CurateError::persist("mailbox unreachable"))
    }
}

#[async_trait]
impl MailboxEffects for UnreachableMailbox {
    async fn deliver(&self, _notification: Notification) -> Result<()> {
        self.refuse()
    }

    async fn inbox(&self, _user: &UserId) -> Result<Vec<Notification>> {
        self.refuse()
    }

    async fn remove(&self, _user: &UserId, _id: Uuid) -> Result<bool> {
        self.refuse()
    }

    async fn clear(&self, _user: &UserId) -> Result<usize> {
        self.refuse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_core::Visibility;

    #[tokio::test]
    async fn injected_save_failure_leaves_store_untouched() {
        let store = FailingObjectStore::new(MemoryObjectStore::new());
        store.fail_saves_for("w1");

        let work = RepositoryObject::work("w1", Visibility::Open);
        assert!(matches!(store.save(&work).await, Err(CurateError::Persist { .. })));
        assert!(store.load(&work.id).await.is_err());
        assert_eq!(store.save_count(), 0);

        store.heal();
        store.save(&work).await.unwrap();
        assert_eq!(store.saves(), vec![work.id.clone()]);
    }

    #[tokio::test]
    async fn unreachable_mailbox_refuses_delivery() {
        let inbox = UnreachableMailbox.inbox(&UserId::new("archivist")).await;
        assert!(matches!(inbox, Err(CurateError::Persist { .. })));
    }
}
