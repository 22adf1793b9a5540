//! In-memory object store

use async_trait::async_trait;
use curate_core::effects::ObjectStoreEffects;
use curate_core::{CurateError, ObjectId, RepositoryObject, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory object store for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<ObjectId, RepositoryObject>>>,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `objects`
    pub fn with_objects(objects: impl IntoIterator<Item = RepositoryObject>) -> Self {
        let map = objects.into_iter().map(|o| (o.id.clone(), o)).collect();
        Self {
            objects: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or replace an object without going through `save`
    pub async fn insert(&self, object: RepositoryObject) {
        self.objects.write().await.insert(object.id.clone(), object);
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStoreEffects for MemoryObjectStore {
    async fn load(&self, id: &ObjectId) -> Result<RepositoryObject> {
        self.objects
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CurateError::not_found(format!("object {id}")))
    }

    async fn save(&self, object: &RepositoryObject) -> Result<()> {
        self.objects
            .write()
            .await
            .insert(object.id.clone(), object.clone());
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<ObjectId>> {
        Ok(self.objects.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_core::Visibility;

    #[tokio::test]
    async fn load_unknown_id_is_not_found() {
        let store = MemoryObjectStore::new();
        let err = store.load(&ObjectId::new("missing")).await.unwrap_err();
        assert!(matches!(err, CurateError::NotFound { .. }));
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryObjectStore::new();
        let work = RepositoryObject::work("w1", Visibility::Open);
        store.save(&work).await.unwrap();
        assert_eq!(store.load(&work.id).await.unwrap(), work);
        assert_eq!(store.list_ids().await.unwrap(), vec![ObjectId::new("w1")]);
        let snapshot = store.load_all().await.unwrap();
        assert_eq!(snapshot.objects, vec![work]);
        assert!(snapshot.unreadable.is_empty());
    }
}
