//! Object store effect.

use crate::{CurateError, ObjectId, RepositoryObject, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Every readable object in the store, plus the ids that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Loaded objects, in id order
    pub objects: Vec<RepositoryObject>,
    /// Ids whose load failed, with the failure
    pub unreadable: Vec<(ObjectId, CurateError)>,
}

/// Addressable store of repository objects.
///
/// `load` reports unknown ids as `CurateError::NotFound`; `save` failures are
/// `CurateError::Persist`. Neither retries.
#[async_trait]
pub trait ObjectStoreEffects: Send + Sync {
    /// Load an object by id.
    async fn load(&self, id: &ObjectId) -> Result<RepositoryObject>;

    /// Persist an object, replacing any previous version.
    async fn save(&self, object: &RepositoryObject) -> Result<()>;

    /// Ids of every stored object, sorted.
    async fn list_ids(&self) -> Result<Vec<ObjectId>>;

    /// Load every stored object.
    ///
    /// Objects that vanish mid-scan are skipped. Any other load failure is
    /// recorded against its id and the scan continues; only a failure to
    /// list the store fails the whole call.
    async fn load_all(&self) -> Result<StoreSnapshot> {
        let mut snapshot = StoreSnapshot::default();
        for id in self.list_ids().await? {
            match self.load(&id).await {
                Ok(object) => snapshot.objects.push(object),
                Err(CurateError::NotFound { .. }) => continue,
                Err(e) => snapshot.unreadable.push((id, e)),
            }
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl<T: ObjectStoreEffects + ?Sized> ObjectStoreEffects for Arc<T> {
    async fn load(&self, id: &ObjectId) -> Result<RepositoryObject> {
        (**self).load(id).await
    }

    async fn save(&self, object: &RepositoryObject) -> Result<()> {
        (**self).save(object).await
    }

    async fn list_ids(&self) -> Result<Vec<ObjectId>> {
        (**self).list_ids().await
    }
}
