//! Authorization effect.

use crate::{Principal, RepositoryObject};
use async_trait::async_trait;
use std::sync::Arc;

/// Explicit capability checks, called before any mutation.
#[async_trait]
pub trait AuthorizationEffects: Send + Sync {
    /// Whether `principal` may edit `object`.
    async fn can_edit(&self, principal: &Principal, object: &RepositoryObject) -> bool;

    /// Whether `principal` may manage embargoes and leases repository-wide.
    async fn is_repository_manager(&self, principal: &Principal) -> bool;
}

#[async_trait]
impl<T: AuthorizationEffects + ?Sized> AuthorizationEffects for Arc<T> {
    async fn can_edit(&self, principal: &Principal, object: &RepositoryObject) -> bool {
        (**self).can_edit(principal, object).await
    }

    async fn is_repository_manager(&self, principal: &Principal) -> bool {
        (**self).is_repository_manager(principal).await
    }
}
