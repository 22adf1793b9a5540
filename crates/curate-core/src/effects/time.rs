//! Physical time effect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Wall-clock time used for expiration decisions.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current time.
    async fn now(&self) -> DateTime<Utc>;
}

/// Blanket implementation for Arc<T> where T: PhysicalTimeEffects
#[async_trait]
impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for Arc<T> {
    async fn now(&self) -> DateTime<Utc> {
        (**self).now().await
    }
}
