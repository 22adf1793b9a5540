//! Clock handlers.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use curate_core::effects::PhysicalTimeEffects;
use parking_lot::Mutex;
use std::sync::Arc;

/// Real time handler for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    #[allow(clippy::disallowed_methods)]
    async fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Simulated time handler for tests and dry runs
///
/// Clones share the same clock, so a test can keep one handle and advance
/// time under code that holds another.
#[derive(Debug, Clone)]
pub struct SimulatedTimeHandler {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl SimulatedTimeHandler {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance simulated time
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    /// Set the absolute simulated time
    pub fn set(&self, to: DateTime<Utc>) {
        *self.current.lock() = to;
    }

    /// Current simulated time without going through the effect trait
    pub fn get(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[async_trait]
impl PhysicalTimeEffects for SimulatedTimeHandler {
    async fn now(&self) -> DateTime<Utc> {
        self.get()
    }
}
