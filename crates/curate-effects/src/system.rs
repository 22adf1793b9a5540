//! Composed effect system.
//!
//! [`CurateEffectSystem`] bundles one handler per effect trait and implements
//! every trait by delegation, so domain code can take a single `&E` bounded
//! by `AccessEffects` or `OperatorEffects`.

use crate::{
    AclAuthorizationHandler, FilesystemMailbox, FilesystemObjectStore, MemoryJobQueue,
    MemoryMailbox, MemoryObjectStore, RealTimeHandler, SimulatedTimeHandler,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use curate_core::effects::{
    AccessTask, AuthorizationEffects, JobQueueEffects, MailboxEffects, Notification,
    ObjectStoreEffects, PhysicalTimeEffects,
};
use curate_core::{CurateConfig, ObjectId, Principal, RepositoryObject, Result, UserId};
use std::sync::Arc;
use uuid::Uuid;

/// Directory under the store root that holds mailboxes.
pub const MAILBOX_DIR: &str = ".mailbox";

/// One value implementing every Curate effect trait
#[derive(Clone)]
pub struct CurateEffectSystem {
    store: Arc<dyn ObjectStoreEffects>,
    authorization: AclAuthorizationHandler,
    clock: Arc<dyn PhysicalTimeEffects>,
    queue: MemoryJobQueue,
    mailbox: Arc<dyn MailboxEffects>,
}

impl CurateEffectSystem {
    /// Compose from explicit handlers
    pub fn new(
        store: Arc<dyn ObjectStoreEffects>,
        authorization: AclAuthorizationHandler,
        clock: Arc<dyn PhysicalTimeEffects>,
        mailbox: Arc<dyn MailboxEffects>,
    ) -> Self {
        Self {
            store,
            authorization,
            clock,
            queue: MemoryJobQueue::new(),
            mailbox,
        }
    }

    /// Production wiring from configuration: filesystem store and mailbox, real clock
    pub fn from_config(config: &CurateConfig) -> Self {
        let root = config.store.root.clone();
        Self::new(
            Arc::new(FilesystemObjectStore::new(root.clone())),
            AclAuthorizationHandler::new(config.authorization.admin_groups.iter().cloned()),
            Arc::new(RealTimeHandler::new()),
            Arc::new(FilesystemMailbox::new(root.join(MAILBOX_DIR))),
        )
    }

    /// Fully in-memory wiring driven by a simulated clock
    pub fn in_memory(
        store: MemoryObjectStore,
        clock: SimulatedTimeHandler,
        admin_groups: &[&str],
    ) -> Self {
        Self::new(
            Arc::new(store),
            AclAuthorizationHandler::new(admin_groups.iter().copied()),
            Arc::new(clock),
            Arc::new(MemoryMailbox::new()),
        )
    }

    /// Replace the job queue, e.g. to share one queue between systems
    pub fn with_queue(mut self, queue: MemoryJobQueue) -> Self {
        self.queue = queue;
        self
    }

    /// The job queue tasks are enqueued on
    pub fn queue(&self) -> &MemoryJobQueue {
        &self.queue
    }
}

impl std::fmt::Debug for CurateEffectSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurateEffectSystem")
            .field("authorization", &self.authorization)
            .field("pending_tasks", &self.queue.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ObjectStoreEffects for CurateEffectSystem {
    async fn load(&self, id: &ObjectId) -> Result<RepositoryObject> {
        self.store.load(id).await
    }

    async fn save(&self, object: &RepositoryObject) -> Result<()> {
        self.store.save(object).await
    }

    async fn list_ids(&self) -> Result<Vec<ObjectId>> {
        self.store.list_ids().await
    }
}

#[async_trait]
impl AuthorizationEffects for CurateEffectSystem {
    async fn can_edit(&self, principal: &Principal, object: &RepositoryObject) -> bool {
        self.authorization.can_edit(principal, object).await
    }

    async fn is_repository_manager(&self, principal: &Principal) -> bool {
        self.authorization.is_repository_manager(principal).await
    }
}

#[async_trait]
impl PhysicalTimeEffects for CurateEffectSystem {
    async fn now(&self) -> DateTime<Utc> {
        self.clock.now().await
    }
}

#[async_trait]
impl JobQueueEffects for CurateEffectSystem {
    async fn enqueue(&self, task: AccessTask) -> Result<bool> {
        self.queue.enqueue(task).await
    }
}

#[async_trait]
impl MailboxEffects for CurateEffectSystem {
    async fn deliver(&self, notification: Notification) -> Result<()> {
        self.mailbox.deliver(notification).await
    }

    async fn inbox(&self, user: &UserId) -> Result<Vec<Notification>> {
        self.mailbox.inbox(user).await
    }

    async fn remove(&self, user: &UserId, id: Uuid) -> Result<bool> {
        self.mailbox.remove(user, id).await
    }

    async fn clear(&self, user: &UserId) -> Result<usize> {
        self.mailbox.clear(user).await
    }
}
