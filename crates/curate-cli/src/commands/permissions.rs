//! `curate copy-permissions`

use super::Session;
use anyhow::{bail, Result};
use clap::Args;
use curate_core::effects::{AccessTask, AuthorizationEffects, JobQueueEffects, ObjectStoreEffects};
use curate_core::ObjectId;

#[derive(Args)]
pub struct CopyPermissionsCommand {
    /// Work whose permissions are copied onto its file sets
    pub id: String,
}

pub async fn handle_copy_permissions_command(
    cmd: CopyPermissionsCommand,
    session: &Session,
) -> Result<()> {
    let parent = ObjectId::new(cmd.id);
    let work = session.effects.load(&parent).await?;
    if !session.effects.can_edit(&session.principal, &work).await {
        bail!("{} may not edit {parent}", session.principal.user);
    }

    let task = AccessTask::CopyPermissions { parent };
    if !session.effects.enqueue(task.clone()).await? {
        println!("{} already pending", task.key());
    }
    Ok(())
}

