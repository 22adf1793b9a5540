//! `curate deactivate`

use super::Session;
use anyhow::{bail, Result};
use clap::Args;
use curate_access::{deactivate_batch, BatchOutcome, BatchRequest};
use curate_core::ObjectId;

#[derive(Args)]
pub struct DeactivateCommand {
    /// Objects to deactivate
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Copy the released visibility onto each object's file sets
    #[arg(long)]
    pub copy_visibility: bool,

    /// Lift embargoes and leases that have not expired yet
    #[arg(long)]
    pub early: bool,
}

pub async fn handle_deactivate_command(cmd: DeactivateCommand, session: &Session) -> Result<()> {
    let lifecycle = session.lifecycle();

    if cmd.early {
        let total = cmd.ids.len();
        let mut denied = 0;
        for id in cmd.ids {
            let id = ObjectId::new(id);
            let result = lifecycle
                .release_early(&session.principal, &id, cmd.copy_visibility)
                .await;
            match &result {
                Ok(outcome) => match outcome.report() {
                    Some(report) => println!("{id}: {}", report.record),
                    None => println!("{id}: nothing to do"),
                },
                Err(e) => println!("{id}: {e}"),
            }
            if BatchOutcome::from_result(result) == BatchOutcome::Denied {
                denied += 1;
            }
        }
        return exit_status(denied, total);
    }

    let mut request = BatchRequest::new(cmd.ids);
    if cmd.copy_visibility {
        request = request.copy_all();
    }
    let report = deactivate_batch(&lifecycle, &session.principal, &request).await;

    println!("{}", report.message());
    for entry in &report.entries {
        println!("  {}: {}", entry.id, entry.outcome);
    }
    exit_status(report.summary().denied, report.entries.len())
}

/// Fail the command when every requested object was denied.
fn exit_status(denied: usize, total: usize) -> Result<()> {
    if total > 0 && denied == total {
        bail!("authorization denied for every object");
    }
    Ok(())
}
