//! `curate sweep`

use super::Session;
use anyhow::Result;
use clap::Args;
use curate_access::Sweeper;
use tracing::info;

#[derive(Args)]
pub struct SweepCommand {
    /// Copy released visibility onto file sets regardless of configuration
    #[arg(long)]
    pub copy_visibility: bool,
}

pub async fn handle_sweep_command(cmd: SweepCommand, session: &Session) -> Result<()> {
    let mut sweeper = Sweeper::from_config(&session.effects, &session.config);
    if cmd.copy_visibility {
        sweeper = sweeper.copy_visibility(true);
    }
    let report = sweeper.sweep(&session.principal).await?;

    info!(timed = report.timed, expired = report.batch.entries.len(), "sweep complete");
    println!("{}", report.batch.message());
    for entry in &report.batch.entries {
        println!("  {}: {}", entry.id, entry.outcome);
    }
    if let Some(notification) = &report.notification {
        println!("Summary sent to {} ({})", notification.recipient, notification.id);
    }
    if let Some(e) = &report.notification_error {
        eprintln!("Summary could not be delivered: {e}");
    }
    Ok(())
}
