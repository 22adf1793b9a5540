//! `curate list`

use super::Session;
use anyhow::Result;
use clap::{Args, ValueEnum};
use curate_access::{ExpirationScan, TimedStatus};
use curate_core::TimedKind;

/// Which index to show
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ListView {
    /// Active embargoes
    #[default]
    Embargoes,
    /// Active leases
    Leases,
    /// Embargoes and leases past their deadline
    Expired,
    /// Deactivation history
    Deactivated,
}

#[derive(Args)]
pub struct ListCommand {
    #[arg(value_enum, default_value_t = ListView::Embargoes)]
    pub view: ListView,

    /// Restrict `deactivated` to one kind
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<TimedKind>,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_kind(raw: &str) -> Result<TimedKind, String> {
    match raw {
        "embargo" => Ok(TimedKind::Embargo),
        "lease" => Ok(TimedKind::Lease),
        other => Err(format!("expected 'embargo' or 'lease', got '{other}'")),
    }
}

pub async fn handle_list_command(cmd: ListCommand, session: &Session) -> Result<()> {
    let listing = ExpirationScan::new(&session.effects)
        .scan(&session.principal)
        .await?;
    for (id, error) in listing.unreadable() {
        eprintln!("warning: {id} could not be read: {error}");
    }

    let rows: Vec<&TimedStatus> = match cmd.view {
        ListView::Embargoes => listing.active(TimedKind::Embargo),
        ListView::Leases => listing.active(TimedKind::Lease),
        ListView::Expired => listing.expired(cmd.kind),
        ListView::Deactivated => {
            let kinds = match cmd.kind {
                Some(kind) => vec![kind],
                None => vec![TimedKind::Embargo, TimedKind::Lease],
            };
            for kind in kinds {
                for (id, record) in listing.deactivated(kind) {
                    println!("{id}\t{record}");
                }
            }
            return Ok(());
        }
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("Nothing to list.");
        return Ok(());
    }
    for status in rows {
        let drift = if status.drifted { "  (visibility drifted)" } else { "" };
        println!(
            "{}\t{}\t{}\t{}{drift}",
            status.id,
            status.kind,
            status.deadline.to_rfc3339(),
            status.visibility
        );
    }
    Ok(())
}
