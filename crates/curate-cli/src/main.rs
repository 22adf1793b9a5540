//! Operator CLI for Curate
//!
//! Lists, sweeps and deactivates embargoes and leases, propagates work
//! permissions onto file sets and manages the operator mailbox. Every
//! command runs against the filesystem store named in the configuration.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{
    deactivate::{handle_deactivate_command, DeactivateCommand},
    list::{handle_list_command, ListCommand},
    notifications::{handle_notifications_command, NotificationsCommand},
    permissions::{handle_copy_permissions_command, CopyPermissionsCommand},
    sweep::{handle_sweep_command, SweepCommand},
    Session,
};

#[derive(Parser)]
#[command(name = "curate")]
#[command(
    about = "Curate - embargo, lease and permission maintenance for repository works",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Acting user
    #[arg(long, global = true, default_value = "operator")]
    user: String,

    /// Group memberships of the acting user
    #[arg(long = "group", global = true)]
    groups: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List embargoes and leases by phase
    List(ListCommand),
    /// Deactivate every expired embargo and lease
    Sweep(SweepCommand),
    /// Deactivate specific objects
    Deactivate(DeactivateCommand),
    /// Copy a work's permissions onto its file sets
    CopyPermissions(CopyPermissionsCommand),
    /// Operator mailbox
    #[command(subcommand)]
    Notifications(NotificationsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let session = Session::new(config, &cli.user, cli.groups);

    match cli.command {
        Commands::List(cmd) => handle_list_command(cmd, &session).await?,
        Commands::Sweep(cmd) => handle_sweep_command(cmd, &session).await?,
        Commands::Deactivate(cmd) => handle_deactivate_command(cmd, &session).await?,
        Commands::CopyPermissions(cmd) => handle_copy_permissions_command(cmd, &session).await?,
        Commands::Notifications(cmd) => handle_notifications_command(cmd, &session).await?,
    }

    session.drain_tasks().await;
    Ok(())
}
