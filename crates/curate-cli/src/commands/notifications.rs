//! `curate notifications`

use super::Session;
use anyhow::Result;
use clap::Subcommand;
use curate_access::UserMailbox;

#[derive(Subcommand)]
pub enum NotificationsCommand {
    /// Show the acting user's inbox, newest first
    List,
    /// Delete every message
    Clear,
    /// Delete one message
    Delete {
        /// Message id
        id: String,
    },
}

pub async fn handle_notifications_command(
    cmd: NotificationsCommand,
    session: &Session,
) -> Result<()> {
    let mailbox = UserMailbox::new(&session.effects, session.principal.user.clone());
    match cmd {
        NotificationsCommand::List => {
            let inbox = mailbox.inbox().await?;
            if inbox.is_empty() {
                println!("No notifications for {}.", mailbox.user());
            }
            for message in inbox {
                println!(
                    "{}  {}  {}",
                    message.id,
                    message.created_at.format("%Y-%m-%d %H:%M"),
                    message.subject
                );
                for line in message.body.lines() {
                    println!("    {line}");
                }
            }
        }
        NotificationsCommand::Clear => println!("{}", mailbox.delete_all().await?),
        NotificationsCommand::Delete { id } => println!("{}", mailbox.destroy(&id).await?),
    }
    Ok(())
}
