use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::{ConfidantError, Result};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let session = super::open_session(config)?;

    match command {
        HistoryCommand::List => {
            let history = session.history();

            if history.is_empty() {
                println!("{}", "No archived conversations.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "#".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Archived".bold()
            ]);

            for (i, archived) in history.iter().enumerate() {
                table.add_row(prettytable::row![
                    format!("{}", i + 1).cyan(),
                    archived.title,
                    archived.message_count(),
                    archived.created_at.format("%Y-%m-%d %H:%M")
                ]);
            }

            println!("\nArchived conversations (oldest first):");
            table.printstd();
            println!();
            println!(
                "Use {} to replay one.",
                "confidant history show --index <n>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { index } => {
            let history = session.history();
            if index == 0 || index > history.len() {
                return Err(ConfidantError::Config(format!(
                    "No archived conversation at index {} (have {})",
                    index,
                    history.len()
                ))
                .into());
            }

            let archived = &history[index - 1];
            println!();
            println!(
                "{} ({})",
                archived.title.bold(),
                archived.created_at.format("%Y-%m-%d %H:%M")
            );
            println!();
            for message in &archived.messages {
                if message.is_from_user {
                    println!("{} {}", "you:".cyan().bold(), message.content);
                } else {
                    println!("{} {}", "confidant:".green().bold(), message.content);
                }
            }
            println!();
        }
        HistoryCommand::Clear => {
            session.clear_history()?;
            println!("{}", "Cleared archived conversations.".green());
        }
    }

    Ok(())
}
