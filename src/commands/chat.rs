//! Interactive chat session
//!
//! Drives the turn orchestrator from a rustyline input loop. The
//! assistant speaks first when the transcript is empty; slash commands
//! handle rotation, reset, and inline history browsing.

use crate::config::Config;
use crate::error::Result;
use crate::message::ChatMessage;
use crate::providers::create_provider;
use crate::turn::TurnOrchestrator;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive chat loop until the user quits
pub async fn run_chat(config: Config, provider_override: Option<String>) -> Result<()> {
    let provider = create_provider(&config, provider_override.as_deref())?;
    let session = super::open_session(&config)?;
    let mut orchestrator = TurnOrchestrator::new(session);

    println!();
    println!(
        "{} (provider: {})",
        "Confidant".bold(),
        provider.name().cyan()
    );
    println!(
        "Commands: {}  {}  {}  {}",
        "/new".cyan(),
        "/history".cyan(),
        "/clear".cyan(),
        "/quit".cyan()
    );
    println!();

    // Replay what's already on the table
    for message in orchestrator.display() {
        print_message(message);
    }

    if orchestrator.display().is_empty() {
        orchestrator
            .initiate(provider.as_ref(), &config.chat.system_prompt)
            .await?;
        print_latest(&orchestrator);
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match line {
                    "/quit" | "/exit" => break,
                    "/new" => {
                        match orchestrator.new_conversation()? {
                            Some(archived) => {
                                println!(
                                    "{}",
                                    format!("Archived \"{}\". Starting fresh.", archived.title)
                                        .green()
                                );
                            }
                            None => println!("{}", "Nothing to archive yet.".yellow()),
                        }
                        orchestrator
                            .initiate(provider.as_ref(), &config.chat.system_prompt)
                            .await?;
                        print_latest(&orchestrator);
                    }
                    "/clear" => {
                        orchestrator.reset()?;
                        println!("{}", "Conversation discarded.".yellow());
                    }
                    "/history" => print_history(&orchestrator),
                    _ => {
                        orchestrator.submit(provider.as_ref(), line).await?;
                        print_latest(&orchestrator);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Take care.".green());
    Ok(())
}

fn print_message(message: &ChatMessage) {
    if message.is_from_user {
        println!("{} {}", "you:".cyan().bold(), message.content);
    } else {
        println!("{} {}", "confidant:".green().bold(), message.content);
    }
}

fn print_latest(orchestrator: &TurnOrchestrator) {
    if let Some(message) = orchestrator.display().last() {
        print_message(message);
    }
}

fn print_history(orchestrator: &TurnOrchestrator) {
    let history = orchestrator.session().history();
    if history.is_empty() {
        println!("{}", "No archived conversations.".yellow());
        return;
    }

    for (i, session) in history.iter().enumerate() {
        println!(
            "{} {} ({} messages, {})",
            format!("{}.", i + 1).cyan(),
            session.title,
            session.message_count(),
            session.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}
