//! Command-line interface definition for Confidant
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and history browsing.

use clap::{Parser, Subcommand};

/// Confidant - companion chat CLI
///
/// Chat with an AI companion whose conversations persist locally and
/// rotate into a bounded history.
#[derive(Parser, Debug, Clone)]
#[command(name = "confidant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat database path
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Confidant
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the provider from config (doubao, ollama)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Browse and manage archived conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List archived conversations, oldest first
    List,

    /// Replay one archived conversation
    Show {
        /// Index of the conversation, as printed by `history list`
        #[arg(short, long)]
        index: usize,
    },

    /// Delete all archived conversations
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["confidant", "chat"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_with_provider() {
        let cli = Cli::try_parse_from(["confidant", "chat", "--provider", "ollama"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Chat { provider } = cli.command {
            assert_eq!(provider, Some("ollama".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_history_list() {
        let cli = Cli::try_parse_from(["confidant", "history", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::History { command } = cli.command {
            assert!(matches!(command, HistoryCommand::List));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_history_show_with_index() {
        let cli = Cli::try_parse_from(["confidant", "history", "show", "--index", "2"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::History { command } = cli.command {
            if let HistoryCommand::Show { index } = command {
                assert_eq!(index, 2);
            } else {
                panic!("Expected Show command");
            }
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_history_clear() {
        let cli = Cli::try_parse_from(["confidant", "history", "clear"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::History { command } = cli.command {
            assert!(matches!(command, HistoryCommand::Clear));
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_with_storage_path() {
        let cli = Cli::try_parse_from(["confidant", "--storage-path", "/tmp/alt.db", "chat"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.storage_path, Some("/tmp/alt.db".to_string()));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::try_parse_from(["confidant", "--config", "custom.yaml", "history", "list"]);
        assert!(cli.is_ok());
        assert_eq!(cli.unwrap().config, "custom.yaml");
    }

    #[test]
    fn test_cli_config_defaults_when_omitted() {
        let cli = Cli::try_parse_from(["confidant", "chat"]).expect("parse failed");
        assert_eq!(cli.config, "config/config.yaml");
    }

    #[test]
    fn test_cli_parse_with_verbose() {
        let cli = Cli::try_parse_from(["confidant", "-v", "chat"]);
        assert!(cli.is_ok());
        assert!(cli.unwrap().verbose);
    }

    #[test]
    fn test_cli_parse_missing_command() {
        let cli = Cli::try_parse_from(["confidant"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        let cli = Cli::try_parse_from(["confidant", "invalid"]);
        assert!(cli.is_err());
    }
}
