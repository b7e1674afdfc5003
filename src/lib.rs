//! Confidant - companion chat CLI library
//!
//! This library provides the core functionality for the Confidant chat
//! client: durable transcript storage, session rotation into a bounded
//! archive, one-turn round-trip orchestration, and assistant provider
//! abstractions.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: embedded key/value persistence for the transcript and archive
//! - `session`: transcript mutation, archival, eviction, and title derivation
//! - `turn`: the user-message / placeholder / reply state machine
//! - `providers`: assistant provider abstraction and implementations
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use confidant::message::ChatMessage;
//! use confidant::session::SessionManager;
//! use confidant::store::TranscriptStore;
//!
//! # fn main() -> confidant::error::Result<()> {
//! let store = TranscriptStore::open("/tmp/chat.db")?;
//! let session = SessionManager::new(store);
//! session.append(&ChatMessage::user("Hello there"))?;
//! assert_eq!(session.message_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod message;
pub mod providers;
pub mod session;
pub mod store;
pub mod turn;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfidantError, Result};
pub use message::{ChatMessage, LOADING_MESSAGE_ID};
pub use session::{PersistencePolicy, SessionManager};
pub use store::{ArchivedSession, TranscriptStore};
pub use turn::{TurnOrchestrator, TurnState};
