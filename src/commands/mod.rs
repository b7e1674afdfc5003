//! Command handlers for the Confidant CLI

pub mod chat;
pub mod history;

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionManager;
use crate::store::TranscriptStore;

/// Open the session manager the way every command does
///
/// The database path comes from config (already merged with the CLI
/// override) or falls back to the store's default resolution.
pub fn open_session(config: &Config) -> Result<SessionManager> {
    let store = match &config.session.storage_path {
        Some(path) => TranscriptStore::open(path)?,
        None => TranscriptStore::open_default()?,
    };

    Ok(SessionManager::with_options(
        store,
        config.session.max_archived,
        config.session.policy()?,
    ))
}
