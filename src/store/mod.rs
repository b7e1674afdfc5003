//! Durable storage for the active transcript and the session archive
//!
//! Two named collections live under stable keys in an embedded `sled`
//! database: the in-progress transcript and the bounded list of archived
//! sessions. Every write is flushed before returning, so a completed save
//! is durable. Reads treat missing or corrupt data as "no data".

use crate::error::{ConfidantError, Result};
use crate::message::ChatMessage;
use directories::ProjectDirs;
use sled::Db;
#[cfg(test)]
use std::cell::Cell;
use std::path::{Path, PathBuf};

pub mod types;
pub use types::ArchivedSession;

/// Key under which the active transcript is stored
const TRANSCRIPT_KEY: &[u8] = b"transcript";

/// Key under which the archived session list is stored
const ARCHIVE_KEY: &[u8] = b"archive";

/// Storage backend for the transcript and the conversation archive
///
/// This is the only component that touches durable storage. Callers get
/// full-value semantics: each save serializes and overwrites the whole
/// collection, and each load reconstructs it in insertion order.
pub struct TranscriptStore {
    db: Db,
    #[cfg(test)]
    fail_after: Cell<Option<usize>>,
}

impl TranscriptStore {
    /// Open or create a store at the given path
    ///
    /// # Errors
    ///
    /// Returns `ConfidantError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use confidant::store::TranscriptStore;
    ///
    /// # fn main() -> confidant::error::Result<()> {
    /// let store = TranscriptStore::open("/tmp/chat.db")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ConfidantError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self {
            db,
            #[cfg(test)]
            fail_after: Cell::new(None),
        })
    }

    /// Open the store at its default location
    ///
    /// Honors a `CONFIDANT_CHAT_DB` environment override, which makes it
    /// easy to point the binary at a test DB or alternate file without
    /// changing the user's application data dir. Otherwise the database
    /// lives under the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Resolve the database path (env override first, then data dir)
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(override_path) = std::env::var("CONFIDANT_CHAT_DB") {
            return Ok(PathBuf::from(override_path));
        }

        let proj_dirs = ProjectDirs::from("com", "confidant-cli", "confidant").ok_or_else(|| {
            ConfidantError::Storage("Could not determine data directory".into())
        })?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| ConfidantError::Storage(format!("Failed to create data directory: {}", e)))?;

        Ok(data_dir.join("chat.db"))
    }

    /// Load the active transcript
    ///
    /// Returns the empty list if nothing is stored or if the stored value
    /// fails to deserialize. Corruption is treated as absence, never as a
    /// fatal error.
    pub fn load_transcript(&self) -> Vec<ChatMessage> {
        self.load_collection(TRANSCRIPT_KEY, "transcript")
    }

    /// Overwrite the stored transcript in full
    ///
    /// The value is flushed before returning, so a successful save is
    /// durable. On failure the prior value is left in place.
    ///
    /// # Errors
    ///
    /// Returns `ConfidantError::Storage` if serialization or the write fails
    pub fn save_transcript(&self, messages: &[ChatMessage]) -> Result<()> {
        self.save_collection(TRANSCRIPT_KEY, messages)
    }

    /// Load the archived session list, oldest first
    ///
    /// Same contract as [`load_transcript`](Self::load_transcript): missing
    /// or corrupt data yields the empty list.
    pub fn load_archive(&self) -> Vec<ArchivedSession> {
        self.load_collection(ARCHIVE_KEY, "archive")
    }

    /// Overwrite the stored archive in full
    ///
    /// # Errors
    ///
    /// Returns `ConfidantError::Storage` if serialization or the write fails
    pub fn save_archive(&self, sessions: &[ArchivedSession]) -> Result<()> {
        self.save_collection(ARCHIVE_KEY, sessions)
    }

    /// Remove the stored transcript
    pub fn clear_transcript(&self) -> Result<()> {
        self.remove_key(TRANSCRIPT_KEY)
    }

    /// Remove the stored archive
    pub fn clear_archive(&self) -> Result<()> {
        self.remove_key(ARCHIVE_KEY)
    }

    /// Remove both collections
    pub fn clear_all(&self) -> Result<()> {
        self.remove_key(TRANSCRIPT_KEY)?;
        self.remove_key(ARCHIVE_KEY)
    }

    fn load_collection<T: serde::de::DeserializeOwned>(&self, key: &[u8], label: &str) -> Vec<T> {
        match self.db.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt {} data: {}", label, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", label, e);
                Vec::new()
            }
        }
    }

    /// Arm a one-shot write failure after the given number of successful writes
    ///
    /// Reads are unaffected. The fault disarms once it fires, so the store
    /// recovers for subsequent writes.
    #[cfg(test)]
    pub(crate) fn fail_writes_after(&self, successes: usize) {
        self.fail_after.set(Some(successes));
    }

    #[cfg(test)]
    fn check_write_fault(&self) -> Result<()> {
        if let Some(remaining) = self.fail_after.get() {
            if remaining == 0 {
                self.fail_after.set(None);
                return Err(
                    ConfidantError::Storage("injected write failure".to_string()).into(),
                );
            }
            self.fail_after.set(Some(remaining - 1));
        }
        Ok(())
    }

    fn save_collection<T: serde::Serialize>(&self, key: &[u8], value: &[T]) -> Result<()> {
        #[cfg(test)]
        self.check_write_fault()?;

        let bytes = serde_json::to_vec(value)
            .map_err(|e| ConfidantError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(key, bytes)
            .map_err(|e| ConfidantError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ConfidantError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove_key(&self, key: &[u8]) -> Result<()> {
        #[cfg(test)]
        self.check_write_fault()?;

        self.db
            .remove(key)
            .map_err(|e| ConfidantError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ConfidantError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}
