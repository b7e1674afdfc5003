//! Session lifecycle management
//!
//! The session manager is the single source of truth the chat surface reads
//! and writes through. It owns transcript mutation, rotation of completed
//! conversations into the bounded archive, FIFO eviction, and display-title
//! derivation. All durable state goes through the [`TranscriptStore`].

use crate::error::Result;
use crate::message::ChatMessage;
use crate::store::{ArchivedSession, TranscriptStore};
use chrono::Utc;
use uuid::Uuid;

/// Default maximum number of archived sessions kept in history
pub const DEFAULT_MAX_ARCHIVED: usize = 10;

/// Maximum title length in characters before truncation
const TITLE_MAX_CHARS: usize = 20;

/// Title used when no usable user message exists
const DEFAULT_TITLE: &str = "new conversation";

/// How the session manager reacts to storage write failures
///
/// The original behavior is best-effort: a failed save leaves the prior
/// value in place and the mutation appears to have no effect, without
/// surfacing an error to the chat surface. Strict mode propagates failures
/// for callers that need to know a write was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistencePolicy {
    /// Log write failures at `warn` and continue (default)
    #[default]
    BestEffort,
    /// Propagate write failures to the caller
    Strict,
}

/// Transcript mutation, archival, and history access
///
/// The manager is the sole mutator of both the transcript and the archive.
/// It loads the working copy from the store on every operation, so there is
/// no in-memory state to drift from durable state.
pub struct SessionManager {
    store: TranscriptStore,
    max_archived: usize,
    policy: PersistencePolicy,
}

impl SessionManager {
    /// Create a session manager over the given store with the default bound
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use confidant::session::SessionManager;
    /// use confidant::store::TranscriptStore;
    ///
    /// # fn main() -> confidant::error::Result<()> {
    /// let store = TranscriptStore::open("/tmp/chat.db")?;
    /// let session = SessionManager::new(store);
    /// assert_eq!(session.message_count(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(store: TranscriptStore) -> Self {
        Self {
            store,
            max_archived: DEFAULT_MAX_ARCHIVED,
            policy: PersistencePolicy::default(),
        }
    }

    /// Create a session manager with an explicit archive bound and policy
    pub fn with_options(
        store: TranscriptStore,
        max_archived: usize,
        policy: PersistencePolicy,
    ) -> Self {
        Self {
            store,
            max_archived: max_archived.max(1),
            policy,
        }
    }

    /// Append a message to the active transcript
    ///
    /// The transient placeholder (id `"loading"`) is rejected as a no-op.
    /// Append order defines chronological order; duplicate ids are permitted
    /// and not merged.
    ///
    /// # Errors
    ///
    /// Under [`PersistencePolicy::Strict`], returns the storage error if the
    /// save fails. Best-effort mode always returns `Ok`.
    pub fn append(&self, message: &ChatMessage) -> Result<()> {
        if message.is_placeholder() {
            tracing::trace!("Skipping placeholder message append");
            return Ok(());
        }

        let mut transcript = self.store.load_transcript();
        transcript.push(message.clone());
        self.commit(self.store.save_transcript(&transcript))
    }

    /// The active transcript in append order
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.store.load_transcript()
    }

    /// Number of messages in the active transcript
    pub fn message_count(&self) -> usize {
        self.store.load_transcript().len()
    }

    /// User-authored message bodies, most recent first
    ///
    /// Downstream consumers prioritize recent input, so the reverse
    /// chronological ordering here is part of the contract.
    pub fn user_texts(&self) -> Vec<String> {
        self.store
            .load_transcript()
            .into_iter()
            .filter(|m| m.is_from_user)
            .map(|m| m.content)
            .rev()
            .collect()
    }

    /// Rotate the active transcript into the archive
    ///
    /// No-op returning `None` when the transcript is empty. Otherwise the
    /// transcript is snapshotted into a new [`ArchivedSession`] with a fresh
    /// id and a derived title, the archive is truncated from the front until
    /// it fits the bound, and the transcript is cleared.
    pub fn archive_current(&self) -> Result<Option<ArchivedSession>> {
        let messages = self.store.load_transcript();
        if messages.is_empty() {
            tracing::debug!("Transcript empty, nothing to archive");
            return Ok(None);
        }

        let session = ArchivedSession {
            id: Uuid::new_v4().to_string(),
            title: derive_title(&messages),
            created_at: Utc::now(),
            messages,
        };

        let mut history = self.store.load_archive();
        history.push(session.clone());

        // FIFO eviction: drop oldest entries until the bound holds
        if history.len() > self.max_archived {
            let excess = history.len() - self.max_archived;
            history.drain(..excess);
        }

        self.commit(self.store.save_archive(&history))?;
        self.commit(self.store.clear_transcript())?;

        tracing::info!("Archived conversation: {}", session.title);
        Ok(Some(session))
    }

    /// Remove the transcript without archiving
    pub fn clear_transcript(&self) -> Result<()> {
        self.commit(self.store.clear_transcript())
    }

    /// Remove the archive, leaving the transcript intact
    pub fn clear_history(&self) -> Result<()> {
        self.commit(self.store.clear_archive())
    }

    /// Remove both the transcript and the archive
    pub fn clear_all(&self) -> Result<()> {
        self.commit(self.store.clear_all())
    }

    /// Archived sessions, oldest first
    pub fn history(&self) -> Vec<ArchivedSession> {
        self.store.load_archive()
    }

    /// Maximum number of archived sessions retained
    pub fn max_archived(&self) -> usize {
        self.max_archived
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &TranscriptStore {
        &self.store
    }

    fn commit(&self, result: Result<()>) -> Result<()> {
        match (self.policy, result) {
            (_, Ok(())) => Ok(()),
            (PersistencePolicy::BestEffort, Err(e)) => {
                tracing::warn!("Dropping failed storage write: {}", e);
                Ok(())
            }
            (PersistencePolicy::Strict, Err(e)) => Err(e),
        }
    }
}

/// Derive a display title from a session's messages
///
/// Uses the first user-authored message in chronological order, trimmed of
/// surrounding whitespace and truncated to 20 characters with an ellipsis
/// marker. Sessions with no usable user message get a fixed fallback.
fn derive_title(messages: &[ChatMessage]) -> String {
    let first_user = match messages.iter().find(|m| m.is_from_user) {
        Some(m) => m,
        None => return DEFAULT_TITLE.to_string(),
    };

    let content = first_user.content.trim();
    if content.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    if content.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        content.to_string()
    }
}
