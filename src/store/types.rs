use crate::message::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed conversation rotated into the archive
///
/// The message list is an ordered snapshot taken at archive time and is
/// immutable from then on. `created_at` records when the session was
/// archived, not when its first message was sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedSession {
    /// Unique identifier, generated at archive time
    pub id: String,
    /// Ordered snapshot of the archived transcript
    pub messages: Vec<ChatMessage>,
    /// Time the session was archived
    pub created_at: DateTime<Utc>,
    /// Derived display title
    pub title: String,
}

impl ArchivedSession {
    /// Number of messages captured in this session
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
