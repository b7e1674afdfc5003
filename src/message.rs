//! Chat message data model
//!
//! Defines the message type shared by the transcript store, the session
//! manager, and the providers, along with the reserved placeholder id used
//! for the transient "thinking" indicator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved id for the transient in-flight placeholder message.
///
/// A message carrying this id only ever lives in the display list of the
/// turn orchestrator; it is never written to the transcript store.
pub const LOADING_MESSAGE_ID: &str = "loading";

/// A single chat message
///
/// Messages are authored either by the user or by the assistant and are
/// persisted in append order, which defines chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Opaque unique identifier (UUID v4 for real messages)
    pub id: String,
    /// Text body of the message
    pub content: String,
    /// True if the user authored this message, false for the assistant
    pub is_from_user: bool,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new user-authored message with a fresh id
    ///
    /// # Examples
    ///
    /// ```
    /// use confidant::message::ChatMessage;
    ///
    /// let msg = ChatMessage::user("Hello there");
    /// assert!(msg.is_from_user);
    /// assert!(!msg.is_placeholder());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            is_from_user: true,
            timestamp: Utc::now(),
        }
    }

    /// Creates a new assistant-authored message with a fresh id
    ///
    /// # Examples
    ///
    /// ```
    /// use confidant::message::ChatMessage;
    ///
    /// let msg = ChatMessage::assistant("Hello, I'm here to listen.");
    /// assert!(!msg.is_from_user);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            is_from_user: false,
            timestamp: Utc::now(),
        }
    }

    /// Creates the transient placeholder shown while a round trip is in flight
    ///
    /// The placeholder carries the reserved `"loading"` id and must never be
    /// persisted; the session manager rejects it on append.
    pub fn placeholder(content: impl Into<String>) -> Self {
        Self {
            id: LOADING_MESSAGE_ID.to_string(),
            content: content.into(),
            is_from_user: false,
            timestamp: Utc::now(),
        }
    }

    /// Returns true if this message is the transient placeholder
    pub fn is_placeholder(&self) -> bool {
        self.id == LOADING_MESSAGE_ID
    }
}
