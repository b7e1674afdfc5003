//! Base provider trait for assistant backends
//!
//! A provider performs exactly one outbound call per conversation turn:
//! either the reply to a user message, or the assistant-first opening
//! message of a fresh conversation.

use crate::error::Result;
use crate::message::ChatMessage;
use async_trait::async_trait;

/// Assistant backend abstraction
///
/// Implementations translate the transcript into their wire format and
/// return the assistant's reply text. Errors are plain `Result` errors
/// here; the turn orchestrator converts them into visible chat messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a user message with the conversation so far and return the reply
    ///
    /// `history` contains the prior conversation in chronological order,
    /// excluding the message being sent; the transient placeholder is never
    /// part of it.
    async fn send_message(&self, text: &str, history: &[ChatMessage]) -> Result<String>;

    /// Ask the assistant to open a fresh conversation
    ///
    /// Used when the transcript is empty so the assistant speaks first.
    async fn initiate_conversation(&self, system_prompt: &str) -> Result<String>;

    /// Human-readable provider name for logging and display
    fn name(&self) -> &str;
}
