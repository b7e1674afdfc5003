//! One-turn round-trip orchestration
//!
//! A conversation turn is one user message plus the resulting assistant
//! reply or error message. While the provider call is in flight the display
//! list carries a transient placeholder that is never persisted. At most
//! one round trip runs at a time per transcript; the provider call is the
//! only await point, so no locking is needed.

use crate::error::Result;
use crate::message::ChatMessage;
use crate::providers::Provider;
use crate::session::SessionManager;
use crate::store::ArchivedSession;

/// Placeholder body shown while a reply is in flight
const THINKING_PLACEHOLDER: &str = "Thinking...";

/// Placeholder body shown while the opening message is in flight
const WARMING_UP_PLACEHOLDER: &str = "Warming up...";

/// State of the current conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// No round trip in flight; user input is accepted
    Idle,
    /// Exactly one provider call is outstanding
    AwaitingReply,
}

/// Drives the user-message / placeholder / reply protocol
///
/// Owns the in-memory display list the chat surface renders. All persisted
/// mutation goes through the [`SessionManager`]; the placeholder only ever
/// exists in the display list, always as its last element.
pub struct TurnOrchestrator {
    session: SessionManager,
    display: Vec<ChatMessage>,
    state: TurnState,
}

impl TurnOrchestrator {
    /// Create an orchestrator, seeding the display list from the transcript
    pub fn new(session: SessionManager) -> Self {
        let display = session.transcript();
        Self {
            session,
            display,
            state: TurnState::Idle,
        }
    }

    /// The messages to render, in order
    pub fn display(&self) -> &[ChatMessage] {
        &self.display
    }

    /// Current turn state
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// True while a provider call is outstanding
    pub fn is_awaiting(&self) -> bool {
        self.state == TurnState::AwaitingReply
    }

    /// The underlying session manager
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Submit a user message and run one round trip to completion
    ///
    /// Appends the user message to the transcript, shows the placeholder,
    /// makes exactly one provider call, then replaces the placeholder with
    /// the reply. Provider failure is converted into a visible assistant
    /// message and never propagated.
    ///
    /// A submission while a round trip is already in flight is refused as a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Only storage errors escape, and only under a strict persistence
    /// policy.
    pub async fn submit(&mut self, provider: &dyn Provider, text: &str) -> Result<()> {
        if self.is_awaiting() {
            tracing::warn!("Refusing submission while a round trip is in flight");
            return Ok(());
        }

        let user_message = ChatMessage::user(text);
        self.session.append(&user_message)?;
        self.display.push(user_message);

        // History for the provider: everything before this user message
        let history: Vec<ChatMessage> = self.display[..self.display.len() - 1].to_vec();

        self.state = TurnState::AwaitingReply;
        self.display.push(ChatMessage::placeholder(THINKING_PLACEHOLDER));

        let outcome = provider.send_message(text, &history).await;
        self.remove_placeholder();

        let reply = match outcome {
            Ok(content) => ChatMessage::assistant(content),
            Err(e) => {
                tracing::warn!("Provider call failed: {}", e);
                ChatMessage::assistant(format!("Sorry, I ran into a problem: {}", e))
            }
        };

        // Idle must be restored before a strict-policy append error escapes
        self.state = TurnState::Idle;
        self.session.append(&reply)?;
        self.display.push(reply);

        Ok(())
    }

    /// Let the assistant open a fresh conversation
    ///
    /// Used when the transcript is empty so the assistant speaks first.
    /// Follows the same placeholder protocol as [`submit`](Self::submit);
    /// a failure becomes a visible assistant message. No-op when the
    /// display already has messages or a round trip is in flight.
    pub async fn initiate(&mut self, provider: &dyn Provider, system_prompt: &str) -> Result<()> {
        if self.is_awaiting() || !self.display.is_empty() {
            return Ok(());
        }

        self.state = TurnState::AwaitingReply;
        self.display
            .push(ChatMessage::placeholder(WARMING_UP_PLACEHOLDER));

        let outcome = provider.initiate_conversation(system_prompt).await;
        self.remove_placeholder();

        let opening = match outcome {
            Ok(content) => ChatMessage::assistant(content),
            Err(e) => {
                tracing::warn!("Conversation initiation failed: {}", e);
                ChatMessage::assistant(format!(
                    "Sorry, something went wrong while starting our conversation: {}",
                    e
                ))
            }
        };

        self.state = TurnState::Idle;
        self.session.append(&opening)?;
        self.display.push(opening);

        Ok(())
    }

    /// Archive the current conversation and reset the display
    ///
    /// Returns the archived session, or `None` when the transcript was
    /// empty or a round trip is in flight.
    pub fn new_conversation(&mut self) -> Result<Option<ArchivedSession>> {
        if self.is_awaiting() {
            tracing::warn!("Refusing rotation while a round trip is in flight");
            return Ok(None);
        }

        let archived = self.session.archive_current()?;
        self.display.clear();
        Ok(archived)
    }

    /// Hard reset: discard the transcript and display without archiving
    pub fn reset(&mut self) -> Result<()> {
        if self.is_awaiting() {
            tracing::warn!("Refusing reset while a round trip is in flight");
            return Ok(());
        }

        self.session.clear_transcript()?;
        self.display.clear();
        Ok(())
    }

    /// The placeholder, if present, is always the last display element
    fn remove_placeholder(&mut self) {
        if self.display.last().map_or(false, |m| m.is_placeholder()) {
            self.display.pop();
        }
    }

    #[cfg(test)]
    fn force_state(&mut self, state: TurnState) {
        self.state = state;
    }
}
