//! Doubao provider implementation
//!
//! Connects to an OpenAI-compatible chat-completions endpoint (Volcano
//! Engine Ark by default) to generate assistant replies. The configured
//! system prompt is prepended to every request.

use crate::config::DoubaoConfig;
use crate::error::{ConfidantError, Result};
use crate::message::ChatMessage;
use crate::providers::Provider;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Doubao (Ark) chat-completions provider
///
/// # Examples
///
/// ```no_run
/// use confidant::config::DoubaoConfig;
/// use confidant::providers::{DoubaoProvider, Provider};
///
/// # async fn example() -> confidant::error::Result<()> {
/// let config = DoubaoConfig {
///     api_key: Some("test-key".to_string()),
///     ..Default::default()
/// };
/// let provider = DoubaoProvider::new(config, "You are a warm companion.".to_string())?;
/// let reply = provider.send_message("Hello!", &[]).await?;
/// # Ok(())
/// # }
/// ```
pub struct DoubaoProvider {
    client: Client,
    config: DoubaoConfig,
    system_prompt: String,
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
}

/// Message in the provider wire format
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

/// Response body from the chat-completions endpoint
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

impl DoubaoProvider {
    /// Create a new Doubao provider
    ///
    /// # Errors
    ///
    /// Returns `ConfidantError::MissingCredentials` if no API key is
    /// available from config or the `ARK_API_KEY` environment variable.
    pub fn new(config: DoubaoConfig, system_prompt: String) -> Result<Self> {
        if Self::resolve_api_key(&config).is_none() {
            return Err(ConfidantError::MissingCredentials("doubao".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            system_prompt,
        })
    }

    fn resolve_api_key(config: &DoubaoConfig) -> Option<String> {
        config
            .api_key
            .clone()
            .or_else(|| std::env::var("ARK_API_KEY").ok())
    }

    /// Build the wire message list: system prompt, history, then the turn
    fn build_messages(&self, history: &[ChatMessage], turn: Option<&str>) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: self.system_prompt.clone(),
        });

        for message in history {
            messages.push(WireMessage {
                role: if message.is_from_user {
                    "user".to_string()
                } else {
                    "assistant".to_string()
                },
                content: message.content.clone(),
            });
        }

        if let Some(text) = turn {
            messages.push(WireMessage {
                role: "user".to_string(),
                content: text.to_string(),
            });
        }

        messages
    }

    async fn complete(&self, messages: Vec<WireMessage>) -> Result<String> {
        let api_key = Self::resolve_api_key(&self.config)
            .ok_or_else(|| ConfidantError::MissingCredentials("doubao".to_string()))?;

        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
        };

        tracing::debug!("Sending completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ConfidantError::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConfidantError::Provider(format!(
                "Doubao API returned {}: {}",
                status, body
            ))
            .into());
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ConfidantError::Provider(format!("Invalid response body: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ConfidantError::Provider("Response contained no choices".to_string()))?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl Provider for DoubaoProvider {
    async fn send_message(&self, text: &str, history: &[ChatMessage]) -> Result<String> {
        let messages = self.build_messages(history, Some(text));
        self.complete(messages).await
    }

    async fn initiate_conversation(&self, system_prompt: &str) -> Result<String> {
        let messages = vec![WireMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        }];
        self.complete(messages).await
    }

    fn name(&self) -> &str {
        "doubao"
    }
}
