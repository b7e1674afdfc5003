//! Ollama provider implementation
//!
//! Connects to a local or remote Ollama server for keyless companion chat.
//! Uses the non-streaming `/api/chat` endpoint.

use crate::config::OllamaConfig;
use crate::error::{ConfidantError, Result};
use crate::message::ChatMessage;
use crate::providers::Provider;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama chat provider
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
    system_prompt: String,
}

/// Request structure for the Ollama chat API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

/// Message structure for the Ollama chat API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from the Ollama chat API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(config: OllamaConfig, system_prompt: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            system_prompt,
        })
    }

    fn build_messages(&self, history: &[ChatMessage], turn: Option<&str>) -> Vec<OllamaMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(OllamaMessage {
            role: "system".to_string(),
            content: self.system_prompt.clone(),
        });

        for message in history {
            messages.push(OllamaMessage {
                role: if message.is_from_user {
                    "user".to_string()
                } else {
                    "assistant".to_string()
                },
                content: message.content.clone(),
            });
        }

        if let Some(text) = turn {
            messages.push(OllamaMessage {
                role: "user".to_string(),
                content: text.to_string(),
            });
        }

        messages
    }

    async fn chat(&self, messages: Vec<OllamaMessage>) -> Result<String> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let request = OllamaRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
        };

        tracing::debug!("Sending chat request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ConfidantError::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConfidantError::Provider(format!(
                "Ollama API returned {}: {}",
                status, body
            ))
            .into());
        }

        let completion: OllamaResponse = response
            .json()
            .await
            .map_err(|e| ConfidantError::Provider(format!("Invalid response body: {}", e)))?;

        Ok(completion.message.content)
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn send_message(&self, text: &str, history: &[ChatMessage]) -> Result<String> {
        let messages = self.build_messages(history, Some(text));
        self.chat(messages).await
    }

    async fn initiate_conversation(&self, system_prompt: &str) -> Result<String> {
        let messages = vec![OllamaMessage {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        }];
        self.chat(messages).await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
