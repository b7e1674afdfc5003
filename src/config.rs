//! Configuration management for Confidant
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ConfidantError, Result};
use crate::session::PersistencePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Confidant
///
/// Holds provider settings, session/archive behavior, and chat surface
/// settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Doubao, Ollama)
    pub provider: ProviderConfig,
    /// Session and archive configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Chat surface configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which assistant provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Doubao (Ark) configuration
    #[serde(default)]
    pub doubao: DoubaoConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Doubao (Ark) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubaoConfig {
    /// API base URL for the chat-completions endpoint
    ///
    /// Overridable so tests can point the provider at a mock server.
    #[serde(default = "default_doubao_api_base")]
    pub api_base: String,

    /// Model to use
    #[serde(default = "default_doubao_model")]
    pub model: String,

    /// API key; falls back to the `ARK_API_KEY` environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_doubao_api_base() -> String {
    "https://ark.cn-beijing.volces.com/api/v3".to_string()
}

fn default_doubao_model() -> String {
    "doubao-pro-32k".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for DoubaoConfig {
    fn default() -> Self {
        Self {
            api_base: default_doubao_api_base(),
            model: default_doubao_model(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Session and archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of archived conversations kept in history
    #[serde(default = "default_max_archived")]
    pub max_archived: usize,

    /// Database path override; defaults to the platform data directory
    #[serde(default)]
    pub storage_path: Option<String>,

    /// Persistence policy: "best-effort" (default) or "strict"
    #[serde(default = "default_persistence")]
    pub persistence: String,
}

fn default_max_archived() -> usize {
    10
}

fn default_persistence() -> String {
    "best-effort".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_archived: default_max_archived(),
            storage_path: None,
            persistence: default_persistence(),
        }
    }
}

impl SessionConfig {
    /// Parse the configured persistence policy
    ///
    /// # Errors
    ///
    /// Returns `ConfidantError::Config` for unknown policy names
    pub fn policy(&self) -> Result<PersistencePolicy> {
        match self.persistence.as_str() {
            "best-effort" => Ok(PersistencePolicy::BestEffort),
            "strict" => Ok(PersistencePolicy::Strict),
            other => Err(ConfidantError::Config(format!(
                "Unknown persistence policy: {}. Must be best-effort or strict",
                other
            ))
            .into()),
        }
    }
}

/// Chat surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// System prompt sent with every provider request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_system_prompt() -> String {
    "You are a warm, attentive companion. Keep replies short, sincere, and \
     curious about the user's day."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfidantError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ConfidantError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("CONFIDANT_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(doubao_model) = std::env::var("CONFIDANT_DOUBAO_MODEL") {
            self.provider.doubao.model = doubao_model;
        }

        if let Ok(ollama_host) = std::env::var("CONFIDANT_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("CONFIDANT_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(max_archived) = std::env::var("CONFIDANT_MAX_ARCHIVED") {
            if let Ok(value) = max_archived.parse() {
                self.session.max_archived = value;
            } else {
                tracing::warn!("Invalid CONFIDANT_MAX_ARCHIVED: {}", max_archived);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(storage_path) = &cli.storage_path {
            self.session.storage_path = Some(storage_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ConfidantError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["doubao", "ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(ConfidantError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.session.max_archived == 0 {
            return Err(
                ConfidantError::Config("session.max_archived must be greater than 0".to_string())
                    .into(),
            );
        }

        // Parse errors surface here rather than at session construction
        self.session.policy()?;

        if self.provider.doubao.timeout_seconds == 0 || self.provider.ollama.timeout_seconds == 0 {
            return Err(ConfidantError::Config(
                "provider timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.system_prompt.trim().is_empty() {
            return Err(
                ConfidantError::Config("chat.system_prompt cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "doubao".to_string(),
                doubao: DoubaoConfig::default(),
                ollama: OllamaConfig::default(),
            },
            session: SessionConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}
