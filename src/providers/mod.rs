//! Provider module for Confidant
//!
//! This module contains the assistant provider abstraction and
//! implementations for Doubao (Ark) and Ollama.

pub mod base;
pub mod doubao;
pub mod ollama;

pub use base::Provider;
#[cfg(test)]
pub use base::MockProvider;
pub use doubao::DoubaoProvider;
pub use ollama::OllamaProvider;

use crate::config::Config;
use crate::error::Result;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Full application configuration
/// * `provider_override` - Optional provider type override ("doubao" or "ollama")
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the provider type is invalid or initialization fails
pub fn create_provider(
    config: &Config,
    provider_override: Option<&str>,
) -> Result<Box<dyn Provider>> {
    let provider_type = provider_override.unwrap_or(&config.provider.provider_type);
    let system_prompt = config.chat.system_prompt.clone();

    match provider_type {
        "doubao" => Ok(Box::new(DoubaoProvider::new(
            config.provider.doubao.clone(),
            system_prompt,
        )?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(
            config.provider.ollama.clone(),
            system_prompt,
        )?)),
        _ => Err(crate::error::ConfidantError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}
