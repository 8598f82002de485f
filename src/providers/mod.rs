//! Completion transport abstraction.
//!
//! The session loop treats text generation as an opaque request/response
//! call behind [`CompletionProvider`]. Two hosted backend families exist:
//! an OpenAI-compatible chat-completions endpoint and the Hugging Face
//! hosted-inference API, selected by substring match on the model
//! identifier.

pub mod huggingface;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::prompt::Message;

/// Generation parameters resolved from the per-model config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&ModelConfig> for GenerationParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A hosted model that turns a message sequence into a single content
/// string.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Backend name for display and logs.
    fn name(&self) -> &'static str;

    /// Model identifier sent to the backend.
    fn model_name(&self) -> &str;

    /// Run one completion and extract the content string from the
    /// response. A response without the expected shape is an
    /// [`ProviderError::InvalidResponse`]; the session does not recover
    /// from it.
    async fn complete(&self, messages: &[Message], params: &GenerationParams) -> Result<String>;
}

/// Error types for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API key not configured for {provider}. Set {env_var} environment variable.")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Malformed credential for {provider}: {message}")]
    InvalidApiKey { provider: String, message: String },

    #[error("API error from {provider}: {message}")]
    ApiError { provider: String, message: String },

    #[error("Rate limited by {provider}. Please wait and try again.")]
    RateLimited { provider: String },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

/// Read an API key from the environment, treating empty values as unset.
pub(crate) fn env_api_key(env_var: &str) -> Option<String> {
    std::env::var(env_var).ok().filter(|s| !s.is_empty())
}

/// Select the backend for a model identifier.
///
/// Identifiers containing "gpt" go to the OpenAI-compatible backend;
/// everything else is treated as a Hugging Face hosted model. Credential
/// problems surface here, before the session loop starts.
pub fn for_model(model: &str, config: &ModelConfig) -> Result<Box<dyn CompletionProvider>> {
    let resolved = config.resolved_model(model);
    if resolved.contains("gpt") {
        Ok(Box::new(openai::OpenAiProvider::from_env(resolved)?))
    } else {
        Ok(Box::new(huggingface::HuggingFaceProvider::from_env(
            resolved,
        )?))
    }
}
