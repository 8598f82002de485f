//! OpenAI-compatible chat-completions backend.
//!
//! Used for model identifiers containing "gpt". The endpoint can be
//! repointed at any OpenAI-compatible server via `OPENAI_BASE_URL`.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{env_api_key, CompletionProvider, GenerationParams, ProviderError};
use crate::prompt::Message;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Create from environment variables.
    pub fn from_env(model: String) -> Result<Self> {
        let api_key =
            env_api_key("OPENAI_API_KEY").ok_or_else(|| ProviderError::MissingApiKey {
                provider: "OpenAI".to_string(),
                env_var: "OPENAI_API_KEY".to_string(),
            })?;
        let base_url =
            env_api_key("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(api_key, base_url, model))
    }

    fn build_request(&self, messages: &[Message], params: &GenerationParams) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message], params: &GenerationParams) -> Result<String> {
        let request = self.build_request(messages, params);
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                bail!(ProviderError::RateLimited {
                    provider: "OpenAI".to_string()
                });
            }
            bail!(ProviderError::ApiError {
                provider: "OpenAI".to_string(),
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        extract_content(body)
    }
}

/// Pull the single content string out of a chat response, failing loudly
/// when the shape is not what the API contract promises.
fn extract_content(body: ChatResponse) -> Result<String> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse {
            provider: "OpenAI".to_string(),
            message: "response contained no choices".to_string(),
        })?;

    let message = choice.message.ok_or_else(|| ProviderError::InvalidResponse {
        provider: "OpenAI".to_string(),
        message: "choice contained no message".to_string(),
    })?;

    Ok(message.content)
}

// API types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
