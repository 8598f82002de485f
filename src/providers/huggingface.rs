//! Hugging Face hosted-inference backend.
//!
//! Handles every model identifier that is not routed to the
//! OpenAI-compatible backend. Talks to the Hugging Face router, which
//! serves hosted models through a chat-completions shaped API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{env_api_key, CompletionProvider, GenerationParams, ProviderError};
use crate::prompt::Message;

const HF_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Hugging Face hosted-inference provider.
pub struct HuggingFaceProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: normalize_model_id(&model),
        }
    }

    /// Create from environment variables, validating the token shape.
    ///
    /// Hugging Face tokens always start with `hf_`; anything else is a
    /// misconfigured credential and aborts startup.
    pub fn from_env(model: String) -> Result<Self> {
        let api_key =
            env_api_key("HUGGINGFACE_API_KEY").ok_or_else(|| ProviderError::MissingApiKey {
                provider: "Hugging Face".to_string(),
                env_var: "HUGGINGFACE_API_KEY".to_string(),
            })?;

        if !api_key.starts_with("hf_") {
            bail!(ProviderError::InvalidApiKey {
                provider: "Hugging Face".to_string(),
                message: "token should start with 'hf_'".to_string(),
            });
        }

        Ok(Self::new(api_key, model))
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

/// Strip the legacy `huggingface/` routing prefix from a model id.
fn normalize_model_id(model: &str) -> String {
    model
        .trim()
        .strip_prefix("huggingface/")
        .unwrap_or(model.trim())
        .to_string()
}

#[async_trait]
impl CompletionProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        "Hugging Face"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message], params: &GenerationParams) -> Result<String> {
        let request = self.build_request(messages, params);

        let response = self
            .client
            .post(HF_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Hugging Face API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                bail!(ProviderError::RateLimited {
                    provider: "Hugging Face".to_string()
                });
            }
            bail!(ProviderError::ApiError {
                provider: "Hugging Face".to_string(),
                message: format!("HTTP {status}: {error_body}"),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Hugging Face response")?;

        extract_content(body)
    }
}

fn extract_content(body: ChatResponse) -> Result<String> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse {
            provider: "Hugging Face".to_string(),
            message: "response contained no choices".to_string(),
        })?;

    let message = choice.message.ok_or_else(|| ProviderError::InvalidResponse {
        provider: "Hugging Face".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_prefix() {
        assert_eq!(
            normalize_model_id("huggingface/codellama/CodeLlama-7b-hf"),
            "codellama/CodeLlama-7b-hf"
        );
        assert_eq!(
            normalize_model_id("codellama/CodeLlama-7b-hf"),
            "codellama/CodeLlama-7b-hf"
        );
    }

    #[test]
    fn test_provider_normalizes_model() {
        let provider = HuggingFaceProvider::new(
            "hf_test".to_string(),
            "huggingface/bigcode/starcoder2-15b".to_string(),
        );
        assert_eq!(provider.model_name(), "bigcode/starcoder2-15b");
        assert_eq!(provider.name(), "Hugging Face");
    }

    #[test]
    fn test_extract_content_missing_choice_fails() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(body).is_err());
    }
}
