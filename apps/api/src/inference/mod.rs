//! Client for the external text-generation model used to draft job descriptions.
//!
//! The model sits behind a Hugging Face style inference endpoint:
//! `POST {inputs, options}` with a bearer token, answering with one or more
//! `{generated_text}` objects. Calls are made once; failures are returned to the
//! caller without retry.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/EleutherAI/gpt-neo-2.7B";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no generated text")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    options: GenerationOptions,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

/// The endpoint answers with a list for batched pipelines and a bare object otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generated>),
    Single(Generated),
}

impl GenerationResponse {
    fn into_text(self) -> Option<String> {
        let generated = match self {
            GenerationResponse::Batch(items) => items.into_iter().next()?,
            GenerationResponse::Single(item) => item,
        };
        Some(generated.generated_text.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct InferenceApiError {
    error: String,
}

#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl InferenceClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, InferenceError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl DescriptionGenerator for InferenceClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let request_body = GenerationRequest {
            inputs: prompt,
            options: GenerationOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Inference API returned {}: {}", status, body);
            let message = serde_json::from_str::<InferenceApiError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerationResponse = response.json().await?;
        let text = generated.into_text().ok_or(InferenceError::EmptyContent)?;
        debug!("Inference call succeeded: {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_response_takes_first_text() {
        let body = r#"[{"generated_text": "  First draft \n"}, {"generated_text": "second"}]"#;
        let parsed: GenerationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("First draft"));
    }

    #[test]
    fn test_single_object_response() {
        let body = r#"{"generated_text": "A role for builders."}"#;
        let parsed: GenerationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("A role for builders."));
    }

    #[test]
    fn test_empty_batch_has_no_text() {
        let parsed: GenerationResponse = serde_json::from_str("[]").unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerationRequest {
            inputs: "prompt",
            options: GenerationOptions {
                wait_for_model: true,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "inputs": "prompt", "options": { "wait_for_model": true } })
        );
    }
}
