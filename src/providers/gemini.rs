//! Google Gemini `generateContent` backend.
//!
//! One prompt in, one reply out: the request is a single-content,
//! single-part text payload, and the reply is read from
//! `candidates[0].content.parts[0].text`. A 2xx payload missing that path
//! is not an error — the provider degrades to a fixed fallback reply.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::gemini_types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use super::http_client::build_provider_client;
use super::traits::Provider;
use crate::config::Config;
use crate::error::{ConfigError, ProviderError};

/// Fixed reply used when the provider answers 2xx but the candidate text
/// path is missing or empty.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I couldn't generate a proper response at the moment.";

pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: Client,
}

impl GeminiProvider {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
            client: build_provider_client(config.request_timeout_secs),
        })
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/{}:generateContent?key={}",
            self.base_url,
            Self::model_name(&self.model),
            self.api_key
        )
    }

    fn build_request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }

    /// Reply text at `candidates[0].content.parts[0].text`, or the fixed
    /// fallback when any level of that path is absent or empty.
    fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_ref())
            .filter(|text| !text.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                warn!("provider payload missing candidate text, using fallback reply");
                FALLBACK_REPLY.to_string()
            })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = Self::build_request(prompt);
        debug!(model = %self.model, "dispatching generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Http(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: GenerateContentResponse = response.json().await?;
        Ok(Self::extract_text(&result))
    }
}
