//! Generic HTTP provider covering both supported wire formats.
//!
//! One `HttpProvider` per registry entry. The request body is built from the
//! entry's `WireFormat`; the response is read as raw JSON and the text is taken
//! from the entry's `text_pointer`, so adding a vendor is a registry change.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use pantry_core::config::ProviderConfig;
use pantry_core::types::{
    ChatCompletionRequest, GeminiContent, GenerateContentRequest, GenerationConfig, Message,
};

use crate::error::ProviderError;
use crate::registry::{ProviderSpec, WireFormat};
use crate::traits::{Generation, GenerationRequest, TextGenerator};

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A text-generation provider reached over HTTP.
pub struct HttpProvider {
    /// HTTP client (shared across the chain, connection-pooled).
    client: Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key.
    api_key: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Static spec: model, wire format, text location.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.spec.model)
            .field("provider", &self.spec.name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from its credential config and registry spec.
    ///
    /// `client` is shared so every provider in a chain uses the same pool and
    /// timeout.
    pub fn new(config: &ProviderConfig, spec: &'static ProviderSpec, client: Client) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            extra_headers,
            spec,
        }
    }

    /// Full endpoint URL for this provider's wire format.
    fn endpoint_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        match self.spec.wire {
            WireFormat::ChatCompletions => format!("{}/chat/completions", base),
            WireFormat::GenerateContent => {
                format!("{}/models/{}:generateContent", base, self.spec.model)
            }
        }
    }

    fn build_request(&self, request: &GenerationRequest) -> reqwest::RequestBuilder {
        let url = self.endpoint_url();
        let builder = self
            .client
            .post(&url)
            .headers(self.extra_headers.clone());

        match self.spec.wire {
            WireFormat::ChatCompletions => builder.bearer_auth(&self.api_key).json(
                &ChatCompletionRequest {
                    model: self.spec.model.to_string(),
                    messages: vec![
                        Message::system(request.system.as_str()),
                        Message::user(request.user.as_str()),
                    ],
                    max_tokens: Some(request.max_tokens),
                    temperature: Some(request.temperature),
                },
            ),
            WireFormat::GenerateContent => builder
                .header("x-goog-api-key", &self.api_key)
                .json(&GenerateContentRequest {
                    system_instruction: GeminiContent::system(request.system.as_str()),
                    contents: vec![GeminiContent::user(request.user.as_str())],
                    generation_config: GenerationConfig {
                        temperature: request.temperature,
                        max_output_tokens: request.max_tokens,
                    },
                }),
        }
    }
}

#[async_trait]
impl TextGenerator for HttpProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
        debug!(
            provider = self.spec.name,
            model = self.spec.model,
            max_tokens = request.max_tokens,
            "Calling provider"
        );

        let response = self.build_request(request).send().await.map_err(|e| {
            error!(provider = self.spec.name, error = %e, "HTTP request failed");
            ProviderError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = self.spec.name,
                status = %status,
                body = %body,
                "API error"
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            error!(provider = self.spec.name, error = %e, "Failed to parse provider response");
            ProviderError::MalformedBody {
                status: status.as_u16(),
                message: e.to_string(),
            }
        })?;

        let text = body
            .pointer(self.spec.text_pointer)
            .and_then(Value::as_str)
            .ok_or(ProviderError::MissingText {
                status: status.as_u16(),
                pointer: self.spec.text_pointer,
            })?;

        debug!(
            provider = self.spec.name,
            chars = text.len(),
            "Provider response received"
        );

        Ok(Generation {
            status: status.as_u16(),
            text: text.to_string(),
        })
    }

    fn name(&self) -> &str {
        self.spec.name
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
