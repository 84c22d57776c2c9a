//! Provider chain: sequential fallback across configured providers.
//!
//! Each provider gets exactly one call, in configured order. A non-2xx status,
//! a transport failure, or text that does not extract to a JSON object moves
//! on to the next provider; the first successful extraction ends the chain.
//! Nothing runs concurrently and nothing is retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use pantry_core::config::Config;
use pantry_core::utils::truncate_string;

use crate::error::ProviderError;
use crate::extract::{extract_json, ExtractedResult, Strategy};
use crate::http_provider::HttpProvider;
use crate::registry::configured_chain;
use crate::traits::{GenerationRequest, TextGenerator};

/// Max chars of raw model text echoed into logs.
const LOG_PREVIEW_CHARS: usize = 200;

// ─────────────────────────────────────────────
// Attempt records
// ─────────────────────────────────────────────

/// What happened to one provider call.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    /// Text extracted to a JSON object with this strategy.
    Extracted(Strategy),
    /// Provider answered but no strategy found a JSON object.
    Unparsable,
    /// Call failed before producing text.
    Failed(String),
}

/// One provider's outcome within a chain run.
#[derive(Clone, Debug)]
pub struct GenerationAttempt {
    pub provider: String,
    pub status: Option<u16>,
    pub raw_text: Option<String>,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

/// The winning provider's parsed answer.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    pub provider: String,
    pub value: ExtractedResult,
    pub strategy: Strategy,
}

/// Result of a full chain run.
#[derive(Clone, Debug)]
pub struct ChainOutcome {
    /// `None` when every provider failed.
    pub answer: Option<Answer>,
    /// Every attempt made, in order.
    pub attempts: Vec<GenerationAttempt>,
}

impl ChainOutcome {
    pub fn into_answer(self) -> Option<Answer> {
        self.answer
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    #[error("no text-generation provider is configured")]
    Unconfigured,
}

// ─────────────────────────────────────────────
// ProviderChain
// ─────────────────────────────────────────────

/// Ordered list of providers tried one after another.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextGenerator>>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.names())
            .finish()
    }
}

impl ProviderChain {
    /// Build a chain from explicit generators (order = priority).
    pub fn new(providers: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { providers }
    }

    /// Build the HTTP chain described by the configuration.
    ///
    /// Only entries whose credential has a key are included. All providers
    /// share one client with the configured request timeout.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.assist.request_timeout_secs))
            .build()?;

        let providers: Vec<Arc<dyn TextGenerator>> =
            configured_chain(&config.assist.chain, &config.providers)
                .into_iter()
                .map(|(provider_config, spec)| {
                    debug!(
                        provider = spec.name,
                        model = spec.model,
                        api_base = provider_config.api_base.as_deref().unwrap_or("default"),
                        "Adding provider to chain"
                    );
                    Arc::new(HttpProvider::new(provider_config, spec, client.clone()))
                        as Arc<dyn TextGenerator>
                })
                .collect();

        info!(providers = providers.len(), "Provider chain ready");
        Ok(Self { providers })
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registry names in priority order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Try each provider once, in order, until one yields a JSON object.
    ///
    /// An empty chain returns [`ChainError::Unconfigured`] without any I/O.
    pub async fn run(&self, request: &GenerationRequest) -> Result<ChainOutcome, ChainError> {
        if self.providers.is_empty() {
            return Err(ChainError::Unconfigured);
        }

        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let started = Instant::now();
            let result = provider.generate(request).await;
            let elapsed = started.elapsed();

            let attempt = match result {
                Ok(generation) => match extract_json(&generation.text) {
                    Some(extraction) => {
                        debug!(
                            provider = provider.display_name(),
                            strategy = extraction.strategy.name(),
                            elapsed_ms = elapsed.as_millis() as u64,
                            "Provider answer extracted"
                        );
                        attempts.push(GenerationAttempt {
                            provider: provider.name().to_string(),
                            status: Some(generation.status),
                            raw_text: Some(generation.text),
                            outcome: AttemptOutcome::Extracted(extraction.strategy),
                            elapsed,
                        });
                        return Ok(ChainOutcome {
                            answer: Some(Answer {
                                provider: provider.name().to_string(),
                                value: extraction.value,
                                strategy: extraction.strategy,
                            }),
                            attempts,
                        });
                    }
                    None => {
                        warn!(
                            provider = provider.display_name(),
                            preview = %truncate_string(&generation.text, LOG_PREVIEW_CHARS),
                            "Provider answer had no JSON object, trying next"
                        );
                        GenerationAttempt {
                            provider: provider.name().to_string(),
                            status: Some(generation.status),
                            raw_text: Some(generation.text),
                            outcome: AttemptOutcome::Unparsable,
                            elapsed,
                        }
                    }
                },
                Err(e) => {
                    warn!(
                        provider = provider.display_name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    GenerationAttempt {
                        provider: provider.name().to_string(),
                        status: e.status(),
                        raw_text: None,
                        outcome: AttemptOutcome::Failed(e.to_string()),
                        elapsed,
                    }
                }
            };
            attempts.push(attempt);
        }

        warn!(attempts = attempts.len(), "All providers failed");
        Ok(ChainOutcome {
            answer: None,
            attempts,
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Generation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Scripted generator that counts its calls.
    struct Scripted {
        name: &'static str,
        reply: Result<&'static str, u16>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(name: &'static str, text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Ok(text),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str, status: u16) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Err(status),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, _request: &GenerationRequest) -> Result<Generation, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(Generation {
                    status: 200,
                    text: text.to_string(),
                }),
                Err(status) => Err(ProviderError::Status {
                    status,
                    body: "scripted failure".into(),
                }),
            }
        }

        fn name(&self) -> &str {
            self.name
        }

        fn display_name(&self) -> &str {
            self.name
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("sys", "user")
    }

    fn chain_of(providers: &[&Arc<Scripted>]) -> ProviderChain {
        ProviderChain::new(
            providers
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn TextGenerator>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_empty_chain_is_unconfigured() {
        let chain = ProviderChain::default();
        assert!(chain.is_empty());
        assert_eq!(chain.run(&request()).await.unwrap_err(), ChainError::Unconfigured);
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = Scripted::ok("first", "{\"searchTerm\": \"pho\"}");
        let second = Scripted::ok("second", "{\"searchTerm\": \"ramen\"}");
        let chain = chain_of(&[&first, &second]);

        let outcome = chain.run(&request()).await.unwrap();
        let answer = outcome.answer.unwrap();

        assert_eq!(answer.provider, "first");
        assert_eq!(answer.value["searchTerm"], "pho");
        assert_eq!(outcome.attempts.len(), 1);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_failures_and_unparsable() {
        let down = Scripted::failing("down", 503);
        let chatty = Scripted::ok("chatty", "I think you would enjoy lentil soup!");
        let good = Scripted::ok("good", "```json\n{\"number\": 3}\n```");
        let never = Scripted::ok("never", "{}");
        let chain = chain_of(&[&down, &chatty, &good, &never]);

        let outcome = chain.run(&request()).await.unwrap();

        let answer = outcome.answer.clone().unwrap();
        assert_eq!(answer.provider, "good");
        assert_eq!(answer.strategy, Strategy::FencedBlock);
        assert_eq!(answer.value["number"], 3);

        assert_eq!(outcome.attempts.len(), 3);
        assert_eq!(outcome.attempts[0].status, Some(503));
        assert!(matches!(outcome.attempts[0].outcome, AttemptOutcome::Failed(_)));
        assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::Unparsable);
        assert_eq!(
            outcome.attempts[2].outcome,
            AttemptOutcome::Extracted(Strategy::FencedBlock)
        );
        assert_eq!(never.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_fail_returns_no_answer() {
        let a = Scripted::failing("a", 500);
        let b = Scripted::ok("b", "no json here");
        let chain = chain_of(&[&a, &b]);

        let outcome = chain.run(&request()).await.unwrap();
        assert!(outcome.answer.is_none());
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_each_provider_called_once() {
        let a = Scripted::failing("a", 429);
        let chain = chain_of(&[&a]);
        chain.run(&request()).await.unwrap();
        assert_eq!(a.calls(), 1);
    }

    #[test]
    fn test_from_config_without_keys_is_empty() {
        let chain = ProviderChain::from_config(&Config::default()).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_from_config_order() {
        let mut config = Config::default();
        config.providers.groq.api_key = "gsk".into();
        config.providers.openai.api_key = "sk".into();
        let chain = ProviderChain::from_config(&config).unwrap();
        assert_eq!(chain.names(), vec!["openai", "openai-mini", "groq"]);
    }

    #[tokio::test]
    async fn test_http_chain_falls_back_to_second_vendor() {
        let openai = MockServer::start().await;
        let groq = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&openai)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "{\"searchTerm\": \"curry\"}" } }]
            })))
            .expect(1)
            .mount(&groq)
            .await;

        let mut config = Config::default();
        config.providers.openai.api_key = "sk".into();
        config.providers.openai.api_base = Some(openai.uri());
        config.providers.groq.api_key = "gsk".into();
        config.providers.groq.api_base = Some(groq.uri());

        let chain = ProviderChain::from_config(&config).unwrap();
        let outcome = chain.run(&request()).await.unwrap();

        let answer = outcome.answer.unwrap();
        assert_eq!(answer.provider, "groq");
        assert_eq!(answer.value["searchTerm"], "curry");
        assert_eq!(outcome.attempts.len(), 3);
        assert_eq!(outcome.attempts[1].provider, "openai-mini");
    }
}
