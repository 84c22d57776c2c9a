//! Provider trait: the capability every text-generation backend offers.

use async_trait::async_trait;

use crate::error::ProviderError;

/// One generation call: a system instruction, the user content, and sampling
/// parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// System instruction (includes the expected JSON shape).
    pub system: String,
    /// User content.
    pub user: String,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Create a request with the short-task defaults (`temperature = 0.7`,
    /// `max_tokens = 200`).
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Raw output of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    /// HTTP status of the provider response.
    pub status: u16,
    /// Generated text, unparsed.
    pub text: String,
}

/// Trait that all text-generation providers implement.
///
/// The chain executor only ever sees this trait, so tests can substitute
/// scripted generators for real HTTP clients.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue exactly one generation call.
    ///
    /// Non-2xx responses, transport failures, and responses without text are
    /// all `Err`; no retry happens here.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError>;

    /// Registry name (e.g. `"openai-mini"`).
    fn name(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
