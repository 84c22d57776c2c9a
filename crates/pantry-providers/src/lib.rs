//! Text-generation provider layer for Pantry.
//!
//! # Architecture
//!
//! - [`traits::TextGenerator`]: trait every provider implements
//! - [`registry`]: static specs for the supported providers, in default priority order
//! - [`http_provider::HttpProvider`]: HTTP client covering both wire formats
//! - [`extract`]: pulls a JSON object out of free-form model text
//! - [`chain::ProviderChain`]: sequential fallback over the configured providers

pub mod chain;
pub mod error;
pub mod extract;
pub mod http_provider;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use chain::{Answer, AttemptOutcome, ChainError, ChainOutcome, GenerationAttempt, ProviderChain};
pub use error::ProviderError;
pub use extract::{extract_json, ExtractedResult, Extraction, Strategy};
pub use http_provider::HttpProvider;
pub use registry::{ProviderSpec, WireFormat, PROVIDERS};
pub use traits::{Generation, GenerationRequest, TextGenerator};
