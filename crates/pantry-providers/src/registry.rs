//! Provider registry: static specs for the supported text-generation backends.
//!
//! Each `ProviderSpec` describes how to reach one model: which credential it
//! uses, where the endpoint lives, which request shape it speaks, and where the
//! generated text sits in the response. The array order is the default chain
//! priority.

use pantry_core::config::{ProviderConfig, ProvidersConfig};
use tracing::warn;

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one provider
// ─────────────────────────────────────────────

/// Request/response shape spoken by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    /// OpenAI-compatible `POST {base}/chat/completions` with bearer auth.
    ChatCompletions,
    /// Gemini `POST {base}/models/{model}:generateContent` with `x-goog-api-key`.
    GenerateContent,
}

/// Static description of one provider entry.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Registry name used in `assist.chain` (e.g. `"openai-mini"`).
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"OpenAI (gpt-4o-mini)"`.
    pub display_name: &'static str,
    /// Which `providers.<credential>` config block supplies the key.
    /// Several entries can share one credential.
    pub credential: &'static str,
    /// Conventional environment variable for the key.
    pub env_key: &'static str,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Model identifier sent to the vendor.
    pub model: &'static str,
    /// Request/response shape.
    pub wire: WireFormat,
    /// JSON pointer to the generated text in a successful response.
    pub text_pointer: &'static str,
}

/// Text location in an OpenAI-style response.
pub const CHAT_TEXT_POINTER: &str = "/choices/0/message/content";

/// Text location in a Gemini response.
pub const GEMINI_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

// ─────────────────────────────────────────────
// Supported providers (default priority order)
// ─────────────────────────────────────────────

/// Every supported provider, in default priority order.
pub static PROVIDERS: &[ProviderSpec] = &[
    // 1. Premium conversational model
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI (gpt-4o)",
        credential: "openai",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        model: "gpt-4o",
        wire: WireFormat::ChatCompletions,
        text_pointer: CHAT_TEXT_POINTER,
    },
    // 2. Cheaper model behind the same credential
    ProviderSpec {
        name: "openai-mini",
        display_name: "OpenAI (gpt-4o-mini)",
        credential: "openai",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        model: "gpt-4o-mini",
        wire: WireFormat::ChatCompletions,
        text_pointer: CHAT_TEXT_POINTER,
    },
    // 3. Second vendor
    ProviderSpec {
        name: "gemini",
        display_name: "Gemini",
        credential: "gemini",
        env_key: "GEMINI_API_KEY",
        default_api_base: "https://generativelanguage.googleapis.com/v1beta",
        model: "gemini-1.5-flash",
        wire: WireFormat::GenerateContent,
        text_pointer: GEMINI_TEXT_POINTER,
    },
    // 4. Third vendor (OpenAI-compatible)
    ProviderSpec {
        name: "groq",
        display_name: "Groq",
        credential: "groq",
        env_key: "GROQ_API_KEY",
        default_api_base: "https://api.groq.com/openai/v1",
        model: "llama-3.3-70b-versatile",
        wire: WireFormat::ChatCompletions,
        text_pointer: CHAT_TEXT_POINTER,
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Resolve the configured chain order into `(config, spec)` pairs.
///
/// Unknown names are logged and skipped; entries whose credential has no key
/// are dropped silently. Order is preserved exactly.
pub fn configured_chain<'a>(
    order: &[String],
    providers: &'a ProvidersConfig,
) -> Vec<(&'a ProviderConfig, &'static ProviderSpec)> {
    order
        .iter()
        .filter_map(|name| {
            let spec = find_by_name(name);
            if spec.is_none() {
                warn!(provider = %name, "unknown provider in chain, skipping");
            }
            spec
        })
        .filter_map(|spec| {
            providers
                .get_by_name(spec.credential)
                .filter(|c| c.is_configured())
                .map(|c| (c, spec))
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
