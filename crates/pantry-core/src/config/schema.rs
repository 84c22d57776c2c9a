//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `RecipeApiConfig`, `ServerConfig`,
//! `AssistConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.pantry/config.json` + env vars.
///
/// Built once at process start and handed to the components that need it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub recipes: RecipeApiConfig,
    pub server: ServerConfig,
    pub assist: AssistConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single text-generation vendor (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Credentials per vendor.
///
/// Several registry entries may share one credential (e.g. two OpenAI models).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by credential name (e.g. `"openai"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "gemini" => Some(&self.gemini),
            "groq" => Some(&self.groq),
            _ => None,
        }
    }

    /// Whether at least one vendor has a key.
    pub fn any_configured(&self) -> bool {
        [&self.openai, &self.gemini, &self.groq]
            .iter()
            .any(|p| p.is_configured())
    }
}

// ─────────────────────────────────────────────
// Recipe API
// ─────────────────────────────────────────────

/// Spoonacular recipe API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeApiConfig {
    pub api_key: String,
    pub api_base: String,
}

impl Default for RecipeApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.spoonacular.com".to_string(),
        }
    }
}

impl RecipeApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
        }
    }
}

// ─────────────────────────────────────────────
// Assist
// ─────────────────────────────────────────────

/// Provider chain settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistConfig {
    /// Registry names in priority order. Entries without a key are skipped.
    pub chain: Vec<String>,
    /// Per-call HTTP timeout for provider requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            chain: ["openai", "openai-mini", "gemini", "groq"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            request_timeout_secs: 120,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
