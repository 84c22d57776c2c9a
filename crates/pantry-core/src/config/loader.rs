//! Config loader: reads `~/.pantry/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.pantry/config.json`
//! 3. Environment variables `PANTRY_<SECTION>__<FIELD>` (override JSON)
//! 4. Conventional vendor variables (`OPENAI_API_KEY`, …) fill keys still empty

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PANTRY_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PANTRY_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `PANTRY_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `PANTRY_RECIPES__API_KEY` / `PANTRY_RECIPES__API_BASE`
/// - `PANTRY_SERVER__HOST` / `PANTRY_SERVER__PORT`
/// - `PANTRY_ASSIST__CHAIN` (comma-separated registry names)
/// - `PANTRY_ASSIST__REQUEST_TIMEOUT_SECS`
fn apply_env_overrides(mut config: Config) -> Config {
    apply_provider_env(&mut config.providers.openai, "OPENAI", "OPENAI_API_KEY");
    apply_provider_env(&mut config.providers.gemini, "GEMINI", "GEMINI_API_KEY");
    apply_provider_env(&mut config.providers.groq, "GROQ", "GROQ_API_KEY");

    // Recipe API
    if let Ok(val) = std::env::var("PANTRY_RECIPES__API_KEY") {
        config.recipes.api_key = val;
    }
    if config.recipes.api_key.is_empty() {
        if let Ok(val) = std::env::var("SPOONACULAR_API_KEY") {
            config.recipes.api_key = val;
        }
    }
    if let Ok(val) = std::env::var("PANTRY_RECIPES__API_BASE") {
        config.recipes.api_base = val;
    }

    // Server
    if let Ok(val) = std::env::var("PANTRY_SERVER__HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("PANTRY_SERVER__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.server.port = p;
        }
    }

    // Assist
    if let Ok(val) = std::env::var("PANTRY_ASSIST__CHAIN") {
        config.assist.chain = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("PANTRY_ASSIST__REQUEST_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.assist.request_timeout_secs = n;
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str, conventional_key: &str) {
    if let Ok(val) = std::env::var(format!("PANTRY_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if provider.api_key.is_empty() {
        if let Ok(val) = std::env::var(conventional_key) {
            provider.api_key = val;
        }
    }
    if let Ok(val) = std::env::var(format!("PANTRY_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.assist.chain.len(), 4);
        assert_eq!(config.recipes.api_base, "https://api.spoonacular.com");
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(r#"{
            "assist": {
                "chain": ["gemini", "openai-mini"],
                "requestTimeoutSecs": 30
            }
        }"#);

        let config = load_config_from_path(file.path());
        assert_eq!(config.assist.chain, vec!["gemini", "openai-mini"]);
        assert_eq!(config.assist.request_timeout_secs, 30);
        // Default preserved
        assert_eq!(config.recipes.api_base, "https://api.spoonacular.com");
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.assist.request_timeout_secs, 120);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.assist.chain[0], "openai");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.providers.gemini.api_key = "g-test".to_string();
        config.assist.chain = vec!["gemini".to_string()];

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.providers.gemini.api_key, "g-test");
        assert_eq!(reloaded.assist.chain, vec!["gemini"]);
    }

    #[test]
    fn test_env_override_provider_key() {
        std::env::set_var("PANTRY_PROVIDERS__GROQ__API_KEY", "gsk-env-key");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.providers.groq.api_key, "gsk-env-key");
        std::env::remove_var("PANTRY_PROVIDERS__GROQ__API_KEY");
    }

    #[test]
    fn test_conventional_key_does_not_override_config() {
        std::env::set_var("SPOONACULAR_API_KEY", "spoon-env");
        let mut config = Config::default();
        config.recipes.api_key = "spoon-file".to_string();
        let config = apply_env_overrides(config);
        assert_eq!(config.recipes.api_key, "spoon-file");
        std::env::remove_var("SPOONACULAR_API_KEY");
    }

    #[test]
    fn test_env_override_server_port() {
        std::env::set_var("PANTRY_SERVER__PORT", "9999");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.server.port, 9999);
        std::env::remove_var("PANTRY_SERVER__PORT");
    }

    #[test]
    fn test_env_override_chain() {
        std::env::set_var("PANTRY_ASSIST__CHAIN", "groq, gemini,,");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.assist.chain, vec!["groq", "gemini"]);
        std::env::remove_var("PANTRY_ASSIST__CHAIN");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["assist"].get("requestTimeoutSecs").is_some());
        assert!(raw["assist"].get("request_timeout_secs").is_none());
    }

    #[test]
    fn test_full_config_with_providers() {
        let file = write_temp_json(r#"{
            "providers": {
                "openai": { "apiKey": "sk-123" },
                "gemini": { "apiKey": "g-456", "apiBase": "https://proxy.example/v1beta" }
            },
            "server": { "host": "127.0.0.1", "port": 3000 }
        }"#);

        let config = load_config_from_path(file.path());
        assert!(config.providers.openai.is_configured());
        assert!(config.providers.gemini.is_configured());
        assert_eq!(
            config.providers.gemini.api_base.as_deref(),
            Some("https://proxy.example/v1beta")
        );
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
