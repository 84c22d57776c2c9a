//! Recipe source: lookup and search against the Spoonacular API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};

use pantry_core::config::RecipeApiConfig;
use pantry_core::{Recipe, SearchParams, SearchResults};

/// Timeout for recipe API calls.
const RECIPE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe {0} not found")]
    NotFound(u64),

    #[error("recipe API key is not configured")]
    Unconfigured,

    #[error("recipe API error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for RecipeError {
    fn from(e: reqwest::Error) -> Self {
        RecipeError::Upstream(e.to_string())
    }
}

/// Anything that can fetch and search recipes.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Full recipe record by id.
    async fn recipe(&self, id: u64) -> Result<Recipe, RecipeError>;

    /// Search with filters.
    async fn search(&self, params: &SearchParams) -> Result<SearchResults, RecipeError>;
}

// ─────────────────────────────────────────────
// SpoonacularClient
// ─────────────────────────────────────────────

/// Spoonacular client authenticated with the `apiKey` query parameter.
pub struct SpoonacularClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl std::fmt::Debug for SpoonacularClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpoonacularClient")
            .field("api_base", &self.api_base)
            .field("configured", &!self.api_key.is_empty())
            .finish()
    }
}

impl SpoonacularClient {
    pub fn new(config: &RecipeApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(RECIPE_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn ensure_configured(&self) -> Result<(), RecipeError> {
        if self.api_key.trim().is_empty() {
            return Err(RecipeError::Unconfigured);
        }
        Ok(())
    }

    async fn upstream_error(response: reqwest::Response) -> RecipeError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!(status = %status, body = %body, "Recipe API error");
        RecipeError::Upstream(format!("HTTP {}: {}", status.as_u16(), body))
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn recipe(&self, id: u64) -> Result<Recipe, RecipeError> {
        self.ensure_configured()?;
        let url = format!("{}/recipes/{}/information", self.api_base, id);
        debug!(recipe_id = id, "Fetching recipe");

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str()), ("includeNutrition", "false")])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RecipeError::NotFound(id)),
            s if s.is_success() => Ok(response.json::<Recipe>().await?),
            _ => Err(Self::upstream_error(response).await),
        }
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResults, RecipeError> {
        self.ensure_configured()?;
        let url = format!("{}/recipes/complexSearch", self.api_base);
        debug!(query = %params.query, "Searching recipes");

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }
        Ok(response.json::<SearchResults>().await?)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
