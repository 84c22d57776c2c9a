//! `pantry search` / `pantry analyze`: run one task from the terminal.

use std::sync::Arc;

use anyhow::{Context, Result};

use pantry_assist::{RecipeAssistant, SpoonacularClient};
use pantry_core::Config;
use pantry_providers::ProviderChain;

use crate::helpers;

fn build_assistant(config: &Config) -> Result<RecipeAssistant> {
    let chain = ProviderChain::from_config(config).context("failed to build provider chain")?;
    let recipes = Arc::new(SpoonacularClient::new(&config.recipes));
    Ok(RecipeAssistant::new(chain, recipes))
}

pub async fn search(config: &Config, query: &str) -> Result<()> {
    let assistant = build_assistant(config)?;
    let result = assistant
        .translate_search(query)
        .await
        .context("search translation failed")?;
    helpers::print_result(&result)
}

pub async fn analyze(config: &Config, recipe_id: u64) -> Result<()> {
    let assistant = build_assistant(config)?;
    let result = assistant
        .analyze(recipe_id)
        .await
        .with_context(|| format!("analysis of recipe {recipe_id} failed"))?;
    helpers::print_result(&result)
}
