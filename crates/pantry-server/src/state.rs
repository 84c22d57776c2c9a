use std::sync::Arc;

use pantry_assist::{RecipeAssistant, SpoonacularClient};
use pantry_core::Config;
use pantry_providers::{ProviderChain, ProviderError};

/// Shared handler state. Built once at start-up; never mutated.
pub struct State {
    pub assistant: RecipeAssistant,
}

impl State {
    pub fn new(assistant: RecipeAssistant) -> Arc<Self> {
        Arc::new(Self { assistant })
    }

    /// Provider chain and Spoonacular client from the loaded config.
    pub fn from_config(config: &Config) -> Result<Arc<Self>, ProviderError> {
        let chain = ProviderChain::from_config(config)?;
        let recipes = Arc::new(SpoonacularClient::new(&config.recipes));
        Ok(Self::new(RecipeAssistant::new(chain, recipes)))
    }
}
