//! Pantry core: shared types, configuration, and utilities.
//!
//! - **types**: provider wire types (chat completions, Gemini `generateContent`)
//! - **recipe**: the recipe record the assistant reads
//! - **config**: typed configuration, loaded once at start-up
//! - **utils**: path and string helpers

pub mod config;
pub mod recipe;
pub mod types;
pub mod utils;

pub use config::Config;
pub use recipe::{
    Ingredient, InstructionBlock, InstructionStep, Recipe, RecipeSummary, SearchParams,
    SearchResults,
};
