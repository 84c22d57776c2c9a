//! Pantry assist: the recipe tasks built on top of the provider chain.
//!
//! - **context**: prompt builders and per-task budgets
//! - **fallback**: deterministic results when every provider fails
//! - **normalize**: reshape model answers into the task schema
//! - **modification**: modification types and substitution tables
//! - **recipes**: recipe lookup/search (Spoonacular)
//! - **assistant**: `RecipeAssistant`, tying it all together

pub mod assistant;
pub mod context;
pub mod error;
pub mod fallback;
pub mod modification;
pub mod normalize;
pub mod recipes;

pub use assistant::{Assisted, RecipeAssistant, RecommendRequest, Source};
pub use context::{Preferences, Prompt, TaskKind};
pub use error::AssistError;
pub use modification::ModificationKind;
pub use recipes::{RecipeError, RecipeSource, SpoonacularClient};
