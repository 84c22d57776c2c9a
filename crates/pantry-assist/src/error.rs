use thiserror::Error;

use crate::recipes::RecipeError;

/// Failures a task can surface to its caller.
///
/// Provider failures never appear here: they are absorbed by the chain and
/// end in a fallback result.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("no AI provider is configured")]
    Unconfigured,

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Recipe(#[from] RecipeError),
}
