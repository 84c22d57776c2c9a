use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use pantry_assist::{AssistError, RecipeError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unconfigured(String),

    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Invalid request",
            ApiError::NotFound(_) => "Recipe not found",
            ApiError::Unconfigured(_) => "Service not configured",
            ApiError::Upstream(_) => "Recipe service unavailable",
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(e: RecipeError) -> Self {
        match e {
            RecipeError::NotFound(_) => ApiError::NotFound(e.to_string()),
            RecipeError::Unconfigured => ApiError::Unconfigured(e.to_string()),
            RecipeError::Upstream(_) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<AssistError> for ApiError {
    fn from(e: AssistError) -> Self {
        match e {
            AssistError::InvalidRequest(message) => ApiError::BadRequest(message),
            AssistError::Unconfigured => ApiError::Unconfigured(
                "no AI provider API key is configured".to_string(),
            ),
            AssistError::Recipe(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        }

        let body = json!({
            "error": self.title(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
