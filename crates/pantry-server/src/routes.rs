//! Request handlers.
//!
//! AI handlers return the task body as-is and report which path produced it
//! in the `x-pantry-source` header (`model` or `fallback`).

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State as AxumState,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use pantry_assist::{Assisted, ModificationKind, RecommendRequest, Source};
use pantry_core::SearchParams;

use crate::error::ApiError;
use crate::state::State;

/// Provenance response header.
pub const SOURCE_HEADER: &str = "x-pantry-source";

/// Largest page size accepted by the search proxy.
const MAX_SEARCH_RESULTS: u32 = 100;

type AppState = AxumState<Arc<State>>;

fn assisted_response(result: Assisted) -> Response {
    if let Source::Model { ref provider } = result.source {
        info!(provider = %provider, "Responding with model answer");
    }
    (
        [(SOURCE_HEADER, result.source.as_str())],
        Json(Value::Object(result.body)),
    )
        .into_response()
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Accept a recipe id as a JSON number or a numeric string.
fn parse_recipe_id(value: Option<&Value>) -> Result<u64, ApiError> {
    let id = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest("recipeId must be a positive integer".to_string()))
}

// ─────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────

pub async fn health_handler(AxumState(state): AppState) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "providers": state.assistant.chain().names(),
    }))
}

// ─────────────────────────────────────────────
// AI tasks
// ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AiSearchQuery {
    q: Option<String>,
}

pub async fn ai_search_handler(
    AxumState(state): AppState,
    params: Result<Query<AiSearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(params)?
        .q
        .ok_or_else(|| ApiError::BadRequest("query parameter 'q' is required".to_string()))?;
    let result = state.assistant.translate_search(&query).await?;
    Ok(assisted_response(result))
}

pub async fn recommend_handler(
    AxumState(state): AppState,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;
    let result = state.assistant.recommend(&request).await?;
    Ok(assisted_response(result))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    recipe_id: Option<Value>,
}

pub async fn analyze_handler(
    AxumState(state): AppState,
    payload: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(payload)?;
    let recipe_id = parse_recipe_id(body.recipe_id.as_ref())?;
    let result = state.assistant.analyze(recipe_id).await?;
    Ok(assisted_response(result))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyBody {
    recipe_id: Option<Value>,
    modification_type: Option<String>,
}

pub async fn modify_handler(
    AxumState(state): AppState,
    payload: Result<Json<ModifyBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(payload)?;
    let recipe_id = parse_recipe_id(body.recipe_id.as_ref())?;
    let kind = body
        .modification_type
        .ok_or_else(|| ApiError::BadRequest("modificationType is required".to_string()))?
        .parse::<ModificationKind>()
        .map_err(ApiError::BadRequest)?;

    let result = state.assistant.modify(recipe_id, kind).await?;
    Ok(assisted_response(result))
}

// ─────────────────────────────────────────────
// Recipe proxy
// ─────────────────────────────────────────────

pub async fn recipe_handler(
    AxumState(state): AppState,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_recipe_id(Some(&Value::String(id)))?;
    let recipe = state.assistant.recipes().recipe(id).await?;
    Ok(Json(recipe).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchQuery {
    query: Option<String>,
    diet: Option<String>,
    cuisine: Option<String>,
    #[serde(rename = "type")]
    dish_type: Option<String>,
    intolerances: Option<String>,
    max_ready_time: Option<u32>,
    number: Option<u32>,
}

impl RecipeSearchQuery {
    fn into_params(self) -> Result<SearchParams, ApiError> {
        let query = self
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ApiError::BadRequest("query parameter 'query' is required".to_string()))?;

        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        Ok(SearchParams {
            query,
            diet: non_empty(self.diet),
            cuisine: non_empty(self.cuisine),
            dish_type: non_empty(self.dish_type),
            intolerances: non_empty(self.intolerances),
            max_ready_time: self.max_ready_time.filter(|m| *m > 0),
            number: self.number.map(|n| n.clamp(1, MAX_SEARCH_RESULTS)),
        })
    }
}

pub async fn recipe_search_handler(
    AxumState(state): AppState,
    params: Result<Query<RecipeSearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(params)?.into_params()?;
    let results = state.assistant.recipes().search(&params).await?;
    Ok(Json(results).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipe_id() {
        assert_eq!(parse_recipe_id(Some(&json!(716429))).unwrap(), 716429);
        assert_eq!(parse_recipe_id(Some(&json!(" 12 "))).unwrap(), 12);
        assert!(parse_recipe_id(Some(&json!(0))).is_err());
        assert!(parse_recipe_id(Some(&json!(-4))).is_err());
        assert!(parse_recipe_id(Some(&json!("abc"))).is_err());
        assert!(parse_recipe_id(None).is_err());
    }

    #[test]
    fn test_search_query_into_params() {
        let query = RecipeSearchQuery {
            query: Some(" curry ".into()),
            diet: Some("".into()),
            cuisine: Some("indian".into()),
            dish_type: None,
            intolerances: None,
            max_ready_time: Some(0),
            number: Some(500),
        };
        let params = query.into_params().unwrap();
        assert_eq!(params.query, "curry");
        assert_eq!(params.diet, None);
        assert_eq!(params.cuisine.as_deref(), Some("indian"));
        assert_eq!(params.max_ready_time, None);
        assert_eq!(params.number, Some(100));
    }

    #[test]
    fn test_search_query_requires_query() {
        let query = RecipeSearchQuery {
            query: Some("   ".into()),
            diet: None,
            cuisine: None,
            dish_type: None,
            intolerances: None,
            max_ready_time: None,
            number: None,
        };
        assert!(matches!(query.into_params(), Err(ApiError::BadRequest(_))));
    }
}
