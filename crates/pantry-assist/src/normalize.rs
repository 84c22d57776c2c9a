//! Result normalization: reshape a provider answer into the task schema.
//!
//! Model output is trusted only as far as its types. Schema keys that are
//! missing or mistyped are taken from the fallback result, and keys outside
//! the schema are dropped, so the response exposes the same top-level keys
//! whichever path produced it.

use serde_json::{Map, Value};

use pantry_providers::ExtractedResult;

use crate::fallback;

/// Upper bound on recommendation result count.
pub const MAX_RESULT_COUNT: u64 = 100;

/// Expected JSON type of a schema key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Number => value.is_number(),
            Kind::String => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Kind::Array => value.is_array(),
            Kind::Object => value.is_object(),
        }
    }
}

pub const ANALYSIS_SCHEMA: &[(&str, Kind)] = &[
    ("healthScore", Kind::Number),
    ("nutritionAnalysis", Kind::Object),
    ("allergens", Kind::Array),
    ("cookingDifficulty", Kind::Object),
    ("dietaryCompatibility", Kind::Object),
    ("suggestions", Kind::Array),
];

pub const MODIFICATION_SCHEMA: &[(&str, Kind)] = &[
    ("title", Kind::String),
    ("modificationType", Kind::String),
    ("ingredientSubstitutions", Kind::Array),
    ("modifiedInstructions", Kind::Array),
    ("nutritionalImpact", Kind::String),
    ("notes", Kind::Array),
];

/// Keep schema keys with the right type, fill the rest from `fallback`.
pub fn conform(
    mut model: ExtractedResult,
    mut fallback: ExtractedResult,
    schema: &[(&str, Kind)],
) -> ExtractedResult {
    let mut out = Map::new();
    for &(key, kind) in schema {
        let value = match model.remove(key) {
            Some(v) if kind.matches(&v) => Some(v),
            _ => fallback.remove(key),
        };
        if let Some(v) = value {
            out.insert(key.to_string(), v);
        }
    }
    out
}

// ─────────────────────────────────────────────
// Search parameters
// ─────────────────────────────────────────────

fn non_empty_string(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(Value::String(s.trim().to_string())),
        _ => None,
    }
}

fn positive_integer(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 1.0).map(|f| f.round() as u64))
        .filter(|n| *n > 0)
}

/// Comma-separated string, accepting a model-supplied array too.
fn string_list(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(Value::String(joined))
        }
        other => non_empty_string(Some(other)),
    }
}

/// Search translation: `searchTerm` plus well-typed optional filters.
pub fn search(model: &ExtractedResult, query: &str) -> ExtractedResult {
    let mut out = fallback::search(query);
    if let Some(term) = non_empty_string(model.get("searchTerm")) {
        out.insert("searchTerm".into(), term);
    }
    for key in ["diet", "cuisine", "type"] {
        if let Some(v) = non_empty_string(model.get(key)) {
            out.insert(key.into(), v);
        }
    }
    if let Some(minutes) = positive_integer(model.get("maxReadyTime")) {
        out.insert("maxReadyTime".into(), minutes.into());
    }
    if let Some(v) = string_list(model.get("intolerances")) {
        out.insert("intolerances".into(), v);
    }
    out
}

/// Recommendation: `searchTerm`, clamped `number`, and optional filters.
pub fn recommendation(model: &ExtractedResult, query: &str) -> ExtractedResult {
    let mut out = fallback::recommendation(query);
    if let Some(term) = non_empty_string(model.get("searchTerm")) {
        out.insert("searchTerm".into(), term);
    }
    if let Some(n) = positive_integer(model.get("number")) {
        out.insert("number".into(), n.clamp(1, MAX_RESULT_COUNT).into());
    }
    for key in ["diet", "cuisine"] {
        if let Some(v) = non_empty_string(model.get(key)) {
            out.insert(key.into(), v);
        }
    }
    if let Some(minutes) = positive_integer(model.get("maxReadyTime")) {
        out.insert("maxReadyTime".into(), minutes.into());
    }
    out
}
