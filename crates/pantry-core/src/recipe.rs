//! Recipe record: the subset of a Spoonacular recipe the assistant reads.
//!
//! Field names follow the upstream camelCase JSON so records deserialize
//! straight from `/recipes/{id}/information`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A full recipe as returned by the recipe API.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub health_score: Option<f64>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub cuisines: Vec<String>,
    pub dish_types: Vec<String>,
    pub diets: Vec<String>,
    pub extended_ingredients: Vec<Ingredient>,
    pub analyzed_instructions: Vec<InstructionBlock>,
    pub instructions: Option<String>,
    pub summary: Option<String>,
}

/// One ingredient line.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Ingredient {
    pub name: String,
    /// The ingredient line as written in the source recipe.
    pub original: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl Ingredient {
    /// Human-readable line, preferring the original text.
    pub fn display(&self) -> String {
        if !self.original.trim().is_empty() {
            return self.original.trim().to_string();
        }
        match (self.amount, self.unit.as_deref()) {
            (Some(amount), Some(unit)) if !unit.is_empty() => {
                format!("{amount} {unit} {}", self.name)
            }
            (Some(amount), _) => format!("{amount} {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// A named group of steps (most recipes have exactly one, unnamed).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstructionBlock {
    pub name: String,
    pub steps: Vec<InstructionStep>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstructionStep {
    pub number: u32,
    pub step: String,
}

impl Recipe {
    /// Ordered instruction steps.
    ///
    /// Structured steps win; otherwise the free-text `instructions` field is
    /// split into lines with markup removed.
    pub fn steps(&self) -> Vec<String> {
        let structured: Vec<String> = self
            .analyzed_instructions
            .iter()
            .flat_map(|block| block.steps.iter())
            .map(|s| s.step.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !structured.is_empty() {
            return structured;
        }

        let raw = self.instructions.as_deref().unwrap_or_default();
        strip_tags(raw)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    /// Ingredient names, lowercased.
    pub fn ingredient_names(&self) -> Vec<String> {
        self.extended_ingredients
            .iter()
            .map(|i| i.name.to_lowercase())
            .collect()
    }
}

/// Tags that end a line of text.
static LINE_BREAK_TAGS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)</li>|<br\s*/?>|</p>").ok());

static ANY_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

/// Markup to plain text: block ends become newlines, other tags are dropped.
fn strip_tags(html: &str) -> String {
    let mut text = html.to_string();
    if let Some(re) = LINE_BREAK_TAGS.as_ref() {
        text = re.replace_all(&text, "\n").into_owned();
    }
    if let Some(re) = ANY_TAG.as_ref() {
        text = re.replace_all(&text, "").into_owned();
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

// ─────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────

/// A search hit from `/recipes/complexSearch`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
}

/// Response envelope of `/recipes/complexSearch`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResults {
    pub results: Vec<RecipeSummary>,
    pub total_results: u64,
}

/// Search filters, serialized as complexSearch query parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dish_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intolerances: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ready_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
