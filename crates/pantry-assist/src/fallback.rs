//! Fallback synthesizer: deterministic results built from data already at hand.
//!
//! Used when every provider fails. Only the request itself, the recipe's own
//! fields and the static tables below are consulted: no randomness, no I/O.
//! The same input always serializes to the same bytes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use pantry_core::utils::capitalize;
use pantry_core::Recipe;
use pantry_providers::ExtractedResult;

use crate::modification::{replace_terms, substitutions_for, term_pattern, ModificationKind};

/// Health score used when the recipe has none.
pub const DEFAULT_HEALTH_SCORE: i64 = 50;

/// Number of results requested when recommending.
pub const DEFAULT_RESULT_COUNT: u64 = 10;

/// Ingredients flagged as a nutrition concern when present.
static RICH_INGREDIENTS: &[(&str, &str)] = &[
    ("butter", "saturated fat"),
    ("cream", "saturated fat"),
    ("cheese", "saturated fat and sodium"),
    ("bacon", "sodium and saturated fat"),
    ("sugar", "added sugar"),
];

static RICH_PATTERNS: LazyLock<Vec<(&str, &str, Regex)>> = LazyLock::new(|| {
    RICH_INGREDIENTS
        .iter()
        .filter_map(|&(term, nutrient)| term_pattern(term).map(|re| (term, nutrient, re)))
        .collect()
});

fn into_map(value: Value) -> ExtractedResult {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ─────────────────────────────────────────────
// Search & recommendation
// ─────────────────────────────────────────────

pub fn search(query: &str) -> ExtractedResult {
    into_map(json!({ "searchTerm": query.trim() }))
}

pub fn recommendation(query: &str) -> ExtractedResult {
    into_map(json!({
        "searchTerm": query.trim(),
        "number": DEFAULT_RESULT_COUNT,
    }))
}

// ─────────────────────────────────────────────
// Analysis
// ─────────────────────────────────────────────

pub fn analysis(recipe: &Recipe) -> ExtractedResult {
    let score = health_score(recipe);

    into_map(json!({
        "healthScore": score,
        "nutritionAnalysis": nutrition_analysis(recipe, score),
        "allergens": allergens(recipe),
        "cookingDifficulty": cooking_difficulty(recipe.ready_in_minutes),
        "dietaryCompatibility": {
            "vegetarian": recipe.vegetarian,
            "vegan": recipe.vegan,
            "glutenFree": recipe.gluten_free,
            "dairyFree": recipe.dairy_free,
        },
        "suggestions": suggestions(recipe, score),
    }))
}

fn health_score(recipe: &Recipe) -> i64 {
    recipe
        .health_score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as i64)
        .unwrap_or(DEFAULT_HEALTH_SCORE)
}

fn allergens(recipe: &Recipe) -> Vec<Value> {
    let mut out = Vec::new();
    if !recipe.gluten_free {
        out.push(json!({
            "name": "gluten",
            "severity": "medium",
            "description": "This recipe is not marked gluten-free and may contain wheat, barley or rye.",
        }));
    }
    if !recipe.dairy_free {
        out.push(json!({
            "name": "dairy",
            "severity": "medium",
            "description": "This recipe is not marked dairy-free and may contain milk products.",
        }));
    }
    out
}

/// Difficulty from ready time: above 60 minutes is advanced, above 30 is
/// intermediate.
pub fn difficulty_level(ready_in_minutes: Option<u32>) -> &'static str {
    match ready_in_minutes {
        Some(m) if m > 60 => "advanced",
        Some(m) if m > 30 => "intermediate",
        Some(_) => "beginner",
        None => "intermediate",
    }
}

fn cooking_difficulty(ready_in_minutes: Option<u32>) -> Value {
    let reason = match ready_in_minutes {
        Some(m) => format!("Ready in {m} minutes."),
        None => "Ready time is not available.".to_string(),
    };
    json!({
        "level": difficulty_level(ready_in_minutes),
        "reason": reason,
    })
}

fn nutrition_analysis(recipe: &Recipe, score: i64) -> Value {
    let summary = match score {
        s if s >= 75 => "A nutrient-dense recipe with a high health score.",
        s if s >= 50 => "A reasonably balanced recipe.",
        _ => "An indulgent recipe best enjoyed in moderation.",
    };

    let mut highlights = Vec::new();
    if recipe.vegan {
        highlights.push("Entirely plant-based".to_string());
    } else if recipe.vegetarian {
        highlights.push("Vegetarian".to_string());
    }
    if recipe.gluten_free {
        highlights.push("Gluten-free".to_string());
    }
    if recipe.dairy_free {
        highlights.push("Dairy-free".to_string());
    }
    if score >= 75 {
        highlights.push(format!("Health score of {score}"));
    }

    let names = recipe.ingredient_names();
    let mut concerns = Vec::new();
    if score < 50 {
        concerns.push(format!("Health score of {score} is below average"));
    }
    for (term, nutrient, pattern) in RICH_PATTERNS.iter() {
        if names.iter().any(|n| pattern.is_match(n)) {
            concerns.push(format!("{} adds {nutrient}", capitalize(term)));
        }
    }

    json!({
        "summary": summary,
        "highlights": highlights,
        "concerns": concerns,
    })
}

fn suggestions(recipe: &Recipe, score: i64) -> Vec<String> {
    let mut out = Vec::new();
    if score < 50 {
        out.push(
            "Add more vegetables or swap refined ingredients for whole-food alternatives."
                .to_string(),
        );
    }
    if !recipe.gluten_free {
        out.push("Use gluten-free grains or flour to suit gluten-free diets.".to_string());
    }
    if !recipe.dairy_free {
        out.push("Replace dairy with plant-based milk, butter or cheese alternatives.".to_string());
    }
    if recipe.ready_in_minutes.is_some_and(|m| m > 60) {
        out.push("Prepare components ahead of time to cut active cooking time.".to_string());
    }
    if out.is_empty() {
        out.push("Already well balanced; serve with a side salad for extra fibre.".to_string());
    }
    out
}

// ─────────────────────────────────────────────
// Modification
// ─────────────────────────────────────────────

pub fn modification(recipe: &Recipe, kind: ModificationKind) -> ExtractedResult {
    let title = if recipe.title.trim().is_empty() {
        format!("{} Recipe", kind.label())
    } else {
        format!("{} {}", kind.label(), recipe.title.trim())
    };

    let subs = substitutions_for(kind, &recipe.extended_ingredients);

    let substitutions: Vec<Value> = subs
        .iter()
        .map(|s| {
            json!({
                "original": s.original,
                "substitute": s.substitute,
                "reason": kind.reason(),
            })
        })
        .collect();

    let pairs: Vec<(&str, &str)> = subs.iter().map(|s| (s.term, s.substitute)).collect();
    let steps = recipe.steps();
    let modified_instructions: Vec<String> = if steps.is_empty() {
        vec!["Follow the original method, using the substitutions listed above.".to_string()]
    } else {
        steps.iter().map(|step| replace_terms(step, &pairs)).collect()
    };

    let mut notes = Vec::new();
    if already_satisfies(recipe, kind) {
        notes.push(format!("This recipe is already {}.", kind.as_str()));
    }
    if subs.is_empty() {
        notes.push(format!(
            "No ingredients needed changing for a {} version.",
            kind.as_str()
        ));
    } else {
        notes.push("Substitutions may change cooking times; adjust quantities to taste.".to_string());
    }

    into_map(json!({
        "title": title,
        "modificationType": kind.as_str(),
        "ingredientSubstitutions": substitutions,
        "modifiedInstructions": modified_instructions,
        "nutritionalImpact": kind.nutritional_impact(),
        "notes": notes,
    }))
}

fn already_satisfies(recipe: &Recipe, kind: ModificationKind) -> bool {
    match kind {
        ModificationKind::Vegetarian => recipe.vegetarian || recipe.vegan,
        ModificationKind::Vegan => recipe.vegan,
        ModificationKind::GlutenFree => recipe.gluten_free,
        ModificationKind::DairyFree => recipe.dairy_free,
        ModificationKind::Healthier | ModificationKind::LowCarb => false,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::{Ingredient, InstructionBlock, InstructionStep};

    fn pasta() -> Recipe {
        Recipe {
            id: 716429,
            title: "Pasta with Garlic and Butter".into(),
            ready_in_minutes: Some(75),
            health_score: Some(19.0),
            gluten_free: false,
            dairy_free: false,
            extended_ingredients: vec![
                Ingredient {
                    name: "spaghetti".into(),
                    original: "1 lb spaghetti".into(),
                    ..Default::default()
                },
                Ingredient {
                    name: "butter".into(),
                    original: "3 tbsp butter".into(),
                    ..Default::default()
                },
                Ingredient {
                    name: "garlic".into(),
                    original: "4 cloves garlic".into(),
                    ..Default::default()
                },
            ],
            analyzed_instructions: vec![InstructionBlock {
                name: String::new(),
                steps: vec![
                    InstructionStep { number: 1, step: "Cook the spaghetti.".into() },
                    InstructionStep { number: 2, step: "Melt the butter with garlic.".into() },
                ],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_search_fallback() {
        let result = search("  cheap tacos ");
        assert_eq!(Value::Object(result), json!({ "searchTerm": "cheap tacos" }));
    }

    #[test]
    fn test_recommendation_fallback_literal_shape() {
        let result = recommendation("quick vegan dinner");
        assert_eq!(
            Value::Object(result),
            json!({ "searchTerm": "quick vegan dinner", "number": 10 })
        );
    }

    #[test]
    fn test_analysis_allergens_and_difficulty() {
        let result = analysis(&pasta());

        let allergens = result["allergens"].as_array().unwrap();
        assert_eq!(allergens.len(), 2);
        assert_eq!(allergens[0]["name"], "gluten");
        assert_eq!(allergens[1]["name"], "dairy");
        assert!(allergens.iter().all(|a| a["severity"] == "medium"));

        assert_eq!(result["cookingDifficulty"]["level"], "advanced");
        assert_eq!(result["healthScore"], 19);
    }

    #[test]
    fn test_analysis_no_allergens_when_flags_set() {
        let recipe = Recipe {
            gluten_free: true,
            dairy_free: true,
            vegan: true,
            vegetarian: true,
            ready_in_minutes: Some(20),
            health_score: Some(88.4),
            ..Default::default()
        };
        let result = analysis(&recipe);
        assert!(result["allergens"].as_array().unwrap().is_empty());
        assert_eq!(result["cookingDifficulty"]["level"], "beginner");
        assert_eq!(result["dietaryCompatibility"]["vegan"], true);
        assert_eq!(result["healthScore"], 88);
        assert_eq!(
            result["suggestions"],
            json!(["Already well balanced; serve with a side salad for extra fibre."])
        );
    }

    #[test]
    fn test_analysis_defaults() {
        let result = analysis(&Recipe::default());
        assert_eq!(result["healthScore"], DEFAULT_HEALTH_SCORE);
        assert_eq!(result["cookingDifficulty"]["level"], "intermediate");
    }

    #[test]
    fn test_difficulty_thresholds() {
        assert_eq!(difficulty_level(Some(30)), "beginner");
        assert_eq!(difficulty_level(Some(31)), "intermediate");
        assert_eq!(difficulty_level(Some(60)), "intermediate");
        assert_eq!(difficulty_level(Some(61)), "advanced");
        assert_eq!(difficulty_level(None), "intermediate");
    }

    #[test]
    fn test_analysis_concerns_from_ingredients() {
        let result = analysis(&pasta());
        let concerns = result["nutritionAnalysis"]["concerns"].as_array().unwrap();
        assert!(concerns.iter().any(|c| c == "Butter adds saturated fat"));
        assert!(concerns.iter().any(|c| c.as_str().unwrap().contains("below average")));
    }

    #[test]
    fn test_analysis_is_byte_identical() {
        let recipe = pasta();
        let a = serde_json::to_string(&analysis(&recipe)).unwrap();
        let b = serde_json::to_string(&analysis(&recipe)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_modification_vegan() {
        let result = modification(&pasta(), ModificationKind::Vegan);
        assert_eq!(result["title"], "Vegan Pasta with Garlic and Butter");
        assert_eq!(result["modificationType"], "vegan");

        let subs = result["ingredientSubstitutions"].as_array().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0]["original"], "3 tbsp butter");
        assert_eq!(subs[0]["substitute"], "plant-based butter");

        assert_eq!(
            result["modifiedInstructions"],
            json!(["Cook the spaghetti.", "Melt the plant-based butter with garlic."])
        );
    }

    #[test]
    fn test_modification_without_matches() {
        let recipe = Recipe {
            title: "Green Salad".into(),
            vegan: true,
            vegetarian: true,
            ..Default::default()
        };
        let result = modification(&recipe, ModificationKind::Vegetarian);
        assert!(result["ingredientSubstitutions"].as_array().unwrap().is_empty());
        assert_eq!(
            result["modifiedInstructions"],
            json!(["Follow the original method, using the substitutions listed above."])
        );
        let notes = result["notes"].as_array().unwrap();
        assert_eq!(notes[0], "This recipe is already vegetarian.");
    }

    #[test]
    fn test_modification_is_byte_identical() {
        let recipe = pasta();
        for kind in ModificationKind::ALL {
            let a = serde_json::to_vec(&modification(&recipe, kind)).unwrap();
            let b = serde_json::to_vec(&modification(&recipe, kind)).unwrap();
            assert_eq!(a, b, "{kind} fallback is not deterministic");
        }
    }
}
