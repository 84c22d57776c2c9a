//! Context builder: turns a task's inputs into a system instruction and user
//! content.
//!
//! Everything here is pure: no I/O, no failure. Missing recipe fields are
//! written as `"Unknown"` or `"Not available"` so the model sees every
//! section. Ingredient and instruction lists are embedded in full.

use pantry_core::Recipe;
use pantry_providers::GenerationRequest;

use crate::modification::ModificationKind;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "Not available";

// ─────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────

/// The four orchestrated tasks, each with its own sampling budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    SearchTranslation,
    Recommendation,
    Analysis,
    Modification,
}

impl TaskKind {
    pub fn max_tokens(self) -> u32 {
        match self {
            TaskKind::SearchTranslation | TaskKind::Recommendation => 200,
            TaskKind::Analysis | TaskKind::Modification => 1500,
        }
    }

    pub fn temperature(self) -> f64 {
        match self {
            TaskKind::SearchTranslation => 0.2,
            TaskKind::Recommendation => 0.5,
            TaskKind::Analysis => 0.3,
            TaskKind::Modification => 0.7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::SearchTranslation => "search",
            TaskKind::Recommendation => "recommend",
            TaskKind::Analysis => "analyze",
            TaskKind::Modification => "modify",
        }
    }
}

/// A built prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Attach the task's sampling budget.
    pub fn into_request(self, task: TaskKind) -> GenerationRequest {
        GenerationRequest::new(self.system, self.user)
            .with_temperature(task.temperature())
            .with_max_tokens(task.max_tokens())
    }
}

/// Optional user preferences for recommendations.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub max_ready_time: Option<u32>,
    pub intolerances: Vec<String>,
}

// ─────────────────────────────────────────────
// Prompt builders
// ─────────────────────────────────────────────

const JSON_ONLY: &str =
    "Respond with a single JSON object and nothing else: no prose, no markdown fences.";

const DIET_VALUES: &str =
    "gluten free, ketogenic, vegetarian, lacto-vegetarian, ovo-vegetarian, vegan, pescetarian, paleo, primal, whole30";

/// Natural-language search → search parameters.
pub fn search_prompt(query: &str) -> Prompt {
    let system = format!(
        "You translate natural-language recipe requests into search parameters for a recipe API.\n\
         {JSON_ONLY}\n\
         Shape: {{\"searchTerm\": string, \"diet\": string, \"cuisine\": string, \"type\": string, \
         \"maxReadyTime\": number, \"intolerances\": string}}\n\
         Only `searchTerm` is required; omit any key you cannot infer from the request.\n\
         Valid diets: {DIET_VALUES}.\n\
         `type` is a dish type such as main course, dessert, breakfast, soup, or salad.\n\
         `maxReadyTime` is in minutes."
    );
    Prompt {
        system,
        user: format!("Request: {}", query.trim()),
    }
}

/// Free-text wish + preferences → recommendation parameters.
pub fn recommendation_prompt(query: &str, preferences: Option<&Preferences>) -> Prompt {
    let system = format!(
        "You are a recipe recommendation assistant. Pick search parameters that will \
         surface recipes the user is likely to enjoy.\n\
         {JSON_ONLY}\n\
         Shape: {{\"searchTerm\": string, \"number\": number, \"diet\": string, \"cuisine\": string, \
         \"maxReadyTime\": number}}\n\
         `searchTerm` is required. `number` is how many recipes to return (1-100, usually 10).\n\
         Valid diets: {DIET_VALUES}.\n\
         Respect every stated preference."
    );

    let mut user = format!("Request: {}", query.trim());
    if let Some(prefs) = preferences {
        user.push_str("\n\nPreferences:");
        user.push_str(&format!(
            "\n- Diet: {}",
            prefs.diet.as_deref().unwrap_or(UNKNOWN)
        ));
        user.push_str(&format!(
            "\n- Cuisine: {}",
            prefs.cuisine.as_deref().unwrap_or(UNKNOWN)
        ));
        user.push_str(&format!(
            "\n- Max ready time: {}",
            prefs
                .max_ready_time
                .map(|m| format!("{m} minutes"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ));
        user.push_str(&format!(
            "\n- Intolerances: {}",
            if prefs.intolerances.is_empty() {
                "None".to_string()
            } else {
                prefs.intolerances.join(", ")
            }
        ));
    }

    Prompt { system, user }
}

/// Recipe → nutrition/allergen/difficulty analysis.
pub fn analysis_prompt(recipe: &Recipe) -> Prompt {
    let system = format!(
        "You are a nutritionist and chef analysing a recipe.\n\
         {JSON_ONLY}\n\
         Shape:\n\
         {{\n  \"healthScore\": number (0-100),\n  \
         \"nutritionAnalysis\": {{\"summary\": string, \"highlights\": [string], \"concerns\": [string]}},\n  \
         \"allergens\": [{{\"name\": string, \"severity\": \"low\" | \"medium\" | \"high\", \"description\": string}}],\n  \
         \"cookingDifficulty\": {{\"level\": \"beginner\" | \"intermediate\" | \"advanced\", \"reason\": string}},\n  \
         \"dietaryCompatibility\": {{\"vegetarian\": boolean, \"vegan\": boolean, \"glutenFree\": boolean, \"dairyFree\": boolean}},\n  \
         \"suggestions\": [string]\n}}"
    );
    Prompt {
        system,
        user: format!("Analyse this recipe.\n\n{}", describe_recipe(recipe)),
    }
}

/// Recipe + modification type → adapted recipe.
pub fn modification_prompt(recipe: &Recipe, kind: ModificationKind) -> Prompt {
    let system = format!(
        "You are a chef adapting recipes to dietary goals.\n\
         {JSON_ONLY}\n\
         Shape:\n\
         {{\n  \"title\": string,\n  \"modificationType\": string,\n  \
         \"ingredientSubstitutions\": [{{\"original\": string, \"substitute\": string, \"reason\": string}}],\n  \
         \"modifiedInstructions\": [string],\n  \"nutritionalImpact\": string,\n  \"notes\": [string]\n}}\n\
         Keep the dish recognisable; change only what the goal requires."
    );
    Prompt {
        system,
        user: format!(
            "Goal: make this recipe {} ({}).\n\n{}",
            kind.label().to_lowercase(),
            kind.goal(),
            describe_recipe(recipe)
        ),
    }
}

/// Plain-text recipe block shared by the recipe-based prompts.
pub fn describe_recipe(recipe: &Recipe) -> String {
    let title = if recipe.title.trim().is_empty() {
        UNKNOWN
    } else {
        recipe.title.trim()
    };

    let mut out = format!("Title: {title}\n");
    out.push_str(&format!(
        "Ready in: {}\n",
        recipe
            .ready_in_minutes
            .map(|m| format!("{m} minutes"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    ));
    out.push_str(&format!(
        "Servings: {}\n",
        recipe
            .servings
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    ));
    out.push_str(&format!(
        "Health score: {}\n",
        recipe
            .health_score
            .map(|s| format!("{}", s.round() as i64))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    ));
    out.push_str(&format!(
        "Dietary flags: vegetarian={}, vegan={}, glutenFree={}, dairyFree={}\n",
        yes_no(recipe.vegetarian),
        yes_no(recipe.vegan),
        yes_no(recipe.gluten_free),
        yes_no(recipe.dairy_free)
    ));
    out.push_str(&format!("Cuisines: {}\n", list_or_unknown(&recipe.cuisines)));
    out.push_str(&format!("Dish types: {}\n", list_or_unknown(&recipe.dish_types)));

    out.push_str("\nIngredients:\n");
    if recipe.extended_ingredients.is_empty() {
        out.push_str(NOT_AVAILABLE);
        out.push('\n');
    } else {
        for ingredient in &recipe.extended_ingredients {
            out.push_str(&format!("- {}\n", ingredient.display()));
        }
    }

    out.push_str("\nInstructions:\n");
    let steps = recipe.steps();
    if steps.is_empty() {
        out.push_str(NOT_AVAILABLE);
        out.push('\n');
    } else {
        for (i, step) in steps.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, step));
        }
    }

    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn list_or_unknown(items: &[String]) -> String {
    if items.is_empty() {
        UNKNOWN.to_string()
    } else {
        items.join(", ")
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
