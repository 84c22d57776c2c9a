//! Recipe assistant: runs the four AI-assisted tasks.
//!
//! Every task follows the same path: build a prompt, run the provider chain,
//! normalize the first extracted answer, or synthesize a fallback when the
//! chain comes back empty-handed.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use pantry_core::Recipe;
use pantry_providers::{Answer, ChainError, ExtractedResult, ProviderChain};

use crate::context::{self, Preferences, Prompt, TaskKind};
use crate::error::AssistError;
use crate::fallback;
use crate::modification::ModificationKind;
use crate::normalize::{self, ANALYSIS_SCHEMA, MODIFICATION_SCHEMA};
use crate::recipes::RecipeSource;

/// Which path produced a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Model { provider: String },
    Fallback,
}

impl Source {
    /// Value of the provenance response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Model { .. } => "model",
            Source::Fallback => "fallback",
        }
    }
}

/// A task result and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Assisted {
    pub body: ExtractedResult,
    pub source: Source,
}

/// Recommendation request body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

/// Runs tasks against an injected provider chain and recipe source.
#[derive(Clone)]
pub struct RecipeAssistant {
    chain: ProviderChain,
    recipes: Arc<dyn RecipeSource>,
}

impl std::fmt::Debug for RecipeAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeAssistant")
            .field("chain", &self.chain)
            .finish()
    }
}

impl RecipeAssistant {
    pub fn new(chain: ProviderChain, recipes: Arc<dyn RecipeSource>) -> Self {
        Self { chain, recipes }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub fn recipes(&self) -> &dyn RecipeSource {
        self.recipes.as_ref()
    }

    /// Natural-language query → search parameters.
    pub async fn translate_search(&self, query: &str) -> Result<Assisted, AssistError> {
        let query = require_query(query)?;
        let answer = self
            .ask_or_degrade(TaskKind::SearchTranslation, context::search_prompt(query))
            .await;

        Ok(match answer {
            Some(answer) => model_result(TaskKind::SearchTranslation, &answer, |v| {
                normalize::search(v, query)
            }),
            None => fallback_result(TaskKind::SearchTranslation, fallback::search(query)),
        })
    }

    /// Free-text wish + preferences → recommendation parameters.
    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Assisted, AssistError> {
        let query = require_query(&request.query)?;
        let prompt = context::recommendation_prompt(query, request.preferences.as_ref());
        let answer = self.ask_or_degrade(TaskKind::Recommendation, prompt).await;

        Ok(match answer {
            Some(answer) => model_result(TaskKind::Recommendation, &answer, |v| {
                normalize::recommendation(v, query)
            }),
            None => fallback_result(TaskKind::Recommendation, fallback::recommendation(query)),
        })
    }

    /// Recipe id → analysis.
    ///
    /// Fails with [`AssistError::Unconfigured`] before fetching the recipe when
    /// no provider is configured.
    pub async fn analyze(&self, recipe_id: u64) -> Result<Assisted, AssistError> {
        let recipe = self.load_recipe(recipe_id).await?;
        let answer = self
            .ask(TaskKind::Analysis, context::analysis_prompt(&recipe))
            .await?;

        let fallback = fallback::analysis(&recipe);
        Ok(match answer {
            Some(answer) => model_result(TaskKind::Analysis, &answer, |v| {
                normalize::conform(v.clone(), fallback, ANALYSIS_SCHEMA)
            }),
            None => fallback_result(TaskKind::Analysis, fallback),
        })
    }

    /// Recipe id + modification type → adapted recipe.
    pub async fn modify(
        &self,
        recipe_id: u64,
        kind: ModificationKind,
    ) -> Result<Assisted, AssistError> {
        let recipe = self.load_recipe(recipe_id).await?;
        let answer = self
            .ask(TaskKind::Modification, context::modification_prompt(&recipe, kind))
            .await?;

        let fallback = fallback::modification(&recipe, kind);
        Ok(match answer {
            Some(answer) => model_result(TaskKind::Modification, &answer, |v| {
                let mut body = normalize::conform(v.clone(), fallback, MODIFICATION_SCHEMA);
                body.insert("modificationType".into(), kind.as_str().into());
                body
            }),
            None => fallback_result(TaskKind::Modification, fallback),
        })
    }

    /// Checks the chain before touching the recipe API.
    async fn load_recipe(&self, recipe_id: u64) -> Result<Recipe, AssistError> {
        if self.chain.is_empty() {
            warn!(recipe_id, "No AI provider configured");
            return Err(AssistError::Unconfigured);
        }
        Ok(self.recipes.recipe(recipe_id).await?)
    }

    async fn ask(&self, task: TaskKind, prompt: Prompt) -> Result<Option<Answer>, AssistError> {
        match self.chain.run(&prompt.into_request(task)).await {
            Ok(outcome) => Ok(outcome.into_answer()),
            Err(ChainError::Unconfigured) => Err(AssistError::Unconfigured),
        }
    }

    /// Like [`ask`](Self::ask), but an unconfigured chain degrades to the
    /// fallback instead of failing.
    async fn ask_or_degrade(&self, task: TaskKind, prompt: Prompt) -> Option<Answer> {
        match self.ask(task, prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(task = task.name(), error = %e, "Skipping providers");
                None
            }
        }
    }
}

fn require_query(query: &str) -> Result<&str, AssistError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AssistError::InvalidRequest("query is required".to_string()));
    }
    Ok(trimmed)
}

fn model_result(
    task: TaskKind,
    answer: &Answer,
    shape: impl FnOnce(&ExtractedResult) -> ExtractedResult,
) -> Assisted {
    info!(
        task = task.name(),
        provider = %answer.provider,
        strategy = answer.strategy.name(),
        "Answered by provider"
    );
    Assisted {
        body: shape(&answer.value),
        source: Source::Model {
            provider: answer.provider.clone(),
        },
    }
}

fn fallback_result(task: TaskKind, body: ExtractedResult) -> Assisted {
    info!(task = task.name(), "Using fallback result");
    Assisted {
        body,
        source: Source::Fallback,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::RecipeError;
    use async_trait::async_trait;
    use pantry_core::{SearchParams, SearchResults};
    use pantry_providers::{Generation, GenerationRequest, ProviderError, TextGenerator};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Generator replying with fixed text, or failing with a status.
    struct Scripted {
        name: &'static str,
        reply: Result<&'static str, u16>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl Scripted {
        fn new(name: &'static str, reply: Result<&'static str, u16>) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.reply {
                Ok(text) => Ok(Generation {
                    status: 200,
                    text: text.to_string(),
                }),
                Err(status) => Err(ProviderError::Status {
                    status,
                    body: "scripted failure".into(),
                }),
            }
        }

        fn name(&self) -> &str {
            self.name
        }

        fn display_name(&self) -> &str {
            self.name
        }
    }

    /// Recipe source serving one recipe and counting lookups.
    #[derive(Default)]
    struct OneRecipe {
        recipe: Recipe,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl RecipeSource for OneRecipe {
        async fn recipe(&self, id: u64) -> Result<Recipe, RecipeError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if id == self.recipe.id {
                Ok(self.recipe.clone())
            } else {
                Err(RecipeError::NotFound(id))
            }
        }

        async fn search(&self, _params: &SearchParams) -> Result<SearchResults, RecipeError> {
            Ok(SearchResults::default())
        }
    }

    fn slow_pasta() -> Recipe {
        Recipe {
            id: 42,
            title: "Slow Baked Pasta".into(),
            ready_in_minutes: Some(75),
            gluten_free: false,
            dairy_free: false,
            ..Default::default()
        }
    }

    fn assistant(generators: &[&Arc<Scripted>], source: Arc<OneRecipe>) -> RecipeAssistant {
        let providers = generators
            .iter()
            .map(|g| Arc::clone(g) as Arc<dyn TextGenerator>)
            .collect();
        RecipeAssistant::new(ProviderChain::new(providers), source)
    }

    fn source() -> Arc<OneRecipe> {
        Arc::new(OneRecipe {
            recipe: slow_pasta(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_recommend_fallback_scenario() {
        let a = Scripted::new("a", Err(500));
        let b = Scripted::new("b", Ok("no json here"));
        let assistant = assistant(&[&a, &b], source());

        let request = RecommendRequest {
            query: "quick vegan dinner".into(),
            preferences: None,
        };
        let result = assistant.recommend(&request).await.unwrap();

        assert_eq!(result.source, Source::Fallback);
        assert_eq!(
            Value::Object(result.body),
            json!({ "searchTerm": "quick vegan dinner", "number": 10 })
        );
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_model_answer_and_budget() {
        let a = Scripted::new(
            "a",
            Ok("```json\n{\"searchTerm\": \"tacos\", \"cuisine\": \"mexican\", \"mood\": \"happy\"}\n```"),
        );
        let b = Scripted::new("b", Ok("{\"searchTerm\": \"never\"}"));
        let assistant = assistant(&[&a, &b], source());

        let result = assistant.translate_search("cheap mexican tacos").await.unwrap();
        assert_eq!(
            result.source,
            Source::Model {
                provider: "a".into()
            }
        );
        assert_eq!(
            Value::Object(result.body),
            json!({ "searchTerm": "tacos", "cuisine": "mexican" })
        );
        assert_eq!(b.calls(), 0);

        let sent = a.requests.lock().unwrap()[0].clone();
        assert_eq!(sent.max_tokens, 200);
        assert_eq!(sent.user, "Request: cheap mexican tacos");
    }

    #[tokio::test]
    async fn test_search_without_providers_degrades() {
        let assistant = assistant(&[], source());
        let result = assistant.translate_search("soup").await.unwrap();
        assert_eq!(result.source, Source::Fallback);
        assert_eq!(result.body["searchTerm"], "soup");
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let assistant = assistant(&[], source());
        let err = assistant.translate_search("   ").await.unwrap_err();
        assert!(matches!(err, AssistError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_analysis_fallback_scenario() {
        let a = Scripted::new("a", Err(503));
        let assistant = assistant(&[&a], source());

        let result = assistant.analyze(42).await.unwrap();
        assert_eq!(result.source, Source::Fallback);

        let allergens = result.body["allergens"].as_array().unwrap();
        let names: Vec<&str> = allergens.iter().filter_map(|a| a["name"].as_str()).collect();
        assert_eq!(names, vec!["gluten", "dairy"]);
        assert!(allergens.iter().all(|a| a["severity"] == "medium"));
        assert_eq!(result.body["cookingDifficulty"]["level"], "advanced");

        assert_eq!(a.requests.lock().unwrap()[0].max_tokens, 1500);
    }

    #[tokio::test]
    async fn test_analysis_unconfigured_skips_recipe_fetch() {
        let source = source();
        let assistant = assistant(&[], Arc::clone(&source));

        let err = assistant.analyze(42).await.unwrap_err();
        assert!(matches!(err, AssistError::Unconfigured));
        assert_eq!(source.lookups.load(Ordering::SeqCst), 0);

        let err = assistant.modify(42, ModificationKind::Vegan).await.unwrap_err();
        assert!(matches!(err, AssistError::Unconfigured));
        assert_eq!(source.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analysis_unknown_recipe() {
        let a = Scripted::new("a", Ok("{}"));
        let assistant = assistant(&[&a], source());

        let err = assistant.analyze(7).await.unwrap_err();
        assert!(matches!(err, AssistError::Recipe(RecipeError::NotFound(7))));
        assert_eq!(a.calls(), 0);
    }

    #[tokio::test]
    async fn test_analysis_model_answer_is_conformed() {
        let a = Scripted::new(
            "a",
            Ok("Here is the analysis: {\"healthScore\": 64, \"allergens\": [], \"extra\": 1}"),
        );
        let assistant = assistant(&[&a], source());

        let result = assistant.analyze(42).await.unwrap();
        assert_eq!(result.source.as_str(), "model");
        assert_eq!(result.body["healthScore"], 64);
        assert!(result.body["allergens"].as_array().unwrap().is_empty());
        assert!(result.body.get("extra").is_none());
        // Missing keys come from the fallback.
        assert_eq!(result.body["cookingDifficulty"]["level"], "advanced");
        assert_eq!(result.body.len(), ANALYSIS_SCHEMA.len());
    }

    #[tokio::test]
    async fn test_modify_model_answer_keeps_requested_type() {
        let a = Scripted::new(
            "a",
            Ok("{\"title\": \"Vegan Slow Baked Pasta\", \"modificationType\": \"keto\", \"notes\": []}"),
        );
        let assistant = assistant(&[&a], source());

        let result = assistant.modify(42, ModificationKind::Vegan).await.unwrap();
        assert_eq!(result.body["title"], "Vegan Slow Baked Pasta");
        assert_eq!(result.body["modificationType"], "vegan");
        assert!(result.body["ingredientSubstitutions"].is_array());
        assert_eq!(result.body.len(), MODIFICATION_SCHEMA.len());
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic_across_runs() {
        let a = Scripted::new("a", Err(500));
        let assistant = assistant(&[&a], source());

        let first = assistant.modify(42, ModificationKind::GlutenFree).await.unwrap();
        let second = assistant.modify(42, ModificationKind::GlutenFree).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first.body).unwrap(),
            serde_json::to_string(&second.body).unwrap()
        );
    }
}
