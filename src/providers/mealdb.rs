// ABOUTME: TheMealDB adapter - free community recipe source with vegetarian classification
// ABOUTME: One-way cross-origin breaker short-circuits every call after the first CORS failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use super::{dedup_by_id, RecipeSource};
use crate::config::LeafyConfig;
use crate::errors::{FetchError, FetchResult};
use crate::models::{Ingredient, Recipe};
use crate::pacing::Pacer;
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Adapter name used in logs and error tags.
pub const SOURCE: &str = "themealdb";

/// Request timeout for the community API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between sequential category fetches in the catalog crawl.
const CATEGORY_PAUSE: Duration = Duration::from_millis(200);

/// Categories crawled by the catalog fetch.
const CATALOG_CATEGORIES: [&str; 4] = ["Vegetarian", "Vegan", "Side", "Dessert"];

/// Member ids resolved per category; keeps the fan-out bounded.
const CATEGORY_MEMBER_LIMIT: usize = 20;

/// Ingredient/measure slot pairs on a meal record.
const INGREDIENT_SLOTS: usize = 20;

/// Title/instruction keywords that exclude a record outright.
const NON_VEGETARIAN_KEYWORDS: [&str; 9] = [
    "chicken", "beef", "pork", "fish", "meat", "lamb", "turkey", "bacon", "sausage",
];

/// Categories accepted as vegetarian without further evidence.
const VEGETARIAN_CATEGORIES: [&str; 4] = ["Vegetarian", "Vegan", "Side", "Dessert"];

/// Title keywords accepted as vegetarian evidence outside those categories.
const VEGETARIAN_KEYWORDS: [&str; 9] = [
    "vegetable", "salad", "pasta", "rice", "quinoa", "tofu", "bean", "lentil", "chickpea",
];

/// One-way latch disabling the adapter after a detected cross-origin failure.
///
/// Written once (false to true, never reset) and read before every call.
/// Atomic rather than a plain flag since this crate targets a multi-threaded
/// runtime.
#[derive(Debug, Default)]
pub struct CorsBreaker {
    tripped: AtomicBool,
}

impl CorsBreaker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the latch has fired.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Fire the latch. Logs only on the first transition.
    pub fn trip(&self) {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            warn!(
                source = SOURCE,
                "cross-origin failure detected, disabling source for this process"
            );
        }
    }
}

/// Wire envelope shared by every TheMealDB endpoint.
#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    meals: Option<Vec<MealRecord>>,
}

/// Raw meal record. Ingredient/measure pairs live in twenty numbered slots,
/// captured through the flattened map.
#[derive(Debug, Deserialize)]
struct MealRecord {
    #[serde(rename = "idMeal")]
    id_meal: String,
    #[serde(rename = "strMeal")]
    str_meal: Option<String>,
    #[serde(rename = "strCategory")]
    str_category: Option<String>,
    #[serde(rename = "strInstructions")]
    str_instructions: Option<String>,
    #[serde(rename = "strMealThumb")]
    str_meal_thumb: Option<String>,
    #[serde(rename = "strSource")]
    str_source: Option<String>,
    #[serde(flatten)]
    slots: HashMap<String, Option<String>>,
}

impl MealRecord {
    fn id(&self) -> i64 {
        self.id_meal.parse().unwrap_or(0)
    }

    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{prefix}{index}"))
            .and_then(|value| value.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Vegetarian classification heuristic: exclusion keywords beat every
    /// other signal; otherwise category or title keywords admit the record.
    fn is_vegetarian(&self) -> bool {
        let name = self.str_meal.as_deref().unwrap_or_default().to_lowercase();
        let instructions = self
            .str_instructions
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let has_excluded = NON_VEGETARIAN_KEYWORDS
            .iter()
            .any(|keyword| name.contains(keyword) || instructions.contains(keyword));
        if has_excluded {
            return false;
        }

        let category = self
            .str_category
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let in_vegetarian_category = VEGETARIAN_CATEGORIES
            .iter()
            .any(|cat| category == cat.to_lowercase());
        let has_vegetarian_keyword = VEGETARIAN_KEYWORDS
            .iter()
            .any(|keyword| name.contains(keyword));

        in_vegetarian_category || has_vegetarian_keyword
    }

    /// Convert the slot-based wire record into the canonical recipe shape.
    fn into_recipe(self) -> Recipe {
        let mut ingredients = Vec::new();
        for index in 1..=INGREDIENT_SLOTS {
            let Some(name) = self.slot("strIngredient", index) else {
                continue;
            };
            let measure = self.slot("strMeasure", index).unwrap_or_default();
            ingredients.push(Ingredient {
                id: index as i64,
                name: name.to_owned(),
                amount: 1.0,
                unit: measure.to_owned(),
                original: format!("{measure} {name}").trim().to_owned(),
            });
        }

        let instructions = self.str_instructions.as_deref().map(|raw| {
            raw.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .enumerate()
                .map(|(index, line)| format!("{}. {line}", index + 1))
                .collect::<Vec<_>>()
                .join("\n\n")
        });

        let summary = self.str_instructions.as_deref().map(|raw| {
            let preview: String = raw.chars().take(200).collect();
            format!("{preview}...")
        });

        Recipe {
            id: self.id(),
            title: self
                .str_meal
                .clone()
                .unwrap_or_else(|| "Untitled recipe".to_owned()),
            image: self.str_meal_thumb.clone().filter(|url| !url.is_empty()),
            summary,
            ready_in_minutes: Some(30),
            servings: Some(4),
            health_score: Some(75.0),
            ingredients,
            instructions,
            analyzed_instructions: Vec::new(),
            source_url: self.str_source.clone().filter(|url| !url.is_empty()),
            source_name: Some("TheMealDB".to_owned()),
            dish_types: Vec::new(),
            cuisines: Vec::new(),
            vegetarian: Some(true),
            vegan: Some(false),
        }
    }
}

/// Free community recipe API client with cross-origin short-circuiting.
pub struct MealDbClient {
    base_url: String,
    client: Client,
    breaker: Arc<CorsBreaker>,
    pacer: Arc<dyn Pacer>,
}

impl MealDbClient {
    /// Build the client from resolved configuration.
    #[must_use]
    pub fn new(config: &LeafyConfig, pacer: Arc<dyn Pacer>) -> Self {
        Self::with_breaker(config, pacer, Arc::new(CorsBreaker::new()))
    }

    /// Build the client sharing an externally owned breaker.
    #[must_use]
    pub fn with_breaker(
        config: &LeafyConfig,
        pacer: Arc<dyn Pacer>,
        breaker: Arc<CorsBreaker>,
    ) -> Self {
        Self {
            base_url: config.mealdb_base_url.trim_end_matches('/').to_owned(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            breaker,
            pacer,
        }
    }

    /// The breaker latch guarding this client.
    #[must_use]
    pub fn breaker(&self) -> &Arc<CorsBreaker> {
        &self.breaker
    }

    fn breaker_open() -> FetchError {
        FetchError::Network {
            adapter: SOURCE,
            message: "cross-origin breaker open, skipping request".to_owned(),
            cross_origin: true,
        }
    }

    /// Classify a reqwest failure, tripping the breaker when it qualifies as
    /// cross-origin.
    fn transport_failure(&self, err: &reqwest::Error) -> FetchError {
        let fetch_err = FetchError::from_transport(SOURCE, err);
        if fetch_err.is_cross_origin() {
            self.breaker.trip();
        }
        fetch_err
    }

    /// Issue one GET; cross-origin-qualifying transport failures trip the
    /// breaker before the error is returned, whether they surface while
    /// sending or while decoding the body.
    async fn api_request(&self, path: &str, params: &[(&str, &str)]) -> FetchResult<MealsEnvelope> {
        if self.breaker.is_tripped() {
            return Err(Self::breaker_open());
        }

        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|err| self.transport_failure(&err))?;

        if !response.status().is_success() {
            return Err(FetchError::Network {
                adapter: SOURCE,
                message: format!("request to {path} failed with status {}", response.status()),
                cross_origin: false,
            });
        }

        response
            .json::<MealsEnvelope>()
            .await
            .map_err(|err| self.transport_failure(&err))
    }

    /// Resolve up to twenty members of one category via individual lookups.
    async fn category_members(&self, category: &str) -> FetchResult<Vec<Recipe>> {
        let envelope = self.api_request("filter.php", &[("c", category)]).await?;
        let members: Vec<i64> = envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .take(CATEGORY_MEMBER_LIMIT)
            .map(|record| record.id())
            .collect();

        // Bounded fan-out: at most twenty lookups, individual misses and
        // classification failures dropped.
        let lookups = join_all(members.into_iter().map(|id| self.get_by_id(id))).await;
        Ok(lookups.into_iter().filter_map(Result::ok).collect())
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<Recipe>> {
        let envelope = self.api_request("search.php", &[("s", query)]).await?;
        Ok(envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .filter(MealRecord::is_vegetarian)
            .map(MealRecord::into_recipe)
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> FetchResult<Recipe> {
        let envelope = self
            .api_request("lookup.php", &[("i", &id.to_string())])
            .await?;
        let record = envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(FetchError::NotFound { adapter: SOURCE })?;

        if !record.is_vegetarian() {
            return Err(FetchError::NotFound { adapter: SOURCE });
        }
        Ok(record.into_recipe())
    }

    async fn get_all(&self) -> FetchResult<Vec<Recipe>> {
        let mut recipes = Vec::new();

        for category in CATALOG_CATEGORIES {
            // The breaker can trip mid-crawl; stop issuing requests then.
            if self.breaker.is_tripped() {
                break;
            }
            match self.category_members(category).await {
                Ok(batch) => recipes.extend(batch),
                Err(err) => {
                    warn!(category, error = %err, "category fetch failed, continuing");
                }
            }
            self.pacer.pause(CATEGORY_PAUSE).await;
        }

        Ok(dedup_by_id(recipes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::NoopPacer;

    fn record(json: serde_json::Value) -> MealRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn exclusion_keywords_beat_category() {
        let meal = record(serde_json::json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Vegetarian",
            "strInstructions": "Preheat oven."
        }));
        assert!(!meal.is_vegetarian());
    }

    #[test]
    fn category_or_title_keyword_admits_record() {
        let by_category = record(serde_json::json!({
            "idMeal": "52844",
            "strMeal": "Shakshuka",
            "strCategory": "Vegetarian",
            "strInstructions": "Simmer tomatoes."
        }));
        assert!(by_category.is_vegetarian());

        let by_keyword = record(serde_json::json!({
            "idMeal": "52960",
            "strMeal": "Tofu Stir Fry",
            "strCategory": "Miscellaneous",
            "strInstructions": "Fry the cubes."
        }));
        assert!(by_keyword.is_vegetarian());

        let neither = record(serde_json::json!({
            "idMeal": "52961",
            "strMeal": "Mystery Stew",
            "strCategory": "Miscellaneous",
            "strInstructions": "Simmer."
        }));
        assert!(!neither.is_vegetarian());
    }

    #[test]
    fn slots_become_ingredients_and_lines_become_numbered_steps() {
        let meal = record(serde_json::json!({
            "idMeal": "52870",
            "strMeal": "Vegetable Gratin",
            "strCategory": "Vegetarian",
            "strInstructions": "Slice the vegetables.\r\n\r\nBake until golden.",
            "strMealThumb": "https://www.themealdb.com/images/gratin.jpg",
            "strIngredient1": "Potato",
            "strMeasure1": "2 large",
            "strIngredient2": "Cream",
            "strMeasure2": "200ml",
            "strIngredient3": "",
            "strMeasure3": ""
        }));
        let recipe = meal.into_recipe();

        assert_eq!(recipe.id, 52_870);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].original, "2 large Potato");
        assert_eq!(
            recipe.instructions.as_deref(),
            Some("1. Slice the vegetables.\n\n2. Bake until golden.")
        );
        assert_eq!(recipe.source_name.as_deref(), Some("TheMealDB"));
        assert_eq!(recipe.vegetarian, Some(true));
    }

    #[tokio::test]
    async fn tripped_breaker_short_circuits_without_io() {
        let client = MealDbClient::new(&LeafyConfig::default(), Arc::new(NoopPacer));
        client.breaker().trip();

        // No network stack behind these calls; they must return immediately.
        let err = client.search("soup").await.unwrap_err();
        assert!(err.is_cross_origin());
        let err = client.get_by_id(52_772).await.unwrap_err();
        assert!(err.is_cross_origin());
        assert!(client.get_all().await.unwrap().is_empty());
    }

    #[test]
    fn breaker_latch_is_one_way() {
        let breaker = CorsBreaker::new();
        assert!(!breaker.is_tripped());
        breaker.trip();
        breaker.trip();
        assert!(breaker.is_tripped());
    }
}
