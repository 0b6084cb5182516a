// ABOUTME: Spoonacular API adapter - the credential-gated primary recipe source
// ABOUTME: Complex search with popularity padding, detail lookup, and paced topic fetches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use super::{contains_ignore_case, dedup_by_id, strip_html, RecipeSource};
use crate::config::LeafyConfig;
use crate::errors::{FetchError, FetchResult};
use crate::models::{Ingredient, InstructionGroup, InstructionStep, Recipe};
use crate::pacing::Pacer;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Adapter name used in logs and error tags.
pub const SOURCE: &str = "spoonacular";

/// Request timeout for the paid API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Below this many distinct search hits, a popularity-sorted supplementary
/// query pads the result set.
const SEARCH_PAD_THRESHOLD: usize = 20;

/// Cap applied when the post-search substring filter matches nothing.
const UNFILTERED_CAP: usize = 100;

/// Pause between sequential topic queries in the catalog fetch.
const TOPIC_PAUSE: Duration = Duration::from_millis(300);

/// Curated vegetarian topic queries; only the first [`TOPIC_LIMIT`] run per
/// catalog fetch to stay inside the free-tier rate limit.
const TOPIC_QUERIES: [&str; 12] = [
    "pasta", "salad", "rice", "quinoa", "tofu", "vegetable", "soup", "curry", "burger", "pizza",
    "lasagna", "risotto",
];
const TOPIC_LIMIT: usize = 5;

/// Spoonacular search envelope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SpoonacularRecipe>,
}

/// Spoonacular recipe payload, shared by search and detail endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpoonacularRecipe {
    id: i64,
    title: String,
    image: Option<String>,
    summary: Option<String>,
    ready_in_minutes: Option<u32>,
    servings: Option<u32>,
    health_score: Option<f64>,
    extended_ingredients: Option<Vec<SpoonacularIngredient>>,
    instructions: Option<String>,
    analyzed_instructions: Option<Vec<SpoonacularInstructionGroup>>,
    source_url: Option<String>,
    source_name: Option<String>,
    dish_types: Option<Vec<String>>,
    cuisines: Option<Vec<String>>,
    vegetarian: Option<bool>,
    vegan: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SpoonacularIngredient {
    name: Option<String>,
    amount: Option<f64>,
    unit: Option<String>,
    original: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpoonacularInstructionGroup {
    #[serde(default)]
    name: String,
    #[serde(default)]
    steps: Vec<SpoonacularStep>,
}

#[derive(Debug, Deserialize)]
struct SpoonacularStep {
    number: u32,
    step: String,
}

impl SpoonacularRecipe {
    /// Convert the wire payload into the canonical recipe shape, stripping
    /// HTML from rich-text fields.
    fn into_recipe(self) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            image: self.image,
            summary: self.summary.map(|s| strip_html(&s)),
            ready_in_minutes: self.ready_in_minutes,
            servings: self.servings,
            health_score: self.health_score,
            ingredients: self
                .extended_ingredients
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(index, ing)| Ingredient {
                    id: index as i64 + 1,
                    name: ing.name.unwrap_or_default(),
                    amount: ing.amount.unwrap_or(0.0),
                    unit: ing.unit.unwrap_or_default(),
                    original: ing.original.unwrap_or_default(),
                })
                .collect(),
            instructions: self.instructions.map(|s| strip_html(&s)),
            analyzed_instructions: self
                .analyzed_instructions
                .unwrap_or_default()
                .into_iter()
                .map(|group| InstructionGroup {
                    name: group.name,
                    steps: group
                        .steps
                        .into_iter()
                        .map(|step| InstructionStep {
                            number: step.number,
                            step: step.step,
                        })
                        .collect(),
                })
                .collect(),
            source_url: self.source_url,
            source_name: self.source_name,
            dish_types: self.dish_types.unwrap_or_default(),
            cuisines: self.cuisines.unwrap_or_default(),
            vegetarian: self.vegetarian,
            vegan: self.vegan,
        }
    }
}

/// Deduplicate the merged main-plus-padding result set, then narrow it to
/// records whose title or summary contains the query (case-insensitive).
/// When nothing matches the narrowing, the first [`UNFILTERED_CAP`] of the
/// deduplicated set are returned instead.
#[must_use]
pub fn select_search_results(merged: Vec<Recipe>, query: &str) -> Vec<Recipe> {
    let unique = dedup_by_id(merged);
    let filtered: Vec<Recipe> = unique
        .iter()
        .filter(|recipe| {
            contains_ignore_case(&recipe.title, query)
                || recipe
                    .summary
                    .as_deref()
                    .is_some_and(|summary| contains_ignore_case(summary, query))
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        let mut capped = unique;
        capped.truncate(UNFILTERED_CAP);
        capped
    } else {
        filtered
    }
}

/// Credential-gated client for the Spoonacular recipe API.
///
/// With no configured key every operation returns
/// [`FetchError::ConfigAbsent`] without attempting network I/O.
pub struct SpoonacularClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
    pacer: Arc<dyn Pacer>,
}

impl SpoonacularClient {
    /// Build the client from resolved configuration.
    #[must_use]
    pub fn new(config: &LeafyConfig, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            api_key: config.spoonacular_api_key.clone(),
            base_url: config.spoonacular_base_url.trim_end_matches('/').to_owned(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            pacer,
        }
    }

    fn api_key(&self) -> FetchResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(FetchError::ConfigAbsent { adapter: SOURCE })
    }

    /// Issue one GET and map transport/status failures into the shared tags.
    async fn api_request<T>(&self, path: &str, params: &[(&str, &str)]) -> FetchResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let key = self.api_key()?;
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", key)])
            .query(params)
            .send()
            .await
            .map_err(|err| FetchError::from_transport(SOURCE, &err))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(FetchError::CredentialInvalid { adapter: SOURCE })
            }
            StatusCode::NOT_FOUND => Err(FetchError::NotFound { adapter: SOURCE }),
            status if !status.is_success() => Err(FetchError::Network {
                adapter: SOURCE,
                message: format!("request to {path} failed with status {status}"),
                cross_origin: false,
            }),
            _ => response
                .json::<T>()
                .await
                .map_err(|err| FetchError::from_transport(SOURCE, &err)),
        }
    }

    async fn complex_search(&self, params: &[(&str, &str)]) -> FetchResult<Vec<Recipe>> {
        let response: SearchResponse = self.api_request("complexSearch", params).await?;
        Ok(response
            .results
            .into_iter()
            .map(SpoonacularRecipe::into_recipe)
            .collect())
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    fn name(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<Recipe>> {
        let query = query.trim();
        let mut results = self
            .complex_search(&[
                ("query", query),
                ("diet", "vegetarian"),
                ("number", "100"),
                ("addRecipeInformation", "true"),
            ])
            .await?;

        // Thin result sets get padded with one popularity-sorted query; its
        // failure must not sink the primary hits.
        if results.len() < SEARCH_PAD_THRESHOLD {
            match self
                .complex_search(&[
                    ("diet", "vegetarian"),
                    ("number", "50"),
                    ("addRecipeInformation", "true"),
                    ("sort", "popularity"),
                ])
                .await
            {
                Ok(popular) => results.extend(popular),
                Err(err) => debug!(error = %err, "popularity padding query failed"),
            }
        }

        Ok(select_search_results(results, query))
    }

    async fn get_by_id(&self, id: i64) -> FetchResult<Recipe> {
        let payload: SpoonacularRecipe = self
            .api_request(
                &format!("{id}/information"),
                &[("includeNutrition", "false")],
            )
            .await?;
        Ok(payload.into_recipe())
    }

    async fn get_all(&self) -> FetchResult<Vec<Recipe>> {
        let mut recipes = self
            .complex_search(&[
                ("diet", "vegetarian"),
                ("number", "100"),
                ("addRecipeInformation", "true"),
                ("sort", "popularity"),
            ])
            .await?;

        // Topic queries only make sense once the broad query proved the API
        // reachable; they run sequentially with a fixed pause as client-side
        // rate limiting.
        if !recipes.is_empty() {
            for topic in &TOPIC_QUERIES[..TOPIC_LIMIT] {
                match self
                    .complex_search(&[
                        ("query", topic),
                        ("diet", "vegetarian"),
                        ("number", "50"),
                        ("addRecipeInformation", "true"),
                    ])
                    .await
                {
                    Ok(batch) => recipes.extend(batch),
                    Err(err) => {
                        warn!(topic, error = %err, "topic query failed, continuing");
                    }
                }
                self.pacer.pause(TOPIC_PAUSE).await;
            }
        }

        Ok(dedup_by_id(recipes))
    }
}
