// ABOUTME: Aggregation engine orchestrating the three-tier source fallback chain
// ABOUTME: Holds the single decision table for which adapter failures fall through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use crate::config::LeafyConfig;
use crate::errors::{AggregateError, FetchError};
use crate::models::{Instructions, Recipe};
use crate::pacing::{Pacer, SleepPacer};
use crate::providers::mealdb::MealDbClient;
use crate::providers::sample::{sample_recipe_by_id, sample_recipes};
use crate::providers::spoonacular::SpoonacularClient;
use crate::providers::{contains_ignore_case, RecipeSource};
use crate::storage::UserRecipeStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates recipe retrieval across the primary source, the community
/// source, and the bundled fallback set, merging locally stored user recipes
/// into lookup-by-id.
///
/// Per-source failures never cross tier boundaries: every tagged
/// [`FetchError`] falls through to the next tier, with `CredentialInvalid`
/// additionally remembered so a totally failed lookup surfaces the distinct
/// credential diagnostic instead of a generic miss.
pub struct RecipeAggregator {
    primary: Box<dyn RecipeSource>,
    secondary: Box<dyn RecipeSource>,
    store: Arc<UserRecipeStore>,
}

impl RecipeAggregator {
    /// Build the production chain from resolved configuration.
    #[must_use]
    pub fn new(config: &LeafyConfig, store: Arc<UserRecipeStore>) -> Self {
        let pacer: Arc<dyn Pacer> = Arc::new(SleepPacer);
        Self {
            primary: Box::new(SpoonacularClient::new(config, Arc::clone(&pacer))),
            secondary: Box::new(MealDbClient::new(config, pacer)),
            store,
        }
    }

    /// Build a chain over arbitrary sources; the seam tests use to stub
    /// adapters.
    #[must_use]
    pub fn with_sources(
        primary: Box<dyn RecipeSource>,
        secondary: Box<dyn RecipeSource>,
        store: Arc<UserRecipeStore>,
    ) -> Self {
        Self {
            primary,
            secondary,
            store,
        }
    }

    /// Search the chain in priority order, returning the results and their
    /// count. A blank query yields an empty result without network activity.
    pub async fn search(&self, query: &str) -> (Vec<Recipe>, usize) {
        let query = query.trim();
        if query.is_empty() {
            return (Vec::new(), 0);
        }

        match self.primary.search(query).await {
            Ok(recipes) if !recipes.is_empty() => {
                info!(count = recipes.len(), source = self.primary.name(), "search satisfied");
                let count = recipes.len();
                return (recipes, count);
            }
            Ok(_) => debug!(source = self.primary.name(), "search yielded nothing"),
            Err(err) => debug!(source = self.primary.name(), error = %err, "search fell through"),
        }

        match self.secondary.search(query).await {
            Ok(recipes) if !recipes.is_empty() => {
                info!(count = recipes.len(), source = self.secondary.name(), "search satisfied");
                let count = recipes.len();
                return (recipes, count);
            }
            Ok(_) => debug!(source = self.secondary.name(), "search yielded nothing"),
            Err(err) => debug!(source = self.secondary.name(), error = %err, "search fell through"),
        }

        let matches: Vec<Recipe> = sample_recipes()
            .iter()
            .filter(|recipe| contains_ignore_case(&recipe.title, query))
            .cloned()
            .collect();
        let count = matches.len();
        (matches, count)
    }

    /// Resolve one recipe by id.
    ///
    /// Locally stored user recipes shadow every remote source: a store hit
    /// short-circuits before any network request. Otherwise both remote
    /// adapters run concurrently with an all-settle join, and the first
    /// fulfilled value in adapter-priority order wins regardless of
    /// wall-clock settle order.
    ///
    /// # Errors
    ///
    /// [`AggregateError::NotFound`] when no tier produced the record, or
    /// [`AggregateError::CredentialInvalid`] when additionally the primary
    /// source rejected its credential.
    pub async fn get_by_id(&self, id: i64) -> Result<Recipe, AggregateError> {
        if let Some(user_recipe) = self.store.get(id) {
            debug!(id, "lookup satisfied from local store");
            return Ok(user_recipe.recipe);
        }

        // Both fire regardless of whether one is inactive; a failure on one
        // side must not discard the other's success.
        let (primary, secondary) =
            tokio::join!(self.primary.get_by_id(id), self.secondary.get_by_id(id));

        let credential_invalid = matches!(primary, Err(FetchError::CredentialInvalid { .. }));

        match primary {
            Ok(recipe) => return Ok(recipe),
            Err(err) => debug!(id, source = self.primary.name(), error = %err, "lookup fell through"),
        }
        match secondary {
            Ok(recipe) => return Ok(recipe),
            Err(err) => debug!(id, source = self.secondary.name(), error = %err, "lookup fell through"),
        }

        sample_recipe_by_id(id).ok_or(if credential_invalid {
            AggregateError::CredentialInvalid
        } else {
            AggregateError::NotFound
        })
    }

    /// Fetch the full catalog from the highest tier that yields anything,
    /// falling back to the entire bundled sample set.
    pub async fn get_all(&self) -> Vec<Recipe> {
        match self.primary.get_all().await {
            Ok(recipes) if !recipes.is_empty() => {
                info!(count = recipes.len(), source = self.primary.name(), "catalog satisfied");
                return recipes;
            }
            Ok(_) => debug!(source = self.primary.name(), "catalog yielded nothing"),
            Err(err) => debug!(source = self.primary.name(), error = %err, "catalog fell through"),
        }

        match self.secondary.get_all().await {
            Ok(recipes) if !recipes.is_empty() => {
                info!(count = recipes.len(), source = self.secondary.name(), "catalog satisfied");
                return recipes;
            }
            Ok(_) => debug!(source = self.secondary.name(), "catalog yielded nothing"),
            Err(err) => debug!(source = self.secondary.name(), error = %err, "catalog fell through"),
        }

        sample_recipes().to_vec()
    }

    /// Shared access to the local user-recipe store.
    #[must_use]
    pub fn store(&self) -> &Arc<UserRecipeStore> {
        &self.store
    }
}

/// Resolve a recipe's instruction union into the canonical tagged shape,
/// preferring structured steps over flat text.
///
/// The single place the string-vs-steps priority lives; collaborators render
/// whatever this returns.
#[must_use]
pub fn normalize_instructions(recipe: &Recipe) -> Option<Instructions> {
    let steps: Vec<_> = recipe
        .analyzed_instructions
        .iter()
        .flat_map(|group| group.steps.iter().cloned())
        .collect();
    if !steps.is_empty() {
        return Some(Instructions::Structured(steps));
    }

    recipe
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Instructions::Flat(text.to_owned()))
}
