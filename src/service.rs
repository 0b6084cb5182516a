// ABOUTME: Reactive facade over the aggregation engine for presentation layers to bind to
// ABOUTME: Tracks current results, catalog snapshot, loading flag, error message, and count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use crate::aggregator::RecipeAggregator;
use crate::config::LeafyConfig;
use crate::errors::AggregateError;
use crate::models::{Recipe, RecipeDraft, UserRecipe};
use crate::storage::UserRecipeStore;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Generic message when a lookup misses at every tier.
const NOT_FOUND_MESSAGE: &str = "Recipe not found";

/// Presentation-facing state and operations for the recipe core.
///
/// Mirrors what a view layer binds to: the current result set, the full
/// catalog snapshot, the recipe being viewed, user-authored recipes, a
/// loading flag, an error message, and the total result count. All reads are
/// plain accessors; the async operations mutate state as they settle.
pub struct RecipeService {
    aggregator: RecipeAggregator,
    results: RwLock<Vec<Recipe>>,
    /// Full fetched catalog; [`Self::filter`] always operates on this
    /// snapshot, never on an already narrowed result set.
    catalog: RwLock<Vec<Recipe>>,
    current: RwLock<Option<Recipe>>,
    error: RwLock<Option<String>>,
    loading: AtomicBool,
    total_results: AtomicUsize,
}

impl RecipeService {
    /// Build the production service from resolved configuration.
    #[must_use]
    pub fn new(config: &LeafyConfig) -> Self {
        let store = Arc::new(UserRecipeStore::open(config.store_path()));
        Self::with_aggregator(RecipeAggregator::new(config, store))
    }

    /// Build the service over an existing aggregator; the seam tests use.
    #[must_use]
    pub fn with_aggregator(aggregator: RecipeAggregator) -> Self {
        Self {
            aggregator,
            results: RwLock::new(Vec::new()),
            catalog: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            error: RwLock::new(None),
            loading: AtomicBool::new(false),
            total_results: AtomicUsize::new(0),
        }
    }

    /// Run a chain search and replace the current result set.
    /// A blank query clears the results without network activity.
    pub async fn search(&self, query: &str) {
        if query.trim().is_empty() {
            self.set_results(Vec::new());
            return;
        }

        self.begin_operation();
        let (recipes, _count) = self.aggregator.search(query).await;
        self.set_results(recipes);
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Fetch the full catalog, updating both the snapshot and the visible
    /// results.
    pub async fn get_all(&self) {
        self.begin_operation();
        let recipes = self.aggregator.get_all().await;
        if let Ok(mut catalog) = self.catalog.write() {
            *catalog = recipes.clone();
        }
        self.set_results(recipes);
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Resolve one recipe into the current-recipe slot; a total miss sets the
    /// error message instead (distinct diagnostic for a rejected credential).
    pub async fn get_by_id(&self, id: i64) {
        self.begin_operation();
        match self.aggregator.get_by_id(id).await {
            Ok(recipe) => {
                if let Ok(mut current) = self.current.write() {
                    *current = Some(recipe);
                }
            }
            Err(err) => {
                if let Ok(mut current) = self.current.write() {
                    *current = None;
                }
                let message = match err {
                    AggregateError::NotFound => NOT_FOUND_MESSAGE.to_owned(),
                    AggregateError::CredentialInvalid => err.to_string(),
                };
                if let Ok(mut error) = self.error.write() {
                    *error = Some(message);
                }
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Narrow the visible results by a case-insensitive title match over the
    /// catalog snapshot. Pure and synchronous; a blank query restores the
    /// full snapshot, so repeated calls are idempotent with respect to it.
    pub fn filter(&self, query: &str) {
        let catalog = self
            .catalog
            .read()
            .map(|catalog| catalog.clone())
            .unwrap_or_default();

        let query = query.trim();
        if query.is_empty() {
            self.set_results(catalog);
            return;
        }

        let filtered: Vec<Recipe> = catalog
            .into_iter()
            .filter(|recipe| crate::providers::contains_ignore_case(&recipe.title, query))
            .collect();
        self.set_results(filtered);
    }

    /// Author a new user recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the store fails.
    pub fn create_recipe(&self, draft: RecipeDraft) -> Result<UserRecipe> {
        self.aggregator.store().create(draft)
    }

    /// Edit an existing user recipe; absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the store fails.
    pub fn update_recipe(&self, id: i64, draft: RecipeDraft) -> Result<()> {
        self.aggregator.store().update(id, draft)
    }

    /// Remove a user recipe; absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the store fails.
    pub fn delete_recipe(&self, id: i64) -> Result<()> {
        self.aggregator.store().delete(id)
    }

    /// Ordered snapshot of every user-authored recipe.
    #[must_use]
    pub fn user_recipes(&self) -> Vec<UserRecipe> {
        self.aggregator.store().list()
    }

    /// The current visible result set.
    #[must_use]
    pub fn results(&self) -> Vec<Recipe> {
        self.results
            .read()
            .map(|results| results.clone())
            .unwrap_or_default()
    }

    /// The full catalog snapshot from the last `get_all`.
    #[must_use]
    pub fn catalog(&self) -> Vec<Recipe> {
        self.catalog
            .read()
            .map(|catalog| catalog.clone())
            .unwrap_or_default()
    }

    /// The recipe resolved by the last `get_by_id`.
    #[must_use]
    pub fn current_recipe(&self) -> Option<Recipe> {
        self.current.read().ok().and_then(|current| current.clone())
    }

    /// Whether an async operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The last error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.read().ok().and_then(|error| error.clone())
    }

    /// Count of the current visible results.
    #[must_use]
    pub fn total_results(&self) -> usize {
        self.total_results.load(Ordering::SeqCst)
    }

    /// Clear the visible results and count.
    pub fn clear_search(&self) {
        self.set_results(Vec::new());
    }

    /// Clear the error message.
    pub fn clear_error(&self) {
        if let Ok(mut error) = self.error.write() {
            *error = None;
        }
    }

    fn begin_operation(&self) {
        self.loading.store(true, Ordering::SeqCst);
        self.clear_error();
    }

    fn set_results(&self, recipes: Vec<Recipe>) {
        self.total_results.store(recipes.len(), Ordering::SeqCst);
        if let Ok(mut results) = self.results.write() {
            *results = recipes;
        }
    }
}
