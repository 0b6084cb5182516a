// ABOUTME: Recipe source adapter trait and helpers shared across all adapters
// ABOUTME: Adapters translate one external wire format into the canonical Recipe shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use crate::errors::FetchResult;
use crate::models::Recipe;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Spoonacular search/detail adapter (primary, credential-gated).
pub mod spoonacular;

/// TheMealDB adapter with cross-origin breaker (secondary, free).
pub mod mealdb;

/// Bundled sample recipes (terminal fallback, never fails).
pub mod sample;

/// One external recipe source translated into the canonical shape.
///
/// All three operations return tagged [`crate::errors::FetchError`]s instead
/// of swallowing failures; the aggregation engine owns the decision table of
/// which tags fall through to the next tier.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Adapter name, used in logs and error tags.
    fn name(&self) -> &'static str;

    /// Text search already filtered to vegetarian-suitable results.
    async fn search(&self, query: &str) -> FetchResult<Vec<Recipe>>;

    /// Single-recipe detail lookup.
    async fn get_by_id(&self, id: i64) -> FetchResult<Recipe>;

    /// Broad catalog fetch, deduplicated within the returned set.
    async fn get_all(&self) -> FetchResult<Vec<Recipe>>;
}

/// Remove records sharing an id within one result set, first occurrence wins.
#[must_use]
pub fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| seen.insert(recipe.id))
        .collect()
}

/// Strip HTML tags from source-provided rich text before it enters the
/// canonical model.
#[must_use]
pub fn strip_html(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new("<[^>]*>").expect("tag pattern is valid"));
    tag.replace_all(text, "").into_owned()
}

/// Case-insensitive substring match helper used by the client-side filters.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
