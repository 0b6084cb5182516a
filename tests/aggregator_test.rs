// ABOUTME: Test suite for the three-tier aggregation engine
// ABOUTME: Covers store shadowing, fallback ordering, all-settle lookup, and credential surfacing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use async_trait::async_trait;
use leafy_core::errors::{AggregateError, FetchError, FetchResult};
use leafy_core::models::{Recipe, RecipeDraft};
use leafy_core::providers::sample::sample_recipes;
use leafy_core::providers::RecipeSource;
use leafy_core::storage::UserRecipeStore;
use leafy_core::RecipeAggregator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// What a stubbed operation should produce.
#[derive(Clone)]
enum StubOutcome {
    Recipes(Vec<Recipe>),
    ConfigAbsent,
    CredentialInvalid,
    CorsFailure,
    NotFound,
}

impl StubOutcome {
    fn to_result(&self, adapter: &'static str) -> FetchResult<Vec<Recipe>> {
        match self {
            Self::Recipes(recipes) => Ok(recipes.clone()),
            Self::ConfigAbsent => Err(FetchError::ConfigAbsent { adapter }),
            Self::CredentialInvalid => Err(FetchError::CredentialInvalid { adapter }),
            Self::CorsFailure => Err(FetchError::Network {
                adapter,
                message: "simulated cross-origin failure".into(),
                cross_origin: true,
            }),
            Self::NotFound => Err(FetchError::NotFound { adapter }),
        }
    }
}

/// Configurable adapter stub counting every invocation.
struct StubSource {
    name: &'static str,
    outcome: StubOutcome,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(name: &'static str, outcome: StubOutcome) -> Self {
        Self {
            name,
            outcome,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecipeSource for StubSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &str) -> FetchResult<Vec<Recipe>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.to_result(self.name)
    }

    async fn get_by_id(&self, id: i64) -> FetchResult<Recipe> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .to_result(self.name)?
            .into_iter()
            .find(|recipe| recipe.id == id)
            .ok_or(FetchError::NotFound { adapter: self.name })
    }

    async fn get_all(&self) -> FetchResult<Vec<Recipe>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.to_result(self.name)
    }
}

/// Adapter stub that fails the test if any operation is ever invoked.
struct PanickingSource(&'static str);

#[async_trait]
impl RecipeSource for PanickingSource {
    fn name(&self) -> &'static str {
        self.0
    }

    async fn search(&self, _query: &str) -> FetchResult<Vec<Recipe>> {
        panic!("{} must not be queried", self.0);
    }

    async fn get_by_id(&self, _id: i64) -> FetchResult<Recipe> {
        panic!("{} must not be queried", self.0);
    }

    async fn get_all(&self) -> FetchResult<Vec<Recipe>> {
        panic!("{} must not be queried", self.0);
    }
}

fn temp_store() -> (tempfile::TempDir, Arc<UserRecipeStore>) {
    let dir = tempdir().unwrap();
    let store = Arc::new(UserRecipeStore::open(dir.path().join("user_recipes.json")));
    (dir, store)
}

fn aggregator(primary: StubOutcome, secondary: StubOutcome) -> (tempfile::TempDir, RecipeAggregator) {
    let (dir, store) = temp_store();
    let engine = RecipeAggregator::with_sources(
        Box::new(StubSource::new("primary", primary)),
        Box::new(StubSource::new("secondary", secondary)),
        store,
    );
    (dir, engine)
}

#[tokio::test]
async fn stored_user_recipe_shadows_remote_sources() {
    let (_dir, store) = temp_store();
    let created = store
        .create(RecipeDraft {
            title: "Nonna's Minestrone".to_owned(),
            ..RecipeDraft::default()
        })
        .unwrap();

    let engine = RecipeAggregator::with_sources(
        Box::new(PanickingSource("primary")),
        Box::new(PanickingSource("secondary")),
        store,
    );

    let found = engine.get_by_id(created.id()).await.unwrap();
    assert_eq!(found.id, created.id());
    assert_eq!(found.title, "Nonna's Minestrone");
}

#[tokio::test]
async fn blank_query_short_circuits_without_touching_sources() {
    let (_dir, store) = temp_store();
    let engine = RecipeAggregator::with_sources(
        Box::new(PanickingSource("primary")),
        Box::new(PanickingSource("secondary")),
        store,
    );

    let (recipes, total) = engine.search("   ").await;
    assert!(recipes.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn primary_results_win_over_secondary() {
    let (_dir, engine) = aggregator(
        StubOutcome::Recipes(vec![Recipe::new(10, "Pasta al pesto")]),
        StubOutcome::Recipes(vec![Recipe::new(20, "Pasta e fagioli")]),
    );

    let (recipes, total) = engine.search("pasta").await;
    assert_eq!(total, 1);
    assert_eq!(recipes[0].id, 10);
}

#[tokio::test]
async fn search_falls_back_to_sample_titles_when_both_sources_fail() {
    let (_dir, engine) = aggregator(StubOutcome::ConfigAbsent, StubOutcome::CorsFailure);

    let (recipes, total) = engine.search("risotto").await;
    assert_eq!(total, recipes.len());
    assert!(!recipes.is_empty());
    assert!(recipes
        .iter()
        .all(|recipe| recipe.title.to_lowercase().contains("risotto")));

    let (none, zero) = engine.search("octopus").await;
    assert!(none.is_empty());
    assert_eq!(zero, 0);
}

#[tokio::test]
async fn search_results_never_contain_duplicate_ids() {
    let (_dir, engine) = aggregator(
        StubOutcome::Recipes(vec![
            Recipe::new(1, "Pasta primavera"),
            Recipe::new(2, "Pasta arrabbiata"),
        ]),
        StubOutcome::NotFound,
    );

    let (recipes, _) = engine.search("pasta").await;
    let mut ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), recipes.len());
}

#[tokio::test]
async fn catalog_falls_back_to_exact_sample_set() {
    // Credential absent on the primary, simulated CORS on the secondary.
    let (_dir, engine) = aggregator(StubOutcome::ConfigAbsent, StubOutcome::CorsFailure);

    let recipes = engine.get_all().await;
    assert_eq!(recipes, sample_recipes().to_vec());
}

#[tokio::test]
async fn catalog_prefers_secondary_over_samples() {
    let community = vec![Recipe::new(301, "Shakshuka"), Recipe::new(302, "Falafel")];
    let (_dir, engine) = aggregator(
        StubOutcome::ConfigAbsent,
        StubOutcome::Recipes(community.clone()),
    );

    assert_eq!(engine.get_all().await, community);
}

#[tokio::test]
async fn lookup_prefers_primary_when_both_settle_with_values() {
    let (_dir, engine) = aggregator(
        StubOutcome::Recipes(vec![Recipe::new(5, "Primary gnocchi")]),
        StubOutcome::Recipes(vec![Recipe::new(5, "Secondary gnocchi")]),
    );

    let found = engine.get_by_id(5).await.unwrap();
    assert_eq!(found.title, "Primary gnocchi");
}

#[tokio::test]
async fn lookup_survives_primary_credential_failure() {
    let (_dir, engine) = aggregator(
        StubOutcome::CredentialInvalid,
        StubOutcome::Recipes(vec![Recipe::new(6, "Community dal")]),
    );

    let found = engine.get_by_id(6).await.unwrap();
    assert_eq!(found.title, "Community dal");
}

#[tokio::test]
async fn lookup_falls_back_to_sample_set() {
    let (_dir, engine) = aggregator(StubOutcome::NotFound, StubOutcome::NotFound);

    let sample = &sample_recipes()[0];
    let found = engine.get_by_id(sample.id).await.unwrap();
    assert_eq!(&found, sample);
}

#[tokio::test]
async fn exhausted_lookup_reports_not_found() {
    let (_dir, engine) = aggregator(StubOutcome::NotFound, StubOutcome::CorsFailure);

    let err = engine.get_by_id(-42).await.unwrap_err();
    assert_eq!(err, AggregateError::NotFound);
}

#[tokio::test]
async fn exhausted_lookup_surfaces_rejected_credential_distinctly() {
    let (_dir, engine) = aggregator(StubOutcome::CredentialInvalid, StubOutcome::NotFound);

    let err = engine.get_by_id(-42).await.unwrap_err();
    assert_eq!(err, AggregateError::CredentialInvalid);
}
