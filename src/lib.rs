// ABOUTME: Library entry point for the Leafy recipe retrieval and persistence core
// ABOUTME: Wires the source adapters, aggregation engine, local store, and facade together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

#![deny(unsafe_code)]

//! # Leafy Core
//!
//! Retrieval and persistence core for the Leafy vegetarian recipe app.
//! Recipes come from a three-tier fallback chain — the Spoonacular API when a
//! credential is configured, the free TheMealDB API, and a bundled sample set
//! that never fails — while user-authored recipes live in a local JSON store
//! that shadows the remote sources on lookup.
//!
//! ## Architecture
//!
//! - **Providers**: one adapter per external source, each translating its
//!   wire format into the canonical [`models::Recipe`] shape and returning
//!   tagged [`errors::FetchError`]s instead of swallowing failures
//! - **Aggregator**: the single decision table for tier fallback,
//!   deduplication, and the all-settle detail lookup
//! - **Storage**: whole-collection JSON persistence for user recipes
//! - **Service**: the reactive facade a presentation layer binds to
//!
//! ## Example
//!
//! ```rust,no_run
//! use leafy_core::config::LeafyConfig;
//! use leafy_core::service::RecipeService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LeafyConfig::from_env();
//!     let service = RecipeService::new(&config);
//!
//!     service.search("pasta").await;
//!     for recipe in service.results() {
//!         println!("{} ({})", recipe.title, recipe.id);
//!     }
//! }
//! ```

/// Three-tier orchestration: search, catalog, lookup, instruction normalization
pub mod aggregator;
/// Environment-driven configuration and the credential sentinel
pub mod config;
/// Tagged failure taxonomy shared by adapters and the aggregate layer
pub mod errors;
/// Structured logging setup
pub mod logging;
/// Canonical recipe domain models
pub mod models;
/// Injectable inter-request pacing
pub mod pacing;
/// Source adapters and the adapter trait
pub mod providers;
/// Presentation-facing reactive facade
pub mod service;
/// Durable local store for user-authored recipes
pub mod storage;

pub use aggregator::{normalize_instructions, RecipeAggregator};
pub use config::LeafyConfig;
pub use errors::{AggregateError, FetchError, FetchResult};
pub use models::{
    Ingredient, InstructionGroup, InstructionStep, Instructions, Recipe, RecipeDraft, UserRecipe,
};
pub use providers::RecipeSource;
pub use service::RecipeService;
pub use storage::UserRecipeStore;
