// ABOUTME: Environment-based configuration for source credentials, endpoints, and storage
// ABOUTME: Placeholder credential sentinel disables the paid source without being an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use std::env;
use std::path::PathBuf;
use tracing::info;

/// Sentinel value shipped in example configuration; treated as "no credential".
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

const DEFAULT_SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com/recipes";
const DEFAULT_MEALDB_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Runtime configuration for the recipe core, resolved from the environment.
#[derive(Debug, Clone)]
pub struct LeafyConfig {
    /// Spoonacular API key. `None` disables the primary adapter entirely.
    pub spoonacular_api_key: Option<String>,
    /// Base URL for the primary source, overridable for staging/tests.
    pub spoonacular_base_url: String,
    /// Base URL for the community source, overridable for staging/tests.
    pub mealdb_base_url: String,
    /// Directory holding the local recipe store file.
    pub data_dir: PathBuf,
}

impl LeafyConfig {
    /// Resolve configuration from `LEAFY_*` environment variables.
    ///
    /// Absent or placeholder credentials silently downgrade capability; this
    /// function never fails.
    #[must_use]
    pub fn from_env() -> Self {
        let spoonacular_api_key = env::var("LEAFY_SPOONACULAR_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty() && key != API_KEY_PLACEHOLDER);

        if spoonacular_api_key.is_none() {
            info!("no Spoonacular API key configured, primary source disabled");
        }

        Self {
            spoonacular_api_key,
            spoonacular_base_url: env::var("LEAFY_SPOONACULAR_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SPOONACULAR_BASE_URL.to_owned()),
            mealdb_base_url: env::var("LEAFY_MEALDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MEALDB_BASE_URL.to_owned()),
            data_dir: env::var("LEAFY_DATA_DIR").map_or_else(|_| default_data_dir(), PathBuf::from),
        }
    }

    /// Path of the single storage slot holding the serialized user recipes.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("user_recipes.json")
    }
}

impl Default for LeafyConfig {
    fn default() -> Self {
        Self {
            spoonacular_api_key: None,
            spoonacular_base_url: DEFAULT_SPOONACULAR_BASE_URL.to_owned(),
            mealdb_base_url: DEFAULT_MEALDB_BASE_URL.to_owned(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("leafy")
}
