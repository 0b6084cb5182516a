// ABOUTME: Durable local store for user-authored recipes backed by one JSON file
// ABOUTME: Whole-collection rewrites with atomic rename so reads never see a torn state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use crate::models::{RecipeDraft, UserRecipe};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Key-value persistence for user recipes: a single slot holding the
/// serialized ordered collection.
///
/// Every mutation re-serializes and rewrites the entire collection. That
/// bounds write cost by collection size, which stays in the tens of entries
/// for a personal recipe box. Writes go through a temp file and rename, so a
/// concurrent reader of the slot observes either the previous or the new
/// collection, never a partial one.
pub struct UserRecipeStore {
    path: PathBuf,
    recipes: RwLock<Vec<UserRecipe>>,
}

impl UserRecipeStore {
    /// Open the store at the given slot path.
    ///
    /// A missing, unreadable, or corrupt slot is treated as an empty
    /// collection; opening never fails.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let recipes = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<UserRecipe>>(&raw) {
                Ok(recipes) => recipes,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "corrupt recipe store, starting empty");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable recipe store, starting empty");
                Vec::new()
            }
        };
        debug!(count = recipes.len(), "loaded user recipes");
        Self {
            path,
            recipes: RwLock::new(recipes),
        }
    }

    /// Ordered snapshot of every stored recipe.
    #[must_use]
    pub fn list(&self) -> Vec<UserRecipe> {
        self.recipes
            .read()
            .map(|recipes| recipes.clone())
            .unwrap_or_default()
    }

    /// Exact-id lookup.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<UserRecipe> {
        self.recipes
            .read()
            .ok()
            .and_then(|recipes| recipes.iter().find(|r| r.id() == id).cloned())
    }

    /// Store a new recipe, assigning identity and creation timestamp.
    ///
    /// The id derives from the current epoch milliseconds and is bumped until
    /// it collides with no stored id, so two creations within one clock tick
    /// still get distinct identities.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the collection fails.
    pub fn create(&self, draft: RecipeDraft) -> Result<UserRecipe> {
        let mut recipes = self
            .recipes
            .write()
            .map_err(|_| anyhow::anyhow!("recipe store lock poisoned"))?;

        let mut id = Utc::now().timestamp_millis();
        while recipes.iter().any(|r| r.id() == id) {
            id += 1;
        }

        let stored = UserRecipe {
            recipe: draft.into_recipe(id),
            created_at: Utc::now(),
            is_user_created: true,
        };
        recipes.push(stored.clone());
        self.persist(&recipes)?;
        debug!(id, "created user recipe");
        Ok(stored)
    }

    /// Replace the recipe whose id matches, preserving that id and its
    /// creation timestamp. Absent id is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the collection fails.
    pub fn update(&self, id: i64, draft: RecipeDraft) -> Result<()> {
        let mut recipes = self
            .recipes
            .write()
            .map_err(|_| anyhow::anyhow!("recipe store lock poisoned"))?;

        let Some(existing) = recipes.iter_mut().find(|r| r.id() == id) else {
            return Ok(());
        };
        existing.recipe = draft.into_recipe(id);
        self.persist(&recipes)?;
        debug!(id, "updated user recipe");
        Ok(())
    }

    /// Remove the matching recipe if present; absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the collection fails.
    pub fn delete(&self, id: i64) -> Result<()> {
        let mut recipes = self
            .recipes
            .write()
            .map_err(|_| anyhow::anyhow!("recipe store lock poisoned"))?;

        let before = recipes.len();
        recipes.retain(|r| r.id() != id);
        if recipes.len() == before {
            return Ok(());
        }
        self.persist(&recipes)?;
        debug!(id, "deleted user recipe");
        Ok(())
    }

    fn persist(&self, recipes: &[UserRecipe]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating store directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(recipes).context("serializing user recipes")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
