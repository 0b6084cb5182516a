// ABOUTME: Canonical recipe domain models shared by every source adapter
// ABOUTME: Defines Recipe, Ingredient, UserRecipe, and the authoring draft shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder asset reference used when a recipe carries no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/assets/recipe-placeholder.svg";

/// Single ingredient line within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// Free-text form as the source published it ("2 cups arborio rice").
    pub original: String,
}

/// One numbered step inside a structured instruction group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub number: u32,
    pub step: String,
}

/// Named group of ordered steps, as richer sources publish them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InstructionGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

/// Canonical instruction shape after normalization.
///
/// Sources publish instructions either as flat newline-delimited text or as
/// structured step groups. [`crate::aggregator::normalize_instructions`] resolves
/// the union once so collaborators never re-implement the priority logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instructions {
    /// Ordered numbered steps, preferred when the source provides them.
    Structured(Vec<InstructionStep>),
    /// Flat newline-delimited text.
    Flat(String),
}

/// The canonical unit of content every source is normalized into.
///
/// Remote-sourced recipes are ephemeral: built fresh per query response and
/// discarded when the result set is replaced. `id` is unique within a single
/// source's namespace only; the aggregator deduplicates within one result set
/// but never reconciles identity across sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-text description, HTML-stripped before it reaches this struct.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<Ingredient>,
    /// Flat newline-delimited steps; see [`Instructions`] for the resolved form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analyzed_instructions: Vec<InstructionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dish_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuisines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegan: Option<bool>,
}

impl Recipe {
    /// Minimal well-formed recipe; everything optional left empty.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            image: None,
            summary: None,
            ready_in_minutes: None,
            servings: None,
            health_score: None,
            ingredients: Vec::new(),
            instructions: None,
            analyzed_instructions: Vec::new(),
            source_url: None,
            source_name: None,
            dish_types: Vec::new(),
            cuisines: Vec::new(),
            vegetarian: None,
            vegan: None,
        }
    }

    /// Image reference, falling back to the bundled placeholder asset.
    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        match self.image.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => PLACEHOLDER_IMAGE,
        }
    }
}

/// A recipe authored by the user, persisted in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Assigned at creation time, immutable thereafter.
    pub created_at: DateTime<Utc>,
    /// Always true for entries in the local store.
    pub is_user_created: bool,
}

impl UserRecipe {
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.recipe.id
    }
}

/// Author-supplied recipe content. The store assigns identity and timestamps;
/// any id present in a draft is discarded on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub vegan: Option<bool>,
}

impl RecipeDraft {
    /// Materialize the draft into a canonical recipe under the given id.
    #[must_use]
    pub fn into_recipe(self, id: i64) -> Recipe {
        Recipe {
            id,
            title: self.title,
            image: self.image,
            summary: self.summary,
            ready_in_minutes: self.ready_in_minutes,
            servings: self.servings,
            health_score: None,
            ingredients: self.ingredients,
            instructions: self.instructions,
            analyzed_instructions: Vec::new(),
            source_url: None,
            source_name: None,
            dish_types: self.dish_types,
            cuisines: self.cuisines,
            vegetarian: self.vegetarian,
            vegan: self.vegan,
        }
    }
}
