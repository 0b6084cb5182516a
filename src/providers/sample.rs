// ABOUTME: Bundled sample recipes - the always-available terminal fallback tier
// ABOUTME: Finite, well-formed set plus lookup-by-id; construction cannot fail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use crate::models::{Ingredient, Recipe};
use std::sync::OnceLock;

/// Source name recorded on every bundled recipe.
pub const SOURCE_NAME: &str = "Leafy Samples";

fn ingredient(id: i64, name: &str, amount: f64, unit: &str) -> Ingredient {
    let original = if unit.is_empty() {
        format!("{amount} {name}")
    } else {
        format!("{amount} {unit} {name}")
    };
    Ingredient {
        id,
        name: name.to_owned(),
        amount,
        unit: unit.to_owned(),
        original,
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: i64,
    title: &str,
    summary: &str,
    ready_in_minutes: u32,
    servings: u32,
    health_score: f64,
    vegan: bool,
    ingredients: Vec<Ingredient>,
    instructions: &str,
) -> Recipe {
    Recipe {
        id,
        title: title.to_owned(),
        image: None,
        summary: Some(summary.to_owned()),
        ready_in_minutes: Some(ready_in_minutes),
        servings: Some(servings),
        health_score: Some(health_score),
        ingredients,
        instructions: Some(instructions.to_owned()),
        analyzed_instructions: Vec::new(),
        source_url: None,
        source_name: Some(SOURCE_NAME.to_owned()),
        dish_types: Vec::new(),
        cuisines: Vec::new(),
        vegetarian: Some(true),
        vegan: Some(vegan),
    }
}

fn build_samples() -> Vec<Recipe> {
    vec![
        sample(
            9001,
            "Creamy Mushroom Risotto",
            "Arborio rice slowly simmered with porcini mushrooms, white wine, and parmesan.",
            45,
            4,
            62.0,
            false,
            vec![
                ingredient(1, "arborio rice", 320.0, "g"),
                ingredient(2, "porcini mushrooms", 250.0, "g"),
                ingredient(3, "vegetable stock", 1.0, "l"),
                ingredient(4, "parmesan", 60.0, "g"),
            ],
            "1. Soften the onion in olive oil.\n\n2. Toast the rice, deglaze with wine.\n\n3. Add stock one ladle at a time, stirring.\n\n4. Fold in mushrooms and parmesan.",
        ),
        sample(
            9002,
            "Chickpea and Spinach Curry",
            "A weeknight coconut curry with chickpeas, spinach, and warming spices.",
            30,
            4,
            81.0,
            true,
            vec![
                ingredient(1, "chickpeas", 400.0, "g"),
                ingredient(2, "baby spinach", 200.0, "g"),
                ingredient(3, "coconut milk", 400.0, "ml"),
                ingredient(4, "curry paste", 2.0, "tbsp"),
            ],
            "1. Fry the curry paste until fragrant.\n\n2. Add chickpeas and coconut milk, simmer.\n\n3. Wilt in the spinach just before serving.",
        ),
        sample(
            9003,
            "Caprese Pasta Salad",
            "Fusilli tossed with cherry tomatoes, mozzarella, and basil.",
            20,
            4,
            55.0,
            false,
            vec![
                ingredient(1, "fusilli", 350.0, "g"),
                ingredient(2, "cherry tomatoes", 300.0, "g"),
                ingredient(3, "mozzarella", 200.0, "g"),
                ingredient(4, "basil leaves", 1.0, "bunch"),
            ],
            "1. Cook the pasta and cool under running water.\n\n2. Halve tomatoes, tear mozzarella.\n\n3. Toss with basil, olive oil, and salt.",
        ),
        sample(
            9004,
            "Quinoa Buddha Bowl",
            "Quinoa, roasted vegetables, and tahini dressing in one bowl.",
            35,
            2,
            88.0,
            true,
            vec![
                ingredient(1, "quinoa", 180.0, "g"),
                ingredient(2, "sweet potato", 1.0, ""),
                ingredient(3, "broccoli", 200.0, "g"),
                ingredient(4, "tahini", 2.0, "tbsp"),
            ],
            "1. Rinse and cook the quinoa.\n\n2. Roast sweet potato and broccoli.\n\n3. Assemble and drizzle with tahini dressing.",
        ),
        sample(
            9005,
            "Crispy Tofu Stir Fry",
            "Golden tofu cubes with peppers and a ginger soy glaze.",
            25,
            2,
            76.0,
            true,
            vec![
                ingredient(1, "firm tofu", 400.0, "g"),
                ingredient(2, "bell peppers", 2.0, ""),
                ingredient(3, "soy sauce", 3.0, "tbsp"),
                ingredient(4, "fresh ginger", 1.0, "tbsp"),
            ],
            "1. Press and cube the tofu, fry until crisp.\n\n2. Stir-fry the peppers.\n\n3. Glaze with soy, ginger, and a splash of water.",
        ),
        sample(
            9006,
            "Red Lentil Soup",
            "Silky red lentils with carrot, cumin, and lemon.",
            40,
            6,
            84.0,
            true,
            vec![
                ingredient(1, "red lentils", 300.0, "g"),
                ingredient(2, "carrots", 2.0, ""),
                ingredient(3, "ground cumin", 1.0, "tsp"),
                ingredient(4, "lemon", 1.0, ""),
            ],
            "1. Sweat onion and carrot.\n\n2. Add lentils and stock, simmer 25 minutes.\n\n3. Blend partially, finish with cumin and lemon.",
        ),
        sample(
            9007,
            "Margherita Flatbread",
            "Quick flatbread with tomato, mozzarella, and fresh basil.",
            15,
            2,
            48.0,
            false,
            vec![
                ingredient(1, "flatbreads", 2.0, ""),
                ingredient(2, "passata", 150.0, "ml"),
                ingredient(3, "mozzarella", 125.0, "g"),
                ingredient(4, "basil leaves", 10.0, ""),
            ],
            "1. Spread passata over the flatbreads.\n\n2. Top with mozzarella.\n\n3. Bake hot until blistered, scatter basil.",
        ),
        sample(
            9008,
            "Roasted Vegetable Couscous",
            "Couscous with charred courgette, aubergine, and harissa yogurt.",
            35,
            4,
            72.0,
            false,
            vec![
                ingredient(1, "couscous", 250.0, "g"),
                ingredient(2, "courgette", 2.0, ""),
                ingredient(3, "aubergine", 1.0, ""),
                ingredient(4, "harissa", 1.0, "tbsp"),
            ],
            "1. Roast the vegetables until charred.\n\n2. Steep the couscous in hot stock.\n\n3. Fold together, serve with harissa yogurt.",
        ),
    ]
}

/// The full bundled sample set, in its fixed order.
pub fn sample_recipes() -> &'static [Recipe] {
    static SAMPLES: OnceLock<Vec<Recipe>> = OnceLock::new();
    SAMPLES.get_or_init(build_samples)
}

/// Lookup-by-id over the bundled set.
#[must_use]
pub fn sample_recipe_by_id(id: i64) -> Option<Recipe> {
    sample_recipes().iter().find(|recipe| recipe.id == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn samples_are_well_formed_and_unique() {
        let samples = sample_recipes();
        assert!(!samples.is_empty());

        let mut ids = HashSet::new();
        for recipe in samples {
            assert!(!recipe.title.is_empty());
            assert!(ids.insert(recipe.id), "duplicate sample id {}", recipe.id);
            assert_eq!(recipe.vegetarian, Some(true));
            assert!(!recipe.ingredients.is_empty());
        }
    }

    #[test]
    fn lookup_by_id_round_trips() {
        let first = &sample_recipes()[0];
        assert_eq!(sample_recipe_by_id(first.id).as_ref(), Some(first));
        assert!(sample_recipe_by_id(-1).is_none());
    }
}
