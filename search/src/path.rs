//! Path utilities: linearization, construction-order validation, dedup.

use std::collections::{BTreeMap, HashSet};

use alembic_kernel::{is_base_element, Recipe, RecipeKey, BASE_ELEMENTS};

use crate::order::{BuildOrder, BuildRanks};

/// A construction-order violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("step {step} uses {ingredient} before it is available")]
    MissingIngredient { step: usize, ingredient: String },

    #[error("path to {target} ends with {last:?}")]
    WrongTarget {
        target: String,
        last: Option<String>,
    },

    #[error("path to base element {target} is not empty")]
    BaseTargetNotEmpty { target: String },
}

/// Order an unordered recipe set into a construction path for `target`.
///
/// Repeatedly applies the ready recipe (both ingredients available, result
/// not yet available) that `order` ranks first, until `target` is available.
/// Recipes not needed for `target` are then pruned. Returns `None` when the
/// set cannot produce `target` from the base elements.
#[must_use]
pub fn linearize(
    recipes: &[Recipe],
    target: &str,
    order: BuildOrder,
    ranks: &BuildRanks,
) -> Option<Vec<Recipe>> {
    if is_base_element(target) {
        return Some(Vec::new());
    }

    let mut unique: BTreeMap<RecipeKey, &Recipe> = BTreeMap::new();
    for recipe in recipes {
        unique.entry(recipe.key()).or_insert(recipe);
    }
    let mut remaining: Vec<&Recipe> = unique.into_values().collect();
    let mut available: HashSet<&str> = BASE_ELEMENTS.into_iter().collect();
    let mut applied: Vec<&Recipe> = Vec::new();

    while !available.contains(target) {
        let next = remaining
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                !available.contains(r.result.as_str())
                    && available.contains(r.ingredient1.as_str())
                    && available.contains(r.ingredient2.as_str())
            })
            .min_by(|(_, a), (_, b)| order.compare(a, b, ranks))
            .map(|(index, _)| index)?;
        let recipe = remaining.swap_remove(next);
        available.insert(&recipe.result);
        applied.push(recipe);
    }

    // Walk backward keeping only producers of needed elements. Each result
    // appears once in `applied`, and producers precede consumers.
    let mut needed: HashSet<&str> = HashSet::from([target]);
    let mut kept: Vec<Recipe> = Vec::new();
    for recipe in applied.iter().rev() {
        if needed.contains(recipe.result.as_str()) {
            needed.insert(&recipe.ingredient1);
            needed.insert(&recipe.ingredient2);
            kept.push((*recipe).clone());
        }
    }
    kept.reverse();
    Some(kept)
}

/// Check that every step's ingredients are base elements or results of
/// earlier steps, and that the path ends at `target`.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_construction_order(path: &[Recipe], target: &str) -> Result<(), ConstructionError> {
    if is_base_element(target) {
        return if path.is_empty() {
            Ok(())
        } else {
            Err(ConstructionError::BaseTargetNotEmpty {
                target: target.to_owned(),
            })
        };
    }

    let mut available: HashSet<&str> = BASE_ELEMENTS.into_iter().collect();
    for (step, recipe) in path.iter().enumerate() {
        for ingredient in recipe.ingredients() {
            if !available.contains(ingredient) {
                return Err(ConstructionError::MissingIngredient {
                    step,
                    ingredient: ingredient.to_owned(),
                });
            }
        }
        available.insert(&recipe.result);
    }

    match path.last() {
        Some(last) if last.result == target => Ok(()),
        last => Err(ConstructionError::WrongTarget {
            target: target.to_owned(),
            last: last.map(|r| r.result.clone()),
        }),
    }
}

/// Drop repeated recipes (same canonical key), keeping the first occurrence.
#[must_use]
pub fn dedup_recipes(path: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen: HashSet<RecipeKey> = HashSet::with_capacity(path.len());
    path.into_iter().filter(|r| seen.insert(r.key())).collect()
}
