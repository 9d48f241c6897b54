//! Tie-break strategies.
//!
//! Every ordering decision an engine makes goes through one of the types here,
//! so a given strategy pins output down exactly:
//!
//! - [`ElementOrder`] -- which discovered partner a BFS expansion tries first
//! - [`BuildOrder`] -- which ready recipe linearization emits next
//! - [`RecipePriority`] -- which producing recipe DFS construction tries first
//!
//! All comparators are total: they fall back to names or canonical keys, so
//! sorting never depends on input order.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use alembic_kernel::{is_base_element, Recipe};
use xxhash_rust::xxh3::xxh3_64_with_seed;

// ---------------------------------------------------------------------------
// ElementOrder
// ---------------------------------------------------------------------------

/// Partner ordering for BFS expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOrder {
    Alphabetical,
    ReverseAlphabetical,
    /// Lowest discovery depth first.
    ShallowFirst,
    /// Highest discovery depth first.
    DeepFirst,
    /// xxh3 of the name with `seed`.
    Hashed { seed: u64 },
}

impl ElementOrder {
    /// Strategy for the `index`-th worker: the five strategies in rotation.
    #[must_use]
    pub fn for_worker(index: usize, seed: u64) -> Self {
        match index % 5 {
            0 => Self::Alphabetical,
            1 => Self::ReverseAlphabetical,
            2 => Self::ShallowFirst,
            3 => Self::DeepFirst,
            _ => Self::Hashed {
                seed: seed.wrapping_add(index as u64),
            },
        }
    }

    /// Compare two element names. `depth` holds discovery depths; missing
    /// names count as depth 0.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str, depth: &HashMap<String, usize>) -> Ordering {
        let depth_of = |name: &str| depth.get(name).copied().unwrap_or(0);
        match *self {
            Self::Alphabetical => a.cmp(b),
            Self::ReverseAlphabetical => b.cmp(a),
            Self::ShallowFirst => depth_of(a).cmp(&depth_of(b)).then_with(|| a.cmp(b)),
            Self::DeepFirst => depth_of(b).cmp(&depth_of(a)).then_with(|| a.cmp(b)),
            Self::Hashed { seed } => xxh3_64_with_seed(a.as_bytes(), seed)
                .cmp(&xxh3_64_with_seed(b.as_bytes(), seed))
                .then_with(|| a.cmp(b)),
        }
    }
}

// ---------------------------------------------------------------------------
// BuildOrder
// ---------------------------------------------------------------------------

/// Linearization tie-break among recipes that are ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOrder {
    /// Lowest result depth, then most dependents, then result name.
    DepthThenDependents,
    /// Result name ascending.
    ResultName,
    ResultNameDescending,
    /// Normalized ingredient pair, then result name.
    IngredientNames,
}

/// Per-element ranks consulted by [`BuildOrder::DepthThenDependents`].
#[derive(Debug, Clone, Default)]
pub struct BuildRanks {
    depth: HashMap<String, usize>,
    dependents: HashMap<String, usize>,
}

impl BuildRanks {
    /// Ranks for `recipes`: `depth` as given, dependents counted as the
    /// number of ingredient slots in `recipes` naming each element.
    #[must_use]
    pub fn from_recipes(recipes: &[Recipe], depth: HashMap<String, usize>) -> Self {
        let mut dependents: HashMap<String, usize> = HashMap::new();
        for recipe in recipes {
            for ingredient in recipe.ingredients() {
                *dependents.entry(ingredient.to_owned()).or_default() += 1;
            }
        }
        Self { depth, dependents }
    }

    #[must_use]
    pub fn depth(&self, element: &str) -> usize {
        self.depth.get(element).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn dependents(&self, element: &str) -> usize {
        self.dependents.get(element).copied().unwrap_or(0)
    }
}

impl BuildOrder {
    /// Strategy for the `index`-th BFS explorer, so explorers that recover
    /// the same recipe set still emit it in different orders.
    #[must_use]
    pub fn for_explorer(index: usize) -> Self {
        match index % 4 {
            0 => Self::DepthThenDependents,
            1 => Self::IngredientNames,
            2 => Self::ResultName,
            _ => Self::ResultNameDescending,
        }
    }

    #[must_use]
    pub fn compare(&self, a: &Recipe, b: &Recipe, ranks: &BuildRanks) -> Ordering {
        let primary = match self {
            Self::DepthThenDependents => ranks
                .depth(&a.result)
                .cmp(&ranks.depth(&b.result))
                .then_with(|| ranks.dependents(&b.result).cmp(&ranks.dependents(&a.result)))
                .then_with(|| a.result.cmp(&b.result)),
            Self::ResultName => a.result.cmp(&b.result),
            Self::ResultNameDescending => b.result.cmp(&a.result),
            Self::IngredientNames => a
                .normalized_pair()
                .cmp(&b.normalized_pair())
                .then_with(|| a.result.cmp(&b.result)),
        };
        primary.then_with(|| a.key().cmp(&b.key()))
    }
}

// ---------------------------------------------------------------------------
// RecipePriority
// ---------------------------------------------------------------------------

/// DFS producing-recipe order: recipes applicable right now first, then
/// recipes with more base-element ingredients, then canonical key.
#[derive(Debug, Clone, Copy)]
pub struct RecipePriority<'a> {
    available: &'a HashSet<String>,
}

impl<'a> RecipePriority<'a> {
    #[must_use]
    pub fn new(available: &'a HashSet<String>) -> Self {
        Self { available }
    }

    fn ready(&self, recipe: &Recipe) -> bool {
        recipe
            .ingredients()
            .iter()
            .all(|i| is_base_element(i) || self.available.contains(*i))
    }

    fn base_count(recipe: &Recipe) -> usize {
        recipe
            .ingredients()
            .iter()
            .filter(|i| is_base_element(i))
            .count()
    }

    #[must_use]
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        self.ready(b)
            .cmp(&self.ready(a))
            .then_with(|| Self::base_count(b).cmp(&Self::base_count(a)))
            .then_with(|| a.key().cmp(&b.key()))
    }

    /// `recipes` sorted by priority.
    #[must_use]
    pub fn sorted<'r>(&self, recipes: &'r [Recipe]) -> Vec<&'r Recipe> {
        let mut sorted: Vec<&Recipe> = recipes.iter().collect();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}
