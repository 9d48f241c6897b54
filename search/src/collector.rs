//! Accepted-path bookkeeping for the multi-path entry points.

use std::collections::HashSet;

use alembic_kernel::{PathId, RecipeKey, RecipePath};

/// Outcome of offering a candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    /// Same canonical identifier as an accepted path.
    DuplicatePath,
    /// Top-level recipe already used by an accepted path.
    DuplicateFinalRecipe,
    /// The limit was already reached.
    Full,
}

/// Accepted paths, their identifiers and the top-level recipes they use.
///
/// Shared between workers behind a `Mutex` so a worker can skip a top-level
/// recipe that is already satisfied before doing any work for it.
#[derive(Debug)]
pub struct PathCollector {
    limit: usize,
    distinct_final: bool,
    paths: Vec<RecipePath>,
    ids: HashSet<PathId>,
    satisfied: HashSet<RecipeKey>,
}

impl PathCollector {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            distinct_final: false,
            paths: Vec::new(),
            ids: HashSet::new(),
            satisfied: HashSet::new(),
        }
    }

    /// Also reject paths whose top-level recipe is already satisfied.
    #[must_use]
    pub fn distinct_final_recipes(mut self) -> Self {
        self.distinct_final = true;
        self
    }

    pub fn offer(&mut self, path: RecipePath) -> Offer {
        if self.is_full() {
            return Offer::Full;
        }
        let final_key = path.final_recipe().map(alembic_kernel::Recipe::key);
        if self.distinct_final {
            if let Some(key) = &final_key {
                if self.satisfied.contains(key) {
                    return Offer::DuplicateFinalRecipe;
                }
            }
        }
        if !self.ids.insert(path.path_id()) {
            return Offer::DuplicatePath;
        }
        if let Some(key) = final_key {
            self.satisfied.insert(key);
        }
        self.paths.push(path);
        Offer::Accepted
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.paths.len() >= self.limit
    }

    #[must_use]
    pub fn is_satisfied(&self, key: &RecipeKey) -> bool {
        self.satisfied.contains(key)
    }

    #[must_use]
    pub fn satisfied_count(&self) -> usize {
        self.satisfied.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Accepted paths in acceptance order.
    #[must_use]
    pub fn into_paths(self) -> Vec<RecipePath> {
        self.paths
    }
}
