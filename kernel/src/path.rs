//! Recipe paths and canonical path identifiers.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};
use crate::recipe::{Recipe, RecipeKey};

/// An ordered list of recipes in construction order.
///
/// The type does not enforce the construction-order invariant on its own;
/// engines only hand out paths that satisfy it, and
/// `alembic_search::path::validate_construction_order` checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipePath(Vec<Recipe>);

impl RecipePath {
    #[must_use]
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self(recipes)
    }

    /// The empty path (target is a base element).
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last recipe, whose result is the path's target.
    #[must_use]
    pub fn final_recipe(&self) -> Option<&Recipe> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Recipe] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Recipe> {
        self.0
    }

    /// Canonical identifier of this path's recipe set.
    #[must_use]
    pub fn path_id(&self) -> PathId {
        PathId::of(&self.0)
    }
}

impl From<Vec<Recipe>> for RecipePath {
    fn from(recipes: Vec<Recipe>) -> Self {
        Self(recipes)
    }
}

impl FromIterator<Recipe> for RecipePath {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecipePath {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for RecipePath {
    type Item = Recipe;
    type IntoIter = std::vec::IntoIter<Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Canonical path identifier.
///
/// The sorted, deduplicated set of [`RecipeKey`]s joined by `|`. Two paths get
/// the same identifier iff they use the same recipes, regardless of step order
/// or of the ingredient order inside each step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PathId(String);

impl PathId {
    #[must_use]
    pub fn of(recipes: &[Recipe]) -> Self {
        let keys: BTreeSet<RecipeKey> = recipes.iter().map(Recipe::key).collect();
        let joined = keys
            .iter()
            .map(RecipeKey::as_str)
            .collect::<Vec<_>>()
            .join("|");
        Self(joined)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain-separated content hash, for compact logs and reports.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        canonical_hash(HashDomain::PathIdentity, self.0.as_bytes())
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
