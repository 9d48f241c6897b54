//! The recipe triple and its canonical key.
//!
//! A recipe combines two ingredients into one result. Ingredient order carries
//! no meaning (`A + B` and `B + A` are the same recipe), so every identity
//! derived from a recipe goes through [`RecipeKey`], which sorts the pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// One combination rule: `ingredient1 + ingredient2 => result`.
///
/// Field names match the finalized dataset JSON exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredient1: String,
    pub ingredient2: String,
    pub result: String,
}

impl Recipe {
    #[must_use]
    pub fn new(
        ingredient1: impl Into<String>,
        ingredient2: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            ingredient1: ingredient1.into(),
            ingredient2: ingredient2.into(),
            result: result.into(),
        }
    }

    /// The ingredient pair in lexicographic order.
    #[must_use]
    pub fn normalized_pair(&self) -> (&str, &str) {
        normalize_pair(&self.ingredient1, &self.ingredient2)
    }

    /// Both ingredients, in declaration order.
    #[must_use]
    pub fn ingredients(&self) -> [&str; 2] {
        [&self.ingredient1, &self.ingredient2]
    }

    /// Whether `element` is one of the two ingredients.
    #[must_use]
    pub fn uses(&self, element: &str) -> bool {
        self.ingredient1 == element || self.ingredient2 == element
    }

    /// The ingredient paired with `element`, if `element` is an ingredient.
    ///
    /// For a self-pair (`X + X`) the other ingredient is `X` itself.
    #[must_use]
    pub fn other_ingredient(&self, element: &str) -> Option<&str> {
        if self.ingredient1 == element {
            Some(&self.ingredient2)
        } else if self.ingredient2 == element {
            Some(&self.ingredient1)
        } else {
            None
        }
    }

    /// The order-normalized identity of this recipe.
    #[must_use]
    pub fn key(&self) -> RecipeKey {
        RecipeKey::of(self)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {} => {}",
            self.ingredient1, self.ingredient2, self.result
        )
    }
}

/// Sort two element names lexicographically.
#[must_use]
pub fn normalize_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Canonical recipe identity: `"A+B=>R"` with `A <= B`.
///
/// Two recipes compare equal under this key iff they have the same result and
/// the same unordered ingredient pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecipeKey(String);

impl RecipeKey {
    #[must_use]
    pub fn of(recipe: &Recipe) -> Self {
        let (a, b) = recipe.normalized_pair();
        Self(format!("{a}+{b}=>{}", recipe.result))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain-separated content hash of the key.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        canonical_hash(HashDomain::Recipe, self.0.as_bytes())
    }
}

impl fmt::Display for RecipeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
