//! The Recipe Store: an immutable, indexed recipe set.
//!
//! The store is initialized exactly once. Every index is built at load time
//! and read-only afterward, so any number of threads may query it without
//! locking. Index lists are sorted by canonical key (pair lists by result
//! name) so iteration order never depends on input order.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use crate::elements::BASE_ELEMENTS;
use crate::error::StoreError;
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};
use crate::recipe::{normalize_pair, Recipe, RecipeKey};

#[derive(Debug, Default)]
pub struct RecipeStore {
    index: OnceLock<RecipeIndex>,
}

#[derive(Debug)]
struct RecipeIndex {
    /// All recipes, deduplicated, sorted by canonical key.
    recipes: Vec<Recipe>,
    by_result: HashMap<String, Vec<Recipe>>,
    by_ingredient: HashMap<String, Vec<Recipe>>,
    /// Smaller ingredient → larger ingredient → recipes sorted by result.
    by_pair: HashMap<String, HashMap<String, Vec<Recipe>>>,
    /// Every element name (ingredients, results, base elements), sorted.
    elements: Vec<String>,
    digest: ContentHash,
}

impl RecipeIndex {
    fn build(input: Vec<Recipe>) -> Self {
        let mut unique: BTreeMap<RecipeKey, Recipe> = BTreeMap::new();
        for recipe in input {
            unique.entry(recipe.key()).or_insert(recipe);
        }

        let mut by_result: HashMap<String, Vec<Recipe>> = HashMap::new();
        let mut by_ingredient: HashMap<String, Vec<Recipe>> = HashMap::new();
        let mut by_pair: HashMap<String, HashMap<String, Vec<Recipe>>> = HashMap::new();
        let mut elements: BTreeSet<String> =
            BASE_ELEMENTS.iter().map(|&name| name.to_owned()).collect();

        // BTreeMap iteration is key-ordered, so every pushed list comes out
        // sorted by canonical key. Keys sharing a pair differ only in the
        // result, so pair lists come out sorted by result.
        for recipe in unique.values() {
            by_result
                .entry(recipe.result.clone())
                .or_default()
                .push(recipe.clone());

            by_ingredient
                .entry(recipe.ingredient1.clone())
                .or_default()
                .push(recipe.clone());
            if recipe.ingredient2 != recipe.ingredient1 {
                by_ingredient
                    .entry(recipe.ingredient2.clone())
                    .or_default()
                    .push(recipe.clone());
            }

            let (a, b) = recipe.normalized_pair();
            by_pair
                .entry(a.to_owned())
                .or_default()
                .entry(b.to_owned())
                .or_default()
                .push(recipe.clone());

            elements.insert(recipe.ingredient1.clone());
            elements.insert(recipe.ingredient2.clone());
            elements.insert(recipe.result.clone());
        }

        let canonical = unique
            .keys()
            .map(RecipeKey::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        let digest = canonical_hash(HashDomain::Dataset, canonical.as_bytes());

        Self {
            recipes: unique.into_values().collect(),
            by_result,
            by_ingredient,
            by_pair,
            elements: elements.into_iter().collect(),
            digest,
        }
    }
}

impl RecipeStore {
    /// An empty store. Every query fails with [`StoreError::Uninitialized`]
    /// until [`load`](Self::load) runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store initialized with `recipes`.
    #[must_use]
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let store = Self::new();
        store.load(recipes);
        store
    }

    /// Parse a finalized dataset (a JSON array of recipes).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] if `bytes` is not a JSON array of recipe
    /// objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, StoreError> {
        let recipes: Vec<Recipe> = serde_json::from_slice(bytes)?;
        Ok(Self::from_recipes(recipes))
    }

    /// Read and parse a finalized dataset file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Parse`] if its contents are not a recipe array.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Build the indices from `recipes`.
    ///
    /// Only the first call has any effect; it returns `true`. Later calls
    /// return `false` and leave the store unchanged.
    pub fn load(&self, recipes: Vec<Recipe>) -> bool {
        let mut loaded = false;
        let index = self.index.get_or_init(|| {
            loaded = true;
            RecipeIndex::build(recipes)
        });
        if loaded {
            tracing::info!(
                recipes = index.recipes.len(),
                elements = index.elements.len(),
                digest = %index.digest,
                "recipe store loaded"
            );
        }
        loaded
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.index.get().is_some()
    }

    fn index(&self) -> Result<&RecipeIndex, StoreError> {
        self.index.get().ok_or(StoreError::Uninitialized)
    }

    /// Recipes whose result is `element`, sorted by canonical key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn recipes_producing(&self, element: &str) -> Result<&[Recipe], StoreError> {
        Ok(self
            .index()?
            .by_result
            .get(element)
            .map_or(&[], Vec::as_slice))
    }

    /// Recipes that use `element` as an ingredient, sorted by canonical key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn recipes_consuming(&self, element: &str) -> Result<&[Recipe], StoreError> {
        Ok(self
            .index()?
            .by_ingredient
            .get(element)
            .map_or(&[], Vec::as_slice))
    }

    /// Recipes combining exactly `a` and `b` (in either order), sorted by
    /// result name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn recipes_combining(&self, a: &str, b: &str) -> Result<&[Recipe], StoreError> {
        let (lo, hi) = normalize_pair(a, b);
        Ok(self
            .index()?
            .by_pair
            .get(lo)
            .and_then(|inner| inner.get(hi))
            .map_or(&[], Vec::as_slice))
    }

    /// Whether `name` appears anywhere in the recipe set or is a base element.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn is_known_element(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self
            .index()?
            .elements
            .binary_search_by(|known| known.as_str().cmp(name))
            .is_ok())
    }

    /// All element names, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn known_elements(&self) -> Result<&[String], StoreError> {
        Ok(&self.index()?.elements)
    }

    /// Every recipe, deduplicated and sorted by canonical key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn recipes(&self) -> Result<&[Recipe], StoreError> {
        Ok(&self.index()?.recipes)
    }

    /// Content hash over the sorted canonical keys of the loaded set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Uninitialized`] before load.
    pub fn digest(&self) -> Result<&ContentHash, StoreError> {
        Ok(&self.index()?.digest)
    }
}
