//! World contract: the minimal trait a fixture recipe set implements.
//!
//! Worlds provide recipes and the targets they are built around. They do
//! not search, validate or hash; those are search and kernel concerns.

use alembic_kernel::{Recipe, RecipeStore};

/// A named, fixed recipe set.
pub trait RecipeWorld {
    /// Unique world identifier (e.g., `"mud_brick"`).
    fn world_id(&self) -> &str;

    /// Every recipe in the world, in declaration order.
    fn recipes(&self) -> Vec<Recipe>;

    /// Non-base targets every engine must reach.
    fn reachable_targets(&self) -> Vec<String>;

    /// Targets no engine can reach: absent from the world, or only
    /// producible from elements that are themselves unreachable.
    fn unreachable_targets(&self) -> Vec<String> {
        Vec::new()
    }

    /// An initialized store over [`recipes`](Self::recipes).
    fn store(&self) -> RecipeStore {
        RecipeStore::from_recipes(self.recipes())
    }
}
