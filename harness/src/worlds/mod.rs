//! Built-in recipe worlds for tests, fixture binaries and benchmarks.

pub mod cyclic;
pub mod diamond;
pub mod layered;
pub mod mud_brick;

use crate::contract::RecipeWorld;

/// Identifiers accepted by [`by_id`]. `layered` resolves to its default size.
pub const WORLD_IDS: [&str; 4] = ["cyclic", "diamond", "layered", "mud_brick"];

/// Look up a built-in world by identifier.
#[must_use]
pub fn by_id(world_id: &str) -> Option<Box<dyn RecipeWorld>> {
    match world_id {
        "cyclic" => Some(Box::new(cyclic::Cyclic)),
        "diamond" => Some(Box::new(diamond::Diamond)),
        "layered" => Some(Box::new(layered::Layered::default())),
        "mud_brick" => Some(Box::new(mud_brick::MudBrick)),
        _ => None,
    }
}

pub(crate) fn triples(steps: &[(&str, &str, &str)]) -> Vec<alembic_kernel::Recipe> {
    steps
        .iter()
        .map(|&(a, b, result)| alembic_kernel::Recipe::new(a, b, result))
        .collect()
}
