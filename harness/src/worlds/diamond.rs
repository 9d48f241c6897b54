//! `Diamond`: a target with three top-level recipes over shared
//! intermediates.
//!
//! ```text
//!   Earth+Water → Mud ─┬─ Mud+Fire → Brick ─┬───────────── Brick+Clay  ┐
//!   Air+Earth → Dust ──┴─ Mud+Dust → Clay ──┼───────────── Stone+Clay  ├→ Golem
//!   Fire+Earth → Lava ── Lava+Water → Stone ┴───────────── Brick+Stone ┘
//! ```
//!
//! Shortest `Golem` is five steps (through `Brick + Clay` or `Brick + Stone`).

use alembic_kernel::Recipe;

use crate::contract::RecipeWorld;

pub struct Diamond;

impl RecipeWorld for Diamond {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "diamond"
    }

    fn recipes(&self) -> Vec<Recipe> {
        super::triples(&[
            ("Earth", "Water", "Mud"),
            ("Air", "Earth", "Dust"),
            ("Fire", "Earth", "Lava"),
            ("Mud", "Fire", "Brick"),
            ("Lava", "Water", "Stone"),
            ("Mud", "Dust", "Clay"),
            ("Brick", "Clay", "Golem"),
            ("Stone", "Clay", "Golem"),
            ("Brick", "Stone", "Golem"),
        ])
    }

    fn reachable_targets(&self) -> Vec<String> {
        ["Golem", "Clay", "Stone", "Brick"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}
