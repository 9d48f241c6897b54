//! `Cyclic`: recipes whose results feed back into their own ingredients.
//!
//! `Energy` and `Plasma` form a reachable cycle (`Plasma + Energy => Energy`).
//! `Phantom` and `Shade` form a cycle with no entry from the base elements,
//! and `Shade + Shade => Shade` references itself.

use alembic_kernel::Recipe;

use crate::contract::RecipeWorld;

pub struct Cyclic;

impl RecipeWorld for Cyclic {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "cyclic"
    }

    fn recipes(&self) -> Vec<Recipe> {
        super::triples(&[
            ("Fire", "Fire", "Energy"),
            ("Energy", "Air", "Plasma"),
            ("Plasma", "Energy", "Energy"),
            ("Plasma", "Water", "Storm"),
            ("Phantom", "Air", "Shade"),
            ("Shade", "Water", "Phantom"),
            ("Shade", "Shade", "Shade"),
        ])
    }

    fn reachable_targets(&self) -> Vec<String> {
        vec!["Energy".into(), "Plasma".into(), "Storm".into()]
    }

    fn unreachable_targets(&self) -> Vec<String> {
        vec!["Phantom".into(), "Shade".into()]
    }
}
