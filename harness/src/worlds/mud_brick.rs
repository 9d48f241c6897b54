//! `MudBrick`: three recipes, two reachable targets and one absent element.

use alembic_kernel::Recipe;

use crate::contract::RecipeWorld;

/// `Air + Earth => Mud`, `Mud + Fire => Brick`, `Air + Water => Steam`.
pub struct MudBrick;

impl RecipeWorld for MudBrick {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "mud_brick"
    }

    fn recipes(&self) -> Vec<Recipe> {
        super::triples(&[
            ("Air", "Earth", "Mud"),
            ("Mud", "Fire", "Brick"),
            ("Air", "Water", "Steam"),
        ])
    }

    fn reachable_targets(&self) -> Vec<String> {
        vec!["Brick".into(), "Mud".into(), "Steam".into()]
    }

    fn unreachable_targets(&self) -> Vec<String> {
        vec!["Stone".into()]
    }
}
