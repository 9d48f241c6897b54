//! `Layered`: a generated tiered recipe graph for scale tests and benchmarks.
//!
//! Tier 0 is the four base elements. Element `j` of tier `t` (named `T{t}E{j}`)
//! has two recipes over tier `t - 1`: `prev[j] + prev[j+1]` and
//! `prev[j] + prev[j+2]` (indices wrap). Every element is reachable, and
//! elements of tier `t` sit at combination depth `t`.

use alembic_kernel::{Recipe, BASE_ELEMENTS};

use crate::contract::RecipeWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layered {
    pub tiers: usize,
    pub width: usize,
}

impl Default for Layered {
    fn default() -> Self {
        Self { tiers: 6, width: 8 }
    }
}

impl Layered {
    #[must_use]
    pub fn new(tiers: usize, width: usize) -> Self {
        Self {
            tiers: tiers.max(1),
            width: width.max(1),
        }
    }

    #[must_use]
    pub fn element(tier: usize, index: usize) -> String {
        format!("T{tier}E{index}")
    }

    fn tier(&self, tier: usize) -> Vec<String> {
        if tier == 0 {
            return BASE_ELEMENTS.iter().map(|&b| b.to_owned()).collect();
        }
        (0..self.width).map(|j| Self::element(tier, j)).collect()
    }
}

impl RecipeWorld for Layered {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "layered"
    }

    fn recipes(&self) -> Vec<Recipe> {
        let mut recipes = Vec::with_capacity(self.tiers * self.width * 2);
        for tier in 1..=self.tiers {
            let prev = self.tier(tier - 1);
            let n = prev.len();
            for j in 0..self.width {
                let result = Self::element(tier, j);
                let a = &prev[j % n];
                recipes.push(Recipe::new(a.clone(), prev[(j + 1) % n].clone(), result.clone()));
                recipes.push(Recipe::new(a.clone(), prev[(j + 2) % n].clone(), result));
            }
        }
        recipes
    }

    fn reachable_targets(&self) -> Vec<String> {
        self.tier(self.tiers)
    }

    fn unreachable_targets(&self) -> Vec<String> {
        vec![Self::element(self.tiers + 1, 0)]
    }
}
