//! Shared helpers for alembic benchmark suites.
//!
//! A regime is a generated [`Layered`] recipe graph plus the target searched
//! in it. Every engine case runs against a fresh [`Searcher`] with the BFS
//! cache disabled, so repeated iterations measure search work rather than
//! cache lookups.

use std::sync::Arc;

use alembic_harness::contract::RecipeWorld;
use alembic_harness::policy::{build_searcher, PolicyConfig};
use alembic_harness::worlds::layered::Layered;
use alembic_kernel::RecipeStore;
use alembic_search::{SearchError, Searcher};

/// A named benchmark graph and its target.
pub struct Regime {
    pub name: &'static str,
    pub world: Layered,
    pub target: String,
}

impl Regime {
    #[must_use]
    pub fn new(name: &'static str, tiers: usize, width: usize) -> Self {
        Self {
            name,
            world: Layered::new(tiers, width),
            target: Layered::element(tiers, 0),
        }
    }

    #[must_use]
    pub fn store(&self) -> Arc<RecipeStore> {
        Arc::new(self.world.store())
    }
}

/// Narrow-and-deep, square and wide-and-shallow graphs.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    vec![
        Regime::new("deep", 12, 4),
        Regime::new("square", 8, 8),
        Regime::new("wide", 4, 24),
    ]
}

/// A searcher over `store` with the BFS path cache disabled.
///
/// # Panics
///
/// Panics if the policy fails validation. Benchmark setup failures are fatal.
#[must_use]
pub fn uncached_searcher(store: Arc<RecipeStore>) -> Searcher {
    let config = PolicyConfig {
        cache_bfs_paths: Some(false),
        ..PolicyConfig::default()
    };
    build_searcher(store, &config).expect("benchmark policy is valid")
}

/// What one engine call produced: returned path count, total steps and work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub paths: usize,
    pub steps: usize,
    pub nodes_visited: u64,
}

/// One engine entry point, uniformly callable.
pub struct EngineCase {
    pub name: &'static str,
    pub run: fn(&Searcher, &str) -> Result<Outcome, SearchError>,
}

/// Multi-path cases request this many paths.
pub const MULTI_COUNT: usize = 4;

/// All six entry points.
#[must_use]
pub fn engine_cases() -> Vec<EngineCase> {
    vec![
        EngineCase {
            name: "bfs/shortest",
            run: |s, t| s.find_path_bfs(t).map(Outcome::single),
        },
        EngineCase {
            name: "dfs/shortest",
            run: |s, t| s.find_path_dfs(t).map(Outcome::single),
        },
        EngineCase {
            name: "bds/shortest",
            run: |s, t| s.find_path_bds(t).map(Outcome::single),
        },
        EngineCase {
            name: "bfs/multiple",
            run: |s, t| s.find_multiple_paths_bfs(t, MULTI_COUNT).map(Outcome::multiple),
        },
        EngineCase {
            name: "dfs/multiple",
            run: |s, t| s.find_multiple_paths_dfs(t, MULTI_COUNT).map(Outcome::multiple),
        },
        EngineCase {
            name: "bds/multiple",
            run: |s, t| s.find_multiple_paths_bds(t, MULTI_COUNT).map(Outcome::multiple),
        },
    ]
}

impl Outcome {
    fn single(found: alembic_search::PathResult) -> Self {
        Self {
            paths: 1,
            steps: found.path.len(),
            nodes_visited: found.nodes_visited,
        }
    }

    fn multiple(found: alembic_search::MultiPathResult) -> Self {
        Self {
            paths: found.paths.len(),
            steps: found.paths.iter().map(alembic_kernel::RecipePath::len).sum(),
            nodes_visited: found.nodes_visited,
        }
    }
}
