//! Engine property lock tests.
//!
//! Proves, for all three engines over the built-in worlds:
//! 1. Base targets yield an empty path with zero work, in both modes
//! 2. BFS single paths are shortest in combination steps
//! 3. Every returned path is in valid construction order and ends at the target
//! 4. Unreachable targets fail as "not found" with a non-zero work counter
//! 5. Multi-path results are bounded by the request and by the target's
//!    top-level recipe count, and are pairwise distinct
//! 6. Multi-path workers stop once the requested count is collected
//! 7. The mud/brick scenario yields exact paths

use std::collections::BTreeSet;
use std::sync::Arc;

use alembic_harness::contract::RecipeWorld;
use alembic_harness::worlds::cyclic::Cyclic;
use alembic_harness::worlds::diamond::Diamond;
use alembic_harness::worlds::layered::Layered;
use alembic_harness::worlds::mud_brick::MudBrick;
use alembic_kernel::{Recipe, RecipePath, RecipeStore, BASE_ELEMENTS};
use alembic_search::{
    validate_construction_order, MultiPathResult, PathResult, SearchError, SearchPolicy, Searcher,
};

type Single = fn(&Searcher, &str) -> Result<PathResult, SearchError>;
type Multiple = fn(&Searcher, &str, usize) -> Result<MultiPathResult, SearchError>;

const SINGLE: [(&str, Single); 3] = [
    ("bfs", Searcher::find_path_bfs),
    ("dfs", Searcher::find_path_dfs),
    ("bds", Searcher::find_path_bds),
];

const MULTIPLE: [(&str, Multiple); 3] = [
    ("bfs", Searcher::find_multiple_paths_bfs),
    ("dfs", Searcher::find_multiple_paths_dfs),
    ("bds", Searcher::find_multiple_paths_bds),
];

fn worlds() -> Vec<Box<dyn RecipeWorld>> {
    vec![
        Box::new(MudBrick),
        Box::new(Diamond),
        Box::new(Cyclic),
        Box::new(Layered::new(4, 5)),
    ]
}

fn searcher(world: &dyn RecipeWorld) -> Searcher {
    Searcher::new(Arc::new(world.store()))
}

fn assert_valid(path: &RecipePath, target: &str, context: &str) {
    assert!(!path.is_empty(), "{context}: empty path for {target}");
    assert_eq!(
        path.final_recipe().map(|r| r.result.as_str()),
        Some(target),
        "{context}: path does not end at {target}"
    );
    if let Err(err) = validate_construction_order(path.as_slice(), target) {
        panic!("{context}: invalid construction order for {target}: {err}");
    }
}

// ---------------------------------------------------------------------------
// 1. Base targets
// ---------------------------------------------------------------------------

#[test]
fn base_targets_are_empty_paths_on_every_engine_and_mode() {
    let searcher = searcher(&Diamond);
    for base in BASE_ELEMENTS {
        for (name, find) in SINGLE {
            let found = find(&searcher, base).unwrap();
            assert!(found.path.is_empty(), "{name}:{base}");
            assert_eq!(found.nodes_visited, 0, "{name}:{base}");
        }
        for (name, find) in MULTIPLE {
            let found = find(&searcher, base, 3).unwrap();
            assert_eq!(found.paths, vec![RecipePath::empty()], "{name}:{base}");
            assert_eq!(found.nodes_visited, 0, "{name}:{base}");
        }
    }
}

// ---------------------------------------------------------------------------
// 2. BFS optimality
// ---------------------------------------------------------------------------

#[test]
fn bfs_paths_are_shortest() {
    let cases: [(&dyn RecipeWorld, &str, usize); 8] = [
        (&MudBrick, "Brick", 2),
        (&MudBrick, "Steam", 1),
        (&Diamond, "Golem", 5),
        (&Diamond, "Clay", 3),
        (&Diamond, "Stone", 2),
        (&Cyclic, "Energy", 1),
        (&Cyclic, "Plasma", 2),
        (&Cyclic, "Storm", 3),
    ];
    for (world, target, shortest) in cases {
        let found = searcher(world).find_path_bfs(target).unwrap();
        assert_eq!(found.path.len(), shortest, "{}:{target}", world.world_id());
    }
}

// ---------------------------------------------------------------------------
// 3. Construction order
// ---------------------------------------------------------------------------

#[test]
fn single_paths_are_valid_on_every_engine() {
    for world in worlds() {
        let searcher = searcher(world.as_ref());
        for target in world.reachable_targets() {
            for (name, find) in SINGLE {
                let found = find(&searcher, &target).unwrap();
                assert_valid(&found.path, &target, &format!("{}/{name}", world.world_id()));
            }
        }
    }
}

#[test]
fn multiple_paths_are_valid_on_every_engine() {
    for world in worlds() {
        let searcher = searcher(world.as_ref());
        for target in world.reachable_targets() {
            for (name, find) in MULTIPLE {
                let found = find(&searcher, &target, 4).unwrap();
                assert!(!found.paths.is_empty(), "{name}:{target}");
                for path in &found.paths {
                    assert_valid(path, &target, &format!("{}/{name}", world.world_id()));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Not found
// ---------------------------------------------------------------------------

#[test]
fn unreachable_targets_are_not_found_with_work_counted() {
    for world in worlds() {
        let searcher = searcher(world.as_ref());
        for target in world.unreachable_targets() {
            for (name, find) in SINGLE {
                let err = find(&searcher, &target).unwrap_err();
                assert!(err.is_not_found(), "{name}:{target}: {err:?}");
                assert!(err.nodes_visited() > 0, "{name}:{target}");
            }
            for (name, find) in MULTIPLE {
                let err = find(&searcher, &target, 3).unwrap_err();
                assert!(err.is_not_found(), "{name}:{target}: {err:?}");
            }
        }
    }
}

#[test]
fn zero_max_count_is_invalid_on_every_engine() {
    let searcher = searcher(&Diamond);
    for (name, find) in MULTIPLE {
        assert_eq!(
            find(&searcher, "Golem", 0),
            Err(SearchError::InvalidMaxCount { max_count: 0 }),
            "{name}"
        );
    }
}

// ---------------------------------------------------------------------------
// 5. Multi-path bounds and distinctness
// ---------------------------------------------------------------------------

#[test]
fn multiple_paths_are_bounded_and_distinct() {
    for world in worlds() {
        let store = Arc::new(world.store());
        let searcher = Searcher::new(Arc::clone(&store));
        for target in world.reachable_targets() {
            let top_level = store.recipes_producing(&target).unwrap().len();
            for max_count in [1, 2, 10] {
                for (name, find) in MULTIPLE {
                    let found = find(&searcher, &target, max_count).unwrap();
                    let context = format!("{name}:{target} n={max_count}");
                    assert!(found.paths.len() <= max_count, "{context}");
                    assert!(found.paths.len() <= top_level, "{context}");
                    let ids: BTreeSet<_> = found.paths.iter().map(RecipePath::path_id).collect();
                    assert_eq!(ids.len(), found.paths.len(), "{context}: duplicate path ids");
                }
            }
        }
    }
}

#[test]
fn diamond_golem_yields_one_path_per_top_level_recipe() {
    let searcher = searcher(&Diamond);
    for find in [
        Searcher::find_multiple_paths_bfs as Multiple,
        Searcher::find_multiple_paths_dfs,
    ] {
        let found = find(&searcher, "Golem", 3).unwrap();
        let finals: BTreeSet<_> = found
            .paths
            .iter()
            .filter_map(|p| p.final_recipe().map(Recipe::key))
            .collect();
        assert_eq!(finals.len(), 3);
    }
}

#[test]
fn dfs_and_bds_multiple_paths_sorted_by_length() {
    let searcher = searcher(&Diamond);
    for find in [
        Searcher::find_multiple_paths_dfs as Multiple,
        Searcher::find_multiple_paths_bds,
    ] {
        let found = find(&searcher, "Golem", 3).unwrap();
        let lengths: Vec<usize> = found.paths.iter().map(RecipePath::len).collect();
        let mut sorted = lengths.clone();
        sorted.sort_unstable();
        assert_eq!(lengths, sorted);
    }
}

// ---------------------------------------------------------------------------
// 6. Early stop
// ---------------------------------------------------------------------------

/// Ten first-tier elements from the base pairs, and a `Hub` with nine
/// top-level recipes over neighbouring pairs of them.
fn hub_store() -> RecipeStore {
    let mut pairs = Vec::new();
    for (i, a) in BASE_ELEMENTS.iter().enumerate() {
        for b in &BASE_ELEMENTS[i..] {
            pairs.push((*a, *b));
        }
    }
    let mut recipes: Vec<Recipe> = pairs
        .iter()
        .enumerate()
        .map(|(k, (a, b))| Recipe::new(*a, *b, format!("P{k}")))
        .collect();
    for k in 0..pairs.len() - 1 {
        recipes.push(Recipe::new(format!("P{k}"), format!("P{}", k + 1), "Hub"));
    }
    RecipeStore::from_recipes(recipes)
}

/// One worker thread per engine and no BFS cache, so the work counter only
/// reflects jobs run by this call.
fn serial_searcher() -> Searcher {
    let policy = SearchPolicy {
        bfs_pool_threads: 1,
        dfs_workers: 1,
        cache_bfs_paths: false,
        ..SearchPolicy::default()
    };
    Searcher::with_policy(Arc::new(hub_store()), policy).unwrap()
}

#[test]
fn multi_path_workers_stop_when_collector_fills() {
    assert_eq!(hub_store().recipes_producing("Hub").unwrap().len(), 9);
    for (name, find) in [
        ("bfs", Searcher::find_multiple_paths_bfs as Multiple),
        ("dfs", Searcher::find_multiple_paths_dfs),
    ] {
        let few = find(&serial_searcher(), "Hub", 2).unwrap();
        let all = find(&serial_searcher(), "Hub", 9).unwrap();
        assert_eq!(few.paths.len(), 2, "{name}");
        assert_eq!(all.paths.len(), 9, "{name}");
        assert!(
            few.nodes_visited < all.nodes_visited,
            "{name}: {} nodes for 2 paths, {} for 9",
            few.nodes_visited,
            all.nodes_visited
        );
    }
}

// ---------------------------------------------------------------------------
// 7. Mud/brick scenario
// ---------------------------------------------------------------------------

#[test]
fn mud_brick_exact_bfs_paths() {
    let searcher = searcher(&MudBrick);
    assert_eq!(
        searcher.find_path_bfs("Brick").unwrap().path.as_slice(),
        [
            Recipe::new("Air", "Earth", "Mud"),
            Recipe::new("Mud", "Fire", "Brick"),
        ]
    );
    assert_eq!(
        searcher.find_path_bfs("Steam").unwrap().path.as_slice(),
        [Recipe::new("Air", "Water", "Steam")]
    );
    let err = searcher.find_path_bfs("Stone").unwrap_err();
    assert!(matches!(err, SearchError::NotFound { .. }));
    assert!(err.nodes_visited() > 0);
}

#[test]
fn bfs_repeated_call_returns_identical_path() {
    let searcher = searcher(&Diamond);
    let first = searcher.find_path_bfs("Golem").unwrap();
    let second = searcher.find_path_bfs("Golem").unwrap();
    assert_eq!(first.path, second.path);
}
