//! In-process determinism and concurrency lock tests.
//!
//! Single-path searches are fully deterministic: N fresh searchers produce
//! byte-identical reports. Multi-path searches run concurrently, so only
//! their invariants are locked: bounds, distinctness and validity hold on
//! every run, and concurrent callers sharing one searcher agree with a
//! serial caller.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use alembic_harness::contract::RecipeWorld;
use alembic_harness::request::{Algorithm, SearchRequest};
use alembic_harness::runner::run;
use alembic_harness::worlds::diamond::Diamond;
use alembic_harness::worlds::layered::Layered;
use alembic_kernel::{PathId, RecipeStore};
use alembic_search::{validate_construction_order, Searcher};

const RUNS: usize = 10;

fn report_digests(world: &dyn RecipeWorld, store: &Arc<RecipeStore>) -> Vec<String> {
    let searcher = Searcher::new(Arc::clone(store));
    let mut digests = Vec::new();
    for target in world.reachable_targets() {
        for algorithm in Algorithm::ALL {
            let report = run(&searcher, &SearchRequest::shortest(target.as_str(), algorithm)).unwrap();
            digests.push(report.digest().unwrap().as_str().to_owned());
        }
    }
    digests
}

#[test]
fn single_path_reports_identical_across_runs() {
    let world = Layered::new(5, 6);
    let store = Arc::new(world.store());
    let first = report_digests(&world, &store);
    for _ in 1..RUNS {
        assert_eq!(report_digests(&world, &store), first, "report digests differ across runs");
    }
}

#[test]
fn single_path_independent_of_recipe_input_order() {
    let world = Diamond;
    let forward = Arc::new(world.store());
    let mut reversed_recipes = world.recipes();
    reversed_recipes.reverse();
    let reversed = Arc::new(RecipeStore::from_recipes(reversed_recipes));

    assert_eq!(forward.digest().unwrap(), reversed.digest().unwrap());
    assert_eq!(report_digests(&world, &forward), report_digests(&world, &reversed));
}

#[test]
fn multi_path_invariants_hold_on_every_run() {
    let world = Layered::new(4, 6);
    let store = Arc::new(world.store());
    for _ in 0..RUNS {
        let searcher = Searcher::new(Arc::clone(&store));
        for target in world.reachable_targets() {
            for found in [
                searcher.find_multiple_paths_bfs(&target, 2).unwrap(),
                searcher.find_multiple_paths_dfs(&target, 2).unwrap(),
                searcher.find_multiple_paths_bds(&target, 2).unwrap(),
            ] {
                assert!(!found.paths.is_empty() && found.paths.len() <= 2);
                let ids: BTreeSet<PathId> = found.paths.iter().map(|p| p.path_id()).collect();
                assert_eq!(ids.len(), found.paths.len());
                for path in &found.paths {
                    assert!(validate_construction_order(path.as_slice(), &target).is_ok());
                }
            }
        }
    }
}

#[test]
fn shared_searcher_serves_concurrent_callers() {
    let world = Layered::new(4, 5);
    let searcher = Arc::new(Searcher::new(Arc::new(world.store())));
    let targets = world.reachable_targets();

    let serial: Vec<_> = targets
        .iter()
        .map(|t| searcher.find_path_dfs(t).unwrap().path)
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let searcher = Arc::clone(&searcher);
            let targets = targets.clone();
            thread::spawn(move || {
                targets
                    .iter()
                    .map(|t| {
                        let bfs = searcher.find_path_bfs(t).unwrap();
                        let bds = searcher.find_path_bds(t).unwrap();
                        assert!(validate_construction_order(bds.path.as_slice(), t).is_ok());
                        assert!(validate_construction_order(bfs.path.as_slice(), t).is_ok());
                        searcher.find_path_dfs(t).unwrap().path
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), serial);
    }
}

#[test]
fn cache_reset_does_not_change_results() {
    let world = Diamond;
    let searcher = Searcher::new(Arc::new(world.store()));
    let before: Vec<_> = world
        .reachable_targets()
        .iter()
        .map(|t| searcher.find_path_bds(t).unwrap().path)
        .collect();
    searcher.reset_caches();
    let after: Vec<_> = world
        .reachable_targets()
        .iter()
        .map(|t| searcher.find_path_bds(t).unwrap().path)
        .collect();
    assert_eq!(before, after);
}
