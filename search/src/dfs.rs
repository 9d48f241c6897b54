//! Bottom-up recursive construction ("DFS").
//!
//! Not visit-order DFS: to build an element, the session tries each producing
//! recipe, recursively builds whichever ingredients are not yet available
//! (first ingredient, then second, threading availability forward), and keeps
//! the shortest complete candidate. Successful sub-paths are memoized per
//! element and revalidated against the current availability before reuse.
//!
//! Recursion is bounded three ways: a per-branch visited set, a depth cap and
//! a per-call budget. Hitting any of them fails the branch rather than the
//! process.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use alembic_kernel::{is_base_element, Recipe, RecipePath, RecipeStore};
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::collector::{Offer, PathCollector};
use crate::error::SearchError;
use crate::order::RecipePriority;
use crate::path::{dedup_recipes, validate_construction_order};
use crate::policy::SearchPolicy;
use crate::pool::{lock, read, run_bounded, write, Flow};
use crate::searcher::{MultiPathResult, PathResult, Searcher};

// ---------------------------------------------------------------------------
// Memoization
// ---------------------------------------------------------------------------

/// The two per-call caches: "is this element constructible" and "best known
/// path to this element".
trait Memo {
    fn creatable(&self, element: &str) -> Option<bool>;
    fn set_creatable(&self, element: &str, creatable: bool);
    fn path(&self, element: &str) -> Option<Vec<Recipe>>;
    fn set_path(&self, element: &str, path: &[Recipe]);
}

/// Single-threaded memo for the single-path search.
#[derive(Default)]
struct LocalMemo {
    creatable: RefCell<HashMap<String, bool>>,
    paths: RefCell<HashMap<String, Vec<Recipe>>>,
}

impl Memo for LocalMemo {
    fn creatable(&self, element: &str) -> Option<bool> {
        self.creatable.borrow().get(element).copied()
    }

    fn set_creatable(&self, element: &str, creatable: bool) {
        self.creatable.borrow_mut().insert(element.to_owned(), creatable);
    }

    fn path(&self, element: &str) -> Option<Vec<Recipe>> {
        self.paths.borrow().get(element).cloned()
    }

    fn set_path(&self, element: &str, path: &[Recipe]) {
        self.paths.borrow_mut().insert(element.to_owned(), path.to_vec());
    }
}

/// Memo shared by the multi-path workers.
#[derive(Default)]
struct SharedMemo {
    creatable: RwLock<HashMap<String, bool>>,
    paths: RwLock<HashMap<String, Vec<Recipe>>>,
}

impl Memo for SharedMemo {
    fn creatable(&self, element: &str) -> Option<bool> {
        read(&self.creatable).get(element).copied()
    }

    fn set_creatable(&self, element: &str, creatable: bool) {
        write(&self.creatable).insert(element.to_owned(), creatable);
    }

    fn path(&self, element: &str) -> Option<Vec<Recipe>> {
        read(&self.paths).get(element).cloned()
    }

    fn set_path(&self, element: &str, path: &[Recipe]) {
        write(&self.paths).insert(element.to_owned(), path.to_vec());
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct DfsSession<'a, M> {
    store: &'a RecipeStore,
    policy: &'a SearchPolicy,
    memo: &'a M,
    calls: &'a AtomicU64,
    cancel: Option<&'a CancellationToken>,
}

impl<M: Memo> DfsSession<'_, M> {
    /// Count one recursive call. `false` once the budget is spent or the
    /// search is cancelled.
    fn tick(&self) -> bool {
        let calls = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        calls <= self.policy.max_dfs_calls && !self.cancel.is_some_and(CancellationToken::is_cancelled)
    }

    fn nodes(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Whether any recipe chain builds `element` from the base elements.
    ///
    /// Below `cycle_revisit_depth` a branch may pass through an element it
    /// is already expanding; deeper revisits count as failure.
    fn is_creatable(
        &self,
        element: &str,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> Result<bool, SearchError> {
        if !self.tick() || depth > self.policy.max_dfs_depth {
            return Ok(false);
        }
        if is_base_element(element) {
            return Ok(true);
        }
        if let Some(known) = self.memo.creatable(element) {
            return Ok(known);
        }
        if depth > self.policy.cycle_revisit_depth && visited.contains(element) {
            return Ok(false);
        }

        let inserted = visited.insert(element.to_owned());
        let mut creatable = false;
        for recipe in self.store.recipes_producing(element)? {
            if self.is_creatable(&recipe.ingredient1, visited, depth + 1)?
                && self.is_creatable(&recipe.ingredient2, visited, depth + 1)?
            {
                creatable = true;
                break;
            }
        }
        if inserted {
            visited.remove(element);
        }
        self.memo.set_creatable(element, creatable);
        Ok(creatable)
    }

    /// Construction path for `target` given already-available elements.
    ///
    /// `Some(vec![])` if `target` is base or available; `None` if no recipe
    /// chain resolves on this branch.
    fn build(
        &self,
        target: &str,
        available: &HashSet<String>,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> Result<Option<Vec<Recipe>>, SearchError> {
        if !self.tick() || depth > self.policy.max_dfs_depth {
            return Ok(None);
        }
        if is_base_element(target) || available.contains(target) {
            return Ok(Some(Vec::new()));
        }
        if visited.contains(target) {
            return Ok(None);
        }
        if let Some(cached) = self.memo.path(target) {
            if fits(&cached, available) && !produces_any(&cached, visited) {
                return Ok(Some(cached));
            }
        }

        visited.insert(target.to_owned());
        let best = self.best_candidate(target, available, visited, depth);
        visited.remove(target);

        if let Ok(Some(path)) = &best {
            self.memo.set_path(target, path);
        }
        best
    }

    fn best_candidate(
        &self,
        target: &str,
        available: &HashSet<String>,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> Result<Option<Vec<Recipe>>, SearchError> {
        let producing = self.store.recipes_producing(target)?;
        let mut best: Option<Vec<Recipe>> = None;

        'recipes: for recipe in RecipePriority::new(available).sorted(producing) {
            let mut have = available.clone();
            let mut candidate = Vec::new();
            for ingredient in recipe.ingredients() {
                if is_base_element(ingredient) || have.contains(ingredient) {
                    continue;
                }
                let Some(sub) = self.build(ingredient, &have, visited, depth + 1)? else {
                    continue 'recipes;
                };
                have.extend(sub.iter().map(|r| r.result.clone()));
                candidate.extend(sub);
            }
            if !recipe
                .ingredients()
                .iter()
                .all(|i| is_base_element(i) || have.contains(*i))
            {
                continue;
            }
            candidate.push(recipe.clone());
            let shorter = match &best {
                Some(current) => candidate.len() < current.len(),
                None => true,
            };
            if shorter {
                best = Some(candidate);
            }
        }
        Ok(best)
    }

    /// Deduplicated, validated construction path for `target`.
    fn solve(&self, target: &str) -> Result<Option<Vec<Recipe>>, SearchError> {
        let built = self.build(target, &HashSet::new(), &mut HashSet::new(), 0)?;
        Ok(built.map(dedup_recipes))
    }

    /// A path that ends with `recipe`, building both ingredients from
    /// scratch. Ingredient sub-paths never produce `target` themselves.
    fn alternate(&self, target: &str, recipe: &Recipe) -> Result<Option<RecipePath>, SearchError> {
        for ingredient in recipe.ingredients() {
            if !self.is_creatable(ingredient, &mut HashSet::new(), 0)? {
                return Ok(None);
            }
        }

        let mut have: HashSet<String> = HashSet::new();
        let mut path = Vec::new();
        for ingredient in recipe.ingredients() {
            if is_base_element(ingredient) || have.contains(ingredient) {
                continue;
            }
            let mut visited = HashSet::from([target.to_owned()]);
            let Some(sub) = self.build(ingredient, &have, &mut visited, 0)? else {
                return Ok(None);
            };
            have.extend(sub.iter().map(|r| r.result.clone()));
            path.extend(sub);
        }
        path.push(recipe.clone());

        let path = dedup_recipes(path);
        if let Err(violation) = validate_construction_order(&path, target) {
            warn!(target = %target, recipe = %recipe, %violation, "discarding invalid dfs alternate");
            return Ok(None);
        }
        Ok(Some(RecipePath::new(path)))
    }
}

/// Whether `path` applies in order given `available` plus the base elements.
fn fits(path: &[Recipe], available: &HashSet<String>) -> bool {
    let mut made: HashSet<&str> = HashSet::new();
    path.iter().all(|recipe| {
        let ready = recipe
            .ingredients()
            .iter()
            .all(|i| is_base_element(i) || available.contains(*i) || made.contains(i));
        made.insert(&recipe.result);
        ready
    })
}

/// Whether any step of `path` produces an element in `elements`.
fn produces_any(path: &[Recipe], elements: &HashSet<String>) -> bool {
    path.iter().any(|recipe| elements.contains(&recipe.result))
}

fn checked(path: Vec<Recipe>, target: &str, nodes_visited: u64) -> Result<RecipePath, SearchError> {
    if let Err(violation) = validate_construction_order(&path, target) {
        warn!(target = %target, %violation, "dfs produced an invalid path");
        return Err(SearchError::Reconstruction {
            target: target.to_owned(),
            nodes_visited,
        });
    }
    Ok(RecipePath::new(path))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub(crate) fn find_path(searcher: &Searcher, target: &str) -> Result<PathResult, SearchError> {
    let memo = LocalMemo::default();
    let calls = AtomicU64::new(0);
    let session = DfsSession {
        store: searcher.store(),
        policy: searcher.policy(),
        memo: &memo,
        calls: &calls,
        cancel: None,
    };

    let solved = session.solve(target)?;
    let nodes_visited = session.nodes();
    let Some(path) = solved else {
        debug!(target = %target, nodes_visited, "dfs found no recipe chain");
        return Err(SearchError::NotFound {
            target: target.to_owned(),
            nodes_visited,
        });
    };
    let path = checked(path, target, nodes_visited)?;
    debug!(target = %target, nodes_visited, steps = path.len(), "dfs path found");
    Ok(PathResult {
        path,
        nodes_visited,
    })
}

pub(crate) fn find_multiple(
    searcher: &Searcher,
    target: &str,
    max_count: usize,
) -> Result<MultiPathResult, SearchError> {
    let memo = SharedMemo::default();
    let calls = AtomicU64::new(0);
    let cancel = CancellationToken::new();
    let session = DfsSession {
        store: searcher.store(),
        policy: searcher.policy(),
        memo: &memo,
        calls: &calls,
        cancel: Some(&cancel),
    };

    let Some(optimal) = session.solve(target)? else {
        return Err(SearchError::NotFound {
            target: target.to_owned(),
            nodes_visited: session.nodes(),
        });
    };
    let optimal = checked(optimal, target, session.nodes())?;
    if max_count == 1 {
        return Ok(MultiPathResult {
            paths: vec![optimal],
            nodes_visited: session.nodes(),
        });
    }

    let optimal_final = optimal.final_recipe().map(Recipe::key);
    let alternates: Vec<&Recipe> = searcher
        .store()
        .recipes_producing(target)?
        .iter()
        .filter(|r| Some(r.key()) != optimal_final && !r.uses(target))
        .collect();

    let collector = Mutex::new(PathCollector::new(max_count).distinct_final_recipes());
    lock(&collector).offer(optimal);

    let session = &session;
    run_bounded(
        searcher.policy().dfs_workers,
        alternates,
        &cancel,
        |recipe, _| match session.alternate(target, recipe) {
            Ok(path) => path,
            Err(err) => {
                debug!(target = %target, error = %err, "dfs alternate failed");
                None
            }
        },
        |path| {
            let mut accepted = lock(&collector);
            if accepted.offer(path) == Offer::Accepted {
                debug!(target = %target, found = accepted.len(), "dfs alternate accepted");
            }
            if accepted.is_full() {
                Flow::Stop
            } else {
                Flow::Continue
            }
        },
    );

    let mut paths = collector
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .into_paths();
    paths.sort_by_key(RecipePath::len);
    let nodes_visited = session.nodes();
    info!(target = %target, found = paths.len(), nodes_visited, "dfs multi-path search complete");
    Ok(MultiPathResult {
        paths,
        nodes_visited,
    })
}
