//! Forward breadth-first search.
//!
//! [`Expansion`] is the level-order frontier shared by the single-path search,
//! the multi-path workers and the bidirectional engine's completion step. It
//! starts from the base elements; each dequeued element is paired with every
//! element discovered so far (itself included), and each untried pair is
//! looked up in the store's pair index. The first recipe to produce an
//! element becomes its parent.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alembic_kernel::recipe::normalize_pair;
use alembic_kernel::{is_base_element, Recipe, RecipePath, RecipeStore, BASE_ELEMENTS};
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

use crate::cancel::CancellationToken;
use crate::collector::{Offer, PathCollector};
use crate::error::SearchError;
use crate::order::{BuildOrder, BuildRanks, ElementOrder};
use crate::path::linearize;
use crate::pool::{lock, run_bounded, Flow};
use crate::searcher::{MultiPathResult, PathResult, Searcher};

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Why an expansion stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Halt {
    /// Every goal element is discovered.
    Reached,
    /// The frontier emptied first.
    Exhausted,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct Diversity {
    percent: u8,
    seed: u64,
}

pub(crate) struct Expansion<'s> {
    store: &'s RecipeStore,
    order: ElementOrder,
    queue: VecDeque<String>,
    discovered: BTreeSet<String>,
    depth: HashMap<String, usize>,
    /// Discovery sequence number; parents always point to lower numbers.
    sequence: HashMap<String, usize>,
    parent: HashMap<String, Recipe>,
    tried: HashSet<(String, String)>,
    /// Results never recorded as discovered.
    blocked: Option<String>,
    diversity: Option<Diversity>,
    /// Linearization tie-break used by [`Expansion::reconstruct`].
    build: BuildOrder,
    nodes: u64,
}

impl<'s> Expansion<'s> {
    pub(crate) fn new(store: &'s RecipeStore, order: ElementOrder) -> Self {
        let mut expansion = Self {
            store,
            order,
            queue: VecDeque::new(),
            discovered: BTreeSet::new(),
            depth: HashMap::new(),
            sequence: HashMap::new(),
            parent: HashMap::new(),
            tried: HashSet::new(),
            blocked: None,
            diversity: None,
            build: BuildOrder::DepthThenDependents,
            nodes: 0,
        };
        for base in BASE_ELEMENTS {
            expansion.mark_discovered(base, 0);
        }
        expansion
    }

    /// Never discover `element`; recipes producing it are skipped.
    pub(crate) fn blocking(mut self, element: &str) -> Self {
        self.blocked = Some(element.to_owned());
        self
    }

    /// Let later-found recipes replace recorded parents, with a pseudo-random
    /// chance of `percent` per candidate derived from `seed`.
    pub(crate) fn with_diversity(mut self, percent: u8, seed: u64) -> Self {
        if percent > 0 {
            self.diversity = Some(Diversity { percent, seed });
        }
        self
    }

    pub(crate) fn with_build_order(mut self, build: BuildOrder) -> Self {
        self.build = build;
        self
    }

    pub(crate) fn nodes(&self) -> u64 {
        self.nodes
    }

    fn mark_discovered(&mut self, element: &str, depth: usize) {
        let sequence = self.discovered.len();
        self.discovered.insert(element.to_owned());
        self.depth.insert(element.to_owned(), depth);
        self.sequence.insert(element.to_owned(), sequence);
        self.queue.push_back(element.to_owned());
    }

    fn goals_met(&self, goals: &[&str]) -> bool {
        goals.iter().all(|goal| self.discovered.contains(*goal))
    }

    /// Discovered elements in this expansion's partner order.
    fn partners(&self) -> Vec<String> {
        let mut partners: Vec<String> = self.discovered.iter().cloned().collect();
        if self.order != ElementOrder::Alphabetical {
            partners.sort_by(|a, b| self.order.compare(a, b, &self.depth));
        }
        partners
    }

    /// Expand level by level until every goal is discovered.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Uninitialized`] if the store is not loaded.
    pub(crate) fn run(
        &mut self,
        goals: &[&str],
        cancel: Option<&CancellationToken>,
    ) -> Result<Halt, SearchError> {
        if self.goals_met(goals) {
            return Ok(Halt::Reached);
        }
        let store = self.store;

        while let Some(current) = self.queue.pop_front() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Ok(Halt::Cancelled);
            }
            self.nodes += 1;
            if store.recipes_consuming(&current)?.is_empty() {
                continue;
            }
            let current_depth = self.depth.get(&current).copied().unwrap_or(0);

            for other in self.partners() {
                let (a, b) = normalize_pair(&current, &other);
                if !self.tried.insert((a.to_owned(), b.to_owned())) {
                    continue;
                }
                for recipe in store.recipes_combining(&current, &other)? {
                    if self.blocked.as_deref() == Some(recipe.result.as_str()) {
                        continue;
                    }
                    if self.discovered.contains(&recipe.result) {
                        self.maybe_override(recipe);
                        continue;
                    }
                    self.mark_discovered(&recipe.result, current_depth + 1);
                    self.parent.insert(recipe.result.clone(), recipe.clone());
                    if goals.contains(&recipe.result.as_str()) && self.goals_met(goals) {
                        return Ok(Halt::Reached);
                    }
                }
            }
        }
        Ok(Halt::Exhausted)
    }

    fn maybe_override(&mut self, recipe: &Recipe) {
        let Some(Diversity { percent, seed }) = self.diversity else {
            return;
        };
        if is_base_element(&recipe.result) {
            return;
        }
        let Some(&result_seq) = self.sequence.get(&recipe.result) else {
            return;
        };
        let earlier = recipe.ingredients().iter().all(|ingredient| {
            self.sequence
                .get(*ingredient)
                .is_some_and(|&seq| seq < result_seq)
        });
        let key = recipe.key();
        let roll = xxh3_64_with_seed(key.as_str().as_bytes(), seed) % 100;
        if earlier && roll < u64::from(percent) {
            self.parent.insert(recipe.result.clone(), recipe.clone());
        }
    }

    /// Recipes reachable backward from `roots` through the parent map.
    fn ancestry(&self, roots: &[&str]) -> Vec<Recipe> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = roots.to_vec();
        let mut recipes = Vec::new();
        while let Some(element) = stack.pop() {
            if !seen.insert(element) {
                continue;
            }
            if let Some(recipe) = self.parent.get(element) {
                stack.push(&recipe.ingredient1);
                stack.push(&recipe.ingredient2);
                recipes.push(recipe.clone());
            }
        }
        recipes
    }

    /// Build-ordered path to `target`, either through its recorded parent or
    /// through `final_recipe` when given.
    pub(crate) fn reconstruct(&self, target: &str, final_recipe: Option<&Recipe>) -> Option<Vec<Recipe>> {
        let mut depth = self.depth.clone();
        let recipes = match final_recipe {
            Some(last) => {
                let mut recipes = self.ancestry(&last.ingredients());
                recipes.push(last.clone());
                let top = last
                    .ingredients()
                    .iter()
                    .map(|i| depth.get(*i).copied().unwrap_or(0))
                    .max()
                    .unwrap_or(0);
                depth.insert(target.to_owned(), top + 1);
                recipes
            }
            None => self.ancestry(&[target]),
        };
        let ranks = BuildRanks::from_recipes(&recipes, depth);
        linearize(&recipes, target, self.build, &ranks)
    }
}

// ---------------------------------------------------------------------------
// Single path
// ---------------------------------------------------------------------------

/// Shortest path by combination steps, or the cached path for `target`.
pub(crate) fn find_path(searcher: &Searcher, target: &str) -> Result<PathResult, SearchError> {
    if let Some(path) = searcher.cached_bfs_path(target) {
        debug!(target = %target, steps = path.len(), "bfs cache hit");
        return Ok(PathResult {
            path,
            nodes_visited: 0,
        });
    }
    let found = shortest(searcher.store(), target, None)?;
    searcher.cache_bfs_path(target, &found.path);
    Ok(found)
}

/// Uncached shortest path. A cancelled expansion reports
/// [`SearchError::NotFound`] with the work done so far.
pub(crate) fn shortest(
    store: &RecipeStore,
    target: &str,
    cancel: Option<&CancellationToken>,
) -> Result<PathResult, SearchError> {
    let mut expansion = Expansion::new(store, ElementOrder::Alphabetical);
    let halt = expansion.run(&[target], cancel)?;
    let nodes_visited = expansion.nodes();
    if halt != Halt::Reached {
        debug!(target = %target, nodes_visited, ?halt, "bfs frontier stopped");
        return Err(SearchError::NotFound {
            target: target.to_owned(),
            nodes_visited,
        });
    }

    let recipes = expansion
        .reconstruct(target, None)
        .ok_or_else(|| SearchError::Reconstruction {
            target: target.to_owned(),
            nodes_visited,
        })?;
    let path = RecipePath::new(recipes);
    debug!(target = %target, nodes_visited, steps = path.len(), "bfs path found");
    Ok(PathResult {
        path,
        nodes_visited,
    })
}

// ---------------------------------------------------------------------------
// Multiple paths
// ---------------------------------------------------------------------------

enum Job<'a> {
    /// Realize one assigned top-level recipe.
    Combo {
        recipe: &'a Recipe,
        order: ElementOrder,
    },
    /// Free-roaming search for the target with parent overrides.
    Explore {
        order: ElementOrder,
        build: BuildOrder,
        seed: u64,
    },
}

/// Up to `max_count` paths, each ending in a different top-level recipe.
pub(crate) fn find_multiple(
    searcher: &Searcher,
    target: &str,
    max_count: usize,
) -> Result<MultiPathResult, SearchError> {
    let store = searcher.store();
    let policy = searcher.policy();
    let combos = store.recipes_producing(target)?;
    let limit = max_count.min(combos.len());

    let seed = find_path(searcher, target)?;
    if limit <= 1 {
        return Ok(MultiPathResult {
            paths: vec![seed.path],
            nodes_visited: seed.nodes_visited,
        });
    }

    // A recipe consuming the target cannot be its first production.
    let eligible: Vec<&Recipe> = combos.iter().filter(|r| !r.uses(target)).collect();
    let nodes = AtomicU64::new(seed.nodes_visited);
    let collector = Mutex::new(PathCollector::new(limit).distinct_final_recipes());
    lock(&collector).offer(seed.path);

    let hash_seed = xxh3_64(target.as_bytes());
    let mut jobs = Vec::new();
    {
        let accepted = lock(&collector);
        for (index, &recipe) in eligible.iter().enumerate() {
            if accepted.is_satisfied(&recipe.key()) {
                continue;
            }
            for worker in 0..policy.bfs_workers_per_recipe {
                jobs.push(Job::Combo {
                    recipe,
                    order: ElementOrder::for_worker(worker + index, hash_seed),
                });
            }
        }
    }
    for index in 0..policy.bfs_explorer_workers {
        jobs.push(Job::Explore {
            order: ElementOrder::for_worker(index, hash_seed),
            build: BuildOrder::for_explorer(index),
            seed: hash_seed.wrapping_add(index as u64),
        });
    }

    let cancel = CancellationToken::new();
    let done = |accepted: &PathCollector| {
        accepted.is_full() || accepted.satisfied_count() >= eligible.len()
    };
    if done(&*lock(&collector)) {
        cancel.cancel();
    }

    run_bounded(
        policy.bfs_pool_threads,
        jobs,
        &cancel,
        |job, cancel| {
            let outcome = match job {
                Job::Combo { recipe, order } => {
                    if lock(&collector).is_satisfied(&recipe.key()) {
                        return None;
                    }
                    realize_combo(store, target, recipe, order, cancel)
                }
                Job::Explore { order, build, seed } => explore(
                    store,
                    target,
                    (order, build),
                    policy.diversity_override_percent,
                    seed,
                    cancel,
                ),
            };
            match outcome {
                Ok((path, spent)) => {
                    nodes.fetch_add(spent, Ordering::Relaxed);
                    path
                }
                Err(err) => {
                    debug!(target = %target, error = %err, "bfs worker failed");
                    None
                }
            }
        },
        |path| {
            let mut accepted = lock(&collector);
            let id = path.path_id().digest();
            if accepted.offer(path) == Offer::Accepted {
                debug!(target = %target, path_id = %id, "bfs path accepted");
            }
            if done(&*accepted) {
                Flow::Stop
            } else {
                Flow::Continue
            }
        },
    );

    let paths = collector
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .into_paths();
    let nodes_visited = nodes.load(Ordering::Relaxed);
    if paths.len() < limit {
        warn!(
            target = %target,
            found = paths.len(),
            requested = limit,
            "bfs multi-path search covered fewer recipes than requested"
        );
    }
    info!(target = %target, found = paths.len(), nodes_visited, "bfs multi-path search complete");
    Ok(MultiPathResult {
        paths,
        nodes_visited,
    })
}

fn realize_combo(
    store: &RecipeStore,
    target: &str,
    combo: &Recipe,
    order: ElementOrder,
    cancel: &CancellationToken,
) -> Result<(Option<RecipePath>, u64), SearchError> {
    let mut expansion = Expansion::new(store, order).blocking(target);
    let goals = combo.ingredients();
    let halt = expansion.run(&goals, Some(cancel))?;
    let path = (halt == Halt::Reached)
        .then(|| expansion.reconstruct(target, Some(combo)))
        .flatten()
        .map(RecipePath::new);
    Ok((path, expansion.nodes()))
}

fn explore(
    store: &RecipeStore,
    target: &str,
    (order, build): (ElementOrder, BuildOrder),
    percent: u8,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<(Option<RecipePath>, u64), SearchError> {
    let mut expansion = Expansion::new(store, order)
        .with_diversity(percent, seed)
        .with_build_order(build);
    let halt = expansion.run(&[target], Some(cancel))?;
    let path = (halt == Halt::Reached)
        .then(|| expansion.reconstruct(target, None))
        .flatten()
        .map(RecipePath::new);
    Ok((path, expansion.nodes()))
}
