//! Bidirectional search.
//!
//! A forward frontier grows from the base elements through the by-ingredient
//! index (a recipe fires once its other ingredient is also forward-visited);
//! a backward frontier grows from the target through the by-result index.
//! Each outer iteration advances one full level on each side. The first
//! element seen by both sides is the meeting element.
//!
//! Meeting alone does not yield a path: the meeting element need not lie on a
//! recipe chain compatible with the target's final recipe. The path is
//! completed from three parts: the meeting element's forward ancestry, BFS
//! sub-paths for the final recipe's remaining ingredients, and the final
//! recipe itself. Candidate final recipes are tried in turn until one
//! completes. The merged set is then linearized.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use alembic_kernel::{is_base_element, Recipe, RecipePath, RecipeStore, BASE_ELEMENTS};
use tracing::{debug, info};

use crate::bfs;
use crate::cancel::CancellationToken;
use crate::collector::PathCollector;
use crate::error::SearchError;
use crate::order::{BuildOrder, BuildRanks};
use crate::path::linearize;
use crate::pool::{run_bounded, Flow};
use crate::searcher::{MultiPathResult, PathResult, Searcher};

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Met(String),
    Exhausted,
    Cancelled,
}

#[derive(Default)]
struct Frontier {
    queue: VecDeque<String>,
    visited: HashSet<String>,
    /// Element → first recipe recorded for it on this side.
    parent: HashMap<String, Recipe>,
}

impl Frontier {
    fn seeded<'a>(elements: impl IntoIterator<Item = &'a str>) -> Self {
        let mut frontier = Self::default();
        for element in elements {
            frontier.visited.insert(element.to_owned());
            frontier.queue.push_back(element.to_owned());
        }
        frontier
    }
}

struct Meeting {
    forward: Frontier,
    backward: Frontier,
    nodes: u64,
}

impl Meeting {
    fn new(target: &str) -> Self {
        Self {
            forward: Frontier::seeded(BASE_ELEMENTS),
            backward: Frontier::seeded([target]),
            nodes: 0,
        }
    }

    fn search(
        &mut self,
        store: &RecipeStore,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome, SearchError> {
        while !self.forward.queue.is_empty() && !self.backward.queue.is_empty() {
            if let Some(outcome) = self.advance_forward(store, cancel)? {
                return Ok(outcome);
            }
            if let Some(outcome) = self.advance_backward(store, cancel)? {
                return Ok(outcome);
            }
        }
        Ok(Outcome::Exhausted)
    }

    /// Expand one forward level. `Some` on meeting or cancellation.
    fn advance_forward(
        &mut self,
        store: &RecipeStore,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<Outcome>, SearchError> {
        for _ in 0..self.forward.queue.len() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Ok(Some(Outcome::Cancelled));
            }
            let Some(current) = self.forward.queue.pop_front() else {
                break;
            };
            self.nodes += 1;
            if self.backward.visited.contains(&current) {
                return Ok(Some(Outcome::Met(current)));
            }
            for recipe in store.recipes_consuming(&current)? {
                let Some(other) = recipe.other_ingredient(&current) else {
                    continue;
                };
                if !self.forward.visited.contains(other) {
                    continue;
                }
                if self.forward.visited.insert(recipe.result.clone()) {
                    self.forward
                        .parent
                        .insert(recipe.result.clone(), recipe.clone());
                    self.forward.queue.push_back(recipe.result.clone());
                    if self.backward.visited.contains(&recipe.result) {
                        return Ok(Some(Outcome::Met(recipe.result.clone())));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Expand one backward level. `Some` on meeting or cancellation.
    fn advance_backward(
        &mut self,
        store: &RecipeStore,
        cancel: Option<&CancellationToken>,
    ) -> Result<Option<Outcome>, SearchError> {
        for _ in 0..self.backward.queue.len() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Ok(Some(Outcome::Cancelled));
            }
            let Some(current) = self.backward.queue.pop_front() else {
                break;
            };
            self.nodes += 1;
            if self.forward.visited.contains(&current) {
                return Ok(Some(Outcome::Met(current)));
            }
            for recipe in store.recipes_producing(&current)? {
                self.backward
                    .parent
                    .entry(current.clone())
                    .or_insert_with(|| recipe.clone());
                for ingredient in recipe.ingredients() {
                    if self.backward.visited.insert(ingredient.to_owned()) {
                        self.backward.queue.push_back(ingredient.to_owned());
                        if self.forward.visited.contains(ingredient) {
                            return Ok(Some(Outcome::Met(ingredient.to_owned())));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    /// Forward-parent recipes needed to build `element` from the bases.
    fn forward_ancestry(&self, element: &str) -> Vec<Recipe> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut stack = vec![element];
        let mut recipes = Vec::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(recipe) = self.forward.parent.get(current) {
                stack.extend(recipe.ingredients());
                recipes.push(recipe.clone());
            }
        }
        recipes
    }
}

/// Final recipes to try, best first: those using the meeting element, then
/// the backward parent of the target, then every other producer. Recipes
/// that consume the target itself are never candidates.
fn final_candidates<'r>(
    producing: &'r [Recipe],
    backward_parent: Option<&'r Recipe>,
    target: &str,
    meeting_element: &str,
) -> Vec<&'r Recipe> {
    let mut candidates: Vec<&Recipe> = Vec::with_capacity(producing.len());
    let preferred = producing.iter().filter(|r| r.uses(meeting_element));
    let rest = backward_parent
        .into_iter()
        .chain(producing.iter().filter(|r| !r.uses(meeting_element)));
    for recipe in preferred.chain(rest) {
        if !recipe.uses(target) && !candidates.iter().any(|c| c.key() == recipe.key()) {
            candidates.push(recipe);
        }
    }
    candidates
}

/// Result of completing the path through one final recipe.
enum Completion {
    Done(Vec<Recipe>),
    Failed(SearchError),
    Cancelled,
}

/// Forward ancestry (when `final_recipe` uses the meeting element), BFS
/// sub-paths for its other non-base ingredients, then `final_recipe`.
fn complete(
    store: &RecipeStore,
    meeting: &Meeting,
    meeting_element: &str,
    final_recipe: &Recipe,
    nodes_visited: &mut u64,
    cancel: Option<&CancellationToken>,
) -> Completion {
    let mut gathered = if final_recipe.uses(meeting_element) {
        meeting.forward_ancestry(meeting_element)
    } else {
        Vec::new()
    };
    for ingredient in final_recipe.ingredients() {
        if ingredient == meeting_element || is_base_element(ingredient) {
            continue;
        }
        match bfs::shortest(store, ingredient, cancel) {
            Ok(found) => {
                *nodes_visited += found.nodes_visited;
                gathered.extend(found.path);
            }
            Err(_) if cancel.is_some_and(CancellationToken::is_cancelled) => {
                return Completion::Cancelled;
            }
            Err(source) => {
                *nodes_visited += source.nodes_visited();
                return Completion::Failed(SearchError::SubSearch {
                    element: ingredient.to_owned(),
                    nodes_visited: *nodes_visited,
                    source: Box::new(source),
                });
            }
        }
    }
    gathered.push(final_recipe.clone());
    Completion::Done(gathered)
}

/// Bidirectional single-path search. A cancelled search reports
/// [`SearchError::NoMeeting`].
///
/// Sub-searches bypass the BFS cache, so `nodes_visited` does not depend on
/// what the searcher ran before.
pub(crate) fn find_path(
    searcher: &Searcher,
    target: &str,
    cancel: Option<&CancellationToken>,
) -> Result<PathResult, SearchError> {
    let store = searcher.store();
    let mut meeting = Meeting::new(target);
    let outcome = meeting.search(store, cancel)?;
    let no_meeting = |nodes_visited: u64| SearchError::NoMeeting {
        target: target.to_owned(),
        nodes_visited,
    };

    let meeting_element = match outcome {
        Outcome::Met(element) => element,
        Outcome::Exhausted | Outcome::Cancelled => {
            debug!(target = %target, nodes_visited = meeting.nodes, "bds frontiers exhausted");
            return Err(no_meeting(meeting.nodes));
        }
    };
    debug!(target = %target, meeting = %meeting_element, nodes_visited = meeting.nodes, "bds frontiers met");

    let mut nodes_visited = meeting.nodes;
    let gathered = if meeting_element == target {
        meeting.forward_ancestry(&meeting_element)
    } else {
        let producing = store.recipes_producing(target)?;
        let candidates = final_candidates(
            producing,
            meeting.backward.parent.get(target),
            target,
            &meeting_element,
        );
        let mut first_failure: Option<SearchError> = None;
        let mut completed = None;
        for final_recipe in candidates {
            match complete(store, &meeting, &meeting_element, final_recipe, &mut nodes_visited, cancel) {
                Completion::Done(recipes) => {
                    completed = Some(recipes);
                    break;
                }
                Completion::Failed(err) => {
                    debug!(target = %target, recipe = %final_recipe, error = %err, "bds final recipe unusable");
                    first_failure.get_or_insert(err);
                }
                Completion::Cancelled => return Err(no_meeting(nodes_visited)),
            }
        }
        match (completed, first_failure) {
            (Some(recipes), _) => recipes,
            (None, Some(err)) => return Err(err.with_nodes_visited(nodes_visited)),
            (None, None) => {
                return Err(SearchError::Reconstruction {
                    target: target.to_owned(),
                    nodes_visited,
                })
            }
        }
    };

    let recipes = linearize(&gathered, target, BuildOrder::ResultName, &BuildRanks::default())
        .ok_or_else(|| SearchError::Reconstruction {
            target: target.to_owned(),
            nodes_visited,
        })?;
    Ok(PathResult {
        path: RecipePath::new(recipes),
        nodes_visited,
    })
}

/// Concurrent bidirectional searches; up to `bds_workers` at once.
///
/// Every worker runs the same deterministic search, so this mode rarely
/// yields more than one distinct path.
pub(crate) fn find_multiple(
    searcher: &Searcher,
    target: &str,
    max_count: usize,
) -> Result<MultiPathResult, SearchError> {
    let workers = max_count.min(searcher.policy().bds_workers);
    if workers <= 1 {
        let found = find_path(searcher, target, None)?;
        return Ok(MultiPathResult {
            paths: vec![found.path],
            nodes_visited: found.nodes_visited,
        });
    }

    let cancel = CancellationToken::new();
    let mut collector = PathCollector::new(max_count);
    let mut nodes_visited = 0u64;
    let mut first_error: Option<SearchError> = None;

    run_bounded(
        workers,
        (0..workers).collect(),
        &cancel,
        |_worker: usize, cancel| Some(find_path(searcher, target, Some(cancel))),
        |result| {
            match result {
                Ok(found) => {
                    nodes_visited += found.nodes_visited;
                    collector.offer(found.path);
                }
                Err(err) => {
                    nodes_visited += err.nodes_visited();
                    first_error.get_or_insert(err);
                }
            }
            if collector.is_full() {
                Flow::Stop
            } else {
                Flow::Continue
            }
        },
    );

    if collector.is_empty() {
        return Err(match first_error {
            Some(err) => err.with_nodes_visited(nodes_visited),
            None => SearchError::NoMeeting {
                target: target.to_owned(),
                nodes_visited,
            },
        });
    }
    let mut paths = collector.into_paths();
    paths.sort_by_key(RecipePath::len);
    info!(target = %target, found = paths.len(), nodes_visited, "bds multi-path search complete");
    Ok(MultiPathResult {
        paths,
        nodes_visited,
    })
}
