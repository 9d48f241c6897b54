//! The search context and its six entry points.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use alembic_kernel::{is_base_element, RecipePath, RecipeStore};
use tracing::debug;

use crate::error::SearchError;
use crate::policy::SearchPolicy;
use crate::pool::{read, write};
use crate::{bds, bfs, dfs};

/// One path and the work spent finding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub path: RecipePath,
    /// Frontier dequeues or recursive calls, summed over the search.
    pub nodes_visited: u64,
}

/// Distinct paths and the total work spent finding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPathResult {
    pub paths: Vec<RecipePath>,
    pub nodes_visited: u64,
}

/// Explicit search context: the recipe store, a validated policy and the BFS
/// path cache.
///
/// `Searcher` is `Send + Sync`; share it behind an `Arc` to serve concurrent
/// requests. The store is never mutated. The only state that outlives a call
/// is the BFS cache, cleared by [`reset_caches`](Self::reset_caches).
#[derive(Debug)]
pub struct Searcher {
    store: Arc<RecipeStore>,
    policy: SearchPolicy,
    bfs_cache: RwLock<HashMap<String, RecipePath>>,
}

impl Searcher {
    #[must_use]
    pub fn new(store: Arc<RecipeStore>) -> Self {
        Self {
            store,
            policy: SearchPolicy::default(),
            bfs_cache: RwLock::new(HashMap::new()),
        }
    }

    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `policy` fails validation.
    pub fn with_policy(store: Arc<RecipeStore>, policy: SearchPolicy) -> Result<Self, SearchError> {
        policy.validate()?;
        Ok(Self {
            store,
            policy,
            bfs_cache: RwLock::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Drop every cached BFS path.
    pub fn reset_caches(&self) {
        let mut cache = write(&self.bfs_cache);
        debug!(entries = cache.len(), "bfs cache reset");
        cache.clear();
    }

    pub(crate) fn cached_bfs_path(&self, target: &str) -> Option<RecipePath> {
        if !self.policy.cache_bfs_paths {
            return None;
        }
        read(&self.bfs_cache).get(target).cloned()
    }

    pub(crate) fn cache_bfs_path(&self, target: &str, path: &RecipePath) {
        if self.policy.cache_bfs_paths {
            write(&self.bfs_cache).insert(target.to_owned(), path.clone());
        }
    }

    /// Common preconditions. `Some` short-circuits base-element targets.
    fn preflight(&self, target: &str) -> Result<Option<RecipePath>, SearchError> {
        if !self.store.is_loaded() {
            return Err(SearchError::Uninitialized);
        }
        Ok(is_base_element(target).then(RecipePath::empty))
    }

    fn preflight_multi(&self, target: &str, max_count: usize) -> Result<Option<RecipePath>, SearchError> {
        if max_count == 0 {
            return Err(SearchError::InvalidMaxCount { max_count });
        }
        self.preflight(target)
    }

    /// Shortest path to `target` by combination steps.
    ///
    /// # Errors
    ///
    /// [`SearchError::NotFound`] if the forward frontier exhausts;
    /// [`SearchError::Uninitialized`] before the store is loaded.
    pub fn find_path_bfs(&self, target: &str) -> Result<PathResult, SearchError> {
        if let Some(path) = self.preflight(target)? {
            return Ok(single(path));
        }
        bfs::find_path(self, target)
    }

    /// Up to `max_count` paths, each ending in a different top-level recipe.
    ///
    /// Fewer paths than requested is not an error.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidMaxCount`] for `max_count == 0`;
    /// [`SearchError::NotFound`] if no path exists.
    pub fn find_multiple_paths_bfs(
        &self,
        target: &str,
        max_count: usize,
    ) -> Result<MultiPathResult, SearchError> {
        if let Some(path) = self.preflight_multi(target, max_count)? {
            return Ok(multi(path));
        }
        bfs::find_multiple(self, target, max_count)
    }

    /// Path built bottom-up by memoized recursive construction.
    ///
    /// # Errors
    ///
    /// [`SearchError::NotFound`] if no recipe chain resolves within the DFS
    /// depth and call budgets.
    pub fn find_path_dfs(&self, target: &str) -> Result<PathResult, SearchError> {
        if let Some(path) = self.preflight(target)? {
            return Ok(single(path));
        }
        dfs::find_path(self, target)
    }

    /// The DFS path plus alternates through other top-level recipes, sorted
    /// by length.
    ///
    /// # Errors
    ///
    /// Same as [`find_path_dfs`](Self::find_path_dfs), plus
    /// [`SearchError::InvalidMaxCount`].
    pub fn find_multiple_paths_dfs(
        &self,
        target: &str,
        max_count: usize,
    ) -> Result<MultiPathResult, SearchError> {
        if let Some(path) = self.preflight_multi(target, max_count)? {
            return Ok(multi(path));
        }
        dfs::find_multiple(self, target, max_count)
    }

    /// Path found by meeting forward and backward frontiers, completed with
    /// BFS sub-searches.
    ///
    /// # Errors
    ///
    /// [`SearchError::NoMeeting`] if both frontiers exhaust;
    /// [`SearchError::SubSearch`] if a completion sub-search fails.
    pub fn find_path_bds(&self, target: &str) -> Result<PathResult, SearchError> {
        if let Some(path) = self.preflight(target)? {
            return Ok(single(path));
        }
        bds::find_path(self, target, None)
    }

    /// Concurrent bidirectional searches, deduplicated and sorted by length.
    ///
    /// # Errors
    ///
    /// Same as [`find_path_bds`](Self::find_path_bds), plus
    /// [`SearchError::InvalidMaxCount`].
    pub fn find_multiple_paths_bds(
        &self,
        target: &str,
        max_count: usize,
    ) -> Result<MultiPathResult, SearchError> {
        if let Some(path) = self.preflight_multi(target, max_count)? {
            return Ok(multi(path));
        }
        bds::find_multiple(self, target, max_count)
    }
}

fn single(path: RecipePath) -> PathResult {
    PathResult {
        path,
        nodes_visited: 0,
    }
}

fn multi(path: RecipePath) -> MultiPathResult {
    MultiPathResult {
        paths: vec![path],
        nodes_visited: 0,
    }
}
