//! Search policy types.

use std::num::NonZeroUsize;

use crate::error::SearchError;

/// Tuning and budget configuration shared by all engines.
///
/// A [`Searcher`](crate::Searcher) validates its policy once at construction;
/// engines read the fields without re-checking them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// DFS recursion depth cap.
    pub max_dfs_depth: usize,
    /// Depth below which a DFS creatability check may revisit an element
    /// already on its branch (shallow-cycle allowance).
    pub cycle_revisit_depth: usize,
    /// DFS recursive-call budget per search call. Exhaustion degrades to
    /// "not found".
    pub max_dfs_calls: u64,
    /// DFS multi-path worker pool bound.
    pub dfs_workers: usize,
    /// BDS multi-path worker bound.
    pub bds_workers: usize,
    /// BFS multi-path workers per remaining top-level recipe.
    pub bfs_workers_per_recipe: usize,
    /// Free-roaming BFS multi-path explorers.
    pub bfs_explorer_workers: usize,
    /// BFS multi-path thread bound.
    pub bfs_pool_threads: usize,
    /// Chance (0-100) that an explorer replaces an element's recorded parent
    /// with a later-found recipe.
    pub diversity_override_percent: u8,
    /// Cache BFS single-path results per target.
    pub cache_bfs_paths: bool,
}

impl SearchPolicy {
    /// Check the policy for values no engine can run with.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SearchError> {
        let positive = [
            ("max_dfs_depth", self.max_dfs_depth),
            ("dfs_workers", self.dfs_workers),
            ("bds_workers", self.bds_workers),
            ("bfs_workers_per_recipe", self.bfs_workers_per_recipe),
            ("bfs_pool_threads", self.bfs_pool_threads),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(invalid(format!("{field} must be positive")));
            }
        }
        if self.max_dfs_calls == 0 {
            return Err(invalid("max_dfs_calls must be positive".into()));
        }
        if self.cycle_revisit_depth > self.max_dfs_depth {
            return Err(invalid(format!(
                "cycle_revisit_depth ({}) exceeds max_dfs_depth ({})",
                self.cycle_revisit_depth, self.max_dfs_depth
            )));
        }
        if self.diversity_override_percent > 100 {
            return Err(invalid(format!(
                "diversity_override_percent must be 0-100, got {}",
                self.diversity_override_percent
            )));
        }
        Ok(())
    }
}

fn invalid(detail: String) -> SearchError {
    SearchError::InvalidPolicy { detail }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self {
            max_dfs_depth: 500,
            cycle_revisit_depth: 30,
            max_dfs_calls: 2_000_000,
            dfs_workers: 8,
            bds_workers: 10,
            bfs_workers_per_recipe: 3,
            bfs_explorer_workers: 4,
            bfs_pool_threads: 2 * parallelism,
            diversity_override_percent: 15,
            cache_bfs_paths: true,
        }
    }
}
