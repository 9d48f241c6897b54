//! Policy configuration: optional overrides layered on the default
//! [`SearchPolicy`].
//!
//! A [`PolicyConfig`] leaves every field `None` unless the caller has a reason
//! to change it. The effective policy is always derived through
//! [`build_policy`], which validates it before any search can run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alembic_kernel::RecipeStore;
use alembic_search::{SearchError, SearchPolicy, Searcher};
use serde::Deserialize;
use tracing::debug;

/// Overrides for [`SearchPolicy::default`]. `None` keeps the default.
///
/// Deserializes from a JSON object with the same snake-case field names;
/// unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub max_dfs_depth: Option<usize>,
    pub cycle_revisit_depth: Option<usize>,
    pub max_dfs_calls: Option<u64>,
    pub dfs_workers: Option<usize>,
    pub bds_workers: Option<usize>,
    pub bfs_workers_per_recipe: Option<usize>,
    pub bfs_explorer_workers: Option<usize>,
    pub bfs_pool_threads: Option<usize>,
    pub diversity_override_percent: Option<u8>,
    pub cache_bfs_paths: Option<bool>,
}

/// Error loading or applying a [`PolicyConfig`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyConfigError {
    #[error("failed to read policy config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed policy config")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl PolicyConfig {
    /// # Errors
    ///
    /// Returns [`PolicyConfigError::Parse`] for malformed JSON or unknown
    /// fields.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, PolicyConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// # Errors
    ///
    /// Returns [`PolicyConfigError::Io`] if the file cannot be read, or
    /// [`PolicyConfigError::Parse`] if it is not a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PolicyConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }
}

/// Derive the effective policy: defaults, then every override that is set.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] if the result fails validation.
pub fn build_policy(config: &PolicyConfig) -> Result<SearchPolicy, SearchError> {
    let defaults = SearchPolicy::default();
    let policy = SearchPolicy {
        max_dfs_depth: config.max_dfs_depth.unwrap_or(defaults.max_dfs_depth),
        cycle_revisit_depth: config
            .cycle_revisit_depth
            .unwrap_or(defaults.cycle_revisit_depth),
        max_dfs_calls: config.max_dfs_calls.unwrap_or(defaults.max_dfs_calls),
        dfs_workers: config.dfs_workers.unwrap_or(defaults.dfs_workers),
        bds_workers: config.bds_workers.unwrap_or(defaults.bds_workers),
        bfs_workers_per_recipe: config
            .bfs_workers_per_recipe
            .unwrap_or(defaults.bfs_workers_per_recipe),
        bfs_explorer_workers: config
            .bfs_explorer_workers
            .unwrap_or(defaults.bfs_explorer_workers),
        bfs_pool_threads: config.bfs_pool_threads.unwrap_or(defaults.bfs_pool_threads),
        diversity_override_percent: config
            .diversity_override_percent
            .unwrap_or(defaults.diversity_override_percent),
        cache_bfs_paths: config.cache_bfs_paths.unwrap_or(defaults.cache_bfs_paths),
    };
    policy.validate()?;
    debug!(?policy, "search policy built");
    Ok(policy)
}

/// A [`Searcher`] over `store` with the policy derived from `config`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] if the derived policy is invalid.
pub fn build_searcher(
    store: Arc<RecipeStore>,
    config: &PolicyConfig,
) -> Result<Searcher, SearchError> {
    Searcher::with_policy(store, build_policy(config)?)
}
