//! Harness runner: dispatch a [`SearchRequest`] and package the outcome.
//!
//! # Pipeline
//!
//! ```text
//! is_known_element() → engine entry point (timed)
//!   → SearchReport { path | paths, nodesVisited, durationMillis, error }
//! ```
//!
//! Search failures are data, not faults: they land in
//! [`SearchReport::error`] with `path_found = false`. Only request-level
//! problems (unknown target, unloaded store) are returned as errors.

use std::time::Instant;

use alembic_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use alembic_kernel::RecipePath;
use alembic_search::{MultiPathResult, PathResult, SearchError, Searcher};
use serde::Serialize;
use tracing::{info, warn};

use crate::request::{Algorithm, Mode, RequestError, SearchRequest};

/// The response body for one search request (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub search_target: String,
    pub algorithm: Algorithm,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_recipes: Option<usize>,
    pub path_found: bool,
    /// Set in shortest mode on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RecipePath>,
    /// Set in multiple mode on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<RecipePath>>,
    /// `PathId` digests of the returned paths, in return order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path_ids: Vec<String>,
    pub nodes_visited: u64,
    pub duration_millis: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchReport {
    fn pending(request: &SearchRequest, max_count: Option<usize>) -> Self {
        Self {
            search_target: request.target.clone(),
            algorithm: request.algorithm,
            mode: request.mode,
            max_recipes: max_count,
            path_found: false,
            path: None,
            paths: None,
            path_ids: Vec::new(),
            nodes_visited: 0,
            duration_millis: 0,
            error: None,
        }
    }

    /// Compact JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Content hash of the report with its wall-clock field zeroed, so equal
    /// outcomes hash equally across runs and processes.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, serde_json::Error> {
        let timeless = Self {
            duration_millis: 0,
            ..self.clone()
        };
        Ok(canonical_hash(
            HashDomain::SearchReport,
            &timeless.to_json_bytes()?,
        ))
    }

    fn succeed_one(&mut self, found: PathResult) {
        self.path_found = true;
        self.nodes_visited = found.nodes_visited;
        self.path_ids = vec![found.path.path_id().digest().as_str().to_owned()];
        self.path = Some(found.path);
    }

    fn succeed_many(&mut self, found: MultiPathResult) {
        self.path_found = true;
        self.nodes_visited = found.nodes_visited;
        self.path_ids = found
            .paths
            .iter()
            .map(|p| p.path_id().digest().as_str().to_owned())
            .collect();
        self.paths = Some(found.paths);
    }

    fn fail(&mut self, err: &SearchError) {
        self.path_found = false;
        self.nodes_visited = err.nodes_visited();
        self.error = Some(err.to_string());
    }
}

/// Run `request` against `searcher`.
///
/// # Errors
///
/// Returns [`RequestError::UnknownTarget`] if the store does not know the
/// target, [`RequestError::MissingMaxCount`] for a multiple-mode request
/// without a count, and [`RequestError::Store`] before the store is loaded.
pub fn run(searcher: &Searcher, request: &SearchRequest) -> Result<SearchReport, RequestError> {
    if !searcher.store().is_known_element(&request.target)? {
        return Err(RequestError::UnknownTarget {
            target: request.target.clone(),
        });
    }
    let max_count = match request.mode {
        Mode::Shortest => None,
        Mode::Multiple => Some(request.max_count.ok_or(RequestError::MissingMaxCount)?),
    };

    let mut report = SearchReport::pending(request, max_count);
    let target = request.target.as_str();
    let started = Instant::now();

    match max_count {
        None => match single(searcher, request.algorithm, target) {
            Ok(found) => report.succeed_one(found),
            Err(err) => report.fail(&err),
        },
        Some(max_count) => match multiple(searcher, request.algorithm, target, max_count) {
            Ok(found) => report.succeed_many(found),
            Err(err) => report.fail(&err),
        },
    }
    report.duration_millis = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match &report.error {
        None => info!(
            target = %target,
            algorithm = %request.algorithm,
            mode = %request.mode,
            nodes_visited = report.nodes_visited,
            duration_millis = report.duration_millis,
            "search complete"
        ),
        Some(error) => warn!(
            target = %target,
            algorithm = %request.algorithm,
            mode = %request.mode,
            nodes_visited = report.nodes_visited,
            error = %error,
            "search failed"
        ),
    }
    Ok(report)
}

fn single(searcher: &Searcher, algorithm: Algorithm, target: &str) -> Result<PathResult, SearchError> {
    match algorithm {
        Algorithm::Bfs => searcher.find_path_bfs(target),
        Algorithm::Dfs => searcher.find_path_dfs(target),
        Algorithm::Bidirectional => searcher.find_path_bds(target),
    }
}

fn multiple(
    searcher: &Searcher,
    algorithm: Algorithm,
    target: &str,
    max_count: usize,
) -> Result<MultiPathResult, SearchError> {
    match algorithm {
        Algorithm::Bfs => searcher.find_multiple_paths_bfs(target, max_count),
        Algorithm::Dfs => searcher.find_multiple_paths_dfs(target, max_count),
        Algorithm::Bidirectional => searcher.find_multiple_paths_bds(target, max_count),
    }
}
