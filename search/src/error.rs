//! Typed search errors.
//!
//! Argument and initialization errors are raised before any work is done and
//! carry no work counter. Data-driven failures (no path, no meeting, failed
//! sub-search) carry the accumulated `nodes_visited` so callers get consistent
//! telemetry on failure too.

use alembic_kernel::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("recipe store is not initialized")]
    Uninitialized,

    #[error("max count must be a positive integer, got {max_count}")]
    InvalidMaxCount { max_count: usize },

    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },

    #[error("no path to {target} found ({nodes_visited} nodes visited)")]
    NotFound { target: String, nodes_visited: u64 },

    #[error("frontiers exhausted without meeting for {target} ({nodes_visited} nodes visited)")]
    NoMeeting { target: String, nodes_visited: u64 },

    #[error("sub-search for {element} failed ({nodes_visited} nodes visited): {source}")]
    SubSearch {
        element: String,
        nodes_visited: u64,
        #[source]
        source: Box<SearchError>,
    },

    #[error("recovered recipes do not order into a path to {target} ({nodes_visited} nodes visited)")]
    Reconstruction { target: String, nodes_visited: u64 },
}

impl SearchError {
    /// Work counter carried by the error; 0 for argument and initialization
    /// errors.
    #[must_use]
    pub fn nodes_visited(&self) -> u64 {
        match self {
            Self::Uninitialized | Self::InvalidMaxCount { .. } | Self::InvalidPolicy { .. } => 0,
            Self::NotFound { nodes_visited, .. }
            | Self::NoMeeting { nodes_visited, .. }
            | Self::SubSearch { nodes_visited, .. }
            | Self::Reconstruction { nodes_visited, .. } => *nodes_visited,
        }
    }

    /// Whether this is a data-driven "no path" outcome rather than a fault.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::NoMeeting { .. } => true,
            Self::SubSearch { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Replace the carried work counter. Errors without one are unchanged.
    #[must_use]
    pub(crate) fn with_nodes_visited(mut self, total: u64) -> Self {
        match &mut self {
            Self::NotFound { nodes_visited, .. }
            | Self::NoMeeting { nodes_visited, .. }
            | Self::SubSearch { nodes_visited, .. }
            | Self::Reconstruction { nodes_visited, .. } => *nodes_visited = total,
            Self::Uninitialized | Self::InvalidMaxCount { .. } | Self::InvalidPolicy { .. } => {}
        }
        self
    }
}

impl From<StoreError> for SearchError {
    // Store queries only fail before load; I/O and parse errors belong to
    // dataset loading, which happens before a searcher exists.
    fn from(_: StoreError) -> Self {
        Self::Uninitialized
    }
}
