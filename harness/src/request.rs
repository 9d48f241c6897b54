//! Search requests as the HTTP layer receives them.
//!
//! Raw query values are parsed into a typed [`SearchRequest`] here; the
//! search crate only ever sees validated arguments.

use std::fmt;
use std::str::FromStr;

use alembic_kernel::{RecipeStore, StoreError};
use serde::Serialize;

/// Error turning raw request values into a runnable [`SearchRequest`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("target is required")]
    MissingTarget,
    #[error("target element '{target}' is not known")]
    UnknownTarget { target: String },
    #[error("algorithm must be 'bfs', 'dfs' or 'bds', got '{value}'")]
    UnknownAlgorithm { value: String },
    #[error("mode must be 'shortest' or 'multiple', got '{value}'")]
    UnknownMode { value: String },
    #[error("max is required in multiple mode")]
    MissingMaxCount,
    #[error("max must be a positive integer, got '{value}'")]
    InvalidMaxCount { value: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Search engine selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    #[serde(rename = "bfs")]
    Bfs,
    #[serde(rename = "dfs")]
    Dfs,
    #[serde(rename = "bds")]
    Bidirectional,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Self::Bfs, Self::Dfs, Self::Bidirectional];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::Bidirectional => "bds",
        }
    }
}

impl FromStr for Algorithm {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "bds" | "bidirectional" => Ok(Self::Bidirectional),
            _ => Err(RequestError::UnknownAlgorithm { value: s.to_owned() }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One path, or several distinct ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Shortest,
    Multiple,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::Multiple => "multiple",
        }
    }
}

impl FromStr for Mode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shortest" => Ok(Self::Shortest),
            "multiple" => Ok(Self::Multiple),
            _ => Err(RequestError::UnknownMode { value: s.to_owned() }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub target: String,
    pub algorithm: Algorithm,
    pub mode: Mode,
    /// Required in [`Mode::Multiple`], ignored otherwise.
    pub max_count: Option<usize>,
}

impl SearchRequest {
    #[must_use]
    pub fn shortest(target: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            target: target.into(),
            algorithm,
            mode: Mode::Shortest,
            max_count: None,
        }
    }

    #[must_use]
    pub fn multiple(target: impl Into<String>, algorithm: Algorithm, max_count: usize) -> Self {
        Self {
            target: target.into(),
            algorithm,
            mode: Mode::Multiple,
            max_count: Some(max_count),
        }
    }

    /// Parse raw query values. Missing or blank `algorithm` and `mode` default
    /// to `bfs` and `shortest`; `max` is only read in multiple mode.
    ///
    /// The target is taken as given. Resolve casing first with
    /// [`resolve_target`] when the caller accepts loose input.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] for the first invalid value.
    pub fn from_query(
        target: &str,
        algorithm: Option<&str>,
        mode: Option<&str>,
        max: Option<&str>,
    ) -> Result<Self, RequestError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(RequestError::MissingTarget);
        }
        let algorithm = match algorithm.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => Algorithm::Bfs,
        };
        let mode = match mode.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => Mode::Shortest,
        };
        let max_count = match mode {
            Mode::Shortest => None,
            Mode::Multiple => Some(parse_max_count(max)?),
        };
        Ok(Self {
            target: target.to_owned(),
            algorithm,
            mode,
            max_count,
        })
    }
}

fn parse_max_count(raw: Option<&str>) -> Result<usize, RequestError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RequestError::MissingMaxCount)?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RequestError::InvalidMaxCount {
            value: raw.to_owned(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Target casing
// ---------------------------------------------------------------------------

/// The first casing of `raw` the store knows, trying the input as given, then
/// Title Case, Capitalized, lowercase and UPPERCASE.
///
/// # Errors
///
/// Returns [`StoreError::Uninitialized`] before the store is loaded.
pub fn resolve_target(store: &RecipeStore, raw: &str) -> Result<Option<String>, StoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let candidates = [
        raw.to_owned(),
        title_case(raw),
        capitalized(raw),
        raw.to_lowercase(),
        raw.to_uppercase(),
    ];
    for candidate in candidates {
        if store.is_known_element(&candidate)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalized)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
