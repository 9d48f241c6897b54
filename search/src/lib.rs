//! Alembic Search: path search over a recipe graph.
//!
//! Three engines find a construction sequence from the base elements to a
//! target, each in a single-path and a concurrent multi-path mode. Every
//! entry point lives on [`Searcher`], which owns the store handle, the
//! validated [`SearchPolicy`] and the BFS path cache. The crate depends only
//! on `alembic_kernel`.
//!
//! # Crate dependency graph
//!
//! ```text
//! alembic_kernel  ←  alembic_search  ←  alembic_harness
//! (recipes, store)   (engines, pool)     (requests, worlds)
//! ```
//!
//! # Engines
//!
//! - BFS: forward frontier from the bases; shortest in combination steps
//! - DFS: memoized bottom-up construction, preferring ready recipes
//! - BDS: forward and backward frontiers meeting in the middle, completed
//!   with BFS sub-searches
//!
//! Multi-path modes run on [`pool::run_bounded`], a scoped worker pool fed
//! through `crossbeam-channel`. Returned paths are pairwise distinct under
//! [`alembic_kernel::PathId`].

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

mod bds;
mod bfs;
pub mod cancel;
pub mod collector;
mod dfs;
pub mod error;
pub mod order;
pub mod path;
pub mod policy;
pub mod pool;
pub mod searcher;

pub use cancel::CancellationToken;
pub use error::SearchError;
pub use path::{validate_construction_order, ConstructionError};
pub use policy::SearchPolicy;
pub use searcher::{MultiPathResult, PathResult, Searcher};
