//! Alembic Harness: request dispatch and fixture recipe sets.
//!
//! The harness turns a raw search request (`target`, `algo`, `mode`, `max`)
//! into a call on one of the six [`alembic_search::Searcher`] entry points
//! and packages the outcome as a serializable [`runner::SearchReport`].
//! An HTTP layer calls [`runner::run`] and writes the report as JSON.
//!
//! The harness does NOT implement search logic; it delegates to
//! `alembic_search`. Worlds provide recipe data only.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod policy;
pub mod request;
pub mod runner;
pub mod worlds;
