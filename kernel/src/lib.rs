//! Alembic Kernel: the recipe carrier for Alembic path search.
//!
//! # API Surface
//!
//! - [`store::RecipeStore`] -- the immutable, indexed recipe set
//! - [`recipe::Recipe`] / [`recipe::RecipeKey`] -- one combination rule and its canonical key
//! - [`path::RecipePath`] / [`path::PathId`] -- a construction-ordered path and its canonical identifier
//! - [`elements::BASE_ELEMENTS`] -- the four elements every path starts from
//!
//! # Module Dependency Direction
//!
//! `proof` ← `recipe` ← `path`, `store`
//!
//! One-way only. `proof` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod elements;
pub mod error;
pub mod path;
pub mod proof;
pub mod recipe;
pub mod store;

pub use elements::{is_base_element, BASE_ELEMENTS};
pub use error::StoreError;
pub use path::{PathId, RecipePath};
pub use recipe::{Recipe, RecipeKey};
pub use store::RecipeStore;
