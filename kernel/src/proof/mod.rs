//! Proof module: domain-separated content hashing for recipe artifacts.
//!
//! Depends on nothing else in the kernel. `recipe`, `path` and `store` hash
//! through here so that every digest shares one algorithm and one prefix table.

pub mod hash;
pub mod hash_domain;
