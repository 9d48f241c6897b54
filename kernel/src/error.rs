//! Recipe Store errors.

use std::path::PathBuf;

/// Failure to load or query the Recipe Store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store was queried before [`crate::store::RecipeStore::load`] ran.
    #[error("recipe store queried before load")]
    Uninitialized,

    #[error("failed to read recipe dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse recipe dataset: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}
