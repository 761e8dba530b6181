//! Error types for catalog access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog source could not be reached.
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),

    /// The catalog file could not be read.
    #[error("failed to read catalog at {path}: {source}")]
    Io {
        /// Catalog file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid JSON.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
