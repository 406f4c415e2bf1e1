//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::chart::ChartError;

/// Errors from loading charts into the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A chart could not be opened or its metadata could not be read
    #[error("Failed to load chart {}: {source}", path.display())]
    Chart {
        path: PathBuf,
        #[source]
        source: ChartError,
    },

    /// Chart root does not exist or is not a directory
    #[error("Chart directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Directory traversal failed
    #[error("Failed to scan chart directory: {0}")]
    Walk(#[from] walkdir::Error),
}
