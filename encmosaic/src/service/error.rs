//! Service error types.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::composite::CompositeError;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Loading charts into the catalog failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An export failed
    #[error(transparent)]
    Composite(#[from] CompositeError),

    /// Configuration cannot be satisfied by this build
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
