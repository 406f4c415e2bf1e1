//! Geometry engine errors.

use thiserror::Error;

/// Failures raised by a [`GeometryEngine`](super::GeometryEngine).
///
/// Every one of these is fatal to the export that triggered it.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// An input coordinate is NaN or infinite.
    #[error("geometry has a non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    /// A coverage geometry was not an areal shape.
    #[error("coverage geometry must be polygonal, found {0}")]
    NotPolygonal(&'static str),

    /// The backing engine rejected the operation.
    #[error("{operation} failed: {reason}")]
    Operation {
        operation: &'static str,
        reason: String,
    },
}
