//! Compositing error types.

use thiserror::Error;

use crate::chart::{ChartError, ChartId};
use crate::geometry::{BoundingBox, GeometryError};

/// Fatal errors of an export. Any of these aborts the composite.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// Query box has a non-finite corner
    #[error("Invalid query box {0}")]
    InvalidQuery(BoundingBox),

    /// A selected chart could not be opened
    #[error("Cannot open chart {chart}: {source}")]
    Open {
        chart: ChartId,
        #[source]
        source: ChartError,
    },

    /// A layer of a chart could not be read
    #[error("Cannot read layer {layer} of chart {chart}: {source}")]
    Layer {
        chart: ChartId,
        layer: String,
        #[source]
        source: ChartError,
    },

    /// Copying or clipping a layer failed
    #[error("Cannot {operation} layer {layer} of chart {chart}: {source}")]
    Geometry {
        chart: ChartId,
        layer: String,
        operation: &'static str,
        #[source]
        source: GeometryError,
    },

    /// The coverage polygon of a chart could not be built
    #[error("Cannot read coverage of chart {chart}: {source}")]
    Coverage {
        chart: ChartId,
        #[source]
        source: ChartError,
    },

    /// Erasing a chart's coverage from the clip region failed
    #[error("Cannot erase coverage of chart {chart}: {source}")]
    Erase {
        chart: ChartId,
        #[source]
        source: GeometryError,
    },
}
