//! Chart source errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::GeometryError;

/// Errors opening or interpreting a chart cell.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The chart file could not be opened or read.
    #[error("cannot open chart {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// The chart content is malformed for its driver.
    #[error("cannot decode chart {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// A geometry string failed to parse.
    #[error("invalid geometry in layer {layer}, feature {fid}: {reason}")]
    Geometry {
        layer: String,
        fid: u64,
        reason: String,
    },

    /// A layer the chart must provide is absent.
    #[error("chart has no {0} layer")]
    MissingLayer(&'static str),

    /// The dataset-identification layer holds no record.
    #[error("chart has no {0} record")]
    MissingRecord(&'static str),

    /// A required field is absent from a feature.
    #[error("feature does not have field \"{0}\"")]
    MissingField(&'static str),

    /// A required field has the wrong type.
    #[error("feature field \"{field}\" is not an integer (found {found})")]
    NotInteger {
        field: &'static str,
        found: &'static str,
    },

    /// The compilation scale is zero or negative.
    #[error("compilation scale must be positive, found {0}")]
    InvalidScale(i64),

    /// The chart path has no usable file stem.
    #[error("chart path has no file name: {0}")]
    InvalidPath(PathBuf),

    /// Coverage geometry could not be merged.
    #[error("coverage geometry: {0}")]
    Coverage(#[from] GeometryError),
}
