//! Chart source driver abstraction.
//!
//! A [`ChartDriver`] is the capability that turns a chart file on disk into a
//! [`ChartDataset`]. The catalog uses it for full metadata parses and the
//! compositor uses it to read layer features. Dropping a dataset closes it.

use std::path::Path;

use super::error::ChartError;
use super::feature::Feature;

/// Opens chart cells of one file format.
pub trait ChartDriver: Send + Sync {
    /// Short driver name for logging (e.g. `"json"`, `"s57"`).
    fn name(&self) -> &'static str;

    /// File extension of chart cells, without the leading dot.
    fn extension(&self) -> &str;

    /// Open a chart cell read-only.
    fn open(&self, path: &Path) -> Result<Box<dyn ChartDataset>, ChartError>;
}

/// An open chart cell.
pub trait ChartDataset {
    /// Read every feature of a layer.
    ///
    /// Returns `Ok(None)` when the chart has no layer of that name.
    fn layer(&self, name: &str) -> Result<Option<Vec<Feature>>, ChartError>;
}
