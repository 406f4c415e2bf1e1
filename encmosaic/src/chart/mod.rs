//! Chart cells: drivers, features and metadata.
//!
//! # Architecture
//!
//! ```text
//! ChartDriver ──open(path)──► ChartDataset ──layer("M_COVR")──► Vec<Feature>
//!     │                                                              │
//!     ├── JsonChartDriver (*.json cells, always available)           │
//!     └── S57Driver       (*.000 cells, `s57` feature, GDAL)         ▼
//!                                           read_metadata ──► ChartMetadata
//! ```

mod driver;
mod error;
mod feature;
pub mod json;
pub mod metadata;
#[cfg(feature = "s57")]
pub mod s57;

pub use driver::{ChartDataset, ChartDriver};
pub use error::ChartError;
pub use feature::{AttributeValue, Feature, FeatureId};
pub use json::{CellDocument, CellFeature, JsonChartDriver};
pub use metadata::{ChartId, ChartMetadata};
#[cfg(feature = "s57")]
pub use s57::S57Driver;
