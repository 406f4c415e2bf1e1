//! Self-describing JSON chart cells.
//!
//! A cell document maps S-57 object class codes to feature lists. Geometry is
//! stored as WKT with longitude first:
//!
//! ```text
//! {
//!   "layers": {
//!     "DSID":   [ { "fid": 1, "attributes": { "DSPM_CSCL": 8000 } } ],
//!     "M_COVR": [ { "fid": 2, "geometry": "POLYGON((...))", "attributes": { "CATCOV": 1 } } ],
//!     "LNDARE": [ { "fid": 310, "geometry": "POLYGON((...))" } ]
//!   }
//! }
//! ```
//!
//! The same document shape is used to dump composites, with an extra `chart`
//! key naming the contributing cell of each feature.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use tracing::trace;
use wkt::ToWkt;

use super::driver::{ChartDataset, ChartDriver};
use super::error::ChartError;
use super::feature::{AttributeValue, Feature, FeatureId};

/// Default file extension of JSON chart cells.
pub const JSON_CELL_EXTENSION: &str = "json";

/// Top-level JSON cell document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellDocument {
    #[serde(default)]
    pub layers: BTreeMap<String, Vec<CellFeature>>,
}

/// One feature as stored in a cell document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFeature {
    pub fid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl CellFeature {
    /// Encode a feature, writing its geometry as WKT.
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            fid: feature.id.0,
            chart: None,
            geometry: feature.geometry.as_ref().map(|g| g.wkt_string()),
            attributes: feature.attributes.clone(),
        }
    }

    /// Decode into a [`Feature`], parsing the WKT geometry.
    pub fn to_feature(&self, layer: &str) -> Result<Feature, ChartError> {
        let geometry = match &self.geometry {
            Some(text) => Some(parse_wkt(text).map_err(|reason| ChartError::Geometry {
                layer: layer.to_string(),
                fid: self.fid,
                reason,
            })?),
            None => None,
        };
        Ok(Feature {
            id: FeatureId(self.fid),
            geometry,
            attributes: self.attributes.clone(),
        })
    }
}

impl CellDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feature to a layer, creating the layer if needed.
    pub fn push(&mut self, layer: &str, feature: CellFeature) {
        self.layers.entry(layer.to_string()).or_default().push(feature);
    }

    /// Ensure a layer exists, even when it holds no features.
    pub fn ensure_layer(&mut self, layer: &str) {
        self.layers.entry(layer.to_string()).or_default();
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the document to a file.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        fs::write(path, json)
    }
}

/// Parse a WKT string into a `geo-types` geometry.
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>, String> {
    wkt::Wkt::<f64>::from_str(text)
        .map_err(|e| e.to_string())
        .and_then(|w| {
            Geometry::try_from(w).map_err(|e: wkt::conversion::Error| format!("{:?}", e))
        })
}

/// Driver for JSON chart cells.
#[derive(Debug, Clone)]
pub struct JsonChartDriver {
    extension: String,
}

impl JsonChartDriver {
    /// Driver matching `*.json` files.
    pub fn new() -> Self {
        Self {
            extension: JSON_CELL_EXTENSION.to_string(),
        }
    }

    /// Driver matching a custom file extension.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}

impl Default for JsonChartDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartDriver for JsonChartDriver {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ChartDataset>, ChartError> {
        let text = fs::read_to_string(path).map_err(|e| ChartError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let document: CellDocument =
            serde_json::from_str(&text).map_err(|e| ChartError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        trace!(path = %path.display(), layers = document.layers.len(), "Opened JSON cell");
        Ok(Box::new(JsonChartDataset { document }))
    }
}

struct JsonChartDataset {
    document: CellDocument,
}

impl ChartDataset for JsonChartDataset {
    fn layer(&self, name: &str) -> Result<Option<Vec<Feature>>, ChartError> {
        let Some(features) = self.document.layers.get(name) else {
            return Ok(None);
        };
        features
            .iter()
            .map(|f| f.to_feature(name))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}
