//! Native S-57 cells read through GDAL's S57 vector driver.
//!
//! Enabled with the `s57` cargo feature. Base cells carry the `.000`
//! extension; update files (`.001`, ...) are applied by GDAL on open.

use std::path::Path;

use gdal::vector::{FieldValue, LayerAccess};
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};
use tracing::trace;

use super::driver::{ChartDataset, ChartDriver};
use super::error::ChartError;
use super::feature::{AttributeValue, Feature, FeatureId};

/// File extension of S-57 base cells.
pub const S57_EXTENSION: &str = "000";

/// Driver opening `.000` cells through GDAL.
#[derive(Debug, Clone, Default)]
pub struct S57Driver;

impl S57Driver {
    pub fn new() -> Self {
        Self
    }
}

impl ChartDriver for S57Driver {
    fn name(&self) -> &'static str {
        "s57"
    }

    fn extension(&self) -> &str {
        S57_EXTENSION
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ChartDataset>, ChartError> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_VECTOR | GdalOpenFlags::GDAL_OF_READONLY,
            allowed_drivers: Some(&["S57"]),
            ..Default::default()
        };
        let dataset = Dataset::open_ex(path, options).map_err(|e| ChartError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        trace!(path = %path.display(), "Opened S-57 cell");
        Ok(Box::new(S57Dataset { dataset }))
    }
}

struct S57Dataset {
    dataset: Dataset,
}

impl ChartDataset for S57Dataset {
    fn layer(&self, name: &str) -> Result<Option<Vec<Feature>>, ChartError> {
        // GDAL reports an unknown layer name as an error; that is an absent layer.
        let Ok(mut layer) = self.dataset.layer_by_name(name) else {
            return Ok(None);
        };

        let mut features = Vec::new();
        for (index, ogr_feature) in layer.features().enumerate() {
            let fid = ogr_feature.fid().unwrap_or(index as u64);
            let geometry = match ogr_feature.geometry() {
                Some(geometry) => {
                    Some(geometry.to_geo().map_err(|e| ChartError::Geometry {
                        layer: name.to_string(),
                        fid,
                        reason: e.to_string(),
                    })?)
                }
                None => None,
            };

            let mut feature = Feature::new(FeatureId(fid), geometry);
            for (field, value) in ogr_feature.fields() {
                feature
                    .attributes
                    .insert(field, value.map(convert_field).unwrap_or(AttributeValue::Null));
            }
            features.push(feature);
        }
        Ok(Some(features))
    }
}

fn convert_field(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::IntegerValue(v) => AttributeValue::Integer(i64::from(v)),
        FieldValue::Integer64Value(v) => AttributeValue::Integer(v),
        FieldValue::RealValue(v) => AttributeValue::Real(v),
        FieldValue::StringValue(v) => AttributeValue::Text(v),
        FieldValue::IntegerListValue(v) => {
            AttributeValue::IntegerList(v.into_iter().map(i64::from).collect())
        }
        FieldValue::Integer64ListValue(v) => AttributeValue::IntegerList(v),
        FieldValue::RealListValue(v) => AttributeValue::RealList(v),
        FieldValue::StringListValue(v) => AttributeValue::TextList(v),
        other => AttributeValue::Text(format!("{:?}", other)),
    }
}
