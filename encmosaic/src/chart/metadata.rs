//! Per-chart metadata: identity, compilation scale and coverage envelope.

use std::fmt;
use std::path::{Path, PathBuf};

use geo_types::{Geometry, MultiPolygon};

use super::driver::ChartDataset;
use super::error::ChartError;
use super::feature::{AttributeValue, Feature};
use crate::geometry::{BoundingBox, GeometryEngine};

/// Dataset identification layer.
pub const DSID_LAYER: &str = "DSID";
/// Compilation of scale field of the dataset parameter record.
pub const SCALE_FIELD: &str = "DSPM_CSCL";
/// Coverage layer.
pub const COVERAGE_LAYER: &str = "M_COVR";
/// Category of coverage field.
pub const COVERAGE_CATEGORY_FIELD: &str = "CATCOV";
/// `CATCOV` value meaning "coverage available".
pub const COVERAGE_AVAILABLE: i64 = 1;

/// Chart identity, the file stem of the chart cell (e.g. `US5RI11M`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(String);

impl ChartId {
    /// Create an identity from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the identity from a chart path.
    pub fn from_path(path: &Path) -> Result<Self, ChartError> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(Self::new)
            .ok_or_else(|| ChartError::InvalidPath(path.to_path_buf()))
    }

    /// The identity as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata needed to select a chart without opening it.
///
/// Immutable once created; a reload replaces the catalog entry wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMetadata {
    id: ChartId,
    path: PathBuf,
    scale: u32,
    bbox: Option<BoundingBox>,
}

impl ChartMetadata {
    /// Create metadata for a chart.
    ///
    /// A `bbox` that is not a valid rectangle is stored as undefined coverage.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::InvalidScale`] if `scale` is zero.
    pub fn new(
        id: ChartId,
        path: impl Into<PathBuf>,
        scale: u32,
        bbox: Option<BoundingBox>,
    ) -> Result<Self, ChartError> {
        if scale == 0 {
            return Err(ChartError::InvalidScale(0));
        }
        Ok(Self {
            id,
            path: path.into(),
            scale,
            bbox: bbox.filter(BoundingBox::is_valid),
        })
    }

    pub fn id(&self) -> &ChartId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compilation scale denominator; smaller is more detailed.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Coverage envelope, `None` when the chart declares no coverage.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }
}

/// Read an integer field the way the S-57 object model requires.
pub fn integer_field(feature: &Feature, name: &'static str) -> Result<i64, ChartError> {
    match feature.attribute(name) {
        None => Err(ChartError::MissingField(name)),
        Some(AttributeValue::Integer(v)) => Ok(*v),
        Some(other) => Err(ChartError::NotInteger {
            field: name,
            found: other.type_name(),
        }),
    }
}

/// Read the compilation scale from the single dataset-identification record.
pub fn read_scale(dataset: &dyn ChartDataset) -> Result<u32, ChartError> {
    let records = dataset
        .layer(DSID_LAYER)?
        .ok_or(ChartError::MissingLayer(DSID_LAYER))?;
    let record = records
        .first()
        .ok_or(ChartError::MissingRecord(DSID_LAYER))?;
    let scale = integer_field(record, SCALE_FIELD)?;
    u32::try_from(scale)
        .ok()
        .filter(|s| *s > 0)
        .ok_or(ChartError::InvalidScale(scale))
}

/// Geometries of the coverage rows flagged "coverage available".
pub fn available_coverage(dataset: &dyn ChartDataset) -> Result<Vec<Geometry<f64>>, ChartError> {
    let rows = dataset
        .layer(COVERAGE_LAYER)?
        .ok_or(ChartError::MissingLayer(COVERAGE_LAYER))?;
    let mut geometries = Vec::new();
    for row in rows {
        if integer_field(&row, COVERAGE_CATEGORY_FIELD)? != COVERAGE_AVAILABLE {
            continue;
        }
        if let Some(geometry) = row.geometry {
            geometries.push(geometry);
        }
    }
    Ok(geometries)
}

/// Conservative coverage envelope: the merged envelopes of every available
/// coverage row. `None` when the chart has no available coverage.
pub fn coverage_bbox(dataset: &dyn ChartDataset) -> Result<Option<BoundingBox>, ChartError> {
    Ok(available_coverage(dataset)?
        .iter()
        .filter_map(BoundingBox::of_geometry)
        .reduce(|acc, bbox| acc.merge(&bbox)))
}

/// Exact coverage polygon: the union of every available coverage row.
pub fn coverage_polygon(
    dataset: &dyn ChartDataset,
    engine: &dyn GeometryEngine,
) -> Result<MultiPolygon<f64>, ChartError> {
    let geometries = available_coverage(dataset)?;
    Ok(engine.coverage_union(&geometries)?)
}

/// Full metadata parse of an open chart.
pub fn read_metadata(
    dataset: &dyn ChartDataset,
    path: &Path,
) -> Result<ChartMetadata, ChartError> {
    let id = ChartId::from_path(path)?;
    let scale = read_scale(dataset)?;
    let bbox = coverage_bbox(dataset)?;
    ChartMetadata::new(id, path, scale, bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::feature::FeatureId;
    use crate::geometry::GeoEngine;
    use geo::Area;
    use std::collections::HashMap;

    struct MemoryDataset {
        layers: HashMap<String, Vec<Feature>>,
    }

    impl MemoryDataset {
        fn new() -> Self {
            Self {
                layers: HashMap::new(),
            }
        }

        fn with(mut self, layer: &str, features: Vec<Feature>) -> Self {
            self.layers.insert(layer.to_string(), features);
            self
        }
    }

    impl ChartDataset for MemoryDataset {
        fn layer(&self, name: &str) -> Result<Option<Vec<Feature>>, ChartError> {
            Ok(self.layers.get(name).cloned())
        }
    }

    fn dsid(scale: AttributeValue) -> Vec<Feature> {
        vec![Feature::new(FeatureId(1), None).with_attribute(SCALE_FIELD, scale)]
    }

    fn coverage(id: u64, bbox: BoundingBox, category: i64) -> Feature {
        Feature::new(FeatureId(id), Some(bbox.to_polygon().into()))
            .with_attribute(COVERAGE_CATEGORY_FIELD, AttributeValue::Integer(category))
    }

    #[test]
    fn test_chart_id_from_path() {
        let id = ChartId::from_path(Path::new("/enc/ENC_ROOT/US5RI11M/US5RI11M.000")).unwrap();
        assert_eq!(id.as_str(), "US5RI11M");
        assert!(ChartId::from_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_metadata_rejects_zero_scale() {
        let result = ChartMetadata::new(ChartId::new("A"), "/a.json", 0, None);
        assert!(matches!(result, Err(ChartError::InvalidScale(0))));
    }

    #[test]
    fn test_metadata_drops_inverted_bbox() {
        let bbox = BoundingBox::new(1.0, 0.0, 0.0, 1.0);
        let meta = ChartMetadata::new(ChartId::new("A"), "/a.json", 8000, Some(bbox)).unwrap();
        assert!(meta.bbox().is_none());
    }

    #[test]
    fn test_read_scale() {
        let ds = MemoryDataset::new().with(DSID_LAYER, dsid(AttributeValue::Integer(22000)));
        assert_eq!(read_scale(&ds).unwrap(), 22000);
    }

    #[test]
    fn test_read_scale_missing_record() {
        let ds = MemoryDataset::new().with(DSID_LAYER, Vec::new());
        assert!(matches!(
            read_scale(&ds),
            Err(ChartError::MissingRecord(DSID_LAYER))
        ));

        let ds = MemoryDataset::new();
        assert!(matches!(
            read_scale(&ds),
            Err(ChartError::MissingLayer(DSID_LAYER))
        ));
    }

    #[test]
    fn test_read_scale_non_integer() {
        let ds = MemoryDataset::new().with(DSID_LAYER, dsid(AttributeValue::Real(8000.0)));
        assert!(matches!(
            read_scale(&ds),
            Err(ChartError::NotInteger {
                field: SCALE_FIELD,
                found: "real"
            })
        ));
    }

    #[test]
    fn test_read_scale_non_positive() {
        let ds = MemoryDataset::new().with(DSID_LAYER, dsid(AttributeValue::Integer(-5)));
        assert!(matches!(read_scale(&ds), Err(ChartError::InvalidScale(-5))));
    }

    #[test]
    fn test_coverage_bbox_skips_unavailable_rows() {
        let ds = MemoryDataset::new().with(
            COVERAGE_LAYER,
            vec![
                coverage(1, BoundingBox::new(0.0, 1.0, 0.0, 1.0), 1),
                coverage(2, BoundingBox::new(5.0, 6.0, 5.0, 6.0), 2),
                coverage(3, BoundingBox::new(2.0, 3.0, -1.0, 0.5), 1),
            ],
        );
        let bbox = coverage_bbox(&ds).unwrap().unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 3.0, -1.0, 1.0));
    }

    #[test]
    fn test_coverage_bbox_none_without_available_rows() {
        let ds = MemoryDataset::new().with(
            COVERAGE_LAYER,
            vec![coverage(1, BoundingBox::new(0.0, 1.0, 0.0, 1.0), 2)],
        );
        assert!(coverage_bbox(&ds).unwrap().is_none());
    }

    #[test]
    fn test_coverage_missing_category_is_fatal() {
        let row = Feature::new(
            FeatureId(1),
            Some(BoundingBox::new(0.0, 1.0, 0.0, 1.0).to_polygon().into()),
        );
        let ds = MemoryDataset::new().with(COVERAGE_LAYER, vec![row]);
        assert!(matches!(
            coverage_bbox(&ds),
            Err(ChartError::MissingField(COVERAGE_CATEGORY_FIELD))
        ));
    }

    #[test]
    fn test_coverage_polygon_is_exact_union() {
        // Two diagonal squares: the envelope is 4 units², the union only 2.
        let ds = MemoryDataset::new().with(
            COVERAGE_LAYER,
            vec![
                coverage(1, BoundingBox::new(0.0, 1.0, 0.0, 1.0), 1),
                coverage(2, BoundingBox::new(1.0, 2.0, 1.0, 2.0), 1),
            ],
        );
        let polygon = coverage_polygon(&ds, &GeoEngine::new()).unwrap();
        assert!((polygon.unsigned_area() - 2.0).abs() < 1e-9);
        assert_eq!(
            coverage_bbox(&ds).unwrap().unwrap(),
            BoundingBox::new(0.0, 2.0, 0.0, 2.0)
        );
    }

    #[test]
    fn test_read_metadata() {
        let ds = MemoryDataset::new()
            .with(DSID_LAYER, dsid(AttributeValue::Integer(8000)))
            .with(
                COVERAGE_LAYER,
                vec![coverage(1, BoundingBox::new(-71.6, -71.4, 41.3, 41.5), 1)],
            );
        let meta = read_metadata(&ds, Path::new("/charts/A.json")).unwrap();
        assert_eq!(meta.id().as_str(), "A");
        assert_eq!(meta.scale(), 8000);
        assert_eq!(meta.bbox(), Some(&BoundingBox::new(-71.6, -71.4, 41.3, 41.5)));
    }
}
