//! The chart catalog: identity → metadata.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::error::CatalogError;
use super::report::{LoadPolicy, LoadReport, LoadSource};
use crate::cache::MetadataCache;
use crate::chart::metadata::read_metadata;
use crate::chart::{ChartDriver, ChartId, ChartMetadata};
use crate::geometry::BoundingBox;
use crate::select;

/// Metadata of every loaded chart, keyed by chart identity.
pub struct ChartCatalog {
    charts: HashMap<ChartId, ChartMetadata>,
    driver: Arc<dyn ChartDriver>,
    cache: Option<MetadataCache>,
}

impl ChartCatalog {
    /// Create an empty catalog reading charts through `driver`, without a cache.
    pub fn new(driver: Arc<dyn ChartDriver>) -> Self {
        Self {
            charts: HashMap::new(),
            driver,
            cache: None,
        }
    }

    /// Back the catalog with a metadata cache.
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn driver(&self) -> &Arc<dyn ChartDriver> {
        &self.driver
    }

    pub fn cache(&self) -> Option<&MetadataCache> {
        self.cache.as_ref()
    }

    /// Load one chart, trying the cache before parsing the file.
    ///
    /// A parsed chart is written through to the cache. A failed cache write
    /// is logged and otherwise ignored.
    pub fn load_chart(&mut self, path: &Path) -> Result<LoadSource, CatalogError> {
        if let Some(meta) = self.cache.as_ref().and_then(|cache| cache.load(path)) {
            debug!(
                chart = %meta.id(),
                scale = meta.scale(),
                "Chart metadata honored from cache"
            );
            self.insert(meta);
            return Ok(LoadSource::Cache);
        }

        let meta = self.load_chart_disk(path)?.clone();
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(&meta) {
                warn!(chart = %meta.id(), error = %e, "Failed to write chart cache record");
            }
        }
        Ok(LoadSource::Disk)
    }

    /// Fully parse a chart file and insert its metadata.
    pub fn load_chart_disk(&mut self, path: &Path) -> Result<&ChartMetadata, CatalogError> {
        let chart_error = |source| CatalogError::Chart {
            path: path.to_path_buf(),
            source,
        };
        let dataset = self.driver.open(path).map_err(chart_error)?;
        let meta = read_metadata(dataset.as_ref(), path).map_err(chart_error)?;
        drop(dataset);

        match meta.bbox() {
            Some(bbox) => info!(
                chart = %meta.id(),
                path = %path.display(),
                scale = meta.scale(),
                coverage = %bbox,
                "Opened chart"
            ),
            None => info!(
                chart = %meta.id(),
                path = %path.display(),
                scale = meta.scale(),
                "Opened chart without available coverage"
            ),
        }

        Ok(self.insert(meta))
    }

    /// Recursively load every chart under `root` matching the driver's extension.
    ///
    /// Files are visited in sorted path order. Per-chart failures follow
    /// `policy`; directory traversal errors always follow it too.
    pub fn load_charts(
        &mut self,
        root: &Path,
        policy: LoadPolicy,
    ) -> Result<LoadReport, CatalogError> {
        if !root.is_dir() {
            return Err(CatalogError::RootNotFound(root.to_path_buf()));
        }

        let extension = self.driver.extension().to_string();
        let mut report = LoadReport::default();

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if policy == LoadPolicy::Skip => {
                    warn!(error = %e, "Skipping unreadable chart directory entry");
                    report.failed += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !entry.file_type().is_file() || !has_extension(entry.path(), &extension) {
                continue;
            }

            match self.load_chart(entry.path()) {
                Ok(source) => report.record(source),
                Err(e) if policy == LoadPolicy::Skip => {
                    warn!(error = %e, "Skipping chart");
                    report.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            root = %root.display(),
            loaded = report.loaded,
            from_cache = report.from_cache,
            parsed = report.parsed,
            failed = report.failed,
            "Chart catalog loaded"
        );
        Ok(report)
    }

    /// Drop every catalog entry.
    pub fn clear(&mut self) {
        let count = self.charts.len();
        self.charts.clear();
        debug!(count, "Chart catalog cleared");
    }

    pub fn get(&self, id: &ChartId) -> Option<&ChartMetadata> {
        self.charts.get(id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Iterate over the entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ChartMetadata> {
        self.charts.values()
    }

    /// Charts able to contribute to a query, most detailed first.
    pub fn select(&self, bbox: &BoundingBox, scale_min: u32) -> Vec<&ChartMetadata> {
        select::select(self.charts.values(), bbox, scale_min)
    }

    fn insert(&mut self, meta: ChartMetadata) -> &ChartMetadata {
        match self.charts.entry(meta.id().clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().path() != meta.path() {
                    warn!(
                        chart = %meta.id(),
                        previous = %entry.get().path().display(),
                        replacement = %meta.path().display(),
                        "Duplicate chart identity, later path replaces earlier"
                    );
                }
                entry.insert(meta);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(meta),
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::metadata::{COVERAGE_CATEGORY_FIELD, COVERAGE_LAYER, DSID_LAYER, SCALE_FIELD};
    use crate::chart::{AttributeValue, CellDocument, CellFeature, JsonChartDriver};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_chart(dir: &Path, name: &str, scale: i64, bbox: BoundingBox) -> PathBuf {
        let mut doc = CellDocument::new();
        doc.push(
            DSID_LAYER,
            CellFeature {
                fid: 1,
                chart: None,
                geometry: None,
                attributes: BTreeMap::from([(SCALE_FIELD.to_string(), AttributeValue::Integer(scale))]),
            },
        );
        doc.push(
            COVERAGE_LAYER,
            CellFeature {
                fid: 2,
                chart: None,
                geometry: Some(format!(
                    "POLYGON(({x0} {y0},{x1} {y0},{x1} {y1},{x0} {y1},{x0} {y0}))",
                    x0 = bbox.min_x,
                    x1 = bbox.max_x,
                    y0 = bbox.min_y,
                    y1 = bbox.max_y
                )),
                attributes: BTreeMap::from([(
                    COVERAGE_CATEGORY_FIELD.to_string(),
                    AttributeValue::Integer(1),
                )]),
            },
        );
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(format!("{}.json", name));
        doc.write_to(&path).unwrap();
        path
    }

    fn catalog() -> ChartCatalog {
        ChartCatalog::new(Arc::new(JsonChartDriver::new()))
    }

    #[test]
    fn test_load_chart_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = write_chart(dir.path(), "A", 8000, BoundingBox::new(-71.6, -71.4, 41.3, 41.5));

        let mut catalog = catalog();
        assert_eq!(catalog.load_chart(&path).unwrap(), LoadSource::Disk);

        let meta = catalog.get(&ChartId::new("A")).unwrap();
        assert_eq!(meta.scale(), 8000);
        assert_eq!(meta.bbox(), Some(&BoundingBox::new(-71.6, -71.4, 41.3, 41.5)));
    }

    #[test]
    fn test_load_chart_writes_through_and_reads_cache() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");
        let path = write_chart(&dir.path().join("charts"), "A", 8000, BoundingBox::new(0.0, 1.0, 0.0, 1.0));

        let mut first = catalog().with_cache(MetadataCache::new(&cache_dir));
        assert_eq!(first.load_chart(&path).unwrap(), LoadSource::Disk);
        assert!(cache_dir.join("A").exists());

        // The cache alone is enough once the record exists.
        fs::remove_file(&path).unwrap();
        let mut second = catalog().with_cache(MetadataCache::new(&cache_dir));
        assert_eq!(second.load_chart(&path).unwrap(), LoadSource::Cache);
        assert_eq!(
            second.get(&ChartId::new("A")),
            first.get(&ChartId::new("A"))
        );
    }

    #[test]
    fn test_cache_write_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let path = write_chart(dir.path(), "A", 8000, BoundingBox::new(0.0, 1.0, 0.0, 1.0));

        let mut catalog = catalog().with_cache(MetadataCache::new(&blocker));
        assert_eq!(catalog.load_chart(&path).unwrap(), LoadSource::Disk);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_chart_open_failure() {
        let dir = TempDir::new().unwrap();
        let mut catalog = catalog();
        let result = catalog.load_chart(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Chart { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_charts_recursive_with_extension_filter() {
        let dir = TempDir::new().unwrap();
        write_chart(&dir.path().join("US5/A"), "A", 8000, BoundingBox::new(0.0, 1.0, 0.0, 1.0));
        write_chart(&dir.path().join("US4/B"), "B", 20000, BoundingBox::new(0.0, 2.0, 0.0, 2.0));
        fs::write(dir.path().join("README.txt"), "not a chart").unwrap();

        let mut catalog = catalog();
        let report = catalog.load_charts(dir.path(), LoadPolicy::Abort).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.parsed, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_charts_skip_policy_isolates_bad_chart() {
        let dir = TempDir::new().unwrap();
        write_chart(dir.path(), "A", 8000, BoundingBox::new(0.0, 1.0, 0.0, 1.0));
        fs::write(dir.path().join("BAD.json"), "{ broken").unwrap();

        let mut catalog = catalog();
        let report = catalog.load_charts(dir.path(), LoadPolicy::Skip).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.failed, 1);

        let mut strict = self::catalog();
        assert!(strict.load_charts(dir.path(), LoadPolicy::Abort).is_err());
    }

    #[test]
    fn test_load_charts_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = catalog().load_charts(&dir.path().join("nope"), LoadPolicy::Skip);
        assert!(matches!(result, Err(CatalogError::RootNotFound(_))));
    }

    #[test]
    fn test_duplicate_identity_later_path_wins() {
        let dir = TempDir::new().unwrap();
        write_chart(&dir.path().join("a"), "DUP", 8000, BoundingBox::new(0.0, 1.0, 0.0, 1.0));
        let later = write_chart(&dir.path().join("b"), "DUP", 12000, BoundingBox::new(5.0, 6.0, 5.0, 6.0));

        let mut catalog = catalog();
        catalog.load_charts(dir.path(), LoadPolicy::Abort).unwrap();
        assert_eq!(catalog.len(), 1);
        let meta = catalog.get(&ChartId::new("DUP")).unwrap();
        assert_eq!(meta.path(), later.as_path());
        assert_eq!(meta.scale(), 12000);
    }

    #[test]
    fn test_clear_and_select() {
        let dir = TempDir::new().unwrap();
        write_chart(dir.path(), "A", 8000, BoundingBox::new(-71.6, -71.4, 41.3, 41.5));
        write_chart(dir.path(), "B", 20000, BoundingBox::new(-71.7, -71.3, 41.2, 41.6));

        let mut catalog = catalog();
        catalog.load_charts(dir.path(), LoadPolicy::Abort).unwrap();

        let selected = catalog.select(&BoundingBox::world(), 0);
        let ids: Vec<&str> = selected.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.select(&BoundingBox::world(), 0).is_empty());
    }

    #[test]
    fn test_catalog_entries_are_well_formed() {
        let dir = TempDir::new().unwrap();
        write_chart(dir.path(), "A", 8000, BoundingBox::new(-71.6, -71.4, 41.3, 41.5));
        write_chart(dir.path(), "B", 1, BoundingBox::new(3.0, 3.0, 4.0, 4.0));

        let mut catalog = catalog();
        catalog.load_charts(dir.path(), LoadPolicy::Abort).unwrap();
        for meta in catalog.iter() {
            assert!(meta.scale() > 0);
            if let Some(bbox) = meta.bbox() {
                assert!(bbox.min_x <= bbox.max_x && bbox.min_y <= bbox.max_y);
            }
        }
    }
}
