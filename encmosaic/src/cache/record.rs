//! Chart metadata cache records.
//!
//! Each chart gets one plain-text record named after its identity:
//!
//! ```text
//! /charts/ENC_ROOT/US5RI11M/US5RI11M.000
//! 8000
//! -71.6
//! -71.4
//! 41.3
//! 41.5
//! ```
//!
//! Lines are source path, compilation scale, min X, max X, min Y, max Y.
//! Undefined coverage is written as an inverted infinite box and reads back
//! as undefined.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::types::{CacheError, CacheMiss, CacheStats, ClearResult};
use crate::chart::{ChartId, ChartMetadata};
use crate::geometry::BoundingBox;

const RECORD_LINES: usize = 6;

/// Written in place of the bbox of a chart without available coverage.
const UNDEFINED_COVERAGE: BoundingBox = BoundingBox {
    min_x: f64::INFINITY,
    max_x: f64::NEG_INFINITY,
    min_y: f64::INFINITY,
    max_y: f64::NEG_INFINITY,
};

/// Disk-backed store of per-chart metadata records.
///
/// Lookups never fail: anything unexpected is a miss and the caller falls
/// back to a full parse of the chart.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    directory: PathBuf,
}

impl MetadataCache {
    /// Create a cache rooted at `directory`. The directory is created lazily
    /// on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Cache root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Location of the record for a chart identity.
    pub fn record_path(&self, id: &ChartId) -> PathBuf {
        self.directory.join(id.as_str())
    }

    /// Load the cached metadata for the chart at `path`.
    ///
    /// Returns `None` on any miss; the reason is logged at debug level.
    pub fn load(&self, path: &Path) -> Option<ChartMetadata> {
        match self.lookup(path) {
            Ok(meta) => Some(meta),
            Err(miss) => {
                debug!(path = %path.display(), reason = %miss, "Chart cache miss");
                None
            }
        }
    }

    /// Load the cached metadata, reporting why a record was not honored.
    pub fn lookup(&self, path: &Path) -> Result<ChartMetadata, CacheMiss> {
        let id = ChartId::from_path(path).map_err(|_| CacheMiss::NotFound)?;
        let record_path = self.record_path(&id);
        if !record_path.exists() {
            return Err(CacheMiss::NotFound);
        }
        let text = fs::read_to_string(&record_path).map_err(|_| CacheMiss::Unreadable)?;
        parse_record(&text, id, path)
    }

    /// Persist metadata for later runs.
    ///
    /// Creates the cache directory if needed. A failure here only means the
    /// next load re-parses the chart, so callers normally log and continue.
    pub fn save(&self, meta: &ChartMetadata) -> Result<(), CacheError> {
        fs::create_dir_all(&self.directory)?;
        let record_path = self.record_path(meta.id());
        fs::write(&record_path, format_record(meta)?)?;
        trace!(chart = %meta.id(), record = %record_path.display(), "Saved chart cache record");
        Ok(())
    }

    /// Delete every record in the cache directory.
    pub fn clear(&self) -> Result<ClearResult, CacheError> {
        let mut result = ClearResult::default();
        if !self.directory.exists() {
            return Ok(result);
        }
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                fs::remove_file(entry.path())?;
                result.records_deleted += 1;
                result.bytes_freed += metadata.len();
            }
        }
        Ok(result)
    }

    /// Count records and their total size.
    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut stats = CacheStats::default();
        if !self.directory.exists() {
            return Ok(stats);
        }
        for entry in fs::read_dir(&self.directory)? {
            let metadata = entry?.metadata()?;
            if metadata.is_file() {
                stats.records += 1;
                stats.bytes += metadata.len();
            }
        }
        Ok(stats)
    }
}

fn format_record(meta: &ChartMetadata) -> Result<String, CacheError> {
    let path = meta
        .path()
        .to_str()
        .filter(|p| !p.contains('\n'))
        .ok_or_else(|| CacheError::UnrepresentablePath(meta.path().to_path_buf()))?;
    let bbox = meta.bbox().copied().unwrap_or(UNDEFINED_COVERAGE);
    Ok(format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n",
        path,
        meta.scale(),
        bbox.min_x,
        bbox.max_x,
        bbox.min_y,
        bbox.max_y
    ))
}

fn parse_record(text: &str, id: ChartId, expected_path: &Path) -> Result<ChartMetadata, CacheMiss> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < RECORD_LINES {
        return Err(CacheMiss::Truncated);
    }
    if lines.len() > RECORD_LINES {
        return Err(CacheMiss::Malformed("trailing lines"));
    }

    if Path::new(lines[0]) != expected_path {
        return Err(CacheMiss::PathMismatch {
            cached: PathBuf::from(lines[0]),
        });
    }

    let scale: u32 = lines[1]
        .trim()
        .parse()
        .map_err(|_| CacheMiss::Malformed("scale"))?;
    let coord = |index: usize, field: &'static str| -> Result<f64, CacheMiss> {
        lines[index]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or(CacheMiss::Malformed(field))
    };
    let bbox = BoundingBox::new(
        coord(2, "min_x")?,
        coord(3, "max_x")?,
        coord(4, "min_y")?,
        coord(5, "max_y")?,
    );

    let bbox = if bbox == UNDEFINED_COVERAGE {
        None
    } else if bbox.is_valid() {
        Some(bbox)
    } else {
        return Err(CacheMiss::Malformed("bbox"));
    };

    ChartMetadata::new(id, expected_path, scale, bbox).map_err(|_| CacheMiss::Malformed("scale"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(path: &str, scale: u32, bbox: Option<BoundingBox>) -> ChartMetadata {
        let path = Path::new(path);
        ChartMetadata::new(ChartId::from_path(path).unwrap(), path, scale, bbox).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache"));
        let original = meta(
            "/enc/US5RI11M.000",
            8000,
            Some(BoundingBox::new(-71.6, -71.4, 41.3, 41.5)),
        );

        cache.save(&original).unwrap();
        let loaded = cache.load(Path::new("/enc/US5RI11M.000")).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_round_trip_undefined_coverage() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path());
        let original = meta("/enc/EMPTY.000", 22000, None);

        cache.save(&original).unwrap();
        let loaded = cache.load(Path::new("/enc/EMPTY.000")).unwrap();
        assert_eq!(loaded.scale(), 22000);
        assert!(loaded.bbox().is_none());
    }

    #[test]
    fn test_record_format() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path());
        cache
            .save(&meta(
                "/enc/A.000",
                8000,
                Some(BoundingBox::new(-71.6, -71.4, 41.3, 41.5)),
            ))
            .unwrap();

        let text = fs::read_to_string(dir.path().join("A")).unwrap();
        assert_eq!(text, "/enc/A.000\n8000\n-71.6\n-71.4\n41.3\n41.5\n");
    }

    #[test]
    fn test_path_mismatch_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path());
        cache.save(&meta("/old/A.000", 8000, None)).unwrap();

        assert!(matches!(
            cache.lookup(Path::new("/new/A.000")),
            Err(CacheMiss::PathMismatch { .. })
        ));
        assert!(cache.load(Path::new("/new/A.000")).is_none());
    }

    #[test]
    fn test_missing_record_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path());
        assert!(matches!(
            cache.lookup(Path::new("/enc/A.000")),
            Err(CacheMiss::NotFound)
        ));
    }

    #[test]
    fn test_truncated_record_is_miss() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A"), "/enc/A.000\n8000\n-71.6\n").unwrap();
        let cache = MetadataCache::new(dir.path());
        assert!(matches!(
            cache.lookup(Path::new("/enc/A.000")),
            Err(CacheMiss::Truncated)
        ));
    }

    #[test]
    fn test_malformed_fields_are_misses() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path());

        fs::write(dir.path().join("A"), "/enc/A.000\n8k\n0\n1\n0\n1\n").unwrap();
        assert!(matches!(
            cache.lookup(Path::new("/enc/A.000")),
            Err(CacheMiss::Malformed("scale"))
        ));

        fs::write(dir.path().join("A"), "/enc/A.000\n0\n0\n1\n0\n1\n").unwrap();
        assert!(matches!(
            cache.lookup(Path::new("/enc/A.000")),
            Err(CacheMiss::Malformed("scale"))
        ));

        fs::write(dir.path().join("A"), "/enc/A.000\n8000\n0\nwest\n0\n1\n").unwrap();
        assert!(matches!(
            cache.lookup(Path::new("/enc/A.000")),
            Err(CacheMiss::Malformed("max_x"))
        ));
    }

    #[test]
    fn test_inverted_bbox_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path());

        fs::write(
            dir.path().join("US5RI11M"),
            "/enc/US5RI11M.000\n8000\n-71.4\n-71.6\n41.3\n41.5\n",
        )
        .unwrap();
        assert!(matches!(
            cache.lookup(Path::new("/enc/US5RI11M.000")),
            Err(CacheMiss::Malformed("bbox"))
        ));

        fs::write(
            dir.path().join("US5RI11M"),
            "/enc/US5RI11M.000\n8000\ninf\n-71.6\n41.3\n41.5\n",
        )
        .unwrap();
        assert!(cache.load(Path::new("/enc/US5RI11M.000")).is_none());
    }

    #[test]
    fn test_extra_lines_are_miss() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A"), "/enc/A.000\n8000\n0\n1\n0\n1\n9\n").unwrap();
        let cache = MetadataCache::new(dir.path());
        assert!(matches!(
            cache.lookup(Path::new("/enc/A.000")),
            Err(CacheMiss::Malformed("trailing lines"))
        ));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        let cache = MetadataCache::new(&nested);
        cache.save(&meta("/enc/A.000", 8000, None)).unwrap();
        assert!(nested.join("A").exists());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let cache = MetadataCache::new(&blocker);
        assert!(cache.save(&meta("/enc/A.000", 8000, None)).is_err());
    }

    #[test]
    fn test_clear_and_stats() {
        let dir = TempDir::new().unwrap();
        let cache = MetadataCache::new(dir.path().join("cache"));
        assert_eq!(cache.stats().unwrap().records, 0);

        cache.save(&meta("/enc/A.000", 8000, None)).unwrap();
        cache.save(&meta("/enc/B.000", 20000, None)).unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.records, 2);
        assert!(stats.bytes > 0);

        let cleared = cache.clear().unwrap();
        assert_eq!(cleared.records_deleted, 2);
        assert_eq!(cleared.bytes_freed, stats.bytes);
        assert_eq!(cache.stats().unwrap().records, 0);
    }
}
