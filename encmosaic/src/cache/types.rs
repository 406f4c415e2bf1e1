//! Cache types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from writing or maintaining the metadata cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart path cannot be stored on a single UTF-8 line
    #[error("Chart path cannot be cached: {}", .0.display())]
    UnrepresentablePath(PathBuf),
}

/// Why a cache record was not honored.
///
/// Every miss falls back to a full parse of the chart.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheMiss {
    /// No record for this chart identity
    NotFound,
    /// Record exists but could not be read
    Unreadable,
    /// Record has fewer than six lines
    Truncated,
    /// A field failed to parse
    Malformed(&'static str),
    /// Record was written for a chart at a different path
    PathMismatch { cached: PathBuf },
}

impl fmt::Display for CacheMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheMiss::NotFound => write!(f, "no record"),
            CacheMiss::Unreadable => write!(f, "record unreadable"),
            CacheMiss::Truncated => write!(f, "record truncated"),
            CacheMiss::Malformed(field) => write!(f, "malformed {}", field),
            CacheMiss::PathMismatch { cached } => {
                write!(f, "record is for {}", cached.display())
            }
        }
    }
}

/// Record count and on-disk size of the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub records: usize,
    pub bytes: u64,
}

/// Outcome of clearing the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub records_deleted: usize,
    pub bytes_freed: u64,
}
