//! Persistent chart metadata cache.
//!
//! One small text record per chart lets a catalog reload skip opening every
//! cell. Records are keyed by chart identity and validated against the
//! chart path on read.

mod record;
mod types;

pub use record::MetadataCache;
pub use types::{CacheError, CacheMiss, CacheStats, ClearResult};
