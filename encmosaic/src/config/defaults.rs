//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::catalog::LoadPolicy;
use crate::composite::DEFAULT_AREAL_LAYERS;

/// Default chart cell format.
pub const DEFAULT_DRIVER: DriverKind = DriverKind::Json;

/// Default batch load policy.
pub const DEFAULT_ON_ERROR: LoadPolicy = LoadPolicy::Skip;

/// Metadata cache enabled by default.
pub const DEFAULT_CACHE_ENABLED: bool = true;

/// Layers exported when a request names none.
pub const DEFAULT_EXPORT_LAYERS: &[&str] = &[
    "LNDARE", "DEPARE", "DEPCNT", "COALNE", "SOUNDG", "LIGHTS",
];

/// Display scale at zoom 0 of a 256 px web mercator tile at the equator.
pub const DEFAULT_SCALE_BASE: f64 = 559_082_264.0;

/// Default metadata cache directory (~/.encmosaic/cache).
pub fn default_cache_directory() -> PathBuf {
    config_directory().join("cache")
}

/// Default log file (~/.encmosaic/logs/encmosaic.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join("encmosaic.log")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            charts: ChartSettings {
                root: None,
                driver: DEFAULT_DRIVER,
                extension: None,
                on_error: DEFAULT_ON_ERROR,
            },
            cache: CacheSettings {
                enabled: DEFAULT_CACHE_ENABLED,
                directory: default_cache_directory(),
            },
            layers: LayerSettings {
                areal: DEFAULT_AREAL_LAYERS.iter().map(|s| s.to_string()).collect(),
                default: DEFAULT_EXPORT_LAYERS.iter().map(|s| s.to_string()).collect(),
            },
            export: ExportSettings {
                scale_base: DEFAULT_SCALE_BASE,
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
