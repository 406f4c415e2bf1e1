//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::catalog::LoadPolicy;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Chart source settings
    pub charts: ChartSettings,
    /// Metadata cache settings
    pub cache: CacheSettings,
    /// Layer compositing settings
    pub layers: LayerSettings,
    /// Export settings
    pub export: ExportSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Chart cell format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// JSON cells with WKT geometry
    Json,
    /// Native S-57 cells through GDAL
    S57,
}

impl FromStr for DriverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(DriverKind::Json),
            "s57" => Ok(DriverKind::S57),
            other => Err(format!("unknown driver '{}'", other)),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::Json => write!(f, "json"),
            DriverKind::S57 => write!(f, "s57"),
        }
    }
}

/// Chart source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    /// Root of the chart source tree
    pub root: Option<PathBuf>,
    /// Cell format
    pub driver: DriverKind,
    /// File extension override (without dot)
    pub extension: Option<String>,
    /// What a batch load does with a chart that fails to load
    pub on_error: LoadPolicy,
}

/// Metadata cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Whether chart metadata is cached
    pub enabled: bool,
    /// Cache directory path
    pub directory: PathBuf,
}

/// Layer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    /// Layers merged whole across charts instead of clipped
    pub areal: Vec<String>,
    /// Layers exported when none are requested
    pub default: Vec<String>,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Display scale denominator at zoom 0
    pub scale_base: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
