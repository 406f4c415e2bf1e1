//! Configuration for encmosaic.
//!
//! User settings live in `~/.encmosaic/config.ini`:
//!
//! ```ini
//! [charts]
//! root = ~/charts/ENC_ROOT
//! driver = json
//!
//! [layers]
//! areal = LNDARE, SEAARE, M_COVR
//! ```
//!
//! A missing file means defaults; unknown keys are ignored.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ChartSettings, ConfigFile, DriverKind, ExportSettings, LayerSettings,
    LoggingSettings,
};
