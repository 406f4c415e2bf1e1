//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and service creation
//! to reduce duplication across command handlers.

use std::path::{Path, PathBuf};

use encmosaic::catalog::LoadReport;
use encmosaic::config::{config_file_path, ConfigFile};
use encmosaic::logging::{init_logging, split_log_path, LoggingGuard};
use encmosaic::service::ChartService;
use tracing::info;

use crate::error::CliError;

/// Options every command shares.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file override
    pub config: Option<PathBuf>,
    /// Debug-level logging, mirrored to stdout
    pub debug: bool,
}

impl GlobalOptions {
    /// Path of the config file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }

    /// Load the config file in effect, or defaults when it does not exist.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        Ok(ConfigFile::load_from(&self.config_path())?)
    }
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a runner, loading config and initializing logging.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = options.load_config()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, options.debug, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("encmosaic v{}", encmosaic::VERSION);
        info!("encmosaic CLI: {} command", command);
    }

    /// Chart root from the command line, falling back to the config file.
    pub fn chart_root(&self, root: Option<PathBuf>) -> Result<PathBuf, CliError> {
        root.or_else(|| self.config.charts.root.clone()).ok_or_else(|| {
            CliError::Config(
                "No chart root. Set root in the [charts] section or use --root".to_string(),
            )
        })
    }

    /// Create the chart service described by the config file.
    pub fn create_service(&self) -> Result<ChartService, CliError> {
        ChartService::from_config(&self.config).map_err(CliError::ServiceCreation)
    }

    /// Load every chart under `root` and print the totals.
    pub fn load_catalog(&self, service: &ChartService, root: &Path) -> Result<LoadReport, CliError> {
        println!("Loading charts from: {}", root.display());
        let report = service.load_charts(root).map_err(CliError::Load)?;
        println!(
            "Loaded {} charts ({} from cache, {} parsed, {} failed)",
            report.loaded, report.from_cache, report.parsed, report.failed
        );
        Ok(report)
    }
}
