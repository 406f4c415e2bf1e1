//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use encmosaic::cache::CacheError;
use encmosaic::composite::CompositeError;
use encmosaic::config::ConfigFileError;
use encmosaic::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to build the chart service
    ServiceCreation(ServiceError),
    /// Failed to load the chart catalog
    Load(ServiceError),
    /// Invalid export arguments
    Request(CompositeError),
    /// Export failed
    Export(ServiceError),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Cache maintenance failed
    Cache(CacheError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::ServiceCreation(ServiceError::ConfigError(_)) = self {
            eprintln!();
            eprintln!("Check the [charts] section of the config file:");
            eprintln!("  encmosaic config path");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ServiceCreation(e) => write!(f, "Failed to create chart service: {}", e),
            CliError::Load(e) => write!(f, "Failed to load charts: {}", e),
            CliError::Request(e) => write!(f, "Invalid export request: {}", e),
            CliError::Export(e) => write!(f, "Export failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Cache(e) => write!(f, "Cache operation failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ServiceCreation(e) | CliError::Load(e) | CliError::Export(e) => Some(e),
            CliError::Request(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Cache(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CliError::Config("no chart root".to_string());
        assert_eq!(err.to_string(), "Configuration error: no chart root");

        let err = CliError::FileWrite {
            path: PathBuf::from("/tmp/out.json"),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write file '/tmp/out.json': denied");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let err = CliError::Cache(CacheError::UnrepresentablePath(PathBuf::from("x")));
        assert!(err.source().is_some());
        assert!(CliError::LoggingInit("x".to_string()).source().is_none());
    }
}
