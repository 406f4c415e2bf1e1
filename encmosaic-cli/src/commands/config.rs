//! Configuration management CLI commands.
//!
//! Provides `config path` and `config init`.

use clap::Subcommand;
use encmosaic::config::ConfigFile;

use crate::error::CliError;
use crate::runner::GlobalOptions;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(options: &GlobalOptions, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", options.config_path().display());
            Ok(())
        }
        ConfigCommands::Init => run_init(options),
    }
}

fn run_init(options: &GlobalOptions) -> Result<(), CliError> {
    let path = options.config_path();
    if path.exists() {
        println!("Configuration already exists: {}", path.display());
        return Ok(());
    }
    ConfigFile::ensure_exists_at(&path)?;
    println!("Created configuration: {}", path.display());
    println!();
    println!("Set the chart source tree before exporting:");
    println!("  [charts]");
    println!("  root = /path/to/ENC_ROOT");
    Ok(())
}
