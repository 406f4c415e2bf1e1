//! encmosaic CLI - Command-line interface
//!
//! This binary provides a command-line interface to the encmosaic library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::export::ExportArgs;
use commands::scan::ScanArgs;
use runner::GlobalOptions;

#[derive(Parser)]
#[command(name = "encmosaic")]
#[command(version = encmosaic::VERSION)]
#[command(about = "Composite nautical chart cells into a single layer set", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.encmosaic/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging, also printed to stdout
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the chart catalog and print totals
    Scan(ScanArgs),

    /// Composite the charts covering a bounding box
    Export(ExportArgs),

    /// Manage the chart metadata cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        debug: cli.debug,
    };

    let result = match cli.command {
        Commands::Scan(args) => commands::scan::run(&options, args),
        Commands::Export(args) => commands::export::run(&options, args),
        Commands::Cache { action } => commands::cache::run(&options, action),
        Commands::Config { command } => commands::config::run(&options, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_requires_scale_or_zoom() {
        let parsed = Cli::try_parse_from(["encmosaic", "export", "--bbox", "0,1,0,1"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "encmosaic", "export", "--bbox", "0,1,0,1", "--scale", "5000", "--zoom", "12",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "encmosaic",
            "--debug",
            "export",
            "--bbox",
            "-71.55,-71.45,41.35,41.45",
            "--zoom",
            "12",
            "--layers",
            "LNDARE,DEPCNT",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.zoom, Some(12));
                assert_eq!(args.scale, None);
                assert_eq!(args.layers, vec!["LNDARE", "DEPCNT"]);
                assert!(args.output.is_none());
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["encmosaic", "cache", "stats", "--config", "/tmp/c.ini"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.ini")));
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheAction::Stats
            }
        ));
    }
}
