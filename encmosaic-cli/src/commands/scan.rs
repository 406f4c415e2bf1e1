//! Catalog scan command.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for `encmosaic scan`.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Chart source tree (defaults to [charts] root)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Load the catalog and print its totals.
///
/// Warms the metadata cache for later exports.
pub fn run(options: &GlobalOptions, args: ScanArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("scan");

    let root = runner.chart_root(args.root)?;
    let service = runner.create_service()?;
    runner.load_catalog(&service, &root)?;
    println!("Catalog holds {} charts", service.chart_count());
    Ok(())
}
