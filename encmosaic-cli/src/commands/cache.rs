//! Metadata cache management CLI commands.

use clap::Subcommand;
use encmosaic::cache::MetadataCache;

use crate::error::CliError;
use crate::runner::GlobalOptions;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete every chart metadata record
    Clear,
    /// Show metadata cache statistics
    Stats,
}

/// Run a cache subcommand.
pub fn run(options: &GlobalOptions, action: CacheAction) -> Result<(), CliError> {
    let config = options.load_config()?;
    let cache = MetadataCache::new(&config.cache.directory);

    match action {
        CacheAction::Clear => {
            println!("Clearing metadata cache at: {}", cache.directory().display());
            let result = cache.clear()?;
            println!(
                "Deleted {} records, freed {}",
                result.records_deleted,
                format_size(result.bytes_freed)
            );
        }
        CacheAction::Stats => {
            println!("Metadata cache: {}", cache.directory().display());
            if !config.cache.enabled {
                println!("  (disabled in config)");
            }
            let stats = cache.stats()?;
            println!("  Records: {}", stats.records);
            println!("  Size:    {}", format_size(stats.bytes));
        }
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
