//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Metadata cache management (clear, stats)
//! - [`config`] - Configuration management (path, init)
//! - [`export`] - Composite the charts covering a query box
//! - [`scan`] - Load the chart catalog

pub mod cache;
pub mod config;
pub mod export;
pub mod scan;
