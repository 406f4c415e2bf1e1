//! encmosaic - Seamless composites of marine electronic navigational charts
//!
//! This library indexes chart cells by compilation scale and coverage, and
//! stitches the most detailed chart available at every point of a query box
//! into one multi-layer feature dataset.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use encmosaic::service::ChartService;
//! use encmosaic::config::ConfigFile;
//!
//! let service = ChartService::from_config(&ConfigFile::load()?)?;
//! service.load_charts(root)?;
//! let composite = service.export(&request)?;
//! ```
//!
//! The building blocks are usable directly: [`catalog::ChartCatalog`] for
//! metadata, [`select`] for ranking and [`composite::Compositor`] for the
//! stitching fold.

pub mod cache;
pub mod catalog;
pub mod chart;
pub mod composite;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod select;
pub mod service;

/// Version of the encmosaic library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
