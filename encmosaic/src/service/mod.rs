//! High-level service facade over the catalog and compositor.
//!
//! # Example
//!
//! ```no_run
//! use encmosaic::composite::ExportRequest;
//! use encmosaic::config::ConfigFile;
//! use encmosaic::geometry::BoundingBox;
//! use encmosaic::service::ChartService;
//! use std::path::Path;
//!
//! let config = ConfigFile::load()?;
//! let service = ChartService::from_config(&config)?;
//! service.load_charts(Path::new("/charts/ENC_ROOT"))?;
//!
//! let request = ExportRequest::new(
//!     BoundingBox::new(-71.55, -71.45, 41.35, 41.45),
//!     5000,
//!     ["LNDARE", "DEPCNT"],
//! )?;
//! if let Some(composite) = service.export(&request)? {
//!     println!("{} features", composite.layers.feature_count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod error;
mod facade;

pub use builder::{create_cache, create_driver, create_layer_policy};
pub use error::ServiceError;
pub use facade::ChartService;
