//! In-memory chart catalog.
//!
//! ```text
//! load_charts(root) ─► walk *.ext ─► load_chart(path)
//!                                        │
//!                         cache hit ◄────┤
//!                                        └─► load_chart_disk(path) ─► cache.save
//! ```
//!
//! Mutation is single-writer; see [`crate::service::ChartService`] for the
//! locking used when exports run concurrently.

mod error;
mod index;
mod report;

pub use error::CatalogError;
pub use index::ChartCatalog;
pub use report::{LoadPolicy, LoadReport, LoadSource};
