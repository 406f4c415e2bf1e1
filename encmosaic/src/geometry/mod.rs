//! Geometry primitives for chart compositing.
//!
//! - [`BoundingBox`]: envelope arithmetic in degrees
//! - [`GeometryEngine`]: clip, erase and union over vector geometry
//! - [`GeoEngine`]: the `geo`-backed engine used in production

mod bbox;
mod engine;
mod error;

pub use bbox::BoundingBox;
pub use engine::{GeoEngine, GeometryEngine};
pub use error::GeometryError;

pub use geo_types::{Geometry, MultiPolygon};
