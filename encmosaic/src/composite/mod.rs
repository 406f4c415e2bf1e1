//! Seamless multi-scale composites.
//!
//! An [`ExportRequest`] names a query box, a minimum compilation scale and
//! the layers wanted. The [`Compositor`] walks the selected charts most
//! detailed first, shrinking a clip region by each chart's exact coverage,
//! so every point of the result comes from the most detailed chart that
//! covers it.
//!
//! Features of [`LayerKind::Areal`] layers are copied whole and merged by
//! feature identity across charts. This relies on overlapping cells
//! assigning the same identity to the same real-world feature, which the
//! compositor cannot verify.

mod compositor;
mod error;
mod layers;
mod policy;
mod request;
mod writer;

pub use compositor::{Composite, CompositeState, Compositor};
pub use error::CompositeError;
pub use layers::{OutputFeature, OutputLayer, OutputLayerSet};
pub use policy::{LayerKind, LayerPolicy, DEFAULT_AREAL_LAYERS};
pub use request::{zoom_scale_min, ExportRequest};
pub use writer::{to_document, write_json};
