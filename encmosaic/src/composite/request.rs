//! Export requests.

use indexmap::IndexSet;

use super::error::CompositeError;
use crate::geometry::BoundingBox;

/// A query for one composite: region, detail threshold and layers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    bbox: BoundingBox,
    scale_min: u32,
    layers: Vec<String>,
}

impl ExportRequest {
    /// Build a request.
    ///
    /// Corners are normalised so `min <= max` on both axes. Repeated layer
    /// names are collapsed, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`CompositeError::InvalidQuery`] when a corner is not finite.
    pub fn new<I, S>(bbox: BoundingBox, scale_min: u32, layers: I) -> Result<Self, CompositeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bbox = BoundingBox::from_corners(bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y);
        if !bbox.is_valid() {
            return Err(CompositeError::InvalidQuery(bbox));
        }
        let layers: IndexSet<String> = layers.into_iter().map(Into::into).collect();
        Ok(Self {
            bbox,
            scale_min,
            layers: layers.into_iter().collect(),
        })
    }

    /// Build a request for a map tile at `zoom`.
    ///
    /// The threshold is `scale_base` (the display scale at zoom 0) corrected
    /// for the mean latitude of the box and halved per zoom level.
    pub fn for_zoom<I, S>(
        bbox: BoundingBox,
        zoom: u8,
        scale_base: f64,
        layers: I,
    ) -> Result<Self, CompositeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = Self::new(bbox, 0, layers)?;
        let scale_min = zoom_scale_min(request.bbox.center_lat(), zoom, scale_base);
        Ok(Self {
            scale_min,
            ..request
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn scale_min(&self) -> u32 {
        self.scale_min
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }
}

/// Minimum compilation scale shown at `zoom` around latitude `lat`.
pub fn zoom_scale_min(lat: f64, zoom: u8, scale_base: f64) -> u32 {
    let scale = scale_base * lat.to_radians().cos() / 2f64.powi(i32::from(zoom));
    // Saturating float-to-int cast.
    scale.round().max(0.0) as u32
}
