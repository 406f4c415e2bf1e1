//! Axis-aligned bounding boxes in geographic degrees.
//!
//! A [`BoundingBox`] describes either a query region or the conservative
//! coverage envelope of a chart cell. Longitude is the X axis, latitude the
//! Y axis, matching the axis order of WKT and `geo-types`.

use std::fmt;

use geo::BoundingRect;
use geo_types::{coord, Geometry, MultiPolygon, Polygon, Rect};

/// A rectangle in degrees (WGS84), inclusive on every edge.
///
/// # Examples
///
/// ```
/// use encmosaic::geometry::BoundingBox;
///
/// let chart = BoundingBox::new(-71.6, -71.4, 41.3, 41.5);
/// let query = BoundingBox::new(-71.55, -71.45, 41.35, 41.45);
/// assert!(chart.intersects(&query));
/// assert!(chart.contains(&query));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge (minimum longitude).
    pub min_x: f64,
    /// Eastern edge (maximum longitude).
    pub max_x: f64,
    /// Southern edge (minimum latitude).
    pub min_y: f64,
    /// Northern edge (maximum latitude).
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box from its edges, in `min_x, max_x, min_y, max_y` order.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Create a bounding box from two opposite corners given in any order.
    ///
    /// Corners are sorted so the result is well formed.
    pub fn from_corners(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self::new(x1.min(x2), x1.max(x2), y1.min(y2), y1.max(y2))
    }

    /// A box covering the whole globe.
    pub fn world() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    /// Envelope of a geometry, or `None` for an empty geometry.
    pub fn of_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        geometry.bounding_rect().map(Self::from)
    }

    /// Whether the edges describe a non-inverted rectangle of finite values.
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    /// Envelope intersection test. Touching edges count as intersecting.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    /// Smallest box enclosing both boxes.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.max_x.max(other.max_x),
            self.min_y.min(other.min_y),
            self.max_y.max(other.max_y),
        )
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Mean latitude of the box.
    pub fn center_lat(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }

    /// The box as a closed polygon (SW → SE → NE → NW → SW).
    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
        .to_polygon()
    }

    /// The box as a single-member multi-polygon, the shape of a clip region.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![self.to_polygon()])
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} to {}),({} to {})",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::{line_string, polygon};

    #[test]
    fn test_from_corners_normalizes_inverted_edges() {
        let bbox = BoundingBox::from_corners(-71.3, -71.5, 41.5, 41.4);
        assert_eq!(bbox, BoundingBox::new(-71.5, -71.3, 41.4, 41.5));
        assert!(bbox.is_valid());
    }

    #[test]
    fn test_intersects_overlapping() {
        let a = BoundingBox::new(-71.6, -71.4, 41.3, 41.5);
        let b = BoundingBox::new(-71.7, -71.3, 41.2, 41.6);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_intersects_touching_edge() {
        let a = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox::new(1.0, 2.0, 0.0, 1.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_intersects_disjoint() {
        let a = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox::new(1.5, 2.0, 0.0, 1.0);
        assert!(!a.intersects(&b));
        let c = BoundingBox::new(0.0, 1.0, 2.0, 3.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_merge_encloses_both() {
        let a = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox::new(2.0, 3.0, -1.0, 0.5);
        let merged = a.merge(&b);
        assert_eq!(merged, BoundingBox::new(0.0, 3.0, -1.0, 1.0));
        assert!(merged.contains(&a));
        assert!(merged.contains(&b));
    }

    #[test]
    fn test_inverted_box_is_invalid() {
        let bbox = BoundingBox::new(f64::INFINITY, f64::NEG_INFINITY, 0.0, 1.0);
        assert!(!bbox.is_valid());
    }

    #[test]
    fn test_to_polygon_area() {
        let bbox = BoundingBox::new(0.0, 2.0, 0.0, 3.0);
        assert!((bbox.to_polygon().unsigned_area() - 6.0).abs() < 1e-12);
        assert_eq!(bbox.to_multi_polygon().0.len(), 1);
    }

    #[test]
    fn test_of_geometry() {
        let poly: Geometry<f64> = polygon![(x: 1.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 5.0)].into();
        let bbox = BoundingBox::of_geometry(&poly).unwrap();
        assert_eq!(bbox, BoundingBox::new(1.0, 4.0, 2.0, 5.0));

        let line: Geometry<f64> = line_string![(x: -1.0, y: 0.0), (x: 1.0, y: 0.5)].into();
        let bbox = BoundingBox::of_geometry(&line).unwrap();
        assert_eq!(bbox, BoundingBox::new(-1.0, 1.0, 0.0, 0.5));
    }

    #[test]
    fn test_display() {
        let bbox = BoundingBox::new(-71.5, -71.3, 41.4, 41.5);
        assert_eq!(bbox.to_string(), "(-71.5 to -71.3),(41.4 to 41.5)");
    }
}
