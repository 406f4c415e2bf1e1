//! Polygon set operations used by the compositor.
//!
//! The [`GeometryEngine`] trait is the seam between compositing logic and the
//! geometry library. Exports receive the engine as an explicit capability so
//! independent exports never share hidden state.
//!
//! [`GeoEngine`] is the production implementation backed by the `geo` crate's
//! boolean operations.

use std::panic::{self, AssertUnwindSafe};

use geo::{Area, BooleanOps, CoordsIter, Intersects};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
};

use super::error::GeometryError;

/// Vector geometry primitives needed to composite chart cells.
pub trait GeometryEngine: Send + Sync {
    /// Clip a feature geometry to a region.
    ///
    /// Returns `Ok(None)` when nothing of the geometry lies inside the region.
    fn clip(
        &self,
        geometry: &Geometry<f64>,
        region: &MultiPolygon<f64>,
    ) -> Result<Option<Geometry<f64>>, GeometryError>;

    /// Drop the parts of a geometry that lie on already-covered ground.
    ///
    /// Points on or inside `covered` are removed, as are line segments whose
    /// ends and midpoint all lie on or inside it. Polygons pass through
    /// unchanged. Returns `Ok(None)` when nothing is left.
    fn exclude(
        &self,
        geometry: &Geometry<f64>,
        covered: &MultiPolygon<f64>,
    ) -> Result<Option<Geometry<f64>>, GeometryError>;

    /// Remove `coverage` from `region` (set difference).
    fn erase(
        &self,
        region: &MultiPolygon<f64>,
        coverage: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError>;

    /// Merge two geometries describing the same real-world feature.
    fn union(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> Result<Geometry<f64>, GeometryError>;

    /// Exact union of a set of polygonal coverage geometries.
    fn coverage_union(
        &self,
        geometries: &[Geometry<f64>],
    ) -> Result<MultiPolygon<f64>, GeometryError>;

    /// Whether a region has no remaining area.
    fn is_empty(&self, region: &MultiPolygon<f64>) -> bool;
}

/// [`GeometryEngine`] backed by `geo::BooleanOps`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoEngine;

impl GeoEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl GeometryEngine for GeoEngine {
    fn clip(
        &self,
        geometry: &Geometry<f64>,
        region: &MultiPolygon<f64>,
    ) -> Result<Option<Geometry<f64>>, GeometryError> {
        check_finite(geometry)?;
        guarded("clip", || clip_geometry(geometry, region))
    }

    fn exclude(
        &self,
        geometry: &Geometry<f64>,
        covered: &MultiPolygon<f64>,
    ) -> Result<Option<Geometry<f64>>, GeometryError> {
        if covered.0.is_empty() {
            return Ok(Some(geometry.clone()));
        }
        check_finite(geometry)?;
        guarded("exclude", || exclude_geometry(geometry, covered))
    }

    fn erase(
        &self,
        region: &MultiPolygon<f64>,
        coverage: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        if coverage.0.is_empty() {
            return Ok(region.clone());
        }
        check_finite(coverage)?;
        guarded("erase", || region.difference(coverage))
    }

    fn union(
        &self,
        a: &Geometry<f64>,
        b: &Geometry<f64>,
    ) -> Result<Geometry<f64>, GeometryError> {
        check_finite(a)?;
        check_finite(b)?;
        guarded("union", || union_geometries(a, b))
    }

    fn coverage_union(
        &self,
        geometries: &[Geometry<f64>],
    ) -> Result<MultiPolygon<f64>, GeometryError> {
        let mut merged = MultiPolygon::new(Vec::new());
        for geometry in geometries {
            check_finite(geometry)?;
            let polygons = polygonal(geometry)
                .ok_or_else(|| GeometryError::NotPolygonal(kind_name(geometry)))?;
            merged = if merged.0.is_empty() {
                polygons
            } else {
                guarded("coverage union", || merged.union(&polygons))?
            };
        }
        Ok(merged)
    }

    fn is_empty(&self, region: &MultiPolygon<f64>) -> bool {
        region.0.iter().all(|polygon| polygon.unsigned_area() == 0.0)
    }
}

/// Run a boolean operation, turning a panic inside the geometry library into
/// an engine failure.
fn guarded<T>(operation: &'static str, f: impl FnOnce() -> T) -> Result<T, GeometryError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "geometry library panicked".to_string());
        GeometryError::Operation { operation, reason }
    })
}

fn check_finite<G: CoordsIter<Scalar = f64>>(geometry: &G) -> Result<(), GeometryError> {
    match geometry
        .coords_iter()
        .find(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        Some(c) => Err(GeometryError::NonFinite { x: c.x, y: c.y }),
        None => Ok(()),
    }
}

fn clip_geometry(geometry: &Geometry<f64>, region: &MultiPolygon<f64>) -> Option<Geometry<f64>> {
    match geometry {
        Geometry::Point(point) => region.intersects(point).then(|| Geometry::Point(*point)),
        Geometry::MultiPoint(points) => {
            let kept: Vec<Point<f64>> = points
                .iter()
                .filter(|p| region.intersects(*p))
                .copied()
                .collect();
            collapse_points(kept)
        }
        Geometry::Line(line) => clip_lines(
            MultiLineString::new(vec![LineString::from(vec![line.start, line.end])]),
            region,
        ),
        Geometry::LineString(line) => clip_lines(MultiLineString::new(vec![line.clone()]), region),
        Geometry::MultiLineString(lines) => clip_lines(lines.clone(), region),
        Geometry::GeometryCollection(collection) => {
            let members: Vec<Geometry<f64>> = collection
                .iter()
                .filter_map(|member| clip_geometry(member, region))
                .collect();
            if members.is_empty() {
                None
            } else {
                Some(Geometry::GeometryCollection(GeometryCollection::new_from(
                    members,
                )))
            }
        }
        areal => {
            let polygons = polygonal(areal)?;
            collapse_polygons(polygons.intersection(region))
        }
    }
}

fn exclude_geometry(
    geometry: &Geometry<f64>,
    covered: &MultiPolygon<f64>,
) -> Option<Geometry<f64>> {
    match geometry {
        Geometry::Point(point) => (!covered.intersects(point)).then(|| Geometry::Point(*point)),
        Geometry::MultiPoint(points) => collapse_points(
            points
                .iter()
                .filter(|p| !covered.intersects(*p))
                .copied()
                .collect(),
        ),
        Geometry::GeometryCollection(collection) => {
            let members: Vec<Geometry<f64>> = collection
                .iter()
                .filter_map(|member| exclude_geometry(member, covered))
                .collect();
            if members.is_empty() {
                None
            } else {
                Some(Geometry::GeometryCollection(GeometryCollection::new_from(
                    members,
                )))
            }
        }
        other => match lineal(other) {
            Some(lines) => exclude_lines(&lines, covered),
            None => Some(other.clone()),
        },
    }
}

/// Split lines into runs of segments not lying on `covered`.
fn exclude_lines(
    lines: &MultiLineString<f64>,
    covered: &MultiPolygon<f64>,
) -> Option<Geometry<f64>> {
    let mut pieces: Vec<LineString<f64>> = Vec::new();
    for line in &lines.0 {
        let mut run: Vec<Coord<f64>> = Vec::new();
        for segment in line.lines() {
            let midpoint = Point::new(
                (segment.start.x + segment.end.x) / 2.0,
                (segment.start.y + segment.end.y) / 2.0,
            );
            let on_covered = covered.intersects(&Point::from(segment.start))
                && covered.intersects(&Point::from(segment.end))
                && covered.intersects(&midpoint);
            if on_covered {
                if run.len() > 1 {
                    pieces.push(LineString::new(std::mem::take(&mut run)));
                }
                run.clear();
            } else {
                if run.is_empty() {
                    run.push(segment.start);
                }
                run.push(segment.end);
            }
        }
        if run.len() > 1 {
            pieces.push(LineString::new(run));
        }
    }
    match pieces.len() {
        0 => None,
        1 => pieces.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(pieces))),
    }
}

fn clip_lines(lines: MultiLineString<f64>, region: &MultiPolygon<f64>) -> Option<Geometry<f64>> {
    let mut clipped = region.clip(&lines, false);
    clipped.0.retain(|line| line.0.len() > 1);
    match clipped.0.len() {
        0 => None,
        1 => clipped.0.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(clipped)),
    }
}

fn union_geometries(a: &Geometry<f64>, b: &Geometry<f64>) -> Geometry<f64> {
    if let (Some(pa), Some(pb)) = (polygonal(a), polygonal(b)) {
        return collapse_polygons(pa.union(&pb))
            .unwrap_or_else(|| Geometry::MultiPolygon(MultiPolygon::new(Vec::new())));
    }
    if let (Some(la), Some(lb)) = (lineal(a), lineal(b)) {
        let mut lines = la.0;
        for line in lb.0 {
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
        return if lines.len() == 1 {
            Geometry::LineString(lines.remove(0))
        } else {
            Geometry::MultiLineString(MultiLineString::new(lines))
        };
    }
    if let (Some(qa), Some(qb)) = (puntal(a), puntal(b)) {
        let mut points = qa.0;
        for point in qb.0 {
            if !points.contains(&point) {
                points.push(point);
            }
        }
        return collapse_points(points)
            .unwrap_or_else(|| Geometry::MultiPoint(MultiPoint::new(Vec::new())));
    }
    Geometry::GeometryCollection(GeometryCollection::new_from(vec![a.clone(), b.clone()]))
}

fn polygonal(geometry: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
        Geometry::MultiPolygon(polygons) => Some(polygons.clone()),
        Geometry::Rect(rect) => Some(MultiPolygon::new(vec![rect.to_polygon()])),
        Geometry::Triangle(triangle) => Some(MultiPolygon::new(vec![triangle.to_polygon()])),
        _ => None,
    }
}

fn lineal(geometry: &Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geometry {
        Geometry::Line(line) => Some(MultiLineString::new(vec![LineString::from(vec![
            line.start, line.end,
        ])])),
        Geometry::LineString(line) => Some(MultiLineString::new(vec![line.clone()])),
        Geometry::MultiLineString(lines) => Some(lines.clone()),
        _ => None,
    }
}

fn puntal(geometry: &Geometry<f64>) -> Option<MultiPoint<f64>> {
    match geometry {
        Geometry::Point(point) => Some(MultiPoint::new(vec![*point])),
        Geometry::MultiPoint(points) => Some(points.clone()),
        _ => None,
    }
}

fn collapse_polygons(mut polygons: MultiPolygon<f64>) -> Option<Geometry<f64>> {
    polygons.0.retain(|polygon| polygon.unsigned_area() > 0.0);
    match polygons.0.len() {
        0 => None,
        1 => polygons.0.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(polygons)),
    }
}

fn collapse_points(mut points: Vec<Point<f64>>) -> Option<Geometry<f64>> {
    match points.len() {
        0 => None,
        1 => points.pop().map(Geometry::Point),
        _ => Some(Geometry::MultiPoint(MultiPoint::new(points))),
    }
}

fn kind_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
