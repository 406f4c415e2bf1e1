//! Spatial selector: which charts can contribute to a query, in what order.

use crate::chart::ChartMetadata;
use crate::geometry::BoundingBox;

/// Select charts for a query region and detail threshold.
///
/// A chart is selected when its compilation scale is at least `scale_min`
/// and its coverage envelope touches `bbox`. Charts without defined coverage
/// never match. The result is ordered most detailed first (ascending scale),
/// equal scales ordered by chart identity so the order is reproducible.
///
/// An empty result means no data is available for the query.
pub fn select<'a, I>(charts: I, bbox: &BoundingBox, scale_min: u32) -> Vec<&'a ChartMetadata>
where
    I: IntoIterator<Item = &'a ChartMetadata>,
{
    let mut selected: Vec<&ChartMetadata> = charts
        .into_iter()
        .filter(|meta| meta.scale() >= scale_min)
        .filter(|meta| meta.bbox().is_some_and(|chart| chart.intersects(bbox)))
        .collect();
    selected.sort_by(|a, b| a.scale().cmp(&b.scale()).then_with(|| a.id().cmp(b.id())));
    selected
}
