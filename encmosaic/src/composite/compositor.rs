//! The compositing fold.
//!
//! Selected charts are visited most detailed first. Each [`Compositor::step`]
//! consumes a [`CompositeState`] and returns the next one:
//!
//! ```text
//! state₀ = (query box, empty layers)
//! stateₙ₊₁ = step(stateₙ, chartₙ)
//!     areal layers: copy, union by feature identity
//!     other layers: drop what lies on covered, clip to region
//!     region := region − coverage(chartₙ)
//!     covered := covered ∪ coverage(chartₙ)
//! stop when region is empty
//! ```

use std::sync::Arc;

use geo_types::{Geometry, MultiPolygon};
use tracing::{debug, info, trace};

use super::error::CompositeError;
use super::layers::OutputLayerSet;
use super::policy::{LayerKind, LayerPolicy};
use super::request::ExportRequest;
use crate::catalog::ChartCatalog;
use crate::chart::metadata::coverage_polygon;
use crate::chart::{ChartDataset, ChartDriver, ChartId, ChartMetadata, Feature};
use crate::geometry::{GeometryEngine, GeometryError};

/// Value threaded through the fold.
#[derive(Debug, Clone)]
pub struct CompositeState {
    /// Part of the query box not yet served by a processed chart.
    pub region: MultiPolygon<f64>,
    /// Union of the coverage of every processed chart.
    pub covered: MultiPolygon<f64>,
    pub layers: OutputLayerSet,
}

impl CompositeState {
    /// Initial state: the full query box and an empty layer per requested name.
    pub fn new(request: &ExportRequest) -> Self {
        Self {
            region: request.bbox().to_multi_polygon(),
            covered: MultiPolygon::new(Vec::new()),
            layers: OutputLayerSet::new(request.layers()),
        }
    }
}

/// Result of an export that matched at least one chart.
#[derive(Debug, Clone)]
pub struct Composite {
    pub layers: OutputLayerSet,
    /// Selected charts in processing order.
    pub selected: Vec<ChartId>,
    /// Charts actually opened, a prefix of `selected`.
    pub opened: Vec<ChartId>,
    /// Part of the query box no selected chart covers.
    pub remaining: MultiPolygon<f64>,
    /// Whether the selected charts cover the whole query box.
    pub complete: bool,
}

/// Builds composites from selected charts.
///
/// Holds the driver and geometry engine capabilities; it has no mutable
/// state, so one compositor can serve concurrent exports.
pub struct Compositor {
    driver: Arc<dyn ChartDriver>,
    engine: Arc<dyn GeometryEngine>,
    policy: LayerPolicy,
}

impl Compositor {
    pub fn new(
        driver: Arc<dyn ChartDriver>,
        engine: Arc<dyn GeometryEngine>,
        policy: LayerPolicy,
    ) -> Self {
        Self {
            driver,
            engine,
            policy,
        }
    }

    pub fn policy(&self) -> &LayerPolicy {
        &self.policy
    }

    pub fn engine(&self) -> &Arc<dyn GeometryEngine> {
        &self.engine
    }

    /// Select charts from `catalog` and composite them.
    ///
    /// Returns `Ok(None)` when no chart matches the request.
    pub fn export(
        &self,
        catalog: &ChartCatalog,
        request: &ExportRequest,
    ) -> Result<Option<Composite>, CompositeError> {
        info!(
            scale_min = request.scale_min(),
            bbox = %request.bbox(),
            layers = request.layers().len(),
            "Export filter"
        );
        let selected = catalog.select(request.bbox(), request.scale_min());
        debug!(
            selected = selected.len(),
            total = catalog.len(),
            charts = ?selected.iter().map(|m| (m.id().as_str(), m.scale())).collect::<Vec<_>>(),
            "Selected charts"
        );
        self.composite(&selected, request)
    }

    /// Composite an ordered chart selection.
    ///
    /// `charts` must be ordered most detailed first. Returns `Ok(None)` for
    /// an empty selection.
    pub fn composite(
        &self,
        charts: &[&ChartMetadata],
        request: &ExportRequest,
    ) -> Result<Option<Composite>, CompositeError> {
        if charts.is_empty() {
            info!(bbox = %request.bbox(), "No chart data available");
            return Ok(None);
        }

        let mut state = CompositeState::new(request);
        let mut opened = Vec::new();
        for chart in charts {
            state = self.step(state, chart, request)?;
            opened.push(chart.id().clone());
            if self.engine.is_empty(&state.region) {
                info!(chart = %chart.id(), "Complete coverage, stopping");
                break;
            }
        }

        let complete = self.engine.is_empty(&state.region);
        Ok(Some(Composite {
            layers: state.layers,
            selected: charts.iter().map(|m| m.id().clone()).collect(),
            opened,
            remaining: state.region,
            complete,
        }))
    }

    /// Fold one chart into the state.
    pub fn step(
        &self,
        state: CompositeState,
        chart: &ChartMetadata,
        request: &ExportRequest,
    ) -> Result<CompositeState, CompositeError> {
        let id = chart.id();
        debug!(chart = %id, scale = chart.scale(), "Processing chart");

        let dataset = self
            .driver
            .open(chart.path())
            .map_err(|source| CompositeError::Open {
                chart: id.clone(),
                source,
            })?;

        let CompositeState {
            region,
            covered,
            mut layers,
        } = state;

        for name in request.layers() {
            let Some(features) = read_layer(dataset.as_ref(), id, name)? else {
                trace!(chart = %id, layer = %name, "Layer absent, skipping");
                continue;
            };
            let Some(output) = layers.get_mut(name) else {
                continue;
            };

            match self.policy.kind(name) {
                LayerKind::Areal => {
                    for feature in features {
                        output
                            .merge(id, feature, self.engine.as_ref())
                            .map_err(|source| CompositeError::Geometry {
                                chart: id.clone(),
                                layer: name.clone(),
                                operation: "copy",
                                source,
                            })?;
                    }
                }
                LayerKind::Clip => {
                    for feature in features {
                        if let Some(clipped) = self.clip_feature(feature, &region, &covered).map_err(
                            |source| CompositeError::Geometry {
                                chart: id.clone(),
                                layer: name.clone(),
                                operation: "clip",
                                source,
                            },
                        )? {
                            output.append(id, clipped);
                        }
                    }
                }
            }
        }

        let coverage = coverage_polygon(dataset.as_ref(), self.engine.as_ref()).map_err(
            |source| CompositeError::Coverage {
                chart: id.clone(),
                source,
            },
        )?;
        let region = self
            .engine
            .erase(&region, &coverage)
            .map_err(|source| CompositeError::Erase {
                chart: id.clone(),
                source,
            })?;
        let covered = if covered.0.is_empty() {
            coverage
        } else {
            let merged = [Geometry::MultiPolygon(covered), Geometry::MultiPolygon(coverage)];
            self.engine
                .coverage_union(&merged)
                .map_err(|source| CompositeError::Erase {
                    chart: id.clone(),
                    source,
                })?
        };
        drop(dataset);

        Ok(CompositeState {
            region,
            covered,
            layers,
        })
    }

    fn clip_feature(
        &self,
        mut feature: Feature,
        region: &MultiPolygon<f64>,
        covered: &MultiPolygon<f64>,
    ) -> Result<Option<Feature>, GeometryError> {
        let Some(geometry) = feature.geometry.take() else {
            return Ok(None);
        };
        // Region boundaries are shared with covered ground; keep seam
        // features with the chart that contributed them first.
        let Some(geometry) = self.engine.exclude(&geometry, covered)? else {
            return Ok(None);
        };
        Ok(self.engine.clip(&geometry, region)?.map(|clipped| {
            feature.geometry = Some(clipped);
            feature
        }))
    }
}

fn read_layer(
    dataset: &dyn ChartDataset,
    chart: &ChartId,
    name: &str,
) -> Result<Option<Vec<Feature>>, CompositeError> {
    dataset
        .layer(name)
        .map_err(|source| CompositeError::Layer {
            chart: chart.clone(),
            layer: name.to_string(),
            source,
        })
}
