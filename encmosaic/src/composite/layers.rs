//! Output layer set of a composite.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::chart::{ChartId, Feature, FeatureId};
use crate::geometry::{GeometryEngine, GeometryError};

/// A composited feature and the chart that first contributed it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFeature {
    pub chart: ChartId,
    pub feature: Feature,
}

/// Features of one requested layer.
#[derive(Debug, Clone, Default)]
pub struct OutputLayer {
    features: Vec<OutputFeature>,
    // Feature identity → position, maintained for areal merges only.
    areal_index: HashMap<FeatureId, usize>,
}

impl OutputLayer {
    pub fn features(&self) -> &[OutputFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// First feature stored under `id`.
    pub fn get(&self, id: FeatureId) -> Option<&OutputFeature> {
        match self.areal_index.get(&id) {
            Some(&position) => self.features.get(position),
            None => self.features.iter().find(|f| f.feature.id == id),
        }
    }

    /// Append a clipped feature.
    pub(crate) fn append(&mut self, chart: &ChartId, feature: Feature) {
        self.features.push(OutputFeature {
            chart: chart.clone(),
            feature,
        });
    }

    /// Copy a whole feature, unioning its geometry into any feature already
    /// stored under the same identity. The stored attributes are kept.
    pub(crate) fn merge(
        &mut self,
        chart: &ChartId,
        feature: Feature,
        engine: &dyn GeometryEngine,
    ) -> Result<(), GeometryError> {
        let Some(&position) = self.areal_index.get(&feature.id) else {
            self.areal_index.insert(feature.id, self.features.len());
            self.append(chart, feature);
            return Ok(());
        };

        let existing = &mut self.features[position].feature;
        let merged = match (&existing.geometry, feature.geometry) {
            (Some(current), Some(incoming)) => Some(engine.union(current, &incoming)?),
            (Some(current), None) => Some(current.clone()),
            (None, incoming) => incoming,
        };
        existing.geometry = merged;
        Ok(())
    }
}

/// Requested layer name → composited features, in request order.
///
/// Every requested layer is present, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct OutputLayerSet {
    layers: IndexMap<String, OutputLayer>,
}

impl OutputLayerSet {
    /// An empty layer for each name.
    pub fn new(names: &[String]) -> Self {
        Self {
            layers: names
                .iter()
                .map(|name| (name.clone(), OutputLayer::default()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OutputLayer> {
        self.layers.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut OutputLayer> {
        self.layers.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputLayer)> {
        self.layers.iter().map(|(name, layer)| (name.as_str(), layer))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Features across all layers.
    pub fn feature_count(&self) -> usize {
        self.layers.values().map(OutputLayer::len).sum()
    }
}
