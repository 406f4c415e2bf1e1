//! Chart service facade implementation.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::builder::{create_cache, create_driver, create_layer_policy};
use super::error::ServiceError;
use crate::cache::MetadataCache;
use crate::catalog::{ChartCatalog, LoadPolicy, LoadReport, LoadSource};
use crate::chart::ChartDriver;
use crate::composite::{Composite, Compositor, ExportRequest, LayerPolicy};
use crate::config::ConfigFile;
use crate::geometry::{GeoEngine, GeometryEngine};

/// Shared catalog plus compositor.
///
/// Catalog mutation takes the write lock and so never overlaps an export or
/// another mutation. Exports hold the read lock for their whole run and may
/// proceed in parallel from any number of threads; each builds its own clip
/// region and layer set.
pub struct ChartService {
    catalog: RwLock<ChartCatalog>,
    compositor: Compositor,
    load_policy: LoadPolicy,
}

impl ChartService {
    /// Create a service from explicit capabilities.
    pub fn new(
        driver: Arc<dyn ChartDriver>,
        engine: Arc<dyn GeometryEngine>,
        layer_policy: LayerPolicy,
        cache: Option<MetadataCache>,
        load_policy: LoadPolicy,
    ) -> Self {
        let mut catalog = ChartCatalog::new(Arc::clone(&driver));
        if let Some(cache) = cache {
            catalog = catalog.with_cache(cache);
        }
        Self {
            catalog: RwLock::new(catalog),
            compositor: Compositor::new(driver, engine, layer_policy),
            load_policy,
        }
    }

    /// Create a service from the configuration file settings.
    pub fn from_config(config: &ConfigFile) -> Result<Self, ServiceError> {
        let driver = create_driver(&config.charts)?;
        info!(
            driver = driver.name(),
            extension = driver.extension(),
            cache = config.cache.enabled,
            "Chart service configured"
        );
        Ok(Self::new(
            driver,
            Arc::new(GeoEngine::new()),
            create_layer_policy(&config.layers),
            create_cache(&config.cache),
            config.charts.on_error,
        ))
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.load_policy
    }

    /// Load every chart under `root` into the catalog.
    pub fn load_charts(&self, root: &Path) -> Result<LoadReport, ServiceError> {
        let mut catalog = self.catalog.write();
        Ok(catalog.load_charts(root, self.load_policy)?)
    }

    /// Load a single chart into the catalog.
    pub fn load_chart(&self, path: &Path) -> Result<LoadSource, ServiceError> {
        let mut catalog = self.catalog.write();
        Ok(catalog.load_chart(path)?)
    }

    /// Drop every catalog entry.
    pub fn clear(&self) {
        self.catalog.write().clear();
    }

    /// Number of charts in the catalog.
    pub fn chart_count(&self) -> usize {
        self.catalog.read().len()
    }

    /// Run `f` against the catalog under the read lock.
    pub fn with_catalog<R>(&self, f: impl FnOnce(&ChartCatalog) -> R) -> R {
        f(&self.catalog.read())
    }

    /// Composite the charts matching `request`.
    ///
    /// Returns `Ok(None)` when no chart matches.
    pub fn export(&self, request: &ExportRequest) -> Result<Option<Composite>, ServiceError> {
        let catalog = self.catalog.read();
        Ok(self.compositor.export(&catalog, request)?)
    }
}
