//! Construction of service components from configuration.

use std::sync::Arc;

use super::error::ServiceError;
use crate::cache::MetadataCache;
use crate::chart::{ChartDriver, JsonChartDriver};
use crate::composite::LayerPolicy;
use crate::config::{CacheSettings, ChartSettings, DriverKind, LayerSettings};

/// Create the chart driver named by the `[charts]` settings.
pub fn create_driver(settings: &ChartSettings) -> Result<Arc<dyn ChartDriver>, ServiceError> {
    match settings.driver {
        DriverKind::Json => {
            let driver: Arc<dyn ChartDriver> = Arc::new(match &settings.extension {
                Some(extension) => JsonChartDriver::with_extension(extension.as_str()),
                None => JsonChartDriver::new(),
            });
            Ok(driver)
        }
        DriverKind::S57 => create_s57_driver(settings),
    }
}

#[cfg(feature = "s57")]
fn create_s57_driver(settings: &ChartSettings) -> Result<Arc<dyn ChartDriver>, ServiceError> {
    if settings.extension.is_some() {
        tracing::warn!("charts.extension is ignored by the s57 driver");
    }
    Ok(Arc::new(crate::chart::S57Driver::new()))
}

#[cfg(not(feature = "s57"))]
fn create_s57_driver(_settings: &ChartSettings) -> Result<Arc<dyn ChartDriver>, ServiceError> {
    Err(ServiceError::ConfigError(
        "driver 's57' requires a build with the s57 feature".to_string(),
    ))
}

/// Create the metadata cache, or `None` when caching is disabled.
pub fn create_cache(settings: &CacheSettings) -> Option<MetadataCache> {
    settings
        .enabled
        .then(|| MetadataCache::new(&settings.directory))
}

/// Create the layer policy from the `[layers]` settings.
pub fn create_layer_policy(settings: &LayerSettings) -> LayerPolicy {
    LayerPolicy::new(settings.areal.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::LayerKind;
    use crate::config::ConfigFile;
    use std::path::PathBuf;

    #[test]
    fn test_json_driver_with_extension_override() {
        let mut config = ConfigFile::default();
        config.charts.extension = Some("enc".to_string());
        let driver = create_driver(&config.charts).unwrap();
        assert_eq!(driver.name(), "json");
        assert_eq!(driver.extension(), "enc");
    }

    #[cfg(not(feature = "s57"))]
    #[test]
    fn test_s57_driver_requires_feature() {
        let mut config = ConfigFile::default();
        config.charts.driver = DriverKind::S57;
        assert!(matches!(
            create_driver(&config.charts),
            Err(ServiceError::ConfigError(_))
        ));
    }

    #[test]
    fn test_cache_disabled() {
        let settings = CacheSettings {
            enabled: false,
            directory: PathBuf::from("/tmp/unused"),
        };
        assert!(create_cache(&settings).is_none());

        let settings = CacheSettings {
            enabled: true,
            ..settings
        };
        assert_eq!(
            create_cache(&settings).unwrap().directory(),
            PathBuf::from("/tmp/unused").as_path()
        );
    }

    #[test]
    fn test_layer_policy_from_settings() {
        let settings = LayerSettings {
            areal: vec!["RESARE".to_string()],
            default: vec!["DEPARE".to_string()],
        };
        let policy = create_layer_policy(&settings);
        assert_eq!(policy.kind("RESARE"), LayerKind::Areal);
        assert_eq!(policy.kind("LNDARE"), LayerKind::Clip);
    }
}
