//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let root = config
        .charts
        .root
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let extension = config.charts.extension.as_deref().unwrap_or("");
    let cache_enabled = if config.cache.enabled { "true" } else { "false" };

    format!(
        r#"[charts]
; Root of the chart source tree, scanned recursively
; Example: root = ~/charts/ENC_ROOT
root = {}
; Chart cell format:
;   json - JSON cells with WKT geometry (*.json)
;   s57  - native S-57 cells through GDAL (*.000, needs the s57 build feature)
driver = {}
; File extension to scan for, overriding the driver's own (without dot)
extension = {}
; What to do when one chart of a batch fails to load:
;   skip  - log a warning and continue (default)
;   abort - stop the batch with an error
on_error = {}

[cache]
; Cache per-chart scale and coverage so reloads skip parsing every cell
enabled = {}
; One small record per chart, named after the chart
directory = {}

[layers]
; Layers whose features are merged whole across adjacent charts
; instead of being clipped at chart boundaries (comma-separated)
areal = {}
; Layers exported when none are requested (comma-separated)
default = {}

[export]
; Display scale denominator at zoom 0, used to derive the minimum
; chart scale for zoom-level exports
scale_base = {}

[logging]
; Log file, truncated at the start of every session
file = {}
"#,
        root,
        config.charts.driver,
        extension,
        config.charts.on_error,
        cache_enabled,
        path_to_string(&config.cache.directory),
        config.layers.areal.join(", "),
        config.layers.default.join(", "),
        config.export.scale_base,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::{ConfigFile, DriverKind};
    use crate::catalog::LoadPolicy;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.charts.root = Some(PathBuf::from("/data/ENC_ROOT"));
        config.charts.driver = DriverKind::S57;
        config.charts.on_error = LoadPolicy::Abort;
        config.cache.enabled = false;
        config.cache.directory = temp_dir.path().join("cache");
        config.layers.areal = vec!["LNDARE".to_string(), "RESARE".to_string()];
        config.export.scale_base = 250_000_000.0;

        config.save_to(&config_path).unwrap();

        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let config = ConfigFile::default();
        config.save_to(&config_path).unwrap();
        assert_eq!(ConfigFile::load_from(&config_path).unwrap(), config);
    }
}
