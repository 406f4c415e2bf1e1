//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [charts] section
    if let Some(section) = ini.section(Some("charts")) {
        if let Some(v) = section.get("root") {
            let v = v.trim();
            if !v.is_empty() {
                config.charts.root = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("driver") {
            config.charts.driver = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "charts".to_string(),
                key: "driver".to_string(),
                value: v.to_string(),
                reason: "must be one of: json, s57".to_string(),
            })?;
        }
        if let Some(v) = section.get("extension") {
            let v = v.trim().trim_start_matches('.');
            if !v.is_empty() {
                config.charts.extension = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("on_error") {
            config.charts.on_error = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "charts".to_string(),
                key: "on_error".to_string(),
                value: v.to_string(),
                reason: "must be one of: skip, abort".to_string(),
            })?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
    }

    // [layers] section
    if let Some(section) = ini.section(Some("layers")) {
        if let Some(v) = section.get("areal") {
            config.layers.areal = parse_list(v);
        }
        if let Some(v) = section.get("default") {
            let layers = parse_list(v);
            if layers.is_empty() {
                return Err(ConfigFileError::InvalidValue {
                    section: "layers".to_string(),
                    key: "default".to_string(),
                    value: v.to_string(),
                    reason: "must name at least one layer".to_string(),
                });
            }
            config.layers.default = layers;
        }
    }

    // [export] section
    if let Some(section) = ini.section(Some("export")) {
        if let Some(v) = section.get("scale_base") {
            config.export.scale_base = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "export".to_string(),
                    key: "scale_base".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive number".to_string(),
                })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Parse a comma-separated list of layer codes.
pub(super) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
