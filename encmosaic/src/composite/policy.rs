//! Per-layer compositing policy.

use std::collections::BTreeSet;

/// Thematic layers whose features are merged whole across charts by default.
///
/// Traffic separation scheme lane parts, anchor berths, land areas, sea
/// areas, built-up areas, land regions, submarine cables and coverage.
pub const DEFAULT_AREAL_LAYERS: &[&str] = &[
    "TSSLPT", "ACHBRT", "LNDARE", "SEAARE", "BUAARE", "LNDRGN", "CBLSUB", "M_COVR",
];

/// How features of a layer enter the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Copied whole; a feature already present under the same identity has
    /// its geometry unioned with the new one.
    Areal,
    /// Clipped to the region not yet served by a more detailed chart.
    Clip,
}

/// Maps layer names to a [`LayerKind`]. Unlisted layers are [`LayerKind::Clip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPolicy {
    areal: BTreeSet<String>,
}

impl LayerPolicy {
    /// Policy treating exactly `areal` as areal layers.
    pub fn new<I, S>(areal: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            areal: areal
                .into_iter()
                .map(Into::into)
                .map(|name: String| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Policy where every layer is clipped.
    pub fn clip_all() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn kind(&self, layer: &str) -> LayerKind {
        if self.areal.contains(layer) {
            LayerKind::Areal
        } else {
            LayerKind::Clip
        }
    }

    /// Areal layer names in sorted order.
    pub fn areal_layers(&self) -> impl Iterator<Item = &str> {
        self.areal.iter().map(String::as_str)
    }
}

impl Default for LayerPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_AREAL_LAYERS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = LayerPolicy::default();
        assert_eq!(policy.kind("LNDARE"), LayerKind::Areal);
        assert_eq!(policy.kind("M_COVR"), LayerKind::Areal);
        assert_eq!(policy.kind("DEPCNT"), LayerKind::Clip);
        assert_eq!(policy.kind("SOUNDG"), LayerKind::Clip);
        assert_eq!(policy.areal_layers().count(), DEFAULT_AREAL_LAYERS.len());
    }

    #[test]
    fn test_custom_policy_trims_names() {
        let policy = LayerPolicy::new([" RESARE ", "", "LNDARE"]);
        assert_eq!(policy.kind("RESARE"), LayerKind::Areal);
        assert_eq!(policy.areal_layers().collect::<Vec<_>>(), vec!["LNDARE", "RESARE"]);
    }

    #[test]
    fn test_clip_all() {
        assert_eq!(LayerPolicy::clip_all().kind("LNDARE"), LayerKind::Clip);
    }
}
