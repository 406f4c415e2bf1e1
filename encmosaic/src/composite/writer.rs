//! JSON dump of a composite.

use std::io;
use std::path::Path;

use super::compositor::Composite;
use crate::chart::{CellDocument, CellFeature};

/// Convert a composite into a cell document, one layer per requested name.
///
/// Each feature records the chart that contributed it.
pub fn to_document(composite: &Composite) -> CellDocument {
    let mut document = CellDocument::new();
    for (name, layer) in composite.layers.iter() {
        document.ensure_layer(name);
        for output in layer.features() {
            let mut feature = CellFeature::from_feature(&output.feature);
            feature.chart = Some(output.chart.to_string());
            document.push(name, feature);
        }
    }
    document
}

/// Write a composite to `path` in the JSON cell format.
pub fn write_json(composite: &Composite, path: &Path) -> io::Result<()> {
    to_document(composite).write_to(path)
}
