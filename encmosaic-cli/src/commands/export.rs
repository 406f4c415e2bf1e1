//! Chart export command.
//!
//! Loads the catalog, composites the charts covering a bounding box and
//! prints a per-layer summary. With `--output` the composite is also written
//! as a JSON cell document.

use std::path::PathBuf;

use clap::Args;
use encmosaic::composite::{write_json, Composite, ExportRequest};
use encmosaic::geometry::BoundingBox;
use tracing::info;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for `encmosaic export`.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Query box as MINX,MAXX,MINY,MAXY in chart coordinates
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: BoundingBox,

    /// Minimum compilation scale denominator of charts to use
    #[arg(long, conflicts_with = "zoom", required_unless_present = "zoom")]
    pub scale: Option<u32>,

    /// Derive the minimum scale from a map zoom level
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Layer codes to export, comma separated (defaults to [layers] default)
    #[arg(long, value_delimiter = ',')]
    pub layers: Vec<String>,

    /// Chart source tree (defaults to [charts] root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Write the composite as JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Run the export command.
pub fn run(options: &GlobalOptions, args: ExportArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("export");

    let layers = if args.layers.is_empty() {
        runner.config().layers.default.clone()
    } else {
        args.layers
    };
    let request = match args.zoom {
        Some(zoom) => {
            ExportRequest::for_zoom(args.bbox, zoom, runner.config().export.scale_base, layers)
        }
        None => ExportRequest::new(args.bbox, args.scale.unwrap_or(0), layers),
    }
    .map_err(CliError::Request)?;

    let root = runner.chart_root(args.root)?;
    let service = runner.create_service()?;
    runner.load_catalog(&service, &root)?;

    println!(
        "Exporting {} (scale >= 1:{})",
        request.bbox(),
        request.scale_min()
    );
    let Some(composite) = service.export(&request).map_err(CliError::Export)? else {
        println!("No chart data available");
        return Ok(());
    };

    print_summary(&composite);

    if let Some(path) = args.output {
        write_json(&composite, &path).map_err(|error| CliError::FileWrite {
            path: path.clone(),
            error,
        })?;
        info!(path = %path.display(), "Composite written");
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_summary(composite: &Composite) {
    println!(
        "Charts: {} selected, {} opened",
        composite.selected.len(),
        composite.opened.len()
    );
    for id in &composite.opened {
        println!("  {}", id);
    }
    if !composite.complete {
        println!("Warning: selected charts do not cover the whole query box");
    }
    println!("Layers:");
    for (name, layer) in composite.layers.iter() {
        println!("  {:<8} {} features", name, layer.len());
    }
}

/// Parse `MINX,MAXX,MINY,MAXY`.
fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    match values.as_slice() {
        &[min_x, max_x, min_y, max_y] => Ok(BoundingBox::new(min_x, max_x, min_y, max_y)),
        _ => Err(format!(
            "expected MINX,MAXX,MINY,MAXY, got {} values",
            values.len()
        )),
    }
}
