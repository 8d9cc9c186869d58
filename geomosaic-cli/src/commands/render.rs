//! Render command - download a mosaic and draw a route on it.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use geomosaic::config::ConfigFile;
use geomosaic::coord::BoundingBox;
use geomosaic::mosaic::MosaicBuilder;
use geomosaic::points::load_points;
use geomosaic::provider::{ReqwestClient, TileFetcher, TileServerFetcher};

use super::common::{resolve_overlay_style, OverlayOverrides};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the render command.
pub struct RenderArgs {
    pub points: PathBuf,
    pub output: PathBuf,
    pub bbox: Option<BoundingBox>,
    pub zoom: Option<u8>,
    pub concurrency: Option<usize>,
    pub timeout: Option<u64>,
    pub overlay: OverlayOverrides,
    pub no_overlay: bool,
}

/// Run the render command.
pub fn run(global: &GlobalOptions, args: RenderArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("render");
    let config = runner.config();

    let timeout = args
        .timeout
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.tiles.timeout_duration());
    let http_client = ReqwestClient::with_config(timeout, &config.tiles.user_agent)?;
    let fetcher = TileServerFetcher::with_server(http_client, config.tiles.server());

    render(config, &args, &fetcher)
}

/// Loads the route, builds the mosaic from `fetcher`, draws the route and
/// writes the PNG.
pub fn render<F>(config: &ConfigFile, args: &RenderArgs, fetcher: &F) -> Result<(), CliError>
where
    F: TileFetcher + ?Sized,
{
    let points = load_points(&args.points)?;
    let bbox = match args.bbox {
        Some(bbox) => bbox,
        None => BoundingBox::enclosing(&points)?,
    };

    // Resolve settings from CLI and config
    let zoom = args.zoom.unwrap_or(config.tiles.zoom);
    let concurrency = args.concurrency.unwrap_or(config.tiles.concurrency);
    let style = resolve_overlay_style(&args.overlay, config);

    let builder = MosaicBuilder::new(bbox, zoom)
        .with_concurrency(concurrency)
        .with_max_tiles(config.tiles.max_tiles);
    let plan = builder.plan()?;
    let (width, height) = plan.pixel_size();

    println!("geomosaic v{}", geomosaic::VERSION);
    println!("==================");
    println!();
    println!("Route:   {} points", points.len());
    println!("Area:    {}", bbox);
    println!("Zoom:    {}", zoom);
    println!(
        "Tiles:   {} ({}×{} grid)",
        plan.tiles.len(),
        plan.extent.columns(),
        plan.extent.rows()
    );
    println!("Size:    {}×{} px", width, height);
    println!("Source:  {}", fetcher.name());
    println!();

    let progress = ProgressBar::new(plan.tiles.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} tiles ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let bar = progress.clone();
    let builder = builder.with_progress(Box::new(move |completed, _total| {
        bar.set_position(completed as u64);
    }));

    let result = builder.build(fetcher);
    progress.finish_and_clear();
    let mut mosaic = result?;

    if args.no_overlay {
        info!("Skipping route overlay");
    } else {
        mosaic.render_overlay(&points, &style)?;
    }

    mosaic.save_png(&args.output)?;

    println!(
        "Wrote {}×{} mosaic to {}",
        mosaic.width(),
        mosaic.height(),
        args.output.display()
    );

    Ok(())
}
