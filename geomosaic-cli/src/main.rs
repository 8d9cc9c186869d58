//! geomosaic CLI - Command-line interface
//!
//! Renders routes over slippy-map tile mosaics using the geomosaic library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use geomosaic::coord::{BoundingBox, MAX_ZOOM};
use geomosaic::overlay::MarkerPlacement;

use commands::common::{parse_bbox, OverlayOverrides};
use commands::config::ConfigCommands;
use commands::render::RenderArgs;
use error::CliError;
use runner::GlobalOptions;

#[derive(Debug, Parser)]
#[command(name = "geomosaic")]
#[command(version, about = "Render routes over slippy-map tile mosaics", long_about = None)]
struct Cli {
    /// Log debug output from the library
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Use this configuration file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download the mosaic around a route and draw the route on it
    Render {
        /// Route file: JSON array of [lng, lat] pairs
        #[arg(short, long, value_name = "JSON")]
        points: PathBuf,

        /// Output PNG path
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,

        /// Area as west,south,east,north (default: the route's extent)
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,

        /// Zoom level
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=MAX_ZOOM as i64))]
        zoom: Option<u8>,

        /// Number of concurrent tile downloads
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Route line width in pixels
        #[arg(long)]
        stroke_width: Option<f32>,

        /// Marker radius in pixels
        #[arg(long)]
        marker_radius: Option<f32>,

        /// Marker placement: none, endpoints, all, or indices like 0,3,7
        #[arg(long)]
        markers: Option<MarkerPlacement>,

        /// Write the bare mosaic without drawing the route
        #[arg(long)]
        no_overlay: bool,
    },

    /// List the tiles covering an area without downloading anything
    Tiles {
        /// Area as west,south,east,north
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: BoundingBox,

        /// Zoom level
        #[arg(short, long, default_value_t = geomosaic::mosaic::DEFAULT_ZOOM,
              value_parser = clap::value_parser!(u8).range(0..=MAX_ZOOM as i64))]
        zoom: u8,

        /// List individual tiles only when there are at most this many
        #[arg(long, default_value_t = geomosaic::mosaic::DEFAULT_MAX_TILES)]
        limit: u64,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let global = GlobalOptions {
        verbose: cli.verbose,
        log_file: cli.log_file,
        config: cli.config,
    };

    match cli.command {
        Commands::Render {
            points,
            output,
            bbox,
            zoom,
            concurrency,
            timeout,
            stroke_width,
            marker_radius,
            markers,
            no_overlay,
        } => commands::render::run(
            &global,
            RenderArgs {
                points,
                output,
                bbox,
                zoom,
                concurrency,
                timeout,
                overlay: OverlayOverrides {
                    stroke_width,
                    marker_radius,
                    markers,
                },
                no_overlay,
            },
        ),
        Commands::Tiles { bbox, zoom, limit } => commands::tiles::run(bbox, zoom, limit),
        Commands::Config { command } => commands::config::run(&global, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "geomosaic",
            "render",
            "--points",
            "route.json",
            "-o",
            "out.png",
            "--zoom",
            "10",
            "--markers",
            "all",
            "--bbox",
            "-10.5,40,-9,41",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                zoom, markers, bbox, ..
            } => {
                assert_eq!(zoom, Some(10));
                assert_eq!(markers, Some(MarkerPlacement::All));
                assert_eq!(bbox.map(|b| b.west), Some(-10.5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zoom_out_of_range() {
        assert!(Cli::try_parse_from([
            "geomosaic", "tiles", "--bbox", "0,0,1,1", "--zoom", "23"
        ])
        .is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["geomosaic", "tiles", "--bbox", "0,0,1,1", "--verbose"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Tiles { zoom, limit, .. } => {
                assert_eq!(zoom, 8);
                assert_eq!(limit, geomosaic::mosaic::DEFAULT_MAX_TILES);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
