//! Common types and utilities shared across CLI commands.

use geomosaic::config::ConfigFile;
use geomosaic::coord::BoundingBox;
use geomosaic::overlay::{MarkerPlacement, OverlayStyle};

/// Parses a `west,south,east,north` bounding box argument.
pub fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("'{}' is not a number list: {}", s, e))?;

    match values.as_slice() {
        [west, south, east, north] => {
            BoundingBox::new(*west, *south, *east, *north).map_err(|e| e.to_string())
        }
        _ => Err(format!(
            "expected 4 values west,south,east,north but got {}",
            values.len()
        )),
    }
}

/// Overlay settings from the command line; unset values come from config.
#[derive(Debug, Clone, Default)]
pub struct OverlayOverrides {
    pub stroke_width: Option<f32>,
    pub marker_radius: Option<f32>,
    pub markers: Option<MarkerPlacement>,
}

/// Resolve overlay style from CLI args and config.
pub fn resolve_overlay_style(overrides: &OverlayOverrides, config: &ConfigFile) -> OverlayStyle {
    // CLI takes precedence, then config
    let mut style = config.overlay.style();
    if let Some(width) = overrides.stroke_width {
        style.stroke_width = width;
    }
    if let Some(radius) = overrides.marker_radius {
        style.marker_radius = radius;
    }
    if let Some(markers) = &overrides.markers {
        style.markers = markers.clone();
    }
    style
}
