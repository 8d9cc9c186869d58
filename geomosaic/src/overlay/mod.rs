//! Route overlay rendering.
//!
//! Projects geographic points onto a mosaic through its [`AffineMapping`]
//! and draws a connected polyline plus filled circular markers with
//! tiny-skia.
//!
//! All sizes in [`OverlayStyle`] are raw raster pixels, independent of zoom.
//!
//! [`AffineMapping`]: crate::projection::AffineMapping

mod canvas;
mod style;

pub use canvas::OverlayCanvas;
pub use style::{
    MarkerPlacement, OverlayStyle, DEFAULT_COLOR, DEFAULT_MARKER_RADIUS, DEFAULT_STROKE_WIDTH,
};

use image::RgbaImage;
use thiserror::Error;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};
use tracing::debug;

use crate::coord::GeoPoint;
use crate::projection::AffineMapping;

/// Errors that can occur while drawing an overlay.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OverlayError {
    /// A drawing surface of this size cannot be created.
    #[error("Cannot create a {width}×{height} drawing surface")]
    Canvas { width: u32, height: u32 },
}

/// Draws `points` as a polyline with markers onto `image`.
///
/// Points are connected in input order with no reordering, simplification
/// or clipping; points outside the raster simply draw off-canvas. Fewer
/// than two points draw no line, but markers are still placed.
pub fn render_overlay(
    image: &mut RgbaImage,
    mapping: &AffineMapping,
    points: &[GeoPoint],
    style: &OverlayStyle,
) -> Result<(), OverlayError> {
    let projected: Vec<(f32, f32)> = points
        .iter()
        .map(|p| {
            let (x, y) = mapping.project(p);
            (x as f32, y as f32)
        })
        .collect();

    let mut canvas = OverlayCanvas::acquire(image)?;
    let pixmap = canvas.pixmap_mut();

    let mut paint = Paint::default();
    let [r, g, b, a] = style.color;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    if let Some(path) = polyline(&projected) {
        let stroke = Stroke {
            width: style.stroke_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let markers = style.markers.indices(projected.len());
    for &index in &markers {
        let (x, y) = projected[index];
        if let Some(circle) = PathBuilder::from_circle(x, y, style.marker_radius) {
            pixmap.fill_path(
                &circle,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    debug!(
        points = points.len(),
        markers = markers.len(),
        "Rendered overlay"
    );

    Ok(())
}

fn polyline(points: &[(f32, f32)]) -> Option<tiny_skia::Path> {
    let ((x0, y0), rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(*x0, *y0);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.finish()
}
