//! Bounding box to tile set conversion.

use tracing::trace;

use crate::coord::{tile_containing, BoundingBox, CoordError, TileCoord, MAX_ZOOM};

use super::GridExtent;

/// Nudge applied to the east and south edges so a box ending exactly on a
/// tile boundary does not pull in the neighbouring tile.
const LL_EPSILON: f64 = 1e-11;

/// Returns the grid extent of the tiles at `zoom` that intersect `bbox`.
///
/// Only the two corner tiles are computed, so this is cheap for any box and
/// zoom. Use it to size a request before materializing its tiles.
///
/// # Errors
///
/// * [`CoordError::InvalidBoundingBox`] if the box is inverted or not finite
/// * [`CoordError::InvalidZoom`] if `zoom` exceeds [`MAX_ZOOM`]
pub fn covering_extent(bbox: &BoundingBox, zoom: u8) -> Result<GridExtent, CoordError> {
    let bbox = bbox.validated()?;
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let clamped = bbox.clamped();
    let upper_left = tile_containing(clamped.north, clamped.west, zoom);
    let lower_right = tile_containing(
        clamped.south + LL_EPSILON,
        clamped.east - LL_EPSILON,
        zoom,
    );

    // The epsilon nudge can cross back over a boundary for degenerate boxes.
    Ok(GridExtent {
        min_x: upper_left.x,
        min_y: upper_left.y,
        max_x: lower_right.x.max(upper_left.x),
        max_y: lower_right.y.max(upper_left.y),
    })
}

/// Returns every tile at `zoom` whose footprint intersects `bbox`.
///
/// Boundary tiles are included even when the box only grazes them, so the
/// union of the returned tiles over-covers the request. Tiles are returned
/// in row-major order (north to south, west to east) and the result is
/// fully determined by the inputs. A zero-area box yields exactly one tile.
///
/// Boxes crossing the antimeridian are not supported; latitudes beyond the
/// Web Mercator limit are clamped. The whole set is allocated, so check
/// [`covering_extent`] first for boxes of unknown size.
///
/// # Errors
///
/// * [`CoordError::InvalidBoundingBox`] if the box is inverted or not finite
/// * [`CoordError::InvalidZoom`] if `zoom` exceeds [`MAX_ZOOM`]
pub fn tiles_covering(bbox: &BoundingBox, zoom: u8) -> Result<Vec<TileCoord>, CoordError> {
    let extent = covering_extent(bbox, zoom)?;
    let tiles: Vec<TileCoord> = extent.tiles(zoom).collect();

    trace!(
        %bbox,
        zoom,
        tiles = tiles.len(),
        "Computed covering tile set"
    );

    Ok(tiles)
}
