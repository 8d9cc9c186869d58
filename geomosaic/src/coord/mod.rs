//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! slippy-map tile coordinates and spherical Web Mercator meters (EPSG:3857).

mod mercator;
mod types;

pub use mercator::{
    lnglat_to_meters, meters_to_lnglat, tile_xy_bounds, ProjectedBounds, EARTH_RADIUS_M,
};
pub use types::{
    BoundingBox, CoordError, GeoPoint, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // Validate inputs
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    Ok(tile_containing(lat, lon, zoom))
}

/// Tile containing a point already known to be inside the Mercator domain.
///
/// Points on the far east or south edge of the world belong to the last
/// tile rather than to a nonexistent tile `2^zoom`.
pub(crate) fn tile_containing(lat: f64, lon: f64, zoom: u8) -> TileCoord {
    let n = 2.0_f64.powi(zoom as i32);
    let last = (1u32 << zoom) - 1;

    let x_norm = (lon + 180.0) / 360.0;
    let lat_rad = lat * PI / 180.0;
    let y_norm = (1.0 - lat_rad.tan().asinh() / PI) / 2.0;

    let to_index = |norm: f64| -> u32 {
        if norm <= 0.0 {
            0
        } else if norm >= 1.0 {
            last
        } else {
            ((norm * n).floor() as u32).min(last)
        }
    };

    TileCoord {
        x: to_index(x_norm),
        y: to_index(y_norm),
        z: zoom,
    }
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.z as i32);

    // Convert tile X coordinate to longitude
    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Convert tile Y coordinate to latitude using inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}
