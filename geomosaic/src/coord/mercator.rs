//! Spherical Web Mercator (EPSG:3857) projection.

use std::f64::consts::PI;

use super::types::{TileCoord, MAX_LAT, MIN_LAT};

/// WGS84 semi-major axis used by the spherical Web Mercator projection.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Length of the equator in projected meters.
const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * PI * EARTH_RADIUS_M;

/// An axis-aligned rectangle in Web Mercator meters.
///
/// Mercator `y` grows northwards, so `top > bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ProjectedBounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &ProjectedBounds) -> ProjectedBounds {
        ProjectedBounds {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
            bottom: self.bottom.min(other.bottom),
        }
    }

    /// Returns `true` if `(x, y)` lies inside or on the edge of the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.left..=self.right).contains(&x) && (self.bottom..=self.top).contains(&y)
    }
}

/// Projects a longitude/latitude pair to Web Mercator meters.
///
/// Latitudes beyond the Mercator limit are clamped so the result stays finite.
#[inline]
pub fn lnglat_to_meters(lng: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = EARTH_RADIUS_M * lng.to_radians();
    let y = EARTH_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Inverse of [`lnglat_to_meters`], returns `(lng, lat)` in degrees.
#[inline]
pub fn meters_to_lnglat(x: f64, y: f64) -> (f64, f64) {
    let lng = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
    (lng, lat)
}

/// Web Mercator rectangle covered by a tile.
pub fn tile_xy_bounds(tile: &TileCoord) -> ProjectedBounds {
    let tile_size = EARTH_CIRCUMFERENCE_M / 2.0_f64.powi(tile.z as i32);
    let left = tile.x as f64 * tile_size - EARTH_CIRCUMFERENCE_M / 2.0;
    let top = EARTH_CIRCUMFERENCE_M / 2.0 - tile.y as f64 * tile_size;
    ProjectedBounds {
        left,
        right: left + tile_size,
        top,
        bottom: top - tile_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_M: f64 = 1e-6;

    #[test]
    fn test_origin_projects_to_zero() {
        let (x, y) = lnglat_to_meters(0.0, 0.0);
        assert!(x.abs() < TOLERANCE_M);
        assert!(y.abs() < TOLERANCE_M);
    }

    #[test]
    fn test_antimeridian_is_half_circumference() {
        let (x, _) = lnglat_to_meters(180.0, 0.0);
        assert!((x - EARTH_CIRCUMFERENCE_M / 2.0).abs() < TOLERANCE_M);
    }

    #[test]
    fn test_max_lat_is_square_world() {
        let (_, y) = lnglat_to_meters(0.0, MAX_LAT);
        assert!((y - EARTH_CIRCUMFERENCE_M / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_pole_is_clamped() {
        let (_, y) = lnglat_to_meters(0.0, 90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn test_meters_roundtrip() {
        let (x, y) = lnglat_to_meters(104.3, 51.8);
        let (lng, lat) = meters_to_lnglat(x, y);
        assert!((lng - 104.3).abs() < 1e-9);
        assert!((lat - 51.8).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_zero_tile_covers_world() {
        let bounds = tile_xy_bounds(&TileCoord::new(0, 0, 0));
        assert!((bounds.left + EARTH_CIRCUMFERENCE_M / 2.0).abs() < TOLERANCE_M);
        assert!((bounds.right - EARTH_CIRCUMFERENCE_M / 2.0).abs() < TOLERANCE_M);
        assert!((bounds.top - EARTH_CIRCUMFERENCE_M / 2.0).abs() < TOLERANCE_M);
        assert!((bounds.bottom + EARTH_CIRCUMFERENCE_M / 2.0).abs() < TOLERANCE_M);
    }

    #[test]
    fn test_tile_bounds_match_corner_projection() {
        let tile = TileCoord::new(201, 84, 8);
        let bounds = tile_xy_bounds(&tile);
        let (nw_lat, nw_lng) = crate::coord::tile_to_lat_lon(&tile);
        let (x, y) = lnglat_to_meters(nw_lng, nw_lat);
        assert!((bounds.left - x).abs() < 1e-3);
        assert!((bounds.top - y).abs() < 1e-3);
    }

    #[test]
    fn test_neighbouring_tiles_share_edges() {
        let a = tile_xy_bounds(&TileCoord::new(10, 20, 6));
        let b = tile_xy_bounds(&TileCoord::new(11, 21, 6));
        assert!((a.right - b.left).abs() < TOLERANCE_M);
        assert!((a.bottom - b.top).abs() < TOLERANCE_M);
    }

    #[test]
    fn test_union() {
        let a = tile_xy_bounds(&TileCoord::new(10, 20, 6));
        let b = tile_xy_bounds(&TileCoord::new(11, 21, 6));
        let u = a.union(&b);
        assert_eq!(u.left, a.left);
        assert_eq!(u.right, b.right);
        assert_eq!(u.top, a.top);
        assert_eq!(u.bottom, b.bottom);
        assert!((u.width() - 2.0 * a.width()).abs() < TOLERANCE_M);
    }
}
