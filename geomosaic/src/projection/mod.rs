//! Projection between Web Mercator meters and mosaic pixels.
//!
//! A mosaic covers the union of its tiles' Web Mercator rectangles, which is
//! larger than the requested bounding box because tile boundaries round
//! outwards. The mapping is therefore derived from the tile set itself:
//!
//! ```text
//! px = (mx - left) * kx            kx = width  / (right - left)
//! py = height - (my - bottom) * ky ky = height / (top - bottom)
//! ```
//!
//! Raster `y` grows downwards while Mercator `y` grows northwards, hence the
//! flip.

use tiny_skia::Transform;

use crate::coord::{lnglat_to_meters, meters_to_lnglat, tile_xy_bounds, GeoPoint, ProjectedBounds, TileCoord};

/// Affine transform from Web Mercator meters to mosaic pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMapping {
    /// Pixels per meter along x.
    pub kx: f64,
    /// Pixels per meter along y.
    pub ky: f64,
    /// Projected bounds of the mosaic.
    pub bounds: ProjectedBounds,
    /// Mosaic height in pixels.
    pub height: f64,
}

impl AffineMapping {
    /// Builds the mapping for a raster of `width`×`height` pixels covering
    /// `bounds`.
    pub fn new(bounds: ProjectedBounds, width: u32, height: u32) -> Self {
        Self {
            kx: width as f64 / bounds.width(),
            ky: height as f64 / bounds.height(),
            bounds,
            height: height as f64,
        }
    }

    /// Origin of the mapping in meters (`left`, `bottom`).
    pub fn origin(&self) -> (f64, f64) {
        (self.bounds.left, self.bounds.bottom)
    }

    /// Maps Web Mercator meters to pixel coordinates.
    #[inline]
    pub fn to_pixel(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            (mx - self.bounds.left) * self.kx,
            self.height - (my - self.bounds.bottom) * self.ky,
        )
    }

    /// Maps pixel coordinates back to Web Mercator meters.
    #[inline]
    pub fn to_mercator(&self, px: f64, py: f64) -> (f64, f64) {
        (
            px / self.kx + self.bounds.left,
            (self.height - py) / self.ky + self.bounds.bottom,
        )
    }

    /// Projects a geographic point straight to pixel coordinates.
    #[inline]
    pub fn project(&self, point: &GeoPoint) -> (f64, f64) {
        let (mx, my) = lnglat_to_meters(point.lng, point.lat);
        self.to_pixel(mx, my)
    }

    /// Geographic position of a pixel.
    pub fn unproject(&self, px: f64, py: f64) -> GeoPoint {
        let (mx, my) = self.to_mercator(px, py);
        let (lng, lat) = meters_to_lnglat(mx, my);
        GeoPoint::new(lat, lng)
    }

    /// The mapping as a drawing transform, for rendering geometry given in
    /// Web Mercator meters directly onto the mosaic.
    ///
    /// Sizes drawn through this transform are scaled too; divide pixel sizes
    /// by `kx` to keep them constant.
    pub fn to_transform(&self) -> Transform {
        Transform::from_row(
            self.kx as f32,
            0.0,
            0.0,
            -self.ky as f32,
            (-self.bounds.left * self.kx) as f32,
            (self.height + self.bounds.bottom * self.ky) as f32,
        )
    }
}

/// Union of the Web Mercator rectangles of every tile.
///
/// Returns `None` for an empty tile set.
pub fn projected_bounds(tiles: &[TileCoord]) -> Option<ProjectedBounds> {
    tiles
        .iter()
        .map(tile_xy_bounds)
        .reduce(|acc, b| acc.union(&b))
}

/// Computes the mapping for a mosaic of `width`×`height` pixels assembled
/// from `tiles`.
///
/// The size must be the tile grid's pixel size; the mosaic assembler
/// guarantees this, so a mismatch is a bug in the caller.
///
/// Returns `None` for an empty tile set.
pub fn compute_mapping(tiles: &[TileCoord], width: u32, height: u32) -> Option<AffineMapping> {
    debug_assert_eq!(
        crate::tile::GridExtent::from_tiles(tiles).map(|e| e.pixel_size()),
        Some((width, height)),
        "mosaic size does not match the tile grid"
    );
    let bounds = projected_bounds(tiles)?;
    Some(AffineMapping::new(bounds, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BoundingBox;
    use crate::tile::{tiles_covering, GridExtent};

    const PIXEL_TOLERANCE: f64 = 1e-6;

    fn irkutsk_mapping() -> (Vec<TileCoord>, AffineMapping, u32, u32) {
        let bbox = BoundingBox::new(104.0, 51.5, 107.5, 52.0).unwrap();
        let tiles = tiles_covering(&bbox, 8).unwrap();
        let (width, height) = GridExtent::from_tiles(&tiles).unwrap().pixel_size();
        let mapping = compute_mapping(&tiles, width, height).unwrap();
        (tiles, mapping, width, height)
    }

    #[test]
    fn test_empty_tiles() {
        assert!(projected_bounds(&[]).is_none());
    }

    #[test]
    fn test_bounds_are_union_of_tiles() {
        let (tiles, mapping, _, _) = irkutsk_mapping();
        let nw = tile_xy_bounds(&TileCoord::new(201, 84, 8));
        let se = tile_xy_bounds(&TileCoord::new(204, 85, 8));
        assert_eq!(tiles.len(), 8);
        assert_eq!(mapping.bounds.left, nw.left);
        assert_eq!(mapping.bounds.top, nw.top);
        assert_eq!(mapping.bounds.right, se.right);
        assert_eq!(mapping.bounds.bottom, se.bottom);
    }

    #[test]
    fn test_square_pixels() {
        // Web Mercator tiles are square, so both scales agree
        let (_, mapping, _, _) = irkutsk_mapping();
        assert!((mapping.kx - mapping.ky).abs() / mapping.kx < 1e-9);
    }

    #[test]
    fn test_corners_map_to_raster_corners() {
        let (_, mapping, width, height) = irkutsk_mapping();
        let b = mapping.bounds;

        let (x, y) = mapping.to_pixel(b.left, b.top);
        assert!(x.abs() < PIXEL_TOLERANCE && y.abs() < PIXEL_TOLERANCE);

        let (x, y) = mapping.to_pixel(b.right, b.bottom);
        assert!((x - width as f64).abs() < PIXEL_TOLERANCE);
        assert!((y - height as f64).abs() < PIXEL_TOLERANCE);
    }

    #[test]
    fn test_tile_corners_inside_raster() {
        let (tiles, mapping, width, height) = irkutsk_mapping();
        for tile in &tiles {
            let b = tile_xy_bounds(tile);
            for (mx, my) in [
                (b.left, b.top),
                (b.right, b.top),
                (b.left, b.bottom),
                (b.right, b.bottom),
            ] {
                let (x, y) = mapping.to_pixel(mx, my);
                assert!(x > -PIXEL_TOLERANCE && x < width as f64 + PIXEL_TOLERANCE);
                assert!(y > -PIXEL_TOLERANCE && y < height as f64 + PIXEL_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_tile_corner_lands_on_tile_offset() {
        let (_, mapping, _, _) = irkutsk_mapping();
        let b = tile_xy_bounds(&TileCoord::new(203, 85, 8));
        let (x, y) = mapping.to_pixel(b.left, b.top);
        assert!((x - 512.0).abs() < 1e-6);
        assert!((y - 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_path_points_inside() {
        let (_, mapping, width, height) = irkutsk_mapping();
        for point in [GeoPoint::new(51.8, 104.3), GeoPoint::new(51.9, 107.0)] {
            let (x, y) = mapping.project(&point);
            assert!(x > 0.0 && x < width as f64, "x={} outside", x);
            assert!(y > 0.0 && y < height as f64, "y={} outside", y);
        }
    }

    #[test]
    fn test_pixel_roundtrip() {
        let (_, mapping, _, _) = irkutsk_mapping();
        let point = GeoPoint::new(51.8, 104.3);
        let (x, y) = mapping.project(&point);
        let back = mapping.unproject(x, y);
        assert!((back.lat - point.lat).abs() < 1e-9);
        assert!((back.lng - point.lng).abs() < 1e-9);
    }

    #[test]
    fn test_transform_matches_to_pixel() {
        let (_, mapping, _, _) = irkutsk_mapping();
        let (mx, my) = lnglat_to_meters(105.0, 51.7);
        let (px, py) = mapping.to_pixel(mx, my);

        // f32 cannot hold meter offsets exactly, so check relative to the origin
        let t = mapping.to_transform();
        assert!((t.sx as f64 - mapping.kx).abs() < 1e-9);
        assert!((t.sy as f64 + mapping.ky).abs() < 1e-9);
        let tx = t.tx as f64 + mx * t.sx as f64;
        let ty = t.ty as f64 + my * t.sy as f64;
        assert!((tx - px).abs() < 0.5, "tx={} px={}", tx, px);
        assert!((ty - py).abs() < 0.5, "ty={} py={}", ty, py);
    }
}
