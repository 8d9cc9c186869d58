//! Rectangular tile grid extents.

use crate::coord::TileCoord;

use super::TILE_SIZE;

/// Inclusive range of tile indices spanned by a tile set.
///
/// The mosaic raster is sized from the extent, and each tile's pixel offset
/// inside it is measured from `(min_x, min_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridExtent {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl GridExtent {
    /// Computes the extent of a tile set, or `None` if the set is empty.
    pub fn from_tiles(tiles: &[TileCoord]) -> Option<Self> {
        let first = tiles.first()?;
        let init = GridExtent {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(tiles.iter().fold(init, |acc, t| GridExtent {
            min_x: acc.min_x.min(t.x),
            min_y: acc.min_y.min(t.y),
            max_x: acc.max_x.max(t.x),
            max_y: acc.max_y.max(t.y),
        }))
    }

    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Number of tiles in the full rectangle.
    pub fn tile_count(&self) -> u64 {
        self.columns() as u64 * self.rows() as u64
    }

    /// Mosaic size in pixels as `(width, height)`.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.columns() * TILE_SIZE, self.rows() * TILE_SIZE)
    }

    /// Pixel offset of a tile's top-left corner inside the mosaic.
    ///
    /// Returns `None` for tiles outside the extent.
    pub fn pixel_offset(&self, tile: &TileCoord) -> Option<(u32, u32)> {
        if !self.contains(tile) {
            return None;
        }
        Some((
            (tile.x - self.min_x) * TILE_SIZE,
            (tile.y - self.min_y) * TILE_SIZE,
        ))
    }

    /// Returns `true` if the tile lies inside the extent.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        (self.min_x..=self.max_x).contains(&tile.x) && (self.min_y..=self.max_y).contains(&tile.y)
    }

    /// Iterates the tiles of the extent at `zoom` in row-major order.
    pub fn tiles(&self, zoom: u8) -> impl Iterator<Item = TileCoord> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y)
            .flat_map(move |y| (min_x..=max_x).map(move |x| TileCoord { x, y, z: zoom }))
    }
}
