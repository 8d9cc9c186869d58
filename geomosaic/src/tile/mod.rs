//! Tile index for slippy-map grids.
//!
//! Determines which tiles cover a bounding box at a zoom level and the
//! rectangular grid extent those tiles span.

mod grid;
mod index;

pub use grid::GridExtent;
pub use index::{covering_extent, tiles_covering};

/// Side length of a slippy-map tile raster in pixels.
pub const TILE_SIZE: u32 = 256;
