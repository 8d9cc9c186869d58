//! Mosaic assembly
//!
//! Downloads every tile covering a bounding box concurrently and pastes them
//! into a single raster sized to the tile grid.
//!
//! A request goes through two types: [`MosaicBuilder`] describes what to
//! fetch, [`Mosaic`] is the assembled result with its projection mapping.
//! [`LazyMosaic`] holds a builder and the mosaic it produces once
//! [`LazyMosaic::update`] has run.

mod builder;
mod lazy;
mod types;

pub use builder::{
    MosaicBuilder, ProgressCallback, TilePlan, DEFAULT_CONCURRENCY, DEFAULT_MAX_TILES,
    DEFAULT_ZOOM,
};
pub use lazy::LazyMosaic;
pub use types::{Mosaic, MosaicError};
