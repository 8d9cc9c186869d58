//! Mosaic types and errors

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::coord::{CoordError, GeoPoint, ProjectedBounds, TileCoord};
use crate::overlay::{self, OverlayError, OverlayStyle};
use crate::projection::AffineMapping;
use crate::provider::FetchError;
use crate::tile::GridExtent;

/// Errors that can occur while building or using a mosaic.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The bounding box or zoom level is invalid
    #[error("Invalid mosaic request: {0}")]
    InvalidRequest(#[from] CoordError),

    /// A tile could not be fetched; the whole build fails
    #[error("Tile fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The request covers more tiles than allowed
    #[error("Request covers {count} tiles, more than the limit of {max}")]
    TooManyTiles { count: u64, max: u64 },

    /// Worker pool could not be created
    #[error("Failed to start tile workers: {0}")]
    WorkerPool(String),

    /// Workers stopped before every tile arrived
    #[error("Only {received} of {expected} tiles were assembled")]
    Incomplete { received: usize, expected: usize },

    /// Mosaic data was accessed before a successful build
    #[error("Mosaic has not been built; call update() first")]
    NotBuilt,

    /// Image encoding failed
    #[error("Image encoding failed: {0}")]
    Encode(String),

    /// I/O error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for MosaicError {
    fn from(e: image::ImageError) -> Self {
        MosaicError::Encode(e.to_string())
    }
}

/// A fully assembled tile mosaic.
///
/// Only produced by a successful [`MosaicBuilder::build`], so every
/// accessor is infallible. The raster is exactly the tile grid's pixel size
/// and keeps that size for its whole lifetime.
///
/// [`MosaicBuilder::build`]: super::MosaicBuilder::build
#[derive(Debug, Clone)]
pub struct Mosaic {
    image: RgbaImage,
    tiles: Vec<TileCoord>,
    extent: GridExtent,
    zoom: u8,
    mapping: AffineMapping,
}

impl Mosaic {
    pub(crate) fn new(
        image: RgbaImage,
        tiles: Vec<TileCoord>,
        extent: GridExtent,
        zoom: u8,
        mapping: AffineMapping,
    ) -> Self {
        debug_assert_eq!(image.dimensions(), extent.pixel_size());
        Self {
            image,
            tiles,
            extent,
            zoom,
            mapping,
        }
    }

    /// The assembled raster.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes the mosaic, returning the raster.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The exact tile set the mosaic was assembled from.
    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    pub fn extent(&self) -> GridExtent {
        self.extent
    }

    /// Tile indices of the mosaic's top-left tile.
    pub fn origin_tile(&self) -> (u32, u32) {
        (self.extent.min_x, self.extent.min_y)
    }

    /// Web Mercator bounds of the raster.
    pub fn bounds(&self) -> ProjectedBounds {
        self.mapping.bounds
    }

    /// Mapping from Web Mercator meters to raster pixels.
    pub fn mapping(&self) -> &AffineMapping {
        &self.mapping
    }

    /// Projects a geographic point to raster pixel coordinates.
    pub fn project(&self, point: &GeoPoint) -> (f64, f64) {
        self.mapping.project(point)
    }

    /// Draws a route and its markers onto the raster.
    pub fn render_overlay(
        &mut self,
        points: &[GeoPoint],
        style: &OverlayStyle,
    ) -> Result<(), OverlayError> {
        overlay::render_overlay(&mut self.image, &self.mapping, points, style)
    }

    /// Encodes the raster as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, MosaicError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Writes the raster to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), MosaicError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
