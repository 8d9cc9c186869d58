//! Fetcher trait, tile raster and fetch errors.

use image::RgbaImage;
use thiserror::Error;

use crate::coord::TileCoord;
use crate::tile::TILE_SIZE;

use super::http::HttpError;

/// Errors that can occur while fetching a single tile.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status.
    #[error("Failed to download tile {tile}: {source}")]
    Http {
        tile: TileCoord,
        #[source]
        source: HttpError,
    },

    /// Response body is not a decodable image.
    #[error("Tile {tile} is not a decodable image: {message}")]
    Decode { tile: TileCoord, message: String },

    /// Decoded image is not a standard square tile.
    #[error("Tile {tile} is {width}×{height}, expected {expected}×{expected}")]
    UnexpectedSize {
        tile: TileCoord,
        width: u32,
        height: u32,
        expected: u32,
    },

    /// The URL template names a mirror but no mirrors are configured.
    #[error("No tile server mirrors configured for tile {tile}")]
    NoMirrors { tile: TileCoord },
}

impl FetchError {
    /// The tile whose fetch failed.
    pub fn tile(&self) -> TileCoord {
        match self {
            FetchError::Http { tile, .. }
            | FetchError::Decode { tile, .. }
            | FetchError::UnexpectedSize { tile, .. }
            | FetchError::NoMirrors { tile } => *tile,
        }
    }
}

/// A decoded `TILE_SIZE`×`TILE_SIZE` tile image.
#[derive(Debug, Clone)]
pub struct TileRaster {
    tile: TileCoord,
    image: RgbaImage,
}

impl TileRaster {
    /// Wraps an already decoded image, checking its dimensions.
    pub fn new(tile: TileCoord, image: RgbaImage) -> Result<Self, FetchError> {
        if image.width() != TILE_SIZE || image.height() != TILE_SIZE {
            return Err(FetchError::UnexpectedSize {
                tile,
                width: image.width(),
                height: image.height(),
                expected: TILE_SIZE,
            });
        }
        Ok(Self { tile, image })
    }

    /// Decodes an encoded image (PNG, JPEG) returned by a tile server.
    pub fn decode(tile: TileCoord, bytes: &[u8]) -> Result<Self, FetchError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| FetchError::Decode {
                tile,
                message: e.to_string(),
            })?
            .to_rgba8();
        Self::new(tile, image)
    }

    pub fn tile(&self) -> TileCoord {
        self.tile
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Retrieves the raster for one tile.
///
/// Implementations are stateless with respect to tiles and must be safe to
/// call from many worker threads at once. Every call fetches afresh; there
/// is no caching and no retry.
pub trait TileFetcher: Send + Sync {
    /// Fetches and decodes the raster for `tile`.
    fn fetch(&self, tile: TileCoord) -> Result<TileRaster, FetchError>;

    /// Human-readable name of the tile source, used in logs.
    fn name(&self) -> &str {
        "tile fetcher"
    }
}

impl<F: TileFetcher + ?Sized> TileFetcher for std::sync::Arc<F> {
    fn fetch(&self, tile: TileCoord) -> Result<TileRaster, FetchError> {
        (**self).fetch(tile)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_tile() {
        let image = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba([10, 20, 30, 255]));
        let raster = TileRaster::decode(TileCoord::new(1, 2, 3), &encode_png(&image)).unwrap();
        assert_eq!(raster.tile(), TileCoord::new(1, 2, 3));
        assert_eq!(raster.image().get_pixel(100, 100), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_rejects_html() {
        let result = TileRaster::decode(TileCoord::new(0, 0, 0), b"<html>Too many requests</html>");
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        let image = RgbaImage::new(512, 512);
        let result = TileRaster::decode(TileCoord::new(0, 0, 1), &encode_png(&image));
        assert!(matches!(
            result,
            Err(FetchError::UnexpectedSize {
                width: 512,
                height: 512,
                ..
            })
        ));
    }

    #[test]
    fn test_error_reports_tile() {
        let err = FetchError::Decode {
            tile: TileCoord::new(201, 84, 8),
            message: "bad".to_string(),
        };
        assert_eq!(err.tile(), TileCoord::new(201, 84, 8));
        assert!(err.to_string().contains("8/201/84"));
    }
}
