//! A mosaic request that is assembled on demand.

use image::RgbaImage;

use crate::coord::ProjectedBounds;
use crate::projection::AffineMapping;
use crate::provider::TileFetcher;

use super::builder::MosaicBuilder;
use super::types::{Mosaic, MosaicError};

/// Pairs a [`MosaicBuilder`] with the mosaic it last produced.
///
/// Every accessor fails with [`MosaicError::NotBuilt`] until
/// [`update`](Self::update) has succeeded once. Code that holds a
/// [`Mosaic`] directly never needs these checks.
#[derive(Debug)]
pub struct LazyMosaic {
    builder: MosaicBuilder,
    mosaic: Option<Mosaic>,
}

impl LazyMosaic {
    pub fn new(builder: MosaicBuilder) -> Self {
        Self {
            builder,
            mosaic: None,
        }
    }

    pub fn builder(&self) -> &MosaicBuilder {
        &self.builder
    }

    pub fn is_built(&self) -> bool {
        self.mosaic.is_some()
    }

    /// Downloads the tiles and replaces any previously built mosaic.
    ///
    /// On failure the previous mosaic, if any, is kept.
    pub fn update<F>(&mut self, fetcher: &F) -> Result<&Mosaic, MosaicError>
    where
        F: TileFetcher + ?Sized,
    {
        let mosaic = self.builder.build(fetcher)?;
        Ok(self.mosaic.insert(mosaic))
    }

    pub fn mosaic(&self) -> Result<&Mosaic, MosaicError> {
        self.mosaic.as_ref().ok_or(MosaicError::NotBuilt)
    }

    pub fn mosaic_mut(&mut self) -> Result<&mut Mosaic, MosaicError> {
        self.mosaic.as_mut().ok_or(MosaicError::NotBuilt)
    }

    pub fn into_mosaic(self) -> Result<Mosaic, MosaicError> {
        self.mosaic.ok_or(MosaicError::NotBuilt)
    }

    pub fn image(&self) -> Result<&RgbaImage, MosaicError> {
        self.mosaic().map(Mosaic::image)
    }

    pub fn bounds(&self) -> Result<ProjectedBounds, MosaicError> {
        self.mosaic().map(Mosaic::bounds)
    }

    pub fn mapping(&self) -> Result<&AffineMapping, MosaicError> {
        self.mosaic().map(Mosaic::mapping)
    }

    /// Pixels per meter as `(kx, ky)`.
    pub fn scale(&self) -> Result<(f64, f64), MosaicError> {
        self.mapping().map(|m| (m.kx, m.ky))
    }
}
