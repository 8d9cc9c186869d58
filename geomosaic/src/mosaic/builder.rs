//! Concurrent tile download and mosaic assembly.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use image::{imageops, Rgba, RgbaImage};
use tracing::{debug, info, warn};

use crate::coord::{BoundingBox, TileCoord};
use crate::projection::compute_mapping;
use crate::provider::{FetchError, TileFetcher, TileRaster};
use crate::tile::{covering_extent, GridExtent};

use super::types::{Mosaic, MosaicError};

/// Default number of concurrent tile downloads.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Default zoom level.
pub const DEFAULT_ZOOM: u8 = 8;

/// Default upper bound on the number of tiles in one mosaic.
pub const DEFAULT_MAX_TILES: u64 = 4096;

/// Progress callback, called with `(completed, total)` after each tile.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// The tiles a request resolves to, before anything is downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlan {
    pub tiles: Vec<TileCoord>,
    pub extent: GridExtent,
}

impl TilePlan {
    /// Mosaic size in pixels as `(width, height)`.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.extent.pixel_size()
    }
}

/// An unbuilt mosaic request.
///
/// Holds everything needed to assemble a [`Mosaic`]; [`build`](Self::build)
/// performs the downloads. The builder can be built any number of times,
/// every build fetching afresh.
///
/// # Example
///
/// ```no_run
/// use geomosaic::coord::BoundingBox;
/// use geomosaic::mosaic::MosaicBuilder;
/// use geomosaic::provider::{ReqwestClient, TileServerFetcher};
///
/// let bbox = BoundingBox::new(104.0, 51.5, 107.5, 52.0).unwrap();
/// let fetcher = TileServerFetcher::new(ReqwestClient::new().unwrap());
/// let mosaic = MosaicBuilder::new(bbox, 8)
///     .with_concurrency(8)
///     .build(&fetcher)
///     .unwrap();
/// assert_eq!(mosaic.width(), 1024);
/// ```
pub struct MosaicBuilder {
    bbox: BoundingBox,
    zoom: u8,
    concurrency: usize,
    max_tiles: u64,
    background: Rgba<u8>,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for MosaicBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MosaicBuilder")
            .field("bbox", &self.bbox)
            .field("zoom", &self.zoom)
            .field("concurrency", &self.concurrency)
            .field("max_tiles", &self.max_tiles)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

impl MosaicBuilder {
    pub fn new(bbox: BoundingBox, zoom: u8) -> Self {
        Self {
            bbox,
            zoom,
            concurrency: DEFAULT_CONCURRENCY,
            max_tiles: DEFAULT_MAX_TILES,
            background: Rgba([0, 0, 0, 255]),
            progress: None,
        }
    }

    /// Sets the number of concurrent downloads (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the maximum number of tiles a build may fetch.
    pub fn with_max_tiles(mut self, max_tiles: u64) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    /// Sets the colour the raster is filled with before tiles are pasted.
    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    /// Registers a callback invoked after each tile is pasted.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Resolves the request into its tile set without fetching anything.
    ///
    /// The tile count is checked against `max_tiles` before the tile list
    /// is allocated.
    pub fn plan(&self) -> Result<TilePlan, MosaicError> {
        let extent = covering_extent(&self.bbox, self.zoom)?;

        let count = extent.tile_count();
        if count > self.max_tiles {
            return Err(MosaicError::TooManyTiles {
                count,
                max: self.max_tiles,
            });
        }

        let tiles = extent.tiles(self.zoom).collect();
        Ok(TilePlan { tiles, extent })
    }

    /// Downloads every tile and assembles the mosaic.
    ///
    /// Tiles are fetched on a pool of `concurrency` worker threads. Workers
    /// hand finished rasters to the calling thread, which owns the output
    /// raster and pastes each tile at its grid offset as it arrives, so
    /// completion order has no effect on the result.
    ///
    /// The first failed fetch aborts the build: fetches that have not
    /// started yet are skipped, running ones are discarded when they finish.
    ///
    /// # Errors
    ///
    /// * [`MosaicError::InvalidRequest`] for an invalid box or zoom, before any fetch
    /// * [`MosaicError::TooManyTiles`] if the box needs more than `max_tiles`
    /// * [`MosaicError::Fetch`] if any tile fails
    pub fn build<F>(&self, fetcher: &F) -> Result<Mosaic, MosaicError>
    where
        F: TileFetcher + ?Sized,
    {
        let plan = self.plan()?;
        let (width, height) = plan.pixel_size();
        let total = plan.tiles.len();
        let started = Instant::now();

        info!(
            bbox = %self.bbox,
            zoom = self.zoom,
            tiles = total,
            width,
            height,
            concurrency = self.concurrency,
            source = fetcher.name(),
            "Building mosaic"
        );

        let mut image = RgbaImage::from_pixel(width, height, self.background);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency.min(total))
            .thread_name(|i| format!("geomosaic-fetch-{}", i))
            .build()
            .map_err(|e| MosaicError::WorkerPool(e.to_string()))?;

        let cancelled = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<Result<TileRaster, FetchError>>();

        let assembled = pool.in_place_scope(|scope| {
            for &tile in &plan.tiles {
                let tx = tx.clone();
                let cancelled = &cancelled;
                scope.spawn(move |_| {
                    if cancelled.load(Ordering::Relaxed) {
                        return;
                    }
                    // The receiver is gone once the build has failed
                    let _ = tx.send(fetcher.fetch(tile));
                });
            }
            drop(tx);

            let mut received = 0;
            while received < total {
                match rx.recv() {
                    Ok(Ok(raster)) => {
                        paste_tile(&mut image, &plan.extent, &raster);
                        received += 1;
                        if let Some(progress) = &self.progress {
                            progress(received, total);
                        }
                    }
                    Ok(Err(e)) => {
                        cancelled.store(true, Ordering::Relaxed);
                        warn!(tile = %e.tile(), error = %e, "Tile fetch failed, aborting mosaic");
                        return Err(MosaicError::Fetch(e));
                    }
                    Err(_) => break,
                }
            }

            if received < total {
                return Err(MosaicError::Incomplete {
                    received,
                    expected: total,
                });
            }
            Ok(())
        });
        assembled?;

        let mapping = compute_mapping(&plan.tiles, width, height).ok_or(MosaicError::Incomplete {
            received: 0,
            expected: total,
        })?;

        info!(
            tiles = total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Mosaic assembled"
        );

        Ok(Mosaic::new(image, plan.tiles, plan.extent, self.zoom, mapping))
    }
}

/// Copies a tile raster into its block of the mosaic.
fn paste_tile(image: &mut RgbaImage, extent: &GridExtent, raster: &TileRaster) {
    let tile = raster.tile();
    let Some((x, y)) = extent.pixel_offset(&tile) else {
        warn!(%tile, "Fetcher returned a tile outside the grid, ignoring");
        return;
    };
    imageops::replace(image, raster.image(), x as i64, y as i64);
    debug!(%tile, x, y, "Pasted tile");
}
