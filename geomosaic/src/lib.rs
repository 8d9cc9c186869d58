//! geomosaic - slippy-map mosaics with route overlays
//!
//! This library downloads the map tiles covering a geographic bounding box,
//! stitches them into a single raster and draws routes onto it using a
//! Web Mercator to pixel mapping derived from the tile grid.
//!
//! ```ignore
//! use geomosaic::coord::BoundingBox;
//! use geomosaic::mosaic::MosaicBuilder;
//! use geomosaic::overlay::OverlayStyle;
//! use geomosaic::provider::{ReqwestClient, TileServerFetcher};
//!
//! let points = geomosaic::points::parse_points("[[104.3, 51.8], [107.0, 51.9]]")?;
//! let bbox = BoundingBox::enclosing(&points)?;
//! let fetcher = TileServerFetcher::new(ReqwestClient::new()?);
//!
//! let mut mosaic = MosaicBuilder::new(bbox, 8).build(&fetcher)?;
//! mosaic.render_overlay(&points, &OverlayStyle::default())?;
//! mosaic.save_png("route.png".as_ref())?;
//! ```

pub mod config;
pub mod coord;
pub mod logging;
pub mod mosaic;
pub mod overlay;
pub mod points;
pub mod projection;
pub mod provider;
pub mod tile;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
