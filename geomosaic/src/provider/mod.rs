//! Tile fetching
//!
//! This module provides the [`TileFetcher`] abstraction used by the mosaic
//! assembler and its HTTP implementation for slippy-map tile servers.
//!
//! ```ignore
//! use geomosaic::provider::{CoordinateMirror, ReqwestClient, TileServerFetcher};
//!
//! let http_client = ReqwestClient::new()?;
//! let fetcher = TileServerFetcher::new(http_client).with_selector(CoordinateMirror);
//! ```

mod http;
mod mirror;
mod tile_server;
mod types;

pub use http::{
    HttpClient, HttpError, ReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use mirror::{CoordinateMirror, FixedMirror, MirrorSelector, RandomMirror};
pub use tile_server::{
    TileServerConfig, TileServerFetcher, DEFAULT_MIRRORS, DEFAULT_URL_TEMPLATE,
};
pub use types::{FetchError, TileFetcher, TileRaster};

#[cfg(test)]
pub use http::tests::MockHttpClient;
