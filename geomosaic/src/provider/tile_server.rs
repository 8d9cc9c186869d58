//! Slippy-map tile server fetcher.
//!
//! Downloads tiles from any server following the `{z}/{x}/{y}` URL scheme,
//! OpenStreetMap's standard tile layer being the default.
//!
//! # URL Template
//!
//! The template may contain the placeholders `{s}` (mirror subdomain), `{z}`,
//! `{x}` and `{y}`:
//!
//! `http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`
//!
//! # Coordinate System
//!
//! Standard Web Mercator XYZ tile coordinates:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level

use tracing::debug;

use crate::coord::TileCoord;

use super::http::HttpClient;
use super::mirror::{MirrorSelector, RandomMirror};
use super::types::{FetchError, TileFetcher, TileRaster};

/// Default tile URL template (OpenStreetMap standard layer).
pub const DEFAULT_URL_TEMPLATE: &str = "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Default mirror subdomains for [`DEFAULT_URL_TEMPLATE`].
pub const DEFAULT_MIRRORS: &[&str] = &["a", "b", "c"];

/// Where tiles are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileServerConfig {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    /// Interchangeable values substituted for `{s}`.
    pub mirrors: Vec<String>,
}

impl Default for TileServerConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            mirrors: DEFAULT_MIRRORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TileServerConfig {
    pub fn new(url_template: impl Into<String>, mirrors: Vec<String>) -> Self {
        Self {
            url_template: url_template.into(),
            mirrors,
        }
    }

    fn uses_mirror(&self) -> bool {
        self.url_template.contains("{s}")
    }
}

/// Fetches tiles from a slippy-map tile server.
///
/// # Example
///
/// ```no_run
/// use geomosaic::coord::TileCoord;
/// use geomosaic::provider::{ReqwestClient, TileFetcher, TileServerFetcher};
///
/// let client = ReqwestClient::new().unwrap();
/// let fetcher = TileServerFetcher::new(client);
/// let raster = fetcher.fetch(TileCoord::new(201, 84, 8)).unwrap();
/// assert_eq!(raster.image().width(), 256);
/// ```
pub struct TileServerFetcher<C: HttpClient, M: MirrorSelector = RandomMirror> {
    http_client: C,
    server: TileServerConfig,
    selector: M,
}

impl<C: HttpClient> TileServerFetcher<C, RandomMirror> {
    /// Creates a fetcher for the default server with random mirror selection.
    pub fn new(http_client: C) -> Self {
        Self::with_server(http_client, TileServerConfig::default())
    }

    /// Creates a fetcher for a custom server with random mirror selection.
    pub fn with_server(http_client: C, server: TileServerConfig) -> Self {
        Self {
            http_client,
            server,
            selector: RandomMirror,
        }
    }
}

impl<C: HttpClient, M: MirrorSelector> TileServerFetcher<C, M> {
    /// Replaces the mirror selection strategy.
    pub fn with_selector<N: MirrorSelector>(self, selector: N) -> TileServerFetcher<C, N> {
        TileServerFetcher {
            http_client: self.http_client,
            server: self.server,
            selector,
        }
    }

    pub fn server(&self) -> &TileServerConfig {
        &self.server
    }

    /// Builds the tile URL for the given coordinates.
    pub(crate) fn build_url(&self, tile: &TileCoord) -> Result<String, FetchError> {
        let mut url = self
            .server
            .url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string());

        if self.server.uses_mirror() {
            if self.server.mirrors.is_empty() {
                return Err(FetchError::NoMirrors { tile: *tile });
            }
            let index = self.selector.select(tile, self.server.mirrors.len());
            url = url.replace("{s}", &self.server.mirrors[index]);
        }

        Ok(url)
    }
}

impl<C: HttpClient, M: MirrorSelector> TileFetcher for TileServerFetcher<C, M> {
    fn fetch(&self, tile: TileCoord) -> Result<TileRaster, FetchError> {
        let url = self.build_url(&tile)?;
        debug!(%tile, url = %url, "Fetching tile");

        let bytes = self
            .http_client
            .get(&url)
            .map_err(|source| FetchError::Http { tile, source })?;

        TileRaster::decode(tile, &bytes)
    }

    fn name(&self) -> &str {
        &self.server.url_template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mirror::{CoordinateMirror, FixedMirror};
    use crate::provider::{HttpError, MockHttpClient};
    use crate::tile::TILE_SIZE;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_tile() -> Vec<u8> {
        let image = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_default_url_construction() {
        let fetcher =
            TileServerFetcher::new(MockHttpClient::new(Ok(vec![]))).with_selector(FixedMirror(1));

        let url = fetcher.build_url(&TileCoord::new(201, 84, 8)).unwrap();
        assert_eq!(url, "http://b.tile.openstreetmap.org/8/201/84.png");
    }

    #[test]
    fn test_url_mirror_distribution() {
        let fetcher = TileServerFetcher::new(MockHttpClient::new(Ok(vec![])))
            .with_selector(CoordinateMirror);

        let urls: Vec<String> = (0..3)
            .map(|x| fetcher.build_url(&TileCoord::new(x, 0, 2)).unwrap())
            .collect();
        assert!(urls[0].starts_with("http://a."));
        assert!(urls[1].starts_with("http://b."));
        assert!(urls[2].starts_with("http://c."));
    }

    #[test]
    fn test_template_without_mirror() {
        let server = TileServerConfig::new("https://tiles.example.com/{z}/{y}/{x}.png", vec![]);
        let fetcher = TileServerFetcher::with_server(MockHttpClient::new(Ok(vec![])), server);

        let url = fetcher.build_url(&TileCoord::new(3, 5, 4)).unwrap();
        assert_eq!(url, "https://tiles.example.com/4/5/3.png");
    }

    #[test]
    fn test_mirror_template_without_mirrors() {
        let server = TileServerConfig::new(DEFAULT_URL_TEMPLATE, vec![]);
        let fetcher = TileServerFetcher::with_server(MockHttpClient::new(Ok(vec![])), server);

        let result = fetcher.build_url(&TileCoord::new(3, 5, 4));
        assert!(matches!(result, Err(FetchError::NoMirrors { .. })));
    }

    #[test]
    fn test_fetch_decodes_tile() {
        let fetcher = TileServerFetcher::new(MockHttpClient::new(Ok(png_tile())));

        let raster = fetcher.fetch(TileCoord::new(201, 84, 8)).unwrap();
        assert_eq!(raster.image().dimensions(), (TILE_SIZE, TILE_SIZE));
        assert_eq!(raster.image().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_fetch_requests_expected_url() {
        let fetcher = TileServerFetcher::new(MockHttpClient::new(Ok(png_tile())))
            .with_selector(FixedMirror(2));

        fetcher.fetch(TileCoord::new(7, 9, 5)).unwrap();
        assert_eq!(
            fetcher.http_client.requested_urls(),
            vec!["http://c.tile.openstreetmap.org/5/7/9.png"]
        );
    }

    #[test]
    fn test_fetch_http_error() {
        let fetcher = TileServerFetcher::new(MockHttpClient::new(Err(HttpError::Status {
            status: 503,
            url: "x".to_string(),
        })));

        let err = fetcher.fetch(TileCoord::new(1, 1, 1)).unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
        assert_eq!(err.tile(), TileCoord::new(1, 1, 1));
    }

    #[test]
    fn test_fetch_non_image_payload() {
        let fetcher = TileServerFetcher::new(MockHttpClient::new(Ok(b"not an image".to_vec())));

        let err = fetcher.fetch(TileCoord::new(1, 1, 1)).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
