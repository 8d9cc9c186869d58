//! Addressable configuration keys.
//!
//! Every setting is reachable as `section.key`, which the command line uses
//! for `config get` and `config set`.

use std::fmt;
use std::str::FromStr;

use crate::coord::MAX_ZOOM;
use crate::overlay::MarkerPlacement;

use super::{ConfigError, ConfigFile};

/// A single configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    TilesUrlTemplate,
    TilesMirrors,
    TilesUserAgent,
    TilesTimeout,
    TilesZoom,
    TilesConcurrency,
    TilesMaxTiles,
    OverlayStrokeWidth,
    OverlayMarkerRadius,
    OverlayColor,
    OverlayMarkers,
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::TilesUrlTemplate,
            ConfigKey::TilesMirrors,
            ConfigKey::TilesUserAgent,
            ConfigKey::TilesTimeout,
            ConfigKey::TilesZoom,
            ConfigKey::TilesConcurrency,
            ConfigKey::TilesMaxTiles,
            ConfigKey::OverlayStrokeWidth,
            ConfigKey::OverlayMarkerRadius,
            ConfigKey::OverlayColor,
            ConfigKey::OverlayMarkers,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::TilesUrlTemplate
            | ConfigKey::TilesMirrors
            | ConfigKey::TilesUserAgent
            | ConfigKey::TilesTimeout
            | ConfigKey::TilesZoom
            | ConfigKey::TilesConcurrency
            | ConfigKey::TilesMaxTiles => "tiles",
            ConfigKey::OverlayStrokeWidth
            | ConfigKey::OverlayMarkerRadius
            | ConfigKey::OverlayColor
            | ConfigKey::OverlayMarkers => "overlay",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::TilesUrlTemplate => "url_template",
            ConfigKey::TilesMirrors => "mirrors",
            ConfigKey::TilesUserAgent => "user_agent",
            ConfigKey::TilesTimeout => "timeout",
            ConfigKey::TilesZoom => "zoom",
            ConfigKey::TilesConcurrency => "concurrency",
            ConfigKey::TilesMaxTiles => "max_tiles",
            ConfigKey::OverlayStrokeWidth => "stroke_width",
            ConfigKey::OverlayMarkerRadius => "marker_radius",
            ConfigKey::OverlayColor => "color",
            ConfigKey::OverlayMarkers => "markers",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value formatted as it appears in the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        let tiles = &config.tiles;
        let overlay = &config.overlay;
        match self {
            ConfigKey::TilesUrlTemplate => tiles.url_template.clone(),
            ConfigKey::TilesMirrors => tiles.mirrors.join(","),
            ConfigKey::TilesUserAgent => tiles.user_agent.clone(),
            ConfigKey::TilesTimeout => tiles.timeout.to_string(),
            ConfigKey::TilesZoom => tiles.zoom.to_string(),
            ConfigKey::TilesConcurrency => tiles.concurrency.to_string(),
            ConfigKey::TilesMaxTiles => tiles.max_tiles.to_string(),
            ConfigKey::OverlayStrokeWidth => overlay.stroke_width.to_string(),
            ConfigKey::OverlayMarkerRadius => overlay.marker_radius.to_string(),
            ConfigKey::OverlayColor => overlay
                .color
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(","),
            ConfigKey::OverlayMarkers => overlay.markers.to_string(),
        }
    }

    /// Parses `value` and stores it in `config`.
    ///
    /// The configuration is left unchanged when the value is invalid.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
        };
        let trimmed = value.trim();

        match self {
            ConfigKey::TilesUrlTemplate => {
                if !["{z}", "{x}", "{y}"].iter().all(|p| trimmed.contains(p)) {
                    return Err(invalid());
                }
                config.tiles.url_template = trimmed.to_string();
            }
            ConfigKey::TilesMirrors => {
                let mirrors: Vec<String> = trimmed
                    .split(',')
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect();
                config.tiles.mirrors = mirrors;
            }
            ConfigKey::TilesUserAgent => {
                if trimmed.is_empty() {
                    return Err(invalid());
                }
                config.tiles.user_agent = trimmed.to_string();
            }
            ConfigKey::TilesTimeout => {
                config.tiles.timeout = parse_positive(trimmed).ok_or_else(invalid)?;
            }
            ConfigKey::TilesZoom => {
                config.tiles.zoom = trimmed
                    .parse::<u8>()
                    .ok()
                    .filter(|z| *z <= MAX_ZOOM)
                    .ok_or_else(invalid)?;
            }
            ConfigKey::TilesConcurrency => {
                config.tiles.concurrency = parse_positive(trimmed).ok_or_else(invalid)?;
            }
            ConfigKey::TilesMaxTiles => {
                config.tiles.max_tiles = parse_positive(trimmed).ok_or_else(invalid)?;
            }
            ConfigKey::OverlayStrokeWidth => {
                config.overlay.stroke_width = parse_size(trimmed).ok_or_else(invalid)?;
            }
            ConfigKey::OverlayMarkerRadius => {
                config.overlay.marker_radius = parse_size(trimmed).ok_or_else(invalid)?;
            }
            ConfigKey::OverlayColor => {
                config.overlay.color = parse_color(trimmed).ok_or_else(invalid)?;
            }
            ConfigKey::OverlayMarkers => {
                config.overlay.markers =
                    trimmed.parse::<MarkerPlacement>().map_err(|_| invalid())?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| format!("unknown configuration key '{}'", s))
    }
}

fn parse_positive<T>(s: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    s.parse::<T>().ok().filter(|v| *v > T::default())
}

fn parse_size(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Parses `r,g,b` or `r,g,b,a`; alpha defaults to opaque.
fn parse_color(s: &str) -> Option<[u8; 4]> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<u8>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some([*r, *g, *b, 255]),
        [r, g, b, a] => Some([*r, *g, *b, *a]),
        _ => None,
    }
}
