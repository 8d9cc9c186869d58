//! Overlay appearance.

use std::fmt;
use std::str::FromStr;

/// Default line width in pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 15.0;

/// Default marker radius in pixels.
pub const DEFAULT_MARKER_RADIUS: f32 = 20.0;

/// Default colour: half-transparent red.
pub const DEFAULT_COLOR: [u8; 4] = [255, 0, 0, 128];

/// Which points receive a circular marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarkerPlacement {
    None,
    /// First and last point.
    #[default]
    Endpoints,
    All,
    /// Explicit point indices; indices past the end are ignored.
    Indices(Vec<usize>),
}

impl MarkerPlacement {
    /// Resolves the placement against a route of `len` points.
    ///
    /// The result is sorted and free of duplicates.
    pub fn indices(&self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            MarkerPlacement::None => Vec::new(),
            MarkerPlacement::Endpoints if len == 0 => Vec::new(),
            MarkerPlacement::Endpoints => vec![0, len - 1],
            MarkerPlacement::All => (0..len).collect(),
            MarkerPlacement::Indices(wanted) => {
                wanted.iter().copied().filter(|&i| i < len).collect()
            }
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

impl fmt::Display for MarkerPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerPlacement::None => write!(f, "none"),
            MarkerPlacement::Endpoints => write!(f, "endpoints"),
            MarkerPlacement::All => write!(f, "all"),
            // An empty list places no markers, and "" would not parse back
            MarkerPlacement::Indices(indices) if indices.is_empty() => write!(f, "none"),
            MarkerPlacement::Indices(indices) => {
                let parts: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

impl FromStr for MarkerPlacement {
    type Err = String;

    /// Parses `none`, `endpoints`, `all` or a comma-separated index list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(MarkerPlacement::None),
            "endpoints" => Ok(MarkerPlacement::Endpoints),
            "all" => Ok(MarkerPlacement::All),
            other => other
                .split(',')
                .map(|part| part.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map(MarkerPlacement::Indices)
                .map_err(|_| {
                    format!(
                        "invalid marker placement '{}': expected none, endpoints, all or indices like 0,3,7",
                        s
                    )
                }),
        }
    }
}

/// Line and marker appearance. Sizes are in raster pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub stroke_width: f32,
    pub marker_radius: f32,
    /// RGBA, straight alpha.
    pub color: [u8; 4],
    pub markers: MarkerPlacement,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            marker_radius: DEFAULT_MARKER_RADIUS,
            color: DEFAULT_COLOR,
            markers: MarkerPlacement::default(),
        }
    }
}
