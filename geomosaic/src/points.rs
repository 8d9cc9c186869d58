//! Route loading.
//!
//! Routes are JSON arrays of `[lng, lat]` pairs, longitude first as in
//! GeoJSON:
//!
//! ```json
//! [[104.3, 51.8], [105.1, 51.85], [107.0, 51.9]]
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::coord::GeoPoint;

/// Errors that can occur while loading a route.
#[derive(Debug, Error)]
pub enum PointsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid route JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Point {index} ({lng}, {lat}) is outside the valid coordinate range")]
    OutOfRange { index: usize, lng: f64, lat: f64 },
}

/// Reads a route from a JSON file.
pub fn load_points(path: &Path) -> Result<Vec<GeoPoint>, PointsError> {
    let content = std::fs::read_to_string(path).map_err(|source| PointsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let points = parse_points(&content)?;
    debug!(path = %path.display(), count = points.len(), "Loaded route");
    Ok(points)
}

/// Parses a route from a JSON string.
///
/// An empty array is a valid, empty route.
pub fn parse_points(json: &str) -> Result<Vec<GeoPoint>, PointsError> {
    let pairs: Vec<[f64; 2]> = serde_json::from_str(json)?;

    pairs
        .into_iter()
        .enumerate()
        .map(|(index, [lng, lat])| {
            let in_range = (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat);
            if in_range {
                Ok(GeoPoint::new(lat, lng))
            } else {
                Err(PointsError::OutOfRange { index, lng, lat })
            }
        })
        .collect()
}
