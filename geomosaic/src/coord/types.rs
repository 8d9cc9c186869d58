//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.051_128_779_806_59;
pub const MAX_LAT: f64 = 85.051_128_779_806_59;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels served by standard slippy-map tile servers
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// Tile coordinates in the slippy-map (XYZ) scheme.
///
/// `x` grows eastwards from the antimeridian, `y` grows southwards from the
/// northern Web Mercator limit. Both range over `[0, 2^z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// X coordinate (west-east), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
    /// Zoom level
    pub z: u8,
}

impl TileCoord {
    /// Creates a tile coordinate without range checks.
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Number of tiles along one axis at this tile's zoom level.
    #[inline]
    pub fn tiles_per_axis(&self) -> u32 {
        1u32 << self.z
    }

    /// Returns `true` if `x` and `y` lie inside the grid for `z`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.z <= MAX_ZOOM && self.x < self.tiles_per_axis() && self.y < self.tiles_per_axis()
    }

    /// Geographic footprint of this tile.
    pub fn lnglat_bounds(&self) -> BoundingBox {
        let (north, west) = super::tile_to_lat_lon(self);
        let (south, east) = super::tile_to_lat_lon(&TileCoord::new(self.x + 1, self.y + 1, self.z));
        BoundingBox {
            west,
            south,
            east,
            north,
        }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A geographic bounding box in decimal degrees.
///
/// Constructed through [`BoundingBox::new`] or [`BoundingBox::enclosing`],
/// both of which reject inverted and non-finite boxes. Zero-area boxes
/// (a single point, or a horizontal/vertical line) are valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Creates a validated bounding box from `west, south, east, north`.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, CoordError> {
        Self {
            west,
            south,
            east,
            north,
        }
        .validated()
    }

    /// Smallest box containing every point.
    pub fn enclosing(points: &[GeoPoint]) -> Result<Self, CoordError> {
        let first = points.first().ok_or(CoordError::EmptyPointList)?;
        let mut bbox = Self {
            west: first.lng,
            south: first.lat,
            east: first.lng,
            north: first.lat,
        };
        for p in &points[1..] {
            bbox.west = bbox.west.min(p.lng);
            bbox.east = bbox.east.max(p.lng);
            bbox.south = bbox.south.min(p.lat);
            bbox.north = bbox.north.max(p.lat);
        }
        bbox.validated()
    }

    /// Checks the west/east and south/north ordering.
    pub fn validated(self) -> Result<Self, CoordError> {
        let finite = [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.west > self.east || self.south > self.north {
            return Err(CoordError::InvalidBoundingBox {
                west: self.west,
                south: self.south,
                east: self.east,
                north: self.north,
            });
        }
        Ok(self)
    }

    /// Copy of this box clamped to the Web Mercator domain.
    pub fn clamped(&self) -> Self {
        Self {
            west: self.west.max(MIN_LON),
            south: self.south.max(MIN_LAT),
            east: self.east.min(MAX_LON),
            north: self.north.min(MAX_LAT),
        }
    }

    /// Returns `true` if the boxes share any point, edges included.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// Returns `true` if `point` lies inside or on the edge of this box.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.west..=self.east).contains(&point.lng) && (self.south..=self.north).contains(&point.lat)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.west, self.south, self.east, self.north
        )
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    InvalidZoom(u8),
    /// West is east of east, south is north of north, or a value is not finite
    InvalidBoundingBox {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
    },
    /// A bounding box was requested for an empty point list
    EmptyPointList,
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::InvalidBoundingBox {
                west,
                south,
                east,
                north,
            } => write!(
                f,
                "Invalid bounding box: west={}, south={}, east={}, north={} \
                 (requires west <= east and south <= north)",
                west, south, east, north
            ),
            CoordError::EmptyPointList => write!(f, "Cannot derive a bounding box from no points"),
        }
    }
}

impl std::error::Error for CoordError {}
