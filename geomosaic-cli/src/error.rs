//! CLI error type.

use std::fmt;

use geomosaic::config::ConfigError;
use geomosaic::coord::CoordError;
use geomosaic::logging::LoggingError;
use geomosaic::mosaic::MosaicError;
use geomosaic::overlay::OverlayError;
use geomosaic::points::PointsError;
use geomosaic::provider::HttpError;

/// Errors reported to the user before exiting with a failure status.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration or argument combination.
    Config(String),

    /// The configuration file could not be read or written.
    ConfigFile(ConfigError),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// The route file could not be loaded.
    Points(PointsError),

    /// The request area is invalid.
    Coord(CoordError),

    /// The HTTP client could not be created.
    Http(HttpError),

    /// Mosaic assembly or output failed.
    Mosaic(MosaicError),

    /// The route could not be drawn.
    Overlay(OverlayError),

    /// Writing command output failed.
    Output(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Points(e) => write!(f, "{}", e),
            CliError::Coord(e) => write!(f, "Invalid area: {}", e),
            CliError::Http(e) => write!(f, "{}", e),
            CliError::Mosaic(e) => write!(f, "{}", e),
            CliError::Overlay(e) => write!(f, "Failed to draw route: {}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Points(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::Http(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::Overlay(e) => Some(e),
            CliError::Output(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<PointsError> for CliError {
    fn from(e: PointsError) -> Self {
        CliError::Points(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::Http(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Mosaic(e)
    }
}

impl From<OverlayError> for CliError {
    fn from(e: OverlayError) -> Self {
        CliError::Overlay(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e)
    }
}
