//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/geomosaic/config.ini` (or the
//! platform equivalent). A missing file means defaults; command line flags
//! override whatever the file says.
//!
//! ```ini
//! [tiles]
//! url_template = http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png
//! mirrors = a,b,c
//! user_agent = geomosaic/0.1.0
//! timeout = 30
//! zoom = 8
//! concurrency = 16
//! max_tiles = 4096
//!
//! [overlay]
//! stroke_width = 15
//! marker_radius = 20
//! color = 255,0,0,128
//! markers = endpoints
//! ```

mod keys;

pub use keys::ConfigKey;

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::mosaic::{DEFAULT_CONCURRENCY, DEFAULT_MAX_TILES, DEFAULT_ZOOM};
use crate::overlay::{
    MarkerPlacement, OverlayStyle, DEFAULT_COLOR, DEFAULT_MARKER_RADIUS, DEFAULT_STROKE_WIDTH,
};
use crate::provider::{
    TileServerConfig, DEFAULT_MIRRORS, DEFAULT_TIMEOUT_SECS, DEFAULT_URL_TEMPLATE,
    DEFAULT_USER_AGENT,
};

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}

/// `[tiles]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    pub url_template: String,
    pub mirrors: Vec<String>,
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub zoom: u8,
    pub concurrency: usize,
    pub max_tiles: u64,
}

impl Default for TilesSettings {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            mirrors: DEFAULT_MIRRORS.iter().map(|s| s.to_string()).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            zoom: DEFAULT_ZOOM,
            concurrency: DEFAULT_CONCURRENCY,
            max_tiles: DEFAULT_MAX_TILES,
        }
    }
}

impl TilesSettings {
    pub fn server(&self) -> TileServerConfig {
        TileServerConfig::new(self.url_template.clone(), self.mirrors.clone())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// `[overlay]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub stroke_width: f32,
    pub marker_radius: f32,
    pub color: [u8; 4],
    pub markers: MarkerPlacement,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            marker_radius: DEFAULT_MARKER_RADIUS,
            color: DEFAULT_COLOR,
            markers: MarkerPlacement::default(),
        }
    }
}

impl OverlaySettings {
    pub fn style(&self) -> OverlayStyle {
        OverlayStyle {
            stroke_width: self.stroke_width,
            marker_radius: self.marker_radius,
            color: self.color,
            markers: self.markers.clone(),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub tiles: TilesSettings,
    pub overlay: OverlaySettings,
}

/// Directory holding the configuration file.
pub fn config_directory() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("geomosaic"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Default configuration file path.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_directory()?.join("config.ini"))
}

impl ConfigFile {
    /// Loads the configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Loads the configuration from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Builds a configuration from parsed INI data. Absent keys keep their
    /// defaults; unknown keys are ignored.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Renders the configuration as INI data.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Saves the configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path()?)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        self.to_ini().write_to_file(path).map_err(io_error)?;
        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.tiles.zoom, 8);
        assert_eq!(config.tiles.concurrency, 16);
        assert_eq!(config.tiles.timeout, 30);
        assert_eq!(config.tiles.mirrors, vec!["a", "b", "c"]);
        assert_eq!(config.overlay.style(), OverlayStyle::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(
            &path,
            "[tiles]\nzoom = 12\nmirrors = x, y\n\n[overlay]\ncolor = 0,0,255,200\nmarkers = all\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.tiles.zoom, 12);
        assert_eq!(config.tiles.mirrors, vec!["x", "y"]);
        assert_eq!(config.tiles.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.overlay.color, [0, 0, 255, 200]);
        assert_eq!(config.overlay.markers, MarkerPlacement::All);
        assert_eq!(config.overlay.stroke_width, DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn test_invalid_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[tiles]\nzoom = 40\n").unwrap();

        match ConfigFile::load_from(&path) {
            Err(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, "tiles.zoom");
                assert_eq!(value, "40");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.tiles.url_template = "https://tiles.example.com/{z}/{x}/{y}.png".to_string();
        config.tiles.max_tiles = 100;
        config.overlay.markers = MarkerPlacement::Indices(vec![0, 5]);
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_empty_marker_list_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.overlay.markers = MarkerPlacement::Indices(Vec::new());
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded.overlay.markers, MarkerPlacement::None);
    }

    #[test]
    fn test_server_config() {
        let config = ConfigFile::default();
        let server = config.tiles.server();
        assert_eq!(server.url_template, DEFAULT_URL_TEMPLATE);
        assert_eq!(server.mirrors.len(), 3);
        assert_eq!(config.tiles.timeout_duration(), Duration::from_secs(30));
    }
}
