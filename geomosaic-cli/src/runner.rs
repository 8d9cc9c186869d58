//! Shared setup for commands that do real work.

use std::path::PathBuf;

use geomosaic::config::{ConfigError, ConfigFile};
use geomosaic::logging::{init_logging, LogOptions, LoggingGuard};
use tracing::{info, warn};

use crate::error::CliError;

/// Global options accepted by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Owns logging and configuration for the duration of a command.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: LoggingGuard,
}

impl CliRunner {
    /// Installs logging and loads the configuration.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let log_guard = init_logging(&LogOptions {
            verbose: options.verbose,
            log_file: options.log_file.clone(),
        })?;
        let config = load_config(options)?;

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = geomosaic::VERSION,
            command,
            tile_server = %self.config.tiles.url_template,
            "geomosaic starting"
        );
    }
}

/// Loads the configuration from `--config` or the default location.
///
/// An explicit path must be readable; a system without a configuration
/// directory falls back to defaults.
pub fn load_config(options: &GlobalOptions) -> Result<ConfigFile, CliError> {
    match &options.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            Ok(ConfigFile::load_from(path)?)
        }
        None => match ConfigFile::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::NoConfigDir) => {
                warn!("No configuration directory on this system, using defaults");
                Ok(ConfigFile::default())
            }
            Err(e) => Err(e.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let options = GlobalOptions {
            config: Some(dir.path().join("missing.ini")),
            ..GlobalOptions::default()
        };
        assert!(matches!(load_config(&options), Err(CliError::Config(_))));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[tiles]\nconcurrency = 3\n").unwrap();

        let options = GlobalOptions {
            config: Some(path),
            ..GlobalOptions::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.tiles.concurrency, 3);
    }

    #[test]
    fn test_invalid_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[overlay]\ncolor = red\n").unwrap();

        let options = GlobalOptions {
            config: Some(path),
            ..GlobalOptions::default()
        };
        assert!(matches!(
            load_config(&options),
            Err(CliError::ConfigFile(ConfigError::InvalidValue { .. }))
        ));
    }
}
