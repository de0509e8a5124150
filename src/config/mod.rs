//! Configuration management for LazyTable.
//!
//! This module handles loading, saving and validating the TOML configuration
//! file that carries table defaults, breakpoint thresholds and drag settings.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::table::BreakpointThresholds;

pub use settings::{TableSettings, TableSize};

/// Name of the configuration file inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while handling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("Failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("Failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// The configuration parsed but holds invalid values.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Drag-reorder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Whether rows can be reordered.
    pub enabled: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Table defaults.
    pub settings: TableSettings,
    /// Viewport widths at which each breakpoint starts, in pixels.
    pub breakpoints: BreakpointThresholds,
    /// Drag-reorder settings.
    pub drag: DragSettings,
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Path of the configuration file in the platform config directory.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("lazytable").join(CONFIG_FILE_NAME))
    }

    /// Check that the values are usable.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if the breakpoint thresholds
    /// are not strictly increasing, in pixels or once divided into cells, or
    /// if a width is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.breakpoints.is_ordered() {
            return Err(ConfigError::ValidationError(format!(
                "breakpoints must increase: md={} lg={} xl={}",
                self.breakpoints.md, self.breakpoints.lg, self.breakpoints.xl
            )));
        }
        if self.settings.synthetic_column_width == 0 {
            return Err(ConfigError::ValidationError(
                "synthetic_column_width must be at least 1".to_string(),
            ));
        }
        if self.settings.cell_px == 0 {
            return Err(ConfigError::ValidationError(
                "cell_px must be at least 1".to_string(),
            ));
        }
        let cells = self.cell_breakpoints();
        if !cells.is_ordered() {
            return Err(ConfigError::ValidationError(format!(
                "breakpoints collapse at cell_px={}: md={} lg={} xl={} cells",
                self.settings.cell_px, cells.md, cells.lg, cells.xl
            )));
        }
        Ok(())
    }

    /// Breakpoint thresholds expressed in terminal cells.
    pub fn cell_breakpoints(&self) -> BreakpointThresholds {
        self.breakpoints.scaled_down(u32::from(self.settings.cell_px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SelectionType;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings.empty_text, "No data");
        assert!(config.drag.enabled);
        assert!(config.settings.vim_mode);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[settings]
selection_type = "radio"
size = "small"
vim_mode = false

[breakpoints]
md = 500
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.selection_type, SelectionType::Radio);
        assert_eq!(config.settings.size, TableSize::Small);
        assert!(!config.settings.vim_mode);
        assert!(config.settings.bordered);
        assert_eq!(config.breakpoints.md, 500);
        assert_eq!(config.breakpoints.lg, 768);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.settings.resize_debounce_ms = Some(50);
        config.drag.enabled = false;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "settings = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unordered_breakpoints_rejected() {
        let mut config = Config::default();
        config.breakpoints.lg = 600;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("breakpoints must increase"));
    }

    #[test]
    fn test_zero_width_rejected() {
        let mut config = Config::default();
        config.settings.synthetic_column_width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_cell_breakpoints() {
        let config = Config::default();
        let cells = config.cell_breakpoints();
        assert_eq!((cells.md, cells.lg, cells.xl), (80, 96, 128));
    }

    #[test]
    fn test_breakpoints_collapsing_into_same_cell_rejected() {
        let mut config = Config::default();
        config.breakpoints.lg = 647;
        assert!(config.breakpoints.is_ordered());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("breakpoints collapse"));

        config.settings.cell_px = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_config_path_ends_with_file_name() {
        let path = Config::config_path().unwrap();
        assert!(path.ends_with("lazytable/config.toml"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn test_load_reads_xdg_config_home() {
        let dir = TempDir::new().unwrap();
        let previous = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let path = Config::config_path().unwrap();
        let mut expected = Config::default();
        expected.settings.empty_text = "Nothing here".to_string();
        expected.save_to(&path).unwrap();
        let loaded = Config::load();

        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        assert!(path.starts_with(dir.path()));
        assert_eq!(loaded.unwrap(), expected);
    }
}
