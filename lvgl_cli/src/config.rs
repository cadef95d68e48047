//! Configuration file support
//!
//! The config file is TOML, stored at:
//! - Windows: %APPDATA%\lvgl_editor\config.toml
//! - Linux/macOS: ~/.config/lvgl_editor/config.toml
//!
//! Every section and key is optional; missing values take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lvgl_core::project::DisplayConfig;
use lvgl_core::serialize::ActionPlacement;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory
pub const APP_NAME: &str = "lvgl_editor";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Standard config directory, if the platform exposes one.
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display settings for newly created projects
    pub display: DisplayConfig,

    pub export: ExportConfig,

    pub logging: LoggingConfig,
}

/// Output format of `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Yaml,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Yaml => "yaml",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// `flat` (what ESPHome reads) or `nested` under an `actions` key
    pub actions: ActionPlacement,

    pub format: ExportFormat,

    /// Output directory; the input file's directory when unset
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or env_logger filter (`info`, `lvgl_core=debug`, ...)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load from `./lvgl_editor.toml`, then the standard location, else defaults.
    pub fn load_default() -> Result<Self> {
        let local = PathBuf::from("./lvgl_editor.toml");
        if local.exists() {
            return Self::load(&local);
        }

        match get_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.width, 320);
        assert_eq!(config.export.actions, ActionPlacement::Flat);
        assert_eq!(config.export.format, ExportFormat::Yaml);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [display]
            width = 480

            [export]
            actions = "nested"
            "#,
        )
        .unwrap();
        assert_eq!(config.display.width, 480);
        assert_eq!(config.display.height, 240);
        assert_eq!(config.export.actions, ActionPlacement::Nested);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = Config::default();
        config.export.format = ExportFormat::Json;
        config.logging.level = "debug".to_string();

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[display]\nwidth = \"wide\"\n").unwrap();
        assert!(Config::load(&path).is_err());
        assert!(Config::load(dir.path().join("missing.toml")).is_err());
    }
}
