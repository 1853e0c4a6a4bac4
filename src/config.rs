//! Configuration handling
//!
//! Configuration is stored in `~/.config/daily/config.toml` (global) or any
//! TOML file the caller points at. Missing files fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Entry, RenderOptions};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Journal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Headings added (empty) to every new blank entry
    pub default_headings: Vec<String>,

    /// Render heading names title-cased
    pub title_case_headings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_headings: Vec::new(),
            title_case_headings: true,
        }
    }
}

impl Config {
    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Loads the global configuration
    pub fn load_global() -> Result<Self> {
        match Self::global_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "daily").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Saves the configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Checks that every default heading has a name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_headings.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "default_headings must not contain blank names".to_string(),
            ));
        }

        Ok(())
    }

    /// Creates a blank entry carrying the default headings
    pub fn blank_entry(&self, title: impl Into<String>) -> Entry {
        let mut entry = Entry::blank(title);
        entry.add_headings(&self.default_headings);
        entry
    }

    /// Returns the render options for this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title_case_headings: self.title_case_headings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert!(config.default_headings.is_empty());
        assert!(config.title_case_headings);
    }

    #[test]
    fn parse_config() {
        let toml = r#"
default_headings = ["Gratitude", "work"]
title_case_headings = false
"#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.default_headings, vec!["Gratitude", "work"]);
        assert!(!config.title_case_headings);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config = Config::from_toml_str("default_headings = [\"work\"]\n").unwrap();
        assert!(config.title_case_headings);
    }

    #[test]
    fn invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("default_headings = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn blank_default_heading_is_invalid() {
        assert!(matches!(
            Config::from_toml_str("default_headings = [\"work\", \"  \"]\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            default_headings: vec!["gratitude".to_string()],
            title_case_headings: false,
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn load_reports_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "title_case_headings = \"yes\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn blank_entry_has_default_headings() {
        let config = Config {
            default_headings: vec!["Gratitude".to_string(), "Work Log".to_string()],
            title_case_headings: true,
        };
        let entry = config.blank_entry("Monday");

        assert_eq!(entry.heading("gratitude"), Some(""));
        assert_eq!(entry.heading("work log"), Some(""));
        assert_eq!(entry.tags().collect::<Vec<_>>(), vec!["gratitude", "work-log"]);
        assert!(entry.template().contains("\nWork Log\n--------\n"));
    }

    #[test]
    fn render_options_follow_config() {
        let config = Config {
            default_headings: vec![],
            title_case_headings: false,
        };
        let mut entry = config.blank_entry("Monday");
        entry.set_heading("work log", "x");

        let text = entry.render_with(None, &config.render_options()).unwrap();
        assert!(text.contains("\nwork log\n"));
    }
}
