//! Application configuration.
//!
//! Loaded from a TOML file under the platform config directory; every field
//! has a default so a missing file just means stock settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the SQLite database file. Empty means the platform default.
    pub database_path: String,
    /// Install the stock profiles when the store is empty
    pub seed_defaults: bool,
    /// Minimum seconds between boundary requests per user (0 disables)
    pub rate_limit_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            seed_defaults: true,
            rate_limit_seconds: 1,
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults when it is absent.
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a config from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Write the config to a TOML file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    /// The database path to use, resolving the platform default when unset.
    pub fn resolved_database_path(&self) -> Result<PathBuf> {
        if !self.database_path.is_empty() {
            return Ok(PathBuf::from(&self.database_path));
        }

        let dirs = directories::ProjectDirs::from("", "", "visual-profiles")
            .context("Failed to resolve project directories")?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        Ok(data_dir.join("profiles.db"))
    }

    fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "visual-profiles")
            .context("Failed to resolve project directories")?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.database_path.is_empty());
        assert!(config.seed_defaults);
        assert_eq!(config.rate_limit_seconds, 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = AppConfig {
            database_path: "/tmp/custom.db".to_string(),
            seed_defaults: false,
            rate_limit_seconds: 5,
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.database_path, "/tmp/custom.db");
        assert!(!loaded.seed_defaults);
        assert_eq!(loaded.rate_limit_seconds, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "seed_defaults = false\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!(!loaded.seed_defaults);
        assert_eq!(loaded.rate_limit_seconds, 1);
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = AppConfig {
            database_path: "/tmp/somewhere.db".to_string(),
            ..AppConfig::default()
        };
        let path = config.resolved_database_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/somewhere.db"));
    }
}
