//! Configuration file loading and management
//!
//! This module handles loading and parsing the daemon configuration from
//! `$XDG_CONFIG_HOME/vitalfeed/config.toml`. If the configuration file doesn't
//! exist, a default configuration is created with documented comments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vitalfeed_core::media::MediaSettings;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Daemon-specific configuration
    pub daemon: DaemonConfig,
    /// Where the content records come from
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Provider URLs and thumbnail fallbacks
    #[serde(default)]
    pub media: MediaSettings,
}

/// Daemon runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    pub log_level: String,
    /// Seconds between freshness clock ticks
    /// Default: 60
    #[serde(default = "default_tick_interval_seconds")]
    pub tick_interval_seconds: u64,
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Path to a JSON catalog file
    /// If None, the built-in curated catalog is used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// An existing file
    Existing(PathBuf),
    /// A default file written during this load
    Created(PathBuf),
}

impl ConfigOrigin {
    pub fn path(&self) -> &Path {
        match self {
            ConfigOrigin::Existing(path) | ConfigOrigin::Created(path) => path,
        }
    }
}

fn default_tick_interval_seconds() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            catalog: CatalogConfig::default(),
            media: MediaSettings::default(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_interval_seconds: default_tick_interval_seconds(),
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// The parsed configuration or an error if loading/parsing fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default XDG config location
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// file with documented comments.
    pub fn load_default() -> Result<(Self, ConfigOrigin)> {
        Self::load_or_create(Self::default_config_path()?)
    }

    /// Load configuration from `path`, writing the default file there first
    /// if it doesn't exist.
    ///
    /// Logging may not be initialized yet when this runs, so file creation is
    /// reported through the returned [`ConfigOrigin`] rather than logged here.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<(Self, ConfigOrigin)> {
        let path = path.into();

        let origin = if path.exists() {
            ConfigOrigin::Existing(path)
        } else {
            Self::create_default_file(&path)?;
            ConfigOrigin::Created(path)
        };

        let config = Self::load(origin.path())?;
        Ok((config, origin))
    }

    /// Get the default configuration file path
    ///
    /// Returns `$XDG_CONFIG_HOME/vitalfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "vitalfeed", "vitalfeed")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Create a default configuration file with documented comments
    fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate the default configuration file content with comments
    fn default_config_content() -> String {
        r#"# Vitalfeed Daemon Configuration
# This file configures the vitalfeed-daemon behavior.

[daemon]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
# Default: "info"
log_level = "info"

# Seconds between refreshes of the "updated X ago" labels
# Default: 60
tick_interval_seconds = 60

[catalog]
# Path to a JSON catalog file (an array of records with the keys
# id, type, title, excerpt, videoId, mediaUrl, thumbnail, tags, updatedAt, channel).
# If not specified, the built-in curated catalog is used.
# path = "/path/to/catalog.json"

[media]
# Embeddable player URLs are "<embed_base>/<videoId>?rel=0&modestbranding=1"
embed_base = "https://www.youtube.com/embed"

# Watch links are "<watch_base>?v=<videoId>"
watch_base = "https://www.youtube.com/watch"

# When a thumbnail fails to load, the primary suffix is replaced by the
# secondary one; if that fails too, the placeholder image is shown.
primary_thumbnail_suffix = "maxresdefault.jpg"
secondary_thumbnail_suffix = "hqdefault.jpg"
placeholder_url = "https://images.unsplash.com/photo-1505751172876-fa1923c5c528?auto=format&fit=crop&w=900&q=80"
"#
        .to_string()
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are valid and within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.daemon.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.daemon.log_level,
                valid_log_levels.join(", ")
            );
        }

        if self.daemon.tick_interval_seconds == 0 {
            anyhow::bail!("daemon.tick_interval_seconds must be greater than 0");
        }

        for (key, value) in [
            ("media.embed_base", &self.media.embed_base),
            ("media.watch_base", &self.media.watch_base),
            ("media.placeholder_url", &self.media.placeholder_url),
        ] {
            url::Url::parse(value).with_context(|| format!("Invalid {}: {}", key, value))?;
        }

        if self.media.primary_thumbnail_suffix.is_empty()
            || self.media.secondary_thumbnail_suffix.is_empty()
        {
            anyhow::bail!("media thumbnail suffixes must not be empty");
        }

        Ok(())
    }

    /// Interval between freshness clock ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.daemon.tick_interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.daemon.log_level, "info");
        assert_eq!(config.daemon.tick_interval_seconds, 60);
        assert_eq!(config.tick_interval(), Duration::from_secs(60));
        assert!(config.catalog.path.is_none());
        assert_eq!(config.media, MediaSettings::default());
    }

    #[test]
    fn test_default_file_content_is_valid() {
        let config: Config = toml::from_str(&Config::default_config_content()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[daemon]
log_level = "debug"
tick_interval_seconds = 30

[catalog]
path = "/srv/vitalfeed/catalog.json"

[media]
embed_base = "https://player.example.com/embed"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.daemon.log_level, "debug");
        assert_eq!(config.tick_interval(), Duration::from_secs(30));
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("/srv/vitalfeed/catalog.json"))
        );
        assert_eq!(config.media.embed_base, "https://player.example.com/embed");
        assert_eq!(config.media.watch_base, "https://www.youtube.com/watch");
    }

    #[test]
    fn test_load_minimal_config() {
        let config_content = r#"
[daemon]
log_level = "info"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.daemon.tick_interval_seconds, 60);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.media, MediaSettings::default());
    }

    #[test]
    fn test_load_or_create_writes_default_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitalfeed").join("config.toml");

        let (config, origin) = Config::load_or_create(&path).unwrap();
        assert_eq!(origin, ConfigOrigin::Created(path.clone()));
        assert!(path.exists());
        assert_eq!(config, Config::default());

        let (_, origin) = Config::load_or_create(&path).unwrap();
        assert_eq!(origin, ConfigOrigin::Existing(path.clone()));
        assert_eq!(origin.path(), path.as_path());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Config::load("/nonexistent/vitalfeed/config.toml").is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.daemon.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_tick_interval() {
        let mut config = Config::default();
        config.daemon.tick_interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_media_urls() {
        let mut config = Config::default();
        config.media.embed_base = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.media.placeholder_url = "/relative/placeholder.png".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_suffix() {
        let mut config = Config::default();
        config.media.secondary_thumbnail_suffix.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_config_roundtrip() {
        let mut config = Config::default();
        config.daemon.log_level = "debug".to_string();
        config.catalog.path = Some(PathBuf::from("/tmp/catalog.json"));

        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }
}
