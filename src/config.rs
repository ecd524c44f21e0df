//! Application configuration
//!
//! Read from `<config dir>/gamepads/config.toml`. Every section is optional:
//!
//! ```toml
//! [gamepads]
//! button_threshold = 0.15
//! axis_threshold = 0.15
//!
//! [driver]
//! probe_interval_ms = 100
//! tick_interval_ms = 16
//!
//! [platform]
//! runtime = "firefox"
//!
//! [[mappings]]
//! name = "arcade_stick"
//! vendor_id = "0f0d"
//! product_id = "0092"
//! buttons = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1]
//! axes = [0, 1, -1, -1]
//! ```
//!
//! Unknown keys are ignored.

use crate::host::driver::DriverSettings;
use crate::host::platform::{PlatformIdentity, PlatformOverride};
use crate::mapping::{
    CatalogError, DeviceNormalizer, GamepadsConfig, MappingCatalog, MappingEntryConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid mapping in config: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub gamepads: GamepadsConfig,
    pub driver: DriverSettings,
    pub platform: PlatformOverride,
    pub mappings: Vec<MappingEntryConfig>,
}

impl AppConfig {
    /// `<config dir>/gamepads/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gamepads").join("config.toml"))
    }

    /// Loads the config at `path`; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Loaded config from {} ({} extra mappings)",
            path.display(),
            config.mappings.len()
        );
        Ok(config)
    }

    /// Loads from the default location, or the defaults if there is none
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                warn!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Identity after applying the `[platform]` overrides
    pub fn platform_identity(&self, detected: PlatformIdentity) -> PlatformIdentity {
        let identity = self.platform.apply(detected);
        debug!(
            "Platform identity: engine={} runtime={}",
            identity.engine, identity.runtime
        );
        identity
    }

    /// Built-in catalog extended with the `[[mappings]]` entries
    pub fn catalog(&self) -> Result<MappingCatalog, CatalogError> {
        MappingCatalog::with_entries(self.mappings.iter().cloned())
    }

    pub fn normalizer(&self, detected: PlatformIdentity) -> Result<DeviceNormalizer, ConfigError> {
        Ok(DeviceNormalizer::new(
            self.gamepads,
            self.catalog()?,
            self.platform_identity(detected),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = AppConfig::from_toml("").expect("empty config parses");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gamepads.button_threshold, 0.15);
        assert_eq!(config.gamepads.axis_threshold, 0.15);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = AppConfig::from_toml(
            r#"
            [gamepads]
            axis_threshold = 0.25
            vibration = true

            [telemetry]
            enabled = false
            "#,
        )
        .expect("config parses");

        assert_eq!(config.gamepads.axis_threshold, 0.25);
        assert_eq!(config.gamepads.button_threshold, 0.15);
    }

    #[test]
    fn mappings_extend_the_catalog() {
        let config = AppConfig::from_toml(
            r#"
            [platform]
            runtime = "firefox"

            [[mappings]]
            name = "arcade_stick"
            browser = "firefox"
            vendor_id = "0f0d"
            product_id = "0092"
            buttons = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1]
            axes = [0, 1, -1, -1]
            "#,
        )
        .expect("config parses");

        let normalizer = config
            .normalizer(PlatformIdentity::native())
            .expect("valid mappings");
        assert_eq!(normalizer.platform().engine(), "gecko");
        let entry = normalizer.catalog().entries().last().expect("user entry");
        assert_eq!(entry.name, "arcade_stick");
        assert_eq!(entry.runtime.as_deref(), Some("firefox"));
    }

    #[test]
    fn invalid_mappings_are_reported() {
        let config = AppConfig::from_toml(
            r#"
            [[mappings]]
            name = "short"
            vendor_id = "1"
            product_id = "2"
            buttons = [0, 1]
            axes = [0, 1, 2, 3]
            "#,
        )
        .expect("config parses");

        assert!(matches!(
            config.normalizer(PlatformIdentity::native()),
            Err(ConfigError::Catalog(CatalogError::ButtonCount { got: 2, .. }))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("gamepads-missing-config-for-tests.toml");
        let config = AppConfig::load(&path).expect("missing file is not an error");
        assert_eq!(config, AppConfig::default());
    }
}
