//! Configuration system for the relay selector CLI.

use relay_selector::{Constraint, Ownership, Providers, RelayConstraints, RelayLocation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Relay list location
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Default selection constraints
    #[serde(default)]
    pub constraints: ConstraintsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Relay list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Relay list JSON file
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

/// Default constraints, each `"any"` or a value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintsConfig {
    /// `any`, `<country>`, `<country>-<city>` or `<country>-<city>-<hostname>`
    #[serde(default = "default_any")]
    pub location: String,
    /// `any` or a port number
    #[serde(default = "default_any")]
    pub port: String,
    /// `any`, `owned` or `rented`
    #[serde(default = "default_any")]
    pub ownership: String,
    /// `any` or a comma separated provider list
    #[serde(default = "default_any")]
    pub providers: String,
    /// Require DAITA-capable relays
    #[serde(default)]
    pub daita: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values

fn default_catalog_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("relay-select/relays.json")
}

fn default_any() -> String {
    "any".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            location: default_any(),
            port: default_any(),
            ownership: default_any(),
            providers: default_any(),
            daita: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ConstraintsConfig {
    /// Parse the textual constraints
    ///
    /// # Errors
    ///
    /// Returns an error if any value cannot be parsed.
    pub fn to_constraints(&self) -> anyhow::Result<RelayConstraints> {
        let location: Constraint<RelayLocation> = self.location.parse()?;
        let port: Constraint<u16> = self
            .port
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid port '{}': {}", self.port, e))?;
        let ownership: Constraint<Ownership> = self.ownership.parse()?;
        let providers: Constraint<Providers> = self.providers.parse()?;

        if port == Constraint::Only(0) {
            anyhow::bail!("Port must be between 1 and 65535");
        }

        Ok(RelayConstraints {
            location,
            port,
            ownership,
            providers,
            daita: self.daita,
        })
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("relay-select/config.toml")
    }

    /// Load config from default path, or the defaults if no file exists
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        // Validate constraints
        self.constraints.to_constraints()?;

        if self.catalog.path.as_os_str().is_empty() {
            anyhow::bail!("Relay list path is empty");
        }

        Ok(())
    }
}
