//! # Configuration Loader
//!
//! Unified configuration loading from files, environment, and defaults.
//! Implements layered configuration with precedence rules.

use crate::domain::error::{Error, Result};
use config::{Config as ConfigBuilder, Environment, FileFormat};
use std::path::Path;
use validator::Validate;

use super::types::Config;

/// Embedded default configuration from config/default.toml
/// This is the single source of truth for default values in the binary.
/// Works from any working directory because it's compiled into the binary.
const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config/default.toml");

/// Returns the embedded default config TOML for testing purposes
pub fn get_default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

/// Configuration loader for TOML-based application settings
///
/// Handles loading configuration from embedded defaults, environment
/// variables, and configuration files.
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader;

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader instance
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from embedded defaults and environment variables
    ///
    /// Merges configuration sources in order:
    /// 1. Embedded TOML defaults (source of truth)
    /// 2. Environment variables with the `CASCADE` prefix (override defaults)
    pub fn load(&self) -> Result<Config> {
        self.build(None)
    }

    /// Load configuration from a specific TOML file
    ///
    /// Merges configuration sources in order:
    /// 1. Embedded TOML defaults (source of truth)
    /// 2. Specified configuration file (if it exists)
    /// 3. Environment variables (highest priority)
    pub fn load_with_file(&self, path: &Path) -> Result<Config> {
        self.build(Some(path))
    }

    fn build(&self, path: Option<&Path>) -> Result<Config> {
        let mut builder = ConfigBuilder::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG_TOML,
            FileFormat::Toml,
        ));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("CASCADE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?;

        let config: Config = config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize configuration: {}", e)))?;

        config
            .validate()
            .map_err(|e| Error::config(format!("Configuration validation failed: {}", e)))?;

        Ok(config)
    }
}
