//! # Configuration Types
//!
//! Shared configuration type definitions and utilities.
//! Provides validation, serialization, and default value handling.

// Architecture Note: the root config aggregates settings owned by other
// layers (layer caps from application, boost weights from the
// personalization layer). Importing them here beats duplicating the
// types.
use crate::application::config::LayerLimits;
use crate::layers::personalization::PersonalizationWeights;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Embedding model settings consumed by the semantic layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmbeddingSettings {
    /// Model identifier resolved by the provider registry
    #[validate(length(min = 1))]
    pub model: String,
    /// Expected output dimensionality. The model's actual dimension is
    /// authoritative; a mismatch fails the load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_dimension: Option<usize>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: format!(
                "hash-embedder-{}",
                crate::providers::embedding::hash::DEFAULT_DIMENSIONS
            ),
            vector_dimension: Some(crate::providers::embedding::hash::DEFAULT_DIMENSIONS),
        }
    }
}

/// Main application configuration
///
/// Central configuration structure for the cascade search server.
/// Supports hierarchical loading with validation and environment
/// variable overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Application name
    pub name: String,
    /// Application version
    pub version: String,
    /// Server configuration (host, port)
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    /// Embedding model configuration
    #[serde(default)]
    #[validate(nested)]
    pub embedding: EmbeddingSettings,
    /// Per-layer result caps
    #[serde(default)]
    #[validate(nested)]
    pub layers: LayerLimits,
    /// Personalization boost weights
    #[serde(default)]
    #[validate(nested)]
    pub personalization: PersonalizationWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "Cascade Search".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            server: ServerConfig::default(),
            embedding: EmbeddingSettings::default(),
            layers: LayerLimits::default(),
            personalization: PersonalizationWeights::default(),
        }
    }
}

impl Config {
    /// Get server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
