//! Configuration types and loading

/// Configuration loading and file management
pub mod loader;
/// Core configuration types and data structures
pub mod types;

pub use loader::ConfigLoader;
pub use types::{Config, EmbeddingSettings, ServerConfig};
