//! Embedding provider implementations
//!
//! The engine talks to embedding models exclusively through the
//! [`Embedder`](crate::domain::ports::Embedder) port. This module ships
//! a deterministic local provider for production-like operation without
//! an external model service, and a null provider for tests.

/// Deterministic feature-hashing embedder
pub mod hash;
/// Null embedding provider for testing
pub mod null;

pub use hash::HashEmbedder;
pub use null::NullEmbedder;

use crate::domain::ports::Embedder;
use std::sync::Arc;

/// Resolve a provider from a configured model identifier.
///
/// Model names of the form `hash-embedder-<dims>` select the hashing
/// provider with the given dimensionality; anything else falls back to
/// the 384-dimensional default.
pub fn from_model_name(model: &str) -> Arc<dyn Embedder> {
    let dimensions = model
        .strip_prefix("hash-embedder-")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(hash::DEFAULT_DIMENSIONS);
    Arc::new(HashEmbedder::new(model.to_string(), dimensions))
}
