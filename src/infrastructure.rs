//! Infrastructure Layer
//!
//! Cross-cutting concerns around the retrieval core: configuration
//! loading with layered precedence and validation.

/// Configuration types and loading
pub mod config;
