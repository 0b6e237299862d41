//! # Domain Layer
//!
//! Core types and contracts for the retrieval cascade.
//!
//! This layer contains:
//!
//! - [`error`] - Error types with stable service codes
//! - [`ports`] - Port traits (interfaces) for external collaborators
//! - [`types`] - Core domain types like [`Document`], [`SearchRequest`], [`SearchResult`]
//!
//! The domain layer has no knowledge of the HTTP surface or of concrete
//! embedding models; those arrive through the port traits.
//!
//! [`Document`]: types::Document
//! [`SearchRequest`]: types::SearchRequest
//! [`SearchResult`]: types::SearchResult

/// Domain error types with stable service codes
pub mod error;
/// Port traits (interfaces) for external collaborators
pub mod ports;
/// Core domain types for documents, requests and profiles
pub mod types;

pub use error::{Error, ErrorCode, Result};
pub use types::*;
