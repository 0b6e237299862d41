//! Cascade Search - a multi-stage document retrieval engine
//!
//! Given a textual query, optionally enriched with a user identifier and
//! request context, the engine returns a ranked list of document
//! references produced by a cascade of four progressively narrower and
//! more expensive stages: a lexical candidate filter over an inverted
//! index, a BM25 relevance scorer, a dense-vector semantic re-ranker and
//! a personalization re-ranker.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod layers;
pub mod providers;
pub mod server;
pub mod tokenizer;

// Re-export core types for public API
pub use domain::error::{Error, ErrorCode, Result};
pub use domain::types::*;

// Re-export main entry points
pub use application::SearchService;
pub use server::run_server;
