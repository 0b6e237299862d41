use crate::domain::error::Result;
use async_trait::async_trait;

/// Text Embedding Model Interface
///
/// Contract for the external model that maps text to a fixed-dimensional
/// unit-normalized vector. The model has a `load -> ready` lifecycle:
/// [`Embedder::load`] is a one-shot fallible operation, and
/// [`Embedder::embed`] must only be called after a successful load. The
/// semantic layer enforces at-most-once loading and makes concurrent
/// callers await the single in-flight load.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Load the model. Called once; implementations need not guard
    /// against concurrent invocation themselves.
    async fn load(&self) -> Result<()>;

    /// Embed text into a unit-normalized vector of [`Embedder::dimensions`]
    /// floats. Safe for concurrent calls after a successful load.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimensionality of the loaded model
    fn dimensions(&self) -> usize;

    /// Model identifier for logs and statistics
    fn model_name(&self) -> &str;
}
