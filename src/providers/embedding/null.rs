//! Null embedding provider for testing and development

use crate::domain::error::Result;
use crate::domain::ports::Embedder;
use async_trait::async_trait;

/// Null embedding provider for tests.
/// Returns a fixed small unit vector for every input.
pub struct NullEmbedder {
    dimensions: usize,
}

impl NullEmbedder {
    /// Create a null provider with the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for NullEmbedder {
    fn default() -> Self {
        Self::new(4)
    }
}

#[async_trait]
impl Embedder for NullEmbedder {
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.dimensions];
        if let Some(first) = vector.first_mut() {
            *first = 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "null"
    }
}
