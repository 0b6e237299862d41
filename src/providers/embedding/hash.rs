//! Deterministic feature-hashing embedder
//!
//! Projects text into a fixed-dimensional unit vector using signed
//! feature hashing over the shared tokenizer's output: each token hashes
//! to two vector slots with a sign derived from the hash. Token overlap
//! between two texts then shows up directly as cosine similarity.
//!
//! The provider is fully local and deterministic, which makes it the
//! default stand-in for an external sentence-embedding model.

use crate::domain::error::Result;
use crate::domain::ports::Embedder;
use crate::tokenizer::tokenize;
use async_trait::async_trait;

/// Default output dimensionality
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Seed for the second hash slot
const SECOND_SLOT_SEED: (u64, u64, u64, u64) = (
    0x16f1_1fe8_9b0d_677c,
    0xb480_a793_d8e6_c86c,
    0x6fe2_e5aa_b969_121f,
    0x9f90_d5d0_8cb5_7f58,
);

/// Signed feature-hashing embedding model
pub struct HashEmbedder {
    model: String,
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a provider advertising the given model name and output size
    pub fn new(model: String, dimensions: usize) -> Self {
        Self { model, dimensions }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(
            format!("hash-embedder-{}", DEFAULT_DIMENSIONS),
            DEFAULT_DIMENSIONS,
        )
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn load(&self) -> Result<()> {
        // Nothing to fetch; the projection is computed on the fly.
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let h1 = seahash::hash(token.as_bytes());
            let slot1 = (h1 % self.dimensions as u64) as usize;
            vector[slot1] += sign(h1);

            let (k1, k2, k3, k4) = SECOND_SLOT_SEED;
            let h2 = seahash::hash_seeded(token.as_bytes(), k1, k2, k3, k4);
            let slot2 = (h2 % self.dimensions as u64) as usize;
            vector[slot2] += sign(h2);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn sign(hash: u64) -> f32 {
    if hash >> 63 == 0 {
        1.0
    } else {
        -1.0
    }
}
