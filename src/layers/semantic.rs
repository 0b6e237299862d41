//! Layer 3: dense-vector semantic re-ranker
//!
//! Stores one pre-computed embedding per document and re-scores the
//! Stage-2 candidates by fusing their BM25 score with cosine similarity
//! to the embedded query:
//!
//! ```text
//! final(d) = 0.6 * bm25(d) + 0.4 * cos(query, d)
//! ```
//!
//! The embedding model is an external collaborator behind the
//! [`Embedder`] port. Loading is lazy and at-most-once: the first caller
//! triggers the load and concurrent callers await the same in-flight
//! attempt.

use crate::domain::error::{Error, Result};
use crate::domain::ports::Embedder;
use crate::domain::types::{Document, SearchResult, VectorStoreStats};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

/// Weight of the BM25 score in the fused ranking
pub const BM25_WEIGHT: f64 = 0.6;
/// Weight of the cosine similarity in the fused ranking
pub const COSINE_WEIGHT: f64 = 0.4;

/// Stage tag carried by errors raised here
const LAYER: &str = "layer3";

/// A stored embedding with its document snapshot
#[derive(Debug, Clone)]
struct StoredVector {
    vector: Vec<f32>,
    title: String,
    url: Option<String>,
    category: Option<String>,
    created_at: Option<DateTime<Utc>>,
    metadata: serde_json::Value,
}

/// Re-ranked results together with the similarity list computed for them
#[derive(Debug, Clone)]
pub struct RerankOutcome {
    /// Results re-sorted by fused score, truncated to the layer cap
    pub results: Vec<SearchResult>,
    /// (document id, cosine similarity) pairs sorted by similarity
    /// descending, for observability
    pub similarities: Vec<(String, f64)>,
}

/// Vector store and re-ranker over the Stage-2 candidate set
pub struct SemanticIndex {
    embedder: Arc<dyn Embedder>,
    configured_dimension: Option<usize>,
    loaded: OnceCell<usize>,
    vectors: RwLock<HashMap<String, StoredVector>>,
    max_results: usize,
}

impl SemanticIndex {
    /// Create an index over the given embedding model.
    ///
    /// `configured_dimension` pins the expected dimensionality; a model
    /// reporting a different dimension fails the load.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        configured_dimension: Option<usize>,
        max_results: usize,
    ) -> Self {
        Self {
            embedder,
            configured_dimension,
            loaded: OnceCell::new(),
            vectors: RwLock::new(HashMap::new()),
            max_results,
        }
    }

    /// Ensure the embedding model is loaded, triggering the one-shot load
    /// when necessary. Returns the model dimensionality.
    pub async fn ready(&self) -> Result<usize> {
        self.loaded
            .get_or_try_init(|| async {
                info!(model = self.embedder.model_name(), "loading embedding model");
                self.embedder.load().await.map_err(|e| {
                    Error::layer(LAYER, format!("embedding model failed to load: {}", e))
                })?;
                let dimensions = self.embedder.dimensions();
                if let Some(expected) = self.configured_dimension {
                    if expected != dimensions {
                        return Err(Error::layer(
                            LAYER,
                            format!(
                                "configured vector dimension {} does not match model output {}",
                                expected, dimensions
                            ),
                        ));
                    }
                }
                info!(dimensions, "embedding model ready");
                Ok(dimensions)
            })
            .await
            .copied()
    }

    /// True once the model has loaded successfully
    pub fn is_ready(&self) -> bool {
        self.loaded.initialized()
    }

    /// Embed and store a document under its id.
    ///
    /// The stored record snapshots the fields the later layers read:
    /// title, url, category, creation time and the original metadata.
    pub async fn add_document(&self, document: &Document) -> Result<()> {
        let dimensions = self.ready().await?;
        let text = format!("{} {}", document.title, document.content);
        let vector = self.embedder.embed(&text).await?;
        if vector.len() != dimensions {
            return Err(Error::layer(
                LAYER,
                format!(
                    "embedding for '{}' has dimension {}, expected {}",
                    document.id,
                    vector.len(),
                    dimensions
                ),
            ));
        }

        let mut vectors = self.vectors.write().await;
        vectors.insert(
            document.id.clone(),
            StoredVector {
                vector,
                title: document.title.clone(),
                url: document.url.clone(),
                category: document.category.clone(),
                created_at: document.created_at,
                metadata: document.metadata.clone(),
            },
        );
        debug!(id = %document.id, "stored document embedding");
        Ok(())
    }

    /// Drop the stored vector for an id; returns false when absent
    pub async fn remove_document(&self, id: &str) -> bool {
        self.vectors.write().await.remove(id).is_some()
    }

    /// Re-rank the Stage-2 results by fused BM25 + cosine score.
    ///
    /// Candidates without a stored vector get similarity 0. The incoming
    /// scores are assumed to be the BM25 totals from the relevance layer.
    pub async fn rerank(&self, query: &str, results: Vec<SearchResult>) -> Result<RerankOutcome> {
        if results.is_empty() {
            return Ok(RerankOutcome {
                results,
                similarities: Vec::new(),
            });
        }

        self.ready().await?;
        let query_vector = self.embedder.embed(query).await?;
        let vectors = self.vectors.read().await;

        let mut similarities: Vec<(String, f64)> = Vec::with_capacity(results.len());
        for result in &results {
            let similarity = match vectors.get(&result.id) {
                Some(stored) => cosine_similarity(&query_vector, &stored.vector)?,
                None => 0.0,
            };
            similarities.push((result.id.clone(), similarity));
        }
        drop(vectors);

        let by_id: HashMap<&str, f64> = similarities
            .iter()
            .map(|(id, sim)| (id.as_str(), *sim))
            .collect();

        let mut fused: Vec<SearchResult> = results
            .into_iter()
            .map(|mut result| {
                let similarity = by_id.get(result.id.as_str()).copied().unwrap_or(0.0);
                let bm25 = result.score;
                result.score = BM25_WEIGHT * bm25 + COSINE_WEIGHT * similarity;
                if let serde_json::Value::Object(metadata) = &mut result.metadata {
                    metadata.insert("bm25_score".into(), serde_json::json!(bm25));
                    metadata.insert("vector_similarity".into(), serde_json::json!(similarity));
                }
                result
            })
            .collect();
        drop(by_id);

        fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        fused.truncate(self.max_results);

        similarities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(RerankOutcome {
            results: fused,
            similarities,
        })
    }

    /// Standalone semantic search over every stored vector.
    ///
    /// Exact similarity, O(N * D) per query.
    pub async fn semantic_search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.ready().await?;
        let query_vector = self.embedder.embed(query).await?;
        let vectors = self.vectors.read().await;

        let mut scored: Vec<SearchResult> = Vec::with_capacity(vectors.len());
        for (id, stored) in vectors.iter() {
            let similarity = cosine_similarity(&query_vector, &stored.vector)?;
            scored.push(snapshot_result(id, stored, similarity));
        }
        drop(vectors);

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    /// Top-k documents most similar to a stored vector, excluding itself.
    ///
    /// An id without a stored vector is a layer error (client misuse).
    pub async fn find_similar(&self, id: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.ready().await?;
        let vectors = self.vectors.read().await;
        let Some(target) = vectors.get(id) else {
            return Err(Error::layer(
                LAYER,
                format!("no vector stored for document '{}'", id),
            ));
        };

        let mut scored: Vec<SearchResult> = Vec::with_capacity(vectors.len().saturating_sub(1));
        for (other_id, stored) in vectors.iter() {
            if other_id == id {
                continue;
            }
            let similarity = cosine_similarity(&target.vector, &stored.vector)?;
            scored.push(snapshot_result(other_id, stored, similarity));
        }
        drop(vectors);

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    /// Vector-store statistics
    pub async fn stats(&self) -> VectorStoreStats {
        VectorStoreStats {
            vectors: self.vectors.read().await.len(),
            dimensions: self.loaded.get().copied(),
            model: self.embedder.model_name().to_string(),
        }
    }
}

/// Materialize a result from a stored snapshot; content is not retained
/// at this layer, so the excerpt is empty.
fn snapshot_result(id: &str, stored: &StoredVector, similarity: f64) -> SearchResult {
    let mut metadata = match &stored.metadata {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    if let Some(category) = &stored.category {
        metadata.insert("category".into(), serde_json::json!(category));
    }
    if let Some(created_at) = &stored.created_at {
        metadata.insert("created_at".into(), serde_json::json!(created_at));
    }
    metadata.insert("vector_similarity".into(), serde_json::json!(similarity));

    SearchResult {
        id: id.to_string(),
        title: stored.title.clone(),
        content: String::new(),
        url: stored.url.clone(),
        score: similarity,
        metadata: serde_json::Value::Object(metadata),
    }
}

/// Cosine similarity between two vectors.
///
/// Rejects mismatched dimensions; falls back to norm division so the
/// result stays correct for vectors that are not perfectly unit-length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::layer(
            LAYER,
            format!("vector dimension mismatch: {} vs {}", a.len(), b.len()),
        ));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
