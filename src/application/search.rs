//! Cascade Search Service
//!
//! Coordinates the four retrieval layers behind a single entry point.
//! Queries flow lexical -> relevance -> semantic -> personalization, each
//! stage narrowing the candidate set under its configured cap. Document
//! mutations fan out to the first three layers; behavior recording and
//! profile upserts go to the personalization layer.
//!
//! Locking follows the single-writer model: stage-level exclusive locks
//! on mutation paths, shared locks on reads. The lexical and relevance
//! guards are taken together on mutations so a reader never observes a
//! document in one but not the other.

use crate::application::config::LayerLimits;
use crate::domain::error::{Error, ErrorCode, Result};
use crate::domain::ports::Embedder;
use crate::domain::types::{
    BehaviorData, BooleanOperator, Document, EngineStats, HealthStatus, LayerStat, LayerStats,
    ProfileUpdate, RankingMethod, SearchData, SearchRequest, SearchResponse, SearchResult,
    UserAction, UserProfile,
};
use crate::layers::personalization::{PersonalizationLayer, PersonalizationWeights};
use crate::layers::relevance::{Bm25Params, RelevanceScorer};
use crate::layers::semantic::SemanticIndex;
use crate::layers::InvertedIndex;
use crate::tokenizer::tokenize;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// The aggregating four-layer search service
pub struct SearchService {
    lexical: RwLock<InvertedIndex>,
    relevance: RwLock<RelevanceScorer>,
    semantic: SemanticIndex,
    personalization: PersonalizationLayer,
    limits: LayerLimits,
}

impl SearchService {
    /// Create a service over the given embedding model with default
    /// BM25 ranking.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        limits: LayerLimits,
        weights: PersonalizationWeights,
        vector_dimension: Option<usize>,
    ) -> Self {
        Self::with_ranking(
            embedder,
            limits,
            weights,
            vector_dimension,
            RankingMethod::default(),
        )
    }

    /// Create a service with an explicit relevance ranking method
    pub fn with_ranking(
        embedder: Arc<dyn Embedder>,
        limits: LayerLimits,
        weights: PersonalizationWeights,
        vector_dimension: Option<usize>,
        method: RankingMethod,
    ) -> Self {
        Self {
            lexical: RwLock::new(InvertedIndex::new(limits.max_results_layer1)),
            relevance: RwLock::new(RelevanceScorer::with_params(
                limits.max_results_layer2,
                Bm25Params::default(),
                method,
            )),
            semantic: SemanticIndex::new(embedder, vector_dimension, limits.max_results_layer3),
            personalization: PersonalizationLayer::new(weights),
            limits,
        }
    }

    /// Trigger the embedding-model load eagerly.
    ///
    /// Loading is otherwise lazy on first use; servers call this at
    /// startup to surface model or dimension problems immediately.
    pub async fn warm_up(&self) -> Result<()> {
        self.semantic.ready().await.map(|_| ()).map_err(not_ready)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Run the full four-layer cascade for a request
    #[instrument(skip_all, fields(query = %request.query))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        validate(request)?;
        let started = Instant::now();
        let query_tokens = tokenize(&request.query);
        let has_user = request.user_id.is_some();
        let has_context = request.context.is_some();
        let applied_weight = self
            .personalization
            .weights()
            .applied(has_user, has_context);

        // Layer 1: lexical candidates
        let layer_started = Instant::now();
        let candidates = self.lexical.read().await.candidates(&request.query);
        let layer1 = LayerStat::new(candidates.len(), elapsed_ms(layer_started));

        if candidates.is_empty() {
            debug!("no lexical candidates, short-circuiting");
            return Ok(SearchResponse::success(SearchData {
                results: Vec::new(),
                total_count: 0,
                execution_time_ms: elapsed_ms(started),
                layer_stats: LayerStats {
                    layer1,
                    ..LayerStats::default()
                },
                personalization_score: Some(applied_weight),
            }));
        }

        // Layer 2: probabilistic relevance
        let layer_started = Instant::now();
        let scored = self
            .relevance
            .read()
            .await
            .score(&query_tokens, &candidates);
        let layer2 = LayerStat::new(scored.len(), elapsed_ms(layer_started));

        // Layer 3: semantic re-ranking
        self.semantic.ready().await.map_err(not_ready)?;
        let layer_started = Instant::now();
        let reranked = self
            .semantic
            .rerank(&request.query, scored)
            .await
            .map_err(|e| Error::coded(ErrorCode::SearchError, e))?;
        let layer3 = LayerStat::new(reranked.results.len(), elapsed_ms(layer_started));

        // Layer 4: personalization
        let now = request
            .context
            .as_ref()
            .and_then(|c| c.timestamp)
            .unwrap_or_else(Utc::now);
        // an explicit request limit above the configured final cap widens
        // the window; the validator already bounds it at 100
        let final_limit = self
            .limits
            .max_final_results
            .max(request.limit.unwrap_or(0));
        let layer_started = Instant::now();
        let personalized = self
            .personalization
            .rerank(
                reranked.results,
                request.user_id.as_deref(),
                request.context.as_ref(),
                now,
                final_limit,
            )
            .await;
        let layer4 = LayerStat::new(personalized.results.len(), elapsed_ms(layer_started));

        let results = paginate(personalized.results, request.offset, request.limit);
        debug!(results = results.len(), "cascade complete");

        Ok(SearchResponse::success(SearchData {
            total_count: results.len(),
            results,
            execution_time_ms: elapsed_ms(started),
            layer_stats: LayerStats {
                layer1,
                layer2,
                layer3,
                layer4,
            },
            personalization_score: Some(personalized.personalization_score),
        }))
    }

    /// Lexical candidate retrieval only (layer 1)
    pub async fn quick_search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        validate(request)?;
        let started = Instant::now();

        let candidates = self.lexical.read().await.candidates(&request.query);
        let layer1 = LayerStat::new(candidates.len(), elapsed_ms(started));

        let relevance = self.relevance.read().await;
        let materialized: Vec<SearchResult> = candidates
            .iter()
            .filter_map(|id| relevance.materialize_unscored(id))
            .collect();
        drop(relevance);

        let limit = request.limit.unwrap_or(self.limits.max_final_results);
        let results = paginate(materialized, request.offset, Some(limit));
        Ok(SearchResponse::success(SearchData {
            total_count: results.len(),
            results,
            execution_time_ms: elapsed_ms(started),
            layer_stats: LayerStats {
                layer1,
                ..LayerStats::default()
            },
            personalization_score: None,
        }))
    }

    /// Boolean retrieval over the lexical index (layer 1)
    pub async fn boolean_search(
        &self,
        query: &str,
        operator: BooleanOperator,
    ) -> Result<SearchResponse> {
        validate_query(query)?;
        let started = Instant::now();

        let ids = self.lexical.read().await.boolean_search(query, operator);
        let layer1 = LayerStat::new(ids.len(), elapsed_ms(started));

        let relevance = self.relevance.read().await;
        let results: Vec<SearchResult> = ids
            .iter()
            .filter_map(|id| relevance.materialize_unscored(id))
            .collect();
        drop(relevance);

        Ok(SearchResponse::success(SearchData {
            total_count: results.len(),
            results,
            execution_time_ms: elapsed_ms(started),
            layer_stats: LayerStats {
                layer1,
                ..LayerStats::default()
            },
            personalization_score: None,
        }))
    }

    /// Standalone semantic search over the whole vector store (layer 3)
    pub async fn semantic_search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        validate_query(query)?;
        self.semantic.ready().await.map_err(not_ready)?;
        self.semantic
            .semantic_search(query, limit)
            .await
            .map_err(|e| Error::coded(ErrorCode::SearchError, e))
    }

    /// Documents most similar to a stored one (layer 3)
    pub async fn find_similar(
        &self,
        document_id: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.semantic.ready().await.map_err(not_ready)?;
        self.semantic
            .find_similar(document_id, limit)
            .await
            .map_err(|e| Error::coded(ErrorCode::SearchError, e))
    }

    // =========================================================================
    // Corpus mutations
    // =========================================================================

    /// Add a document to every retrieval layer.
    ///
    /// The fan-out is atomic from the caller's point of view: if the
    /// semantic layer rejects the document, the lexical and relevance
    /// entries are rolled back before the error returns.
    #[instrument(skip_all, fields(id = %document.id))]
    pub async fn add_document(&self, mut document: Document) -> Result<()> {
        document
            .validate()
            .map_err(|e| Error::validation(flatten_validation(&e)))?;
        let now = Utc::now();
        document.created_at.get_or_insert(now);
        document.updated_at.get_or_insert(now);

        self.semantic.ready().await.map_err(not_ready)?;

        {
            let mut lexical = self.lexical.write().await;
            let mut relevance = self.relevance.write().await;
            lexical.add_document(document.clone());
            relevance.add_document(document.clone());
        }

        if let Err(e) = self.semantic.add_document(&document).await {
            warn!(id = %document.id, error = %e, "semantic indexing failed, rolling back");
            let mut lexical = self.lexical.write().await;
            let mut relevance = self.relevance.write().await;
            lexical.remove_document(&document.id);
            relevance.remove_document(&document.id);
            return Err(Error::coded(ErrorCode::AddDocumentError, e));
        }

        info!(id = %document.id, "document indexed");
        Ok(())
    }

    /// Add a batch of documents; stops at the first failure
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<usize> {
        let mut added = 0;
        for document in documents {
            self.add_document(document).await?;
            added += 1;
        }
        Ok(added)
    }

    /// Remove a document from every retrieval layer.
    ///
    /// Unknown ids are a not-found error; a partial removal indicates a
    /// broken cross-layer invariant and surfaces as a coded failure.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove_document(&self, id: &str) -> Result<()> {
        let (removed_lexical, removed_relevance) = {
            let mut lexical = self.lexical.write().await;
            let mut relevance = self.relevance.write().await;
            (lexical.remove_document(id), relevance.remove_document(id))
        };
        let removed_semantic = self.semantic.remove_document(id).await;

        if !removed_lexical && !removed_relevance && !removed_semantic {
            return Err(Error::not_found(format!("document '{}'", id)));
        }
        if !(removed_lexical && removed_relevance && removed_semantic) {
            return Err(Error::coded(
                ErrorCode::RemoveDocumentError,
                Error::internal(format!(
                    "document '{}' was only present in a subset of layers",
                    id
                )),
            ));
        }

        info!(id, "document removed");
        Ok(())
    }

    // =========================================================================
    // Personalization
    // =========================================================================

    /// Record a user behavior event (click, search, time_spent)
    pub async fn record_behavior(
        &self,
        user_id: &str,
        action: &str,
        data: &BehaviorData,
    ) -> Result<()> {
        if user_id.is_empty() {
            return Err(Error::validation("user_id cannot be empty"));
        }
        let action = UserAction::from_str(action)?;
        self.personalization
            .record_behavior(user_id, action, data)
            .await
    }

    /// Upsert profile fields for a user
    pub async fn update_user_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile> {
        if user_id.is_empty() {
            return Err(Error::validation("user_id cannot be empty"));
        }
        Ok(self.personalization.update_profile(user_id, update).await)
    }

    /// Snapshot a user profile
    pub async fn user_profile(&self, user_id: &str) -> Option<UserProfile> {
        self.personalization.profile(user_id).await
    }

    // =========================================================================
    // Observability
    // =========================================================================

    /// Statistics for every layer
    pub async fn stats(&self) -> EngineStats {
        EngineStats {
            layer1: self.lexical.read().await.stats(),
            layer2: self.relevance.read().await.stats(),
            layer3: self.semantic.stats().await,
            layer4: self.personalization.stats().await,
        }
    }

    /// Per-layer readiness
    pub async fn health(&self) -> HealthStatus {
        HealthStatus {
            layer1: true,
            layer2: true,
            layer3: self.semantic.is_ready(),
            layer4: true,
        }
    }
}

fn validate(request: &SearchRequest) -> Result<()> {
    request
        .validate()
        .map_err(|e| Error::validation(flatten_validation(&e)))
}

/// Readiness failures are their own error kind, carrying the
/// initialization code for the transport
fn not_ready(cause: Error) -> Error {
    Error::not_initialized(format!("embedding model is not ready: {}", cause))
}

fn validate_query(query: &str) -> Result<()> {
    if query.is_empty() || query.chars().count() > 500 {
        return Err(Error::validation("Query must be 1-500 characters"));
    }
    Ok(())
}

fn flatten_validation(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for '{}'", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn paginate(
    results: Vec<SearchResult>,
    offset: Option<usize>,
    limit: Option<usize>,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = match offset.unwrap_or(0) {
        0 => results,
        skip => results.into_iter().skip(skip).collect(),
    };
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    results
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
