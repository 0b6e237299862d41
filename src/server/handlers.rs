//! Request handlers for every surface operation

use crate::application::SearchService;
use crate::domain::types::{
    BehaviorData, BooleanOperator, Document, EngineStats, HealthStatus, ProfileUpdate,
    SearchRequest, SearchResponse, SearchResult, UserProfile,
};
use crate::server::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Shared handler state
pub type AppState = Arc<SearchService>;

/// Generic success envelope for non-search payloads
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always true; failures go through [`ApiError`]
    pub success: bool,
    /// Response payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a success envelope
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Full four-layer cascade search
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    Ok(Json(state.search(&request).await?))
}

/// Lexical-only candidate search
pub async fn quick_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    Ok(Json(state.quick_search(&request).await?))
}

/// Boolean search payload
#[derive(Debug, Deserialize)]
pub struct BooleanSearchRequest {
    /// Query text
    pub query: String,
    /// AND, OR or NOT
    pub operator: String,
}

/// Boolean retrieval over the lexical index
pub async fn boolean_search(
    State(state): State<AppState>,
    Json(request): Json<BooleanSearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let operator = BooleanOperator::from_str(&request.operator)?;
    Ok(Json(state.boolean_search(&request.query, operator).await?))
}

/// Semantic search payload
#[derive(Debug, Deserialize)]
pub struct SemanticSearchRequest {
    /// Query text
    pub query: String,
    /// Result cap; defaults to 10
    #[serde(default = "default_semantic_limit")]
    pub limit: usize,
}

fn default_semantic_limit() -> usize {
    10
}

/// Standalone semantic search over the whole corpus
pub async fn semantic_search(
    State(state): State<AppState>,
    Json(request): Json<SemanticSearchRequest>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    let results = state.semantic_search(&request.query, request.limit).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// Query parameters for similarity lookup
#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    /// Result cap; defaults to 10
    #[serde(default = "default_semantic_limit")]
    pub limit: usize,
}

/// Documents most similar to a stored one
pub async fn find_similar(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    let results = state.find_similar(&document_id, params.limit).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// Index a single document
pub async fn add_document(
    State(state): State<AppState>,
    Json(document): Json<Document>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let id = document.id.clone();
    state.add_document(document).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({ "id": id }))))
}

/// Index a batch of documents
pub async fn add_documents(
    State(state): State<AppState>,
    Json(documents): Json<Vec<Document>>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let added = state.add_documents(documents).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "added": added }),
    )))
}

/// Remove a document from every layer
pub async fn remove_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.remove_document(&document_id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "removed": document_id }),
    )))
}

/// Behavior recording payload
#[derive(Debug, Deserialize)]
pub struct BehaviorRequest {
    /// Action kind: click, search or time_spent
    pub action: String,
    /// Action payload
    #[serde(default)]
    pub data: BehaviorData,
}

/// Record a user behavior event
pub async fn record_behavior(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<BehaviorRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state
        .record_behavior(&user_id, &request.action, &request.data)
        .await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "recorded": true }),
    )))
}

/// Upsert a user profile
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.update_user_profile(&user_id, update).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Per-layer statistics
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<EngineStats>> {
    Json(ApiResponse::success(state.stats().await))
}

/// Per-layer readiness flags
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(state.health().await))
}
