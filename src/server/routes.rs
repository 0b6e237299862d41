//! Route table

use crate::application::SearchService;
use crate::server::handlers;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Caller-side deadline for a whole request; the cascade never blocks
/// mid-stage, so this only cuts off pathological inputs
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP router over a search service
pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/search", post(handlers::search))
        .route("/search/quick", post(handlers::quick_search))
        .route("/search/boolean", post(handlers::boolean_search))
        .route("/search/semantic", post(handlers::semantic_search))
        .route("/documents", post(handlers::add_document))
        .route("/documents/batch", post(handlers::add_documents))
        .route("/documents/{id}", delete(handlers::remove_document))
        .route("/documents/{id}/similar", get(handlers::find_similar))
        .route("/users/{id}/behavior", post(handlers::record_behavior))
        .route("/users/{id}/profile", put(handlers::update_profile))
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .with_state(service)
}
