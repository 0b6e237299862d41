//! Retrieval Engine Domain Model
//!
//! Defines the business entities flowing through the four-layer search
//! cascade: documents entering the corpus, search requests with optional
//! personalization context, ranked results, and the user profiles that
//! drive the final re-ranking layer.
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | A corpus entry indexed by every retrieval layer |
//! | [`SearchRequest`] | Validated query payload with optional user/context |
//! | [`SearchResult`] | Ranked result with score and diagnostic metadata |
//! | [`SearchResponse`] | Full cascade response including per-layer stats |
//!
//! ## Personalization Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`UserProfile`] | Preferences, behavior history and demographics |
//! | [`UserAction`] | Recorded behavior kind (click, search, time spent) |
//! | [`SearchContext`] | Request-scoped signals (location, device, session) |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// A document stored in the retrieval corpus
///
/// Each retrieval layer keeps its own view of the document: the lexical
/// index and the relevance scorer re-tokenize title and content, while the
/// semantic layer stores only an embedding plus a metadata snapshot.
///
/// # Example
///
/// ```rust
/// use cascade_search::domain::types::Document;
///
/// let doc = Document {
///     id: "d1".to_string(),
///     title: "Machine Learning".to_string(),
///     content: "algorithms that learn from data".to_string(),
///     url: None,
///     category: Some("technology".to_string()),
///     tags: vec!["ml".to_string()],
///     created_at: None,
///     updated_at: None,
///     metadata: serde_json::json!({}),
/// };
///
/// assert_eq!(doc.id, "d1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Document {
    /// Unique document identifier
    #[validate(length(min = 1, message = "Document id cannot be empty"))]
    pub id: String,
    /// Document title, tokenized together with the content
    #[validate(length(min = 1, message = "Document title cannot be empty"))]
    pub title: String,
    /// Document body
    #[validate(length(min = 1, message = "Document content cannot be empty"))]
    pub content: String,
    /// Optional canonical URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Optional category used by preference and temporal boosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Ordered tag list matched against user interests
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp; defaults to ingestion time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form metadata consumed by the personalization boost rules
    /// (`age_group`, `mobile_optimized`, `desktop_optimized`, `location`)
    #[serde(default = "default_metadata")]
    pub metadata: serde_json::Value,
}

fn default_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Geographic point attached to a search context
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Accepted for forward compatibility; currently has no effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// Request-scoped signals consumed by the personalization layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchContext {
    /// User position for the location boost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    /// Client-reported request time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Device kind ("mobile" or "desktop")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Session identifier; reserved, contributes no boost in this version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Queries issued earlier in the session
    #[serde(default)]
    pub previous_queries: Vec<String>,
}

/// Validated search request accepted by every query operation
///
/// # Example
///
/// ```rust
/// use cascade_search::domain::types::SearchRequest;
/// use validator::Validate;
///
/// let request = SearchRequest {
///     query: "neural networks".to_string(),
///     user_id: Some("u1".to_string()),
///     limit: Some(10),
///     offset: None,
///     filters: None,
///     context: None,
/// };
///
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct SearchRequest {
    /// Query text, 1 to 500 characters
    #[validate(length(min = 1, max = 500, message = "Query must be 1-500 characters"))]
    pub query: String,
    /// Identifier for profile-based personalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Final result count override, 1 to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100, message = "Limit must be 1-100"))]
    pub limit: Option<usize>,
    /// Pagination offset into the final result list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Free-form filters; accepted and echoed, not interpreted by the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Value>,
    /// Request context for contextual boosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SearchContext>,
}

impl SearchRequest {
    /// Build a minimal request carrying only a query string
    pub fn from_query<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            user_id: None,
            limit: None,
            offset: None,
            filters: None,
            context: None,
        }
    }
}

/// A ranked search result
///
/// The `metadata` object carries diagnostics accumulated through the
/// cascade: the per-term score breakdown from the relevance layer, the
/// vector similarity from the semantic layer, and the per-phase boost
/// values from the personalization layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Document identifier
    pub id: String,
    /// Document title
    pub title: String,
    /// Content excerpt, truncated to 200 characters
    pub content: String,
    /// Canonical URL when the document carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Final score at the layer that produced this result
    pub score: f64,
    /// Diagnostic metadata (score breakdown, boosts, document fields)
    pub metadata: serde_json::Value,
}

/// Candidate count and timing recorded for one cascade layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LayerStat {
    /// Results emitted by the layer
    pub candidates: usize,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: u64,
}

impl LayerStat {
    /// Stat entry for a layer that emitted `candidates` results
    pub fn new(candidates: usize, execution_time_ms: u64) -> Self {
        Self {
            candidates,
            execution_time_ms,
        }
    }
}

/// Per-layer observability for one query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LayerStats {
    /// Lexical candidate filter
    pub layer1: LayerStat,
    /// Probabilistic relevance scorer
    pub layer2: LayerStat,
    /// Semantic re-ranker
    pub layer3: LayerStat,
    /// Personalization re-ranker
    pub layer4: LayerStat,
}

/// Payload of a successful search response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchData {
    /// Final ranked results
    pub results: Vec<SearchResult>,
    /// Number of results after the final layer
    pub total_count: usize,
    /// End-to-end execution time in milliseconds
    pub execution_time_ms: u64,
    /// Per-layer candidate counts and timings
    pub layer_stats: LayerStats,
    /// Sum of the personalization weights that applied to this request,
    /// clamped to 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalization_score: Option<f64>,
}

/// Envelope returned by every search operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// Always true on the success path; failures surface as errors
    pub success: bool,
    /// Response payload
    pub data: SearchData,
}

impl SearchResponse {
    /// Wrap a payload in a success envelope
    pub fn success(data: SearchData) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Boolean retrieval operator for the lexical layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum BooleanOperator {
    /// Documents containing every query token
    And,
    /// Documents containing any query token
    Or,
    /// Documents containing none of the query tokens
    Not,
}

impl std::str::FromStr for BooleanOperator {
    type Err = crate::domain::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "NOT" => Ok(Self::Not),
            other => Err(crate::domain::error::Error::validation(format!(
                "Unknown boolean operator: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Not => write!(f, "NOT"),
        }
    }
}

/// Ranking function used by the relevance layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankingMethod {
    /// Okapi BM25 (default)
    #[default]
    Bm25,
    /// Classic TF-IDF
    TfIdf,
}

// =============================================================================
// User profiles and behavior
// =============================================================================

/// Explicit user preferences matched against document fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserPreferences {
    /// Preferred document categories
    #[serde(default)]
    pub categories: Vec<String>,
    /// Preferred content languages
    #[serde(default)]
    pub languages: Vec<String>,
    /// Preferred topics
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Bounded behavioral history for one user
///
/// Click history keeps at most the 100 most recent entries, search history
/// the 50 most recent; eviction is FIFO.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserBehavior {
    /// Recently clicked document ids, oldest first
    #[serde(default)]
    pub click_history: Vec<String>,
    /// Recently issued queries, oldest first
    #[serde(default)]
    pub search_history: Vec<String>,
    /// Accumulated dwell time per document id, in milliseconds
    #[serde(default)]
    pub time_spent: HashMap<String, u64>,
}

/// Optional demographic attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Demographics {
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Free-form location string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Interests matched against document tags
    #[serde(default)]
    pub interests: Vec<String>,
}

/// In-process user profile
///
/// Created lazily the first time behavior is recorded for a user and
/// mutated in place afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// User identifier
    pub user_id: String,
    /// Explicit preferences
    #[serde(default)]
    pub preferences: UserPreferences,
    /// Bounded behavioral history
    #[serde(default)]
    pub behavior: UserBehavior,
    /// Optional demographics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
    /// Last mutation timestamp
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh empty profile for a user id
    pub fn empty<S: Into<String>>(user_id: S, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            preferences: UserPreferences::default(),
            behavior: UserBehavior::default(),
            demographics: None,
            last_updated: now,
        }
    }
}

/// Partial profile for upserts; absent fields preserve existing values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProfileUpdate {
    /// Replacement preferences, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    /// Replacement demographics, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
}

/// Recorded behavior kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// A result was clicked
    Click,
    /// A query was issued
    Search,
    /// Dwell time was measured on a document
    TimeSpent,
}

impl std::str::FromStr for UserAction {
    type Err = crate::domain::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "search" => Ok(Self::Search),
            "time_spent" => Ok(Self::TimeSpent),
            other => Err(crate::domain::error::Error::validation(format!(
                "Unknown user action: {}",
                other
            ))),
        }
    }
}

/// Payload accompanying a recorded behavior event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BehaviorData {
    /// Target document for click and time-spent events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Query text for search events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Dwell time in milliseconds for time-spent events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
}

// =============================================================================
// Statistics and health
// =============================================================================

/// Aggregated statistics across all four layers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EngineStats {
    /// Lexical index statistics
    pub layer1: LexicalStats,
    /// Relevance corpus statistics
    pub layer2: CorpusStats,
    /// Vector store statistics
    pub layer3: VectorStoreStats,
    /// Profile store statistics
    pub layer4: ProfileStats,
}

/// Inverted-index statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LexicalStats {
    /// Documents currently indexed
    pub documents: usize,
    /// Distinct terms with live posting lists
    pub unique_terms: usize,
    /// Accepted tokens added over the index lifetime
    pub total_tokens: u64,
    /// Average accepted tokens per document
    pub avg_tokens_per_document: f64,
}

/// Relevance-corpus statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CorpusStats {
    /// Documents currently stored
    pub documents: usize,
    /// Average document length in accepted tokens
    pub avg_document_length: f64,
    /// Distinct terms with a non-zero document frequency
    pub unique_terms: usize,
}

/// Vector-store statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VectorStoreStats {
    /// Stored vectors
    pub vectors: usize,
    /// Embedding dimensionality, once the model has loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    /// Embedding model identifier
    pub model: String,
}

/// Profile-store statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProfileStats {
    /// User profiles currently held
    pub profiles: usize,
}

/// Per-layer readiness flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Lexical index availability
    pub layer1: bool,
    /// Relevance scorer availability
    pub layer2: bool,
    /// Semantic layer readiness (embedding model loaded)
    pub layer3: bool,
    /// Personalization layer availability
    pub layer4: bool,
}

impl HealthStatus {
    /// True when every layer reports ready
    pub fn healthy(&self) -> bool {
        self.layer1 && self.layer2 && self.layer3 && self.layer4
    }
}
