//! Layer 4: personalization re-ranker
//!
//! Applies three independent multiplicative boosts to the Stage-3
//! scores, each expressed as a fraction of the incoming score and scaled
//! by a configured weight:
//!
//! - **User-profile boost** - preference, click, search-history, dwell
//!   time and demographic matches (requires a resolvable user id)
//! - **Contextual boost** - location proximity, device optimization and
//!   prior-query overlap (requires a request context)
//! - **Temporal boost** - hour-of-day / day-of-week category affinity and
//!   document recency (always applied)
//!
//! For an incoming score `s`, boost `b` and weight `w`, the adjusted
//! score is `s + s * b * w`. The layer also owns the in-process user
//! profile store with its bounded behavior histories.

/// Boost computation rules
pub mod boosts;
/// Personalization weight configuration
pub mod config;
/// In-process user profile store
pub mod profiles;

pub use config::PersonalizationWeights;
pub use profiles::ProfileStore;

use crate::domain::error::Result;
use crate::domain::types::{
    BehaviorData, ProfileStats, ProfileUpdate, SearchContext, SearchResult, UserAction,
    UserProfile,
};
use chrono::{DateTime, Utc};

/// Personalized results with the applied weight total for the request
#[derive(Debug, Clone)]
pub struct PersonalizedOutcome {
    /// Results re-sorted by adjusted score, truncated to the caller's bound
    pub results: Vec<SearchResult>,
    /// Sum of the weights that applied to this request, clamped to 1.0
    pub personalization_score: f64,
}

/// Personalization re-ranker and profile store
pub struct PersonalizationLayer {
    profiles: ProfileStore,
    weights: PersonalizationWeights,
}

impl PersonalizationLayer {
    /// Create the layer with the given weights
    pub fn new(weights: PersonalizationWeights) -> Self {
        Self {
            profiles: ProfileStore::new(),
            weights,
        }
    }

    /// The configured boost weights
    pub fn weights(&self) -> &PersonalizationWeights {
        &self.weights
    }

    /// Apply the boost pipeline: user profile, then context, then
    /// temporal signals; re-sort and truncate to `final_limit`.
    ///
    /// The caller owns the bound so a request limit above the configured
    /// final cap widens the window instead of being swallowed here.
    /// `now` anchors the temporal rules; callers pass the request
    /// timestamp when the context carries one.
    pub async fn rerank(
        &self,
        results: Vec<SearchResult>,
        user_id: Option<&str>,
        context: Option<&SearchContext>,
        now: DateTime<Utc>,
        final_limit: usize,
    ) -> PersonalizedOutcome {
        let profile = match user_id {
            Some(id) => self.profiles.get(id).await,
            None => None,
        };

        let mut adjusted: Vec<SearchResult> = results
            .into_iter()
            .map(|mut result| {
                let profile_boost = profile
                    .as_ref()
                    .map(|p| boosts::profile_boost(p, &result))
                    .unwrap_or(0.0);
                let (location_boost, context_boost) = context
                    .map(|c| boosts::context_boost(c, &result))
                    .unwrap_or((0.0, 0.0));
                let temporal_boost = boosts::temporal_boost(&result, now);

                let mut score = result.score;
                if profile.is_some() {
                    score += score * profile_boost * self.weights.user_profile_weight;
                }
                if context.is_some() {
                    let base = score;
                    score += base * context_boost * self.weights.context_weight;
                    score += base * location_boost * config::LOCATION_WEIGHT;
                }
                score += score * temporal_boost * self.weights.temporal_weight;
                result.score = score;

                if let serde_json::Value::Object(metadata) = &mut result.metadata {
                    metadata.insert(
                        "personalization_boost".into(),
                        serde_json::json!(profile_boost),
                    );
                    metadata.insert(
                        "context_boost".into(),
                        serde_json::json!(location_boost + context_boost),
                    );
                    metadata.insert("temporal_boost".into(), serde_json::json!(temporal_boost));
                }
                result
            })
            .collect();

        adjusted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        adjusted.truncate(final_limit);

        PersonalizedOutcome {
            results: adjusted,
            personalization_score: self.weights.applied(user_id.is_some(), context.is_some()),
        }
    }

    /// Record a behavior event, creating the profile lazily
    pub async fn record_behavior(
        &self,
        user_id: &str,
        action: UserAction,
        data: &BehaviorData,
    ) -> Result<()> {
        self.profiles
            .record(user_id, action, data, Utc::now())
            .await
    }

    /// Upsert profile fields, preserving anything absent from the update
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> UserProfile {
        self.profiles.upsert(user_id, update, Utc::now()).await
    }

    /// Fetch a profile snapshot
    pub async fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).await
    }

    /// Profile-store statistics
    pub async fn stats(&self) -> ProfileStats {
        self.profiles.stats().await
    }
}
