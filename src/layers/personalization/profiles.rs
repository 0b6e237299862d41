//! In-process user profile store
//!
//! Profiles are created lazily the first time behavior is recorded and
//! mutated in place afterwards. Histories are bounded with FIFO
//! eviction: at most 100 clicked documents and 50 recorded queries per
//! user.

use crate::domain::error::{Error, Result};
use crate::domain::types::{BehaviorData, ProfileStats, ProfileUpdate, UserAction, UserProfile};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Maximum retained clicked document ids per user
pub const CLICK_HISTORY_CAP: usize = 100;
/// Maximum retained queries per user
pub const SEARCH_HISTORY_CAP: usize = 50;

/// Concurrent map of user id to profile.
///
/// A single writer lock serializes concurrent updates for the same user.
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl ProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Record one behavior event for a user, creating an empty profile
    /// when none exists yet.
    pub async fn record(
        &self,
        user_id: &str,
        action: UserAction,
        data: &BehaviorData,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::empty(user_id, now));

        match action {
            UserAction::Click => {
                let document_id = data
                    .document_id
                    .as_deref()
                    .ok_or_else(|| Error::validation("click events require a document_id"))?;
                let history = &mut profile.behavior.click_history;
                if !history.iter().any(|id| id.as_str() == document_id) {
                    history.push(document_id.to_string());
                }
                trim_front(history, CLICK_HISTORY_CAP);
            }
            UserAction::Search => {
                let query = data
                    .query
                    .as_deref()
                    .ok_or_else(|| Error::validation("search events require a query"))?;
                profile.behavior.search_history.push(query.to_string());
                trim_front(&mut profile.behavior.search_history, SEARCH_HISTORY_CAP);
            }
            UserAction::TimeSpent => {
                let document_id = data
                    .document_id
                    .as_deref()
                    .ok_or_else(|| Error::validation("time_spent events require a document_id"))?;
                let millis = data
                    .time_spent
                    .ok_or_else(|| Error::validation("time_spent events require a duration"))?;
                *profile
                    .behavior
                    .time_spent
                    .entry(document_id.to_string())
                    .or_insert(0) += millis;
            }
        }

        profile.last_updated = now;
        debug!(user_id, ?action, "recorded user behavior");
        Ok(())
    }

    /// Upsert profile fields. Fields absent from the update keep their
    /// current values; a missing profile is created first.
    pub async fn upsert(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> UserProfile {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::empty(user_id, now));

        if let Some(preferences) = update.preferences {
            profile.preferences = preferences;
        }
        if let Some(demographics) = update.demographics {
            profile.demographics = Some(demographics);
        }
        profile.last_updated = now;
        profile.clone()
    }

    /// Snapshot a profile by user id
    pub async fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.read().await.get(user_id).cloned()
    }

    /// Store statistics
    pub async fn stats(&self) -> ProfileStats {
        ProfileStats {
            profiles: self.profiles.read().await.len(),
        }
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop oldest entries until the history fits its cap
fn trim_front(history: &mut Vec<String>, cap: usize) {
    if history.len() > cap {
        let excess = history.len() - cap;
        history.drain(..excess);
    }
}
