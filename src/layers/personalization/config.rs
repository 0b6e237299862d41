//! Personalization weight configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fixed weight applied to the location boost regardless of the
/// configured context weight
pub const LOCATION_WEIGHT: f64 = 0.1;

/// Weights scaling the three boost phases
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PersonalizationWeights {
    /// Scale of the user-profile boost (applies when a user id resolves)
    #[serde(default = "default_user_profile_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub user_profile_weight: f64,
    /// Scale of the contextual boost (applies when a context is supplied)
    #[serde(default = "default_context_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub context_weight: f64,
    /// Scale of the temporal boost (always applies)
    #[serde(default = "default_temporal_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub temporal_weight: f64,
}

fn default_user_profile_weight() -> f64 {
    0.3
}

fn default_context_weight() -> f64 {
    0.2
}

fn default_temporal_weight() -> f64 {
    0.1
}

impl Default for PersonalizationWeights {
    fn default() -> Self {
        Self {
            user_profile_weight: default_user_profile_weight(),
            context_weight: default_context_weight(),
            temporal_weight: default_temporal_weight(),
        }
    }
}

impl PersonalizationWeights {
    /// Sum of the weights applying to a request, clamped to 1.0: the
    /// temporal weight always, the profile weight when a user id is
    /// supplied, the context weight when a context is supplied.
    pub fn applied(&self, has_user: bool, has_context: bool) -> f64 {
        let mut total = self.temporal_weight;
        if has_user {
            total += self.user_profile_weight;
        }
        if has_context {
            total += self.context_weight;
        }
        total.min(1.0)
    }
}
