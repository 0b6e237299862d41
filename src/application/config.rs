//! Per-layer result caps

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum result counts emitted by each cascade layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct LayerLimits {
    /// Candidate cap for the lexical filter
    #[serde(default = "default_layer1")]
    #[validate(range(min = 1))]
    pub max_results_layer1: usize,
    /// Result cap for the relevance scorer
    #[serde(default = "default_layer2")]
    #[validate(range(min = 1))]
    pub max_results_layer2: usize,
    /// Result cap for the semantic re-ranker
    #[serde(default = "default_layer3")]
    #[validate(range(min = 1))]
    pub max_results_layer3: usize,
    /// Final result cap after personalization
    #[serde(default = "default_final")]
    #[validate(range(min = 1))]
    pub max_final_results: usize,
}

fn default_layer1() -> usize {
    10_000
}

fn default_layer2() -> usize {
    1_000
}

fn default_layer3() -> usize {
    100
}

fn default_final() -> usize {
    20
}

impl Default for LayerLimits {
    fn default() -> Self {
        Self {
            max_results_layer1: default_layer1(),
            max_results_layer2: default_layer2(),
            max_results_layer3: default_layer3(),
            max_final_results: default_final(),
        }
    }
}
