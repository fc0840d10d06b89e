//! Scoring and classification settings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Transition scores for the Needleman-Wunsch aligner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringScheme {
    /// Score delta for an insertion or deletion.
    pub gap: f64,
    /// A perfect match scores this much; near matches score `match_reward - distance`.
    pub match_reward: f64,
    /// Phones at or beyond this distance are treated as mismatches.
    pub similarity_cutoff: f64,
    pub mismatch: f64,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            gap: -1.0,
            match_reward: 2.0,
            similarity_cutoff: 0.5,
            mismatch: -1.0,
        }
    }
}

impl ScoringScheme {
    /// Score delta for aligning two phones at the given phonetic distance.
    pub fn substitution(&self, distance: f64) -> f64 {
        if distance < self.similarity_cutoff {
            self.match_reward - distance
        } else {
            self.mismatch
        }
    }
}

/// Settings for cognate classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CognateConfig {
    /// Word pairs with a normalized distance strictly below this are cognates.
    pub threshold: f64,
    pub scoring: ScoringScheme,
}

impl Default for CognateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            scoring: ScoringScheme::default(),
        }
    }
}

impl CognateConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
