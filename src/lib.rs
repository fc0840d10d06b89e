//! Cognate Core: phoneme-level alignment and phonologically weighted edit distance.
//!
//! Provides:
//! - Structured phones with a feature-weighted phonetic distance
//! - Needleman-Wunsch alignment of phone sequences
//! - Normalized edit distance for cognate detection and prediction scoring
//! - IPA tokenization, context feature extraction, and Python bindings
//!   (feature `python`)

pub mod cognates;
pub mod config;
pub mod contexts;
pub mod error;
pub mod features;
pub mod ipa;
pub mod phone;
pub mod phonetic;
pub mod types;

#[cfg(feature = "python")]
mod python;

pub use cognates::{mean_prediction_distance, sound_correspondences, CognateDetector};
pub use config::{CognateConfig, ScoringScheme};
pub use error::{PhoneticError, Result};
pub use ipa::{inventory, IpaTable};
pub use phone::Phone;
pub use phonetic::{align, align_with, aligned_distance, lev_distance, phone_distance};
pub use types::{Alignment, CognatePair, CognateSplit, EditOp, WordPair};
