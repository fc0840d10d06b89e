//! Cognate detection over bilingual word pairs.

use ahash::AHashMap;
use rayon::prelude::*;

use crate::config::CognateConfig;
use crate::error::Result;
use crate::ipa::IpaTable;
use crate::phone::Phone;
use crate::phonetic::{aligned_distance, lev_distance};
use crate::types::{Alignment, CognatePair, CognateSplit, WordPair};

/// Aligns word pairs and splits them by normalized edit distance
pub struct CognateDetector<'a> {
    table: &'a IpaTable,
    config: CognateConfig,
}

impl<'a> CognateDetector<'a> {
    pub fn new(table: &'a IpaTable, config: CognateConfig) -> Self {
        Self { table, config }
    }

    pub fn config(&self) -> &CognateConfig {
        &self.config
    }

    /// Align one word pair and measure its normalized edit distance
    pub fn assess(&self, pair: &WordPair) -> Result<CognatePair> {
        let source = self.table.word(&pair.source)?;
        let target = self.table.word(&pair.target)?;
        let (alignment, distance) = aligned_distance(&source, &target, &self.config.scoring);

        log::trace!(
            "concept {}: {} / {} -> {distance:.3}",
            pair.concept_id,
            pair.source,
            pair.target
        );
        Ok(CognatePair::new(pair.concept_id, alignment, distance))
    }

    pub fn is_cognate(&self, pair: &CognatePair) -> bool {
        pair.distance.0 < self.config.threshold
    }

    /// Assess all pairs (parallelized) and split them at the threshold.
    ///
    /// The first pair that fails to resolve aborts the whole batch; input
    /// order is kept on both sides of the split.
    pub fn partition(&self, pairs: &[WordPair]) -> Result<CognateSplit> {
        let assessed = pairs
            .par_iter()
            .map(|pair| self.assess(pair))
            .collect::<Result<Vec<_>>>()?;

        let (cognates, non_cognates): (Vec<_>, Vec<_>) =
            assessed.into_iter().partition(|pair| self.is_cognate(pair));

        log::info!(
            "classified {} word pairs: {} cognates, {} non-cognates",
            pairs.len(),
            cognates.len(),
            non_cognates.len()
        );
        Ok(CognateSplit {
            cognates,
            non_cognates,
        })
    }
}

/// Extract sound correspondence patterns from multiple alignments.
///
/// Counts substituted phone pairs, most frequent first; equal counts are
/// ordered by the phones themselves.
pub fn sound_correspondences<'a, I>(alignments: I) -> Vec<(Phone, Phone, usize)>
where
    I: IntoIterator<Item = &'a Alignment>,
{
    let mut correspondence_counts: AHashMap<(Phone, Phone), usize> = AHashMap::new();

    for alignment in alignments {
        for correspondence in alignment.correspondences() {
            *correspondence_counts.entry(correspondence).or_insert(0) += 1;
        }
    }

    let mut correspondences: Vec<_> = correspondence_counts
        .into_iter()
        .map(|((a, b), count)| (a, b, count))
        .collect();

    // Sort by frequency
    correspondences.sort_by(|x, y| y.2.cmp(&x.2).then_with(|| (x.0, x.1).cmp(&(y.0, y.1))));

    correspondences
}

/// Average normalized edit distance between predicted and target words.
///
/// Returns `None` when there is nothing to score.
pub fn mean_prediction_distance(pairs: &[(Vec<Phone>, Vec<Phone>)]) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let total: f64 = pairs
        .par_iter()
        .map(|(predicted, target)| lev_distance(predicted, target))
        .sum();
    Some(total / pairs.len() as f64)
}
