//! Shared data structures for alignment and cognate detection.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::phone::Phone;

/// Edit operation for one column of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditOp {
    Match,
    Substitute,
    /// Gap in the source, real phone in the target.
    Insert,
    /// Real phone in the source, gap in the target.
    Delete,
}

impl EditOp {
    /// The same column seen from the other sequence's side.
    pub fn mirrored(self) -> Self {
        match self {
            EditOp::Insert => EditOp::Delete,
            EditOp::Delete => EditOp::Insert,
            op => op,
        }
    }
}

/// Result of a global phone alignment.
///
/// `source` and `target` have equal length, start with an aligned pair of
/// word-boundary phones and use `Phone::EMPTY` for gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub source: Vec<Phone>,
    pub target: Vec<Phone>,
    pub operations: Vec<EditOp>,
    pub score: f64,
}

impl Alignment {
    pub fn new(
        source: Vec<Phone>,
        target: Vec<Phone>,
        operations: Vec<EditOp>,
        score: f64,
    ) -> Self {
        Self {
            source,
            target,
            operations,
            score,
        }
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Aligned phone pairs, column by column.
    pub fn columns(&self) -> impl Iterator<Item = (&Phone, &Phone)> + '_ {
        self.source.iter().zip(self.target.iter())
    }

    pub fn gap_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, EditOp::Insert | EditOp::Delete))
            .count()
    }

    /// Extract sound correspondences (substituted phone pairs) from the alignment
    pub fn correspondences(&self) -> Vec<(Phone, Phone)> {
        self.operations
            .iter()
            .zip(self.columns())
            .filter(|(op, _)| **op == EditOp::Substitute)
            .map(|(_, (a, b))| (*a, *b))
            .collect()
    }

    /// Swap source and target.
    pub fn swapped(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            operations: self.operations.into_iter().map(EditOp::mirrored).collect(),
            score: self.score,
        }
    }

    pub fn into_pair(self) -> (Vec<Phone>, Vec<Phone>) {
        (self.source, self.target)
    }
}

/// One row of a bilingual word list: two IPA transcriptions of a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub concept_id: u32,
    pub source: String,
    pub target: String,
}

impl WordPair {
    pub fn new(concept_id: u32, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            concept_id,
            source: source.into(),
            target: target.into(),
        }
    }
}

/// An aligned word pair with its normalized edit distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognatePair {
    pub concept_id: u32,
    pub alignment: Alignment,
    pub distance: OrderedFloat<f64>,
}

impl CognatePair {
    pub fn new(concept_id: u32, alignment: Alignment, distance: f64) -> Self {
        Self {
            concept_id,
            alignment,
            distance: OrderedFloat(distance),
        }
    }
}

/// Word pairs split by the cognate threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CognateSplit {
    pub cognates: Vec<CognatePair>,
    pub non_cognates: Vec<CognatePair>,
}

impl CognateSplit {
    pub fn len(&self) -> usize {
        self.cognates.len() + self.non_cognates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alignments of the cognate side, for feature extraction or correspondences.
    pub fn cognate_alignments(&self) -> Vec<&Alignment> {
        self.cognates.iter().map(|pair| &pair.alignment).collect()
    }
}
