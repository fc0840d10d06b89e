//! Context feature matrices for training external sound-change classifiers.
//!
//! Every position of an aligned word (after the leading boundary) becomes one
//! row: the feature codes of the phone itself and of seven context phones.

use ndarray::{concatenate, Array2, Axis};

use crate::error::{PhoneticError, Result};
use crate::phone::{Phone, N_FEATURES};
use crate::types::Alignment;

/// Context slots in column order.
pub const CONTEXTS: [&str; 8] = [
    "itself",
    "prevSound",
    "prevNonDot",
    "prevCons",
    "prevVowel",
    "prevOrSelfNonDot",
    "prevOrSelfCons",
    "prevOrSelfVowel",
];

/// Columns produced for one word.
pub const WORD_COLUMNS: usize = CONTEXTS.len() * N_FEATURES;

/// Context rows for a single aligned word whose first phone is the boundary.
pub fn word_contexts(word: &[Phone]) -> Array2<i32> {
    let Some((first, rest)) = word.split_first() else {
        return Array2::zeros((0, WORD_COLUMNS));
    };

    let mut matrix = Array2::<i32>::zeros((rest.len(), WORD_COLUMNS));
    let mut prev_sound = *first;
    let mut prev_non_dot = *first;
    let mut prev_cons = Phone::EMPTY;
    let mut prev_vowel = Phone::EMPTY;

    for (row, &itself) in rest.iter().enumerate() {
        let before = [itself, prev_sound, prev_non_dot, prev_cons, prev_vowel];

        if !itself.is_dot() {
            prev_non_dot = itself;
        }
        if itself.is_consonant() {
            prev_cons = itself;
        }
        if itself.is_vowel() {
            prev_vowel = itself;
        }
        let or_self = [prev_non_dot, prev_cons, prev_vowel];

        let codes = before
            .iter()
            .chain(or_self.iter())
            .flat_map(|phone| phone.codes());
        for (cell, code) in matrix.row_mut(row).iter_mut().zip(codes) {
            *cell = i32::from(code);
        }

        prev_sound = itself;
    }

    matrix
}

/// Source and target contexts side by side for one aligned pair.
pub fn pair_features(source: &[Phone], target: &[Phone]) -> Result<Array2<i32>> {
    if source.len() != target.len() {
        return Err(PhoneticError::LengthMismatch {
            left: source.len(),
            right: target.len(),
        });
    }

    let source_matrix = word_contexts(source);
    let target_matrix = word_contexts(target);
    Ok(concatenate(
        Axis(1),
        &[source_matrix.view(), target_matrix.view()],
    )?)
}

/// Stack the pair features of many alignments into one table.
pub fn feature_table<'a, I>(alignments: I) -> Result<Array2<i32>>
where
    I: IntoIterator<Item = &'a Alignment>,
{
    let blocks = alignments
        .into_iter()
        .map(|alignment| pair_features(&alignment.source, &alignment.target))
        .collect::<Result<Vec<_>>>()?;

    if blocks.is_empty() {
        return Ok(Array2::zeros((0, 2 * WORD_COLUMNS)));
    }

    let views: Vec<_> = blocks.iter().map(|block| block.view()).collect();
    let table = concatenate(Axis(0), &views)?;

    log::debug!("built feature table with {} rows", table.nrows());
    Ok(table)
}

/// Column names `{language}_{context}_{feature}` for a source/target pair.
pub fn header(languages: [&str; 2]) -> Vec<String> {
    languages
        .iter()
        .flat_map(|language| {
            CONTEXTS.iter().flat_map(move |context| {
                Phone::FEATURE_NAMES
                    .iter()
                    .map(move |feature| format!("{language}_{context}_{feature}"))
            })
        })
        .collect()
}
