//! Phonologically weighted alignment and edit distance over phone sequences.

use ndarray::Array2;
use rayon::prelude::*;

use crate::config::ScoringScheme;
use crate::phone::Phone;
use crate::types::{Alignment, EditOp};

/// Tolerance for treating two DP scores as tied.
const SCORE_EPSILON: f64 = 1e-7;

/// Substitution cost between two phones, in `[0, 1]`.
pub fn phone_distance(a: &Phone, b: &Phone) -> f64 {
    a.distance(b)
}

/// Backpointer stored for each DP cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trace {
    Diagonal,
    /// Consume from the first sequence, gap in the second.
    Top,
    /// Consume from the second sequence, gap in the first.
    Left,
}

/// Global alignment of two words with the default scoring scheme.
pub fn align(word_a: &[Phone], word_b: &[Phone]) -> Alignment {
    align_with(word_a, word_b, &ScoringScheme::default())
}

/// Needleman-Wunsch global alignment of two words.
///
/// A leading word boundary on either input is set aside and one aligned
/// boundary pair is put in front of the result, so boundary-prefixed words
/// come back unchanged when aligned with themselves. The DP runs with the
/// shorter word first (the smaller one by phone order on equal lengths) and
/// the result is mirrored back, which makes `align(a, b)` the exact mirror
/// of `align(b, a)`. The reported score covers the words without the
/// boundary pair.
pub fn align_with(word_a: &[Phone], word_b: &[Phone], scheme: &ScoringScheme) -> Alignment {
    let body_a = strip_boundary(word_a);
    let body_b = strip_boundary(word_b);

    let swap = body_a.len() > body_b.len() || (body_a.len() == body_b.len() && body_a > body_b);
    if swap {
        needleman_wunsch(body_b, body_a, scheme).swapped()
    } else {
        needleman_wunsch(body_a, body_b, scheme)
    }
}

fn strip_boundary(word: &[Phone]) -> &[Phone] {
    match word.split_first() {
        Some((first, rest)) if first.is_boundary() => rest,
        _ => word,
    }
}

fn needleman_wunsch(word_a: &[Phone], word_b: &[Phone], scheme: &ScoringScheme) -> Alignment {
    let len_a = word_a.len();
    let len_b = word_b.len();

    let mut scores = Array2::<f64>::zeros((len_a + 1, len_b + 1));
    let mut traces = Array2::from_elem((len_a + 1, len_b + 1), Trace::Diagonal);

    // Initialize first column and row with cumulative gap penalties
    for i in 1..=len_a {
        scores[[i, 0]] = i as f64 * scheme.gap;
        traces[[i, 0]] = Trace::Top;
    }
    for j in 1..=len_b {
        scores[[0, j]] = j as f64 * scheme.gap;
        traces[[0, j]] = Trace::Left;
    }

    for (i, phone_a) in word_a.iter().enumerate() {
        for (j, phone_b) in word_b.iter().enumerate() {
            let top = scores[[i, j + 1]] + scheme.gap;
            let left = scores[[i + 1, j]] + scheme.gap;
            let diagonal = scores[[i, j]] + scheme.substitution(phone_a.distance(phone_b));

            let (best, trace) = best_move(top, left, diagonal);
            scores[[i + 1, j + 1]] = best;
            traces[[i + 1, j + 1]] = trace;
        }
    }

    // Backtrack from the bottom-right corner
    let mut i = len_a;
    let mut j = len_b;
    let mut aligned_a = Vec::with_capacity(len_a + len_b + 1);
    let mut aligned_b = Vec::with_capacity(len_a + len_b + 1);
    let mut operations = Vec::with_capacity(len_a + len_b + 1);

    while i > 0 || j > 0 {
        match traces[[i, j]] {
            Trace::Diagonal => {
                let (phone_a, phone_b) = (word_a[i - 1], word_b[j - 1]);
                operations.push(if phone_a == phone_b {
                    EditOp::Match
                } else {
                    EditOp::Substitute
                });
                aligned_a.push(phone_a);
                aligned_b.push(phone_b);
                i -= 1;
                j -= 1;
            }
            Trace::Left => {
                operations.push(EditOp::Insert);
                aligned_a.push(Phone::EMPTY);
                aligned_b.push(word_b[j - 1]);
                j -= 1;
            }
            Trace::Top => {
                operations.push(EditOp::Delete);
                aligned_a.push(word_a[i - 1]);
                aligned_b.push(Phone::EMPTY);
                i -= 1;
            }
        }
    }

    operations.push(EditOp::Match);
    aligned_a.push(Phone::boundary());
    aligned_b.push(Phone::boundary());

    // Reverse since we backtracked
    operations.reverse();
    aligned_a.reverse();
    aligned_b.reverse();

    let score = scores[[len_a, len_b]];
    log::trace!("aligned {len_a} x {len_b} phones, score {score}");

    Alignment::new(aligned_a, aligned_b, operations, score)
}

/// Pick the best predecessor. Ties go to the diagonal, then to the top.
fn best_move(top: f64, left: f64, diagonal: f64) -> (f64, Trace) {
    let best = top.max(left).max(diagonal);
    let trace = if (best - diagonal).abs() < SCORE_EPSILON {
        Trace::Diagonal
    } else if (best - top).abs() < SCORE_EPSILON {
        Trace::Top
    } else {
        Trace::Left
    };
    (best, trace)
}

/// Normalized edit distance with phonetic substitution costs.
///
/// Insertions and deletions cost 1, substitutions cost the phone distance.
/// The raw distance is divided by the length of the longer word. If the
/// shorter word is empty, the longer word's length is returned as is.
pub fn lev_distance(word_a: &[Phone], word_b: &[Phone]) -> f64 {
    let (long, short) = if word_a.len() < word_b.len() {
        (word_b, word_a)
    } else {
        (word_a, word_b)
    };

    if short.is_empty() {
        return long.len() as f64;
    }

    let mut prev_row: Vec<f64> = (0..=short.len()).map(|j| j as f64).collect();
    let mut curr_row = vec![0.0; short.len() + 1];

    for (i, phone_long) in long.iter().enumerate() {
        curr_row[0] = (i + 1) as f64;

        for (j, phone_short) in short.iter().enumerate() {
            curr_row[j + 1] = f64::min(
                f64::min(
                    curr_row[j] + 1.0,      // insertion
                    prev_row[j + 1] + 1.0,  // deletion
                ),
                prev_row[j] + phone_long.distance(phone_short), // substitution
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[short.len()] / long.len() as f64
}

/// Align two words, then score the aligned pair with `lev_distance`.
pub fn aligned_distance(
    word_a: &[Phone],
    word_b: &[Phone],
    scheme: &ScoringScheme,
) -> (Alignment, f64) {
    let alignment = align_with(word_a, word_b, scheme);
    let distance = lev_distance(&alignment.source, &alignment.target);
    (alignment, distance)
}

/// Batch compute normalized edit distances for multiple pairs (parallelized)
pub fn batch_lev_distance(pairs: &[(Vec<Phone>, Vec<Phone>)]) -> Vec<f64> {
    pairs
        .par_iter()
        .map(|(a, b)| lev_distance(a, b))
        .collect()
}

/// Batch align multiple pairs (parallelized)
pub fn batch_align(pairs: &[(Vec<Phone>, Vec<Phone>)], scheme: &ScoringScheme) -> Vec<Alignment> {
    pairs
        .par_iter()
        .map(|(a, b)| align_with(a, b, scheme))
        .collect()
}

/// Pairwise aligned-distance matrix for a batch of words
pub fn distance_matrix(words: &[Vec<Phone>], scheme: &ScoringScheme) -> Array2<f64> {
    let n = words.len();
    let mut matrix = Array2::<f64>::zeros((n, n));

    // Compute upper triangle (parallel)
    let pairs: Vec<_> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let distances: Vec<_> = pairs
        .par_iter()
        .map(|&(i, j)| aligned_distance(&words[i], &words[j], scheme).1)
        .collect();

    // Fill matrix (symmetric)
    for (&(i, j), &distance) in pairs.iter().zip(&distances) {
        matrix[[i, j]] = distance;
        matrix[[j, i]] = distance;
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipa::IpaTable;

    fn phones(table: &IpaTable, symbols: &[&str]) -> Vec<Phone> {
        table.phones(symbols).unwrap()
    }

    #[test]
    fn test_lev_distance_reference_values() {
        let table = IpaTable::bundled().unwrap();

        let ti = phones(&table, &["t", "i"]);
        let di = phones(&table, &["d", "i"]);
        let ai = phones(&table, &["a", "i"]);
        let at = phones(&table, &["a", "t"]);
        let ta = phones(&table, &["t", "a"]);

        // t/d differ only in voicing: 1/5, over two positions
        assert!((lev_distance(&ti, &di) - 0.1).abs() < 1e-9);
        assert_eq!(lev_distance(&ti, &ai), 0.5);
        assert_eq!(lev_distance(&at, &ta), 1.0);
    }

    #[test]
    fn test_lev_distance_empty() {
        let table = IpaTable::bundled().unwrap();
        let apa = phones(&table, &["a", "p", "a"]);

        assert_eq!(lev_distance(&apa, &[]), 3.0);
        assert_eq!(lev_distance(&[], &apa), 3.0);
        assert_eq!(lev_distance(&[], &[]), 0.0);
    }

    #[test]
    fn test_lev_distance_unequal_lengths_divides_by_longer() {
        let table = IpaTable::bundled().unwrap();
        let apa = phones(&table, &["a", "p", "a"]);
        let pa = phones(&table, &["p", "a"]);

        // one deletion over three phones, in either order
        assert!((lev_distance(&apa, &pa) - 1.0 / 3.0).abs() < 1e-9);
        assert!((lev_distance(&pa, &apa) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_align_prefers_leading_gap() {
        let table = IpaTable::bundled().unwrap();
        let alignment = align(
            &phones(&table, &["a", "p", "a"]),
            &phones(&table, &["p", "a"]),
        );

        assert_eq!(table.render(&alignment.source), vec!["#", "a", "p", "a"]);
        assert_eq!(table.render(&alignment.target), vec!["#", "*", "p", "a"]);
        assert_eq!(
            alignment.operations,
            vec![EditOp::Match, EditOp::Delete, EditOp::Match, EditOp::Match]
        );
        assert_eq!(alignment.score, 3.0);
    }

    #[test]
    fn test_align_identical_words() {
        let table = IpaTable::bundled().unwrap();
        let word = table.word("tʲɪt͡ʃʲeˑnʲijə").unwrap();
        let alignment = align(&word, &word);

        assert_eq!(alignment.source, word);
        assert_eq!(alignment.target, word);
        assert_eq!(alignment.gap_count(), 0);
    }

    #[test]
    fn test_align_against_empty() {
        let table = IpaTable::bundled().unwrap();
        let alignment = align(&phones(&table, &["a", "p", "a"]), &[]);

        assert_eq!(table.render(&alignment.source), vec!["#", "a", "p", "a"]);
        assert_eq!(table.render(&alignment.target), vec!["#", "*", "*", "*"]);
        assert_eq!(alignment.score, -3.0);

        let both_empty = align(&[], &[]);
        assert_eq!(both_empty.source, vec![Phone::boundary()]);
        assert_eq!(both_empty.target, vec![Phone::boundary()]);
    }

    #[test]
    fn test_align_is_mirror_symmetric() {
        let table = IpaTable::bundled().unwrap();
        let a = table.word("hɛɐ̯pst").unwrap();
        let b = table.word("høsːt").unwrap();
        let c = table.word("kata").unwrap();
        let d = table.word("taka").unwrap();

        for (x, y) in [(&a, &b), (&c, &d)] {
            let forward = align(x, y);
            let backward = align(y, x);
            assert_eq!(forward.source, backward.target);
            assert_eq!(forward.target, backward.source);
            assert_eq!(forward.score, backward.score);
        }
    }

    #[test]
    fn test_near_match_beats_gaps() {
        let table = IpaTable::bundled().unwrap();
        let alignment = align(&table.word("ta").unwrap(), &table.word("da").unwrap());

        assert_eq!(alignment.gap_count(), 0);
        assert_eq!(alignment.operations[1], EditOp::Substitute);
        assert!((alignment.score - 3.8).abs() < 1e-9);
    }

    #[test]
    fn test_best_move_tie_breaking() {
        assert_eq!(best_move(1.0, 1.0, 1.0).1, Trace::Diagonal);
        assert_eq!(best_move(1.0, 1.0, 1.0 - 1e-9).1, Trace::Diagonal);
        assert_eq!(best_move(1.0, 1.0, 0.0).1, Trace::Top);
        assert_eq!(best_move(0.0, 1.0, 0.0).1, Trace::Left);
    }

    #[test]
    fn test_distance_matrix() {
        let table = IpaTable::bundled().unwrap();
        let words: Vec<_> = ["pater", "patɛr", "mutːer"]
            .iter()
            .map(|w| table.word(w).unwrap())
            .collect();

        let matrix = distance_matrix(&words, &ScoringScheme::default());
        assert_eq!(matrix.shape(), &[3, 3]);
        assert_eq!(matrix[[0, 0]], 0.0);
        assert_eq!(matrix[[0, 1]], matrix[[1, 0]]);
        assert!(matrix[[0, 1]] < matrix[[0, 2]]);
    }

    #[test]
    fn test_batch_matches_single() {
        let table = IpaTable::bundled().unwrap();
        let pairs = vec![
            (table.word("pater").unwrap(), table.word("fader").unwrap()),
            (table.word("mater").unwrap(), table.word("mutːer").unwrap()),
        ];

        let distances = batch_lev_distance(&pairs);
        assert_eq!(distances[0], lev_distance(&pairs[0].0, &pairs[0].1));

        let alignments = batch_align(&pairs, &ScoringScheme::default());
        assert_eq!(alignments[1], align(&pairs[1].0, &pairs[1].1));
    }
}
