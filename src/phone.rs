//! The phone value type and the feature-weighted phonetic distance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PhoneticError, Result};
use crate::features::{
    Horizontal, Length, Manner, Nasalization, Place, Rounding, Secondary, SoundType, Vertical,
    Voice,
};

/// Number of attributes carried by a phone.
pub const N_FEATURES: usize = 10;

/// Maximum accumulated cost for two consonants (manner, place, voice, secondary, length).
const MAX_CONSONANT_COST: f64 = 5.0;
/// Maximum accumulated cost for two vowels (secondary, length, vertical,
/// horizontal, nasalization, rounding).
const MAX_VOWEL_COST: f64 = 6.0;

/// A single speech sound described by ten categorical features.
///
/// `Phone` is `Copy`: anything obtained from an IPA table is an independent
/// value, so overlaying diacritic features never touches the table entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Phone {
    pub sound_type: SoundType,
    pub manner: Manner,
    pub place: Place,
    pub voice: Voice,
    pub secondary: Secondary,
    pub length: Length,
    pub vertical: Vertical,
    pub horizontal: Horizontal,
    pub rounding: Rounding,
    pub nasalization: Nasalization,
}

impl Phone {
    /// Canonical feature order, shared by `codes`, table rows and feature headers.
    pub const FEATURE_NAMES: [&'static str; N_FEATURES] = [
        SoundType::FEATURE,
        Manner::FEATURE,
        Place::FEATURE,
        Voice::FEATURE,
        Secondary::FEATURE,
        Length::FEATURE,
        Vertical::FEATURE,
        Horizontal::FEATURE,
        Rounding::FEATURE,
        Nasalization::FEATURE,
    ];

    /// The all-empty phone: gap marker and placeholder for missing context.
    pub const EMPTY: Phone = Phone {
        sound_type: SoundType::Empty,
        manner: Manner::Empty,
        place: Place::Empty,
        voice: Voice::Empty,
        secondary: Secondary::Empty,
        length: Length::Empty,
        vertical: Vertical::Empty,
        horizontal: Horizontal::Empty,
        rounding: Rounding::Empty,
        nasalization: Nasalization::Empty,
    };

    /// Word-boundary sentinel that starts every word.
    pub const fn boundary() -> Self {
        Self::of_type(SoundType::WordBoundary)
    }

    pub const fn dot() -> Self {
        Self::of_type(SoundType::Dot)
    }

    const fn of_type(sound_type: SoundType) -> Self {
        let mut phone = Self::EMPTY;
        phone.sound_type = sound_type;
        phone
    }

    /// Build a consonant with normal length and no secondary articulation.
    pub fn consonant(manner: Manner, place: Place, voice: Voice) -> Self {
        Self {
            sound_type: SoundType::Consonant,
            manner,
            place,
            voice,
            length: Length::Normal,
            ..Self::EMPTY
        }
    }

    /// Build an oral vowel with normal length.
    pub fn vowel(vertical: Vertical, horizontal: Horizontal, rounding: Rounding) -> Self {
        Self {
            sound_type: SoundType::Vowel,
            length: Length::Normal,
            vertical,
            horizontal,
            rounding,
            nasalization: Nasalization::Oral,
            ..Self::EMPTY
        }
    }

    /// Decode a phone from its integer codes in canonical order.
    pub fn from_codes(codes: [u8; N_FEATURES]) -> Result<Self> {
        Ok(Self {
            sound_type: SoundType::from_code(codes[0])?,
            manner: Manner::from_code(codes[1])?,
            place: Place::from_code(codes[2])?,
            voice: Voice::from_code(codes[3])?,
            secondary: Secondary::from_code(codes[4])?,
            length: Length::from_code(codes[5])?,
            vertical: Vertical::from_code(codes[6])?,
            horizontal: Horizontal::from_code(codes[7])?,
            rounding: Rounding::from_code(codes[8])?,
            nasalization: Nasalization::from_code(codes[9])?,
        })
    }

    /// Like `from_codes`, but checks the arity of an arbitrary slice first.
    pub fn from_code_slice(codes: &[u8]) -> Result<Self> {
        let codes: [u8; N_FEATURES] =
            codes.try_into().map_err(|_| PhoneticError::CodeCount {
                expected: N_FEATURES,
                found: codes.len(),
            })?;
        Self::from_codes(codes)
    }

    /// Integer codes in canonical order.
    pub fn codes(&self) -> [u8; N_FEATURES] {
        [
            self.sound_type.code(),
            self.manner.code(),
            self.place.code(),
            self.voice.code(),
            self.secondary.code(),
            self.length.code(),
            self.vertical.code(),
            self.horizontal.code(),
            self.rounding.code(),
            self.nasalization.code(),
        ]
    }

    pub fn is_consonant(&self) -> bool {
        self.sound_type == SoundType::Consonant
    }

    pub fn is_vowel(&self) -> bool {
        self.sound_type == SoundType::Vowel
    }

    pub fn is_boundary(&self) -> bool {
        self.sound_type == SoundType::WordBoundary
    }

    pub fn is_dot(&self) -> bool {
        self.sound_type == SoundType::Dot
    }

    pub fn is_gap(&self) -> bool {
        self.sound_type == SoundType::Empty
    }

    /// Phonetic distance in `[0, 1]`: 0 for identical phones, 1 across sound types.
    ///
    /// Consonants are compared on manner, place, voice, secondary articulation
    /// and length; vowels on secondary articulation, length, height, backness,
    /// nasalization and rounding. Affricates get half credit against plosives
    /// and fricatives, and ordered scales (place, height, backness) get half
    /// credit when the codes are fewer than three steps apart. Other sound
    /// types only compare by type.
    pub fn distance(&self, other: &Phone) -> f64 {
        if self.sound_type != other.sound_type {
            return 1.0;
        }
        if self == other {
            return 0.0;
        }

        let mut cost = 0.0;
        let mut max_cost = 1.0;

        if self.is_consonant() {
            max_cost = MAX_CONSONANT_COST;
            if self.manner != other.manner {
                cost += manner_cost(self.manner, other.manner);
            }
            if self.place != other.place {
                cost += scale_cost(self.place.code(), other.place.code());
            }
            if self.voice != other.voice {
                cost += 1.0;
            }
        }

        if self.is_consonant() || self.is_vowel() {
            if self.secondary != other.secondary {
                cost += 1.0;
            }
            if self.length != other.length {
                cost += 1.0;
            }
        }

        if self.is_vowel() {
            max_cost = MAX_VOWEL_COST;
            if self.vertical != other.vertical {
                cost += scale_cost(self.vertical.code(), other.vertical.code());
            }
            if self.horizontal != other.horizontal {
                cost += scale_cost(self.horizontal.code(), other.horizontal.code());
            }
            if self.nasalization != other.nasalization {
                cost += 1.0;
            }
            if self.rounding != other.rounding {
                cost += 1.0;
            }
        }

        cost / max_cost
    }
}

/// Affricates sit between stops and fricatives.
fn manner_cost(a: Manner, b: Manner) -> f64 {
    match (a, b) {
        (Manner::Affricate, Manner::Plosive | Manner::Fricative)
        | (Manner::Plosive | Manner::Fricative, Manner::Affricate) => 0.5,
        _ => 1.0,
    }
}

/// Mismatch cost on an ordered articulatory scale.
fn scale_cost(a: u8, b: u8) -> f64 {
    if a.abs_diff(b) < 3 {
        0.5
    } else {
        1.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Phone({}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
            self.sound_type,
            self.manner,
            self.place,
            self.voice,
            self.secondary,
            self.length,
            self.vertical,
            self.horizontal,
            self.rounding,
            self.nasalization
        )
    }
}
