//! Closed category tables for the ten phonetic attributes of a phone.
//!
//! Every table reserves code 0 (`Empty`, label `""`) for "not applicable".
//! The remaining members are listed in code order; `Place`, `Vertical` and
//! `Horizontal` are ordered articulatory scales, so neighbouring codes are
//! phonetically close.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PhoneticError, Result};

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, $feature:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
            Serialize, Deserialize,
        )]
        #[repr(u8)]
        pub enum $name {
            #[default]
            Empty = 0,
            $($variant),+
        }

        impl $name {
            /// Feature name used in table headers and error messages.
            pub const FEATURE: &'static str = $feature;

            /// All members in code order.
            pub const ALL: &'static [$name] = &[$name::Empty, $($name::$variant),+];

            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn from_code(code: u8) -> Result<Self> {
                Self::ALL
                    .get(code as usize)
                    .copied()
                    .ok_or(PhoneticError::InvalidAttribute {
                        feature: $feature,
                        code,
                    })
            }

            pub fn label(self) -> &'static str {
                match self {
                    $name::Empty => "",
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = PhoneticError;

            fn from_str(label: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.label() == label)
                    .ok_or_else(|| PhoneticError::UnknownLabel {
                        feature: $feature,
                        label: label.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category! {
    /// Coarse class of a sound; a hard partition for distance purposes.
    SoundType, "sound_type" {
        Dot => "dot",
        WordBoundary => "word boundary",
        Consonant => "consonant",
        Vowel => "vowel",
    }
}

category! {
    /// Consonant manner of articulation.
    Manner, "manner" {
        Plosive => "plosive",
        Tap => "tap",
        Trill => "trill",
        Affricate => "affricate",
        Fricative => "fricative",
        LateralFricative => "lateral fricative",
        LateralApproximant => "lateral approximant",
        Approximant => "approximant",
        Nasal => "nasal",
    }
}

category! {
    /// Consonant place of articulation, from back to front.
    Place, "place" {
        Glottal => "glottal",
        Pharyngeal => "pharyngeal",
        Uvular => "uvular",
        Velar => "velar",
        Palatal => "palatal",
        Retroflex => "retroflex",
        AlveoloPalatal => "alveolo-palatal",
        Postalveolar => "postalveolar",
        Alveolar => "alveolar",
        Dental => "dental",
        Labiodental => "labiodental",
        Bilabial => "bilabial",
    }
}

category! {
    Voice, "voice" {
        Voiceless => "voiceless",
        Voiced => "voiced",
    }
}

category! {
    /// Secondary articulation, including the non-syllabic marker.
    Secondary, "secondary" {
        Pharyngealized => "pharyngealized",
        Velarized => "velarized",
        Palatalized => "palatalized",
        Labialized => "labialized",
        NonSyllabic => "non-syllabic",
    }
}

category! {
    Length, "length" {
        Normal => "normal",
        HalfLong => "half-long",
        Long => "long",
    }
}

category! {
    /// Vowel height, from open to close.
    Vertical, "vertical" {
        Open => "open",
        NearOpen => "near-open",
        OpenMid => "open-mid",
        Mid => "mid",
        CloseMid => "close-mid",
        NearClose => "near-close",
        Close => "close",
    }
}

category! {
    /// Vowel backness, from back to front.
    Horizontal, "horizontal" {
        Back => "back",
        NearBack => "near-back",
        Central => "central",
        NearFront => "near-front",
        Front => "front",
    }
}

category! {
    Rounding, "rounding" {
        Unrounded => "unrounded",
        Rounded => "rounded",
    }
}

category! {
    Nasalization, "nasalization" {
        Oral => "oral",
        Nasalized => "nasalized",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_table_order() {
        assert_eq!(SoundType::Empty.code(), 0);
        assert_eq!(SoundType::WordBoundary.code(), 2);
        assert_eq!(SoundType::Vowel.code(), 4);
        assert_eq!(Manner::Affricate.code(), 4);
        assert_eq!(Place::Bilabial.code(), 12);
        assert_eq!(Secondary::NonSyllabic.code(), 5);
        assert_eq!(Vertical::Close.code(), 7);
        assert_eq!(Horizontal::Front.code(), 5);

        for (code, member) in Place::ALL.iter().enumerate() {
            assert_eq!(member.code() as usize, code);
        }
    }

    #[test]
    fn test_from_code_range() {
        assert_eq!(Manner::from_code(9).unwrap(), Manner::Nasal);
        assert!(matches!(
            Manner::from_code(10),
            Err(PhoneticError::InvalidAttribute { feature: "manner", code: 10 })
        ));
        assert!(Nasalization::from_code(3).is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for member in Secondary::ALL {
            let parsed: Secondary = member.label().parse().unwrap();
            assert_eq!(parsed, *member);
        }
        assert_eq!("half-long".parse::<Length>().unwrap(), Length::HalfLong);
        assert_eq!("".parse::<Voice>().unwrap(), Voice::Empty);
        assert!("velar".parse::<Manner>().is_err());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(SoundType::WordBoundary.to_string(), "word boundary");
        assert_eq!(Place::AlveoloPalatal.to_string(), "alveolo-palatal");
    }
}
