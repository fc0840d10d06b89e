//! IPA symbol table, tokenizer and diacritic overlay.
//!
//! The table maps base IPA symbols to phones. Lookups always hand out a copy,
//! and diacritics found in a symbol cluster are applied to that copy only.

use std::collections::BTreeSet;
use std::path::Path;

use ahash::AHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{PhoneticError, Result};
use crate::features::{
    Horizontal, Length, Manner, Nasalization, Place, Rounding, Secondary, SoundType, Vertical,
    Voice,
};
use crate::phone::{Phone, N_FEATURES};

/// Symbol table shipped with the crate.
const BUNDLED_TABLE: &str = include_str!("../data/ipa_numerical.csv");

/// Fields per table row: the symbol plus one column per feature.
const ROW_FIELDS: usize = N_FEATURES + 1;

pub const BOUNDARY_SYMBOL: &str = "#";
pub const GAP_SYMBOL: &str = "*";

const TIE_BAR: char = '\u{0361}';
const NON_SYLLABIC: char = '\u{032F}';
const NASALIZED: char = '\u{0303}';
const PALATALIZED: char = 'ʲ';
const LABIALIZED: char = 'ʷ';
const VELARIZED: char = 'ˠ';
const PHARYNGEALIZED: char = 'ˤ';
const LONG: char = 'ː';
const HALF_LONG: char = 'ˑ';

/// Spacing modifiers that belong to the preceding symbol.
const MODIFIERS: [char; 6] = [LONG, HALF_LONG, PALATALIZED, LABIALIZED, VELARIZED, PHARYNGEALIZED];

/// Characters stripped from raw transcriptions before tokenizing.
const NOISE: [char; 5] = ['\u{FEFF}', '|', 'ˈ', 'ˌ', '-'];

/// Lookup table from IPA symbols to phones
#[derive(Debug, Clone, Default)]
pub struct IpaTable {
    symbols: AHashMap<String, Phone>,
    /// Smallest symbol for each distinct phone, used for rendering.
    reverse: AHashMap<Phone, String>,
}

impl IpaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table bundled in `data/ipa_numerical.csv`.
    pub fn bundled() -> Result<Self> {
        Self::from_numerical_csv(BUNDLED_TABLE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_numerical_csv(&text)
    }

    /// Parse rows of `symbol,code × 10` in canonical feature order.
    pub fn from_numerical_csv(text: &str) -> Result<Self> {
        let mut table = Self::new();

        for row in rows(text) {
            let (line_no, fields) = row?;
            let mut codes = [0u8; N_FEATURES];
            for (code, field) in codes.iter_mut().zip(&fields[1..]) {
                *code = field.parse().map_err(|_| PhoneticError::MalformedRow {
                    line: line_no,
                    reason: format!("{field:?} is not a feature code"),
                })?;
            }
            table.insert(fields[0], Phone::from_codes(codes)?);
        }

        log::debug!("loaded {} IPA symbols", table.len());
        Ok(table)
    }

    /// Parse the labeled form: a header row, then `symbol,label × 10`.
    pub fn from_labeled_csv(text: &str) -> Result<Self> {
        let mut table = Self::new();

        // the first row is the column header
        for row in rows(text).skip(1) {
            let (line_no, fields) = row?;
            let phone = Phone {
                sound_type: fields[1].parse::<SoundType>()?,
                manner: fields[2].parse::<Manner>()?,
                place: fields[3].parse::<Place>()?,
                voice: fields[4].parse::<Voice>()?,
                secondary: fields[5].parse::<Secondary>()?,
                length: fields[6].parse::<Length>()?,
                vertical: fields[7].parse::<Vertical>()?,
                horizontal: fields[8].parse::<Horizontal>()?,
                rounding: fields[9].parse::<Rounding>()?,
                nasalization: fields[10].parse::<Nasalization>()?,
            };
            log::trace!("line {line_no}: {} -> {phone}", fields[0]);
            table.insert(fields[0], phone);
        }

        log::debug!("loaded {} labeled IPA symbols", table.len());
        Ok(table)
    }

    /// Write the numerical form, one row per symbol in symbol order.
    pub fn to_numerical_csv(&self) -> String {
        let mut symbols: Vec<_> = self.symbols.iter().collect();
        symbols.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = String::new();
        for (symbol, phone) in symbols {
            out.push_str(symbol);
            for code in phone.codes() {
                out.push(',');
                out.push_str(&code.to_string());
            }
            out.push('\n');
        }
        out
    }

    pub fn insert(&mut self, symbol: impl Into<String>, phone: Phone) {
        let symbol = symbol.into();
        match self.reverse.get(&phone) {
            Some(existing) if *existing <= symbol => {}
            _ => {
                self.reverse.insert(phone, symbol.clone());
            }
        }
        self.symbols.insert(symbol, phone);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    /// Copy of the phone stored for `symbol`.
    pub fn lookup(&self, symbol: &str) -> Result<Phone> {
        self.symbols
            .get(symbol)
            .copied()
            .ok_or_else(|| PhoneticError::UnknownSymbol(symbol.to_string()))
    }

    /// Resolve a symbol cluster such as `t͡ʃʲ` or `eˑ` to a phone.
    ///
    /// The longest prefix found in the table is the base; every remaining
    /// character must be a known diacritic, applied to the copy. A tie bar
    /// not covered by the table turns the base into an affricate and must be
    /// followed by a known release symbol. Anything else is an unknown symbol.
    pub fn to_phone(&self, cluster: &str) -> Result<Phone> {
        let (base, marks) = self.split_base(cluster)?;
        let mut phone = self.lookup(base)?;
        let unknown = || PhoneticError::UnknownSymbol(cluster.to_string());

        let mut marks = marks.chars();
        while let Some(mark) = marks.next() {
            match mark {
                TIE_BAR => {
                    phone.manner = Manner::Affricate;
                    let release = marks.next().ok_or_else(unknown)?;
                    if !self.contains(release.encode_utf8(&mut [0; 4])) {
                        return Err(unknown());
                    }
                }
                PALATALIZED => phone.secondary = Secondary::Palatalized,
                LABIALIZED => phone.secondary = Secondary::Labialized,
                VELARIZED => phone.secondary = Secondary::Velarized,
                PHARYNGEALIZED => phone.secondary = Secondary::Pharyngealized,
                NON_SYLLABIC => phone.secondary = Secondary::NonSyllabic,
                LONG => phone.length = Length::Long,
                HALF_LONG if phone.length != Length::Long => phone.length = Length::HalfLong,
                HALF_LONG => {}
                NASALIZED => phone.nasalization = Nasalization::Nasalized,
                _ => return Err(unknown()),
            }
        }

        Ok(phone)
    }

    /// Split a cluster into its longest table prefix and the trailing marks.
    fn split_base<'c>(&self, cluster: &'c str) -> Result<(&'c str, &'c str)> {
        cluster
            .char_indices()
            .map(|(idx, c)| idx + c.len_utf8())
            .rev()
            .map(|end| cluster.split_at(end))
            .find(|(base, _)| self.symbols.contains_key(*base))
            .ok_or_else(|| {
                let first = cluster.chars().next().map(String::from).unwrap_or_default();
                PhoneticError::UnknownSymbol(first)
            })
    }

    /// Resolve every cluster of an already tokenized word.
    pub fn phones<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Vec<Phone>> {
        symbols.iter().map(|s| self.to_phone(s.as_ref())).collect()
    }

    /// Clean, tokenize and resolve a raw transcription into a boundary-prefixed word.
    pub fn word(&self, ipa: &str) -> Result<Vec<Phone>> {
        let symbols = tokenize(&clean_ipa(ipa));
        let mut word = Vec::with_capacity(symbols.len() + 1);
        word.push(Phone::boundary());
        for symbol in &symbols {
            word.push(self.to_phone(symbol)?);
        }
        Ok(word)
    }

    /// Table symbol for a phone, if it has one.
    pub fn symbol(&self, phone: &Phone) -> Option<&str> {
        self.reverse.get(phone).map(String::as_str)
    }

    /// Render phones back to IPA. Phones with no spelling come out as `?`.
    pub fn render(&self, phones: &[Phone]) -> Vec<String> {
        phones.iter().map(|phone| self.render_phone(phone)).collect()
    }

    fn render_phone(&self, phone: &Phone) -> String {
        if let Some(symbol) = self.symbol(phone) {
            return symbol.to_string();
        }
        if phone.is_gap() {
            return GAP_SYMBOL.to_string();
        }
        if phone.is_boundary() {
            return BOUNDARY_SYMBOL.to_string();
        }
        self.compose(phone).unwrap_or_else(|| "?".to_string())
    }

    /// Spell an overlaid phone as base symbol plus diacritics.
    fn compose(&self, phone: &Phone) -> Option<String> {
        let mut base = *phone;
        base.secondary = Secondary::Empty;
        base.length = Length::Normal;
        if base.is_vowel() {
            base.nasalization = Nasalization::Oral;
        }

        let mut symbol = match self.symbol(&base) {
            Some(symbol) => symbol.to_string(),
            None if base.manner == Manner::Affricate => self.compose_affricate(&base)?,
            None => return None,
        };
        if phone.is_vowel() && phone.nasalization == Nasalization::Nasalized {
            symbol.push(NASALIZED);
        }
        match phone.secondary {
            Secondary::Palatalized => symbol.push(PALATALIZED),
            Secondary::Labialized => symbol.push(LABIALIZED),
            Secondary::Velarized => symbol.push(VELARIZED),
            Secondary::Pharyngealized => symbol.push(PHARYNGEALIZED),
            Secondary::NonSyllabic => symbol.push(NON_SYLLABIC),
            Secondary::Empty => {}
        }
        match phone.length {
            Length::Long => symbol.push(LONG),
            Length::HalfLong => symbol.push(HALF_LONG),
            _ => {}
        }
        Some(symbol)
    }

    /// Spell an affricate missing from the table as plosive, tie bar and
    /// the fricative at the same place and voicing.
    fn compose_affricate(&self, phone: &Phone) -> Option<String> {
        let stop = Phone::consonant(Manner::Plosive, phone.place, phone.voice);
        let release = Phone::consonant(Manner::Fricative, phone.place, phone.voice);
        let mut symbol = self.symbol(&stop)?.to_string();
        symbol.push(TIE_BAR);
        symbol.push_str(self.symbol(&release)?);
        Some(symbol)
    }
}

/// Non-empty lines split into fields, with 1-based line numbers and an arity check.
fn rows(text: &str) -> impl Iterator<Item = Result<(usize, Vec<&str>)>> + '_ {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_start_matches('\u{FEFF}').trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != ROW_FIELDS {
                return Err(PhoneticError::WrongArity {
                    line: line_no,
                    expected: ROW_FIELDS,
                    found: fields.len(),
                });
            }
            Ok((line_no, fields))
        })
}

/// Remove BOMs, whitespace, separators and stress marks from a transcription.
pub fn clean_ipa(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !NOISE.contains(c))
        .collect()
}

/// Distinct symbol clusters used across a word list, in sorted order.
pub fn inventory<'a, I>(words: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .flat_map(|word| tokenize(&clean_ipa(word)))
        .collect()
}

/// Split a transcription into symbol clusters.
///
/// Combining diacritics stay with their base (grapheme clusters), a tie bar
/// joins the following symbol, and length and secondary-articulation
/// modifiers attach to the preceding symbol.
pub fn tokenize(ipa: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for grapheme in ipa.graphemes(true) {
        if let Some(last) = symbols.last_mut() {
            let is_modifier = grapheme
                .chars()
                .next()
                .is_some_and(|c| MODIFIERS.contains(&c));
            if last.ends_with(TIE_BAR) || is_modifier {
                last.push_str(grapheme);
                continue;
            }
        }
        symbols.push(grapheme.to_string());
    }

    symbols
}
