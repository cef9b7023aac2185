//! # Chord Syntax Types
//!
//! The small vocabulary shared by the chord grammar and the value model.
//!
//! ```text
//! ChordAst
//!   ├── base / modifier          root token as written (e.g. "A", "#", "IV", "Sol")
//!   ├── suffix                   quality/extension text (e.g. "sus4", "m7")
//!   ├── bass_base / bass_modifier
//!   └── chord_type               which of the four notations the tokens use
//! ```
//!
//! ## Notations
//! - `Symbol` - absolute letter names: `C`, `F#`, `Bb`
//! - `Numeral` - roman scale degrees, lowercase when minor: `IV`, `#iv`, `bVII`
//! - `Numeric` - arabic scale degrees: `4`, `#4`, `b7`
//! - `Solfege` - syllables: `Do`, `Fa#`, `Sib`
//!
//! Numerals, numbers and solfège are read relative to a tonic; symbols are not.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ChordError;

/// One of the four notations a key or chord can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordType {
    Symbol,
    Numeral,
    #[serde(rename = "number")]
    Numeric,
    Solfege,
}

impl ChordType {
    pub const ALL: [ChordType; 4] = [
        ChordType::Symbol,
        ChordType::Numeral,
        ChordType::Numeric,
        ChordType::Solfege,
    ];

    /// Whether this notation only has meaning relative to a tonic
    pub fn is_relative(self) -> bool {
        match self {
            ChordType::Symbol => false,
            ChordType::Numeral | ChordType::Numeric | ChordType::Solfege => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChordType::Symbol => "symbol",
            ChordType::Numeral => "numeral",
            ChordType::Numeric => "number",
            ChordType::Solfege => "solfege",
        }
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChordType {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "symbol" => Ok(ChordType::Symbol),
            "numeral" => Ok(ChordType::Numeral),
            "number" | "numeric" => Ok(ChordType::Numeric),
            "solfege" => Ok(ChordType::Solfege),
            other => Err(ChordError::Metadata(format!("unknown chord style '{}'", other))),
        }
    }
}

/// Accidental attached to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    Sharp,
    Flat,
    #[default]
    Natural,
}

impl Modifier {
    /// Semitone offset applied to the natural step
    pub fn offset(self) -> i32 {
        match self {
            Modifier::Sharp => 1,
            Modifier::Flat => -1,
            Modifier::Natural => 0,
        }
    }

    /// Read a single accidental character: `#`, `b`, `♯` or `♭`
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' | '♯' => Some(Modifier::Sharp),
            'b' | '♭' => Some(Modifier::Flat),
            _ => None,
        }
    }

    pub fn render(self, use_unicode: bool) -> &'static str {
        match (self, use_unicode) {
            (Modifier::Sharp, false) => "#",
            (Modifier::Sharp, true) => "♯",
            (Modifier::Flat, false) => "b",
            (Modifier::Flat, true) => "♭",
            (Modifier::Natural, _) => "",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(false))
    }
}

impl FromStr for Modifier {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Modifier::Natural),
            (Some(c), None) => Modifier::from_char(c)
                .ok_or_else(|| ChordError::InvalidKey(format!("unknown modifier '{}'", s))),
            _ => Err(ChordError::InvalidKey(format!("unknown modifier '{}'", s))),
        }
    }
}

/// Chord as read by the grammar, before key resolution.
/// Any subset of the fields may be absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChordAst {
    pub base: Option<String>,
    pub modifier: Option<Modifier>,
    pub suffix: Option<String>,
    pub bass_base: Option<String>,
    pub bass_modifier: Option<Modifier>,
    pub chord_type: Option<ChordType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_type_names() {
        assert_eq!(ChordType::Numeric.to_string(), "number");
        assert_eq!("number".parse::<ChordType>().unwrap(), ChordType::Numeric);
        assert_eq!("solfege".parse::<ChordType>().unwrap(), ChordType::Solfege);
        assert!("tab".parse::<ChordType>().is_err());
    }

    #[test]
    fn test_chord_type_deserializes_metadata_names() {
        let style: ChordType = serde_yaml::from_str("number").unwrap();
        assert_eq!(style, ChordType::Numeric);
        let style: ChordType = serde_yaml::from_str("numeral").unwrap();
        assert_eq!(style, ChordType::Numeral);
    }

    #[test]
    fn test_only_symbols_are_absolute() {
        assert!(!ChordType::Symbol.is_relative());
        assert!(ChordType::Numeral.is_relative());
        assert!(ChordType::Numeric.is_relative());
        assert!(ChordType::Solfege.is_relative());
    }

    #[test]
    fn test_modifier_rendering() {
        assert_eq!(Modifier::Sharp.render(false), "#");
        assert_eq!(Modifier::Flat.render(true), "♭");
        assert_eq!(Modifier::Natural.render(true), "");
        assert_eq!(Modifier::from_char('♯'), Some(Modifier::Sharp));
        assert_eq!("b".parse::<Modifier>().unwrap(), Modifier::Flat);
        assert_eq!("".parse::<Modifier>().unwrap(), Modifier::Natural);
        assert!("x".parse::<Modifier>().is_err());
    }
}
