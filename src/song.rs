//! # Song Context
//!
//! The parts of a song and of a line that chord rendering reads: the song
//! key, capo and chord style, and a line's local key and transpose key.
//!
//! Song metadata is read from YAML (the same keys a chord sheet's header
//! uses) into a raw struct and then checked field by field.
//!
//! ## Example
//! ```rust
//! use chordsheet::{ChordType, Song};
//!
//! let song = Song::from_yaml(r#"
//! key: G
//! capo: 2
//! chord-style: numeral
//! "#)?;
//!
//! assert_eq!(song.key.as_ref().map(|k| k.to_string()), Some("G".to_string()));
//! assert_eq!(song.capo, Some(2));
//! assert_eq!(song.chord_style, Some(ChordType::Numeral));
//! # Ok::<(), chordsheet::ChordError>(())
//! ```

use serde::Deserialize;

use crate::ast::ChordType;
use crate::error::ChordError;
use crate::key::Key;

/// Metadata as written, before validation
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawMetadata {
    pub title: Option<String>,
    pub key: Option<String>,
    pub capo: Option<String>, // "2" or 2
    pub chord_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    pub title: Option<String>,
    pub key: Option<Key>,
    pub capo: Option<i32>,
    /// Notation chords are rendered in; `None` leaves them as written
    pub chord_style: Option<ChordType>,
}

/// Per-line overrides set by directives inside the song body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub key: Option<Key>,
    /// Target key (`D`) or a plain semitone count (`2`)
    pub transpose_key: Option<String>,
}

impl Song {
    pub fn from_yaml(content: &str) -> Result<Self, ChordError> {
        let raw: RawMetadata =
            serde_yaml::from_str(content).map_err(|e| ChordError::Metadata(e.to_string()))?;
        Self::from_metadata(raw)
    }

    pub fn from_metadata(raw: RawMetadata) -> Result<Self, ChordError> {
        let key = match &raw.key {
            Some(key) => Some(
                key.parse::<Key>()
                    .map_err(|_| ChordError::Metadata(format!("Invalid key: {}", key)))?,
            ),
            None => None,
        };

        let capo = match &raw.capo {
            Some(capo) => Some(
                capo.trim()
                    .parse::<i32>()
                    .map_err(|_| ChordError::Metadata(format!("Invalid capo: {}", capo)))?,
            ),
            None => None,
        };

        let chord_style = match &raw.chord_style {
            Some(style) => Some(style.parse::<ChordType>()?),
            None => None,
        };

        Ok(Self {
            title: raw.title,
            key,
            capo,
            chord_style,
        })
    }
}

impl Line {
    pub fn with_key(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Default::default()
        }
    }

    pub fn with_transpose_key(transpose_key: impl Into<String>) -> Self {
        Self {
            transpose_key: Some(transpose_key.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_metadata() {
        let song = Song::from_yaml(
            r#"
title: Amazing Grace
key: Bb
capo: "3"
chord-style: solfege
"#,
        )
        .unwrap();
        assert_eq!(song.title.as_deref(), Some("Amazing Grace"));
        assert_eq!(song.key, Some("A#".parse().unwrap()));
        assert_eq!(song.capo, Some(3));
        assert_eq!(song.chord_style, Some(ChordType::Solfege));
    }

    #[test]
    fn test_empty_metadata() {
        let song = Song::from_yaml("{}").unwrap();
        assert_eq!(song, Song::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Song::from_yaml("key: H"),
            Err(ChordError::Metadata(_))
        ));
        assert!(matches!(
            Song::from_yaml("capo: two"),
            Err(ChordError::Metadata(_))
        ));
        assert!(matches!(
            Song::from_yaml("chord-style: tab"),
            Err(ChordError::Metadata(_))
        ));
        assert!(matches!(
            Song::from_yaml("key: [C"),
            Err(ChordError::Metadata(_))
        ));
    }

    #[test]
    fn test_line_constructors() {
        let line = Line::with_transpose_key("2");
        assert_eq!(line.transpose_key.as_deref(), Some("2"));
        assert_eq!(line.key, None);
        let line = Line::with_key("Em".parse().unwrap());
        assert!(line.key.unwrap().is_minor());
    }
}
