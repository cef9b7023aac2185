//! Chord and key notation for chord sheets.
//!
//! Chords can be written as letter symbols (`Bb7`), roman numerals (`IV`),
//! scale-degree numbers (`#4`) or solfège (`Sol7`). This crate parses all
//! four, converts between them against a song key, transposes, normalizes
//! spelling and suffixes, and renders chords for a song's capo and style.
//!
//! ```rust
//! use chordsheet::{Chord, Key};
//!
//! let key: Key = "G".parse()?;
//! let chord = Chord::parse_or_fail("Em7")?;
//! assert_eq!(chord.to_numeral_string(Some(&key))?, "vi7");
//! # Ok::<(), chordsheet::ChordError>(())
//! ```

pub mod ast;
pub mod chord;
pub mod error;
pub mod key;
pub mod parser;
pub mod render;
pub mod song;
pub mod tables;

pub use ast::*;
pub use chord::{is_minor_suffix, Chord, ChordOverrides, NormalizeOptions};
pub use error::*;
pub use key::{Key, KeyFormat, Tonic};
pub use render::{
    chord_transpose_distance, get_capos, get_keys, render_chord, transpose_distance,
    RenderOptions,
};
pub use song::{Line, RawMetadata, Song};
