//! # Error Types
//!
//! This module defines the single error type shared by the chord grammar, the
//! `Key`/`Chord` value model, song metadata loading and the render helpers.
//!
//! ## Error Kinds
//! - `Parse` - chord text the grammar could not read, with the byte position
//! - `InvalidKey` - a key token or key string with no meaning for its notation
//! - `MissingReferenceKey` - a relative conversion attempted without a key
//! - `InvalidReferenceKey` - a key that cannot serve as a tonic
//! - `MissingChordType` - raw base/modifier primitives without a notation
//! - `MixedChordTypes` - a root and bass in different notations
//! - `Metadata` - unreadable song metadata
//!
//! ## Usage
//! ```rust
//! use chordsheet::{Chord, ChordError};
//!
//! match Chord::parse_or_fail("H7") {
//!     Ok(chord) => println!("parsed {}", chord),
//!     Err(ChordError::Parse { position, message }) => {
//!         eprintln!("Not a chord (at {}): {}", position, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::ast::ChordType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordError {
    /// Chord text the grammar could not read.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChordError;
    /// let err = ChordError::Parse {
    ///     position: 0,
    ///     message: "expected a chord root".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at position 0: expected a chord root");
    /// ```
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A key token that has no mapping in the requested notation, or a key
    /// string that does not parse in any notation.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Converting between an absolute and a relative notation needs the tonic
    /// the relative notation is measured from.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::{ChordError, ChordType};
    /// let err = ChordError::MissingReferenceKey {
    ///     from: ChordType::Numeric,
    ///     to: ChordType::Symbol,
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Converting from number to symbol requires a reference key"
    /// );
    /// ```
    #[error("Converting from {from} to {to} requires a reference key")]
    MissingReferenceKey { from: ChordType, to: ChordType },

    /// A reference key that cannot anchor relative notation (numerals and
    /// numbers are themselves relative).
    #[error("Key {0} cannot be used as a reference key")]
    InvalidReferenceKey(String),

    #[error("Can't resolve a chord base without a chord type")]
    MissingChordType,

    #[error("Chord root is a {root} but its bass is a {bass}")]
    MixedChordTypes { root: ChordType, bass: ChordType },

    /// Invalid song metadata (YAML syntax or field values).
    #[error("Invalid metadata: {0}")]
    Metadata(String),
}
