//! # Chord Grammar
//!
//! Reads a single chord token into a [`ChordAst`].
//!
//! ## Grammar
//! ```text
//! chord    := root suffix? ('/' bass)?
//! root     := solfege | symbol | numeric | numeral
//! solfege  := ('Do' | 'Re' | 'Mi' | 'Fa' | 'Sol' | 'La' | 'Si') modifier?
//! symbol   := [A-G] modifier?
//! numeric  := modifier? [1-7]
//! numeral  := modifier? ('I' | 'II' | ... | 'VII' | 'i' | ... | 'vii')
//! modifier := '#' | 'b' | '♯' | '♭'
//! suffix   := [letters digits # b + - ( ) ° ø ^ Δ , . ' *]+
//! bass     := root, in the same notation as the chord root
//! ```
//!
//! Solfège syllables are matched before letters, so `Do7` is Do with a `7`
//! suffix rather than D with `o7`.
//!
//! ## Entry Point
//! `parse(text: &str) -> Result<ChordAst, ChordError>`
//!
//! ## Example
//! ```rust
//! use chordsheet::{parser, ChordType, Modifier};
//!
//! let ast = parser::parse("Ebmaj7/G").unwrap();
//! assert_eq!(ast.base.as_deref(), Some("E"));
//! assert_eq!(ast.modifier, Some(Modifier::Flat));
//! assert_eq!(ast.suffix.as_deref(), Some("maj7"));
//! assert_eq!(ast.bass_base.as_deref(), Some("G"));
//! assert_eq!(ast.chord_type, Some(ChordType::Symbol));
//! ```

use crate::ast::{ChordAst, ChordType, Modifier};
use crate::error::ChordError;
use crate::tables::{NUMERALS, SOLFEGE};

const SUFFIX_SYMBOLS: &str = "#+-()°ø^Δ,.'*♯♭";

// Suffixes that make a letter chord look like a solfège syllable
const LETTER_SUFFIXES: [&str; 2] = ["add", "aug"];

/// Root or bass token as read from the input
struct Note {
    base: String,
    modifier: Option<Modifier>,
    chord_type: ChordType,
}

/// Cursor over one chord token
struct Scanner<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, message: impl Into<String>) -> ChordError {
        ChordError::Parse {
            position: self.position,
            message: message.into(),
        }
    }

    fn modifier(&mut self) -> Option<Modifier> {
        let modifier = self.peek().and_then(Modifier::from_char)?;
        self.advance();
        Some(modifier)
    }

    fn solfege(&mut self) -> Option<String> {
        let rest = self.rest();
        // "Fadd9" and "Faug" are F chords, not Fa
        if LETTER_SUFFIXES.iter().any(|s| rest.get(1..).is_some_and(|r| r.starts_with(s))) {
            return None;
        }

        // Longest syllable first so "Sol" is not read as "So" + "l"
        let mut syllables = SOLFEGE;
        syllables.sort_by_key(|s| std::cmp::Reverse(s.len()));
        let syllable = syllables.iter().find(|s| rest.starts_with(**s))?;
        self.position += syllable.len();
        Some(syllable.to_string())
    }

    fn letter(&mut self) -> Option<String> {
        match self.peek() {
            Some(c @ 'A'..='G') => {
                self.advance();
                Some(c.to_string())
            }
            _ => None,
        }
    }

    fn degree(&mut self) -> Option<String> {
        match self.peek() {
            Some(c @ '1'..='7') => {
                self.advance();
                Some(c.to_string())
            }
            _ => None,
        }
    }

    fn numeral(&mut self) -> Result<Option<String>, ChordError> {
        let start = self.position;
        let run: String = self
            .rest()
            .chars()
            .take_while(|c| matches!(c, 'I' | 'V' | 'i' | 'v'))
            .collect();
        if run.is_empty() {
            return Ok(None);
        }

        let uniform = run.chars().all(char::is_uppercase) || run.chars().all(char::is_lowercase);
        let known = NUMERALS.iter().any(|n| n.eq_ignore_ascii_case(&run));
        if !uniform || !known {
            return Err(ChordError::Parse {
                position: start,
                message: format!("'{}' is not a roman numeral", run),
            });
        }

        self.position += run.len();
        Ok(Some(run))
    }

    fn note(&mut self) -> Result<Note, ChordError> {
        if let Some(base) = self.solfege() {
            let modifier = self.modifier();
            return Ok(Note {
                base,
                modifier,
                chord_type: ChordType::Solfege,
            });
        }

        if let Some(base) = self.letter() {
            let modifier = self.modifier();
            return Ok(Note {
                base,
                modifier,
                chord_type: ChordType::Symbol,
            });
        }

        let modifier = self.modifier();

        if let Some(base) = self.degree() {
            return Ok(Note {
                base,
                modifier,
                chord_type: ChordType::Numeric,
            });
        }

        if let Some(base) = self.numeral()? {
            return Ok(Note {
                base,
                modifier,
                chord_type: ChordType::Numeral,
            });
        }

        Err(self.error("expected a chord root"))
    }

    fn suffix(&mut self) -> Result<Option<String>, ChordError> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c == '/' {
                break;
            }
            if !(c.is_alphanumeric() || SUFFIX_SYMBOLS.contains(c)) {
                return Err(self.error(format!("unexpected character '{}'", c)));
            }
            self.advance();
        }

        let suffix = &self.input[start..self.position];
        Ok(if suffix.is_empty() {
            None
        } else {
            Some(suffix.to_string())
        })
    }
}

/// Parse a chord token. Surrounding whitespace is not stripped here; callers
/// trim first.
pub fn parse(text: &str) -> Result<ChordAst, ChordError> {
    let mut scanner = Scanner::new(text);

    if scanner.is_at_end() {
        return Err(scanner.error("empty chord"));
    }

    let root = scanner.note()?;
    let suffix = scanner.suffix()?;

    let mut ast = ChordAst {
        base: Some(root.base),
        modifier: root.modifier,
        suffix,
        bass_base: None,
        bass_modifier: None,
        chord_type: Some(root.chord_type),
    };

    if scanner.advance() == Some('/') {
        let bass = scanner.note()?;
        if bass.chord_type != root.chord_type {
            return Err(scanner.error(format!(
                "bass is a {} but the chord root is a {}",
                bass.chord_type, root.chord_type
            )));
        }
        if !scanner.is_at_end() {
            return Err(scanner.error("unexpected text after bass note"));
        }
        ast.bass_base = Some(bass.base);
        ast.bass_modifier = bass.modifier;
    }

    Ok(ast)
}
