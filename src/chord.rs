//! # Chord
//!
//! A chord is an optional root [`Key`], an optional suffix (quality or
//! extension, kept as written until normalized) and an optional bass [`Key`]
//! for slash chords. Root and bass always share one notation.
//!
//! Every operation returns a new chord; nothing is mutated in place.
//!
//! ## Example
//! ```rust
//! use chordsheet::Chord;
//!
//! let chord = Chord::parse("  Esus4/G# ").unwrap();
//! assert_eq!(chord.to_string(), "Esus4/G#");
//!
//! let key = "E".parse()?;
//! assert_eq!(chord.to_numeric(Some(&key))?.to_string(), "1sus/3");
//! assert_eq!(chord.transpose(-2).to_string(), "Dsus4/F#");
//! # Ok::<(), chordsheet::ChordError>(())
//! ```

use log::{debug, trace};
use std::fmt;

use crate::ast::{ChordAst, ChordType, Modifier};
use crate::error::ChordError;
use crate::key::{Key, KeyFormat};
use crate::parser;
use crate::tables::normalize_suffix;

/// Options for [`Chord::normalize`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Map the suffix through the suffix table (`sus2` → `2`)
    pub normalize_suffix: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_suffix: true,
        }
    }
}

/// Field overrides for [`Chord::set`]. `None` keeps the current value;
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ChordOverrides {
    pub root: Option<Option<Key>>,
    pub suffix: Option<Option<String>>,
    pub bass: Option<Option<Key>>,
}

#[derive(Debug, Clone, Default)]
pub struct Chord {
    root: Option<Key>,
    suffix: Option<String>,
    bass: Option<Key>,
}

/// Whether a symbol/number/solfège suffix marks the chord as minor
/// (`m`, `m7`, `min`, but not `maj7` or `ma7`)
pub fn is_minor_suffix(suffix: &str) -> bool {
    suffix.starts_with('m') && !suffix.starts_with("ma")
}

fn is_minor_base(base: &str, chord_type: ChordType, suffix: Option<&str>) -> bool {
    match chord_type {
        ChordType::Numeral => base.chars().all(char::is_lowercase),
        _ => suffix.is_some_and(is_minor_suffix),
    }
}

fn resolve_note(
    base: Option<String>,
    modifier: Option<Modifier>,
    chord_type: Option<ChordType>,
    minor: impl FnOnce(&str, ChordType) -> bool,
) -> Result<Option<Key>, ChordError> {
    let Some(base) = base else {
        return Ok(None);
    };
    let chord_type = chord_type.ok_or(ChordError::MissingChordType)?;
    let minor = minor(&base, chord_type);
    Key::resolve(&base, chord_type, minor, modifier).map(Some)
}

impl Chord {
    /// Build a chord from keys. Root and bass must share a notation.
    pub fn new(root: Option<Key>, suffix: Option<String>, bass: Option<Key>) -> Result<Self, ChordError> {
        if let (Some(root), Some(bass)) = (&root, &bass) {
            if root.chord_type() != bass.chord_type() {
                return Err(ChordError::MixedChordTypes {
                    root: root.chord_type(),
                    bass: bass.chord_type(),
                });
            }
        }
        Ok(Self::assemble(root, suffix, bass))
    }

    // Callers guarantee root and bass share a notation
    fn assemble(root: Option<Key>, suffix: Option<String>, bass: Option<Key>) -> Self {
        Self {
            root,
            suffix: suffix.filter(|s| !s.is_empty()),
            bass,
        }
    }

    /// Build a chord from the grammar's raw primitives
    pub fn from_ast(ast: ChordAst) -> Result<Self, ChordError> {
        let suffix = ast.suffix;
        let root = resolve_note(ast.base, ast.modifier, ast.chord_type, |base, chord_type| {
            is_minor_base(base, chord_type, suffix.as_deref())
        })?;
        let bass = resolve_note(ast.bass_base, ast.bass_modifier, ast.chord_type, |_, _| false)?;
        Self::new(root, suffix, bass)
    }

    /// Parse a chord string, eg `Esus4/G#` or `1sus4/#3`. Surrounding
    /// whitespace is ignored. Returns `None` for anything that is not a chord.
    pub fn parse(text: &str) -> Option<Self> {
        match Self::parse_or_fail(text) {
            Ok(chord) => Some(chord),
            Err(e) => {
                debug!("'{}' is not a chord: {}", text, e);
                None
            }
        }
    }

    /// Parse a chord string, reporting why it is not a chord
    pub fn parse_or_fail(text: &str) -> Result<Self, ChordError> {
        let ast = parser::parse(text.trim())?;
        Self::from_ast(ast)
    }

    pub fn root(&self) -> Option<&Key> {
        self.root.as_ref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn bass(&self) -> Option<&Key> {
        self.bass.as_ref()
    }

    /// Copy of this chord with some fields replaced
    pub fn set(&self, overrides: ChordOverrides) -> Result<Self, ChordError> {
        Self::new(
            overrides.root.unwrap_or_else(|| self.root.clone()),
            overrides.suffix.unwrap_or_else(|| self.suffix.clone()),
            overrides.bass.unwrap_or_else(|| self.bass.clone()),
        )
    }

    fn transform(&self, f: impl Fn(&Key) -> Key) -> Self {
        Self::assemble(
            self.root.as_ref().map(&f),
            self.suffix.clone(),
            self.bass.as_ref().map(&f),
        )
    }

    fn try_transform(&self, f: impl Fn(&Key) -> Result<Key, ChordError>) -> Result<Self, ChordError> {
        Ok(Self::assemble(
            self.root.as_ref().map(&f).transpose()?,
            self.suffix.clone(),
            self.bass.as_ref().map(&f).transpose()?,
        ))
    }

    /// True when every present field is in `chord_type`
    pub fn is(&self, chord_type: ChordType) -> bool {
        self.root.as_ref().map_or(true, |k| k.is(chord_type))
            && self.bass.as_ref().map_or(true, |k| k.is(chord_type))
    }

    pub fn is_chord_symbol(&self) -> bool {
        self.is(ChordType::Symbol)
    }

    pub fn is_numeric(&self) -> bool {
        self.is(ChordType::Numeric)
    }

    pub fn is_numeral(&self) -> bool {
        self.is(ChordType::Numeral)
    }

    pub fn is_solfege(&self) -> bool {
        self.is(ChordType::Solfege)
    }

    pub fn is_minor(&self) -> bool {
        self.root.as_ref().is_some_and(Key::is_minor)
    }

    pub fn make_minor(&self) -> Self {
        Self::assemble(
            self.root.as_ref().map(Key::make_minor),
            self.suffix.clone(),
            self.bass.clone(),
        )
    }

    /// Convert to a chord symbol. A numeric `#4` with reference key `E`
    /// becomes `A#`. Relative chords need `reference`.
    pub fn to_chord_symbol(&self, reference: Option<&Key>) -> Result<Self, ChordError> {
        self.convert(ChordType::Symbol, reference)
    }

    pub fn to_numeric(&self, reference: Option<&Key>) -> Result<Self, ChordError> {
        self.convert(ChordType::Numeric, reference)
    }

    pub fn to_numeral(&self, reference: Option<&Key>) -> Result<Self, ChordError> {
        self.convert(ChordType::Numeral, reference)
    }

    pub fn to_solfege(&self, reference: Option<&Key>) -> Result<Self, ChordError> {
        self.convert(ChordType::Solfege, reference)
    }

    pub fn to_chord_symbol_string(&self, reference: Option<&Key>) -> Result<String, ChordError> {
        Ok(self.to_chord_symbol(reference)?.to_string())
    }

    pub fn to_numeric_string(&self, reference: Option<&Key>) -> Result<String, ChordError> {
        Ok(self.to_numeric(reference)?.to_string())
    }

    pub fn to_numeral_string(&self, reference: Option<&Key>) -> Result<String, ChordError> {
        Ok(self.to_numeral(reference)?.to_string())
    }

    pub fn to_solfege_string(&self, reference: Option<&Key>) -> Result<String, ChordError> {
        Ok(self.to_solfege(reference)?.to_string())
    }

    /// Convert root and bass into `target` and canonicalize the suffix.
    ///
    /// Numerals carry minor in the case of the root, so a leading `m` in the
    /// suffix is dropped going in and restored coming out. Symbol results
    /// get their minor flag restored and are then normalized against
    /// `reference`; that order decides the enharmonic spelling.
    pub fn convert(&self, target: ChordType, reference: Option<&Key>) -> Result<Self, ChordError> {
        if self.is(target) {
            return Ok(self.clone());
        }

        let mut suffix = normalize_suffix(self.suffix.as_deref());
        let minor = self.is_minor() || suffix.as_deref().is_some_and(is_minor_suffix);

        match target {
            ChordType::Numeral if minor => {
                suffix = suffix.map(|s| if is_minor_suffix(&s) { s[1..].to_string() } else { s });
            }
            _ if minor && self.is_numeral() && !suffix.as_deref().is_some_and(is_minor_suffix) => {
                suffix = Some(format!("m{}", suffix.unwrap_or_default()));
            }
            _ => {}
        }

        let converted = self.try_transform(|key| key.convert(target, reference))?;
        let converted = Self::assemble(converted.root, suffix, converted.bass);
        let converted = if minor { converted.make_minor() } else { converted };
        trace!("converted {} to {} ({})", self, converted, target);

        match target {
            ChordType::Symbol => Ok(converted.normalize(reference, NormalizeOptions::default())),
            ChordType::Numeral | ChordType::Numeric | ChordType::Solfege => Ok(converted),
        }
    }

    /// Normalize root and bass spelling:
    /// - `Fb` → `E`, `Cb` → `B`, `B#` → `C`, `E#` → `F`
    /// - `b4` → `3`, `b1` → `7`, `#7` → `1`, `#3` → `4`
    ///
    /// With a `key`, the root's sharps/flats follow that key. The bass is
    /// spelled against the normalized root, not the key. With
    /// `normalize_suffix`, `sus2` becomes `2`, `sus4` becomes `sus`, and so on.
    pub fn normalize(&self, key: Option<&Key>, options: NormalizeOptions) -> Self {
        let suffix = if options.normalize_suffix {
            normalize_suffix(self.suffix.as_deref())
        } else {
            self.suffix.clone()
        };

        let root = self.root.as_ref().map(|root| {
            let normalized = root.normalize();
            let normalized = match key {
                Some(key) => normalized.normalize_enharmonics(key),
                None => normalized,
            };
            if suffix.as_deref().is_some_and(is_minor_suffix) && !normalized.is(ChordType::Numeral) {
                normalized.make_minor()
            } else {
                normalized
            }
        });

        let bass = self.bass.as_ref().map(|bass| {
            let normalized = bass.normalize();
            match &root {
                Some(root) => normalized.normalize_enharmonics(root),
                None => normalized,
            }
        });

        Self::assemble(root, suffix, bass)
    }

    pub fn use_modifier(&self, modifier: Modifier) -> Self {
        self.transform(|key| key.use_modifier(modifier))
    }

    /// Transpose up one semitone: `A` → `A#`, `Eb` → `E`
    pub fn transpose_up(&self) -> Self {
        self.transform(Key::transpose_up)
    }

    /// Transpose down one semitone: `A#` → `A`, `E` → `Eb`
    pub fn transpose_down(&self) -> Self {
        self.transform(Key::transpose_down)
    }

    pub fn transpose(&self, delta: i32) -> Self {
        self.transform(|key| key.transpose(delta))
    }

    /// Render with `#`/`b`, or `♯`/`♭` when `use_unicode_modifier` is set
    pub fn render(&self, use_unicode_modifier: bool) -> String {
        let suffix = self.suffix.as_deref().unwrap_or("");
        let mut rendered = String::new();

        if let Some(root) = &self.root {
            rendered.push_str(&root.render(KeyFormat {
                show_minor: !suffix.starts_with('m'),
                use_unicode_modifier,
            }));
            rendered.push_str(suffix);
        }

        if let Some(bass) = &self.bass {
            rendered.push('/');
            rendered.push_str(&bass.render(KeyFormat {
                show_minor: true,
                use_unicode_modifier,
            }));
        }

        rendered
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.suffix == other.suffix && self.root == other.root && self.bass == other.bass
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
