//! # Key
//!
//! A single pitch or scale-degree reference in one of the four notations,
//! with an accidental and a minor flag.
//!
//! ## Representation
//! A key stores the natural *step* it is written on (C..B, 1..7, I..VII or
//! Do..Si) and its modifier. The semitone class is derived from the two:
//!
//! ```text
//! semitone = NATURAL_SEMITONES[step] + modifier   (mod 12)
//!
//!   A#   step 5 (A), sharp  -> 10
//!   #4   step 3 (4), sharp  ->  6  (above the tonic)
//!   Fb   step 3 (F), flat   ->  4  (same pitch as E)
//! ```
//!
//! Symbols are absolute (semitones above C). Numerals, numbers and solfège are
//! relative: their semitone class is the interval above a tonic, so moving
//! between a symbol and a relative notation needs a [`Tonic`].
//!
//! ## Equality
//! Two keys are equal when they share semitone class, minor flag and notation.
//! `A#` equals `Bb`; `Am` does not equal `A`.

use std::fmt;
use std::str::FromStr;

use crate::ast::{ChordType, Modifier};
use crate::error::ChordError;
use crate::parser;
use crate::tables::{
    self, degree_spelling, LETTERS, NATURAL_SEMITONES, NUMERALS, SOLFEGE,
};

/// Display options for [`Key::render`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFormat {
    /// Append the minor marker (`m`). Chords turn this off when their suffix
    /// already starts with `m`. Numerals show minor by case and ignore it.
    pub show_minor: bool,
    pub use_unicode_modifier: bool,
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            show_minor: true,
            use_unicode_modifier: false,
        }
    }
}

/// Absolute pitch a relative notation is measured from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tonic {
    semitone: u8,
    minor: bool,
    preference: Modifier,
}

impl Tonic {
    pub fn semitone(&self) -> u8 {
        self.semitone
    }

    pub fn is_minor(&self) -> bool {
        self.minor
    }

    /// Sharp/flat spelling the key prefers; `Natural` for keys without one
    pub fn preference(&self) -> Modifier {
        self.preference
    }

    /// Modifier for `pitch` (semitones above C) when written in this key
    pub fn spelling(&self, pitch: u8) -> Modifier {
        tables::spelling_in_key(pitch, self.semitone, self.minor, self.preference)
    }
}

impl TryFrom<&Key> for Tonic {
    type Error = ChordError;

    /// Symbols anchor directly. A solfège key given as a song key is read
    /// fixed-do (Do = C). Numerals and numbers are relative themselves.
    fn try_from(key: &Key) -> Result<Self, Self::Error> {
        match key.chord_type {
            ChordType::Symbol | ChordType::Solfege => {
                let name = key.relabel(ChordType::Symbol).normalize().to_string();
                let preference = tables::key_preference(&name).unwrap_or(key.modifier);
                Ok(Tonic {
                    semitone: key.semitone(),
                    minor: key.minor,
                    preference,
                })
            }
            ChordType::Numeral | ChordType::Numeric => {
                Err(ChordError::InvalidReferenceKey(key.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Key {
    step: u8,
    modifier: Modifier,
    minor: bool,
    chord_type: ChordType,
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.semitone() == other.semitone()
            && self.minor == other.minor
            && self.chord_type == other.chord_type
    }
}

impl Eq for Key {}

fn natural_step(semitone: u8) -> Option<u8> {
    NATURAL_SEMITONES
        .iter()
        .position(|&s| s == semitone % 12)
        .map(|step| step as u8)
}

/// Spell a semitone class as (step, modifier). Naturals win; otherwise a flat
/// bias spells from the step above and anything else from the step below.
fn spell(semitone: u8, bias: Modifier) -> (u8, Modifier) {
    let semitone = semitone % 12;
    if let Some(step) = natural_step(semitone) {
        return (step, Modifier::Natural);
    }
    let (neighbour, modifier) = match bias {
        Modifier::Flat => ((semitone + 1) % 12, Modifier::Flat),
        Modifier::Sharp | Modifier::Natural => ((semitone + 11) % 12, Modifier::Sharp),
    };
    (natural_step(neighbour).unwrap_or_default(), modifier)
}

fn position_of(names: &[&str; 7], token: &str) -> Option<u8> {
    names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .map(|step| step as u8)
}

impl Key {
    pub fn new(step: u8, modifier: Modifier, minor: bool, chord_type: ChordType) -> Result<Self, ChordError> {
        if step >= 7 {
            return Err(ChordError::InvalidKey(format!("step {} is out of range", step)));
        }
        Ok(Self {
            step,
            modifier,
            minor,
            chord_type,
        })
    }

    fn from_semitone(semitone: u8, bias: Modifier, minor: bool, chord_type: ChordType) -> Self {
        let (step, modifier) = spell(semitone, bias);
        Self {
            step,
            modifier,
            minor,
            chord_type,
        }
    }

    /// Map a raw base token (`A`, `4`, `IV`, `Sol`) for the given notation
    /// into a key.
    ///
    /// # Example
    /// ```
    /// use chordsheet::{ChordType, Key, Modifier};
    ///
    /// let key = Key::resolve("IV", ChordType::Numeral, false, Some(Modifier::Sharp))?;
    /// assert_eq!(key.to_string(), "#IV");
    /// assert!(Key::resolve("H", ChordType::Symbol, false, None).is_err());
    /// # Ok::<(), chordsheet::ChordError>(())
    /// ```
    pub fn resolve(
        base: &str,
        key_type: ChordType,
        minor: bool,
        modifier: Option<Modifier>,
    ) -> Result<Self, ChordError> {
        let step = match key_type {
            ChordType::Symbol => LETTERS
                .iter()
                .position(|letter| *letter == base)
                .map(|step| step as u8),
            ChordType::Numeric => base
                .parse::<u8>()
                .ok()
                .filter(|degree| (1..=7).contains(degree))
                .map(|degree| degree - 1),
            ChordType::Numeral => position_of(&NUMERALS, base),
            ChordType::Solfege => position_of(&SOLFEGE, base),
        };

        let step = step.ok_or_else(|| {
            ChordError::InvalidKey(format!("'{}' is not a valid {} base", base, key_type))
        })?;

        Ok(Self {
            step,
            modifier: modifier.unwrap_or_default(),
            minor,
            chord_type: key_type,
        })
    }

    /// Parse a key string (`F#m`, `bVII`, `#4`, `Sib`), trying symbols,
    /// numbers, numerals and solfège. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let ast = parser::parse(trimmed).ok()?;
        if ast.bass_base.is_some() {
            return None;
        }

        let chord_type = ast.chord_type?;
        let base = ast.base?;
        let minor = match (chord_type, ast.suffix.as_deref()) {
            (ChordType::Numeral, None) => base.chars().all(|c| c.is_lowercase()),
            (ChordType::Numeral, Some(_)) => return None,
            (_, None) => false,
            (_, Some("m")) => true,
            (_, Some(_)) => return None,
        };

        Self::resolve(&base, chord_type, minor, ast.modifier).ok()
    }

    /// Parse an optional key string, `None` when absent or unparsable
    pub fn wrap(text: Option<&str>) -> Option<Self> {
        text.and_then(Self::parse)
    }

    /// Parse a required key string
    pub fn wrap_or_fail(text: Option<&str>) -> Result<Self, ChordError> {
        let text = text.ok_or_else(|| ChordError::InvalidKey("no key given".to_string()))?;
        text.parse()
    }

    /// Semitone class: above C for symbols, above the tonic otherwise
    pub fn semitone(&self) -> u8 {
        (NATURAL_SEMITONES[self.step as usize] as i32 + self.modifier.offset()).rem_euclid(12) as u8
    }

    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    pub fn chord_type(&self) -> ChordType {
        self.chord_type
    }

    pub fn is(&self, chord_type: ChordType) -> bool {
        self.chord_type == chord_type
    }

    pub fn is_minor(&self) -> bool {
        self.minor
    }

    pub fn make_minor(&self) -> Self {
        Self {
            minor: true,
            ..self.clone()
        }
    }

    /// Upward distance in semitones from `from` to `to`, in `0..12`
    ///
    /// ```
    /// use chordsheet::Key;
    ///
    /// let c: Key = "C".parse()?;
    /// let d: Key = "D".parse()?;
    /// assert_eq!(Key::distance(&c, &d), 2);
    /// assert_eq!(Key::distance(&d, &c), 10);
    /// # Ok::<(), chordsheet::ChordError>(())
    /// ```
    pub fn distance(from: &Key, to: &Key) -> u8 {
        (to.semitone() as i32 - from.semitone() as i32).rem_euclid(12) as u8
    }

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

    /// Convert into `target` notation. Moving between a symbol and a relative
    /// notation needs `reference`; relative notations convert among
    /// themselves without one.
    pub fn convert(&self, target: ChordType, reference: Option<&Key>) -> Result<Self, ChordError> {
        match (self.chord_type, target) {
            (from, to) if from == to => Ok(self.clone()),
            (ChordType::Symbol, to) => {
                let tonic = Self::tonic(ChordType::Symbol, to, reference)?;
                Ok(self.relative_to(&tonic, to))
            }
            (from, ChordType::Symbol) => {
                let tonic = Self::tonic(from, ChordType::Symbol, reference)?;
                Ok(self.absolute_in(&tonic))
            }
            (_, to) => Ok(self.relabel(to)),
        }
    }

    fn tonic(from: ChordType, to: ChordType, reference: Option<&Key>) -> Result<Tonic, ChordError> {
        let reference = reference.ok_or(ChordError::MissingReferenceKey { from, to })?;
        Tonic::try_from(reference)
    }

    /// Express this symbol as a degree above `tonic` in the relative notation
    /// `target`. Keys that are already relative, or a `Symbol` target, are
    /// returned unchanged apart from the label.
    pub fn relative_to(&self, tonic: &Tonic, target: ChordType) -> Self {
        if self.chord_type.is_relative() || !target.is_relative() {
            return self.relabel(target);
        }
        let degree = (self.semitone() as i32 - tonic.semitone as i32).rem_euclid(12) as u8;
        let bias = match self.modifier {
            Modifier::Natural => degree_spelling(degree),
            modifier => modifier,
        };
        Self::from_semitone(degree, bias, self.minor, target)
    }

    /// Resolve this relative degree to a chord symbol in the key of `tonic`.
    /// Symbols are returned unchanged.
    pub fn absolute_in(&self, tonic: &Tonic) -> Self {
        if !self.chord_type.is_relative() {
            return self.clone();
        }
        let pitch = (tonic.semitone + self.semitone()) % 12;
        let bias = match self.modifier {
            Modifier::Natural => tonic.spelling(pitch),
            modifier => modifier,
        };
        Self::from_semitone(pitch, bias, self.minor, ChordType::Symbol)
    }

    fn relabel(&self, chord_type: ChordType) -> Self {
        Self {
            chord_type,
            ..self.clone()
        }
    }

    /// Shift by `semitones` (either direction, wrapping). The result keeps the
    /// original sharp/flat bias; a natural picks sharps going up and flats
    /// going down.
    ///
    /// ```
    /// use chordsheet::Key;
    ///
    /// let a: Key = "A".parse()?;
    /// assert_eq!(a.transpose(1).to_string(), "A#");
    /// assert_eq!(a.transpose(-1).to_string(), "Ab");
    /// assert_eq!(a.transpose(3).to_string(), "C");
    /// # Ok::<(), chordsheet::ChordError>(())
    /// ```
    pub fn transpose(&self, semitones: i32) -> Self {
        if semitones.rem_euclid(12) == 0 {
            return self.clone();
        }
        let semitone = (self.semitone() as i32 + semitones).rem_euclid(12) as u8;
        let bias = match self.modifier {
            Modifier::Natural if semitones > 0 => Modifier::Sharp,
            Modifier::Natural => Modifier::Flat,
            modifier => modifier,
        };
        Self::from_semitone(semitone, bias, self.minor, self.chord_type)
    }

    pub fn transpose_up(&self) -> Self {
        self.transpose(1)
    }

    pub fn transpose_down(&self) -> Self {
        self.transpose(-1)
    }

    /// Collapse theoretical spellings onto naturals: `Fb` → `E`, `B#` → `C`,
    /// `b4` → `3`, `#7` → `1`. Other accidentals are left as written.
    pub fn normalize(&self) -> Self {
        Self::from_semitone(self.semitone(), self.modifier, self.minor, self.chord_type)
    }

    /// Respell sharps/flats the way `key` spells this pitch: flats in flat
    /// keys, and by scale degree elsewhere (`Bb` stays `Bb` in G, `A#` in E).
    /// Only symbols are affected;
    /// relative keys, or a relative `key`, leave the spelling alone.
    pub fn normalize_enharmonics(&self, key: &Key) -> Self {
        if self.chord_type != ChordType::Symbol {
            return self.clone();
        }
        match Tonic::try_from(key) {
            Ok(tonic) => {
                let semitone = self.semitone();
                let bias = tonic.spelling(semitone);
                Self::from_semitone(semitone, bias, self.minor, self.chord_type)
            }
            Err(_) => self.clone(),
        }
    }

    /// Same pitch, spelled with `modifier` where it has an accidental
    pub fn use_modifier(&self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::Natural => self.normalize(),
            bias => Self::from_semitone(self.semitone(), bias, self.minor, self.chord_type),
        }
    }

    pub fn render(&self, format: KeyFormat) -> String {
        let modifier = self.modifier.render(format.use_unicode_modifier);
        let minor = if self.minor && format.show_minor { "m" } else { "" };
        let step = self.step as usize;

        match self.chord_type {
            ChordType::Symbol => format!("{}{}{}", LETTERS[step], modifier, minor),
            ChordType::Solfege => format!("{}{}{}", SOLFEGE[step], modifier, minor),
            ChordType::Numeric => format!("{}{}{}", modifier, step + 1, minor),
            ChordType::Numeral if self.minor => {
                format!("{}{}", modifier, NUMERALS[step].to_lowercase())
            }
            ChordType::Numeral => format!("{}{}", modifier, NUMERALS[step]),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(KeyFormat::default()))
    }
}

impl FromStr for Key {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s).ok_or_else(|| ChordError::InvalidKey(s.to_string()))
    }
}
