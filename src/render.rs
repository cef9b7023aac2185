//! # Chord Rendering
//!
//! Renders one chord token the way it should appear for a song: with the
//! capo, a line's transpose key and an alternate render key folded into a
//! single transposition, then normalized and converted to the song's chord
//! style.
//!
//! ## Pipeline
//! 1. Parse the chord text (unparsable text is returned unchanged)
//! 2. Distance = `-capo` + transpose key distance + render key distance
//! 3. Effective key = render key, or the line/song key moved by the distance
//! 4. Transpose, then normalize against the effective key
//! 5. Convert to the chord style relative to the effective key
//!
//! Normalizing needs the transposed pitch and the style conversion needs a
//! key that already includes the transposition, so the order is fixed.
//!
//! ## Example
//! ```rust
//! use chordsheet::{render_chord, Line, RenderOptions, Song};
//!
//! let song = Song { key: Some("C".parse()?), capo: Some(2), ..Default::default() };
//! let line = Line::default();
//!
//! assert_eq!(render_chord("D", &line, &song, &RenderOptions::default()), "C");
//! assert_eq!(render_chord("N.C.", &line, &song, &RenderOptions::default()), "N.C.");
//! # Ok::<(), chordsheet::ChordError>(())
//! ```

use log::{trace, warn};
use std::collections::BTreeMap;

use crate::ast::ChordType;
use crate::chord::{Chord, NormalizeOptions};
use crate::error::ChordError;
use crate::key::Key;
use crate::song::{Line, Song};
use crate::tables;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Show the song in this key instead of its own
    pub render_key: Option<Key>,
    pub use_unicode_modifier: bool,
    pub normalize_chords: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            render_key: None,
            use_unicode_modifier: false,
            normalize_chords: true,
        }
    }
}

/// Semitones to move a song in `song_key` for a transpose key: either a
/// literal count (`"2"`) or a target key (`"D"`).
pub fn transpose_distance(transpose_key: &str, song_key: &Key) -> Result<i32, ChordError> {
    let transpose_key = transpose_key.trim();
    if !transpose_key.is_empty() && transpose_key.chars().all(|c| c.is_ascii_digit()) {
        return transpose_key
            .parse()
            .map_err(|_| ChordError::InvalidKey(transpose_key.to_string()));
    }

    let target: Key = transpose_key.parse()?;
    Ok(Key::distance(song_key, &target) as i32)
}

/// Total transposition for a chord. The capo always counts; transpose and
/// render keys only count when the song has a key to measure them from.
/// An unreadable transpose key is skipped with a warning.
pub fn chord_transpose_distance(
    capo: Option<i32>,
    transpose_key: Option<&str>,
    song_key: Option<&Key>,
    render_key: Option<&Key>,
) -> i32 {
    let mut transpose = -capo.unwrap_or(0);

    if let Some(song_key) = song_key {
        if let Some(transpose_key) = transpose_key {
            match transpose_distance(transpose_key, song_key) {
                Ok(distance) => transpose += distance,
                Err(e) => warn!("Ignoring transpose key '{}': {}", transpose_key, e),
            }
        }

        if let Some(render_key) = render_key {
            transpose += Key::distance(song_key, render_key) as i32;
        }
    }

    transpose
}

/// Render one chord for display. Never fails: text that is not a chord comes
/// back unchanged, and steps that cannot be applied are skipped with a
/// warning.
pub fn render_chord(text: &str, line: &Line, song: &Song, options: &RenderOptions) -> String {
    let Some(chord) = Chord::parse(text) else {
        return text.to_string();
    };

    let distance = chord_transpose_distance(
        song.capo,
        line.transpose_key.as_deref(),
        song.key.as_ref(),
        options.render_key.as_ref(),
    );

    let effective_key = options.render_key.clone().or_else(|| {
        line.key
            .as_ref()
            .or(song.key.as_ref())
            .map(|key| key.transpose(distance))
    });
    trace!(
        "rendering '{}' moved {} semitones in {:?}",
        text,
        distance,
        effective_key.as_ref().map(Key::to_string)
    );

    let transposed = chord.transpose(distance);
    let normalized = if options.normalize_chords {
        transposed.normalize(effective_key.as_ref(), NormalizeOptions::default())
    } else {
        transposed
    };

    let styled = match song.chord_style {
        Some(style) => match normalized.convert(style, effective_key.as_ref()) {
            Ok(converted) => converted,
            Err(e) => {
                warn!("Can't render '{}' as {}: {}", text, style, e);
                normalized
            }
        },
        None => normalized,
    };

    styled.render(options.use_unicode_modifier)
}

fn family(key: &Key) -> ChordType {
    match key.chord_type() {
        ChordType::Solfege => ChordType::Solfege,
        ChordType::Symbol | ChordType::Numeral | ChordType::Numeric => ChordType::Symbol,
    }
}

/// Capo positions for a key, mapped to the key the player's chord shapes
/// are in at that position.
///
/// ```
/// use chordsheet::{get_capos, Key};
///
/// let capos = get_capos(&"A".parse::<Key>()?)?;
/// assert_eq!(capos[&2], "G");
/// # Ok::<(), chordsheet::ChordError>(())
/// ```
pub fn get_capos(key: &Key) -> Result<&'static BTreeMap<u8, String>, ChordError> {
    let name = key.to_string();
    tables::capos_for(family(key), &name)
        .ok_or_else(|| ChordError::InvalidKey(format!("no capo table for {}", name)))
}

/// Keys a song in `key` can be transposed to
pub fn get_keys(key: &Key) -> Result<&'static [String], ChordError> {
    if key.chord_type().is_relative() && !key.is(ChordType::Solfege) {
        return Err(ChordError::InvalidKey(format!("no key list for {}", key)));
    }
    tables::reachable_keys(family(key), key.is_minor())
        .ok_or_else(|| ChordError::InvalidKey(format!("no key list for {}", key)))
}
