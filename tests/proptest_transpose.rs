//! Property-based tests for transposition and notation conversion.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test proptest_transpose
//! ```

use proptest::prelude::*;

use chordsheet::{Chord, ChordType, Key, NormalizeOptions};

// ============================================================================
// Strategies
// ============================================================================

const LETTERS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];
const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
const SYLLABLES: [&str; 7] = ["Do", "Re", "Mi", "Fa", "Sol", "La", "Si"];
const MODIFIERS: [&str; 3] = ["", "#", "b"];

// Suffixes that cannot be mistaken for part of the root and are already
// canonical once an "m" is prefixed or stripped
const SUFFIXES: [&str; 12] = [
    "", "m", "7", "m7", "maj7", "sus4", "sus2", "dim", "+", "9", "add9", "m7b5",
];
const NUMERAL_SUFFIXES: [&str; 7] = ["", "7", "9", "6", "sus4", "dim", "+"];

fn symbol_note() -> impl Strategy<Value = String> {
    (prop::sample::select(LETTERS.to_vec()), prop::sample::select(MODIFIERS.to_vec()))
        .prop_map(|(letter, modifier)| format!("{}{}", letter, modifier))
}

fn numeric_note() -> impl Strategy<Value = String> {
    (prop::sample::select(MODIFIERS.to_vec()), 1..=7u8)
        .prop_map(|(modifier, degree)| format!("{}{}", modifier, degree))
}

fn solfege_note() -> impl Strategy<Value = String> {
    (prop::sample::select(SYLLABLES.to_vec()), prop::sample::select(MODIFIERS.to_vec()))
        .prop_map(|(syllable, modifier)| format!("{}{}", syllable, modifier))
}

fn symbol_chord() -> impl Strategy<Value = String> {
    (
        symbol_note(),
        prop::sample::select(SUFFIXES.to_vec()),
        prop::option::of(symbol_note()),
    )
        .prop_map(|(root, suffix, bass)| match bass {
            Some(bass) => format!("{}{}/{}", root, suffix, bass),
            None => format!("{}{}", root, suffix),
        })
}

fn numeric_chord() -> impl Strategy<Value = String> {
    (
        numeric_note(),
        prop::sample::select(SUFFIXES.to_vec()),
        prop::option::of(numeric_note()),
    )
        .prop_map(|(root, suffix, bass)| match bass {
            Some(bass) => format!("{}{}/{}", root, suffix, bass),
            None => format!("{}{}", root, suffix),
        })
}

fn solfege_chord() -> impl Strategy<Value = String> {
    (
        solfege_note(),
        prop::sample::select(SUFFIXES.to_vec()),
        prop::option::of(solfege_note()),
    )
        .prop_map(|(root, suffix, bass)| match bass {
            Some(bass) => format!("{}{}/{}", root, suffix, bass),
            None => format!("{}{}", root, suffix),
        })
}

fn numeral_chord() -> impl Strategy<Value = String> {
    (
        prop::sample::select(MODIFIERS.to_vec()),
        prop::sample::select(NUMERALS.to_vec()),
        any::<bool>(),
        prop::sample::select(NUMERAL_SUFFIXES.to_vec()),
    )
        .prop_map(|(modifier, numeral, minor, suffix)| {
            let numeral = if minor {
                numeral.to_lowercase()
            } else {
                numeral.to_string()
            };
            format!("{}{}{}", modifier, numeral, suffix)
        })
}

fn any_chord() -> impl Strategy<Value = String> {
    prop_oneof![symbol_chord(), numeric_chord(), numeral_chord(), solfege_chord()]
}

fn song_key() -> impl Strategy<Value = Key> {
    (symbol_note(), any::<bool>()).prop_map(|(note, minor)| {
        let text = if minor { format!("{}m", note) } else { note };
        text.parse::<Key>().unwrap()
    })
}

fn target() -> impl Strategy<Value = ChordType> {
    prop::sample::select(ChordType::ALL.to_vec())
}

fn chord(text: &str) -> Chord {
    Chord::parse(text).unwrap_or_else(|| panic!("'{}' should parse", text))
}

fn notation(chord: &Chord) -> ChordType {
    ChordType::ALL
        .into_iter()
        .find(|chord_type| chord.is(*chord_type))
        .unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

proptest! {
    /// Rendering a freshly parsed chord gives back the trimmed input.
    #[test]
    fn parse_then_render_is_identity(text in any_chord(), pad in "[ \t\n]{0,3}") {
        let padded = format!("{}{}{}", pad, text, pad);
        prop_assert_eq!(chord(&padded).to_string(), text);
    }

    /// Solfège roots are never mistaken for letter chords.
    #[test]
    fn solfege_chords_stay_solfege(text in solfege_chord()) {
        prop_assert!(chord(&text).is_solfege());
    }

    /// Arbitrary text never panics the parser.
    #[test]
    fn parse_never_panics(text in "\\PC{0,12}") {
        let _ = Chord::parse(&text);
    }
}

// ============================================================================
// Transposition
// ============================================================================

proptest! {
    #[test]
    fn transpose_is_a_group_action(text in any_chord(), d1 in -30i32..30, d2 in -30i32..30) {
        let c = chord(&text);
        prop_assert_eq!(c.transpose(d1).transpose(d2), c.transpose(d1 + d2));
    }

    #[test]
    fn transpose_by_an_octave_is_identity(text in any_chord(), octaves in -3i32..=3) {
        let c = chord(&text);
        prop_assert_eq!(c.transpose(12 * octaves), c.clone());
        prop_assert_eq!(c.transpose_up().transpose_down(), c);
    }

    #[test]
    fn transpose_keeps_notation(text in any_chord(), delta in -12i32..12) {
        let c = chord(&text);
        prop_assert_eq!(notation(&c.transpose(delta)), notation(&c));
    }
}

// ============================================================================
// Conversion
// ============================================================================

proptest! {
    /// Converting away and back lands on the normalized chord.
    #[test]
    fn conversion_round_trip_equals_normalize(
        text in any_chord(),
        key in song_key(),
        target in target(),
    ) {
        let c = chord(&text);
        let original = notation(&c);
        prop_assume!(target != original);
        let there = c.convert(target, Some(&key)).unwrap();
        prop_assert!(there.is(target));
        let back = there.convert(original, Some(&key)).unwrap();
        prop_assert_eq!(back, c.normalize(Some(&key), NormalizeOptions::default()));
    }

    /// Converting into the notation a chord is already in changes nothing.
    #[test]
    fn same_notation_conversion_is_identity(text in any_chord(), key in song_key()) {
        let c = chord(&text);
        prop_assert_eq!(c.convert(notation(&c), Some(&key)).unwrap().to_string(), text);
    }

    /// Symbol output always follows the song key's spelling.
    #[test]
    fn symbols_follow_key_spelling(text in numeric_chord(), key in song_key()) {
        let symbol = chord(&text).to_chord_symbol(Some(&key)).unwrap();
        prop_assert_eq!(
            symbol.normalize(Some(&key), NormalizeOptions::default()).to_string(),
            symbol.to_string()
        );
    }
}
