//! # Lookup Tables
//!
//! Read-only notation data, built once on first use and shared process-wide:
//! - suffix canonicalization (`sus2` → `2`, `maj` → no suffix)
//! - sharp/flat preference per key
//! - capo → effective key, per key
//! - the keys a song can be transposed to
//!
//! Tables for letter names and fixed-do solfège share one source list; the
//! solfège variants are derived by renaming the letter.

use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};

use crate::ast::{ChordType, Modifier};

/// Marker in the suffix table meaning "drop the suffix entirely"
pub const BLANK: &str = "[blank]";

/// Highest capo position offered by the capo tables
pub const MAX_CAPO: u8 = 11;

/// Semitone offsets of the seven natural steps (C major / degrees 1-7)
pub const NATURAL_SEMITONES: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

pub const LETTERS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];
pub const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
pub const SOLFEGE: [&str; 7] = ["Do", "Re", "Mi", "Fa", "Sol", "La", "Si"];

// Common chromatic spelling used when a key expresses no preference (C, Am)
const NEUTRAL_SPELLING: [Modifier; 12] = [
    Modifier::Natural,
    Modifier::Sharp, // C#
    Modifier::Natural,
    Modifier::Flat, // Eb
    Modifier::Natural,
    Modifier::Natural,
    Modifier::Sharp, // F#
    Modifier::Natural,
    Modifier::Flat, // Ab
    Modifier::Natural,
    Modifier::Flat, // Bb
    Modifier::Natural,
];

// Conventional spelling of chromatic scale degrees: b2 b3 #4 b6 b7
const DEGREE_SPELLING: [Modifier; 12] = [
    Modifier::Natural,
    Modifier::Flat,
    Modifier::Natural,
    Modifier::Flat,
    Modifier::Natural,
    Modifier::Natural,
    Modifier::Sharp,
    Modifier::Natural,
    Modifier::Flat,
    Modifier::Natural,
    Modifier::Flat,
    Modifier::Natural,
];

const MAJOR_KEYS: [(&str, u8); 14] = [
    ("Bb", 10),
    ("B", 11),
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
];

const MINOR_KEYS: [(&str, u8); 12] = [
    ("F#m", 6),
    ("Gm", 7),
    ("G#m", 8),
    ("Am", 9),
    ("Bbm", 10),
    ("Bm", 11),
    ("Cm", 0),
    ("C#m", 1),
    ("D#m", 3),
    ("Ebm", 3),
    ("Em", 4),
    ("Fm", 5),
];

// Spelling used for the effective key under a capo, indexed by semitone
const COMMON_MAJOR: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B"];
const COMMON_MINOR: [&str; 12] = [
    "Cm", "C#m", "Dm", "Ebm", "Em", "Fm", "F#m", "Gm", "G#m", "Am", "Bbm", "Bm",
];

/// Raw suffix → canonical suffix
const SUFFIX_ALIASES: &[(&str, &str)] = &[
    // major
    ("maj", BLANK),
    ("major", BLANK),
    ("M", BLANK),
    ("Maj", BLANK),
    ("ma", BLANK),
    // minor
    ("min", "m"),
    ("minor", "m"),
    ("mi", "m"),
    ("-", "m"),
    ("min6", "m6"),
    ("-6", "m6"),
    ("min7", "m7"),
    ("mi7", "m7"),
    ("-7", "m7"),
    ("min9", "m9"),
    ("-9", "m9"),
    ("min11", "m11"),
    ("min13", "m13"),
    ("mmaj7", "m(maj7)"),
    ("mMaj7", "m(maj7)"),
    ("mM7", "m(maj7)"),
    ("minmaj7", "m(maj7)"),
    ("-maj7", "m(maj7)"),
    // major sevenths and up
    ("M7", "maj7"),
    ("Maj7", "maj7"),
    ("ma7", "maj7"),
    ("major7", "maj7"),
    ("Δ", "maj7"),
    ("Δ7", "maj7"),
    ("^", "maj7"),
    ("^7", "maj7"),
    ("j7", "maj7"),
    ("M9", "maj9"),
    ("Maj9", "maj9"),
    ("ma9", "maj9"),
    ("Δ9", "maj9"),
    ("M11", "maj11"),
    ("Maj11", "maj11"),
    ("M13", "maj13"),
    ("Maj13", "maj13"),
    ("Δ13", "maj13"),
    // suspended
    ("sus2", "2"),
    ("sus4", "sus"),
    ("7sus4", "7sus"),
    ("9sus4", "9sus"),
    // added tones
    ("add2", "2"),
    ("(add9)", "add9"),
    ("add(9)", "add9"),
    ("madd9", "m(add9)"),
    ("m(add9)", "m(add9)"),
    ("6/9", "69"),
    ("6add9", "69"),
    ("m6/9", "m69"),
    // diminished
    ("o", "dim"),
    ("°", "dim"),
    ("dim7", "dim7"),
    ("o7", "dim7"),
    ("°7", "dim7"),
    ("ø", "m7b5"),
    ("ø7", "m7b5"),
    ("min7b5", "m7b5"),
    ("-7b5", "m7b5"),
    ("m7(b5)", "m7b5"),
    // augmented
    ("aug", "+"),
    ("#5", "+"),
    ("(#5)", "+"),
    ("aug7", "+7"),
    ("7#5", "+7"),
    ("7(#5)", "+7"),
    // power chord
    ("(5)", "5"),
    ("no3", "5"),
    // altered dominants
    ("7(b9)", "7b9"),
    ("7(#9)", "7#9"),
    ("7(b5)", "7b5"),
    ("7(#11)", "7#11"),
    ("dom7", "7"),
    ("dom", "7"),
];

lazy_static! {
    static ref SUFFIX_MAPPING: HashMap<&'static str, &'static str> =
        SUFFIX_ALIASES.iter().copied().collect();

    static ref KEY_PREFERENCES: HashMap<&'static str, Modifier> = HashMap::from([
        ("C", Modifier::Natural),
        ("Am", Modifier::Natural),
        ("G", Modifier::Sharp),
        ("Em", Modifier::Sharp),
        ("D", Modifier::Sharp),
        ("Bm", Modifier::Sharp),
        ("A", Modifier::Sharp),
        ("F#m", Modifier::Sharp),
        ("E", Modifier::Sharp),
        ("C#m", Modifier::Sharp),
        ("B", Modifier::Sharp),
        ("G#m", Modifier::Sharp),
        ("F#", Modifier::Sharp),
        ("D#m", Modifier::Sharp),
        ("C#", Modifier::Sharp),
        ("A#m", Modifier::Sharp),
        ("G#", Modifier::Sharp),
        ("D#", Modifier::Sharp),
        ("A#", Modifier::Sharp),
        ("F", Modifier::Flat),
        ("Dm", Modifier::Flat),
        ("Bb", Modifier::Flat),
        ("Gm", Modifier::Flat),
        ("Eb", Modifier::Flat),
        ("Cm", Modifier::Flat),
        ("Ab", Modifier::Flat),
        ("Fm", Modifier::Flat),
        ("Db", Modifier::Flat),
        ("Bbm", Modifier::Flat),
        ("Gb", Modifier::Flat),
        ("Ebm", Modifier::Flat),
        ("Cb", Modifier::Flat),
        ("Abm", Modifier::Flat),
        ("Dbm", Modifier::Flat),
        ("Gbm", Modifier::Flat),
    ]);

    static ref MAJOR_KEY_LISTS: HashMap<ChordType, Vec<String>> = key_lists(&MAJOR_KEYS);
    static ref MINOR_KEY_LISTS: HashMap<ChordType, Vec<String>> = key_lists(&MINOR_KEYS);

    static ref CAPOS: HashMap<ChordType, HashMap<String, BTreeMap<u8, String>>> = {
        let mut families = HashMap::new();
        for chord_type in [ChordType::Symbol, ChordType::Solfege] {
            let mut table = HashMap::new();
            add_capos(&mut table, chord_type, &MAJOR_KEYS, &COMMON_MAJOR);
            add_capos(&mut table, chord_type, &MINOR_KEYS, &COMMON_MINOR);
            families.insert(chord_type, table);
        }
        families
    };
}

fn key_lists(keys: &[(&str, u8)]) -> HashMap<ChordType, Vec<String>> {
    HashMap::from([
        (ChordType::Symbol, keys.iter().map(|(name, _)| name.to_string()).collect()),
        (ChordType::Solfege, keys.iter().map(|(name, _)| to_fixed_do(name)).collect()),
    ])
}

fn add_capos(
    table: &mut HashMap<String, BTreeMap<u8, String>>,
    chord_type: ChordType,
    keys: &[(&str, u8)],
    common: &[&str; 12],
) {
    let rename = |name: &str| match chord_type {
        ChordType::Solfege => to_fixed_do(name),
        _ => name.to_string(),
    };

    let names = keys.iter().copied().chain(
        common.iter().enumerate().map(|(semitone, name)| (*name, semitone as u8)),
    );

    for (name, semitone) in names {
        let capos = (1..=MAX_CAPO)
            .map(|capo| {
                let effective = (semitone as i32 - capo as i32).rem_euclid(12) as usize;
                (capo, rename(common[effective]))
            })
            .collect();
        table.insert(rename(name), capos);
    }
}

/// Rename a letter key name (`Bbm`) to its fixed-do solfège form (`Sibm`)
pub fn to_fixed_do(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(letter) => match LETTERS.iter().position(|l| l.starts_with(letter)) {
            Some(step) => format!("{}{}", SOLFEGE[step], chars.as_str()),
            None => name.to_string(),
        },
        None => String::new(),
    }
}

/// Canonical form of a chord suffix. `None` when the suffix maps to no suffix
/// at all; unknown suffixes pass through unchanged.
pub fn normalize_suffix(suffix: Option<&str>) -> Option<String> {
    let suffix = suffix?;
    match SUFFIX_MAPPING.get(suffix) {
        Some(&BLANK) => None,
        Some(canonical) => Some(canonical.to_string()),
        None => Some(suffix.to_string()),
    }
}

/// Sharp/flat preference of a key, by key name (`Bb`, `F#m`)
pub fn key_preference(name: &str) -> Option<Modifier> {
    KEY_PREFERENCES.get(name).copied()
}

/// Modifier to spell a pitch class with in a key. Naturals always win. Flat
/// keys spell everything flat. Otherwise notes of the key's major scale (the
/// relative major for minor keys) follow the key, and chromatic notes are
/// spelled by degree: b2 b3 #4 b6 b7, or C# Eb F# Ab Bb in C and Am.
///
/// ```
/// use chordsheet::tables::spelling_in_key;
/// use chordsheet::Modifier;
///
/// // Bb is the flat third of G, F# its seventh
/// assert_eq!(spelling_in_key(10, 7, false, Modifier::Sharp), Modifier::Flat);
/// assert_eq!(spelling_in_key(6, 7, false, Modifier::Sharp), Modifier::Sharp);
/// ```
pub fn spelling_in_key(pitch: u8, tonic: u8, minor: bool, preference: Modifier) -> Modifier {
    let pitch = pitch % 12;
    if NATURAL_SEMITONES.contains(&pitch) {
        return Modifier::Natural;
    }

    let major_tonic = if minor { (tonic + 3) % 12 } else { tonic % 12 };
    let degree = (pitch + 12 - major_tonic) % 12;
    match preference {
        Modifier::Flat => Modifier::Flat,
        Modifier::Natural => NEUTRAL_SPELLING[degree as usize],
        Modifier::Sharp if NATURAL_SEMITONES.contains(&degree) => Modifier::Sharp,
        Modifier::Sharp => DEGREE_SPELLING[degree as usize],
    }
}

/// Conventional modifier for a chromatic scale degree (semitones above tonic)
pub fn degree_spelling(semitone: u8) -> Modifier {
    DEGREE_SPELLING[(semitone % 12) as usize]
}

/// Keys a song in a major (`minor == false`) or minor key can move to
pub fn reachable_keys(chord_type: ChordType, minor: bool) -> Option<&'static [String]> {
    let lists: &'static HashMap<ChordType, Vec<String>> = if minor {
        &MINOR_KEY_LISTS
    } else {
        &MAJOR_KEY_LISTS
    };
    lists.get(&chord_type).map(Vec::as_slice)
}

/// Capo position → effective key for a key name in the given family
pub fn capos_for(chord_type: ChordType, key_name: &str) -> Option<&'static BTreeMap<u8, String>> {
    let families: &'static HashMap<ChordType, HashMap<String, BTreeMap<u8, String>>> = &CAPOS;
    families.get(&chord_type)?.get(key_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_normalization() {
        assert_eq!(normalize_suffix(Some("sus2")), Some("2".to_string()));
        assert_eq!(normalize_suffix(Some("sus4")), Some("sus".to_string()));
        assert_eq!(normalize_suffix(Some("min7")), Some("m7".to_string()));
        assert_eq!(normalize_suffix(Some("maj")), None);
        assert_eq!(normalize_suffix(Some("7b9")), Some("7b9".to_string()));
        assert_eq!(normalize_suffix(None), None);
    }

    #[test]
    fn test_spelling_prefers_naturals() {
        assert_eq!(spelling_in_key(4, 5, false, Modifier::Flat), Modifier::Natural);
        assert_eq!(spelling_in_key(10, 0, false, Modifier::Natural), Modifier::Flat);
        assert_eq!(spelling_in_key(6, 0, false, Modifier::Natural), Modifier::Sharp);
        assert_eq!(spelling_in_key(1, 9, true, Modifier::Natural), Modifier::Sharp);
    }

    #[test]
    fn test_spelling_in_sharp_keys_follows_degree() {
        // E major: A# is the raised fourth, C# is in the scale
        assert_eq!(spelling_in_key(10, 4, false, Modifier::Sharp), Modifier::Sharp);
        assert_eq!(spelling_in_key(1, 4, false, Modifier::Sharp), Modifier::Sharp);
        // D major: Eb is the flat second, Bb the flat sixth, G# the raised fourth
        assert_eq!(spelling_in_key(3, 2, false, Modifier::Sharp), Modifier::Flat);
        assert_eq!(spelling_in_key(10, 2, false, Modifier::Sharp), Modifier::Flat);
        assert_eq!(spelling_in_key(8, 2, false, Modifier::Sharp), Modifier::Sharp);
        // E minor reads against G major
        assert_eq!(spelling_in_key(10, 4, true, Modifier::Sharp), Modifier::Flat);
        assert_eq!(spelling_in_key(6, 4, true, Modifier::Sharp), Modifier::Sharp);
    }

    #[test]
    fn test_spelling_in_flat_keys_is_all_flats() {
        assert_eq!(spelling_in_key(6, 5, false, Modifier::Flat), Modifier::Flat);
        assert_eq!(spelling_in_key(1, 2, true, Modifier::Flat), Modifier::Flat);
    }

    #[test]
    fn test_degree_spelling() {
        assert_eq!(degree_spelling(3), Modifier::Flat);
        assert_eq!(degree_spelling(6), Modifier::Sharp);
        assert_eq!(degree_spelling(7), Modifier::Natural);
    }

    #[test]
    fn test_key_preferences() {
        assert_eq!(key_preference("Bb"), Some(Modifier::Flat));
        assert_eq!(key_preference("E"), Some(Modifier::Sharp));
        assert_eq!(key_preference("Am"), Some(Modifier::Natural));
        assert_eq!(key_preference("H"), None);
    }

    #[test]
    fn test_fixed_do_names() {
        assert_eq!(to_fixed_do("Bbm"), "Sibm");
        assert_eq!(to_fixed_do("G#"), "Sol#");
        assert_eq!(to_fixed_do("C"), "Do");
    }

    #[test]
    fn test_capo_tables() {
        let capos = capos_for(ChordType::Symbol, "A").unwrap();
        assert_eq!(capos.get(&2).map(String::as_str), Some("G"));
        assert_eq!(capos.get(&5).map(String::as_str), Some("E"));
        assert_eq!(capos.len(), MAX_CAPO as usize);

        let capos = capos_for(ChordType::Solfege, "La").unwrap();
        assert_eq!(capos.get(&2).map(String::as_str), Some("Sol"));

        let capos = capos_for(ChordType::Symbol, "Em").unwrap();
        assert_eq!(capos.get(&2).map(String::as_str), Some("Dm"));
    }

    #[test]
    fn test_reachable_keys() {
        let keys = reachable_keys(ChordType::Symbol, false).unwrap();
        assert_eq!(keys.len(), 14);
        assert_eq!(keys[0], "Bb");
        let keys = reachable_keys(ChordType::Solfege, true).unwrap();
        assert_eq!(keys[0], "Fa#m");
        assert!(reachable_keys(ChordType::Numeral, false).is_none());
    }
}
