//! Computer keyboard → note mapping
//!
//! Two rows of keys, laid out like a piano: the number row and the `q` row
//! make up the upper octave, the `a` and `z` rows the one above it.
//!
//! ```text
//!    `  1  2  3  4  5  6  7  8        a  s  d  f  g  h  j  k
//!      q     e  r     y  u              z     c  v     n  m
//! ```

use jamboard::notes;

/// Lowest and highest octave the `-` / `=` keys can select.
pub const OCTAVES: std::ops::RangeInclusive<u8> = 2..=5;
pub const DEFAULT_OCTAVE: u8 = 3;

/// Semitone offset from A of the current octave.
pub fn semitone(key: char) -> Option<i8> {
    let offset = match key {
        '`' => -1,
        '1' => 0,
        'q' => 1,
        '2' => 2,
        '3' => 3,
        'e' => 4,
        '4' => 5,
        'r' => 6,
        '5' => 7,
        '6' => 8,
        'y' => 9,
        '7' => 10,
        'u' => 11,
        '8' => 12,
        'a' => 12,
        'z' => 13,
        's' => 14,
        'd' => 15,
        'c' => 16,
        'f' => 17,
        'v' => 18,
        'g' => 19,
        'h' => 20,
        'n' => 21,
        'j' => 22,
        'm' => 23,
        'k' => 24,
        _ => return None,
    };
    Some(offset)
}

/// Note number for `key` played at `octave`, if it is a note key.
pub fn note_for(key: char, octave: u8) -> Option<u8> {
    let offset = semitone(key)?;
    let note = notes::note(octave, 0) as i16 + offset as i16;
    u8::try_from(note).ok().filter(|&n| n <= notes::MAX_NOTE)
}
