#![allow(non_upper_case_globals)]

/*
Note Table
==========

Notes are numbered from A: every octave starts on A and runs up to G#.

    note = 12 * octave + semitone
    semitone: A=0, A#=1, B=2, C=3, C#=4, D=5, D#=6, E=7, F=8, F#=9, G=10, G#=11

So A1 = 12, A3 = 36, A4 = 48. (This is NOT MIDI numbering.)

Pitch comes from a fixed table of twelve base frequencies (the A0 octave,
27.5 Hz and up), doubled once per octave:

    frequency = BASE_HZ[note % 12] * 2^(note / 12)

The synth does not think in Hz, though. A voice steps through the wavetable
by a pitch increment, and the increment for a note is its frequency over the
reference tuning:

    increment = frequency / REFERENCE_TUNING      (110 Hz)

e.g. A3 = 27.5 * 8 / 110 = 2.0, so the 400 sample table is read two samples
at a time.

The table is a `const`: built at compile time and shared by every thread.
*/

/// Frequencies (Hz) of the lowest octave, A0 up to G#0.
pub const BASE_HZ: [f32; 12] = [
    27.5, 29.14, 30.87, 32.7, 34.65, 36.71, 38.89, 41.2, 43.65, 46.25, 49.0, 51.91,
];

/// Frequency whose pitch increment is exactly 1.0.
pub const REFERENCE_TUNING: f32 = 110.0;

pub const NOTE_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

// Octave 1
pub const A1: u8 = 12;
pub const As1: u8 = 13;
pub const B1: u8 = 14;
pub const C1: u8 = 15;
pub const Cs1: u8 = 16;
pub const D1: u8 = 17;
pub const Ds1: u8 = 18;
pub const E1: u8 = 19;
pub const F1: u8 = 20;
pub const Fs1: u8 = 21;
pub const G1: u8 = 22;
pub const Gs1: u8 = 23;

// Octave 2
pub const A2: u8 = 24;
pub const As2: u8 = 25;
pub const B2: u8 = 26;
pub const C2: u8 = 27;
pub const Cs2: u8 = 28;
pub const D2: u8 = 29;
pub const Ds2: u8 = 30;
pub const E2: u8 = 31;
pub const F2: u8 = 32;
pub const Fs2: u8 = 33;
pub const G2: u8 = 34;
pub const Gs2: u8 = 35;

// Octave 3
pub const A3: u8 = 36;
pub const As3: u8 = 37;
pub const B3: u8 = 38;
pub const C3: u8 = 39;
pub const Cs3: u8 = 40;
pub const D3: u8 = 41;
pub const Ds3: u8 = 42;
pub const E3: u8 = 43;
pub const F3: u8 = 44;
pub const Fs3: u8 = 45;
pub const G3: u8 = 46;
pub const Gs3: u8 = 47;

// Octave 4
pub const A4: u8 = 48;
pub const As4: u8 = 49;
pub const B4: u8 = 50;
pub const C4: u8 = 51;
pub const Cs4: u8 = 52;
pub const D4: u8 = 53;
pub const Ds4: u8 = 54;
pub const E4: u8 = 55;
pub const F4: u8 = 56;
pub const Fs4: u8 = 57;
pub const G4: u8 = 58;
pub const Gs4: u8 = 59;

// Octave 5
pub const A5: u8 = 60;
pub const As5: u8 = 61;
pub const B5: u8 = 62;
pub const C5: u8 = 63;
pub const Cs5: u8 = 64;
pub const D5: u8 = 65;
pub const Ds5: u8 = 66;
pub const E5: u8 = 67;
pub const F5: u8 = 68;
pub const Fs5: u8 = 69;
pub const G5: u8 = 70;
pub const Gs5: u8 = 71;

/// Highest note whose increment still fits inside one table period.
pub const MAX_NOTE: u8 = 96;

#[inline]
pub fn note(octave: u8, semitone: u8) -> u8 {
    octave.saturating_mul(12).saturating_add(semitone)
}

/// Frequency in Hz. Notes above [`MAX_NOTE`] are clamped to it.
pub fn frequency(note: u8) -> f32 {
    let note = note.min(MAX_NOTE);
    let base = BASE_HZ[(note % 12) as usize];
    base * 2.0_f32.powi((note / 12) as i32)
}

/// Per-sample wavetable step that plays `note`.
pub fn pitch_increment(note: u8) -> f32 {
    frequency(note) / REFERENCE_TUNING
}

/// Display name and octave, e.g. `("C#", 3)` for [`Cs3`].
pub fn name(note: u8) -> (&'static str, u8) {
    (NOTE_NAMES[(note % 12) as usize], note / 12)
}
