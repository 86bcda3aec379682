use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CUSTOM_MAX_AMP, HIGHEST_HARMONIC, SINE_MAX_AMP, SQUARE_MAX_AMP, TABLE_SIZE};

/*
Wavetable Synthesis
===================

A wavetable holds exactly ONE period of a waveform as a fixed array of
samples. To play it back we walk an index through the table and wrap around
at the end:

    index:    0 ........ 100 ........ 200 ........ 300 ........ 399 | 0 ...
    sine:     0    ╱‾‾‾‾‾‾╲         0          ╲______╱          0  | 0
              start   peak        zero         trough         end | wrap

The step we take per output sample (the "pitch increment") sets the pitch.
With TABLE_SIZE = 400 at 44.1kHz:

    frequency = increment * sample_rate / TABLE_SIZE
              = increment * 110.25 Hz

so an increment of 2.0 plays the table 220.5 times per second. Fractional
increments are fine: the read position is a float, truncated on lookup.


The Three Timbres
-----------------

Sine: the pure tone, SINE_MAX_AMP * sin(2π·i/N).

Square: a *pseudo* square. A true square jumps from +A to -A in one sample,
which clicks and aliases badly at a table this short. Instead every edge is
a 10 sample linear ramp:

    +A      ┌────────────────┐
           ╱                  ╲
     0 ───╱                    ╲      ╱───
                                ╲    ╱
    -A                           └──┘ (and the low plateau runs to 390)

      [0,10) up   [10,190) high   [190,210) down through zero
      [210,390) low   [390,400) back up to zero

Custom: additive synthesis. The user picks an amplitude (0-100) for each of
HIGHEST_HARMONIC partials and we sum scaled sine waves:

    samples[i] = Σ_h sine_ref[(i · 2^h) mod N] · amp[h] / Σamp · CUSTOM_MAX_AMP

Reading the reference sine at i·2^h plays it 2^h times per period, so the
partials are OCTAVE spaced (1x, 2x, 4x, 8x, ...) rather than the usual
integer harmonic series. That is the jamboard sound; keep it.

If every amplitude is zero, Σamp is zero. We produce silence instead of
dividing by zero and filling the table with NaN.


Threading
---------

Regenerating a table touches all N samples; never do it to the table the
audio thread is reading. Build a fresh WaveTable on the control thread and
hand it over whole (see synth::handle and PolySynth::stage_wavetable).
*/

/// The timbre a wavetable was generated from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    #[default]
    Square,
    /// Relative amplitude (0-100) of each octave-spaced partial.
    Custom([u8; HIGHEST_HARMONIC]),
}

impl Waveform {
    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Custom(_) => "custom",
        }
    }
}

/// One period of a waveform, read by every voice in the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveTable {
    samples: [f32; TABLE_SIZE],
    harmonics: [u8; HIGHEST_HARMONIC],
    waveform: Waveform,
}

/// Unit sine used as the source for custom timbres.
///
/// Computed once per process and never written again, so any thread may read it.
fn sine_reference() -> &'static [f32; TABLE_SIZE] {
    static SINE: OnceLock<[f32; TABLE_SIZE]> = OnceLock::new();
    SINE.get_or_init(|| {
        let mut table = [0.0; TABLE_SIZE];
        for (i, sample) in table.iter_mut().enumerate() {
            let phase = (i as f64 / TABLE_SIZE as f64) * std::f64::consts::TAU;
            *sample = phase.sin() as f32;
        }
        table
    })
}

impl WaveTable {
    /// A pseudo-square table, the timbre the synth starts with.
    pub fn new() -> Self {
        let mut table = Self {
            samples: [0.0; TABLE_SIZE],
            harmonics: [0; HIGHEST_HARMONIC],
            waveform: Waveform::Square,
        };
        table.set_square();
        table
    }

    pub fn from_waveform(waveform: Waveform) -> Self {
        let mut table = Self::new();
        table.set_waveform(waveform);
        table
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        match waveform {
            Waveform::Sine => self.set_sine(),
            Waveform::Square => self.set_square(),
            Waveform::Custom(harmonics) => self.set_custom(harmonics),
        }
    }

    pub fn set_sine(&mut self) {
        for (i, sample) in self.samples.iter_mut().enumerate() {
            let phase = (i as f64 / TABLE_SIZE as f64) * std::f64::consts::TAU;
            *sample = SINE_MAX_AMP * phase.sin() as f32;
        }
        self.waveform = Waveform::Sine;
    }

    pub fn set_square(&mut self) {
        for (i, sample) in self.samples.iter_mut().enumerate() {
            *sample = square_sample(i);
        }
        self.waveform = Waveform::Square;
    }

    /// Additive synthesis from octave-spaced partials.
    ///
    /// Amplitudes above 100 are clamped. All-zero amplitudes yield silence.
    pub fn set_custom(&mut self, harmonics: [u8; HIGHEST_HARMONIC]) {
        let harmonics = harmonics.map(|amp| amp.min(100));
        let scale: f32 = harmonics.iter().map(|&amp| amp as f32).sum();
        let sine = sine_reference();

        self.harmonics = harmonics;
        self.waveform = Waveform::Custom(harmonics);

        if scale == 0.0 {
            self.samples.fill(0.0);
            return;
        }

        for (i, sample) in self.samples.iter_mut().enumerate() {
            let mut total = 0.0;
            for (h, &amp) in harmonics.iter().enumerate() {
                if amp == 0 {
                    continue;
                }
                let index = ((i as u64) << h) % TABLE_SIZE as u64;
                total += sine[index as usize] * (amp as f32 / scale) * CUSTOM_MAX_AMP;
            }
            *sample = total;
        }
    }

    /// Truncating lookup; `position` wraps modulo the table length.
    #[inline]
    pub fn sample_at(&self, position: f32) -> f32 {
        let index = position as usize % TABLE_SIZE;
        self.samples[index]
    }

    pub fn samples(&self) -> &[f32; TABLE_SIZE] {
        &self.samples
    }

    /// Amplitudes last passed to [`WaveTable::set_custom`].
    pub fn harmonics(&self) -> &[u8; HIGHEST_HARMONIC] {
        &self.harmonics
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Largest absolute sample value in the table.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Breakpoints are fixed for a 400 sample table: 10 sample ramps at every edge.
fn square_sample(i: usize) -> f32 {
    let amp = SQUARE_MAX_AMP;
    match i {
        0..=9 => amp * (i as f32 * 0.1),
        10..=189 => amp,
        190..=199 => amp * (1.0 - (i - 190) as f32 * 0.1),
        200..=209 => amp * -((i - 200) as f32 * 0.1),
        210..=389 => -amp,
        _ => amp * (-1.0 + (i - 390) as f32 * 0.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_square() {
        let table = WaveTable::new();
        assert_eq!(table.waveform(), Waveform::Square);
        assert_eq!(table.samples()[100], SQUARE_MAX_AMP);
    }

    #[test]
    fn sine_peaks_at_quarter_period() {
        let mut table = WaveTable::new();
        table.set_sine();

        assert_eq!(table.samples()[0], 0.0);
        assert!((table.samples()[TABLE_SIZE / 4] - SINE_MAX_AMP).abs() < 1e-6);
        assert!((table.samples()[3 * TABLE_SIZE / 4] + SINE_MAX_AMP).abs() < 1e-6);
        assert!(table.peak() <= SINE_MAX_AMP + 1e-6);
    }

    #[test]
    fn sine_is_idempotent() {
        let mut table = WaveTable::new();
        table.set_sine();
        let first = *table.samples();
        table.set_sine();
        assert_eq!(&first, table.samples());
    }

    #[test]
    fn square_plateaus_and_ramps() {
        let mut table = WaveTable::new();
        table.set_sine();
        table.set_square();
        let s = table.samples();

        assert_eq!(s[0], 0.0);
        assert_eq!(s[100], SQUARE_MAX_AMP);
        assert_eq!(s[300], -SQUARE_MAX_AMP);
        assert_eq!(s[200], 0.0);

        // ramps are monotonic
        for i in 1..10 {
            assert!(s[i] > s[i - 1]);
        }
        for i in 191..210 {
            assert!(s[i] < s[i - 1]);
        }
        for i in 391..TABLE_SIZE {
            assert!(s[i] > s[i - 1]);
        }
    }

    #[test]
    fn square_has_no_large_jumps() {
        let table = WaveTable::new();
        let s = table.samples();
        for i in 0..TABLE_SIZE {
            let next = s[(i + 1) % TABLE_SIZE];
            assert!((next - s[i]).abs() <= SQUARE_MAX_AMP * 0.1 + 1e-6, "jump at {i}");
        }
    }

    #[test]
    fn custom_all_zero_is_silent() {
        let mut table = WaveTable::new();
        table.set_custom([0; HIGHEST_HARMONIC]);

        assert!(table.samples().iter().all(|&s| s == 0.0));
        assert!(matches!(table.waveform(), Waveform::Custom(_)));
    }

    #[test]
    fn custom_fundamental_is_scaled_sine() {
        let mut harmonics = [0; HIGHEST_HARMONIC];
        harmonics[0] = 40;

        let mut table = WaveTable::new();
        table.set_custom(harmonics);

        let sine = sine_reference();
        for i in 0..TABLE_SIZE {
            assert!((table.samples()[i] - sine[i] * CUSTOM_MAX_AMP).abs() < 1e-7);
        }
        assert_eq!(table.harmonics(), &harmonics);
    }

    #[test]
    fn custom_ignores_previous_contents() {
        let harmonics = [100, 50, 25, 0, 0, 0, 0, 0, 0, 0];

        let mut from_square = WaveTable::new();
        from_square.set_custom(harmonics);

        let mut from_sine = WaveTable::new();
        from_sine.set_sine();
        from_sine.set_custom(harmonics);

        assert_eq!(from_square.samples(), from_sine.samples());
        assert!(from_square.peak() <= CUSTOM_MAX_AMP + 1e-6);
    }

    #[test]
    fn custom_clamps_amplitudes() {
        let mut table = WaveTable::new();
        table.set_custom([255, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(table.harmonics()[0], 100);
    }

    #[test]
    fn lookup_truncates_and_wraps() {
        let table = WaveTable::from_waveform(Waveform::Sine);
        assert_eq!(table.sample_at(100.9), table.samples()[100]);
        assert_eq!(table.sample_at(TABLE_SIZE as f32 + 5.2), table.samples()[5]);
    }
}
