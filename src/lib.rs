pub mod config; // Synth construction parameters
pub mod dsp;
pub mod notes; // Base frequency table and pitch increments
pub mod synth; // Voice pool, mixing, and the audio/control hand-off

pub use config::{MixScaling, SynthConfig};
pub use dsp::{Envelope, Fader, WaveTable, Waveform};
pub use synth::{PolySynth, TriggerError, Voice};

/// Samples in one wavetable period.
pub const TABLE_SIZE: usize = 400;
/// Interleaved output channels (stereo).
pub const NUM_CHANNELS: usize = 2;
pub const SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_NUM_VOICES: usize = 6;
/// Upper bound on the voice pool; keeps meter snapshots fixed-size.
pub const MAX_VOICES: usize = 16;
/// Harmonics available to the custom timbre.
pub const HIGHEST_HARMONIC: usize = 10;

pub const SINE_MAX_AMP: f32 = 0.5;
pub const SQUARE_MAX_AMP: f32 = 0.05;
pub const CUSTOM_MAX_AMP: f32 = 0.01;

/// Pitch increment of the note the engine idles on (roughly A 220).
pub const START_NOTE: f32 = 2.0275;
/// Master gain step per frame: about 0.75s for a full fade at 44.1kHz.
pub const FADE_INCREMENT: f32 = 0.000_03;
