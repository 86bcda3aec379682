//! Low-level DSP primitives used by the voice pool.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so the audio callback can call into them on every frame. They stay focused
//! on the signal math; orchestration lives in [`crate::synth`].

/// Attack/decay/sustain/release gain calculator.
pub mod envelope;
/// Master gain fader used to avoid clicks.
pub mod fader;
/// Single-period waveform storage and generation.
pub mod wavetable;

pub use envelope::{Adsr, Envelope};
pub use fader::{FadeState, Fader};
pub use wavetable::{WaveTable, Waveform};
