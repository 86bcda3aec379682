#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{Envelope, Waveform},
    DEFAULT_NUM_VOICES, FADE_INCREMENT, MAX_VOICES,
};

/// How voice outputs are combined before the master gain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MixScaling {
    /// Plain sum. A full pool can exceed the table's peak amplitude.
    Sum,
    /// Sum divided by pool size, so the mix never exceeds one voice's peak.
    #[default]
    PerVoice,
}

/// Everything needed to build a [`PolySynth`](crate::PolySynth).
///
/// ```ignore
/// let config = SynthConfig::new()
///     .voices(8)
///     .waveform(Waveform::Sine)
///     .mix_scaling(MixScaling::Sum);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub voices: usize,
    pub envelope: Envelope,
    pub waveform: Waveform,
    pub mix_scaling: MixScaling,
    /// Master gain change per frame while fading.
    pub fade_increment: f32,
    /// Master gain before the first fade. Silent unless set.
    pub start_gain: f32,
    /// Capacity of the control → audio and audio → control rings.
    pub queue_capacity: usize,
}

impl SynthConfig {
    pub fn new() -> Self {
        Self {
            voices: DEFAULT_NUM_VOICES,
            envelope: Envelope::default(),
            waveform: Waveform::Square,
            mix_scaling: MixScaling::default(),
            fade_increment: FADE_INCREMENT,
            start_gain: 0.0,
            queue_capacity: 64,
        }
    }

    /// Single drone voice with no auto-release.
    pub fn continuous() -> Self {
        Self::new().voices(1).envelope(Envelope::continuous())
    }

    /// Pool size, clamped to `1..=MAX_VOICES`.
    pub fn voices(mut self, voices: usize) -> Self {
        self.voices = voices.clamp(1, MAX_VOICES);
        self
    }

    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn mix_scaling(mut self, scaling: MixScaling) -> Self {
        self.mix_scaling = scaling;
        self
    }

    pub fn fade_increment(mut self, increment: f32) -> Self {
        self.fade_increment = increment;
        self
    }

    pub fn start_gain(mut self, gain: f32) -> Self {
        self.start_gain = gain.clamp(0.0, 1.0);
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self::new()
    }
}
