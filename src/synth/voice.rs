use crate::{NUM_CHANNELS, START_NOTE, TABLE_SIZE};

/// One polyphonic slot: wavetable read positions plus envelope progress.
///
/// Voices are created once with the pool and reused forever. All state
/// changes are plain arithmetic so the audio thread can drive them.
#[derive(Debug, Clone)]
pub struct Voice {
    triggered: bool,
    pitch_increment: f32,
    channel_positions: [f32; NUM_CHANNELS],
    envelope_position: u32,
}

impl Voice {
    pub fn new() -> Self {
        Self::with_pitch(START_NOTE)
    }

    pub fn with_pitch(pitch: f32) -> Self {
        Self {
            triggered: false,
            pitch_increment: clamp_pitch(pitch),
            channel_positions: [0.0; NUM_CHANNELS],
            envelope_position: 0,
        }
    }

    /// Start one channel's read position ahead of the others.
    pub fn with_phase_offset(mut self, channel: usize, offset: f32) -> Self {
        if let Some(pos) = self.channel_positions.get_mut(channel) {
            *pos = offset.rem_euclid(TABLE_SIZE as f32);
        }
        self
    }

    /// Rearm the envelope at a new pitch.
    ///
    /// Read positions are left alone so a retriggered voice keeps its phase
    /// instead of clicking back to zero.
    pub fn trigger(&mut self, pitch: f32) {
        self.pitch_increment = clamp_pitch(pitch);
        self.triggered = true;
        self.envelope_position = 0;
    }

    /// Change pitch without touching the envelope.
    pub fn retune(&mut self, pitch: f32) {
        self.pitch_increment = clamp_pitch(pitch);
    }

    /// Step one frame.
    ///
    /// `envelope_length` is the finite envelope's total length; `None` keeps a
    /// triggered voice sounding indefinitely.
    #[inline]
    pub fn advance(&mut self, envelope_length: Option<u32>) {
        let table_size = TABLE_SIZE as f32;
        for pos in self.channel_positions.iter_mut() {
            *pos += self.pitch_increment;
            if *pos >= table_size {
                *pos -= table_size;
            }
        }

        if let (true, Some(length)) = (self.triggered, envelope_length) {
            self.envelope_position = self.envelope_position.saturating_add(1);
            if self.envelope_position >= length {
                self.triggered = false;
                self.envelope_position = 0;
            }
        }
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn pitch_increment(&self) -> f32 {
        self.pitch_increment
    }

    #[inline]
    pub fn envelope_position(&self) -> u32 {
        self.envelope_position
    }

    /// Read position for `channel`; channels past the last reuse the last one.
    #[inline]
    pub fn channel_position(&self, channel: usize) -> f32 {
        self.channel_positions[channel.min(NUM_CHANNELS - 1)]
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the single-step wraparound in `advance` valid.
fn clamp_pitch(pitch: f32) -> f32 {
    if pitch.is_nan() {
        0.0
    } else {
        pitch.clamp(0.0, (TABLE_SIZE - 1) as f32)
    }
}
