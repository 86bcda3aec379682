#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use crate::{
    dsp::{FadeState, WaveTable, Waveform},
    MAX_VOICES,
};

/// Control thread → audio thread.
#[derive(Debug)]
pub enum SynthMessage {
    /// `note` is echoed back in the resulting event.
    TriggerNote { pitch: f32, note: Option<u8> },
    /// A fully built table, swapped in once playback is silent.
    SetWaveTable(Box<WaveTable>),
    FadeIn,
    FadeOut,
}

/// Audio thread → control thread.
#[derive(Debug)]
pub enum SynthEvent {
    NoteStarted {
        voice: usize,
        pitch: f32,
        note: Option<u8>,
    },
    /// No free voice; the note was dropped.
    NoteDropped { pitch: f32, note: Option<u8> },
    WaveformApplied(Waveform),
    /// A table that is no longer used. Dropping it here keeps deallocation
    /// off the audio thread.
    Retired(Box<WaveTable>),
    Silent,
    Steady,
    Meters(MeterSnapshot),
}

/// Per-voice envelope levels at the end of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSnapshot {
    pub levels: [f32; MAX_VOICES],
    pub voices: u8,
    pub master: f32,
    pub fade: FadeState,
}

impl MeterSnapshot {
    pub fn levels(&self) -> &[f32] {
        &self.levels[..self.voices as usize]
    }
}

impl Default for MeterSnapshot {
    fn default() -> Self {
        Self {
            levels: [0.0; MAX_VOICES],
            voices: 0,
            master: 0.0,
            fade: FadeState::Silent,
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

/// Non-blocking event outlet. A full outlet hands the event back.
pub trait EventSender {
    fn push(&mut self, event: SynthEvent) -> Result<(), SynthEvent>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl EventSender for Producer<SynthEvent> {
    fn push(&mut self, event: SynthEvent) -> Result<(), SynthEvent> {
        match Producer::push(self, event) {
            Ok(()) => Ok(()),
            Err(rtrb::PushError::Full(event)) => Err(event),
        }
    }
}
