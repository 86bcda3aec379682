use std::time::{Duration, Instant};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    config::SynthConfig,
    dsp::{WaveTable, Waveform},
    notes,
    synth::{
        engine::Engine,
        message::{SynthEvent, SynthMessage},
    },
};

/// The engine a [`channel`] hands to the audio thread.
pub type RtEngine = Engine<Consumer<SynthMessage>, Producer<SynthEvent>>;

/// The message ring to the audio thread is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    QueueFull,
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::QueueFull => write!(f, "synth message queue is full"),
        }
    }
}

impl std::error::Error for SendError {}

/// Build a connected control handle and audio engine.
///
/// Move the engine into the audio callback; keep the handle on the
/// control thread.
pub fn channel(config: &SynthConfig) -> (SynthHandle, RtEngine) {
    let capacity = config.queue_capacity.max(1);
    let (tx, engine_rx) = RingBuffer::<SynthMessage>::new(capacity);
    // Meters arrive every block, so give events more headroom.
    let (engine_tx, rx) = RingBuffer::<SynthEvent>::new(capacity * 4);

    let handle = SynthHandle {
        tx,
        rx,
        waveform: config.waveform,
    };
    let engine = Engine::new(config, engine_rx, engine_tx);
    (handle, engine)
}

/// Control-thread side of the synth.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
    rx: Consumer<SynthEvent>,
    waveform: Waveform,
}

impl SynthHandle {
    pub fn trigger_note(&mut self, pitch: f32) -> Result<(), SendError> {
        self.send(SynthMessage::TriggerNote { pitch, note: None })
    }

    /// Trigger by note number (see [`notes`]). The number comes back in the
    /// `NoteStarted`/`NoteDropped` event.
    pub fn trigger(&mut self, note: u8) -> Result<(), SendError> {
        self.send(SynthMessage::TriggerNote {
            pitch: notes::pitch_increment(note),
            note: Some(note),
        })
    }

    /// Build the table for `waveform` here and ship it to the audio thread.
    pub fn set_waveform(&mut self, waveform: Waveform) -> Result<(), SendError> {
        let table = Box::new(WaveTable::from_waveform(waveform));
        self.send(SynthMessage::SetWaveTable(table))?;
        self.waveform = waveform;
        Ok(())
    }

    pub fn fade_in(&mut self) -> Result<(), SendError> {
        self.send(SynthMessage::FadeIn)
    }

    pub fn fade_out(&mut self) -> Result<(), SendError> {
        self.send(SynthMessage::FadeOut)
    }

    /// The waveform most recently requested.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn poll_event(&mut self) -> Option<SynthEvent> {
        self.rx.pop().ok()
    }

    /// Drain pending events without blocking.
    ///
    /// Retired tables come out of here too; dropping them frees their memory
    /// on this thread.
    pub fn poll_events(&mut self) -> impl Iterator<Item = SynthEvent> + '_ {
        std::iter::from_fn(move || self.poll_event())
    }

    /// Poll until an event matches or `timeout` passes.
    ///
    /// Non-matching events are discarded. Returns whether a match was seen.
    pub fn wait_for<F>(&mut self, timeout: Duration, mut matches: F) -> bool
    where
        F: FnMut(&SynthEvent) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            while let Some(event) = self.poll_event() {
                if matches(&event) {
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    fn send(&mut self, msg: SynthMessage) -> Result<(), SendError> {
        match self.tx.push(msg) {
            Ok(()) => Ok(()),
            Err(PushError::Full(_)) => Err(SendError::QueueFull),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_queue_reports_error() {
        let config = SynthConfig::new().queue_capacity(2);
        let (mut handle, _engine) = channel(&config);
        handle.trigger_note(2.0).unwrap();
        handle.trigger_note(2.0).unwrap();
        assert_eq!(handle.trigger_note(2.0), Err(SendError::QueueFull));
    }

    #[test]
    fn failed_waveform_send_keeps_old_waveform() {
        let config = SynthConfig::new().queue_capacity(1);
        let (mut handle, _engine) = channel(&config);
        handle.fade_in().unwrap();
        assert!(handle.set_waveform(Waveform::Sine).is_err());
        assert_eq!(handle.waveform(), Waveform::Square);
    }

    #[test]
    fn wait_for_times_out() {
        let (mut handle, _engine) = channel(&SynthConfig::new());
        let start = Instant::now();
        assert!(!handle.wait_for(Duration::from_millis(20), |e| {
            matches!(e, SynthEvent::Silent)
        }));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn wait_for_sees_engine_event() {
        let config = SynthConfig::new().start_gain(1.0).fade_increment(0.5);
        let (mut handle, mut engine) = channel(&config);
        handle.fade_out().unwrap();

        let audio = std::thread::spawn(move || {
            let mut out = [0.0f32; 16];
            engine.render(&mut out, 2);
        });
        assert!(handle.wait_for(Duration::from_secs(2), |e| {
            matches!(e, SynthEvent::Silent)
        }));
        audio.join().unwrap();
    }
}
