use crate::{
    config::SynthConfig,
    dsp::{FadeState, WaveTable},
    synth::{
        message::{EventSender, MessageReceiver, MeterSnapshot, SynthEvent, SynthMessage},
        poly::PolySynth,
    },
    MAX_VOICES,
};

/// Retired tables held back while the event ring is full.
const RETIRE_SLOTS: usize = 4;

/// Audio-thread side of the synth.
///
/// Owns the [`PolySynth`] outright. Each [`Engine::render`] call drains
/// pending control messages, renders the block, and reports what happened.
/// Nothing in here locks or allocates once constructed, and no wavetable is
/// ever dropped here: while the outbox is full, table swaps wait.
pub struct Engine<R, E> {
    synth: PolySynth,
    rx: R,
    events: E,
    outbox: Vec<Box<WaveTable>>,
    reported_fade: FadeState,
}

impl<R, E> Engine<R, E>
where
    R: MessageReceiver,
    E: EventSender,
{
    pub fn new(config: &SynthConfig, rx: R, events: E) -> Self {
        let synth = PolySynth::new(config);
        let reported_fade = synth.fade_state();
        Self {
            synth,
            rx,
            events,
            outbox: Vec::with_capacity(RETIRE_SLOTS),
            reported_fade,
        }
    }

    /// Fill an interleaved output buffer.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        self.drain_messages();
        self.synth.render_block(out, channels);
        self.report();
    }

    fn has_retire_slot(&self) -> bool {
        self.outbox.len() < RETIRE_SLOTS
    }

    fn drain_messages(&mut self) {
        // A restage can displace a table, so stop while there is nowhere to
        // put one. The rest stays queued for a later block.
        while self.has_retire_slot() {
            let msg = match self.rx.pop() {
                Some(msg) => msg,
                None => break,
            };
            match msg {
                SynthMessage::TriggerNote { pitch, note } => {
                    let event = match self.synth.trigger_note(pitch) {
                        Ok(voice) => SynthEvent::NoteStarted { voice, pitch, note },
                        Err(_) => SynthEvent::NoteDropped { pitch, note },
                    };
                    let _ = self.events.push(event);
                }
                SynthMessage::SetWaveTable(table) => {
                    if let Some(displaced) = self.synth.stage_wavetable(table) {
                        self.retire(displaced);
                    }
                }
                SynthMessage::FadeIn => self.synth.fade_in(),
                SynthMessage::FadeOut => self.synth.fade_out(),
            }
        }
    }

    fn report(&mut self) {
        self.flush_outbox();
        // Left uncollected, `retired` holds back the next publish.
        if self.has_retire_slot() {
            if let Some(old) = self.synth.take_retired() {
                let applied = self.synth.wavetable().waveform();
                let _ = self.events.push(SynthEvent::WaveformApplied(applied));
                self.retire(old);
            }
        }

        let fade = self.synth.fade_state();
        if fade != self.reported_fade {
            let event = match fade {
                FadeState::Silent => Some(SynthEvent::Silent),
                FadeState::Steady => Some(SynthEvent::Steady),
                _ => None,
            };
            match event {
                Some(event) => {
                    if self.events.push(event).is_ok() {
                        self.reported_fade = fade;
                    }
                }
                None => self.reported_fade = fade,
            }
        }

        let _ = self.events.push(SynthEvent::Meters(self.meter_snapshot()));
    }

    /// Callers make sure a retire slot is free.
    fn retire(&mut self, table: Box<WaveTable>) {
        if let Err(SynthEvent::Retired(table)) = self.events.push(SynthEvent::Retired(table)) {
            debug_assert!(self.has_retire_slot());
            self.outbox.push(table);
        }
    }

    fn flush_outbox(&mut self) {
        while let Some(table) = self.outbox.pop() {
            if let Err(SynthEvent::Retired(table)) = self.events.push(SynthEvent::Retired(table)) {
                self.outbox.push(table);
                break;
            }
        }
    }

    pub fn meter_snapshot(&self) -> MeterSnapshot {
        let voices = self.synth.voices().len().min(MAX_VOICES);
        let mut snapshot = MeterSnapshot {
            voices: voices as u8,
            master: self.synth.master_gain(),
            fade: self.synth.fade_state(),
            ..MeterSnapshot::default()
        };
        for (i, level) in snapshot.levels[..voices].iter_mut().enumerate() {
            *level = self.synth.voice_level(i);
        }
        snapshot
    }

    pub fn synth(&self) -> &PolySynth {
        &self.synth
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{dsp::Waveform, notes, synth::handle, HIGHEST_HARMONIC, TABLE_SIZE};

    /// Event outlet whose reader can stop listening.
    #[derive(Default)]
    struct Gate {
        open: bool,
        seen: Vec<SynthEvent>,
    }

    impl EventSender for Gate {
        fn push(&mut self, event: SynthEvent) -> Result<(), SynthEvent> {
            if self.open {
                self.seen.push(event);
                Ok(())
            } else {
                Err(event)
            }
        }
    }

    impl MessageReceiver for VecDeque<SynthMessage> {
        fn pop(&mut self) -> Option<SynthMessage> {
            self.pop_front()
        }
    }

    fn numbered_table(n: u8) -> Box<WaveTable> {
        let mut harmonics = [0; HIGHEST_HARMONIC];
        harmonics[0] = n;
        Box::new(WaveTable::from_waveform(Waveform::Custom(harmonics)))
    }

    #[test]
    fn trigger_reports_voice() {
        let (mut handle, mut engine) = handle::channel(&SynthConfig::new().voices(1));
        handle.trigger_note(2.0).unwrap();
        handle.trigger_note(2.0).unwrap();

        let mut out = vec![0.0; 64];
        engine.render(&mut out, 2);

        let events: Vec<SynthEvent> = handle.poll_events().collect();
        assert!(matches!(events[0], SynthEvent::NoteStarted { voice: 0, .. }));
        assert!(matches!(events[1], SynthEvent::NoteDropped { .. }));
    }

    #[test]
    fn trigger_echoes_note_number() {
        let (mut handle, mut engine) = handle::channel(&SynthConfig::new().voices(1));
        handle.trigger(notes::A3).unwrap();
        handle.trigger(notes::C3).unwrap();
        handle.trigger_note(2.0).unwrap();

        let mut out = vec![0.0; 64];
        engine.render(&mut out, 2);

        let events: Vec<SynthEvent> = handle.poll_events().collect();
        assert!(matches!(
            events[0],
            SynthEvent::NoteStarted { note: Some(notes::A3), .. }
        ));
        assert!(matches!(
            events[1],
            SynthEvent::NoteDropped { note: Some(notes::C3), .. }
        ));
        assert!(matches!(events[2], SynthEvent::NoteDropped { note: None, .. }));
    }

    #[test]
    fn closed_event_ring_never_loses_a_table() {
        // Starts silent, so every staged table goes live at once.
        let mut engine = Engine::new(&SynthConfig::new(), VecDeque::new(), Gate::default());
        let mut out = [0.0f32; 2 * 8];

        for n in 1..=6 {
            engine.rx.push_back(SynthMessage::SetWaveTable(numbered_table(n)));
            engine.render(&mut out, 2);
            assert!(engine.outbox.len() <= RETIRE_SLOTS);
        }
        // Four held back, table 4 live, two swaps still queued.
        assert_eq!(engine.outbox.len(), RETIRE_SLOTS);
        assert_eq!(engine.rx.len(), 2);
        assert_eq!(engine.synth().wavetable().harmonics()[0], 4);

        engine.events.open = true;
        for _ in 0..4 {
            engine.render(&mut out, 2);
        }

        let mut retired: Vec<Waveform> = engine
            .events
            .seen
            .drain(..)
            .filter_map(|e| match e {
                SynthEvent::Retired(table) => Some(table.waveform()),
                _ => None,
            })
            .collect();
        retired.sort_by_key(|w| match w {
            Waveform::Custom(h) => h[0],
            _ => 0,
        });
        let mut expected = vec![Waveform::Square];
        expected.extend((1..=5).map(|n| numbered_table(n).waveform()));
        assert_eq!(retired, expected);
        assert!(engine.outbox.is_empty());
        assert!(engine.rx.is_empty());
        assert_eq!(engine.synth().wavetable().harmonics()[0], 6);
    }

    #[test]
    fn waveform_change_round_trip() {
        let config = SynthConfig::new().start_gain(1.0).fade_increment(0.1);
        let (mut handle, mut engine) = handle::channel(&config);
        handle.set_waveform(Waveform::Sine).unwrap();

        let mut out = vec![0.0; 2 * 32];
        engine.render(&mut out, 2);

        let mut applied = false;
        let mut retired = false;
        for event in handle.poll_events() {
            match event {
                SynthEvent::WaveformApplied(Waveform::Sine) => applied = true,
                SynthEvent::Retired(table) => {
                    assert_eq!(table.waveform(), Waveform::Square);
                    retired = true;
                }
                _ => {}
            }
        }
        assert!(applied && retired);
        assert_eq!(engine.synth().wavetable().waveform(), Waveform::Sine);
    }

    #[test]
    fn fade_events() {
        let config = SynthConfig::new().fade_increment(0.5);
        let (mut handle, mut engine) = handle::channel(&config);
        let mut out = vec![0.0; 2 * 8];

        handle.fade_in().unwrap();
        engine.render(&mut out, 2);
        assert!(handle.poll_events().any(|e| matches!(e, SynthEvent::Steady)));

        handle.fade_out().unwrap();
        engine.render(&mut out, 2);
        assert!(handle.poll_events().any(|e| matches!(e, SynthEvent::Silent)));
    }

    #[test]
    fn meters_track_voices() {
        let config = SynthConfig::continuous().start_gain(1.0);
        let (mut handle, mut engine) = handle::channel(&config);
        handle.trigger_note(1.0).unwrap();

        let mut out = vec![0.0; 2 * TABLE_SIZE];
        engine.render(&mut out, 2);

        let meters = handle
            .poll_events()
            .filter_map(|e| match e {
                SynthEvent::Meters(m) => Some(m),
                _ => None,
            })
            .last()
            .expect("meters sent every block");
        assert_eq!(meters.levels(), &[1.0]);
        assert_eq!(meters.master, 1.0);
    }
}
