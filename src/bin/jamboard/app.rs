//! Jamboard - session builder, event loop, and key handling

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use jamboard::{
    dsp::FadeState,
    notes,
    synth::{self, MeterSnapshot, SynthEvent, SynthHandle},
    SynthConfig, Waveform, HIGHEST_HARMONIC, SAMPLE_RATE,
};
use ratatui::DefaultTerminal;

use crate::{
    audio::{self, AudioOutput},
    keymap,
    ui::{
        self,
        editor::{EditorOutcome, HarmonicEditor},
        log::MessageLog,
        spectrum::SpectrumAnalyzer,
    },
};

/// Samples kept for the oscilloscope and spectrum.
pub const VIS_BUFFER_SIZE: usize = 1024;
/// How long quitting waits for the fade-out to reach silence.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Application builder
pub struct Jamboard {
    config: SynthConfig,
    octave: u8,
}

impl Jamboard {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            octave: keymap::DEFAULT_OCTAVE,
        }
    }

    /// Starting keyboard octave, clamped to the playable range.
    pub fn octave(mut self, octave: u8) -> Self {
        self.octave = octave.clamp(*keymap::OCTAVES.start(), *keymap::OCTAVES.end());
        self
    }

    /// Open audio, take over the terminal, and play until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let (handle, engine) = synth::channel(&self.config);
        let audio = audio::start(engine)?;

        println!("=== jamboard ===");
        println!("Device: {}", audio.device_name);
        println!("Sample rate: {} Hz", audio.sample_rate);
        println!("Channels: {}", audio.channels);
        if self.config.envelope.is_continuous() {
            println!("Mode: continuous");
        } else {
            println!("Voices: {}", self.config.voices);
        }
        println!();

        let mut session = Session::new(handle, audio, &self.config, self.octave);
        session.start();

        let mut terminal = ratatui::init();
        let res = session.run(&mut terminal);
        ratatui::restore();

        session.shutdown();
        res
    }
}

/// Everything the UI loop owns while playing.
pub struct Session {
    handle: SynthHandle,
    audio: AudioOutput,
    pub octave: u8,
    pub continuous: bool,
    pub waveform: Waveform,
    pub custom: [u8; HIGHEST_HARMONIC],
    pub editor: Option<HarmonicEditor>,
    pub show_help: bool,
    pub log: MessageLog,
    pub meters: MeterSnapshot,
    pub last_note: Option<u8>,
    pub scope: Vec<f32>,
    pub spectrum: SpectrumAnalyzer,
    should_quit: bool,
}

impl Session {
    fn new(handle: SynthHandle, audio: AudioOutput, config: &SynthConfig, octave: u8) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, audio.sample_rate as f32);
        Self {
            waveform: handle.waveform(),
            handle,
            audio,
            octave,
            continuous: config.envelope.is_continuous(),
            custom: [0; HIGHEST_HARMONIC],
            editor: None,
            show_help: false,
            log: MessageLog::new(64),
            meters: MeterSnapshot::default(),
            last_note: None,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            should_quit: false,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    fn start(&mut self) {
        if self.audio.sample_rate != SAMPLE_RATE {
            self.log.warn(format!(
                "device runs at {} Hz, pitches are scaled by {:.3}",
                self.audio.sample_rate,
                self.audio.sample_rate as f32 / SAMPLE_RATE as f32
            ));
        }
        if let Err(err) = self.handle.fade_in() {
            self.log.error(err.to_string());
        }
        self.log.info("Press Z for help");
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_events();

            terminal.draw(|frame| ui::render(frame, &*self))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    /// Fade out, wait for silence, then close the stream.
    fn shutdown(mut self) {
        println!("Fading out...");
        if self.handle.fade_out().is_ok() && self.meters.fade != FadeState::Silent {
            let silent = self
                .handle
                .wait_for(SHUTDOWN_TIMEOUT, |e| matches!(e, SynthEvent::Silent));
            if !silent {
                eprintln!("fade-out did not finish, closing anyway");
            }
        }
        drop(self.audio.stream);
    }

    /// Keep the newest VIS_BUFFER_SIZE scope samples.
    fn poll_audio(&mut self) {
        let mut fresh = false;
        while let Ok(sample) = self.audio.scope.pop() {
            self.scope.push(sample);
            fresh = true;
        }
        if self.scope.len() > VIS_BUFFER_SIZE {
            let excess = self.scope.len() - VIS_BUFFER_SIZE;
            self.scope.drain(..excess);
        }
        if fresh {
            self.spectrum.update(&self.scope);
        }

        while let Ok(err) = self.audio.errors.pop() {
            self.log.error(format!("audio stream: {err}"));
        }
    }

    fn poll_events(&mut self) {
        while let Some(event) = self.handle.poll_event() {
            match event {
                SynthEvent::NoteStarted { note, .. } => {
                    self.last_note = note;
                }
                SynthEvent::NoteDropped { note, .. } => {
                    let msg = match note {
                        Some(note) => {
                            let (name, octave) = notes::name(note);
                            format!("no free voice, dropped {name}{octave}")
                        }
                        None => "no free voice, note dropped".to_string(),
                    };
                    self.log.warn(msg);
                }
                SynthEvent::WaveformApplied(waveform) => {
                    self.waveform = waveform;
                    self.log.info(format!("waveform: {}", waveform.name()));
                }
                // Freed here, off the audio thread
                SynthEvent::Retired(table) => drop(table),
                SynthEvent::Silent | SynthEvent::Steady => {}
                SynthEvent::Meters(meters) => self.meters = meters,
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if let Some(editor) = self.editor.as_mut() {
            match editor.handle_key(code) {
                EditorOutcome::Editing => {}
                EditorOutcome::Aborted => {
                    self.editor = None;
                    self.log.info("custom timbre discarded");
                }
                EditorOutcome::Rejected => {
                    self.log.error("Enter amplitude for one or more frequency");
                }
                EditorOutcome::Submit(harmonics) => {
                    self.editor = None;
                    self.custom = harmonics;
                    self.request_waveform(Waveform::Custom(harmonics));
                }
            }
            return;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('X') => self.should_quit = true,
            KeyCode::Char('Z') => self.show_help = !self.show_help,
            KeyCode::Char('A') => self.request_waveform(Waveform::Sine),
            KeyCode::Char('S') => self.request_waveform(Waveform::Square),
            KeyCode::Char('C') => self.editor = Some(HarmonicEditor::new(self.custom)),
            KeyCode::Char('-') => self.shift_octave(-1),
            KeyCode::Char('=') => self.shift_octave(1),
            KeyCode::Char(key) => {
                if let Some(note) = keymap::note_for(key, self.octave) {
                    self.play(note);
                }
            }
            _ => {}
        }
    }

    fn play(&mut self, note: u8) {
        if let Err(err) = self.handle.trigger(note) {
            self.log.warn(err.to_string());
        }
    }

    fn request_waveform(&mut self, waveform: Waveform) {
        match self.handle.set_waveform(waveform) {
            Ok(()) => self.log.info(format!("switching to {}", waveform.name())),
            Err(err) => self.log.error(err.to_string()),
        }
    }

    fn shift_octave(&mut self, delta: i8) {
        let next = self.octave as i16 + delta as i16;
        let range = keymap::OCTAVES;
        if next < *range.start() as i16 || next > *range.end() as i16 {
            self.log.warn(format!("octave {} is out of range", next));
            return;
        }
        self.octave = next as u8;
        self.log.info(format!("octave {}", self.octave));
    }
}
