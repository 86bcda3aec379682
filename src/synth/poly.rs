use crate::{
    config::{MixScaling, SynthConfig},
    dsp::{Envelope, FadeState, Fader, WaveTable},
    synth::voice::Voice,
};

/*
Voice Pool and Mixer
====================

PolySynth owns a fixed pool of voices that all read ONE shared wavetable and
share ONE envelope definition.

Per frame the audio callback does:

    for channel in 0..channels:
        out[channel] = synth.mix(channel)
    synth.advance()

mix() sums, over every voice,

    table[voice.position[channel]] * envelope.calculate(voice.env_pos, voice.triggered)

scales by 1/pool_size (MixScaling::PerVoice) and applies the master gain.


Allocation: Round Robin, No Stealing
------------------------------------

A cursor walks the pool. trigger_note looks ONLY at the voice under the
cursor:

    cursor ─┐
            ▼
    [ v0 ][ v1 ][ v2 ][ v3 ][ v4 ][ v5 ]
     busy   free

    free → trigger it, move the cursor on, Ok(voice index)
    busy → Err(VoiceBusy), nothing changes, the note is dropped

It does not search for another free voice and it never steals a sounding
one. Fast repeated notes therefore get dropped once the cursor laps a voice
that is still ringing. Continuous (drone) pools are the exception: their
voices never release, so a trigger retunes the voice under the cursor.


Changing the Wavetable Safely
-----------------------------

The audio thread reads the table every frame, so it is never rewritten in
place. Instead:

    1. the control thread builds a whole new WaveTable (allocation happens
       there, not here);
    2. stage_wavetable() parks it and starts a fade-out;
    3. on the first frame the master gain reaches zero, advance() swaps the
       boxed table in (a pointer swap) and fades back in;
    4. the displaced table waits in `retired` until the owner takes it back
       with take_retired(), so it is freed off the audio thread.

A second publish waits until the previous retired table has been collected.
*/

/// Returned when the voice under the allocation cursor is still sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerError {
    VoiceBusy { voice: usize },
}

impl std::fmt::Display for TriggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerError::VoiceBusy { voice } => {
                write!(f, "no free voice: voice {} is still sounding", voice)
            }
        }
    }
}

impl std::error::Error for TriggerError {}

pub struct PolySynth {
    voices: Vec<Voice>,
    table: Box<WaveTable>,
    staged: Option<Box<WaveTable>>,
    retired: Option<Box<WaveTable>>,
    /// Fade back in after the staged table goes live.
    resume_after_swap: bool,
    envelope: Envelope,
    cursor: usize,
    fader: Fader,
    voice_gain: f32,
}

impl PolySynth {
    pub fn new(config: &SynthConfig) -> Self {
        let voice_count = config.voices.max(1);
        let voice_gain = match config.mix_scaling {
            MixScaling::Sum => 1.0,
            MixScaling::PerVoice => 1.0 / voice_count as f32,
        };

        Self {
            voices: (0..voice_count).map(|_| Voice::new()).collect(),
            table: Box::new(WaveTable::from_waveform(config.waveform)),
            staged: None,
            retired: None,
            resume_after_swap: false,
            envelope: config.envelope,
            cursor: 0,
            fader: Fader::with_increment(config.start_gain, config.fade_increment),
            voice_gain,
        }
    }

    /// Allocate the voice under the cursor for a note at `pitch`.
    ///
    /// Returns the voice index on success.
    pub fn trigger_note(&mut self, pitch: f32) -> Result<usize, TriggerError> {
        let index = self.cursor;
        let continuous = self.envelope.is_continuous();
        let voice = &mut self.voices[index];

        match (voice.is_triggered(), continuous) {
            (true, true) => voice.retune(pitch),
            (true, false) => return Err(TriggerError::VoiceBusy { voice: index }),
            (false, _) => voice.trigger(pitch),
        }

        self.cursor = (self.cursor + 1) % self.voices.len();
        Ok(index)
    }

    /// Step every voice and the master fader by one frame.
    #[inline]
    pub fn advance(&mut self) {
        let length = self.envelope.total_length();
        for voice in &mut self.voices {
            voice.advance(length);
        }
        self.fader.advance();

        if self.staged.is_some() && self.fader.is_silent() && self.retired.is_none() {
            self.publish_staged();
        }
    }

    /// Mixed output for `channel` at the current frame.
    #[inline]
    pub fn mix(&self, channel: usize) -> f32 {
        let mut out = 0.0;
        for voice in &self.voices {
            if !voice.is_triggered() {
                continue;
            }
            let signal = self.table.sample_at(voice.channel_position(channel));
            let gain = self
                .envelope
                .calculate(voice.envelope_position(), voice.is_triggered());
            out += signal * gain;
        }
        out * self.voice_gain * self.fader.level()
    }

    /// Write one interleaved frame, then advance.
    #[inline]
    pub fn render_frame(&mut self, frame: &mut [f32]) {
        for (channel, sample) in frame.iter_mut().enumerate() {
            *sample = self.mix(channel);
        }
        self.advance();
    }

    /// Fill `out` with interleaved frames of `channels` samples each.
    ///
    /// A trailing partial frame is zeroed.
    pub fn render_block(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        let mut frames = out.chunks_exact_mut(channels);
        for frame in &mut frames {
            self.render_frame(frame);
        }
        frames.into_remainder().fill(0.0);
    }

    pub fn fade_in(&mut self) {
        if self.staged.is_some() {
            self.resume_after_swap = true;
        } else {
            self.fader.fade_in();
        }
    }

    pub fn fade_out(&mut self) {
        self.resume_after_swap = false;
        self.fader.fade_out();
    }

    /// Park a new table until playback is silent, and start fading out.
    ///
    /// Returns a previously staged table that never went live.
    pub fn stage_wavetable(&mut self, table: Box<WaveTable>) -> Option<Box<WaveTable>> {
        if self.staged.is_none() {
            self.resume_after_swap = matches!(
                self.fader.state(),
                FadeState::FadingIn | FadeState::Steady | FadeState::Holding
            );
        }
        let displaced = self.staged.replace(table);
        self.fader.fade_out();

        if self.fader.is_silent() && self.retired.is_none() {
            self.publish_staged();
        }
        displaced
    }

    /// The table displaced by the most recent publish, if not yet collected.
    pub fn take_retired(&mut self) -> Option<Box<WaveTable>> {
        self.retired.take()
    }

    fn publish_staged(&mut self) {
        if let Some(staged) = self.staged.take() {
            let old = std::mem::replace(&mut self.table, staged);
            self.retired = Some(old);
            if self.resume_after_swap {
                self.fader.fade_in();
            }
            self.resume_after_swap = false;
        }
    }

    /// Jump the master gain, cancelling any fade.
    pub fn set_master_gain(&mut self, level: f32) {
        self.fader.set_level(level);
    }

    pub fn master_gain(&self) -> f32 {
        self.fader.level()
    }

    pub fn fade_state(&self) -> FadeState {
        self.fader.state()
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_triggered()).count()
    }

    /// Current envelope gain of voice `index`, `0.0` when idle or out of range.
    pub fn voice_level(&self, index: usize) -> f32 {
        self.voices.get(index).map_or(0.0, |v| {
            self.envelope
                .calculate(v.envelope_position(), v.is_triggered())
        })
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn wavetable(&self) -> &WaveTable {
        &self.table
    }
}
