#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Position-Based ADSR Envelope
============================

Unlike a classic envelope generator that carries a running `level` and a
stage state machine, this envelope is a PURE FUNCTION:

    gain = envelope.calculate(position, triggered)

The only mutable state, the position in samples since the note started, lives
in the Voice. One Envelope definition is shared by the whole voice pool, and
asking "what is the gain at sample N" never depends on history.


The Shape
---------

  gain
    1.0 ┐    ╱╲
        │   ╱  ╲
    S   │  ╱    ╲_________
        │ ╱               ╲
    0.0 └╱─────────────────╲──→ position (samples)
         0    a   a+d    a+d+s   total
         attack decay sustain release

Nodes (segment boundaries):

    node1 = attack
    node2 = attack + decay
    node3 = attack + decay + sustain
    total = attack + decay + sustain + release

Every segment is a linear ramp that starts where the previous one ended, so
the curve is continuous: attack ends at 1.0, decay ends at S, release ends
at 0. Note there is no "note off": the sustain segment has a LENGTH, and once
a voice walks past `total` it frees itself. Notes play out on their own.


Continuous Envelope
-------------------

The drone / monophonic mode has no shape at all: 1.0 while triggered, 0.0
otherwise, and no total length (the voice never auto-releases).


Why an enum?
------------

The mixer evaluates the envelope once per voice per channel per frame. A
closed enum resolves with a single match, with no vtable call in the audio
callback, and the compiler can see both variants.
*/

/// Segment lengths in samples, plus the sustain level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: u32,
    pub decay: u32,
    pub sustain: u32,
    pub release: u32,
    pub sustain_level: f32,
}

impl Adsr {
    pub const DEFAULT_ATTACK: u32 = 1_000;
    pub const DEFAULT_DECAY: u32 = 10_000;
    pub const DEFAULT_SUSTAIN: u32 = 1_000;
    pub const DEFAULT_RELEASE: u32 = 50_000;
    pub const DEFAULT_SUSTAIN_LEVEL: f32 = 0.5;

    pub fn new(attack: u32, decay: u32, sustain: u32, release: u32, sustain_level: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
            sustain_level: clamp_level(sustain_level),
        }
    }

    pub fn total_length(&self) -> u32 {
        self.attack
            .saturating_add(self.decay)
            .saturating_add(self.sustain)
            .saturating_add(self.release)
    }

    pub fn calculate(&self, position: u32) -> f32 {
        let node1 = self.attack as u64;
        let node2 = node1 + self.decay as u64;
        let node3 = node2 + self.sustain as u64;
        let total = node3 + self.release as u64;
        let pos = position as u64;
        let level = self.sustain_level as f64;

        let gain = if pos < node1 {
            pos as f64 / node1 as f64
        } else if pos < node2 {
            let progress = (pos - node1) as f64 / (node2 - node1) as f64;
            1.0 - progress * (1.0 - level)
        } else if pos < node3 {
            level
        } else if pos < total {
            let progress = (pos - node3) as f64 / (total - node3) as f64;
            (level - progress * level).max(0.0)
        } else {
            0.0
        };

        gain as f32
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ATTACK,
            Self::DEFAULT_DECAY,
            Self::DEFAULT_SUSTAIN,
            Self::DEFAULT_RELEASE,
            Self::DEFAULT_SUSTAIN_LEVEL,
        )
    }
}

/// Gain shape shared by every voice in a pool.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// Plays once through attack, decay, sustain and release, then frees the voice.
    Finite(Adsr),
    /// Full gain for as long as the voice is triggered.
    Continuous,
}

impl Envelope {
    pub fn adsr(attack: u32, decay: u32, sustain: u32, release: u32, sustain_level: f32) -> Self {
        Envelope::Finite(Adsr::new(attack, decay, sustain, release, sustain_level))
    }

    /// Build a finite envelope from times in seconds.
    pub fn from_seconds(
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
        sustain_level: f32,
        sample_rate: f32,
    ) -> Self {
        let samples = |secs: f32| (secs.max(0.0) * sample_rate).round() as u32;
        Self::adsr(
            samples(attack),
            samples(decay),
            samples(sustain),
            samples(release),
            sustain_level,
        )
    }

    pub fn continuous() -> Self {
        Envelope::Continuous
    }

    /// Gain in [0, 1] at `position` samples after the trigger.
    #[inline]
    pub fn calculate(&self, position: u32, triggered: bool) -> f32 {
        if !triggered {
            return 0.0;
        }
        match self {
            Envelope::Finite(adsr) => adsr.calculate(position),
            Envelope::Continuous => 1.0,
        }
    }

    /// Samples until a finite envelope frees its voice; `None` when continuous.
    #[inline]
    pub fn total_length(&self) -> Option<u32> {
        match self {
            Envelope::Finite(adsr) => Some(adsr.total_length()),
            Envelope::Continuous => None,
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Envelope::Continuous)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope::Finite(Adsr::default())
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
