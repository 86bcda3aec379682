use crate::FADE_INCREMENT;

/*
Master Gain Fader
=================

Every sample that leaves the synth is multiplied by one master level. Jumping
that level (start, stop, timbre swap) is an audible click, so it only ever
moves in small fixed steps, one per frame:

    level
     1.0 ┤            ┌──────────┐
         │          ╱              ╲
         │        ╱                  ╲
     0.0 ┼──────╱                      ╲──────
           silent  fading in  steady  fading out  silent

At FADE_INCREMENT = 0.00003 a full fade takes ~33k frames (~0.75s at 44.1kHz).

fade_in() / fade_out() only set a direction. They return immediately; the
audio thread moves the level in advance(). Callers who need to know when a
fade has finished watch fade_state() (or the Silent / Steady engine events)
rather than spinning on the level.
*/

/// Where the master level is heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Silent,
    FadingIn,
    Steady,
    FadingOut,
    /// Parked at a level strictly between 0 and 1.
    Holding,
}

#[derive(Debug, Clone)]
pub struct Fader {
    level: f32,
    increment: f32,
    fading_in: bool,
    fading_out: bool,
}

impl Fader {
    pub fn new(level: f32) -> Self {
        Self::with_increment(level, FADE_INCREMENT)
    }

    pub fn with_increment(level: f32, increment: f32) -> Self {
        Self {
            level: clamp_unit(level),
            increment: increment.abs().max(f32::EPSILON),
            fading_in: false,
            fading_out: false,
        }
    }

    pub fn fade_in(&mut self) {
        self.fading_out = false;
        self.fading_in = self.level < 1.0;
    }

    pub fn fade_out(&mut self) {
        self.fading_in = false;
        self.fading_out = self.level > 0.0;
    }

    /// Jump straight to `level`, cancelling any fade in progress.
    pub fn set_level(&mut self, level: f32) {
        self.level = clamp_unit(level);
        self.fading_in = false;
        self.fading_out = false;
    }

    /// Move one step toward the current target. Called once per frame.
    #[inline]
    pub fn advance(&mut self) {
        if self.fading_in {
            self.level = (self.level + self.increment).min(1.0);
            if self.level >= 1.0 {
                self.fading_in = false;
            }
        } else if self.fading_out {
            self.level = (self.level - self.increment).max(0.0);
            if self.level <= 0.0 {
                self.fading_out = false;
            }
        }
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_silent(&self) -> bool {
        self.level <= 0.0
    }

    pub fn state(&self) -> FadeState {
        if self.fading_in {
            FadeState::FadingIn
        } else if self.fading_out {
            FadeState::FadingOut
        } else if self.level <= 0.0 {
            FadeState::Silent
        } else if self.level >= 1.0 {
            FadeState::Steady
        } else {
            FadeState::Holding
        }
    }

    /// Frames until the current fade lands on its bound, `0` when idle.
    pub fn frames_remaining(&self) -> usize {
        let distance = match self.state() {
            FadeState::FadingIn => 1.0 - self.level,
            FadeState::FadingOut => self.level,
            _ => return 0,
        };
        (distance / self.increment).ceil() as usize
    }
}

impl Default for Fader {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_in_reaches_unity_without_overshoot() {
        let mut fader = Fader::with_increment(0.0, 0.3);
        fader.fade_in();
        assert_eq!(fader.state(), FadeState::FadingIn);

        for _ in 0..3 {
            fader.advance();
            assert!(fader.level() < 1.0);
        }
        fader.advance();
        assert_eq!(fader.level(), 1.0);
        assert_eq!(fader.state(), FadeState::Steady);

        fader.advance();
        assert_eq!(fader.level(), 1.0);
    }

    #[test]
    fn fade_out_reaches_silence() {
        let mut fader = Fader::with_increment(1.0, 0.25);
        fader.fade_out();
        for _ in 0..4 {
            fader.advance();
        }
        assert_eq!(fader.level(), 0.0);
        assert!(fader.is_silent());
        assert_eq!(fader.state(), FadeState::Silent);
    }

    #[test]
    fn reversing_mid_fade() {
        let mut fader = Fader::with_increment(0.0, 0.1);
        fader.fade_in();
        for _ in 0..5 {
            fader.advance();
        }
        fader.fade_out();
        assert_eq!(fader.state(), FadeState::FadingOut);
        for _ in 0..20 {
            fader.advance();
            assert!((0.0..=1.0).contains(&fader.level()));
        }
        assert!(fader.is_silent());
    }

    #[test]
    fn idle_fader_holds() {
        let mut fader = Fader::new(0.5);
        fader.advance();
        assert_eq!(fader.level(), 0.5);
        assert_eq!(fader.state(), FadeState::Holding);
    }

    #[test]
    fn fade_in_at_unity_is_noop() {
        let mut fader = Fader::new(1.0);
        fader.fade_in();
        assert_eq!(fader.state(), FadeState::Steady);
        assert_eq!(fader.frames_remaining(), 0);
    }

    #[test]
    fn default_fade_length() {
        let mut fader = Fader::default();
        fader.fade_in();
        let frames = fader.frames_remaining();
        assert_eq!(frames, (1.0 / FADE_INCREMENT).ceil() as usize);
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(Fader::new(4.0).level(), 1.0);
        assert_eq!(Fader::new(-1.0).level(), 0.0);
        assert_eq!(Fader::new(f32::NAN).level(), 0.0);
    }
}
