//! jamboard - play the computer keyboard like a synth
//!
//! Run with: cargo run -- [--continuous] [--voices N] [--waveform sine|square]

mod app;
mod audio;
mod keymap;
mod ui;

use app::Jamboard;
use clap::{Parser, ValueEnum};
use jamboard::{SynthConfig, Waveform, MAX_VOICES};

/// Real-time wavetable synthesizer for the terminal
#[derive(Parser, Debug)]
#[command(name = "jamboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// One drone voice that never releases; new notes retune it
    #[arg(short, long)]
    continuous: bool,

    /// Size of the voice pool
    #[arg(short, long, default_value_t = jamboard::DEFAULT_NUM_VOICES, conflicts_with = "continuous")]
    voices: usize,

    /// Starting timbre
    #[arg(short, long, value_enum, default_value_t = WaveArg::Square)]
    waveform: WaveArg,

    /// Starting keyboard octave
    #[arg(short, long, default_value_t = keymap::DEFAULT_OCTAVE,
          value_parser = clap::value_parser!(u8).range(2..=5))]
    octave: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WaveArg {
    Sine,
    Square,
}

impl From<WaveArg> for Waveform {
    fn from(arg: WaveArg) -> Self {
        match arg {
            WaveArg::Sine => Waveform::Sine,
            WaveArg::Square => Waveform::Square,
        }
    }
}

impl Cli {
    fn synth_config(&self) -> SynthConfig {
        let config = if self.continuous {
            SynthConfig::continuous()
        } else {
            SynthConfig::new().voices(self.voices.min(MAX_VOICES))
        };
        config.waveform(self.waveform.into())
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    Jamboard::new(cli.synth_config())
        .octave(cli.octave)
        .run()
}
