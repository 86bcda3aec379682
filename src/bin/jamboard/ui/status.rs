//! Status bar - waveform, octave, voice mode, fade state, and output level

use jamboard::{dsp::FadeState, notes};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Session;

/// Output level over the scope buffer
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn fade_label(fade: FadeState) -> (&'static str, Color) {
    match fade {
        FadeState::Silent => ("silent", Color::DarkGray),
        FadeState::FadingIn => ("fading in", Color::Yellow),
        FadeState::Steady => ("playing", Color::Green),
        FadeState::FadingOut => ("fading out", Color::Yellow),
        FadeState::Holding => ("holding", Color::Cyan),
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default().title(" jamboard ").borders(Borders::ALL);
    let stats = AudioStats::from_buffer(&session.scope);
    let (fade, fade_color) = fade_label(session.meters.fade);

    let mode = if session.continuous {
        "continuous".to_string()
    } else {
        format!("{} voices", session.meters.voices)
    };
    let last = match session.last_note {
        Some(note) => {
            let (name, octave) = notes::name(note);
            format!("{name}{octave}")
        }
        None => "-".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", session.waveform.name()),
            Style::default().fg(Color::LightMagenta),
        ),
        Span::styled(
            format!("Octave {}  ", session.octave),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{mode}  "), Style::default().fg(Color::White)),
        Span::styled(format!("Note {last}  "), Style::default().fg(Color::White)),
        Span::styled(format!("{fade}  "), Style::default().fg(fade_color)),
        Span::styled(
            format!("{:.1}kHz  ", session.sample_rate() as f32 / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.3}  RMS: {:.3}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
