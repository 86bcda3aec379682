//! TUI for jamboard
//!
//! Layout:
//!
//! ```text
//! ┌ status ─────────────────────────────────────┐
//! ├ scope ──────────────────┬ spectrum ─────────┤
//! ├ voices ─────────┬ messages ─────────────────┤
//! └ key hints ──────────────────────────────────┘
//! ```
//!
//! The custom timbre editor and the help page draw over the middle.

pub mod editor;
mod help;
pub mod log;
pub mod spectrum;
mod status;
mod voices;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::Session;

use editor::render_editor;
use help::{help_height, render_help};
use log::render_log;
use spectrum::render_spectrum;
use status::render_status;
use voices::render_voices;
use waveform::render_waveform;

pub fn render(frame: &mut Frame, session: &Session) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status
            Constraint::Min(8),    // Scope + spectrum
            Constraint::Length(9), // Voices + messages
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_status(frame, chunks[0], session);

    let scopes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_waveform(frame, scopes[0], &session.scope);
    render_spectrum(frame, scopes[1], &session.spectrum);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[2]);
    render_voices(frame, lower[0], &session.meters);
    render_log(frame, lower[1], &session.log);

    let hints = Paragraph::new(" [Keys] play  [-/=] octave  [A] sine  [S] square  [C] custom  [Z] help  [X] quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, chunks[3]);

    if let Some(editor) = &session.editor {
        render_editor(frame, centered(chunks[1], 70, editor::EDITOR_HEIGHT), editor);
    } else if session.show_help {
        render_help(frame, centered(chunks[1], 64, help_height()));
    }
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
