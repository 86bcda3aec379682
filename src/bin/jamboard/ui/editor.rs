//! Custom timbre editor
//!
//! One row per harmonic. Harmonic `h` sits at `2^h` times the note's
//! frequency, so the rows run up in octaves from the fundamental.
//!
//!   ↑/↓      select harmonic
//!   ←/→      amplitude -/+ 10
//!   0-9      type an amplitude (0-100)
//!   Bksp     zero the selected harmonic
//!   Enter    synthesize
//!   Esc      discard

use crossterm::event::KeyCode;
use jamboard::HIGHEST_HARMONIC;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, LineGauge, Paragraph},
    Frame,
};

pub const MAX_AMPLITUDE: u8 = 100;
/// Rows plus borders.
pub const EDITOR_HEIGHT: u16 = HIGHEST_HARMONIC as u16 + 2;
const STEP: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    Editing,
    Aborted,
    /// Every amplitude is zero; nothing to synthesize.
    Rejected,
    Submit([u8; HIGHEST_HARMONIC]),
}

#[derive(Debug, Clone)]
pub struct HarmonicEditor {
    amplitudes: [u8; HIGHEST_HARMONIC],
    selected: usize,
    /// Digits typed into the selected row so far.
    typed: Option<u16>,
}

impl HarmonicEditor {
    pub fn new(amplitudes: [u8; HIGHEST_HARMONIC]) -> Self {
        Self {
            amplitudes: amplitudes.map(|a| a.min(MAX_AMPLITUDE)),
            selected: 0,
            typed: None,
        }
    }

    pub fn amplitudes(&self) -> &[u8; HIGHEST_HARMONIC] {
        &self.amplitudes
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, code: KeyCode) -> EditorOutcome {
        match code {
            KeyCode::Esc => return EditorOutcome::Aborted,
            KeyCode::Enter => {
                if self.amplitudes.iter().all(|&a| a == 0) {
                    return EditorOutcome::Rejected;
                }
                return EditorOutcome::Submit(self.amplitudes);
            }
            KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down => self.select((self.selected + 1).min(HIGHEST_HARMONIC - 1)),
            KeyCode::Left => {
                self.typed = None;
                let amp = &mut self.amplitudes[self.selected];
                *amp = amp.saturating_sub(STEP);
            }
            KeyCode::Right => {
                self.typed = None;
                let amp = &mut self.amplitudes[self.selected];
                *amp = (*amp + STEP).min(MAX_AMPLITUDE);
            }
            KeyCode::Backspace => {
                self.typed = None;
                self.amplitudes[self.selected] = 0;
            }
            KeyCode::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    self.type_digit(digit as u16);
                }
            }
            _ => {}
        }
        EditorOutcome::Editing
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.typed = None;
    }

    /// Append a digit; a value that would pass 100 starts over.
    fn type_digit(&mut self, digit: u16) {
        let mut value = self.typed.unwrap_or(0) * 10 + digit;
        if value > MAX_AMPLITUDE as u16 {
            value = digit;
        }
        self.typed = Some(value);
        self.amplitudes[self.selected] = value as u8;
    }
}

pub fn render_editor(frame: &mut Frame, area: Rect, editor: &HarmonicEditor) {
    let block = Block::default()
        .title(" Custom timbre  ↑↓ select  ←→ 0-9 set  Enter ok  Esc cancel ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightMagenta));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); HIGHEST_HARMONIC])
        .split(inner);

    for (h, (&amp, row)) in editor.amplitudes().iter().zip(rows.iter()).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(12), Constraint::Min(10)])
            .split(*row);

        let style = if h == editor.selected() {
            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = Paragraph::new(format!(" x{:<4} {:>3}", 1u32 << h, amp)).style(style);
        let gauge = LineGauge::default()
            .filled_style(style)
            .ratio(amp as f64 / MAX_AMPLITUDE as f64)
            .label("");

        frame.render_widget(label, cols[0]);
        frame.render_widget(gauge, cols[1]);
    }
}
