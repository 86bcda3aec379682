//! Per-voice envelope meters

use jamboard::synth::MeterSnapshot;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, LineGauge},
    Frame,
};

const VOICE_COLORS: [Color; 8] = [
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
    Color::White,
    Color::Gray,
];

pub fn render_voices(frame: &mut Frame, area: Rect, meters: &MeterSnapshot) {
    let block = Block::default()
        .title(format!(" Voices  master {:.2} ", meters.master))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let levels = meters.levels();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(levels.iter().map(|_| Constraint::Length(1)))
        .split(inner);

    for (i, (&level, row)) in levels.iter().zip(rows.iter()).enumerate() {
        let color = VOICE_COLORS[i % VOICE_COLORS.len()];
        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(color))
            .label(format!("V{:<2}", i + 1))
            .ratio(level.clamp(0.0, 1.0) as f64);
        frame.render_widget(gauge, *row);
    }
}
