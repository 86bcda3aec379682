//! Key help overlay

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const HELP: &[&str] = &[
    "Notes",
    "  ` 1 q 2 3 e 4 r 5 6 y 7 u 8   G# A .. A (current octave)",
    "  a z s d c f v g h n j m k     A .. A (octave above)",
    "",
    "Commands",
    "  -  =     octave down / up (2-5)",
    "  A        sine",
    "  S        square",
    "  C        custom timbre editor",
    "  Z        toggle this help",
    "  X  Esc   fade out and quit",
];

pub fn help_height() -> u16 {
    HELP.len() as u16 + 2
}

pub fn render_help(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = HELP.iter().map(|&l| Line::from(l)).collect();
    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}
