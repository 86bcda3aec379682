//! Bounded message log shown under the scope

use std::collections::VecDeque;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "[info]",
            Level::Warn => "[warn]",
            Level::Error => "[error]",
        }
    }

    fn color(self) -> Color {
        match self {
            Level::Info => Color::Gray,
            Level::Warn => Color::Yellow,
            Level::Error => Color::LightRed,
        }
    }
}

/// Newest entries last; the oldest fall off once `capacity` is reached.
pub struct MessageLog {
    entries: VecDeque<(Level, String)>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((level, message.into()));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &(Level, String)> {
        self.entries.iter()
    }
}

pub fn render_log(frame: &mut Frame, area: Rect, log: &MessageLog) {
    let block = Block::default().title(" Messages ").borders(Borders::ALL);
    let visible = block.inner(area).height as usize;

    // Newest at the bottom
    let mut lines: Vec<Line> = log
        .entries()
        .rev()
        .take(visible)
        .map(|(level, msg)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<8}", level.tag()),
                    Style::default().fg(level.color()),
                ),
                Span::raw(msg.as_str()),
            ])
        })
        .collect();
    lines.reverse();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
