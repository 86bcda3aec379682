//! Oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Smallest vertical range, so a near-silent signal is not blown up into noise.
const MIN_SCALE: f64 = 0.01;

/// Index of the first rising zero crossing in the older half of `buffer`.
///
/// Starting the trace there keeps a periodic signal still on screen.
pub fn trigger_point(buffer: &[f32]) -> usize {
    let search = buffer.len() / 2;
    buffer
        .windows(2)
        .take(search)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .map_or(0, |i| i + 1)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, buffer: &[f32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let start = trigger_point(buffer);
    let shown = &buffer[start..];
    let width = area.width.max(1) as usize;
    let step = shown.len().div_ceil(width).max(1);

    let data: Vec<(f64, f64)> = shown
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, &sample)| (i as f64, sample as f64))
        .collect();

    let peak = shown
        .iter()
        .fold(0.0f32, |acc, &x| acc.max(x.abs()))
        .max(MIN_SCALE as f32) as f64;

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, shown.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-peak * 1.1, peak * 1.1])
                .labels(vec![format!("{:.2}", -peak), format!("{:.2}", peak)])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_finds_rising_edge() {
        let buffer = [0.5, -0.2, -0.1, 0.3, 0.6, 0.1, -0.4, -0.2];
        assert_eq!(trigger_point(&buffer), 3);
    }

    #[test]
    fn flat_signal_starts_at_zero() {
        assert_eq!(trigger_point(&[0.0; 64]), 0);
        assert_eq!(trigger_point(&[]), 0);
    }
}
