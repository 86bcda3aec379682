//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the scope buffer, folded into log-spaced bands.
//! Each band shows the loudest FFT bin it covers, so narrow harmonics
//! don't disappear between band centres.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BANDS: usize = 64;
const MIN_HZ: f32 = 40.0;
/// The synth's harmonics rarely reach past this.
const MAX_HZ: f32 = 8_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// FFT bin range `[start, end)` and centre frequency for each band.
    bands: Vec<(usize, usize, f64)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 Hz, dB) per band.
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let half = buffer_len / 2;
        let hz_per_bin = sample_rate / buffer_len as f32;
        let max_hz = MAX_HZ.min(sample_rate / 2.0).max(MIN_HZ * 2.0);
        let ratio = max_hz / MIN_HZ;

        let edge = |i: usize| MIN_HZ * ratio.powf(i as f32 / BANDS as f32);
        let bands: Vec<(usize, usize, f64)> = (0..BANDS)
            .map(|i| {
                let (lo, hi) = (edge(i), edge(i + 1));
                let start = ((lo / hz_per_bin) as usize).min(half - 1);
                let end = ((hi / hz_per_bin).ceil() as usize).clamp(start + 1, half);
                (start, end, ((lo * hi).sqrt() as f64))
            })
            .collect();

        let spectrum = bands
            .iter()
            .map(|&(_, _, hz)| (hz.log10(), FLOOR_DB))
            .collect();

        Self {
            window,
            bands,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Recompute from `buffer`; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (&(start, end, _), (_, db)) in self.bands.iter().zip(self.spectrum.iter_mut()) {
            let power = self.scratch[start..end]
                .iter()
                .map(|c| c.norm_sqr())
                .fold(0.0f32, f32::max)
                .max(1e-12);
            *db = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    /// Frequency (Hz) of the loudest band.
    pub fn dominant(&self) -> Option<f64> {
        self.spectrum
            .iter()
            .filter(|(_, db)| *db > FLOOR_DB)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(log_hz, _)| 10f64.powf(*log_hz))
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, analyzer: &SpectrumAnalyzer) {
    let data = analyzer.data();
    let title = match analyzer.dominant() {
        Some(hz) => format!(" Spectrum  peak ~{:.0} Hz ", hz),
        None => " Spectrum ".to_string(),
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(data);

    let (lo, hi) = match (data.first(), data.last()) {
        (Some(first), Some(last)) => (first.0, last.0.max(first.0 + 1.0)),
        _ => (0.0, 1.0),
    };
    let max_db = data.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![
                    format!("{:.0}", 10f64.powf(lo)),
                    format!("{:.0}", 10f64.powf(hi)),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
