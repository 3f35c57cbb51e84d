//! Spectrum analyzer widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use synthe::visual::spectrum::SILENCE_DB;

/// Lowest level drawn, in dB
const FLOOR_DB: f64 = -90.0;

/// Render per-bin levels as a line from DC to Nyquist
///
/// `points` are (frequency_hz, level_db) pairs.
pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let max_freq = points
        .iter()
        .map(|(f, _)| *f)
        .fold(0.0, f64::max)
        .max(1.0);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_freq])
                .labels(vec!["0".to_string(), format!("{:.0} Hz", max_freq)])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-90", "-45", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

/// Pair levels with their bin frequencies, clipped to the drawable floor
pub fn spectrum_points(levels_db: &[f32], sample_rate: f32, fft_len: usize) -> Vec<(f64, f64)> {
    levels_db
        .iter()
        .enumerate()
        .map(|(bin, &db)| {
            let freq = bin as f64 * sample_rate as f64 / fft_len as f64;
            let level = if db <= SILENCE_DB { FLOOR_DB } else { db as f64 };
            (freq, level.max(FLOOR_DB))
        })
        .collect()
}
