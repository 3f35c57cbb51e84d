//! Oscilloscope over the visualization feed

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use synthe::io::converter::sample_to_f32;

/// Feed samples as (ms, amplitude) points, oldest first.
fn scope_points(samples: &[i16], sample_rate: f32) -> Vec<(f64, f64)> {
    let ms_per_sample = 1_000.0 / sample_rate.max(1.0) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as f64 * ms_per_sample, sample_to_f32(s) as f64))
        .collect()
}

pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    samples: &[i16],
    sample_rate: f32,
    frequency_hz: Option<f32>,
) {
    let title = match frequency_hz {
        Some(hz) => format!(" Scope  {hz:.1} Hz "),
        None => " Scope ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let trace = scope_points(samples, sample_rate);
    let span_ms = trace.last().map_or(1.0, |&(ms, _)| ms.max(1.0));
    let zero = [(0.0, 0.0), (span_ms, 0.0)];

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&zero),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&trace),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, span_ms])
                .labels([Span::raw("0"), Span::raw(format!("{span_ms:.1} ms"))])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
