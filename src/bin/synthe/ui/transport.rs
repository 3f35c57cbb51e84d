//! Status panel - transport, voice count and the patch

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use synthe::{sequencing::SequencerState, visual::Status};

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    status: &Status,
    sample_rate: f32,
    midi: Option<&str>,
) {
    let block = Block::default().title(" synthe ").borders(Borders::ALL);

    let transport_color = match status.transport {
        SequencerState::Recording => Color::Red,
        SequencerState::Playing => Color::Green,
        SequencerState::Idle => Color::Yellow,
    };
    let freq = status
        .frequency_hz
        .map_or_else(|| "---".to_string(), |f| format!("{:.0}Hz", f));

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.transport.label()),
            Style::default()
                .fg(transport_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" E:{}  ", status.sequence_length),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Freq: {}  ", freq),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Voices: {}  ", status.active_voices),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("MIDI: {}", midi.unwrap_or("off")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the pot values, highlighting the one the arrows move
pub fn render_patch(
    frame: &mut Frame,
    area: Rect,
    status: &Status,
    names: &[&str],
    selected: usize,
) {
    let block = Block::default().title(" Patch ").borders(Borders::ALL);

    let values = [
        format!("{:.2}", status.wave_morph),
        format!("{:.0}ms", status.env_attack_ms),
        format!("{:.2}", status.env_sustain),
        format!("{:.0}ms", status.env_release_ms),
        format!("{:.0}Hz", status.filter_cutoff_hz),
        format!("{:.2}", status.filter_resonance),
    ];

    let spans: Vec<Span> = names
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let style = if i == selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(format!(" {}: {} ", name, value), style)
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
