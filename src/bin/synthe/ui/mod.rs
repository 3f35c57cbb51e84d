//! TUI module for synthe
//!
//! Stands in for the panel display: status line, patch values, waveform
//! and spectrum.

mod spectrum;
mod transport;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use synthe::{
    synth::feed::FEED_LEN,
    visual::{DisplayFrame, Status, StatusDisplay},
};

use crate::terminal_input::{TerminalInputs, POT_NAMES};

use spectrum::{render_spectrum, spectrum_points};
use transport::{render_patch, render_transport};
use waveform::render_waveform;

/// Latest display frame, kept until the next draw
pub struct Screen {
    sample_rate: f32,
    midi_port: Option<String>,
    status: Option<Status>,
    waveform: [i16; FEED_LEN],
    spectrum: Vec<(f64, f64)>,
    dirty: bool,
}

impl Screen {
    pub fn new(sample_rate: f32, midi_port: Option<String>) -> Self {
        Self {
            sample_rate,
            midi_port,
            status: None,
            waveform: [0; FEED_LEN],
            spectrum: Vec::new(),
            dirty: true,
        }
    }

    /// True once per received frame.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn render(&self, frame: &mut Frame, inputs: &TerminalInputs) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(3), // Patch
                Constraint::Min(6),    // Waveform
                Constraint::Min(6),    // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        if let Some(status) = &self.status {
            render_transport(
                frame,
                chunks[0],
                status,
                self.sample_rate,
                self.midi_port.as_deref(),
            );
            render_patch(frame, chunks[1], status, &POT_NAMES, inputs.selected_pot());
        }
        render_waveform(
            frame,
            chunks[2],
            &self.waveform,
            self.sample_rate,
            self.status.and_then(|s| s.frequency_hz),
        );
        render_spectrum(frame, chunks[3], &self.spectrum);

        let help = Paragraph::new(
            " [Z..I] Keys  [F1] Rec [F2] Play [F3] Clear [F4] Hold [F5] Sync [F6] Random  [←→↑↓] Pots  [Esc] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}

impl StatusDisplay for Screen {
    fn show(&mut self, frame: &DisplayFrame<'_>) {
        self.status = Some(frame.status);
        self.waveform = *frame.waveform;
        self.spectrum = spectrum_points(frame.spectrum, self.sample_rate, FEED_LEN);
        self.dirty = true;
    }
}
