//! TUI module for keys
//!
//! Settings, an on-screen keyboard, and live scope/spectrum of the output.

pub mod spectrum;
mod status;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use saavy_keys::{NoteId, SynthSettings};

use spectrum::render_spectrum;
use status::{render_keyboard, render_status, AudioStats};
use waveform::render_waveform;

/// Everything one frame of the UI shows
pub struct View<'a> {
    pub settings: &'a SynthSettings,
    pub held: [bool; NoteId::COUNT],
    pub audio: &'a [f32],
    pub spectrum: &'a [(f64, f64)],
    pub device: &'a str,
    pub sample_rate: f32,
    pub message: Option<&'a str>,
}

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Settings
            Constraint::Length(5), // Keyboard
            Constraint::Min(6),    // Scope + spectrum
            Constraint::Length(1), // Help / error bar
        ])
        .split(area);

    let stats = AudioStats::from_buffer(view.audio);
    render_status(frame, chunks[0], view, &stats);
    render_keyboard(frame, chunks[1], &view.held);

    let scopes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_waveform(frame, scopes[0], view.audio);
    render_spectrum(frame, scopes[1], view.spectrum);

    let help = match view.message {
        Some(message) => Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(
            " [Z/X] Octave  [1-4] Wave  [-/=] Vol  [R] Reverb [ [ ] ] Decay  [C] Echo [,/.] Delay  [Space] Stop  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(help, chunks[3]);
}
