//! Settings panel and on-screen keyboard

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use saavy_keys::NoteId;

use super::View;
use crate::keymap::key_for;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn on_off(enabled: bool) -> (&'static str, Color) {
    if enabled {
        ("on ", Color::Green)
    } else {
        ("off", Color::DarkGray)
    }
}

/// Render the settings panel
pub fn render_status(frame: &mut Frame, area: Rect, view: &View, stats: &AudioStats) {
    let block = Block::default().title(" keys ").borders(Borders::ALL);
    let settings = view.settings;

    let voice_line = Line::from(vec![
        Span::styled(
            format!(" {}  ", settings.waveform.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Octave {}  ", settings.octave),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Volume {:.0}%  ", settings.master_volume * 100.0),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} @ {:.1}kHz  ", view.device, view.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let reverb = settings.reverb;
    let echo = settings.echo;
    let (reverb_state, reverb_color) = on_off(reverb.enabled);
    let (echo_state, echo_color) = on_off(echo.enabled);

    let effects_line = Line::from(vec![
        Span::raw(" Reverb "),
        Span::styled(reverb_state, Style::default().fg(reverb_color)),
        Span::raw(format!(
            " wet {:.2} decay {:.1}s   ",
            reverb.wet_level, reverb.decay
        )),
        Span::raw("Echo "),
        Span::styled(echo_state, Style::default().fg(echo_color)),
        Span::raw(format!(
            " wet {:.2} delay {:.2}s feedback {:.2}",
            echo.wet_level, echo.delay_time, echo.feedback
        )),
    ]);

    let paragraph = Paragraph::new(vec![voice_line, effects_line]).block(block);
    frame.render_widget(paragraph, area);
}

/// Render one cell per note, lit while held
pub fn render_keyboard(frame: &mut Frame, area: Rect, held: &[bool; NoteId::COUNT]) {
    let block = Block::default().title(" Keyboard ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, NoteId::COUNT as u32); NoteId::COUNT])
        .split(inner);

    for (note, cell) in NoteId::ALL.into_iter().zip(cells.iter()) {
        let sharp = note.name().contains('#');
        let mut style = if sharp {
            Style::default().fg(Color::White).bg(Color::Black)
        } else {
            Style::default().fg(Color::Black).bg(Color::Gray)
        };
        if held[note.index()] {
            style = style.bg(Color::LightYellow).fg(Color::Black).add_modifier(Modifier::BOLD);
        }

        let text = vec![
            Line::from(note.name()),
            Line::from(Span::styled(
                key_for(note).to_string(),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];
        frame.render_widget(Paragraph::new(text).style(style), *cell);
    }
}
