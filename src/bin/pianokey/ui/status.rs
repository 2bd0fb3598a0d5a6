//! Status bar widget - shows engine state, sounding note, clock, and audio stats

use piano_key::{EngineState, MonoEngine};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Audio statistics for display
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self::default();
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Render the status bar
pub fn render_status(frame: &mut Frame, area: Rect, engine: &MonoEngine, stats: &AudioStats) {
    let block = Block::default().title(" pianokey ").borders(Borders::ALL);

    let (symbol, state, color) = match engine.state() {
        EngineState::Sounding => ("♪", "Sounding", Color::Green),
        EngineState::Idle => ("·", "Idle", Color::Yellow),
    };

    let note = match engine.current() {
        Some(active) => format!("{} {:.2} Hz  ", active.note, active.voice.frequency()),
        None => "--  ".to_string(),
    };

    // No context until the first key is played
    let clock = match engine.context() {
        Some(ctx) => format!(
            "t={:.2}s  {:.1}kHz  ",
            ctx.current_time(),
            ctx.sample_rate() / 1000.0
        ),
        None => "no output yet  ".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {}  ", symbol, state),
            Style::default().fg(color),
        ),
        Span::styled(note, Style::default().fg(Color::Cyan)),
        Span::styled(clock, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
