//! App - the event loop tying keys, mouse and the engine together

use std::{
    io,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use piano_key::{Keymap, MonoEngine};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::{debug, info};

use crate::ui::{render_keyboard, render_status, render_waveform, AudioStats, KeyboardLayout};

/// Samples kept for the oscilloscope and the stats
const VIS_BUFFER_SIZE: usize = 1024;
/// Capacity of the scope tap on the output bus
const SCOPE_CAPACITY: usize = 8192;
/// How long a key looks pressed when the terminal never reports its release
const PRESS_FLASH: Duration = Duration::from_millis(150);
const TICK: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Press {
    /// Cleared by a release event or mouse up
    Held,
    /// Cleared once the deadline passes
    Until(Instant),
}

pub struct App {
    keymap: Keymap,
    engine: MonoEngine,
    pressed: Vec<Option<Press>>,
    /// Key held down with the mouse
    mouse_key: Option<usize>,
    /// Key under the mouse pointer
    hovered: Option<usize>,
    /// Whether the terminal sends key release events
    release_events: bool,
    keyboard: KeyboardLayout,
    scope: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    should_quit: bool,
}

impl App {
    pub fn new(keymap: Keymap, engine: MonoEngine) -> Self {
        let keys = keymap.len();
        Self {
            keymap,
            engine,
            pressed: vec![None; keys],
            mouse_key: None,
            hovered: None,
            release_events: false,
            keyboard: KeyboardLayout::default(),
            scope: None,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            should_quit: false,
        }
    }

    /// Run until Esc. Fails if the audio output cannot be opened.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let modes = InputModes::enable()?;
        self.release_events = modes.release_events;
        info!(release_events = self.release_events, "keyboard ready");

        while !self.should_quit {
            self.engine.poll();
            self.attach_scope();
            self.poll_audio();
            self.expire_presses(Instant::now());

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key, Instant::now())?,
                    Event::Mouse(mouse) => self.handle_mouse(mouse)?,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> EyreResult<()> {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.kind != KeyEventKind::Release && (key.code == KeyCode::Esc || ctrl_c) {
            self.should_quit = true;
            return Ok(());
        }

        let KeyCode::Char(c) = key.code else {
            return Ok(());
        };
        let Some(index) = self.keymap.position(c) else {
            return Ok(());
        };

        match key.kind {
            // Auto-repeat restrikes the key
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let press = if self.release_events {
                    Press::Held
                } else {
                    Press::Until(now + PRESS_FLASH)
                };
                self.strike(index, press)?;
            }
            KeyEventKind::Release => {
                if self.mouse_key != Some(index) {
                    self.pressed[index] = None;
                }
            }
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> EyreResult<()> {
        self.hovered = self.keyboard.key_at(&self.keymap, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.keyboard.key_at(&self.keymap, mouse.column, mouse.row) {
                    self.mouse_key = Some(index);
                    self.strike(index, Press::Held)?;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(index) = self.mouse_key.take() {
                    self.pressed[index] = None;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn strike(&mut self, index: usize, press: Press) -> EyreResult<()> {
        let Some(binding) = self.keymap.get(index) else {
            return Ok(());
        };
        debug!(key = %binding.key, note = %binding.note, "key struck");
        self.engine.trigger(&binding.note)?;
        self.pressed[index] = Some(press);
        Ok(())
    }

    fn expire_presses(&mut self, now: Instant) {
        for press in &mut self.pressed {
            if matches!(press, Some(Press::Until(deadline)) if *deadline <= now) {
                *press = None;
            }
        }
    }

    /// The context only exists after the first trigger
    fn attach_scope(&mut self) {
        if self.scope.is_none() {
            if let Some(ctx) = self.engine.context() {
                self.scope = Some(ctx.scope(SCOPE_CAPACITY));
            }
        }
    }

    /// Poll for new audio samples from the scope tap
    fn poll_audio(&mut self) {
        let Some(scope) = self.scope.as_mut() else {
            return;
        };
        // Keep only the last VIS_BUFFER_SIZE samples
        while let Ok(sample) = scope.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Keys
                Constraint::Length(8), // Waveform
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(frame, chunks[0], &self.engine, &stats);

        self.keyboard = KeyboardLayout::new(chunks[1], self.keymap.len());
        let pressed: Vec<bool> = self.pressed.iter().map(Option::is_some).collect();
        render_keyboard(frame, &self.keyboard, &self.keymap, &pressed, self.hovered);

        render_waveform(frame, chunks[2], &self.audio_buffer);

        let help = Paragraph::new(" Play with the keys shown or click a key  [Esc] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

/// Mouse capture and release reporting, undone on drop
struct InputModes {
    release_events: bool,
}

impl InputModes {
    fn enable() -> EyreResult<Self> {
        let release_events = matches!(supports_keyboard_enhancement(), Ok(true));
        let mut stdout = io::stdout();
        if release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        execute!(stdout, EnableMouseCapture)?;
        Ok(Self { release_events })
    }
}

impl Drop for InputModes {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableMouseCapture);
        if self.release_events {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
    }
}
