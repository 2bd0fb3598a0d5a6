//! Keyboard widget - one column per binding, black keys drawn shorter

use piano_key::Keymap;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Narrowest a key is drawn; labels are truncated below this.
const MIN_KEY_WIDTH: u16 = 5;

/// Where every key sits inside the keyboard area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardLayout {
    area: Rect,
    key_width: u16,
    black_height: u16,
}

impl KeyboardLayout {
    pub fn new(area: Rect, keys: usize) -> Self {
        let key_width = match u16::try_from(keys) {
            Ok(n) if n > 0 => (area.width / n).max(MIN_KEY_WIDTH),
            _ => MIN_KEY_WIDTH,
        };
        // Black keys stop at three fifths of the white key height
        let black_height = (area.height * 3 / 5).max(3).min(area.height);
        Self {
            area,
            key_width,
            black_height,
        }
    }

    /// Screen rectangle of key `index`, clipped to the keyboard area.
    pub fn key_rect(&self, index: usize, black: bool) -> Option<Rect> {
        let offset = u16::try_from(index).ok()?.checked_mul(self.key_width)?;
        if offset >= self.area.width {
            return None;
        }
        Some(Rect {
            x: self.area.x + offset,
            y: self.area.y,
            width: self.key_width.min(self.area.width - offset),
            height: if black {
                self.black_height
            } else {
                self.area.height
            },
        })
    }

    /// The key under a terminal cell, if any.
    pub fn key_at(&self, keymap: &Keymap, column: u16, row: u16) -> Option<usize> {
        if column < self.area.x || row < self.area.y {
            return None;
        }
        let index = usize::from((column - self.area.x) / self.key_width);
        let binding = keymap.get(index)?;
        let rect = self.key_rect(index, binding.is_black())?;
        let inside = column < rect.x + rect.width && row < rect.y + rect.height;
        inside.then_some(index)
    }
}

/// How a key is drawn. Pressed wins over hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShade {
    Normal,
    Hovered,
    Pressed,
}

impl KeyShade {
    pub fn of(pressed: bool, hovered: bool) -> Self {
        match (pressed, hovered) {
            (true, _) => Self::Pressed,
            (false, true) => Self::Hovered,
            (false, false) => Self::Normal,
        }
    }
}

fn key_style(black: bool, shade: KeyShade) -> Style {
    let (fg, bg) = match (black, shade) {
        (false, KeyShade::Normal) => (Color::Black, Color::White),
        (false, KeyShade::Hovered) => (Color::Black, Color::Gray),
        (false, KeyShade::Pressed) => (Color::White, Color::DarkGray),
        (true, KeyShade::Normal) => (Color::White, Color::Black),
        (true, KeyShade::Hovered) => (Color::White, Color::DarkGray),
        (true, KeyShade::Pressed) => (Color::Black, Color::Gray),
    };
    Style::default().fg(fg).bg(bg)
}

/// Render the keys; `pressed[i]` insets key `i`, `hovered` lightly shades one.
pub fn render_keyboard(
    frame: &mut Frame,
    layout: &KeyboardLayout,
    keymap: &Keymap,
    pressed: &[bool],
    hovered: Option<usize>,
) {
    for (index, binding) in keymap.bindings().iter().enumerate() {
        let black = binding.is_black();
        let Some(rect) = layout.key_rect(index, black) else {
            break;
        };
        let is_pressed = pressed.get(index).copied().unwrap_or(false);
        let shade = KeyShade::of(is_pressed, hovered == Some(index));

        let style = key_style(black, shade);
        let border = match shade {
            KeyShade::Pressed => Style::default().fg(Color::Yellow),
            KeyShade::Hovered => Style::default().fg(Color::Gray),
            KeyShade::Normal => Style::default().fg(Color::DarkGray),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(style);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if inner.height == 0 {
            continue;
        }

        let label = Paragraph::new(binding.label())
            .alignment(Alignment::Center)
            .style(style);
        frame.render_widget(label, Rect { height: 1, ..inner });

        let hint = Paragraph::new(Line::from(binding.hint()))
            .alignment(Alignment::Center)
            .style(style.add_modifier(Modifier::BOLD));
        let bottom = inner.y + inner.height - 1;
        frame.render_widget(hint, Rect { y: bottom, height: 1, ..inner });
    }
}
