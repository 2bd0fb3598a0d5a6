//! Widgets for the pianokey TUI

pub mod keyboard;
mod status;
mod waveform;

pub use keyboard::{render_keyboard, KeyboardLayout};
pub use status::{render_status, AudioStats};
pub use waveform::render_waveform;
