pub mod dsp;
pub mod error;
pub mod graph; // Voice building blocks
pub mod io; // Audio context and device output
pub mod keymap;
pub mod notes;
pub mod synth; // Voice lifetime and the monophonic engine

pub use error::{ConfigError, EngineError};
pub use io::AudioContext;
pub use keymap::{KeyBinding, Keymap};
pub use notes::{NoteTable, NOTES};
pub use synth::{EngineState, MonoEngine};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
