// Purpose - the audio context and its platform output

pub mod context;
pub mod cpal_output;

pub use context::{AudioContext, OutputBus};
