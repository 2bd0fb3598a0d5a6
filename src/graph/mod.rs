//! Composable building blocks for wiring a voice.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs:
//! block-based rendering against the output clock, scheduled stops, and an
//! activity flag the output bus uses to release finished voices. The
//! `extensions` module adds fluent helpers so a voice reads as a chain.

/// Multiply two signals together (gain stage).
pub mod amplify;
/// Decay envelope node.
pub mod envelope;
/// Fluent combinators (`.amplify()`).
pub mod extensions;
/// Core traits shared by all graph nodes.
pub mod node;
/// Oscillating tone source with a scheduled stop.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
