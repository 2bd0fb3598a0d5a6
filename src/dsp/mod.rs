//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; scheduling and routing live in the graph layer.

/// Exponential decay envelope generator.
pub mod envelope;
/// Sine oscillator.
pub mod oscillator;

pub use envelope::ExpDecay;
pub use oscillator::OscillatorBlock;
