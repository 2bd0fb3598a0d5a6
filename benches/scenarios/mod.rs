//! Scenario benchmarks: what the audio thread and the key handler pay per block.

mod engine;
mod voice;

pub use engine::bench_engine;
pub use voice::bench_voice;
