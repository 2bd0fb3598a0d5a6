//! Benchmarks for the piano voice graph: sine -> decay.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use piano_key::dsp::envelope::{ExpDecay, DECAY_FLOOR, FULL_GAIN};
use piano_key::graph::{
    envelope::DecayNode,
    extensions::NodeExt,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Same graph a key press builds, minus the scheduled stop
        let mut voice = OscNode::sine()
            .with_frequency(440.0)
            .amplify(DecayNode::new(ExpDecay::new(
                48_000.0,
                3_600.0,
                FULL_GAIN,
                DECAY_FLOOR,
            )));

        group.bench_with_input(BenchmarkId::new("piano", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
