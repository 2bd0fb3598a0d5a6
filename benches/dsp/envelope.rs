//! Benchmarks for the exponential decay.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use piano_key::dsp::envelope::{ExpDecay, DECAY_FLOOR, FULL_GAIN};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Long enough that it never reaches the floor while measuring
        let mut env = ExpDecay::new(48_000.0, 3_600.0, FULL_GAIN, DECAY_FLOOR);
        group.bench_with_input(BenchmarkId::new("decaying", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Past the end: holds the floor
        let mut env = ExpDecay::piano(48_000.0, 0.001);
        let mut skip = vec![0.0f32; 64];
        env.render(&mut skip);
        group.bench_with_input(BenchmarkId::new("finished", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
