//! Benchmarks for the output bus and the trigger path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use piano_key::MonoEngine;

use crate::BLOCK_SIZES;

const NOTES: [&str; 4] = ["C4", "E4", "G4", "C5"];

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    // Supersede the sounding voice with a new one
    let mut engine = MonoEngine::offline(48_000.0);
    let mut next = 0;
    group.bench_function("trigger", |b| {
        b.iter(|| {
            engine.trigger(black_box(NOTES[next % NOTES.len()])).unwrap();
            next += 1;
        })
    });

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // One render callback: lock, mix the voice, release if it ended.
        // Retriggers each block so the voice never runs out.
        let mut engine = MonoEngine::offline(48_000.0);
        engine.trigger("A4").unwrap();
        group.bench_with_input(BenchmarkId::new("block", size), &size, |b, _| {
            b.iter(|| {
                engine.trigger("A4").unwrap();
                if let Some(ctx) = engine.context() {
                    ctx.render(black_box(&mut buffer));
                }
                engine.poll();
            })
        });
    }

    group.finish();
}
