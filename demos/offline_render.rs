//! Play a short phrase on an offline context and print what came out.
//!
//! Run with: cargo run --example offline_render
//! Set RUST_LOG=piano_key=debug to watch supersession and natural ends.

use piano_key::{EngineState, MonoEngine};
use tracing_subscriber::EnvFilter;

const SAMPLE_RATE: f32 = 48_000.0;

fn main() -> Result<(), piano_key::EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // (note, seconds until the next key)
    let phrase = [
        ("C4", 0.25),
        ("E4", 0.25),
        ("G4", 0.25),
        ("C5", 0.5),
        ("Z9", 0.25), // not a note: silences the keyboard
        ("Bb4", 2.0), // left to ring out
    ];

    let mut engine = MonoEngine::offline(SAMPLE_RATE);
    let mut bounce = Vec::new();

    for (note, hold) in phrase {
        engine.trigger(note)?;
        let Some(ctx) = engine.context() else {
            continue;
        };

        let mut buffer = vec![0.0f32; (hold * SAMPLE_RATE) as usize];
        ctx.render(&mut buffer);
        let ended = engine.poll();

        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let state = match engine.state() {
            EngineState::Sounding => "sounding",
            EngineState::Idle => "idle",
        };
        println!(
            "{:>4}  {:>5.2}s  peak {:.3}  ended {}  -> {}",
            note, hold, peak, ended, state
        );
        bounce.extend_from_slice(&buffer);
    }

    let silent_tail = bounce.iter().rev().take_while(|&&s| s == 0.0).count();
    println!(
        "Rendered {} samples ({:.2}s), last {} silent",
        bounce.len(),
        bounce.len() as f32 / SAMPLE_RATE,
        silent_tail
    );
    Ok(())
}
