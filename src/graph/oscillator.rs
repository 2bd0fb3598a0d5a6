use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Tone Source
===========

The oscillating source of a voice: a sine at a fixed pitch that runs until a
scheduled stop.

Scheduling
----------

A source is told up front how long it may run, counted in frames from its
first rendered sample:

    stop_after(72_000)   // 1.5 s at 48 kHz

Within the block that crosses the stop frame, samples up to the stop are
rendered and the rest are zero, so the stop is sample accurate whatever
block size the output device asks for. After that the node reports itself
inactive and the output bus releases it.

Without a stop the source runs forever; that is only useful in tests and
benchmarks.

Example usage:
  let osc = OscNode::sine().with_frequency(440.0).stop_after(72_000);

  // Typical piano voice: sine → decaying gain stage
  let voice = OscNode::sine()
      .with_frequency(440.0)
      .stop_after(frames)
      .amplify(DecayNode::piano(sample_rate, 1.5));
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Pitch in Hz, fixed for the node's lifetime.
    frequency: f32,
    /// Frames left before the scheduled stop. None = no stop scheduled.
    remaining: Option<u64>,
}

impl OscNode {
    pub fn sine() -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency: 440.0,
            remaining: None,
        }
    }

    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.frequency = freq;
        self
    }

    /// Schedule the source to stop `frames` frames after its first sample.
    pub fn stop_after(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let audible = match self.remaining {
            Some(remaining) => out.len().min(remaining as usize),
            None => out.len(),
        };

        let (sounding, silent) = out.split_at_mut(audible);
        self.osc.render(sounding, self.frequency, ctx.sample_rate);
        silent.fill(0.0);

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= audible as u64;
        }
    }

    fn is_active(&self) -> bool {
        self.remaining != Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::new(sample_rate);
        let mut osc = OscNode::sine().with_frequency(440.0);

        let mut buffer = vec![0.0f32; 128];
        osc.render_block(&mut buffer, &ctx);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn stops_mid_block() {
        let ctx = RenderCtx::new(1_000.0);
        let mut osc = OscNode::sine().with_frequency(100.0).stop_after(70);

        let mut buffer = vec![1.0f32; 64];
        osc.render_block(&mut buffer, &ctx);
        assert!(osc.is_active());

        buffer.fill(1.0);
        osc.render_block(&mut buffer, &ctx);
        assert!(!osc.is_active());
        assert!(buffer[6..].iter().all(|&s| s == 0.0));
        assert!(buffer[..6].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn unscheduled_source_keeps_running() {
        let ctx = RenderCtx::new(1_000.0);
        let mut osc = OscNode::sine();

        let mut buffer = vec![0.0f32; 4_096];
        osc.render_block(&mut buffer, &ctx);
        assert!(osc.is_active());
    }
}
