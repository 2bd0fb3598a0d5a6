use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Gain stage: multiplies a signal by a control signal, sample by sample.
///
/// With an envelope as the modulator this is the amplitude stage of a voice.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Callers render in chunks of at most MAX_BLOCK_SIZE
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        // Render signal into output
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active() | self.signal.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::DecayNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn envelope_shapes_the_signal() {
        let ctx = RenderCtx::new(1_000.0);
        let mut plain = OscNode::sine().with_frequency(50.0);
        let mut shaped = OscNode::sine()
            .with_frequency(50.0)
            .amplify(DecayNode::piano(1_000.0, 0.2));

        let mut dry = vec![0.0f32; 200];
        let mut wet = vec![0.0f32; 200];
        plain.render_block(&mut dry, &ctx);
        shaped.render_block(&mut wet, &ctx);

        // First quarter cycle is untouched by a near-unity gain
        assert!((dry[1] - wet[1]).abs() < 0.05);
        // Late samples are attenuated
        assert!(wet[195].abs() < dry[195].abs() * 0.01 + 1e-6);
    }

    #[test]
    fn inactive_once_both_sides_finish() {
        let ctx = RenderCtx::new(1_000.0);
        let mut voice = OscNode::sine()
            .with_frequency(50.0)
            .stop_after(100)
            .amplify(DecayNode::piano(1_000.0, 0.1));

        let mut buffer = vec![0.0f32; 99];
        voice.render_block(&mut buffer, &ctx);
        assert!(voice.is_active());

        let mut buffer = vec![0.0f32; 1];
        voice.render_block(&mut buffer, &ctx);
        assert!(!voice.is_active());
    }
}
