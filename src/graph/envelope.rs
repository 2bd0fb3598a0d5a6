use crate::{
    dsp::envelope::ExpDecay,
    graph::node::{GraphNode, RenderCtx},
};

/// Decaying amplitude envelope as a graph node.
///
/// Renders the gain curve, not audio; pair it with a source through
/// [`Amplify`](crate::graph::amplify::Amplify).
pub struct DecayNode {
    env: ExpDecay,
}

impl DecayNode {
    pub fn new(env: ExpDecay) -> Self {
        Self { env }
    }

    /// Full gain falling to the -100 dB floor over `seconds`.
    pub fn piano(sample_rate: f32, seconds: f32) -> Self {
        Self::new(ExpDecay::piano(sample_rate, seconds))
    }
}

impl GraphNode for DecayNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.env.render(out);
    }

    fn is_active(&self) -> bool {
        !self.env.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goes_inactive_when_decay_completes() {
        let ctx = RenderCtx::new(1_000.0);
        let mut node = DecayNode::piano(1_000.0, 0.1);

        let mut buffer = vec![0.0f32; 64];
        node.render_block(&mut buffer, &ctx);
        assert!(node.is_active());
        assert_eq!(buffer[0], 1.0);

        node.render_block(&mut buffer, &ctx);
        assert!(!node.is_active());
        assert!(buffer[63] < 1e-4);
    }
}
