/// Context passed to graph nodes during rendering
///
/// Nodes schedule themselves in frames counted from their own first sample,
/// so all they need from the output is its sample rate.
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes render audio block by block and report when they have nothing left
/// to produce.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    ///
    /// The output bus drops a voice once its graph reports inactive.
    fn is_active(&self) -> bool {
        true
    }
}
