/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frame: Engine clock at the first sample of the block
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frame: u64) -> Self {
        Self { sample_rate, frame }
    }

    /// Clock value just after a block of `frames` samples.
    pub fn end_frame(&self, frames: usize) -> u64 {
        self.frame + frames as u64
    }
}

/// Core trait for mono sound sources summed into the master bus
pub trait GraphNode: Send {
    /// Overwrite `out` with the next block of this node's signal.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    ///
    /// Used by voice management to know when a voice can be freed.
    fn is_active(&self) -> bool {
        true
    }
}

