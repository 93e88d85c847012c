//! Rendering seam
//!
//! The core never reasons about rendering; it only hands each object's
//! layer and local model matrix to an explicitly passed sink, in layer
//! order. Renderers, render queues and GPU resources live entirely on the
//! other side of this trait.

use crate::foundation::math::Mat4;

/// Consumer of per-object draw data.
pub trait RenderSink {
    /// Receive one object's ordering key and local model matrix.
    fn submit(&mut self, layer: usize, model_matrix: Mat4);
}

/// Sink that only records what was submitted; useful in tests and tools.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Submissions in the order they arrived.
    pub submissions: Vec<(usize, Mat4)>,
}

impl RenderSink for RecordingSink {
    fn submit(&mut self, layer: usize, model_matrix: Mat4) {
        self.submissions.push((layer, model_matrix));
    }
}
