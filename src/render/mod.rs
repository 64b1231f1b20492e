mod frame;
mod null_renderer;

pub use frame::{StackFrame, StackedRenderItem};
pub use null_renderer::NullStackRenderer;

use crate::error::StackResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a materialized draw list for one committed revision, so
/// rasterization stays isolated from grouping and accumulation.
pub trait StackRenderer {
    fn render(&mut self, frame: &StackFrame) -> StackResult<()>;
}
