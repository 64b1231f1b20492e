use crate::error::StackResult;
use crate::render::{StackFrame, StackRenderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates the frame so tests catch broken draw lists before a
/// real backend is attached.
#[derive(Debug, Default)]
pub struct NullStackRenderer {
    pub last_revision: Option<u64>,
    pub last_item_count: usize,
    pub last_member_count: usize,
}

impl StackRenderer for NullStackRenderer {
    fn render(&mut self, frame: &StackFrame) -> StackResult<()> {
        frame.validate()?;
        self.last_revision = Some(frame.revision);
        self.last_item_count = frame.items.len();
        self.last_member_count = frame.member_count();
        Ok(())
    }
}
