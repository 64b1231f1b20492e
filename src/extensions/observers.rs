use serde::{Deserialize, Serialize};

use crate::core::{AttachmentId, SeriesId, StackMode};

/// Read-only group state passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverContext {
    pub revision: u64,
    pub member_count: usize,
    pub visible_member_count: usize,
    pub category_count: usize,
    pub stack_mode: StackMode,
}

/// Event stream exposed to observers.
///
/// Membership events are delivered before the `Recomputed` event of the
/// commit that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupEvent {
    MemberAttached {
        series: SeriesId,
        attachment: AttachmentId,
        position: usize,
    },
    MemberRemoved {
        series: SeriesId,
        attachment: AttachmentId,
    },
    MemberReordered {
        series: SeriesId,
        from: usize,
        to: usize,
    },
    MemberUpdated {
        series: SeriesId,
    },
    VisibilityChanged {
        series: SeriesId,
        visible: bool,
    },
    Recomputed {
        revision: u64,
    },
    Rendered {
        revision: u64,
        item_count: usize,
    },
}

/// Change-notification hook for hosts and renderers.
///
/// Observers see events and context but cannot mutate the group.
pub trait GroupObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: GroupEvent, context: ObserverContext);
}
