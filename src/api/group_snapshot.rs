use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::core::{AccumulationTable, AttachmentId, FillStyle, RenderKind, SeriesId, StackMode};
use crate::error::{StackError, StackResult};
use crate::render::{StackFrame, StackedRenderItem};

use super::{GapPolicy, StackGroupConfig};

pub const GROUP_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Lifecycle of one attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberState {
    Unattached,
    Attached,
    /// Terminal; re-adding the series mints a new attachment.
    Removed,
}

/// Read-only view of one member in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub series: SeriesId,
    pub attachment: AttachmentId,
    pub render_kind: RenderKind,
    pub visible: bool,
    pub draw_index: usize,
}

/// Immutable committed state of a stacked group.
///
/// Renderers hold an `Arc` to a snapshot for the duration of a pass; the
/// owning group replaces the whole snapshot on every commit and never
/// mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub revision: u64,
    pub kind: String,
    pub fill_style: FillStyle,
    pub stack_mode: StackMode,
    pub gap_policy: GapPolicy,
    pub members: Vec<MemberView>,
    pub table: AccumulationTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: GroupSnapshot,
}

impl GroupSnapshot {
    pub(crate) fn empty(kind: &str, fill_style: FillStyle, config: StackGroupConfig) -> Self {
        Self {
            revision: 0,
            kind: kind.to_owned(),
            fill_style,
            stack_mode: config.stack_mode,
            gap_policy: config.gap_policy,
            members: Vec::new(),
            table: AccumulationTable::default(),
        }
    }

    #[must_use]
    pub fn member(&self, series: SeriesId) -> Option<&MemberView> {
        self.members.iter().find(|member| member.series == series)
    }

    #[must_use]
    pub fn visible_member_count(&self) -> usize {
        self.members.iter().filter(|member| member.visible).count()
    }

    /// Draw list for this snapshot: members in draw order, categories in
    /// table order. Hidden members contribute nothing.
    #[must_use]
    pub fn render_items(&self) -> Vec<StackedRenderItem> {
        let capacity = self.table.rows().len() * self.table.categories().len();
        let mut items = Vec::with_capacity(capacity);
        for row in self.table.rows() {
            let Some(member) = self.member(row.series) else {
                continue;
            };
            for point in &row.points {
                if point.is_gap && self.gap_policy == GapPolicy::Skip {
                    continue;
                }
                items.push(StackedRenderItem {
                    draw_index: member.draw_index,
                    series: row.series,
                    category: point.category.clone(),
                    lane: point.lane,
                    baseline: point.baseline,
                    top: point.top,
                    fill: self.fill_style,
                });
            }
        }
        items
    }

    #[must_use]
    pub fn frame(&self) -> StackFrame {
        StackFrame::new(self.revision, self.render_items())
    }

    pub fn to_json_contract_v1_pretty(&self) -> StackResult<String> {
        let payload = GroupSnapshotJsonContractV1 {
            schema_version: GROUP_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            StackError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Parses either a bare snapshot or a versioned v1 payload.
    pub fn from_json_compat_str(input: &str) -> StackResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<Self>(input) {
            return Ok(snapshot);
        }
        let payload: GroupSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            StackError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != GROUP_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(StackError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

/// Cross-thread handle to the last committed snapshot of a group.
///
/// The lock only guards the pointer swap, so `load` never observes a
/// partially built snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    cell: Arc<RwLock<Arc<GroupSnapshot>>>,
}

impl SnapshotReader {
    pub(crate) fn new(initial: Arc<GroupSnapshot>) -> Self {
        Self {
            cell: Arc::new(RwLock::new(initial)),
        }
    }

    #[must_use]
    pub fn load(&self) -> Arc<GroupSnapshot> {
        match self.cell.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    pub(crate) fn publish(&self, snapshot: Arc<GroupSnapshot>) {
        match self.cell.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}
