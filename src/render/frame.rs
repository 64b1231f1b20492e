use serde::{Deserialize, Serialize};

use crate::core::{CategoryKey, FillStyle, SeriesId, StackLane};
use crate::error::{StackError, StackResult};

/// One `(member, category, baseline, top, fill)` tuple consumed by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedRenderItem {
    /// Position of the member in group order; lower indices draw first.
    pub draw_index: usize,
    pub series: SeriesId,
    pub category: CategoryKey,
    pub lane: StackLane,
    pub baseline: f64,
    pub top: f64,
    pub fill: FillStyle,
}

impl StackedRenderItem {
    pub fn validate(&self) -> StackResult<()> {
        if !self.baseline.is_finite() || !self.top.is_finite() {
            return Err(StackError::InvalidData(format!(
                "render item for series {} at {} has non-finite bounds",
                self.series, self.category
            )));
        }
        Ok(())
    }
}

/// Backend-agnostic draw list for one committed group revision.
///
/// Items are ordered by draw index, then by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub revision: u64,
    pub items: Vec<StackedRenderItem>,
}

impl StackFrame {
    #[must_use]
    pub fn new(revision: u64, items: Vec<StackedRenderItem>) -> Self {
        Self { revision, items }
    }

    pub fn validate(&self) -> StackResult<()> {
        let mut last_draw_index = 0_usize;
        for item in &self.items {
            item.validate()?;
            if item.draw_index < last_draw_index {
                return Err(StackError::InvalidData(format!(
                    "render items out of draw order at series {}",
                    item.series
                )));
            }
            last_draw_index = item.draw_index;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct members that contributed items.
    #[must_use]
    pub fn member_count(&self) -> usize {
        let mut count = 0_usize;
        let mut previous: Option<usize> = None;
        for item in &self.items {
            if previous != Some(item.draw_index) {
                count += 1;
                previous = Some(item.draw_index);
            }
        }
        count
    }
}
