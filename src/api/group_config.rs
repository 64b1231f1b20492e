use serde::{Deserialize, Serialize};

use crate::core::StackMode;
use crate::error::{StackError, StackResult};

/// How gap points (categories a member has no value for) reach the renderer.
///
/// The accumulation table always keeps gap points; this only filters the
/// draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GapPolicy {
    /// Gaps are drawn as zero-height segments at the running baseline.
    #[default]
    Zero,
    /// Gaps are left out of the draw list.
    Skip,
}

/// Public group bootstrap configuration.
///
/// This type is serializable so host applications can persist chart setup
/// alongside their own series definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackGroupConfig {
    #[serde(default)]
    pub stack_mode: StackMode,
    #[serde(default)]
    pub gap_policy: GapPolicy,
}

impl StackGroupConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets absolute or 100% stacking.
    #[must_use]
    pub fn with_stack_mode(mut self, stack_mode: StackMode) -> Self {
        self.stack_mode = stack_mode;
        self
    }

    #[must_use]
    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> StackResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| StackError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON. Missing fields take their defaults.
    pub fn from_json_str(input: &str) -> StackResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| StackError::InvalidData(format!("failed to parse config: {e}")))
    }
}
