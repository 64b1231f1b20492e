use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{StackError, StackResult};

/// Stable identity handle of a series owned by the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesId(u64);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one attached lifetime of a member inside a group.
///
/// Every successful attach mints a fresh value, so a series that is removed
/// and added again is a different attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttachmentId(u64);

impl AttachmentId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attachment-{}", self.0)
    }
}

/// Key kind shared by every member of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Numeric,
    Label,
}

/// X-coordinate (or category) a sample belongs to.
///
/// Numeric keys order ascending. Label keys have no intrinsic order; the
/// accumulator orders them by first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKey {
    Numeric(OrderedFloat<f64>),
    Label(String),
}

impl CategoryKey {
    #[must_use]
    pub fn numeric(value: f64) -> Self {
        Self::Numeric(OrderedFloat(value))
    }

    #[must_use]
    pub fn label(value: impl Into<String>) -> Self {
        Self::Label(value.into())
    }

    #[must_use]
    pub fn kind(&self) -> CategoryKind {
        match self {
            Self::Numeric(_) => CategoryKind::Numeric,
            Self::Label(_) => CategoryKind::Label,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(value.0),
            Self::Label(_) => None,
        }
    }

    /// Returns `false` for numeric keys that have no place on an ordered axis
    /// (NaN and infinities).
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        match self {
            Self::Numeric(value) => value.0.is_finite(),
            Self::Label(_) => true,
        }
    }

    /// Ordering used for numeric domains. Labels compare equal to each other so
    /// a stable sort keeps their first-seen order.
    pub(crate) fn domain_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{}", value.0),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<f64> for CategoryKey {
    fn from(value: f64) -> Self {
        Self::numeric(value)
    }
}

impl From<&str> for CategoryKey {
    fn from(value: &str) -> Self {
        Self::label(value)
    }
}

/// One `(category, value)` sample of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub category: CategoryKey,
    pub value: f64,
}

impl Sample {
    #[must_use]
    pub fn new(category: impl Into<CategoryKey>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }

    /// Builds a time-keyed sample; the key is unix seconds with millisecond precision.
    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> StackResult<Self> {
        let value = value.to_f64().ok_or_else(|| {
            StackError::InvalidData(format!("sample value {value} cannot be represented as f64"))
        })?;
        Ok(Self {
            category: CategoryKey::numeric(time.timestamp_millis() as f64 / 1000.0),
            value,
        })
    }
}

/// Cumulative track a value is stacked onto, chosen by sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackLane {
    Positive,
    Negative,
}

impl StackLane {
    /// Zero stacks on the positive lane.
    #[must_use]
    pub fn for_value(value: f64) -> Self {
        if value < 0.0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// Rendering kind a series declares to the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderKind {
    Mountain,
    Band,
    Column,
    Line,
    Scatter,
}

impl RenderKind {
    /// Kinds that draw a filled region between a lower and an upper bound.
    #[must_use]
    pub const fn is_area_fillable(self) -> bool {
        matches!(self, Self::Mountain | Self::Band)
    }
}
