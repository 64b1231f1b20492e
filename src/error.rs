use thiserror::Error;

use crate::core::{CategoryKey, CategoryKind, RenderKind, SeriesId};

pub type StackResult<T> = Result<T, StackError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackError {
    #[error("series {series} is already a member of this group")]
    DuplicateMember { series: SeriesId },

    #[error("invalid member position {position} for group of {len} member(s)")]
    InvalidPosition { position: usize, len: usize },

    #[error(transparent)]
    Accumulation(#[from] AccumulationError),

    #[error("series {series} with render kind {kind:?} cannot join a {group} group")]
    IncompatibleMember {
        series: SeriesId,
        kind: RenderKind,
        group: &'static str,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Failure of a stack accumulation pass over a candidate membership.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccumulationError {
    #[error(
        "series {series} uses {found:?} category keys but the group is keyed by {expected:?}"
    )]
    MixedCategoryKinds {
        series: SeriesId,
        expected: CategoryKind,
        found: CategoryKind,
    },

    #[error("series {series} has a category key that cannot be ordered")]
    UnsortableCategory { series: SeriesId },

    #[error("series {series} has a non-finite value at sample {index}")]
    NonFiniteValue { series: SeriesId, index: usize },

    #[error("stacked total overflows at series {series}, category {category}")]
    StackOverflow {
        series: SeriesId,
        category: CategoryKey,
    },
}

impl StackError {
    /// Series identity the error refers to, if any.
    #[must_use]
    pub fn series(&self) -> Option<SeriesId> {
        match self {
            Self::DuplicateMember { series } | Self::IncompatibleMember { series, .. } => {
                Some(*series)
            }
            Self::Accumulation(
                AccumulationError::MixedCategoryKinds { series, .. }
                | AccumulationError::UnsortableCategory { series }
                | AccumulationError::NonFiniteValue { series, .. }
                | AccumulationError::StackOverflow { series, .. },
            ) => Some(*series),
            Self::InvalidPosition { .. } | Self::InvalidData(_) => None,
        }
    }
}
