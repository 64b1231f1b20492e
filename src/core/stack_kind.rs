use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::RenderKind;

/// Rendering interpretation the external renderer applies to a member's
/// `(baseline, top)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillStyle {
    /// Filled area between the baseline curve and the top curve.
    AreaBetween,
    /// Discrete segment from baseline to top per category.
    ColumnSegment,
}

/// Capability tag a stacked group is parameterized with.
///
/// The tag fixes the fill style handed to the renderer and decides at attach
/// time which member render kinds the group accepts.
pub trait StackKind: fmt::Debug + Default + Send + Sync + 'static {
    /// Name used in logs and errors.
    const NAME: &'static str;

    fn fill_style() -> FillStyle;

    fn accepts(kind: RenderKind) -> bool;
}

/// Stacked mountain (area) series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mountain;

impl StackKind for Mountain {
    const NAME: &'static str = "stacked mountain";

    fn fill_style() -> FillStyle {
        FillStyle::AreaBetween
    }

    fn accepts(kind: RenderKind) -> bool {
        kind.is_area_fillable()
    }
}

/// Stacked column series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Column;

impl StackKind for Column {
    const NAME: &'static str = "stacked column";

    fn fill_style() -> FillStyle {
        FillStyle::ColumnSegment
    }

    fn accepts(kind: RenderKind) -> bool {
        kind == RenderKind::Column
    }
}
