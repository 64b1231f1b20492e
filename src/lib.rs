//! chart-stack: stacked-series grouping and draw-order engine.
//!
//! Series are owned by the host's data layer. A stacked group orders them,
//! accumulates their values into positive and negative lanes per category,
//! and publishes immutable snapshots that renderers draw from.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{StackGroupConfig, StackedGroupSeries, StackedMountainGroupSeries};
pub use error::{AccumulationError, StackError, StackResult};
