pub mod accumulator;
pub mod order;
pub mod series;
pub mod stack_kind;
pub mod types;

pub use accumulator::{
    AccumulatedPoint, AccumulationTable, MemberAccumulation, StackAccumulator, StackInput,
    StackMode,
};
pub use order::GroupOrderPolicy;
pub use series::{SampleSeries, SeriesRecord};
pub use stack_kind::{Column, FillStyle, Mountain, StackKind};
pub use types::{AttachmentId, CategoryKey, CategoryKind, RenderKind, Sample, SeriesId, StackLane};
