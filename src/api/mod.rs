mod group;
mod group_config;
mod group_snapshot;
mod observer_registry;

pub use group::{
    SharedSeries, StackedColumnGroupSeries, StackedGroupSeries, StackedMountainGroupSeries,
};
pub use group_config::{GapPolicy, StackGroupConfig};
pub use group_snapshot::{
    GROUP_SNAPSHOT_JSON_SCHEMA_V1, GroupSnapshot, GroupSnapshotJsonContractV1, MemberState,
    MemberView, SnapshotReader,
};
