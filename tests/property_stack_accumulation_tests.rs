use std::sync::Arc;

use approx::assert_relative_eq;
use chart_stack::api::{StackGroupConfig, StackedMountainGroupSeries};
use chart_stack::core::{SampleSeries, SeriesId, StackLane, StackMode};
use proptest::prelude::*;

fn build_group(values: &[Vec<f64>], mode: StackMode) -> StackedMountainGroupSeries {
    let mut group =
        StackedMountainGroupSeries::with_config(StackGroupConfig::new().with_stack_mode(mode));
    for (id, member) in values.iter().enumerate() {
        let points: Vec<(f64, f64)> = member
            .iter()
            .enumerate()
            .map(|(x, &y)| (x as f64, y))
            .collect();
        group
            .add_series(Arc::new(SampleSeries::mountain(SeriesId::new(id as u64), &points)))
            .expect("add member");
    }
    group
}

fn member_values() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..6, 1usize..12).prop_flat_map(|(members, categories)| {
        proptest::collection::vec(
            proptest::collection::vec(-1_000.0f64..1_000.0, categories),
            members,
        )
    })
}

proptest! {
    #[test]
    fn lanes_stack_monotonically_in_group_order(values in member_values()) {
        let group = build_group(&values, StackMode::Absolute);
        let table = group.table();
        prop_assert_eq!(table.rows().len(), values.len());

        for column in 0..table.categories().len() {
            let mut positive = 0.0_f64;
            let mut negative = 0.0_f64;
            for row in table.rows() {
                let point = &row.points[column];
                prop_assert_eq!(point.top, point.baseline + point.stacked_value);
                match point.lane {
                    StackLane::Positive => {
                        prop_assert!(point.value >= 0.0);
                        prop_assert_eq!(point.baseline, positive);
                        prop_assert!(point.top >= positive);
                        positive = point.top;
                    }
                    StackLane::Negative => {
                        prop_assert!(point.value < 0.0);
                        prop_assert_eq!(point.baseline, negative);
                        prop_assert!(point.top <= negative);
                        negative = point.top;
                    }
                }
            }
        }
    }

    #[test]
    fn percent_mode_lanes_span_one_hundred(values in member_values()) {
        let group = build_group(&values, StackMode::Percent);
        let table = group.table();

        for column in 0..table.categories().len() {
            let total: f64 = values.iter().map(|member| member[column].abs()).sum();
            prop_assume!(total > 0.0);
            let positive = table
                .rows()
                .iter()
                .map(|row| &row.points[column])
                .filter(|point| point.lane == StackLane::Positive)
                .map(|point| point.top)
                .fold(0.0_f64, f64::max);
            let negative = table
                .rows()
                .iter()
                .map(|row| &row.points[column])
                .filter(|point| point.lane == StackLane::Negative)
                .map(|point| point.top)
                .fold(0.0_f64, f64::min);
            assert_relative_eq!(positive - negative, 100.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn add_then_remove_restores_table(
        values in member_values(),
        extra in proptest::collection::vec(-1_000.0f64..1_000.0, 1..12),
    ) {
        let mut group = build_group(&values, StackMode::Absolute);
        let before = group.table().clone();

        let points: Vec<(f64, f64)> = extra
            .iter()
            .enumerate()
            .map(|(x, &y)| (x as f64, y))
            .collect();
        let extra_id = SeriesId::new(10_000);
        group
            .add_series(Arc::new(SampleSeries::mountain(extra_id, &points)))
            .expect("add extra");
        prop_assert!(group.remove_series(extra_id));

        prop_assert_eq!(group.table(), &before);
    }

    #[test]
    fn reorder_preserves_membership(
        values in member_values(),
        target in 0usize..6,
    ) {
        let mut group = build_group(&values, StackMode::Absolute);
        let len = group.len();
        let target = target % len;
        let moved = SeriesId::new(0);

        prop_assert!(group.reorder(moved, target).expect("reorder"));
        prop_assert_eq!(group.len(), len);
        let order: Vec<SeriesId> = group.members().iter().map(|view| view.series).collect();
        prop_assert_eq!(order[target], moved);
        let mut sorted: Vec<u64> = order.iter().map(|id| id.raw()).collect();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..len as u64).collect::<Vec<_>>());
    }
}
