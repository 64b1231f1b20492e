use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-accumulation")]
use rayon::prelude::*;

use crate::core::{CategoryKey, CategoryKind, Sample, SeriesId, StackLane};
use crate::error::AccumulationError;

/// How member values are turned into stacked heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StackMode {
    /// Values stack as given.
    #[default]
    Absolute,
    /// Values are scaled per category so the absolute heights sum to 100.
    Percent,
}

/// Samples of one member, in group order.
#[derive(Debug, Clone, Copy)]
pub struct StackInput<'a> {
    pub series: SeriesId,
    pub samples: &'a [Sample],
}

impl<'a> StackInput<'a> {
    #[must_use]
    pub fn new(series: SeriesId, samples: &'a [Sample]) -> Self {
        Self { series, samples }
    }
}

/// Stacked bounds of one member at one category.
///
/// `top == baseline + stacked_value` always holds. `stacked_value` equals
/// `value` in absolute mode and is the percentage share in percent mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedPoint {
    pub series: SeriesId,
    pub category: CategoryKey,
    pub lane: StackLane,
    pub value: f64,
    pub stacked_value: f64,
    pub baseline: f64,
    pub top: f64,
    /// The member had no finite value here and contributes nothing.
    pub is_gap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccumulation {
    pub series: SeriesId,
    /// One point per category of the owning table, in category order.
    pub points: Vec<AccumulatedPoint>,
}

/// Complete accumulation result: one row per member, one column per category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccumulationTable {
    categories: Vec<CategoryKey>,
    rows: Vec<MemberAccumulation>,
}

impl AccumulationTable {
    #[must_use]
    pub fn categories(&self) -> &[CategoryKey] {
        &self.categories
    }

    /// Rows in group order.
    #[must_use]
    pub fn rows(&self) -> &[MemberAccumulation] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row(&self, series: SeriesId) -> Option<&MemberAccumulation> {
        self.rows.iter().find(|row| row.series == series)
    }

    #[must_use]
    pub fn point(&self, series: SeriesId, category: &CategoryKey) -> Option<&AccumulatedPoint> {
        let column = self.categories.iter().position(|key| key == category)?;
        self.row(series).map(|row| &row.points[column])
    }

    /// Lowest and highest stacked bound over the whole table, including zero.
    ///
    /// Returns `None` for an empty table.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.rows.is_empty() || self.categories.is_empty() {
            return None;
        }
        let mut min = 0.0_f64;
        let mut max = 0.0_f64;
        for point in self.rows.iter().flat_map(|row| row.points.iter()) {
            min = min.min(point.baseline).min(point.top);
            max = max.max(point.baseline).max(point.top);
        }
        Some((min, max))
    }
}

/// Computes stacked baselines and tops across the members of a group.
///
/// The accumulator is a pure function of its input: members are walked in
/// the given order per category, non-negative values stack upward on the
/// positive lane and negative values stack downward on the negative lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackAccumulator {
    mode: StackMode,
}

impl StackAccumulator {
    #[must_use]
    pub fn new(mode: StackMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(self) -> StackMode {
        self.mode
    }

    pub fn accumulate(
        self,
        members: &[StackInput<'_>],
    ) -> Result<AccumulationTable, AccumulationError> {
        validate_members(members)?;
        let categories = category_domain(members);
        let dense = dense_values(members, &categories);

        let columns: Vec<Vec<AccumulatedPoint>> = {
            #[cfg(feature = "parallel-accumulation")]
            {
                (0..categories.len())
                    .into_par_iter()
                    .map(|column| {
                        accumulate_column(self.mode, members, &categories, &dense, column)
                    })
                    .collect::<Result<_, _>>()?
            }

            #[cfg(not(feature = "parallel-accumulation"))]
            {
                (0..categories.len())
                    .map(|column| {
                        accumulate_column(self.mode, members, &categories, &dense, column)
                    })
                    .collect::<Result<_, _>>()?
            }
        };

        let mut rows: Vec<MemberAccumulation> = members
            .iter()
            .map(|member| MemberAccumulation {
                series: member.series,
                points: Vec::with_capacity(categories.len()),
            })
            .collect();
        for column in columns {
            for (row, point) in rows.iter_mut().zip(column) {
                row.points.push(point);
            }
        }

        Ok(AccumulationTable {
            categories: categories.into_iter().collect(),
            rows,
        })
    }
}

fn validate_members(members: &[StackInput<'_>]) -> Result<(), AccumulationError> {
    let mut expected: Option<CategoryKind> = None;
    for member in members {
        for (index, sample) in member.samples.iter().enumerate() {
            let found = sample.category.kind();
            match expected {
                None => expected = Some(found),
                Some(expected) if expected != found => {
                    return Err(AccumulationError::MixedCategoryKinds {
                        series: member.series,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            if !sample.category.is_orderable() {
                return Err(AccumulationError::UnsortableCategory {
                    series: member.series,
                });
            }
            if sample.value.is_infinite() {
                return Err(AccumulationError::NonFiniteValue {
                    series: member.series,
                    index,
                });
            }
        }
    }
    Ok(())
}

/// Union of member categories: numeric keys ascending, labels by first appearance.
fn category_domain(members: &[StackInput<'_>]) -> IndexSet<CategoryKey> {
    let mut domain: IndexSet<CategoryKey> = members
        .iter()
        .flat_map(|member| member.samples.iter())
        .map(|sample| sample.category.clone())
        .collect();
    domain.sort_by(CategoryKey::domain_cmp);
    domain
}

/// Member values laid out per category; NaN marks a gap.
fn dense_values(members: &[StackInput<'_>], categories: &IndexSet<CategoryKey>) -> Vec<Vec<f64>> {
    members
        .iter()
        .map(|member| {
            let mut values = vec![f64::NAN; categories.len()];
            for sample in member.samples {
                if let Some(column) = categories.get_index_of(&sample.category) {
                    values[column] = sample.value;
                }
            }
            values
        })
        .collect()
}

fn accumulate_column(
    mode: StackMode,
    members: &[StackInput<'_>],
    categories: &IndexSet<CategoryKey>,
    dense: &[Vec<f64>],
    column: usize,
) -> Result<Vec<AccumulatedPoint>, AccumulationError> {
    let category = &categories[column];
    let scale = match mode {
        StackMode::Absolute => 1.0,
        StackMode::Percent => {
            let total: f64 = dense
                .iter()
                .map(|values| values[column])
                .filter(|value| !value.is_nan())
                .map(f64::abs)
                .sum();
            if total > 0.0 { 100.0 / total } else { 0.0 }
        }
    };

    let mut positive = 0.0_f64;
    let mut negative = 0.0_f64;
    let mut points = Vec::with_capacity(members.len());
    for (member, values) in members.iter().zip(dense) {
        let value = values[column];
        if value.is_nan() {
            points.push(AccumulatedPoint {
                series: member.series,
                category: category.clone(),
                lane: StackLane::Positive,
                value: 0.0,
                stacked_value: 0.0,
                baseline: positive,
                top: positive,
                is_gap: true,
            });
            continue;
        }

        let lane = StackLane::for_value(value);
        let stacked_value = match mode {
            StackMode::Absolute => value,
            StackMode::Percent => value * scale,
        };
        let total = match lane {
            StackLane::Positive => &mut positive,
            StackLane::Negative => &mut negative,
        };
        let baseline = *total;
        let top = baseline + stacked_value;
        if !top.is_finite() {
            return Err(AccumulationError::StackOverflow {
                series: member.series,
                category: category.clone(),
            });
        }
        *total = top;
        points.push(AccumulatedPoint {
            series: member.series,
            category: category.clone(),
            lane,
            value,
            stacked_value,
            baseline,
            top,
            is_gap: false,
        });
    }
    Ok(points)
}
