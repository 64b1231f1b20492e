use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use tracing::warn;

use crate::core::{CategoryKey, CategoryKind, RenderKind, Sample, SeriesId};

/// Data-layer view of a series that can join a stacked group.
///
/// Groups never own series data. They hold shared handles and re-read
/// `samples()` whenever they recompute, so implementations backed by
/// interior mutability must call the owning group's `invalidate()` after
/// their values change.
pub trait SeriesRecord: fmt::Debug + Send + Sync {
    fn id(&self) -> SeriesId;

    fn render_kind(&self) -> RenderKind;

    /// Hidden series keep their order position but are not stacked.
    fn is_visible(&self) -> bool {
        true
    }

    /// Ordered `(category, value)` samples.
    fn samples(&self) -> Cow<'_, [Sample]>;
}

/// Owned, immutable in-memory series.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    id: SeriesId,
    render_kind: RenderKind,
    visible: bool,
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Builds a series from raw samples.
    ///
    /// Numeric-keyed input is canonicalized: samples with non-finite keys are dropped,
    /// the rest are sorted by key and the last sample of a duplicated key
    /// wins. Label-keyed input keeps its order with the same last-wins rule.
    /// Values are kept as given; NaN values mark gaps.
    #[must_use]
    pub fn new(id: SeriesId, render_kind: RenderKind, samples: Vec<Sample>) -> Self {
        Self {
            id,
            render_kind,
            visible: true,
            samples: canonicalize_samples(id, samples),
        }
    }

    /// Convenience constructor for numeric `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(id: SeriesId, render_kind: RenderKind, points: &[(f64, f64)]) -> Self {
        let samples = points.iter().map(|&(x, y)| Sample::new(x, y)).collect();
        Self::new(id, render_kind, samples)
    }

    #[must_use]
    pub fn mountain(id: SeriesId, points: &[(f64, f64)]) -> Self {
        Self::from_xy(id, RenderKind::Mountain, points)
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SeriesRecord for SampleSeries {
    fn id(&self) -> SeriesId {
        self.id
    }

    fn render_kind(&self) -> RenderKind {
        self.render_kind
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn samples(&self) -> Cow<'_, [Sample]> {
        Cow::Borrowed(&self.samples)
    }
}

fn canonicalize_samples(id: SeriesId, mut samples: Vec<Sample>) -> Vec<Sample> {
    let original_len = samples.len();
    samples.retain(|sample| sample.category.is_orderable());
    let dropped_keys = original_len - samples.len();

    let all_numeric = samples
        .iter()
        .all(|sample| sample.category.kind() == CategoryKind::Numeric);
    if all_numeric {
        samples.sort_by(|a, b| a.category.domain_cmp(&b.category));
    }

    let sorted_len = samples.len();
    let mut deduped: IndexMap<CategoryKey, f64> = IndexMap::with_capacity(sorted_len);
    for sample in samples {
        // `insert` keeps the first position of a key and overwrites its value.
        deduped.insert(sample.category, sample.value);
    }
    let duplicate_count = sorted_len - deduped.len();

    if dropped_keys > 0 || duplicate_count > 0 {
        warn!(
            series = %id,
            dropped_keys,
            duplicate_count,
            canonical_count = deduped.len(),
            "canonicalized series samples"
        );
    }
    deduped
        .into_iter()
        .map(|(category, value)| Sample { category, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{SampleSeries, SeriesRecord};
    use crate::core::{CategoryKey, RenderKind, Sample, SeriesId};

    #[test]
    fn numeric_samples_are_sorted_and_last_duplicate_wins() {
        let series = SampleSeries::from_xy(
            SeriesId::new(1),
            RenderKind::Mountain,
            &[(3.0, 30.0), (1.0, 10.0), (f64::NAN, 99.0), (3.0, 31.0)],
        );
        let samples = series.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Sample::new(1.0, 10.0));
        assert_eq!(samples[1], Sample::new(3.0, 31.0));
    }

    #[test]
    fn label_samples_keep_input_order() {
        let series = SampleSeries::new(
            SeriesId::new(2),
            RenderKind::Column,
            vec![
                Sample::new("q2", 2.0),
                Sample::new("q1", 1.0),
                Sample::new("q2", 5.0),
            ],
        );
        let samples = series.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].category, CategoryKey::label("q2"));
        assert!((samples[0].value - 5.0).abs() <= f64::EPSILON);
        assert_eq!(samples[1].category, CategoryKey::label("q1"));
    }

    #[test]
    fn infinite_keys_are_dropped() {
        let series = SampleSeries::mountain(
            SeriesId::new(4),
            &[(1.0, 1.0), (f64::INFINITY, 2.0), (f64::NEG_INFINITY, 3.0)],
        );
        assert_eq!(series.samples().as_ref(), &[Sample::new(1.0, 1.0)]);
    }

    #[test]
    fn nan_values_are_kept_as_gaps() {
        let series = SampleSeries::mountain(SeriesId::new(3), &[(1.0, f64::NAN), (2.0, 4.0)]);
        assert_eq!(series.len(), 2);
        assert!(series.samples()[0].value.is_nan());
    }
}
