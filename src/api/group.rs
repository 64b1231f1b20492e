use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace, warn};

use crate::core::{
    AccumulationTable, AttachmentId, Column, FillStyle, GroupOrderPolicy, Mountain, Sample,
    SeriesId, SeriesRecord, StackAccumulator, StackInput, StackKind, StackMode,
};
use crate::error::{StackError, StackResult};
use crate::extensions::{GroupEvent, GroupObserver, ObserverContext};
use crate::render::{StackRenderer, StackedRenderItem};

use super::{GapPolicy, GroupSnapshot, MemberState, MemberView, SnapshotReader, StackGroupConfig};

/// Shared handle to a series owned by the data layer.
pub type SharedSeries = Arc<dyn SeriesRecord>;

/// Group of mountain (area) series stacked in insertion order.
pub type StackedMountainGroupSeries = StackedGroupSeries<Mountain>;

/// Group of column series stacked in insertion order.
pub type StackedColumnGroupSeries = StackedGroupSeries<Column>;

type PendingEvents = SmallVec<[GroupEvent; 2]>;

#[derive(Debug, Clone)]
struct MemberEntry {
    record: SharedSeries,
    attachment: AttachmentId,
    visible: bool,
}

/// Ordered group of series whose values stack on top of each other.
///
/// Every mutation builds a candidate membership, accumulates it, and only
/// then replaces the committed snapshot. A failed mutation leaves the group
/// exactly as it was. Renderers read committed snapshots through
/// [`StackedGroupSeries::snapshot`] or a [`SnapshotReader`].
pub struct StackedGroupSeries<K: StackKind> {
    config: StackGroupConfig,
    order: GroupOrderPolicy<MemberEntry>,
    next_attachment: u64,
    committed: Arc<GroupSnapshot>,
    reader: SnapshotReader,
    dirty: bool,
    pub(super) observers: Vec<Box<dyn GroupObserver>>,
    _kind: PhantomData<K>,
}

impl<K: StackKind> fmt::Debug for StackedGroupSeries<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackedGroupSeries")
            .field("kind", &K::NAME)
            .field("config", &self.config)
            .field("revision", &self.committed.revision)
            .field("members", &self.committed.members)
            .field("dirty", &self.dirty)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<K: StackKind> Default for StackedGroupSeries<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StackKind> StackedGroupSeries<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StackGroupConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StackGroupConfig) -> Self {
        let committed = Arc::new(GroupSnapshot::empty(K::NAME, K::fill_style(), config));
        let reader = SnapshotReader::new(Arc::clone(&committed));
        Self {
            config,
            order: GroupOrderPolicy::default(),
            next_attachment: 0,
            committed,
            reader,
            dirty: false,
            observers: Vec::new(),
            _kind: PhantomData,
        }
    }

    #[must_use]
    pub fn config(&self) -> StackGroupConfig {
        self.config
    }

    #[must_use]
    pub fn fill_style(&self) -> FillStyle {
        K::fill_style()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, series: SeriesId) -> bool {
        self.order.contains(series)
    }

    /// Committed members in draw order.
    #[must_use]
    pub fn members(&self) -> &[MemberView] {
        &self.committed.members
    }

    /// Last committed accumulation table.
    #[must_use]
    pub fn table(&self) -> &AccumulationTable {
        &self.committed.table
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.committed.revision
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<GroupSnapshot> {
        Arc::clone(&self.committed)
    }

    /// Handle for render threads; always yields the latest committed snapshot.
    #[must_use]
    pub fn snapshot_reader(&self) -> SnapshotReader {
        self.reader.clone()
    }

    /// Lowest and highest stacked bound of the committed table.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.committed.table.value_range()
    }

    /// Appends a member at the top of the stack.
    pub fn add_series(&mut self, series: SharedSeries) -> StackResult<AttachmentId> {
        self.attach(series, None)
    }

    /// Inserts a member at `position` (`0..=len()`).
    pub fn insert_series(
        &mut self,
        series: SharedSeries,
        position: usize,
    ) -> StackResult<AttachmentId> {
        self.attach(series, Some(position))
    }

    /// Detaches a member. Returns `false` when the series is not a member.
    ///
    /// Also returns `false` when the remaining members no longer accumulate
    /// (their data changed since the last commit and became invalid). The
    /// member and the committed snapshot are kept, and the group is marked
    /// dirty: `contains(series)` and `is_dirty()` both stay `true`, while an
    /// absent series leaves `is_dirty()` as it was.
    pub fn remove_series(&mut self, series: SeriesId) -> bool {
        let mut candidate = self.order.clone();
        let Some(entry) = candidate.remove(series) else {
            return false;
        };
        let event = GroupEvent::MemberRemoved {
            series,
            attachment: entry.attachment,
        };
        match self.commit(candidate, self.config, smallvec![event]) {
            Ok(()) => {
                debug!(series = %series, attachment = %entry.attachment, "removed stacked member");
                true
            }
            Err(err) => {
                warn!(series = %series, error = %err, "keeping member after failed removal");
                self.dirty = true;
                false
            }
        }
    }

    /// Moves a member to `position` (`0..len()`).
    ///
    /// Returns `Ok(false)` when the series is not a member.
    pub fn reorder(&mut self, series: SeriesId, position: usize) -> StackResult<bool> {
        let mut candidate = self.order.clone();
        // Bounds are checked before membership, so an out-of-range position
        // fails even for an absent series.
        if !candidate.reorder(series, position)? {
            return Ok(false);
        }
        let Some(from) = self.order.position_of(series) else {
            return Ok(false);
        };
        if from == position {
            return Ok(true);
        }
        self.commit(
            candidate,
            self.config,
            smallvec![GroupEvent::MemberReordered {
                series,
                from,
                to: position,
            }],
        )?;
        debug!(series = %series, from, to = position, "reordered stacked member");
        Ok(true)
    }

    /// Replaces the data handle of an existing member, keeping its
    /// attachment, position and visibility.
    ///
    /// Returns `Ok(false)` when the series is not a member.
    pub fn update_series(&mut self, series: SharedSeries) -> StackResult<bool> {
        let id = series.id();
        if !self.order.contains(id) {
            return Ok(false);
        }
        self.check_compatible(&*series)?;

        let mut candidate = self.order.clone();
        if let Some(entry) = candidate.get_mut(id) {
            entry.record = series;
        }
        self.commit(
            candidate,
            self.config,
            smallvec![GroupEvent::MemberUpdated { series: id }],
        )?;
        Ok(true)
    }

    /// Shows or hides a member. Hidden members keep their position but are
    /// left out of accumulation.
    ///
    /// Returns `Ok(false)` when the series is not a member.
    pub fn set_member_visible(&mut self, series: SeriesId, visible: bool) -> StackResult<bool> {
        let mut candidate = self.order.clone();
        let Some(entry) = candidate.get_mut(series) else {
            return Ok(false);
        };
        if entry.visible == visible {
            return Ok(true);
        }
        entry.visible = visible;
        self.commit(
            candidate,
            self.config,
            smallvec![GroupEvent::VisibilityChanged { series, visible }],
        )?;
        Ok(true)
    }

    /// Switches between absolute and percent stacking and recommits.
    pub fn set_stack_mode(&mut self, stack_mode: StackMode) -> StackResult<()> {
        if self.config.stack_mode == stack_mode {
            return Ok(());
        }
        let config = self.config.with_stack_mode(stack_mode);
        self.commit(self.order.clone(), config, SmallVec::new())
    }

    pub fn set_gap_policy(&mut self, gap_policy: GapPolicy) -> StackResult<()> {
        if self.config.gap_policy == gap_policy {
            return Ok(());
        }
        let config = self.config.with_gap_policy(gap_policy);
        self.commit(self.order.clone(), config, SmallVec::new())
    }

    /// Marks member values as changed by the data layer.
    ///
    /// The committed snapshot is kept until the next `refresh` or `recompute`.
    pub fn invalidate(&mut self) {
        trace!(revision = self.committed.revision, "stacked group invalidated");
        self.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes only when the group was invalidated. Returns whether a new
    /// snapshot was committed.
    pub fn refresh(&mut self) -> StackResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.recompute()?;
        Ok(true)
    }

    /// Re-reads all member values, commits a new snapshot and returns its table.
    pub fn recompute(&mut self) -> StackResult<&AccumulationTable> {
        self.commit(self.order.clone(), self.config, SmallVec::new())?;
        Ok(&self.committed.table)
    }

    /// Lifecycle state of an attachment minted by this group.
    #[must_use]
    pub fn member_state(&self, attachment: AttachmentId) -> MemberState {
        if self
            .order
            .iter()
            .any(|(_, entry)| entry.attachment == attachment)
        {
            MemberState::Attached
        } else if attachment.raw() < self.next_attachment {
            MemberState::Removed
        } else {
            MemberState::Unattached
        }
    }

    /// Draw list of the committed snapshot.
    #[must_use]
    pub fn render_items(&self) -> Vec<StackedRenderItem> {
        self.committed.render_items()
    }

    /// Hands the committed draw list to `renderer`.
    pub fn render_with<R: StackRenderer>(&mut self, renderer: &mut R) -> StackResult<()> {
        let frame = self.committed.frame();
        renderer.render(&frame)?;
        self.emit_event(GroupEvent::Rendered {
            revision: frame.revision,
            item_count: frame.items.len(),
        });
        Ok(())
    }

    fn attach(
        &mut self,
        series: SharedSeries,
        position: Option<usize>,
    ) -> StackResult<AttachmentId> {
        let id = series.id();
        if self.order.contains(id) {
            warn!(series = %id, group = K::NAME, "rejected duplicate member");
            return Err(StackError::DuplicateMember { series: id });
        }
        self.check_compatible(&*series)?;

        let attachment = AttachmentId::new(self.next_attachment);
        let visible = series.is_visible();
        let position = position.unwrap_or(self.order.len());
        let mut candidate = self.order.clone();
        candidate.insert(
            id,
            MemberEntry {
                record: series,
                attachment,
                visible,
            },
            Some(position),
        )?;
        self.commit(
            candidate,
            self.config,
            smallvec![GroupEvent::MemberAttached {
                series: id,
                attachment,
                position,
            }],
        )?;
        self.next_attachment += 1;
        debug!(
            series = %id,
            attachment = %attachment,
            position,
            group = K::NAME,
            "attached stacked member"
        );
        Ok(attachment)
    }

    fn check_compatible(&self, series: &dyn SeriesRecord) -> StackResult<()> {
        let kind = series.render_kind();
        if K::accepts(kind) {
            return Ok(());
        }
        warn!(series = %series.id(), ?kind, group = K::NAME, "rejected incompatible member");
        Err(StackError::IncompatibleMember {
            series: series.id(),
            kind,
            group: K::NAME,
        })
    }

    fn commit(
        &mut self,
        candidate: GroupOrderPolicy<MemberEntry>,
        config: StackGroupConfig,
        events: PendingEvents,
    ) -> StackResult<()> {
        let table = accumulate(&candidate, config.stack_mode).inspect_err(|err| {
            warn!(error = %err, group = K::NAME, "accumulation failed, snapshot kept");
        })?;

        let revision = self.committed.revision + 1;
        let members = candidate
            .iter()
            .enumerate()
            .map(|(draw_index, (series, entry))| MemberView {
                series,
                attachment: entry.attachment,
                render_kind: entry.record.render_kind(),
                visible: entry.visible,
                draw_index,
            })
            .collect();
        let snapshot = Arc::new(GroupSnapshot {
            revision,
            kind: K::NAME.to_owned(),
            fill_style: K::fill_style(),
            stack_mode: config.stack_mode,
            gap_policy: config.gap_policy,
            members,
            table,
        });

        self.order = candidate;
        self.config = config;
        self.committed = Arc::clone(&snapshot);
        self.reader.publish(snapshot);
        self.dirty = false;
        debug!(
            revision,
            members = self.committed.members.len(),
            categories = self.committed.table.categories().len(),
            group = K::NAME,
            "committed stacked group snapshot"
        );

        for event in events {
            self.emit_event(event);
        }
        self.emit_event(GroupEvent::Recomputed { revision });
        Ok(())
    }

    fn observer_context(&self) -> ObserverContext {
        ObserverContext {
            revision: self.committed.revision,
            member_count: self.committed.members.len(),
            visible_member_count: self.committed.visible_member_count(),
            category_count: self.committed.table.categories().len(),
            stack_mode: self.committed.stack_mode,
        }
    }

    fn emit_event(&mut self, event: GroupEvent) {
        let context = self.observer_context();
        for observer in &mut self.observers {
            observer.on_event(event, context);
        }
    }
}

fn accumulate(
    order: &GroupOrderPolicy<MemberEntry>,
    stack_mode: StackMode,
) -> StackResult<AccumulationTable> {
    let visible: Vec<(SeriesId, Cow<'_, [Sample]>)> = order
        .iter()
        .filter(|(_, entry)| entry.visible)
        .map(|(series, entry)| (series, entry.record.samples()))
        .collect();
    let inputs: Vec<StackInput<'_>> = visible
        .iter()
        .map(|(series, samples)| StackInput::new(*series, samples))
        .collect();
    trace!(
        members = order.len(),
        visible = inputs.len(),
        ?stack_mode,
        "accumulating stacked group"
    );
    Ok(StackAccumulator::new(stack_mode).accumulate(&inputs)?)
}
