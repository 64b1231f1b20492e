use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chart_stack::StackError;
use chart_stack::api::StackedMountainGroupSeries;
use chart_stack::core::{SampleSeries, SeriesId};
use chart_stack::extensions::{GroupEvent, GroupObserver, ObserverContext};
use chart_stack::render::NullStackRenderer;

#[derive(Clone)]
struct RecordingObserver {
    id: String,
    events: Rc<RefCell<Vec<(GroupEvent, ObserverContext)>>>,
}

impl RecordingObserver {
    fn new(id: impl Into<String>, events: Rc<RefCell<Vec<(GroupEvent, ObserverContext)>>>) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl GroupObserver for RecordingObserver {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: GroupEvent, context: ObserverContext) {
        self.events.borrow_mut().push((event, context));
    }
}

fn event_kind(event: &GroupEvent) -> &'static str {
    match event {
        GroupEvent::MemberAttached { .. } => "attached",
        GroupEvent::MemberRemoved { .. } => "removed",
        GroupEvent::MemberReordered { .. } => "reordered",
        GroupEvent::MemberUpdated { .. } => "updated",
        GroupEvent::VisibilityChanged { .. } => "visibility",
        GroupEvent::Recomputed { .. } => "recomputed",
        GroupEvent::Rendered { .. } => "rendered",
    }
}

fn mountain(id: u64, points: &[(f64, f64)]) -> Arc<SampleSeries> {
    Arc::new(SampleSeries::mountain(SeriesId::new(id), points))
}

#[test]
fn observer_receives_deterministic_event_sequence() {
    let mut group = StackedMountainGroupSeries::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    group
        .register_observer(Box::new(RecordingObserver::new("recorder", events.clone())))
        .expect("register observer");

    group
        .add_series(mountain(1, &[(1.0, 1.0)]))
        .expect("add a");
    group
        .add_series(mountain(2, &[(1.0, 2.0)]))
        .expect("add b");
    group.reorder(SeriesId::new(2), 0).expect("reorder");
    group
        .set_member_visible(SeriesId::new(1), false)
        .expect("hide");
    assert!(group.remove_series(SeriesId::new(1)));
    group.recompute().expect("recompute");
    group
        .render_with(&mut NullStackRenderer::default())
        .expect("render");

    let kinds: Vec<&str> = events
        .borrow()
        .iter()
        .map(|(event, _)| event_kind(event))
        .collect();
    assert_eq!(
        kinds,
        vec![
            "attached",
            "recomputed",
            "attached",
            "recomputed",
            "reordered",
            "recomputed",
            "visibility",
            "recomputed",
            "removed",
            "recomputed",
            "recomputed",
            "rendered",
        ]
    );
}

#[test]
fn context_reflects_committed_state() {
    let mut group = StackedMountainGroupSeries::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    group
        .register_observer(Box::new(RecordingObserver::new("recorder", events.clone())))
        .expect("register observer");

    group
        .add_series(mountain(1, &[(1.0, 1.0), (2.0, 1.0)]))
        .expect("add a");

    let recorded = events.borrow();
    let (event, context) = recorded.last().expect("event");
    assert_eq!(*event, GroupEvent::Recomputed { revision: 1 });
    assert_eq!(context.revision, 1);
    assert_eq!(context.member_count, 1);
    assert_eq!(context.visible_member_count, 1);
    assert_eq!(context.category_count, 2);
}

#[test]
fn failed_mutation_emits_nothing() {
    let mut group = StackedMountainGroupSeries::new();
    group
        .add_series(mountain(1, &[(1.0, 1.0)]))
        .expect("add a");
    let events = Rc::new(RefCell::new(Vec::new()));
    group
        .register_observer(Box::new(RecordingObserver::new("recorder", events.clone())))
        .expect("register observer");

    let err = group
        .add_series(mountain(1, &[(1.0, 1.0)]))
        .expect_err("duplicate");
    assert!(matches!(err, StackError::DuplicateMember { .. }));
    assert!(group.reorder(SeriesId::new(1), 5).is_err());
    assert!(events.borrow().is_empty());
}

#[test]
fn observer_registry_rejects_duplicate_and_empty_ids() {
    let mut group = StackedMountainGroupSeries::new();
    let events = Rc::new(RefCell::new(Vec::new()));

    group
        .register_observer(Box::new(RecordingObserver::new("a", events.clone())))
        .expect("first");
    let duplicate = group.register_observer(Box::new(RecordingObserver::new("a", events.clone())));
    assert!(matches!(duplicate, Err(StackError::InvalidData(_))));
    let empty = group.register_observer(Box::new(RecordingObserver::new("", events.clone())));
    assert!(matches!(empty, Err(StackError::InvalidData(_))));

    assert_eq!(group.observer_count(), 1);
    assert!(group.has_observer("a"));
    assert!(group.unregister_observer("a"));
    assert!(!group.unregister_observer("a"));
    assert_eq!(group.observer_count(), 0);
}
