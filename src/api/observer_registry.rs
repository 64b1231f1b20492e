use crate::core::StackKind;
use crate::error::{StackError, StackResult};
use crate::extensions::GroupObserver;

use super::StackedGroupSeries;

impl<K: StackKind> StackedGroupSeries<K> {
    /// Registers an observer with a unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn GroupObserver>) -> StackResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(StackError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(StackError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        else {
            return false;
        };
        self.observers.remove(position);
        true
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }
}
