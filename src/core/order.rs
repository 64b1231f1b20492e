use indexmap::IndexMap;

use crate::core::SeriesId;
use crate::error::{StackError, StackResult};

/// Deterministic member order of a stacked group.
///
/// Accumulation order and draw order are the same sequence: index 0 stacks
/// first and is drawn first (bottom of the z-order).
///
/// Identity lookups are O(1). Positional `insert`, `remove` and `reorder`
/// shift the entries after the affected index and are O(n) in the member
/// count.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOrderPolicy<T> {
    members: IndexMap<SeriesId, T>,
}

impl<T> Default for GroupOrderPolicy<T> {
    fn default() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }
}

impl<T> GroupOrderPolicy<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: SeriesId) -> bool {
        self.members.contains_key(&id)
    }

    #[must_use]
    pub fn position_of(&self, id: SeriesId) -> Option<usize> {
        self.members.get_index_of(&id)
    }

    #[must_use]
    pub fn get(&self, id: SeriesId) -> Option<&T> {
        self.members.get(&id)
    }

    pub fn get_mut(&mut self, id: SeriesId) -> Option<&mut T> {
        self.members.get_mut(&id)
    }

    /// Members in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (SeriesId, &T)> + '_ {
        self.members.iter().map(|(id, member)| (*id, member))
    }

    pub fn ids(&self) -> impl Iterator<Item = SeriesId> + '_ {
        self.members.keys().copied()
    }

    /// Inserts `member` at `position`, or at the end when `position` is `None`.
    ///
    /// `position == len()` is an append.
    pub fn insert(&mut self, id: SeriesId, member: T, position: Option<usize>) -> StackResult<()> {
        if self.members.contains_key(&id) {
            return Err(StackError::DuplicateMember { series: id });
        }
        let len = self.members.len();
        let position = position.unwrap_or(len);
        if position > len {
            return Err(StackError::InvalidPosition { position, len });
        }
        self.members.shift_insert(position, id, member);
        Ok(())
    }

    /// Removes a member, preserving the relative order of the rest.
    pub fn remove(&mut self, id: SeriesId) -> Option<T> {
        self.members.shift_remove(&id)
    }

    /// Moves a member to `position`. Returns `Ok(false)` when `id` is absent.
    pub fn reorder(&mut self, id: SeriesId, position: usize) -> StackResult<bool> {
        let len = self.members.len();
        if position >= len {
            return Err(StackError::InvalidPosition { position, len });
        }
        let Some(from) = self.members.get_index_of(&id) else {
            return Ok(false);
        };
        self.members.move_index(from, position);
        Ok(true)
    }
}
