//! Selection set.
//!
//! Holds the ids of selected objects. The canvas keeps it a subset of the
//! item collection. Membership changes are recorded as [`CollectionEvent`]s
//! in the same shape the item collection uses, so container flags can be
//! synchronized from the same notification stream.

use std::collections::HashSet;

use diagramkit_core::{CollectionChange, CollectionEvent, ObjectId};

/// Ids of the currently selected objects.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: HashSet<ObjectId>,
    events: Vec<CollectionEvent>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    /// Iterate over selected ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    /// Selects `id`. Returns false if it was already selected.
    pub fn add(&mut self, id: ObjectId) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.changed(CollectionChange::Add(vec![id]));
        true
    }

    /// Selects every id not already selected, with a single notification.
    /// Returns the number of ids added.
    pub fn add_range<I: IntoIterator<Item = ObjectId>>(&mut self, ids: I) -> usize {
        let added: Vec<ObjectId> = ids.into_iter().filter(|id| self.ids.insert(*id)).collect();
        let count = added.len();
        if count > 0 {
            self.changed(CollectionChange::Add(added));
        }
        count
    }

    /// Deselects `id`. Returns false if it was not selected.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.changed(CollectionChange::Remove(vec![id]));
        true
    }

    /// Deselects every listed id that is selected, with a single notification.
    pub fn remove_range<I: IntoIterator<Item = ObjectId>>(&mut self, ids: I) -> usize {
        let removed: Vec<ObjectId> = ids.into_iter().filter(|id| self.ids.remove(id)).collect();
        let count = removed.len();
        if count > 0 {
            self.changed(CollectionChange::Remove(removed));
        }
        count
    }

    /// Swaps `old` for `new` in place.
    ///
    /// Returns false (and changes nothing) if `old` is not selected or `new`
    /// already is.
    pub fn replace(&mut self, old: ObjectId, new: ObjectId) -> bool {
        if old == new || !self.ids.contains(&old) || self.ids.contains(&new) {
            return false;
        }
        self.ids.remove(&old);
        self.ids.insert(new);
        self.changed(CollectionChange::Replace { old, new });
        true
    }

    /// Selects `id` if unselected, deselects it otherwise. Returns the new state.
    pub fn toggle(&mut self, id: ObjectId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.add(id)
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        self.ids.clear();
        self.changed(CollectionChange::Reset);
    }

    /// Take the recorded notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }

    fn changed(&mut self, change: CollectionChange) {
        self.events.push(CollectionEvent::Changed(change));
        self.events.push(CollectionEvent::CountChanged(self.ids.len()));
    }
}
