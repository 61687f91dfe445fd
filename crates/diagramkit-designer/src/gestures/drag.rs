//! Move gesture.
//!
//! Small selections move every item on each pointer tick (instant preview).
//! Selections at or above the preview threshold move only the item under
//! the pointer while dragging; the accumulated offset is applied to the
//! rest when the gesture completes.

use diagramkit_core::{ObjectId, Result, Vector};

use crate::collection::GraphicalObjectCollection;

/// Default selection size at which drag switches to batched mode.
pub const DEFAULT_INSTANT_PREVIEW_THRESHOLD: usize = 200;

#[derive(Debug, Clone)]
pub struct DragGesture {
    live: ObjectId,
    items: Vec<ObjectId>,
    instant: bool,
    accumulated: Vector,
}

impl DragGesture {
    /// Starts dragging `live` together with `items` (the selected entities).
    pub fn begin(live: ObjectId, mut items: Vec<ObjectId>, threshold: usize) -> Self {
        if !items.contains(&live) {
            items.push(live);
        }
        let instant = items.len() < threshold;
        tracing::debug!(
            "Drag started on {} with {} item(s), instant preview: {}",
            live,
            items.len(),
            instant
        );
        Self {
            live,
            items,
            instant,
            accumulated: Vector::default(),
        }
    }

    pub fn is_instant_preview(&self) -> bool {
        self.instant
    }

    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    /// Offset applied so far to the live item.
    pub fn accumulated(&self) -> Vector {
        self.accumulated
    }

    /// Applies one pointer tick.
    ///
    /// The delta is clamped so no dragged item's left or top goes below
    /// zero (items already at negative coordinates cannot move further
    /// out). Returns the delta actually applied.
    pub fn update(&mut self, items: &mut GraphicalObjectCollection, delta: Vector) -> Result<Vector> {
        let (min_left, min_top) = self.effective_min(items);
        let applied = Vector::new(
            delta.x.max(-min_left.max(0.0)),
            delta.y.max(-min_top.max(0.0)),
        );
        if applied == Vector::default() {
            return Ok(applied);
        }

        if self.instant {
            for id in &self.items {
                items.modify_entity(*id, |e| e.translate(applied))?;
            }
        } else {
            items.modify_entity(self.live, |e| e.translate(applied))?;
        }
        self.accumulated = self.accumulated + applied;
        tracing::trace!("Drag tick {:?}, total {:?}", applied, self.accumulated);
        Ok(applied)
    }

    /// Finishes the gesture. In batched mode the accumulated offset is
    /// applied to every item other than the live one.
    pub fn complete(self, items: &mut GraphicalObjectCollection) -> Result<()> {
        if !self.instant {
            let total = self.accumulated;
            for id in self.items.iter().filter(|id| **id != self.live) {
                items.modify_entity(*id, |e| {
                    let floor_x = e.left().min(0.0);
                    let floor_y = e.top().min(0.0);
                    e.set_left((e.left() + total.x).max(floor_x));
                    e.set_top((e.top() + total.y).max(floor_y));
                })?;
            }
        }
        tracing::debug!("Drag completed, moved by {:?}", self.accumulated);
        Ok(())
    }

    /// Aborts the gesture, moving whatever moved back.
    pub fn cancel(self, items: &mut GraphicalObjectCollection) -> Result<()> {
        let back = -self.accumulated;
        if self.instant {
            for id in &self.items {
                items.modify_entity(*id, |e| e.translate(back))?;
            }
        } else {
            items.modify_entity(self.live, |e| e.translate(back))?;
        }
        Ok(())
    }

    /// Smallest left/top among dragged items, counting the pending offset
    /// of items that have not moved yet in batched mode.
    fn effective_min(&self, items: &GraphicalObjectCollection) -> (f64, f64) {
        let mut min_left = f64::INFINITY;
        let mut min_top = f64::INFINITY;
        for id in &self.items {
            let Some(entity) = items.get_entity(*id) else {
                continue;
            };
            let pending = if self.instant || *id == self.live {
                Vector::default()
            } else {
                self.accumulated
            };
            min_left = min_left.min(entity.left() + pending.x);
            min_top = min_top.min(entity.top() + pending.y);
        }
        if !min_left.is_finite() {
            min_left = 0.0;
        }
        if !min_top.is_finite() {
            min_top = 0.0;
        }
        (min_left, min_top)
    }
}
