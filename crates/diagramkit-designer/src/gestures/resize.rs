//! Resize gesture.
//!
//! A handle sits on one edge or one corner of the item it was grabbed on,
//! and every resizable selected item follows it. Limits are computed across
//! the whole group, so a tick that would push any item below its minimum
//! size (or a Left/Top edge below zero) is cut back for all of them.

use diagramkit_core::{ObjectId, Rect, Result, Vector};

use crate::collection::GraphicalObjectCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalEdge {
    Top,
    Bottom,
}

/// Which edges a resize handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub horizontal: Option<HorizontalEdge>,
    pub vertical: Option<VerticalEdge>,
}

impl ResizeHandle {
    pub const TOP: Self = Self::new(None, Some(VerticalEdge::Top));
    pub const BOTTOM: Self = Self::new(None, Some(VerticalEdge::Bottom));
    pub const LEFT: Self = Self::new(Some(HorizontalEdge::Left), None);
    pub const RIGHT: Self = Self::new(Some(HorizontalEdge::Right), None);
    pub const TOP_LEFT: Self = Self::new(Some(HorizontalEdge::Left), Some(VerticalEdge::Top));
    pub const TOP_RIGHT: Self = Self::new(Some(HorizontalEdge::Right), Some(VerticalEdge::Top));
    pub const BOTTOM_LEFT: Self = Self::new(Some(HorizontalEdge::Left), Some(VerticalEdge::Bottom));
    pub const BOTTOM_RIGHT: Self =
        Self::new(Some(HorizontalEdge::Right), Some(VerticalEdge::Bottom));

    pub const fn new(horizontal: Option<HorizontalEdge>, vertical: Option<VerticalEdge>) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn is_corner(&self) -> bool {
        self.horizontal.is_some() && self.vertical.is_some()
    }
}

/// Group limits for one tick.
struct Limits {
    min_left: f64,
    min_top: f64,
    /// Largest amount every item can still shrink horizontally.
    max_shrink_x: f64,
    max_shrink_y: f64,
    /// Aspect-locked height shrink that keeps every derived width at or
    /// above its minimum.
    aspect_max_shrink: f64,
    /// Aspect-locked height growth that keeps every Left edge at or above
    /// zero. Unbounded for Right handles.
    aspect_max_grow: f64,
}

#[derive(Debug, Clone)]
pub struct ResizeGesture {
    handle: ResizeHandle,
    items: Vec<ObjectId>,
    /// Unrotated frames at gesture start, restored on cancel.
    originals: Vec<(ObjectId, Rect)>,
}

impl ResizeGesture {
    /// Starts resizing `items` from `handle`. Non-resizable entities are
    /// dropped from the group up front.
    pub fn begin(
        handle: ResizeHandle,
        items: Vec<ObjectId>,
        collection: &GraphicalObjectCollection,
    ) -> Self {
        let items: Vec<ObjectId> = items
            .into_iter()
            .filter(|id| collection.get_entity(*id).is_some_and(|e| e.resizeable()))
            .collect();
        let originals = items
            .iter()
            .filter_map(|id| collection.get_entity(*id).map(|e| (*id, e.frame())))
            .collect();
        tracing::debug!("Resize started with {} item(s)", items.len());
        Self {
            handle,
            items,
            originals,
        }
    }

    pub fn handle(&self) -> ResizeHandle {
        self.handle
    }

    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    /// Applies one pointer tick of `change` (device-independent canvas units).
    ///
    /// With `preserve_aspect` on a corner handle, the height follows the
    /// vertical edge and the width is derived from each item's original
    /// aspect ratio.
    pub fn update(
        &mut self,
        collection: &mut GraphicalObjectCollection,
        change: Vector,
        preserve_aspect: bool,
    ) -> Result<()> {
        let Some(limits) = self.limits(collection) else {
            return Ok(());
        };
        let aspect = preserve_aspect && self.handle.is_corner();

        let dy = match self.handle.vertical {
            Some(VerticalEdge::Bottom) => Some((-change.y).min(limits.max_shrink_y)),
            Some(VerticalEdge::Top) => Some(change.y.max(-limits.min_top).min(limits.max_shrink_y)),
            None => None,
        };
        let dy = if aspect {
            dy.map(|dy| {
                dy.min(limits.aspect_max_shrink)
                    .max(-limits.aspect_max_grow)
            })
        } else {
            dy
        };
        let dx = match self.handle.horizontal {
            Some(HorizontalEdge::Right) => Some((-change.x).min(limits.max_shrink_x)),
            Some(HorizontalEdge::Left) => {
                Some(change.x.max(-limits.min_left).min(limits.max_shrink_x))
            }
            None => None,
        };

        let handle = self.handle;
        for id in &self.items {
            let ratio = self.original_ratio(*id);
            collection.modify_entity(*id, |e| {
                if let Some(dy) = dy {
                    if handle.vertical == Some(VerticalEdge::Top) {
                        e.set_top(e.top() + dy);
                    }
                    e.set_height(e.height() - dy);
                }

                if aspect && ratio > 0.0 {
                    let delta = e.height() * ratio - e.width();
                    e.set_width(e.width() + delta);
                    if handle.horizontal == Some(HorizontalEdge::Left) {
                        e.set_left(e.left() - delta);
                    }
                } else if let Some(dx) = dx {
                    if handle.horizontal == Some(HorizontalEdge::Left) {
                        e.set_left(e.left() + dx);
                    }
                    e.set_width(e.width() - dx);
                }
            })?;
        }
        tracing::trace!("Resize tick {:?} -> dx {:?} dy {:?}", change, dx, dy);
        Ok(())
    }

    /// Restores every item's frame from the gesture start.
    pub fn cancel(self, collection: &mut GraphicalObjectCollection) -> Result<()> {
        for (id, frame) in self.originals {
            collection.modify_entity(id, |e| {
                e.set_location(frame.location());
                e.set_size(frame.size());
            })?;
        }
        Ok(())
    }

    /// Width over height at gesture start, or zero for a flat item.
    fn original_ratio(&self, id: ObjectId) -> f64 {
        self.originals
            .iter()
            .find(|(original, _)| *original == id)
            .filter(|(_, frame)| frame.height > 0.0)
            .map_or(0.0, |(_, frame)| frame.width / frame.height)
    }

    fn limits(&self, collection: &GraphicalObjectCollection) -> Option<Limits> {
        let mut limits = Limits {
            min_left: f64::INFINITY,
            min_top: f64::INFINITY,
            max_shrink_x: f64::INFINITY,
            max_shrink_y: f64::INFINITY,
            aspect_max_shrink: f64::INFINITY,
            aspect_max_grow: f64::INFINITY,
        };
        let mut any = false;
        for entity in self.items.iter().filter_map(|id| collection.get_entity(*id)) {
            any = true;
            limits.min_left = limits.min_left.min(entity.left());
            limits.min_top = limits.min_top.min(entity.top());
            limits.max_shrink_x = limits.max_shrink_x.min(entity.width() - entity.min_width());
            limits.max_shrink_y = limits.max_shrink_y.min(entity.height() - entity.min_height());

            let ratio = self.original_ratio(entity.id());
            if ratio > 0.0 {
                limits.aspect_max_shrink = limits
                    .aspect_max_shrink
                    .min(entity.height() - entity.min_width() / ratio);
                if self.handle.horizontal == Some(HorizontalEdge::Left) {
                    limits.aspect_max_grow = limits
                        .aspect_max_grow
                        .min((entity.left() + entity.width()) / ratio - entity.height());
                }
            }
        }
        if !any {
            return None;
        }
        limits.min_left = limits.min_left.max(0.0);
        limits.min_top = limits.min_top.max(0.0);
        limits.max_shrink_x = limits.max_shrink_x.max(0.0);
        limits.max_shrink_y = limits.max_shrink_y.max(0.0);
        limits.aspect_max_shrink = limits.aspect_max_shrink.max(0.0);
        limits.aspect_max_grow = limits.aspect_max_grow.max(0.0);
        Some(limits)
    }
}
