//! Event type definitions for the canvas event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::ids::ObjectId;

/// What changed in an item collection or selection set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollectionChange {
    /// Objects were added.
    Add(Vec<ObjectId>),
    /// Objects were removed.
    Remove(Vec<ObjectId>),
    /// One object was replaced by another in place.
    Replace {
        /// The object that left.
        old: ObjectId,
        /// The object that took its place.
        new: ObjectId,
    },
    /// The whole collection changed (cleared).
    Reset,
}

/// Notification raised by an item collection or selection set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollectionEvent {
    /// Membership changed.
    Changed(CollectionChange),
    /// The element count is now this value.
    CountChanged(usize),
    /// The bounds of this object changed.
    BoundsChanged(ObjectId),
}

impl CollectionEvent {
    fn description(&self) -> String {
        match self {
            CollectionEvent::Changed(CollectionChange::Add(ids)) => {
                format!("Added {} item(s)", ids.len())
            }
            CollectionEvent::Changed(CollectionChange::Remove(ids)) => {
                format!("Removed {} item(s)", ids.len())
            }
            CollectionEvent::Changed(CollectionChange::Replace { old, new }) => {
                format!("Replaced {} with {}", old, new)
            }
            CollectionEvent::Changed(CollectionChange::Reset) => "Reset".to_string(),
            CollectionEvent::CountChanged(count) => format!("Count: {}", count),
            CollectionEvent::BoundsChanged(id) => format!("Bounds changed: {}", id),
        }
    }
}

/// Viewport related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// Zoom level changed (percent).
    ZoomChanged {
        /// Previous zoom in percent.
        old: f64,
        /// New zoom in percent.
        new: f64,
    },
    /// The visible region moved or resized.
    Scrolled {
        /// The new viewport in canvas coordinates.
        viewport: Rect,
    },
    /// A deferred refresh ran.
    Refreshed {
        /// Containers created during the refresh.
        shown: usize,
        /// Containers recycled during the refresh.
        hidden: usize,
    },
}

impl ViewportEvent {
    fn description(&self) -> String {
        match self {
            ViewportEvent::ZoomChanged { old, new } => {
                format!("Zoom: {:.1}% -> {:.1}%", old, new)
            }
            ViewportEvent::Scrolled { viewport } => format!("Viewport: {}", viewport),
            ViewportEvent::Refreshed { shown, hidden } => {
                format!("Refreshed: +{} -{}", shown, hidden)
            }
        }
    }
}

/// The kind of pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    /// Moving selected items.
    Drag,
    /// Resizing selected items from a handle.
    Resize,
    /// Rotating selected entities.
    Rotate,
    /// Rubber-band selection.
    Marquee,
}

/// Gesture lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Gesture started.
    Started(GestureKind),
    /// Gesture completed normally.
    Completed(GestureKind),
    /// Gesture was aborted.
    Cancelled(GestureKind),
}

impl GestureEvent {
    fn description(&self) -> String {
        match self {
            GestureEvent::Started(kind) => format!("{:?} started", kind),
            GestureEvent::Completed(kind) => format!("{:?} completed", kind),
            GestureEvent::Cancelled(kind) => format!("{:?} cancelled", kind),
        }
    }
}

/// Root event enum for all canvas events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasEvent {
    /// Item collection notifications
    Items(CollectionEvent),
    /// Selection set notifications
    Selection(CollectionEvent),
    /// Viewport and zoom
    Viewport(ViewportEvent),
    /// Pointer gestures
    Gesture(GestureEvent),
}

impl CanvasEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            CanvasEvent::Items(_) => EventCategory::Items,
            CanvasEvent::Selection(_) => EventCategory::Selection,
            CanvasEvent::Viewport(_) => EventCategory::Viewport,
            CanvasEvent::Gesture(_) => EventCategory::Gesture,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            CanvasEvent::Items(e) => format!("Items: {}", e.description()),
            CanvasEvent::Selection(e) => format!("Selection: {}", e.description()),
            CanvasEvent::Viewport(e) => e.description(),
            CanvasEvent::Gesture(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Item collection events.
    Items,
    /// Selection set events.
    Selection,
    /// Viewport events.
    Viewport,
    /// Gesture events.
    Gesture,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Items => write!(f, "Items"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Viewport => write!(f, "Viewport"),
            EventCategory::Gesture => write!(f, "Gesture"),
        }
    }
}
