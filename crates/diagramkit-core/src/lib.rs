//! # diagramkit Core
//!
//! Core types for the diagram canvas: geometry primitives, identity
//! handles, the error taxonomy, the canvas event bus, the deferred task
//! queue, and shared-type aliases.

pub mod dispatch;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod ids;
pub mod types;

pub use dispatch::DeferredQueue;

pub use error::{CanvasError, Result};

pub use event_bus::{
    CanvasEvent, CollectionChange, CollectionEvent, EventBus, EventBusConfig, EventCategory,
    EventFilter, GestureEvent, GestureKind, SubscriptionId, ViewportEvent,
};

pub use geometry::{normalize_angle, rotate_point, rotated_bounds, Point, Rect, Size, Vector};

pub use ids::{ContainerId, ObjectId, OverlayId};

pub use types::{shared, Shared};
