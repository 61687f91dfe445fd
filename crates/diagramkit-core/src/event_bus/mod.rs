//! # Event Bus Module
//!
//! Publish/subscribe hub for canvas notifications. Each canvas owns one
//! bus; hosts subscribe to the categories they render or log.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diagramkit_core::event_bus::{CanvasEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Selection]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
