//! # diagramkit
//!
//! The core of an interactive diagram editor: entities joined by routed
//! connections on a scrollable, zoomable canvas that only materializes the
//! visual containers it can see.
//!
//! ## Architecture
//!
//! diagramkit is organized as a workspace with multiple crates:
//!
//! 1. **diagramkit-core** - Geometry, ids, errors, event bus, deferred tasks
//! 2. **diagramkit-settings** - Canvas settings and persistence
//! 3. **diagramkit-designer** - Items, selection, container pool, viewport,
//!    gestures, export
//! 4. **diagramkit** - Demo binary that integrates all crates
//!
//! ## Features
//!
//! - **Virtualization**: Containers exist only for items intersecting the viewport
//! - **Selection Sync**: Selection set and container flags kept in step
//! - **Gestures**: Drag, resize, rotate, and rubber-band selection
//! - **Routing**: Straight and orthogonal connection routes
//! - **Export**: BMP, JPEG, PNG, and TIFF at any DPI

pub use diagramkit_designer as designer;
pub use diagramkit_settings as settings;

pub use diagramkit_core::{
    CanvasError, CanvasEvent, EventBus, EventCategory, EventFilter, ObjectId, Point, Rect, Result,
    Size, Vector,
};

pub use diagramkit_designer::{
    export_image, Connection, ConnectorSide, DesignerCanvas, Entity, GraphicalObject,
    HeadlessHost, Modifiers, MouseButton, RenderHost, ScrollCommand,
};

pub use diagramkit_settings::{CanvasSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
