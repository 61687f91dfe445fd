//! # diagramkit Designer
//!
//! Interactive diagram surface: entities connected by routed connections,
//! hosted on a virtualized, scrollable, zoomable canvas.
//!
//! ## Core Components
//!
//! - **Model**: [`Entity`] boxes with four connectors, [`Connection`] lines
//!   between connectors
//! - **Collection**: Item store with batched change notifications and region
//!   queries
//! - **Selection**: Selected item set, kept in step with container flags
//! - **Container pool**: Visual containers created only for items in view
//!   and recycled per item kind
//! - **Viewport**: Scroll offsets, extent, zoom levels
//! - **Gestures**: Drag, resize, rotate, rubber-band selection
//! - **Export**: BMP/JPEG/PNG/TIFF rasterization
//!
//! ## Architecture
//!
//! ```text
//! DesignerCanvas
//!   ├── GraphicalObjectCollection (items)
//!   ├── SelectionSet ⇄ container flags (SyncGuard)
//!   ├── ContainerGenerator (pool) ──> RenderHost
//!   ├── ScrollViewport ──> viewport delta (virtualization)
//!   └── ActiveGesture
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diagramkit_core::{shared, Shared, Size};
//! use diagramkit_designer::{DesignerCanvas, Entity, HeadlessHost, RenderHost};
//!
//! let host: Shared<dyn RenderHost> = shared(HeadlessHost::new());
//! let mut canvas = DesignerCanvas::new(host);
//! canvas.add_item(Entity::with_rect(10.0, 10.0, 80.0, 40.0))?;
//! canvas.set_available_size(Size::new(800.0, 600.0));
//! canvas.run_pending()?;
//! ```

pub mod canvas;
pub mod collection;
pub mod export;
pub mod generator;
pub mod gestures;
pub mod host;
pub mod model;
pub mod routing;
pub mod selection;
pub mod sync;
pub mod viewport;
pub mod virtualization;

pub use canvas::{CanvasTask, DesignerCanvas, RefreshStats, ScrollCommand};
pub use collection::{GraphicalObjectCollection, ItemSelectionOptions, DEFAULT_NOTIFICATION_BATCH};
pub use export::{
    export_image, export_image_to_writer, export_image_with, ExportError, ExportResult, Rasterizer,
    WireframeRasterizer,
};
pub use generator::{Container, ContainerGenerator, ContainerLayout, DEFAULT_MAX_POOLED_CONTAINERS};
pub use gestures::{
    ActiveGesture, DragGesture, HorizontalEdge, MarqueeGesture, MarqueeOutcome, Modifiers,
    MouseButton, ResizeGesture, ResizeHandle, RotateGesture, SelectionMode, VerticalEdge,
};
pub use host::{HeadlessHost, HostChild, OverlayGuard, RenderHost};
pub use model::{
    Connection, Connector, ConnectorDirection, ConnectorRef, ConnectorSide, Entity, GraphicalObject,
    HitTestResult, ObjectKind, DEFAULT_MIN_SIZE,
};
pub use routing::{route, Route, RoutingStyle};
pub use selection::SelectionSet;
pub use sync::{SyncGuard, SyncPass};
pub use viewport::{ScrollViewport, ViewTransform};
pub use virtualization::{compute_viewport_delta, ViewportDelta, VisibilityRegion};
