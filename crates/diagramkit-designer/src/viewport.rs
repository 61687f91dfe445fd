//! Scrollable, zoomable viewport over the canvas.
//!
//! Handles conversion between device coordinates (host pixels) and canvas
//! coordinates. Offsets are stored in canvas units; the scroll API takes
//! device units, which are canvas units multiplied by `zoom / 100`.

use std::fmt;

use diagramkit_core::{Point, Rect, Size, Vector};
use diagramkit_settings::CanvasSettings;

/// Scale and translation the host applies to the canvas layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Device units per canvas unit.
    pub scale: f64,
    /// Canvas coordinate shown at the top-left corner of the host.
    pub offset: Point,
}

impl ViewTransform {
    /// Maps a device point (relative to the host's top-left) to canvas coordinates.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            self.offset.x + screen.x / self.scale,
            self.offset.y + screen.y / self.scale,
        )
    }

    /// Maps a canvas point to device coordinates.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            (canvas.x - self.offset.x) * self.scale,
            (canvas.y - self.offset.y) * self.scale,
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::origin(),
        }
    }
}

/// Scroll and zoom state of the canvas.
#[derive(Debug, Clone)]
pub struct ScrollViewport {
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_levels: Vec<f64>,
    extent_margin: f64,
    line_step: f64,
    wheel_ratio: f64,
    available: Size,
    extent: Size,
    offset: Point,
}

impl ScrollViewport {
    /// Creates a viewport configured from `settings`, with no available size yet.
    pub fn new(settings: &CanvasSettings) -> Self {
        Self {
            zoom: settings.clamp_zoom(settings.default_zoom),
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
            zoom_levels: settings.standard_zoom_levels.clone(),
            extent_margin: settings.extent_margin,
            line_step: settings.scroll_line_step,
            wheel_ratio: settings.wheel_scroll_ratio,
            available: Size::default(),
            extent: Size::default(),
            offset: Point::origin(),
        }
    }

    /// Current zoom in percent.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Device units per canvas unit.
    pub fn scale(&self) -> f64 {
        self.zoom / 100.0
    }

    /// Size the host makes available, in device units.
    pub fn available_size(&self) -> Size {
        self.available
    }

    /// Scrollable area in canvas units, anchored at the origin.
    pub fn extent(&self) -> Rect {
        Rect::new(0.0, 0.0, self.extent.width, self.extent.height)
    }

    /// Visible region in canvas coordinates.
    pub fn viewport(&self) -> Rect {
        let scale = self.scale();
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.available.width / scale,
            self.available.height / scale,
        )
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.scale(),
            offset: self.offset,
        }
    }

    /// Horizontal scroll offset in device units.
    pub fn horizontal_offset(&self) -> f64 {
        self.offset.x * self.scale()
    }

    /// Vertical scroll offset in device units.
    pub fn vertical_offset(&self) -> f64 {
        self.offset.y * self.scale()
    }

    /// Scrollable extent in device units.
    pub fn extent_size(&self) -> Size {
        let scale = self.scale();
        Size::new(self.extent.width * scale, self.extent.height * scale)
    }

    /// Recomputes extent and viewport size.
    ///
    /// The extent spans from the origin to the far corner of
    /// `items_bounds`, plus the extent margin. Returns true if the visible
    /// region changed.
    pub fn measure(&mut self, available: Size, items_bounds: Rect) -> bool {
        let before = self.viewport();
        self.available = Size::new(available.width.max(0.0), available.height.max(0.0));
        self.extent = if items_bounds.is_empty() {
            Size::new(self.extent_margin, self.extent_margin)
        } else {
            Size::new(
                items_bounds.right().max(0.0) + self.extent_margin,
                items_bounds.bottom().max(0.0) + self.extent_margin,
            )
        };
        self.clamp_offset();
        self.viewport() != before
    }

    /// Sets the horizontal offset (device units), clamped to the scrollable range.
    pub fn set_horizontal_offset(&mut self, offset: f64) -> bool {
        let before = self.offset;
        self.offset.x = offset / self.scale();
        self.clamp_offset();
        self.offset != before
    }

    /// Sets the vertical offset (device units), clamped to the scrollable range.
    pub fn set_vertical_offset(&mut self, offset: f64) -> bool {
        let before = self.offset;
        self.offset.y = offset / self.scale();
        self.clamp_offset();
        self.offset != before
    }

    pub fn line_up(&mut self) -> bool {
        self.set_vertical_offset(self.vertical_offset() - self.line_step)
    }

    pub fn line_down(&mut self) -> bool {
        self.set_vertical_offset(self.vertical_offset() + self.line_step)
    }

    pub fn line_left(&mut self) -> bool {
        self.set_horizontal_offset(self.horizontal_offset() - self.line_step)
    }

    pub fn line_right(&mut self) -> bool {
        self.set_horizontal_offset(self.horizontal_offset() + self.line_step)
    }

    pub fn page_up(&mut self) -> bool {
        self.set_vertical_offset(self.vertical_offset() - self.available.height)
    }

    pub fn page_down(&mut self) -> bool {
        self.set_vertical_offset(self.vertical_offset() + self.available.height)
    }

    pub fn page_left(&mut self) -> bool {
        self.set_horizontal_offset(self.horizontal_offset() - self.available.width)
    }

    pub fn page_right(&mut self) -> bool {
        self.set_horizontal_offset(self.horizontal_offset() + self.available.width)
    }

    pub fn mouse_wheel_up(&mut self) -> bool {
        self.set_vertical_offset(self.vertical_offset() - self.available.height * self.wheel_ratio)
    }

    pub fn mouse_wheel_down(&mut self) -> bool {
        self.set_vertical_offset(self.vertical_offset() + self.available.height * self.wheel_ratio)
    }

    pub fn mouse_wheel_left(&mut self) -> bool {
        self.set_horizontal_offset(self.horizontal_offset() - self.available.width * self.wheel_ratio)
    }

    pub fn mouse_wheel_right(&mut self) -> bool {
        self.set_horizontal_offset(self.horizontal_offset() + self.available.width * self.wheel_ratio)
    }

    /// Scrolls the minimum distance needed to bring `target` (canvas
    /// coordinates) into view. A target larger than the viewport is aligned
    /// to the top-left.
    pub fn make_visible(&mut self, target: Rect) -> bool {
        if target.is_empty() {
            return false;
        }
        let viewport = self.viewport();
        let before = self.offset;
        self.offset.x = scroll_axis(viewport.left(), viewport.width, target.left(), target.width);
        self.offset.y = scroll_axis(viewport.top(), viewport.height, target.top(), target.height);
        self.clamp_offset();
        self.offset != before
    }

    /// Sets the zoom (percent), clamped to the configured range. Returns the
    /// previous zoom if it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> Option<f64> {
        let clamped = if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.zoom
        };
        if clamped != zoom {
            tracing::warn!("Zoom {} clamped to {}", zoom, clamped);
        }
        if clamped == self.zoom {
            return None;
        }
        let old = self.zoom;
        self.zoom = clamped;
        self.clamp_offset();
        Some(old)
    }

    /// Steps to the next larger standard zoom level.
    pub fn zoom_in(&mut self) -> Option<f64> {
        let next = self.zoom_levels.iter().copied().find(|level| *level > self.zoom)?;
        self.set_zoom(next)
    }

    /// Steps to the next smaller standard zoom level.
    pub fn zoom_out(&mut self) -> Option<f64> {
        let next = self
            .zoom_levels
            .iter()
            .rev()
            .copied()
            .find(|level| *level < self.zoom)?;
        self.set_zoom(next)
    }

    /// Pans by a canvas-space delta (clamped).
    pub fn pan_by(&mut self, delta: Vector) -> bool {
        let before = self.offset;
        self.offset = self.offset + delta;
        self.clamp_offset();
        self.offset != before
    }

    fn clamp_offset(&mut self) {
        let viewport = self.viewport();
        let max_x = (self.extent.width - viewport.width).max(0.0);
        let max_y = (self.extent.height - viewport.height).max(0.0);
        self.offset.x = clamp_finite(self.offset.x, max_x);
        self.offset.y = clamp_finite(self.offset.y, max_y);
    }
}

fn clamp_finite(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

fn scroll_axis(view_start: f64, view_len: f64, target_start: f64, target_len: f64) -> f64 {
    if target_start < view_start || target_len > view_len {
        target_start
    } else if target_start + target_len > view_start + view_len {
        target_start + target_len - view_len
    } else {
        view_start
    }
}

impl fmt::Display for ScrollViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.1}% | Offset: ({:.1}, {:.1}) | Extent: {}",
            self.zoom, self.offset.x, self.offset.y, self.extent
        )
    }
}

impl Default for ScrollViewport {
    fn default() -> Self {
        Self::new(&CanvasSettings::default())
    }
}
