//! Rubber-band selection gesture.

use diagramkit_core::{Point, Rect, Shared};

use super::SelectionMode;
use crate::host::{OverlayGuard, RenderHost};
use crate::viewport::ViewTransform;

/// How a marquee ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarqueeOutcome {
    /// Press and release without dragging.
    Click,
    /// A rectangle was dragged out.
    Region(Rect, SelectionMode),
}

/// Tracks a rubber-band drag on the canvas background.
///
/// The view transform is captured when the gesture starts, so every pointer
/// position maps into the same canvas coordinates even if the view scrolls
/// underneath. The overlay exists only once the pointer has moved with the
/// button held, and is removed when the gesture is finished or dropped.
#[derive(Debug)]
pub struct MarqueeGesture {
    transform: ViewTransform,
    start: Point,
    current: Point,
    overlay: Option<OverlayGuard>,
}

impl MarqueeGesture {
    /// Starts at `screen` (device coordinates relative to the host).
    pub fn begin(screen: Point, transform: ViewTransform) -> Self {
        let start = transform.screen_to_canvas(screen);
        Self {
            transform,
            start,
            current: start,
            overlay: None,
        }
    }

    /// Start point in canvas coordinates.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Current rectangle in canvas coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Tracks the pointer. The overlay is created on the first move with
    /// the button pressed and resized on later ones.
    pub fn update(&mut self, screen: Point, button_pressed: bool, host: &Shared<dyn RenderHost>) {
        self.current = self.transform.screen_to_canvas(screen);
        let rect = self.rect();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.update(rect);
        } else if button_pressed {
            self.overlay = Some(OverlayGuard::new(host.clone(), rect));
        }
    }

    /// Ends the gesture, removing the overlay.
    pub fn finish(mut self, mode: SelectionMode) -> MarqueeOutcome {
        match self.overlay.take() {
            Some(_overlay) => MarqueeOutcome::Region(self.rect(), mode),
            None => MarqueeOutcome::Click,
        }
    }
}
