//! Scrolling, zoom, and pointer gestures on the canvas.

use diagramkit_core::{
    CanvasError, CanvasEvent, GestureEvent, GestureKind, ObjectId, Point, Rect, Result, Vector,
    ViewportEvent,
};

use super::{CanvasTask, DesignerCanvas, ScrollCommand};
use crate::collection::ItemSelectionOptions;
use crate::gestures::{
    ActiveGesture, DragGesture, MarqueeGesture, MarqueeOutcome, Modifiers, MouseButton,
    ResizeGesture, ResizeHandle, RotateGesture, SelectionMode,
};
use crate::model::GraphicalObject;

impl DesignerCanvas {
    // ---------------------------------------------------------------------
    // Scrolling and zoom
    // ---------------------------------------------------------------------

    /// Applies a scroll command. Returns true if the viewport moved.
    pub fn scroll(&mut self, command: ScrollCommand) -> bool {
        let viewport = &mut self.viewport;
        let changed = match command {
            ScrollCommand::LineUp => viewport.line_up(),
            ScrollCommand::LineDown => viewport.line_down(),
            ScrollCommand::LineLeft => viewport.line_left(),
            ScrollCommand::LineRight => viewport.line_right(),
            ScrollCommand::PageUp => viewport.page_up(),
            ScrollCommand::PageDown => viewport.page_down(),
            ScrollCommand::PageLeft => viewport.page_left(),
            ScrollCommand::PageRight => viewport.page_right(),
            ScrollCommand::WheelUp => viewport.mouse_wheel_up(),
            ScrollCommand::WheelDown => viewport.mouse_wheel_down(),
            ScrollCommand::WheelLeft => viewport.mouse_wheel_left(),
            ScrollCommand::WheelRight => viewport.mouse_wheel_right(),
        };
        self.after_scroll(changed)
    }

    /// Sets the horizontal offset in device units.
    pub fn set_horizontal_offset(&mut self, offset: f64) -> bool {
        let changed = self.viewport.set_horizontal_offset(offset);
        self.after_scroll(changed)
    }

    /// Sets the vertical offset in device units.
    pub fn set_vertical_offset(&mut self, offset: f64) -> bool {
        let changed = self.viewport.set_vertical_offset(offset);
        self.after_scroll(changed)
    }

    /// Pans by a device-unit delta, as a middle-button drag would.
    pub fn pan_by(&mut self, delta: Vector) -> bool {
        let scale = self.viewport.scale();
        let changed = self
            .viewport
            .pan_by(Vector::new(delta.x / scale, delta.y / scale));
        self.after_scroll(changed)
    }

    /// Scrolls so `target` (canvas coordinates) is visible.
    pub fn make_visible(&mut self, target: Rect) -> bool {
        let changed = self.viewport.make_visible(target);
        self.after_scroll(changed)
    }

    pub fn make_item_visible(&mut self, id: ObjectId) -> Result<bool> {
        let bounds = self
            .items
            .get(id)
            .map(GraphicalObject::bounds)
            .ok_or(CanvasError::UnknownItem { id })?;
        Ok(self.make_visible(bounds))
    }

    /// Sets the zoom in percent; out-of-range values are clamped.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let old = self.viewport.set_zoom(zoom);
        self.after_zoom(old)
    }

    /// Steps to the next standard zoom level.
    pub fn zoom_in(&mut self) -> bool {
        let old = self.viewport.zoom_in();
        self.after_zoom(old)
    }

    /// Steps to the previous standard zoom level.
    pub fn zoom_out(&mut self) -> bool {
        let old = self.viewport.zoom_out();
        self.after_zoom(old)
    }

    /// Mouse wheel: zooms with Control held, scrolls otherwise.
    pub fn mouse_wheel(&mut self, up: bool, modifiers: Modifiers) -> bool {
        match (modifiers.control, up) {
            (true, true) => self.zoom_in(),
            (true, false) => self.zoom_out(),
            (false, true) => self.scroll(ScrollCommand::WheelUp),
            (false, false) => self.scroll(ScrollCommand::WheelDown),
        }
    }

    fn after_scroll(&mut self, changed: bool) -> bool {
        if changed {
            self.bus.publish(CanvasEvent::Viewport(ViewportEvent::Scrolled {
                viewport: self.viewport.viewport(),
            }));
            self.tasks.schedule(CanvasTask::RefreshViewport);
        }
        changed
    }

    fn after_zoom(&mut self, old: Option<f64>) -> bool {
        let Some(old) = old else {
            return false;
        };
        let new = self.viewport.zoom();
        tracing::debug!("Zoom {}% -> {}%", old, new);
        self.bus
            .publish(CanvasEvent::Viewport(ViewportEvent::ZoomChanged { old, new }));
        self.tasks.schedule(CanvasTask::Measure);
        true
    }

    // ---------------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------------

    /// The gesture in progress, if any.
    pub fn active_gesture(&self) -> Option<GestureKind> {
        self.gesture.as_ref().map(ActiveGesture::kind)
    }

    /// Starts moving `item` together with the other selected entities.
    pub fn begin_drag(&mut self, item: ObjectId) -> Result<()> {
        self.require_idle()?;
        self.require_entity(item)?;
        let gesture = DragGesture::begin(
            item,
            self.selected_entities(),
            self.settings.instant_preview_threshold,
        );
        self.start_gesture(ActiveGesture::Drag(gesture));
        Ok(())
    }

    /// Moves the dragged items by `delta` (canvas units). Returns the
    /// clamped delta actually applied.
    pub fn update_drag(&mut self, delta: Vector) -> Result<Vector> {
        let Some(ActiveGesture::Drag(drag)) = self.gesture.as_mut() else {
            return Err(CanvasError::NoActiveGesture);
        };
        let applied = drag.update(&mut self.items, delta)?;
        self.process_item_events()?;
        Ok(applied)
    }

    /// Starts resizing from `handle` on `item`; every resizable selected
    /// entity follows.
    pub fn begin_resize(&mut self, item: ObjectId, handle: ResizeHandle) -> Result<()> {
        self.require_idle()?;
        self.require_entity(item)?;
        let mut targets = self.selected_entities();
        if !targets.contains(&item) {
            targets.push(item);
        }
        let gesture = ResizeGesture::begin(handle, targets, &self.items);
        self.start_gesture(ActiveGesture::Resize(gesture));
        Ok(())
    }

    /// Applies a resize tick. Shift preserves the aspect ratio on corners.
    pub fn update_resize(&mut self, change: Vector, modifiers: Modifiers) -> Result<()> {
        let Some(ActiveGesture::Resize(resize)) = self.gesture.as_mut() else {
            return Err(CanvasError::NoActiveGesture);
        };
        resize.update(&mut self.items, change, modifiers.shift)?;
        self.process_item_events()
    }

    /// Starts rotating `item` from `pointer` (canvas coordinates).
    pub fn begin_rotate(&mut self, item: ObjectId, pointer: Point) -> Result<()> {
        self.require_idle()?;
        self.require_entity(item)?;
        let others = self.selected_entities();
        let gesture = RotateGesture::begin(
            &self.items,
            item,
            others,
            pointer,
            self.settings.rotation_snap_step,
        )
        .ok_or(CanvasError::NotAnEntity { id: item })?;
        self.start_gesture(ActiveGesture::Rotate(gesture));
        Ok(())
    }

    /// Follows the pointer. Shift snaps the angle. Returns the angle delta.
    pub fn update_rotate(&mut self, pointer: Point, modifiers: Modifiers) -> Result<f64> {
        let Some(ActiveGesture::Rotate(rotate)) = self.gesture.as_mut() else {
            return Err(CanvasError::NoActiveGesture);
        };
        let delta = rotate.update(&mut self.items, pointer, modifiers.shift)?;
        self.process_item_events()?;
        Ok(delta)
    }

    /// Pointer press on empty canvas (device coordinates). The left button
    /// starts a rubber band using the current view transform; other buttons
    /// start nothing.
    pub fn pointer_down_on_background(
        &mut self,
        screen: Point,
        button: MouseButton,
    ) -> Result<()> {
        self.require_idle()?;
        if button != MouseButton::Left {
            return Ok(());
        }
        let gesture = MarqueeGesture::begin(screen, self.viewport.transform());
        self.start_gesture(ActiveGesture::Marquee(gesture));
        Ok(())
    }

    /// Pointer move during a rubber band (device coordinates).
    pub fn update_marquee(&mut self, screen: Point, button_pressed: bool) -> Result<()> {
        let Some(ActiveGesture::Marquee(marquee)) = self.gesture.as_mut() else {
            return Err(CanvasError::NoActiveGesture);
        };
        marquee.update(screen, button_pressed, &self.host);
        Ok(())
    }

    /// Current rubber-band rectangle in canvas coordinates.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.gesture {
            Some(ActiveGesture::Marquee(marquee)) => Some(marquee.rect()),
            _ => None,
        }
    }

    /// Pointer release. Commits the active gesture; `modifiers` decide how
    /// a rubber band combines with the selection.
    pub fn complete_gesture(&mut self, modifiers: Modifiers) -> Result<()> {
        let gesture = self.gesture.take().ok_or(CanvasError::NoActiveGesture)?;
        let kind = gesture.kind();
        match gesture {
            ActiveGesture::Drag(drag) => drag.complete(&mut self.items)?,
            ActiveGesture::Resize(_) => {}
            ActiveGesture::Rotate(rotate) => rotate.complete(&mut self.items)?,
            ActiveGesture::Marquee(marquee) => {
                let outcome = marquee.finish(SelectionMode::from_modifiers(modifiers));
                self.apply_marquee(outcome);
            }
        }
        self.process_item_events()?;
        self.bus
            .publish(CanvasEvent::Gesture(GestureEvent::Completed(kind)));
        Ok(())
    }

    /// Aborts the active gesture, restoring what it changed. Returns false
    /// if nothing was in progress.
    pub fn cancel_gesture(&mut self) -> Result<bool> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(false);
        };
        let kind = gesture.kind();
        match gesture {
            ActiveGesture::Drag(drag) => drag.cancel(&mut self.items)?,
            ActiveGesture::Resize(resize) => resize.cancel(&mut self.items)?,
            ActiveGesture::Rotate(rotate) => rotate.cancel(&mut self.items)?,
            ActiveGesture::Marquee(marquee) => drop(marquee),
        }
        self.process_item_events()?;
        self.bus
            .publish(CanvasEvent::Gesture(GestureEvent::Cancelled(kind)));
        tracing::debug!("{:?} gesture cancelled", kind);
        Ok(true)
    }

    fn apply_marquee(&mut self, outcome: MarqueeOutcome) {
        match outcome {
            MarqueeOutcome::Click => self.selection.clear(),
            MarqueeOutcome::Region(rect, mode) => {
                let hits: Vec<ObjectId> = self
                    .items
                    .objects_in_region(rect, ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION)
                    .map(GraphicalObject::id)
                    .collect();
                tracing::debug!("Marquee {} hit {} item(s), {:?}", rect, hits.len(), mode);
                match mode {
                    SelectionMode::Replace => {
                        self.selection.clear();
                        self.selection.add_range(hits);
                    }
                    SelectionMode::Toggle => {
                        for id in hits {
                            self.selection.toggle(id);
                        }
                    }
                    SelectionMode::Union => {
                        self.selection.add_range(hits);
                    }
                }
            }
        }
    }

    fn start_gesture(&mut self, gesture: ActiveGesture) {
        let kind = gesture.kind();
        self.gesture = Some(gesture);
        self.bus
            .publish(CanvasEvent::Gesture(GestureEvent::Started(kind)));
    }

    fn require_idle(&self) -> Result<()> {
        match self.gesture {
            Some(_) => Err(CanvasError::GestureInProgress),
            None => Ok(()),
        }
    }

    fn require_entity(&self, id: ObjectId) -> Result<()> {
        match self.items.get(id) {
            Some(object) if object.as_entity().is_some() => Ok(()),
            Some(_) => Err(CanvasError::NotAnEntity { id }),
            None => Err(CanvasError::UnknownItem { id }),
        }
    }

    fn selected_entities(&self) -> Vec<ObjectId> {
        self.selection
            .iter()
            .filter(|id| self.items.get_entity(*id).is_some())
            .collect()
    }
}
