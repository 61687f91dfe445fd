//! Designer canvas.
//!
//! Ties the item collection, selection set, container pool, and viewport
//! together. Only items intersecting the viewport have containers on the
//! render host; scrolling and zooming update them incrementally.
//!
//! Membership, bounds, and selection changes are applied immediately.
//! Extent measurement and viewport refresh are deferred to
//! [`DesignerCanvas::run_pending`], which the host calls once per frame.

mod operations;
mod types;

pub use types::{CanvasTask, RefreshStats, ScrollCommand};

use diagramkit_core::{
    CanvasError, CanvasEvent, CollectionChange, CollectionEvent, ContainerId, DeferredQueue,
    EventBus, ObjectId, Rect, Result, Shared, Size, ViewportEvent,
};
use diagramkit_settings::CanvasSettings;

use crate::collection::{GraphicalObjectCollection, ItemSelectionOptions};
use crate::generator::{ContainerGenerator, ContainerLayout};
use crate::gestures::{ActiveGesture, Modifiers, MouseButton};
use crate::host::RenderHost;
use crate::model::{Connection, Entity, GraphicalObject};
use crate::selection::SelectionSet;
use crate::sync::SyncGuard;
use crate::viewport::ScrollViewport;
use crate::virtualization::compute_viewport_delta;

/// Interactive diagram surface.
pub struct DesignerCanvas {
    settings: CanvasSettings,
    items: GraphicalObjectCollection,
    selection: SelectionSet,
    generator: ContainerGenerator,
    viewport: ScrollViewport,
    host: Shared<dyn RenderHost>,
    bus: EventBus,
    sync: SyncGuard,
    tasks: DeferredQueue<CanvasTask>,
    available: Size,
    /// Viewport the rendered containers currently reflect.
    rendered: Rect,
    gesture: Option<ActiveGesture>,
}

impl DesignerCanvas {
    /// Creates a canvas with default settings rendering into `host`.
    pub fn new(host: Shared<dyn RenderHost>) -> Self {
        Self::with_settings(host, CanvasSettings::default())
    }

    /// Creates a canvas configured by `settings`.
    pub fn with_settings(host: Shared<dyn RenderHost>, settings: CanvasSettings) -> Self {
        let mut items = GraphicalObjectCollection::new();
        items.set_notification_batch_size(settings.notification_batch_size);
        let viewport = ScrollViewport::new(&settings);
        host.borrow_mut().set_view_transform(viewport.transform());
        Self {
            generator: ContainerGenerator::new(settings.max_pooled_containers),
            items,
            selection: SelectionSet::new(),
            viewport,
            host,
            bus: EventBus::new(),
            sync: SyncGuard::new(),
            tasks: DeferredQueue::new(),
            available: Size::default(),
            rendered: Rect::EMPTY,
            gesture: None,
            settings,
        }
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn items(&self) -> &GraphicalObjectCollection {
        &self.items
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn generator(&self) -> &ContainerGenerator {
        &self.generator
    }

    pub fn viewport(&self) -> &ScrollViewport {
        &self.viewport
    }

    /// Canvas notifications. Subscribers receive item, selection, viewport,
    /// and gesture events.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn host(&self) -> &Shared<dyn RenderHost> {
        &self.host
    }

    /// The viewport rendered by the last processed refresh.
    pub fn rendered_viewport(&self) -> Rect {
        self.rendered
    }

    /// True while a selection synchronization pass is running.
    pub fn is_synchronizing(&self) -> bool {
        self.sync.is_synchronizing()
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn set_max_pooled_containers(&mut self, max_pooled: usize) {
        self.settings.max_pooled_containers = max_pooled;
        self.generator.set_max_pooled_containers(max_pooled);
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub fn add_item(&mut self, object: impl Into<GraphicalObject>) -> Result<ObjectId> {
        let id = self.items.add(object)?;
        self.process_item_events()?;
        Ok(id)
    }

    pub fn add_items<I>(&mut self, objects: I) -> Result<Vec<ObjectId>>
    where
        I: IntoIterator,
        I::Item: Into<GraphicalObject>,
    {
        let ids = self.items.add_range(objects)?;
        self.process_item_events()?;
        Ok(ids)
    }

    /// Removes an item; it also leaves the selection and the render host.
    pub fn remove_item(&mut self, id: ObjectId) -> Result<Option<GraphicalObject>> {
        let removed = self.items.remove(id);
        self.process_item_events()?;
        Ok(removed)
    }

    pub fn remove_items(&mut self, ids: &[ObjectId]) -> Result<Vec<GraphicalObject>> {
        let removed = self.items.remove_range(ids);
        self.process_item_events()?;
        Ok(removed)
    }

    /// Removes connections whose endpoint entity is gone.
    pub fn remove_dangling_connections(&mut self) -> Result<Vec<ObjectId>> {
        let dangling = self.items.dangling_connections();
        if !dangling.is_empty() {
            tracing::warn!("Removing {} dangling connection(s)", dangling.len());
            self.items.remove_range(&dangling);
            self.process_item_events()?;
        }
        Ok(dangling)
    }

    pub fn clear_items(&mut self) -> Result<()> {
        self.items.clear();
        self.process_item_events()
    }

    /// Mutates an entity; attached connections and containers follow.
    pub fn modify_entity<R>(&mut self, id: ObjectId, f: impl FnOnce(&mut Entity) -> R) -> Result<R> {
        let result = self.items.modify_entity(id, f)?;
        self.process_item_events()?;
        Ok(result)
    }

    pub fn modify_connection<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut Connection) -> R,
    ) -> Result<R> {
        let result = self.items.modify_connection(id, f)?;
        self.process_item_events()?;
        Ok(result)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn select(&mut self, id: ObjectId) -> Result<bool> {
        self.require_item(id)?;
        let added = self.selection.add(id);
        self.process_selection_events()?;
        Ok(added)
    }

    pub fn deselect(&mut self, id: ObjectId) -> Result<bool> {
        let removed = self.selection.remove(id);
        self.process_selection_events()?;
        Ok(removed)
    }

    pub fn toggle_selection(&mut self, id: ObjectId) -> Result<bool> {
        self.require_item(id)?;
        let selected = self.selection.toggle(id);
        self.process_selection_events()?;
        Ok(selected)
    }

    /// Swaps `old` for `new` in the selection.
    pub fn replace_selection(&mut self, old: ObjectId, new: ObjectId) -> Result<bool> {
        self.require_item(new)?;
        let replaced = self.selection.replace(old, new);
        self.process_selection_events()?;
        Ok(replaced)
    }

    pub fn select_all(&mut self) -> Result<()> {
        self.selection.add_range(self.items.ids());
        self.process_selection_events()
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.selection.clear();
        self.process_selection_events()
    }

    /// Pointer press on an item.
    ///
    /// Shift or Control with the left button toggles the item. Otherwise an
    /// unselected item becomes the only selection; pressing an already
    /// selected item keeps the selection so the group can be dragged. The
    /// middle button leaves the selection alone.
    pub fn pointer_down_on_item(
        &mut self,
        id: ObjectId,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Result<()> {
        self.require_item(id)?;
        if button == MouseButton::Middle {
            return Ok(());
        }
        if button == MouseButton::Left && modifiers.extends_selection() {
            self.selection.toggle(id);
        } else if !self.selection.contains(id) {
            self.selection.clear();
            self.selection.add(id);
        }
        self.process_selection_events()
    }

    /// Sets a container's selected flag from the host side (for example a
    /// keyboard toggle on a focused container). The selection set follows.
    pub fn set_container_selected(&mut self, container: ContainerId, selected: bool) -> Result<()> {
        self.apply_container_flag(container, selected)
    }

    // ---------------------------------------------------------------------
    // Virtualization
    // ---------------------------------------------------------------------

    /// Records the size the host makes available (device units). The
    /// measure runs on the next [`Self::run_pending`].
    pub fn set_available_size(&mut self, size: Size) {
        if self.available != size {
            self.available = size;
            self.tasks.schedule(CanvasTask::Measure);
        }
    }

    /// Runs deferred measure and refresh work. Returns the number of tasks run.
    pub fn run_pending(&mut self) -> Result<usize> {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop() {
            ran += 1;
            match task {
                CanvasTask::Measure => self.measure(),
                CanvasTask::RefreshViewport => {
                    self.refresh_viewport()?;
                }
            }
        }
        Ok(ran)
    }

    /// Shows (or hides) the items in `region`.
    ///
    /// Showing includes items that only partially overlap `region`. Hiding
    /// skips items that still intersect the current viewport. Returns the
    /// number of items whose visibility changed.
    pub fn set_container_visibility(&mut self, region: Rect, visible: bool) -> Result<usize> {
        let view = self.viewport.viewport();
        let candidates: Vec<ObjectId> = self
            .items
            .objects_in_region(region, ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION)
            .filter(|object| visible || !object.bounds().intersects_with(&view))
            .map(GraphicalObject::id)
            .collect();

        let mut changed = 0;
        for id in candidates {
            if self.set_item_visibility(id, visible)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Creates (with the selected flag applied) or recycles the container
    /// for one item. Returns false if nothing changed.
    pub fn set_item_visibility(&mut self, id: ObjectId, visible: bool) -> Result<bool> {
        if visible {
            if self.generator.container_from_item(id).is_some() {
                return Ok(false);
            }
            let Some(object) = self.items.get(id) else {
                return Ok(false);
            };
            let container_id = self.generator.create_container(object);
            let selected = self.selection.contains(id);
            if let Some(container) = self.generator.container_mut(container_id) {
                container.is_selected = selected;
                self.host.borrow_mut().add_child(container);
            }
            Ok(true)
        } else {
            let Some(container_id) = self.generator.container_from_item(id) else {
                return Ok(false);
            };
            self.host.borrow_mut().remove_child(container_id);
            self.generator.recycle(container_id)?;
            Ok(true)
        }
    }

    /// Recycles every container and rebuilds for the current viewport.
    pub fn reset_containers(&mut self) -> Result<RefreshStats> {
        let view = self.viewport.viewport();
        let stats = self.rebuild_containers(view)?;
        self.rendered = view;
        Ok(stats)
    }

    fn measure(&mut self) {
        if self.viewport.measure(self.available, self.items.bounds()) {
            self.bus.publish(CanvasEvent::Viewport(ViewportEvent::Scrolled {
                viewport: self.viewport.viewport(),
            }));
        }
        self.tasks.schedule(CanvasTask::RefreshViewport);
    }

    fn refresh_viewport(&mut self) -> Result<RefreshStats> {
        let new = self.viewport.viewport();
        let old = self.rendered;
        self.host
            .borrow_mut()
            .set_view_transform(self.viewport.transform());

        let stats = if old.is_degenerate() || new.is_degenerate() {
            self.rebuild_containers(new)?
        } else {
            let mut stats = RefreshStats::default();
            let delta =
                compute_viewport_delta(old, new, self.viewport.extent(), self.settings.safety_margin);
            for region in delta {
                let changed = self.set_container_visibility(region.region, region.visible)?;
                if region.visible {
                    stats.shown += changed;
                } else {
                    stats.hidden += changed;
                }
            }
            stats
        };
        self.rendered = new;

        if stats != RefreshStats::default() {
            tracing::debug!(
                "Viewport {} refreshed: +{} -{} ({} live)",
                new,
                stats.shown,
                stats.hidden,
                self.generator.bound_count()
            );
        }
        self.bus.publish(CanvasEvent::Viewport(ViewportEvent::Refreshed {
            shown: stats.shown,
            hidden: stats.hidden,
        }));
        Ok(stats)
    }

    fn rebuild_containers(&mut self, view: Rect) -> Result<RefreshStats> {
        let hidden = self.hide_all()?;
        let mut shown = 0;
        if !view.is_degenerate() {
            let visible: Vec<ObjectId> = self
                .items
                .objects_in_region(view, ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION)
                .map(GraphicalObject::id)
                .collect();
            for id in visible {
                if self.set_item_visibility(id, true)? {
                    shown += 1;
                }
            }
        }
        Ok(RefreshStats { shown, hidden })
    }

    fn hide_all(&mut self) -> Result<usize> {
        let recycled = self.generator.recycle_all()?;
        let mut host = self.host.borrow_mut();
        for container in &recycled {
            host.remove_child(*container);
        }
        Ok(recycled.len())
    }

    fn in_rendered_view(&self, id: ObjectId) -> bool {
        !self.rendered.is_degenerate()
            && self
                .items
                .get(id)
                .is_some_and(|object| object.bounds().intersects_with(&self.rendered))
    }

    // ---------------------------------------------------------------------
    // Notification handling
    // ---------------------------------------------------------------------

    fn require_item(&self, id: ObjectId) -> Result<()> {
        if self.items.contains(id) {
            Ok(())
        } else {
            Err(CanvasError::UnknownItem { id })
        }
    }

    fn process_item_events(&mut self) -> Result<()> {
        let events = self.items.drain_events();
        if !events.is_empty() {
            for event in events {
                match &event {
                    CollectionEvent::Changed(CollectionChange::Add(ids)) => {
                        for id in ids {
                            if self.in_rendered_view(*id) {
                                self.set_item_visibility(*id, true)?;
                            }
                        }
                    }
                    CollectionEvent::Changed(CollectionChange::Remove(ids)) => {
                        for id in ids {
                            self.set_item_visibility(*id, false)?;
                        }
                        self.selection.remove_range(ids.iter().copied());
                    }
                    CollectionEvent::Changed(CollectionChange::Replace { old, new }) => {
                        self.set_item_visibility(*old, false)?;
                        self.selection.remove(*old);
                        if self.in_rendered_view(*new) {
                            self.set_item_visibility(*new, true)?;
                        }
                    }
                    CollectionEvent::Changed(CollectionChange::Reset) => {
                        self.hide_all()?;
                        self.selection.clear();
                    }
                    CollectionEvent::BoundsChanged(id) => self.on_bounds_changed(*id)?,
                    CollectionEvent::CountChanged(_) => {}
                }
                self.bus.publish(CanvasEvent::Items(event));
            }
            self.tasks.schedule(CanvasTask::Measure);
        }
        self.process_selection_events()
    }

    fn on_bounds_changed(&mut self, id: ObjectId) -> Result<()> {
        let Some(object) = self.items.get(id) else {
            return Ok(());
        };
        let layout = ContainerLayout::of(object);
        let visible = self.in_rendered_view(id);

        match self.generator.container_from_item(id) {
            Some(container_id) if visible => {
                if let Some(container) = self.generator.container_mut(container_id) {
                    container.layout = layout;
                    self.host.borrow_mut().update_child(container);
                }
            }
            Some(_) => {
                self.set_item_visibility(id, false)?;
            }
            None if visible => {
                self.set_item_visibility(id, true)?;
            }
            None => {}
        }
        Ok(())
    }

    /// Selection set -> container flags.
    fn process_selection_events(&mut self) -> Result<()> {
        for event in self.selection.drain_events() {
            if !self.sync.is_synchronizing() {
                let _pass = self.sync.enter()?;
                self.apply_selection_change(&event)?;
            }
            self.bus.publish(CanvasEvent::Selection(event));
        }
        Ok(())
    }

    fn apply_selection_change(&mut self, event: &CollectionEvent) -> Result<()> {
        match event {
            CollectionEvent::Changed(CollectionChange::Add(ids)) => {
                for id in ids {
                    self.apply_item_flag(*id, true)?;
                }
            }
            CollectionEvent::Changed(CollectionChange::Remove(ids)) => {
                for id in ids {
                    self.apply_item_flag(*id, false)?;
                }
            }
            CollectionEvent::Changed(CollectionChange::Replace { old, new }) => {
                self.apply_item_flag(*old, false)?;
                self.apply_item_flag(*new, true)?;
            }
            CollectionEvent::Changed(CollectionChange::Reset) => {
                let bound: Vec<ObjectId> = self.generator.bound_items().collect();
                for id in bound {
                    let selected = self.selection.contains(id);
                    self.apply_item_flag(id, selected)?;
                }
            }
            CollectionEvent::CountChanged(_) | CollectionEvent::BoundsChanged(_) => {}
        }
        Ok(())
    }

    fn apply_item_flag(&mut self, item: ObjectId, selected: bool) -> Result<()> {
        match self.generator.container_from_item(item) {
            Some(container) => self.apply_container_flag(container, selected),
            None => Ok(()),
        }
    }

    fn apply_container_flag(&mut self, container_id: ContainerId, selected: bool) -> Result<()> {
        let container = self
            .generator
            .container_mut(container_id)
            .ok_or(CanvasError::UnknownContainer {
                container: container_id,
            })?;
        if container.item().is_none() {
            return Err(CanvasError::ContainerNotBound {
                container: container_id,
            });
        }
        if container.is_selected == selected {
            return Ok(());
        }
        container.is_selected = selected;
        self.host.borrow_mut().update_child(container);
        self.on_container_selected_changed(container_id, selected)
    }

    /// Container flags -> selection set. Ignored while a pass is active.
    fn on_container_selected_changed(&mut self, container_id: ContainerId, selected: bool) -> Result<()> {
        if self.sync.is_synchronizing() {
            return Ok(());
        }
        let _pass = self.sync.enter()?;
        let item = self
            .generator
            .item_from_container(container_id)
            .ok_or(CanvasError::ContainerNotBound {
                container: container_id,
            })?;
        if selected {
            self.selection.add(item);
        } else {
            self.selection.remove(item);
        }
        for event in self.selection.drain_events() {
            self.bus.publish(CanvasEvent::Selection(event));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DesignerCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignerCanvas")
            .field("items", &self.items.len())
            .field("selected", &self.selection.len())
            .field("live_containers", &self.generator.bound_count())
            .field("viewport", &self.viewport.viewport())
            .field("gesture", &self.gesture.as_ref().map(ActiveGesture::kind))
            .finish()
    }
}
