//! Render host seam.
//!
//! The canvas never draws. It tells a [`RenderHost`] which containers to
//! show, how to lay them out, which view transform to apply, and where the
//! rubber-band overlay is. [`HeadlessHost`] records those calls and is what
//! the demo binary and the tests run against.

use std::collections::HashMap;

use diagramkit_core::{ContainerId, OverlayId, Rect, Shared};

use crate::generator::{Container, ContainerLayout};
use crate::viewport::ViewTransform;

/// Rendering toolkit as seen by the canvas.
pub trait RenderHost {
    /// Insert a container into the rendered children.
    fn add_child(&mut self, container: &Container);
    /// Remove a container from the rendered children.
    fn remove_child(&mut self, container: ContainerId);
    /// Layout or selection flag of a rendered container changed.
    fn update_child(&mut self, container: &Container);
    fn set_view_transform(&mut self, transform: ViewTransform);
    /// Show a transient overlay rectangle (canvas coordinates).
    fn add_overlay(&mut self, rect: Rect) -> OverlayId;
    fn update_overlay(&mut self, overlay: OverlayId, rect: Rect);
    fn remove_overlay(&mut self, overlay: OverlayId);
}

/// State of a child as last reported to [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostChild {
    pub layout: ContainerLayout,
    pub is_selected: bool,
}

/// A host that keeps the reported scene in memory.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    children: HashMap<ContainerId, HostChild>,
    overlays: HashMap<OverlayId, Rect>,
    transform: ViewTransform,
    adds: usize,
    removes: usize,
    updates: usize,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self, id: ContainerId) -> Option<&HostChild> {
        self.children.get(&id)
    }

    pub fn child_ids(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.children.keys().copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn overlay(&self, id: OverlayId) -> Option<Rect> {
        self.overlays.get(&id).copied()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Number of `add_child` calls so far.
    pub fn adds(&self) -> usize {
        self.adds
    }

    pub fn removes(&self) -> usize {
        self.removes
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl RenderHost for HeadlessHost {
    fn add_child(&mut self, container: &Container) {
        self.adds += 1;
        self.children.insert(
            container.id(),
            HostChild {
                layout: container.layout.clone(),
                is_selected: container.is_selected,
            },
        );
    }

    fn remove_child(&mut self, container: ContainerId) {
        if self.children.remove(&container).is_some() {
            self.removes += 1;
        }
    }

    fn update_child(&mut self, container: &Container) {
        if let Some(child) = self.children.get_mut(&container.id()) {
            self.updates += 1;
            child.layout = container.layout.clone();
            child.is_selected = container.is_selected;
        }
    }

    fn set_view_transform(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }

    fn add_overlay(&mut self, rect: Rect) -> OverlayId {
        let id = OverlayId::next();
        self.overlays.insert(id, rect);
        id
    }

    fn update_overlay(&mut self, overlay: OverlayId, rect: Rect) {
        if let Some(existing) = self.overlays.get_mut(&overlay) {
            *existing = rect;
        }
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        self.overlays.remove(&overlay);
    }
}

/// Owns an overlay on a host and removes it when dropped.
pub struct OverlayGuard {
    host: Shared<dyn RenderHost>,
    id: OverlayId,
    rect: Rect,
}

impl OverlayGuard {
    /// Adds an overlay showing `rect` to `host`.
    pub fn new(host: Shared<dyn RenderHost>, rect: Rect) -> Self {
        let id = host.borrow_mut().add_overlay(rect);
        Self { host, id, rect }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn update(&mut self, rect: Rect) {
        if rect != self.rect {
            self.rect = rect;
            self.host.borrow_mut().update_overlay(self.id, rect);
        }
    }
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.remove_overlay(self.id),
            Err(_) => tracing::error!("Host busy, {} could not be removed", self.id),
        }
    }
}

impl std::fmt::Debug for OverlayGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayGuard")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .finish()
    }
}
