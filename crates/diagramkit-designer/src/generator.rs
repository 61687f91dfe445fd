//! Container pool.
//!
//! A container is the visual stand-in for one visible item. Creating
//! containers is the expensive part of scrolling, so released containers are
//! kept in a per-kind free list (up to `max_pooled_containers` each) and
//! rebound to the next item of the same kind.

use std::collections::HashMap;

use diagramkit_core::{CanvasError, ContainerId, ObjectId, Point, Result, Size};
use smallvec::SmallVec;

use crate::model::{GraphicalObject, ObjectKind};

/// Default per-kind pool capacity.
pub const DEFAULT_MAX_POOLED_CONTAINERS: usize = 100;

/// Transform the host applies to a container.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerLayout {
    Entity {
        location: Point,
        size: Size,
        angle: f64,
    },
    Connection {
        points: SmallVec<[Point; 4]>,
    },
}

impl ContainerLayout {
    /// Layout matching the object's current geometry.
    pub fn of(object: &GraphicalObject) -> Self {
        match object {
            GraphicalObject::Entity(e) => ContainerLayout::Entity {
                location: e.location(),
                size: e.size(),
                angle: e.angle(),
            },
            GraphicalObject::Connection(c) => ContainerLayout::Connection { points: c.route() },
        }
    }
}

/// Visual stand-in for an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: ContainerId,
    kind: ObjectKind,
    item: Option<ObjectId>,
    pub is_selected: bool,
    pub layout: ContainerLayout,
}

impl Container {
    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The bound item, or `None` while pooled.
    pub fn item(&self) -> Option<ObjectId> {
        self.item
    }
}

/// Produces, binds, recycles, and pools containers.
#[derive(Debug, Clone)]
pub struct ContainerGenerator {
    containers: HashMap<ContainerId, Container>,
    item_to_container: HashMap<ObjectId, ContainerId>,
    pools: HashMap<ObjectKind, Vec<ContainerId>>,
    max_pooled: usize,
}

impl Default for ContainerGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POOLED_CONTAINERS)
    }
}

impl ContainerGenerator {
    pub fn new(max_pooled: usize) -> Self {
        Self {
            containers: HashMap::new(),
            item_to_container: HashMap::new(),
            pools: HashMap::new(),
            max_pooled,
        }
    }

    pub fn max_pooled_containers(&self) -> usize {
        self.max_pooled
    }

    /// Changes the per-kind pool capacity. Shrinking discards surplus pooled
    /// containers immediately.
    pub fn set_max_pooled_containers(&mut self, max_pooled: usize) {
        self.max_pooled = max_pooled;
        let mut evicted = Vec::new();
        for pool in self.pools.values_mut() {
            if pool.len() > max_pooled {
                evicted.extend(pool.drain(max_pooled..));
            }
        }
        for id in &evicted {
            self.containers.remove(id);
        }
        if !evicted.is_empty() {
            tracing::debug!("Evicted {} pooled container(s)", evicted.len());
        }
    }

    /// Binds a container to `object`, reusing a pooled one of the same kind
    /// when available. An object that already has a container keeps it.
    pub fn create_container(&mut self, object: &GraphicalObject) -> ContainerId {
        let item = object.id();
        if let Some(existing) = self.item_to_container.get(&item) {
            return *existing;
        }

        let kind = object.kind();
        let layout = ContainerLayout::of(object);
        let reused = self.pools.get_mut(&kind).and_then(Vec::pop);
        let id = match reused.and_then(|id| self.containers.get_mut(&id)) {
            Some(container) => {
                container.item = Some(item);
                container.is_selected = false;
                container.layout = layout;
                container.id
            }
            None => {
                let id = ContainerId::next();
                self.containers.insert(
                    id,
                    Container {
                        id,
                        kind,
                        item: Some(item),
                        is_selected: false,
                        layout,
                    },
                );
                id
            }
        };
        self.item_to_container.insert(item, id);
        id
    }

    /// Unbinds a container from its item and pools it if the pool for its
    /// kind has room; otherwise the container is discarded.
    ///
    /// # Errors
    ///
    /// * [`CanvasError::UnknownContainer`] for a handle this generator does
    ///   not own (including discarded ones).
    /// * [`CanvasError::ContainerNotBound`] if the container is already
    ///   recycled.
    pub fn recycle(&mut self, id: ContainerId) -> Result<()> {
        let container = self
            .containers
            .get_mut(&id)
            .ok_or(CanvasError::UnknownContainer { container: id })?;
        let item = container
            .item
            .take()
            .ok_or(CanvasError::ContainerNotBound { container: id })?;
        container.is_selected = false;
        let kind = container.kind;

        self.item_to_container.remove(&item);
        let pool = self.pools.entry(kind).or_default();
        if pool.len() < self.max_pooled {
            pool.push(id);
        } else {
            self.containers.remove(&id);
        }
        Ok(())
    }

    /// Recycles every bound container. Returns the recycled handles.
    pub fn recycle_all(&mut self) -> Result<Vec<ContainerId>> {
        let bound: Vec<ContainerId> = self.item_to_container.values().copied().collect();
        for id in &bound {
            self.recycle(*id)?;
        }
        Ok(bound)
    }

    pub fn container_from_item(&self, item: ObjectId) -> Option<ContainerId> {
        self.item_to_container.get(&item).copied()
    }

    pub fn item_from_container(&self, container: ContainerId) -> Option<ObjectId> {
        self.containers.get(&container).and_then(|c| c.item)
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(&id)
    }

    /// Items that currently have a container.
    pub fn bound_items(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.item_to_container.keys().copied()
    }

    pub fn bound_count(&self) -> usize {
        self.item_to_container.len()
    }

    pub fn pooled_count(&self, kind: ObjectKind) -> usize {
        self.pools.get(&kind).map_or(0, Vec::len)
    }
}
