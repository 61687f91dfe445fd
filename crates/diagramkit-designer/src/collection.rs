//! Item collection with region queries.
//!
//! Owns every [`GraphicalObject`] on the canvas. Membership is by identity:
//! adding an object whose id is already present is rejected. Mutations are
//! recorded as [`CollectionEvent`]s and handed to the owner through
//! [`GraphicalObjectCollection::drain_events`].
//!
//! Region queries are a linear scan over every item.

use std::collections::{HashMap, HashSet};
use std::ops::{BitOr, BitOrAssign};

use diagramkit_core::{
    CanvasError, CollectionChange, CollectionEvent, ObjectId, Point, Rect, Result,
};

use crate::model::{
    Connection, ConnectorDirection, ConnectorRef, Entity, GraphicalObject, HitTestResult,
};

/// Default number of ids per Add notification in [`GraphicalObjectCollection::add_range`].
pub const DEFAULT_NOTIFICATION_BATCH: usize = 128;

/// Options for [`GraphicalObjectCollection::objects_in_region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ItemSelectionOptions(u8);

impl ItemSelectionOptions {
    /// Only objects whose bounds lie inside the region.
    pub const NONE: Self = Self(0);
    /// Also objects whose bounds merely intersect the region.
    pub const INCLUDE_PARTIAL_SELECTION: Self = Self(1);
    /// Refine the bounds test with [`GraphicalObject::hit_test`].
    pub const PERFORM_HIT_TEST: Self = Self(2);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ItemSelectionOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ItemSelectionOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The set of graphical objects hosted by a canvas.
#[derive(Debug, Clone)]
pub struct GraphicalObjectCollection {
    items: HashMap<ObjectId, GraphicalObject>,
    /// entity -> connections attached to it
    dependents: HashMap<ObjectId, Vec<ObjectId>>,
    events: Vec<CollectionEvent>,
    batch_size: usize,
}

impl Default for GraphicalObjectCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicalObjectCollection {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            dependents: HashMap::new(),
            events: Vec::new(),
            batch_size: DEFAULT_NOTIFICATION_BATCH,
        }
    }

    /// Sets how many ids one Add notification carries during `add_range`.
    pub fn set_notification_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size.max(1);
    }

    pub fn notification_batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GraphicalObject> {
        self.items.get(&id)
    }

    pub fn get_entity(&self, id: ObjectId) -> Option<&Entity> {
        self.items.get(&id).and_then(GraphicalObject::as_entity)
    }

    pub fn get_connection(&self, id: ObjectId) -> Option<&Connection> {
        self.items.get(&id).and_then(GraphicalObject::as_connection)
    }

    /// Iterate over all objects, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphicalObject> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.items.keys().copied()
    }

    /// Connections attached to `entity`.
    pub fn connections_of(&self, entity: ObjectId) -> &[ObjectId] {
        self.dependents
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Adds an object.
    ///
    /// # Errors
    ///
    /// * [`CanvasError::DuplicateItem`] if the id is already present.
    /// * [`CanvasError::UnknownEndpoint`] if a connection references an
    ///   entity that is not in the collection.
    pub fn add(&mut self, object: impl Into<GraphicalObject>) -> Result<ObjectId> {
        let object = object.into();
        let id = object.id();
        self.validate(&object, &HashSet::new())?;
        self.insert(object);
        self.events
            .push(CollectionEvent::Changed(CollectionChange::Add(vec![id])));
        self.events.push(CollectionEvent::CountChanged(self.items.len()));
        Ok(id)
    }

    /// Adds many objects at once.
    ///
    /// Connections may reference entities that appear earlier or later in
    /// the same batch. Either every object is added or none is. Add
    /// notifications are split into chunks of the notification batch size,
    /// followed by a single count notification.
    pub fn add_range<I>(&mut self, objects: I) -> Result<Vec<ObjectId>>
    where
        I: IntoIterator,
        I::Item: Into<GraphicalObject>,
    {
        let objects: Vec<GraphicalObject> = objects.into_iter().map(Into::into).collect();
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let batch_entities: HashSet<ObjectId> = objects
            .iter()
            .filter_map(|o| o.as_entity().map(Entity::id))
            .collect();
        let mut seen = HashSet::with_capacity(objects.len());
        for object in &objects {
            if !seen.insert(object.id()) {
                return Err(CanvasError::DuplicateItem { id: object.id() });
            }
            self.validate(object, &batch_entities)?;
        }

        // Entities first so connections can resolve their endpoints.
        let (entities, connections): (Vec<_>, Vec<_>) = objects
            .into_iter()
            .partition(|o| matches!(o, GraphicalObject::Entity(_)));
        let mut ids = Vec::with_capacity(entities.len() + connections.len());
        for object in entities.into_iter().chain(connections) {
            ids.push(object.id());
            self.insert(object);
        }

        for chunk in ids.chunks(self.batch_size) {
            self.events
                .push(CollectionEvent::Changed(CollectionChange::Add(chunk.to_vec())));
        }
        self.events.push(CollectionEvent::CountChanged(self.items.len()));
        tracing::debug!("Added {} item(s) in bulk", ids.len());
        Ok(ids)
    }

    /// Removes an object, returning it if it was present.
    ///
    /// Removing an entity leaves its connections in place; they are
    /// reported by [`Self::dangling_connections`] until removed. Unhooking a
    /// connection from its endpoints' dependency lists is linear in the
    /// number of connections attached to each endpoint.
    pub fn remove(&mut self, id: ObjectId) -> Option<GraphicalObject> {
        let object = self.detach(id)?;
        self.events
            .push(CollectionEvent::Changed(CollectionChange::Remove(vec![id])));
        self.events.push(CollectionEvent::CountChanged(self.items.len()));
        Some(object)
    }

    /// Removes several objects with a single notification.
    pub fn remove_range(&mut self, ids: &[ObjectId]) -> Vec<GraphicalObject> {
        let removed: Vec<GraphicalObject> = ids.iter().filter_map(|id| self.detach(*id)).collect();
        if !removed.is_empty() {
            self.events.push(CollectionEvent::Changed(CollectionChange::Remove(
                removed.iter().map(GraphicalObject::id).collect(),
            )));
            self.events.push(CollectionEvent::CountChanged(self.items.len()));
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.dependents.clear();
        self.events
            .push(CollectionEvent::Changed(CollectionChange::Reset));
        self.events.push(CollectionEvent::CountChanged(0));
    }

    /// Runs `f` against an entity. If its geometry changed, every attached
    /// connection is re-anchored and a bounds notification is recorded for
    /// each object that moved.
    pub fn modify_entity<R>(&mut self, id: ObjectId, f: impl FnOnce(&mut Entity) -> R) -> Result<R> {
        let object = self
            .items
            .get_mut(&id)
            .ok_or(CanvasError::UnknownItem { id })?;
        let entity = object
            .as_entity_mut()
            .ok_or(CanvasError::NotAnEntity { id })?;

        let before = entity.geometry_version();
        let result = f(entity);
        if entity.geometry_version() != before {
            self.events.push(CollectionEvent::BoundsChanged(id));
            self.refresh_dependents(id);
        }
        Ok(result)
    }

    /// Runs `f` against a connection, recording a bounds notification if its
    /// geometry changed.
    pub fn modify_connection<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut Connection) -> R,
    ) -> Result<R> {
        let connection = self
            .items
            .get_mut(&id)
            .ok_or(CanvasError::UnknownItem { id })?
            .as_connection_mut()
            .ok_or(CanvasError::UnknownItem { id })?;

        let before = connection.geometry_version();
        let result = f(connection);
        if connection.geometry_version() != before {
            self.events.push(CollectionEvent::BoundsChanged(id));
        }
        Ok(result)
    }

    /// Objects matching `region` under `options`.
    ///
    /// * default: bounds inside `region`
    /// * `INCLUDE_PARTIAL_SELECTION`: bounds intersecting `region`
    /// * `PERFORM_HIT_TEST` with partial: hit test is not `None`
    /// * `PERFORM_HIT_TEST` alone: hit test is `Contains`, i.e. objects that
    ///   enclose `region` (such as the items under a small pick rectangle)
    ///
    /// A degenerate region matches nothing.
    pub fn objects_in_region(
        &self,
        region: Rect,
        options: ItemSelectionOptions,
    ) -> impl Iterator<Item = &GraphicalObject> + '_ {
        let degenerate = region.is_degenerate();
        let partial = options.contains(ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION);
        let hit_test = options.contains(ItemSelectionOptions::PERFORM_HIT_TEST);

        self.items.values().filter(move |object| {
            if degenerate {
                return false;
            }
            let bounds = object.bounds();
            let coarse = if partial || hit_test {
                region.intersects_with(&bounds)
            } else {
                region.contains_rect(&bounds)
            };
            if !coarse {
                return false;
            }
            if !hit_test {
                return true;
            }
            let result = object.hit_test(&region);
            if partial {
                result != HitTestResult::None
            } else {
                result == HitTestResult::Contains
            }
        })
    }

    /// Union of all item bounds, or `Rect::EMPTY`.
    pub fn bounds(&self) -> Rect {
        self.items
            .values()
            .fold(Rect::EMPTY, |acc, object| acc.union(&object.bounds()))
    }

    /// Connections whose source or sink entity is no longer a member.
    pub fn dangling_connections(&self) -> Vec<ObjectId> {
        self.items
            .values()
            .filter_map(GraphicalObject::as_connection)
            .filter(|c| !self.is_entity(c.source().entity) || !self.is_entity(c.sink().entity))
            .map(Connection::id)
            .collect()
    }

    /// Take the recorded notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }

    fn is_entity(&self, id: ObjectId) -> bool {
        self.get_entity(id).is_some()
    }

    fn validate(&self, object: &GraphicalObject, batch_entities: &HashSet<ObjectId>) -> Result<()> {
        let id = object.id();
        if self.items.contains_key(&id) {
            return Err(CanvasError::DuplicateItem { id });
        }
        if let GraphicalObject::Connection(connection) = object {
            for endpoint in [connection.source().entity, connection.sink().entity] {
                if !self.is_entity(endpoint) && !batch_entities.contains(&endpoint) {
                    return Err(CanvasError::UnknownEndpoint {
                        connection: id,
                        entity: endpoint,
                    });
                }
            }
        }
        Ok(())
    }

    fn insert(&mut self, mut object: GraphicalObject) {
        let id = object.id();
        if let GraphicalObject::Connection(connection) = &mut object {
            let source = self.endpoint_state(connection.source());
            let sink = self.endpoint_state(connection.sink());
            connection.apply_endpoints(source, sink);
            for endpoint in [connection.source().entity, connection.sink().entity] {
                let list = self.dependents.entry(endpoint).or_default();
                if !list.contains(&id) {
                    list.push(id);
                }
            }
        }
        self.items.insert(id, object);
    }

    fn detach(&mut self, id: ObjectId) -> Option<GraphicalObject> {
        let object = self.items.remove(&id)?;
        match &object {
            GraphicalObject::Connection(connection) => {
                for endpoint in [connection.source().entity, connection.sink().entity] {
                    if let Some(list) = self.dependents.get_mut(&endpoint) {
                        list.retain(|c| *c != id);
                        if list.is_empty() {
                            self.dependents.remove(&endpoint);
                        }
                    }
                }
            }
            GraphicalObject::Entity(_) => {
                let attached = self.connections_of(id).len();
                if attached > 0 {
                    tracing::warn!(
                        "Removed {} while {} connection(s) still reference it",
                        id,
                        attached
                    );
                }
            }
        }
        Some(object)
    }

    fn endpoint_state(&self, endpoint: ConnectorRef) -> Option<(Point, ConnectorDirection)> {
        self.get_entity(endpoint.entity)
            .map(|owner| (endpoint.position(owner), endpoint.direction(owner)))
    }

    fn refresh_dependents(&mut self, entity: ObjectId) {
        let attached = self.connections_of(entity).to_vec();
        for connection_id in attached {
            let Some((source, sink)) = self
                .get_connection(connection_id)
                .map(|c| (c.source(), c.sink()))
            else {
                continue;
            };
            let source = self.endpoint_state(source);
            let sink = self.endpoint_state(sink);
            let moved = self
                .items
                .get_mut(&connection_id)
                .and_then(GraphicalObject::as_connection_mut)
                .is_some_and(|c| c.apply_endpoints(source, sink));
            if moved {
                self.events
                    .push(CollectionEvent::BoundsChanged(connection_id));
            }
        }
    }
}
