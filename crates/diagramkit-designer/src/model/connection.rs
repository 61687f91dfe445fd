//! Routed line between two connectors.

use diagramkit_core::{ObjectId, Point, Rect};
use serde::Serialize;
use smallvec::SmallVec;

use super::connector::{ConnectorDirection, ConnectorSide};
use super::entity::Entity;
use crate::routing::{route, RoutingStyle};

/// Non-owning reference to one connector of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectorRef {
    pub entity: ObjectId,
    pub side: ConnectorSide,
}

impl ConnectorRef {
    pub fn new(entity: ObjectId, side: ConnectorSide) -> Self {
        Self { entity, side }
    }

    /// Resolve against the owning entity.
    pub fn position(&self, owner: &Entity) -> Point {
        owner.connector_position(self.side)
    }

    pub fn direction(&self, owner: &Entity) -> ConnectorDirection {
        owner.connector(self.side).direction()
    }
}

/// A line joining a source connector to a sink connector.
///
/// Endpoint positions are cached; the owning collection refreshes them when
/// either endpoint entity changes geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    id: ObjectId,
    source: ConnectorRef,
    sink: ConnectorRef,
    source_position: Point,
    sink_position: Point,
    source_direction: ConnectorDirection,
    sink_direction: ConnectorDirection,
    routing: RoutingStyle,
    geometry_version: u64,
}

impl Connection {
    /// Connect `source_side` of `source` to `sink_side` of `sink`.
    pub fn new(
        source: &Entity,
        source_side: ConnectorSide,
        sink: &Entity,
        sink_side: ConnectorSide,
    ) -> Self {
        let source_ref = ConnectorRef::new(source.id(), source_side);
        let sink_ref = ConnectorRef::new(sink.id(), sink_side);
        Self {
            id: ObjectId::next(),
            source_position: source_ref.position(source),
            sink_position: sink_ref.position(sink),
            source_direction: source_ref.direction(source),
            sink_direction: sink_ref.direction(sink),
            source: source_ref,
            sink: sink_ref,
            routing: RoutingStyle::default(),
            geometry_version: 0,
        }
    }

    pub fn with_routing(mut self, routing: RoutingStyle) -> Self {
        self.routing = routing;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn source(&self) -> ConnectorRef {
        self.source
    }

    pub fn sink(&self) -> ConnectorRef {
        self.sink
    }

    pub fn source_position(&self) -> Point {
        self.source_position
    }

    pub fn sink_position(&self) -> Point {
        self.sink_position
    }

    pub fn routing(&self) -> RoutingStyle {
        self.routing
    }

    pub fn set_routing(&mut self, routing: RoutingStyle) {
        if self.routing != routing {
            self.routing = routing;
            self.geometry_version = self.geometry_version.wrapping_add(1);
        }
    }

    pub fn geometry_version(&self) -> u64 {
        self.geometry_version
    }

    /// True if either endpoint belongs to `entity`.
    pub fn touches(&self, entity: ObjectId) -> bool {
        self.source.entity == entity || self.sink.entity == entity
    }

    /// Rectangle spanned by the two cached endpoint positions.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.source_position, self.sink_position)
    }

    /// Polyline from source to sink using the current routing style.
    pub fn route(&self) -> SmallVec<[Point; 4]> {
        route(
            self.source_position,
            self.source_direction,
            self.sink_position,
            self.sink_direction,
            self.routing,
        )
    }

    pub(crate) fn apply_endpoints(
        &mut self,
        source: Option<(Point, ConnectorDirection)>,
        sink: Option<(Point, ConnectorDirection)>,
    ) -> bool {
        let mut changed = false;
        if let Some((position, direction)) = source {
            if position != self.source_position || direction != self.source_direction {
                self.source_position = position;
                self.source_direction = direction;
                changed = true;
            }
        }
        if let Some((position, direction)) = sink {
            if position != self.sink_position || direction != self.sink_direction {
                self.sink_position = position;
                self.sink_direction = direction;
                changed = true;
            }
        }
        if changed {
            self.geometry_version = self.geometry_version.wrapping_add(1);
        }
        changed
    }
}
