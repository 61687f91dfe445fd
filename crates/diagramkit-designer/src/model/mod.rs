//! Graphical object model.
//!
//! The canvas hosts two kinds of objects: [`Entity`] boxes and the
//! [`Connection`] lines between their connectors. [`GraphicalObject`] is the
//! closed set the item collection stores.

mod connection;
mod connector;
mod entity;

pub use connection::{Connection, ConnectorRef};
pub use connector::{Connector, ConnectorDirection, ConnectorSide};
pub use entity::{Entity, DEFAULT_MIN_SIZE};

use diagramkit_core::{ObjectId, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a [`GraphicalObject`]; keys the container pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Entity,
    Connection,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Entity => write!(f, "Entity"),
            ObjectKind::Connection => write!(f, "Connection"),
        }
    }
}

/// Relation between a query region and an object's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTestResult {
    /// No overlap.
    None,
    /// Partial overlap.
    Intersects,
    /// The object's bounds fully contain the region.
    Contains,
    /// The region fully contains the object's bounds.
    Inside,
}

impl HitTestResult {
    /// Classify `region` against `bounds`.
    ///
    /// When both containments hold (equal rectangles) the object is reported
    /// as `Inside`, since it is fully covered by the region.
    pub fn classify(bounds: &Rect, region: &Rect) -> Self {
        if !region.intersects_with(bounds) {
            HitTestResult::None
        } else if region.contains_rect(bounds) {
            HitTestResult::Inside
        } else if bounds.contains_rect(region) {
            HitTestResult::Contains
        } else {
            HitTestResult::Intersects
        }
    }
}

/// An item on the canvas.
///
/// Serializes for inspection only. There is no `Deserialize`: ids come
/// from [`ObjectId::next`] alone, so two items can never share one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GraphicalObject {
    Entity(Entity),
    Connection(Connection),
}

impl GraphicalObject {
    pub fn id(&self) -> ObjectId {
        match self {
            GraphicalObject::Entity(e) => e.id(),
            GraphicalObject::Connection(c) => c.id(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            GraphicalObject::Entity(_) => ObjectKind::Entity,
            GraphicalObject::Connection(_) => ObjectKind::Connection,
        }
    }

    /// Current axis-aligned bounds.
    pub fn bounds(&self) -> Rect {
        match self {
            GraphicalObject::Entity(e) => e.bounds(),
            GraphicalObject::Connection(c) => c.bounds(),
        }
    }

    pub fn hit_test(&self, region: &Rect) -> HitTestResult {
        HitTestResult::classify(&self.bounds(), region)
    }

    /// Counter bumped by every geometry change.
    pub fn geometry_version(&self) -> u64 {
        match self {
            GraphicalObject::Entity(e) => e.geometry_version(),
            GraphicalObject::Connection(c) => c.geometry_version(),
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            GraphicalObject::Entity(e) => Some(e),
            GraphicalObject::Connection(_) => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            GraphicalObject::Entity(e) => Some(e),
            GraphicalObject::Connection(_) => None,
        }
    }

    pub fn as_connection(&self) -> Option<&Connection> {
        match self {
            GraphicalObject::Connection(c) => Some(c),
            GraphicalObject::Entity(_) => None,
        }
    }

    pub fn as_connection_mut(&mut self) -> Option<&mut Connection> {
        match self {
            GraphicalObject::Connection(c) => Some(c),
            GraphicalObject::Entity(_) => None,
        }
    }
}

impl From<Entity> for GraphicalObject {
    fn from(entity: Entity) -> Self {
        GraphicalObject::Entity(entity)
    }
}

impl From<Connection> for GraphicalObject {
    fn from(connection: Connection) -> Self {
        GraphicalObject::Connection(connection)
    }
}
