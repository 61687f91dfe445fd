//! Connection points on an entity.

use diagramkit_core::{ObjectId, Point};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Which edge of its entity a connector sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl ConnectorSide {
    /// All sides in connector order
    pub const ALL: [ConnectorSide; 4] = [
        ConnectorSide::Top,
        ConnectorSide::Right,
        ConnectorSide::Bottom,
        ConnectorSide::Left,
    ];

    /// Position in the unit square of the owner
    pub fn relative_position(&self) -> Point {
        match self {
            ConnectorSide::Top => Point::new(0.5, 0.0),
            ConnectorSide::Right => Point::new(1.0, 0.5),
            ConnectorSide::Bottom => Point::new(0.5, 1.0),
            ConnectorSide::Left => Point::new(0.0, 0.5),
        }
    }

    pub fn default_direction(&self) -> ConnectorDirection {
        match self {
            ConnectorSide::Top | ConnectorSide::Bottom => ConnectorDirection::Vertical,
            ConnectorSide::Left | ConnectorSide::Right => ConnectorDirection::Horizontal,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ConnectorSide::Top => 0,
            ConnectorSide::Right => 1,
            ConnectorSide::Bottom => 2,
            ConnectorSide::Left => 3,
        }
    }
}

/// Axis along which a connection leaves or enters a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorDirection {
    Horizontal,
    Vertical,
}

/// A connection point belonging to exactly one entity.
///
/// The owner is referenced by id; the connector never keeps the entity alive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    owner: ObjectId,
    side: ConnectorSide,
    relative_position: Point,
    direction: ConnectorDirection,
}

impl Connector {
    pub fn new(owner: ObjectId, side: ConnectorSide) -> Self {
        Self {
            owner,
            side,
            relative_position: side.relative_position(),
            direction: side.default_direction(),
        }
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    pub fn side(&self) -> ConnectorSide {
        self.side
    }

    pub fn relative_position(&self) -> Point {
        self.relative_position
    }

    pub fn direction(&self) -> ConnectorDirection {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, direction: ConnectorDirection) {
        self.direction = direction;
    }

    /// Position on the canvas, following the owner's location, size, and
    /// rotation about its center.
    pub fn absolute_position(&self, owner: &Entity) -> Point {
        let size = owner.size();
        let location = owner.location();
        let x = (self.relative_position.x - 0.5) * size.width;
        let y = (self.relative_position.y - 0.5) * size.height;
        let (s, c) = owner.angle().to_radians().sin_cos();
        Point::new(
            location.x + (x * c - y * s) + size.width / 2.0,
            location.y + (x * s + y * c) + size.height / 2.0,
        )
    }
}
