//! Box-shaped diagram node.

use diagramkit_core::{normalize_angle, rotated_bounds, ObjectId, Point, Rect, Size, Vector};
use serde::Serialize;

use super::connector::{Connector, ConnectorDirection, ConnectorSide};

/// Minimum width and height applied to new entities.
pub const DEFAULT_MIN_SIZE: f64 = 10.0;

/// A movable, resizable, rotatable box with four connectors.
///
/// `location` is the top-left corner of the unrotated box; rotation is about
/// the box center. Every geometry setter bumps [`Entity::geometry_version`]
/// when the value actually changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    id: ObjectId,
    location: Point,
    size: Size,
    angle: f64,
    resizeable: bool,
    min_width: f64,
    min_height: f64,
    label: Option<String>,
    connectors: [Connector; 4],
    geometry_version: u64,
}

impl Entity {
    /// Creates an entity at `location` with the given size.
    pub fn new(location: Point, size: Size) -> Self {
        let id = ObjectId::next();
        Self {
            id,
            location,
            size: Size::new(size.width.max(0.0), size.height.max(0.0)),
            angle: 0.0,
            resizeable: true,
            min_width: DEFAULT_MIN_SIZE,
            min_height: DEFAULT_MIN_SIZE,
            label: None,
            connectors: ConnectorSide::ALL.map(|side| Connector::new(id, side)),
            geometry_version: 0,
        }
    }

    /// Convenience constructor from raw coordinates.
    pub fn with_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = normalize_angle(angle);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_min_size(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width.max(0.0);
        self.min_height = min_height.max(0.0);
        self
    }

    pub fn with_resizeable(mut self, resizeable: bool) -> Self {
        self.resizeable = resizeable;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn left(&self) -> f64 {
        self.location.x
    }

    pub fn top(&self) -> f64 {
        self.location.y
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Rotation in degrees, always in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn resizeable(&self) -> bool {
        self.resizeable
    }

    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn set_resizeable(&mut self, resizeable: bool) {
        self.resizeable = resizeable;
    }

    pub fn geometry_version(&self) -> u64 {
        self.geometry_version
    }

    /// Axis-aligned bounds of the rotated box.
    pub fn bounds(&self) -> Rect {
        rotated_bounds(self.location, self.size, self.angle)
    }

    /// Unrotated box.
    pub fn frame(&self) -> Rect {
        Rect::from_location_size(self.location, self.size)
    }

    pub fn center(&self) -> Point {
        self.frame().center()
    }

    pub fn connectors(&self) -> &[Connector; 4] {
        &self.connectors
    }

    pub fn connector(&self, side: ConnectorSide) -> &Connector {
        &self.connectors[side.index()]
    }

    /// Sets the axis connections use at the connector on `side`. Counts as
    /// a geometry change, so attached connections are re-routed.
    pub fn set_connector_direction(&mut self, side: ConnectorSide, direction: ConnectorDirection) {
        let connector = &mut self.connectors[side.index()];
        if connector.direction() != direction {
            connector.set_direction(direction);
            self.touch();
        }
    }

    /// Absolute position of the connector on `side`.
    pub fn connector_position(&self, side: ConnectorSide) -> Point {
        self.connector(side).absolute_position(self)
    }

    pub fn set_location(&mut self, location: Point) {
        if self.location != location {
            self.location = location;
            self.touch();
        }
    }

    pub fn set_left(&mut self, left: f64) {
        self.set_location(Point::new(left, self.location.y));
    }

    pub fn set_top(&mut self, top: f64) {
        self.set_location(Point::new(self.location.x, top));
    }

    /// Sets the size. Negative extents are clamped to zero.
    pub fn set_size(&mut self, size: Size) {
        let size = Size::new(size.width.max(0.0), size.height.max(0.0));
        if self.size != size {
            self.size = size;
            self.touch();
        }
    }

    pub fn set_width(&mut self, width: f64) {
        self.set_size(Size::new(width, self.size.height));
    }

    pub fn set_height(&mut self, height: f64) {
        self.set_size(Size::new(self.size.width, height));
    }

    /// Sets the rotation, normalized to `[0, 360)`.
    pub fn set_angle(&mut self, angle: f64) {
        let angle = normalize_angle(angle);
        if self.angle != angle {
            self.angle = angle;
            self.touch();
        }
    }

    pub fn translate(&mut self, delta: Vector) {
        self.set_location(self.location + delta);
    }

    fn touch(&mut self) {
        self.geometry_version = self.geometry_version.wrapping_add(1);
    }
}
