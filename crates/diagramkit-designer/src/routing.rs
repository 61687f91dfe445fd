//! Connection routing.
//!
//! Produces the polyline drawn for a connection. Elbow routes leave the
//! source along its connector axis, make orthogonal turns, and enter the
//! sink along its axis.

use diagramkit_core::Point;
use smallvec::{smallvec, SmallVec};

use crate::model::ConnectorDirection;

pub use diagramkit_settings::RoutingStyle;

/// Polyline with inline storage for the common (at most 4 point) case.
pub type Route = SmallVec<[Point; 4]>;

/// Compute the polyline from `source` to `sink`.
///
/// * Straight: the two endpoints.
/// * Elbow, same axis at both ends: a turn at the midpoint (4 points).
/// * Elbow, different axes: a single corner (3 points).
pub fn route(
    source: Point,
    source_direction: ConnectorDirection,
    sink: Point,
    sink_direction: ConnectorDirection,
    style: RoutingStyle,
) -> Route {
    if style == RoutingStyle::Straight {
        return smallvec![source, sink];
    }

    match (source_direction, sink_direction) {
        (ConnectorDirection::Horizontal, ConnectorDirection::Horizontal) => {
            let mid_x = (source.x + sink.x) / 2.0;
            smallvec![
                source,
                Point::new(mid_x, source.y),
                Point::new(mid_x, sink.y),
                sink
            ]
        }
        (ConnectorDirection::Vertical, ConnectorDirection::Vertical) => {
            let mid_y = (source.y + sink.y) / 2.0;
            smallvec![
                source,
                Point::new(source.x, mid_y),
                Point::new(sink.x, mid_y),
                sink
            ]
        }
        (ConnectorDirection::Horizontal, ConnectorDirection::Vertical) => {
            smallvec![source, Point::new(sink.x, source.y), sink]
        }
        (ConnectorDirection::Vertical, ConnectorDirection::Horizontal) => {
            smallvec![source, Point::new(source.x, sink.y), sink]
        }
    }
}
