//! Viewport delta computation.
//!
//! When the visible region moves or resizes, only the slivers that entered
//! or left the view need work. [`compute_viewport_delta`] turns an
//! old/new viewport pair into those slivers.
//!
//! Hide regions run from the margin-expanded boundary of everything that
//! could have been rendered up to the new viewport edge, so an item that was
//! fully scrolled past is always swept. The caller must still keep items
//! that straddle the new edge. Show regions are the exact strips of the new
//! viewport that were not covered before.

use diagramkit_core::{Point, Rect};
use smallvec::SmallVec;

/// A region whose items should become visible or hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityRegion {
    pub region: Rect,
    pub visible: bool,
}

impl VisibilityRegion {
    fn show(region: Rect) -> Self {
        Self {
            region,
            visible: true,
        }
    }

    fn hide(region: Rect) -> Self {
        Self {
            region,
            visible: false,
        }
    }
}

/// At most one hide and one show region per edge.
pub type ViewportDelta = SmallVec<[VisibilityRegion; 8]>;

/// Regions to hide and show when the viewport goes from `old` to `new`.
///
/// `extent` is the scrollable area and `margin` the safety margin added
/// around it when sweeping for items to hide. Both viewports must be
/// non-empty; callers rebuild from scratch otherwise. Zero-area strips are
/// omitted.
pub fn compute_viewport_delta(old: Rect, new: Rect, extent: Rect, margin: f64) -> ViewportDelta {
    let mut delta = ViewportDelta::new();
    if old.is_empty() || new.is_empty() || old == new {
        return delta;
    }

    let sweep = extent.union(&old).union(&new).inflate(margin, margin);
    let mut push = |region: Rect, visible: bool| {
        if !region.is_degenerate() {
            delta.push(if visible {
                VisibilityRegion::show(region)
            } else {
                VisibilityRegion::hide(region)
            });
        }
    };

    // Left edge
    if new.left() > old.left() {
        push(
            Rect::from_points(sweep.top_left(), Point::new(new.left(), sweep.bottom())),
            false,
        );
    } else if new.left() < old.left() {
        let strip = Rect::from_points(
            new.top_left(),
            Point::new(old.left().min(new.right()), new.bottom()),
        );
        push(strip.intersect(&new), true);
    }

    // Top edge
    if new.top() > old.top() {
        push(
            Rect::from_points(sweep.top_left(), Point::new(sweep.right(), new.top())),
            false,
        );
    } else if new.top() < old.top() {
        let strip = Rect::from_points(
            new.top_left(),
            Point::new(new.right(), old.top().min(new.bottom())),
        );
        push(strip.intersect(&new), true);
    }

    // Right edge
    if new.right() < old.right() {
        push(
            Rect::from_points(Point::new(new.right(), sweep.top()), sweep.bottom_right()),
            false,
        );
    } else if new.right() > old.right() {
        let strip = Rect::from_points(
            Point::new(old.right().max(new.left()), new.top()),
            new.bottom_right(),
        );
        push(strip.intersect(&new), true);
    }

    // Bottom edge
    if new.bottom() < old.bottom() {
        push(
            Rect::from_points(Point::new(sweep.left(), new.bottom()), sweep.bottom_right()),
            false,
        );
    } else if new.bottom() > old.bottom() {
        let strip = Rect::from_points(
            Point::new(new.left(), old.bottom().max(new.top())),
            new.bottom_right(),
        );
        push(strip.intersect(&new), true);
    }

    delta
}
