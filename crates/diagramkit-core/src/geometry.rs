//! Geometry primitives for the canvas.
//!
//! All values are `f64` in device-independent canvas units. Every function
//! here is total: degenerate rectangles, empty rectangles, and arbitrary
//! angles (including non-finite ones) produce a defined result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0)
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Offset this point by a vector
    pub fn offset(&self, v: Vector) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        self.offset(rhs)
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Signed angle from `a` to `b` in degrees, in `(-180, 180]`.
    ///
    /// Positive values turn clockwise in screen coordinates (y grows downward).
    /// Returns 0 when either vector has zero length.
    pub fn angle_between(a: Vector, b: Vector) -> f64 {
        let cross = a.x * b.y - a.y * b.x;
        let dot = a.x * b.x + a.y * b.y;
        let angle = cross.atan2(dot).to_degrees();
        if angle.is_finite() {
            angle
        } else {
            0.0
        }
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x{:.2}", self.width, self.height)
    }
}

/// An axis-aligned rectangle.
///
/// Width and height are never negative, except for [`Rect::EMPTY`], which
/// uses infinite coordinates and negative infinite extents so that it acts
/// as the identity for [`Rect::union`] and intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Rect {
    /// The empty rectangle
    pub const EMPTY: Rect = Rect {
        x: f64::INFINITY,
        y: f64::INFINITY,
        width: f64::NEG_INFINITY,
        height: f64::NEG_INFINITY,
    };

    /// Create a rectangle. Negative extents are normalized by moving the
    /// origin so that the same area is described.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self { x, y, width, height }
    }

    /// Rectangle spanned by two corners given in any order
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Rectangle with the given top-left corner and size
    pub fn from_location_size(location: Point, size: Size) -> Self {
        Self::new(location.x, location.y, size.width, size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width < 0.0
    }

    /// True for empty rectangles and for those with zero width or height.
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.width == 0.0 || self.height == 0.0
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        if self.is_empty() {
            f64::NEG_INFINITY
        } else {
            self.x + self.width
        }
    }

    pub fn bottom(&self) -> f64 {
        if self.is_empty() {
            f64::NEG_INFINITY
        } else {
            self.y + self.height
        }
    }

    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing both. `EMPTY` is the identity.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Overlapping area, or `EMPTY` if the rectangles do not meet.
    pub fn intersect(&self, other: &Rect) -> Rect {
        if !self.intersects_with(other) {
            return Rect::EMPTY;
        }
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// Whether the rectangles overlap. Touching edges count as overlap.
    pub fn intersects_with(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.left() <= self.right()
            && other.right() >= self.left()
            && other.top() <= self.bottom()
            && other.bottom() >= self.top()
    }

    /// Whether `other` lies entirely within this rectangle (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() <= other.left()
            && self.top() <= other.top()
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Grow (or shrink, for negative values) on every side.
    /// Shrinking past zero size yields `EMPTY`.
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        if self.is_empty() {
            return Rect::EMPTY;
        }
        let width = self.width + 2.0 * dx;
        let height = self.height + 2.0 * dy;
        if width < 0.0 || height < 0.0 {
            return Rect::EMPTY;
        }
        Rect {
            x: self.x - dx,
            y: self.y - dy,
            width,
            height,
        }
    }

    pub fn offset(&self, v: Vector) -> Rect {
        if self.is_empty() {
            return Rect::EMPTY;
        }
        Rect {
            x: self.x + v.x,
            y: self.y + v.y,
            ..*self
        }
    }

    /// Multiply location and size by a uniform factor.
    pub fn scale(&self, factor: f64) -> Rect {
        if self.is_empty() {
            return Rect::EMPTY;
        }
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Empty")
        } else {
            write!(
                f,
                "[{:.2}, {:.2}, {:.2}x{:.2}]",
                self.x, self.y, self.width, self.height
            )
        }
    }
}

/// Normalize an angle in degrees to `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_angle(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let a = degrees.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Axis-aligned bounds of a box rotated by `angle` degrees about its center.
pub fn rotated_bounds(location: Point, size: Size, angle: f64) -> Rect {
    let radians = normalize_angle(angle).to_radians();
    let s = radians.sin().abs();
    let c = radians.cos().abs();
    let width = size.width * c + size.height * s;
    let height = size.width * s + size.height * c;
    let cx = location.x + size.width / 2.0;
    let cy = location.y + size.height / 2.0;
    Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
}

/// Rotate `point` around `center` by `angle` degrees (clockwise on screen).
pub fn rotate_point(point: Point, center: Point, angle: f64) -> Point {
    let radians = normalize_angle(angle).to_radians();
    let (s, c) = radians.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(center.x + dx * c - dy * s, center.y + dx * s + dy * c)
}
