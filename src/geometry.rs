//! Viewport geometry helpers.

use glam::Vec2;

use crate::consts::{HEIGHT, WIDTH};

/// Axis-aligned bounding box stored as a centre point plus size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Shift the box in place.
    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Strict overlap test; boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Bounding-box size of a `w`×`h` rectangle rotated by `degrees`.
pub fn rotated_size(size: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(
        (size.x * cos).abs() + (size.y * sin).abs(),
        (size.x * sin).abs() + (size.y * cos).abs(),
    )
}

/// Returns `(horizontal_ok, vertical_ok)`.  `false` on an axis means the box
/// sticks out of the viewport on that axis, partially or fully.
pub fn in_bounds(rect: &Rect) -> (bool, bool) {
    let horizontal = !(rect.left() < 0.0 || WIDTH < rect.right());
    let vertical = !(rect.top() < 0.0 || HEIGHT < rect.bottom());
    (horizontal, vertical)
}

/// True when the box is fully inside the viewport on both axes.
pub fn fully_inside(rect: &Rect) -> bool {
    in_bounds(rect) == (true, true)
}

/// Unit vector pointing from `origin`'s centre toward `target`'s centre.
/// Coincident centres yield the zero vector.
pub fn direction_to(origin: &Rect, target: &Rect) -> Vec2 {
    (target.center - origin.center).normalize_or_zero()
}
