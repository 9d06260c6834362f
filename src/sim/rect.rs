//! Axis-aligned rectangles
//!
//! Every body and piece of level geometry is one of these. Coordinates are
//! screen-style: x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rect of the given size whose bottom edge is centered on `p`
    pub fn from_midbottom(p: Vec2, w: f32, h: f32) -> Self {
        Self::new(p.x - w / 2.0, p.y - h, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.bottom())
    }

    pub fn set_left(&mut self, v: f32) {
        self.x = v;
    }

    pub fn set_right(&mut self, v: f32) {
        self.x = v - self.w;
    }

    pub fn set_top(&mut self, v: f32) {
        self.y = v;
    }

    pub fn set_bottom(&mut self, v: f32) {
        self.y = v - self.h;
    }

    pub fn set_midbottom(&mut self, p: Vec2) {
        self.x = p.x - self.w / 2.0;
        self.y = p.y - self.h;
    }

    /// Change size while keeping the feet in place
    pub fn resize_from_midbottom(&mut self, w: f32, h: f32) {
        let anchor = self.midbottom();
        self.w = w;
        self.h = h;
        self.set_midbottom(anchor);
    }

    /// True if the interiors intersect; shared edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Copy shifted by `(dx, dy)`
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Positive, finite area for geometry loaded from definitions
    pub fn is_valid(&self) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
    }

    /// Whether every edge lies within `half_w` / `half_h` of the origin
    pub fn within(&self, half_w: f32, half_h: f32) -> bool {
        self.left() >= -half_w
            && self.right() <= half_w
            && self.top() >= -half_h
            && self.bottom() <= half_h
    }
}
