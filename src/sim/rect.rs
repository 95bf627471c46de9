//! Axis-aligned bounding boxes
//!
//! Screen space: origin top-left, y grows downward. Positions are kept as
//! `f32` for sub-pixel motion; the render box truncates to whole pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Whole-pixel box handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Box whose bottom edge is centred on `point`
    pub fn from_midbottom(point: Vec2, size: Vec2) -> Self {
        Self::new(Vec2::new(point.x - size.x / 2.0, point.y - size.y), size)
    }

    /// Box whose top edge is centred on `point`
    pub fn from_midtop(point: Vec2, size: Vec2) -> Self {
        Self::new(Vec2::new(point.x - size.x / 2.0, point.y), size)
    }

    /// Box centred on `point`
    pub fn from_center(point: Vec2, size: Vec2) -> Self {
        Self::new(point - size / 2.0, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.top())
    }

    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.bottom())
    }

    /// Strict overlap: boxes that only touch along an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Keep the whole box inside `[0, bounds]`
    pub fn clamp_to(&mut self, bounds: Vec2) {
        let max = (bounds - self.size).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    /// Truncated whole-pixel box
    pub fn to_pixels(&self) -> PixelRect {
        PixelRect {
            x: self.pos.x as i32,
            y: self.pos.y as i32,
            w: self.size.x as i32,
            h: self.size.y as i32,
        }
    }
}
