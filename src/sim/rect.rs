//! Axis-aligned rectangle and the overlap test every mover relies on
//!
//! The overlap test is the hot path of the simulation: every entity checks
//! itself against the wall list each tick, so it stays a branch-free pure
//! function over plain floats.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Open-interval overlap test: touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same rectangle translated to a new top-left corner
    #[inline]
    pub fn at(&self, x: f32, y: f32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    /// True if any rectangle in `walls` overlaps this one
    #[inline]
    pub fn hits_any(&self, walls: &[super::grid::Wall]) -> bool {
        walls.iter().any(|w| self.overlaps(&w.rect))
    }

    /// Clamp the top-left corner so the rectangle stays inside the world
    pub fn clamp_to_world(&mut self, world_width: f32, world_height: f32) {
        self.x = self.x.min(world_width - self.width).max(0.0);
        self.y = self.y.min(world_height - self.height).max(0.0);
    }

    /// True if `point` lies inside (closed on the low edge, open on the high)
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
