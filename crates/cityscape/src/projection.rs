//! Isometric projection from grid space to screen space.
//!
//! Grid `x` runs down-right on screen, grid `y` runs down-left, and the
//! elevation `z` is subtracted straight from screen Y without foreshortening.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed affine grid -> screen transform for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    /// Screen X advance per grid unit.
    pub tile_w: f32,
    /// Screen Y advance per grid unit.
    pub tile_h: f32,
    /// Screen position of grid (0, 0, 0).
    pub origin: Vec2,
}

impl Projector {
    pub fn new(tile_w: f32, tile_h: f32, origin: Vec2) -> Self {
        Self {
            tile_w,
            tile_h,
            origin,
        }
    }

    /// `sx = ox + (gx - gy) * tile_w`, `sy = oy + (gx + gy) * tile_h - gz`.
    pub fn project(&self, gx: f32, gy: f32, gz: f32) -> Vec2 {
        Vec2::new(
            self.origin.x + (gx - gy) * self.tile_w,
            self.origin.y + (gx + gy) * self.tile_h - gz,
        )
    }

    pub fn project_point(&self, p: Vec3) -> Vec2 {
        self.project(p.x, p.y, p.z)
    }

    /// Ground-level projection.
    pub fn project_ground(&self, gx: f32, gy: f32) -> Vec2 {
        self.project(gx, gy, 0.0)
    }
}
