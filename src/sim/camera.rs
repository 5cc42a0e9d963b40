//! Orthographic camera and the world ↔ screen mapping
//!
//! World space is centred on the viewport with +y up; screen space is CSS
//! pixels from the top-left corner with +y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anything that can map world positions to screen pixels.
///
/// The rendering backend owns the authoritative camera; the simulation pushes
/// camera changes through `sync_camera` (last write wins) and asks for a
/// fresh projection on every catch test.
pub trait Projector {
    /// Replace the active camera
    fn sync_camera(&mut self, camera: &Camera);
    /// World position → screen pixels
    fn project_to_screen(&self, world: Vec2) -> Vec2;
    /// Screen pixels → world position
    fn screen_to_world(&self, screen: Vec2) -> Vec2;
}

/// 2D orthographic camera covering the whole viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Viewport width in CSS pixels
    pub width: f32,
    /// Viewport height in CSS pixels
    pub height: f32,
    /// World point shown at the viewport centre
    pub offset: Vec2,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let rel = world - self.offset;
        Vec2::new(rel.x + self.width / 2.0, self.height / 2.0 - rel.y)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x - self.width / 2.0,
            self.height / 2.0 - screen.y,
        ) + self.offset
    }

    /// World position → normalized device coordinates ([-1, 1] on both axes)
    pub fn world_to_ndc(&self, world: Vec2) -> Vec2 {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0).max(Vec2::ONE);
        (world - self.offset) / half
    }
}

impl Projector for Camera {
    fn sync_camera(&mut self, camera: &Camera) {
        *self = *camera;
    }

    fn project_to_screen(&self, world: Vec2) -> Vec2 {
        self.world_to_screen(world)
    }

    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Camera::screen_to_world(self, screen)
    }
}
