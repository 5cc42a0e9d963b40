//! Headless backend
//!
//! Keeps the camera and records every pose and draw call instead of touching
//! a GPU. Used by the native binary and by tests.

use glam::Vec2;

use super::shapes;
use super::{BackendError, RenderBackend};
use crate::sim::{Camera, Pose, Projector};

#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    camera: Camera,
    has_geometry: bool,
    pose: Option<Pose>,
    /// Poses drawn so far, in order
    pub rendered: Vec<Pose>,
    /// Triangle vertices emitted by the last draw
    pub last_vertex_count: usize,
    /// `render` calls that were rejected
    pub failed_renders: usize,
    pub disposals: usize,
    /// Keep at most this many poses in `rendered`
    pub history_limit: usize,
}

impl HeadlessBackend {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            camera: Camera::new(width, height),
            has_geometry: false,
            pose: None,
            rendered: Vec::new(),
            last_vertex_count: 0,
            failed_renders: 0,
            disposals: 0,
            history_limit: 10_000,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn has_geometry(&self) -> bool {
        self.has_geometry
    }

    pub fn last_pose(&self) -> Option<&Pose> {
        self.rendered.last()
    }
}

impl Projector for HeadlessBackend {
    fn sync_camera(&mut self, camera: &Camera) {
        self.camera = *camera;
    }

    fn project_to_screen(&self, world: Vec2) -> Vec2 {
        self.camera.world_to_screen(world)
    }

    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.camera.screen_to_world(screen)
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_entity_geometry(&mut self) -> Result<(), BackendError> {
        self.has_geometry = true;
        Ok(())
    }

    fn set_pose(&mut self, pose: &Pose) -> Result<(), BackendError> {
        if !self.has_geometry {
            return Err(BackendError::MissingGeometry);
        }
        self.pose = Some(*pose);
        Ok(())
    }

    fn render(&mut self) -> Result<(), BackendError> {
        let pose = match (self.has_geometry, self.pose) {
            (true, Some(pose)) => pose,
            _ => {
                self.failed_renders += 1;
                return Err(BackendError::MissingGeometry);
            }
        };
        self.last_vertex_count = shapes::bug(&pose, &self.camera).len();
        if self.rendered.len() >= self.history_limit {
            self.rendered.remove(0);
        }
        self.rendered.push(pose);
        Ok(())
    }

    fn dispose_geometry(&mut self) {
        if self.has_geometry {
            self.disposals += 1;
        }
        self.has_geometry = false;
        self.pose = None;
    }
}
