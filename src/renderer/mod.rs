//! Rendering backends
//!
//! The simulation hands one [`Pose`] per frame to a [`RenderBackend`]. The
//! backend also owns the live camera, so it doubles as the [`Projector`]
//! catch tests project through.

pub mod headless;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

use thiserror::Error;

use crate::sim::{Pose, Projector};

pub use headless::HeadlessBackend;
pub use pipeline::WgpuBackend;

/// Problems a backend can report; the frame driver logs and skips them
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("entity geometry has not been created (or was disposed)")]
    MissingGeometry,
    #[error("render surface lost")]
    SurfaceLost,
    #[error("surface error: {0}")]
    Surface(String),
    #[error("no usable GPU adapter: {0}")]
    Adapter(String),
    #[error("GPU device request failed: {0}")]
    Device(String),
}

/// Drawing surface for the bug
pub trait RenderBackend: Projector {
    /// Allocate GPU (or other) resources for the bug model
    fn create_entity_geometry(&mut self) -> Result<(), BackendError>;
    /// Pose to draw on the next `render`
    fn set_pose(&mut self, pose: &Pose) -> Result<(), BackendError>;
    /// Draw the latest pose
    fn render(&mut self) -> Result<(), BackendError>;
    /// Release the bug model; safe to call more than once
    fn dispose_geometry(&mut self);
}
