//! Deterministic simulation module
//!
//! All bug behaviour lives here. This module must stay pure and deterministic:
//! - Caller-supplied `dt` only (no clocks)
//! - Seeded RNG only
//! - No rendering or platform dependencies; the camera is reached through
//!   the [`Projector`] trait

pub mod boundary;
pub mod camera;
pub mod catch;
pub mod geometry;
pub mod state;
pub mod steering;
pub mod tick;

pub use boundary::BoundaryHit;
pub use camera::{Camera, Projector};
pub use catch::{CatchTest, PointerKind, check_pointer};
pub use state::{Bug, BugState, Pose, SimEvent, SimulationState, Viewport};
pub use tick::tick;
