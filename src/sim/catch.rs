//! Catch detection
//!
//! Pointer hits are judged in screen space: the bug's world position is
//! projected through whatever camera the renderer currently has, so scroll
//! parallax and resizes are always accounted for.

use glam::Vec2;

use super::camera::Projector;
use crate::config::SimConfig;

/// How the pointer touched the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse or pen: precise
    Click,
    /// Finger: imprecise, gets a larger radius
    Touch,
}

/// Outcome of a catch test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchTest {
    pub caught: bool,
    /// Screen-space distance between pointer and bug
    pub distance: f32,
}

impl CatchTest {
    /// A miss close enough to spook the bug
    pub fn is_near_miss(&self, alert_radius: f32) -> bool {
        !self.caught && self.distance < alert_radius
    }
}

/// Catch radius for the given pointer kind
pub fn catch_radius(kind: PointerKind, config: &SimConfig) -> f32 {
    match kind {
        PointerKind::Click => config.click_catch_radius,
        PointerKind::Touch => config.touch_catch_radius,
    }
}

/// Test whether `pointer` (screen pixels) lands within `radius` of the bug
pub fn hit_test(pointer: Vec2, bug_screen: Vec2, radius: f32) -> CatchTest {
    let distance = pointer.distance(bug_screen);
    CatchTest {
        caught: distance < radius,
        distance,
    }
}

/// Project the bug and test a pointer against it
pub fn check_pointer(
    pointer: Vec2,
    kind: PointerKind,
    bug_world: Vec2,
    projector: &dyn Projector,
    config: &SimConfig,
) -> CatchTest {
    // Project fresh every time: the camera may have moved since last frame
    let bug_screen = projector.project_to_screen(bug_world);
    hit_test(pointer, bug_screen, catch_radius(kind, config))
}
