//! Viewport edge handling
//!
//! A wall hit reverses and attenuates the velocity on the hit axis and bleeds
//! some speed off the other axis, so bounces read as glancing rather than
//! mirror-perfect.

use glam::Vec2;

use super::state::Viewport;
use crate::config::SimConfig;

/// Which axes were clamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryHit {
    pub x: bool,
    pub y: bool,
}

impl BoundaryHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Clamp `position` inside the viewport margin and bounce `velocity`
pub fn apply(position: &mut Vec2, velocity: &mut Vec2, viewport: &Viewport, config: &SimConfig) -> BoundaryHit {
    let bound = viewport.inset_extents(config.edge_margin);
    let mut hit = BoundaryHit::default();

    if position.x < -bound.x || position.x > bound.x {
        position.x = position.x.clamp(-bound.x, bound.x);
        velocity.x *= -config.bounce_restitution;
        velocity.y *= config.bounce_tangent_damping;
        hit.x = true;
    }

    if position.y < -bound.y || position.y > bound.y {
        position.y = position.y.clamp(-bound.y, bound.y);
        velocity.y *= -config.bounce_restitution;
        velocity.x *= config.bounce_tangent_damping;
        hit.y = true;
    }

    // NaN from a corrupted frame would otherwise stick forever
    if !position.is_finite() {
        *position = Vec2::ZERO;
        *velocity = Vec2::ZERO;
    }

    hit
}
