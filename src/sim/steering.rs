//! Steering behaviours: seek, arrival check, flee and heading smoothing
//!
//! These functions only touch the [`Bug`]; target selection that needs the
//! RNG or viewport lives on `SimulationState`.

use glam::Vec2;

use super::geometry::{angle_between, angle_of, clamp_length, distance, normalize_angle, safe_normalize};
use super::state::{Bug, BugState};
use crate::config::SimConfig;
use crate::consts::HEADING_MIN_SPEED;

/// Accelerate toward the target, apply drag and cap the speed
pub fn seek(bug: &mut Bug, config: &SimConfig, dt: f32) {
    let dir = safe_normalize(bug.target - bug.position);
    bug.velocity += dir * config.accel * dt;
    bug.velocity *= config.damping;
    let cap = config.speed_cap(bug.state == BugState::Fleeing);
    bug.velocity = clamp_length(bug.velocity, cap);
}

/// Whether the bug is close enough to its target to pick another
#[inline]
pub fn reached_target(bug: &Bug, config: &SimConfig) -> bool {
    distance(bug.position, bug.target) < config.arrival_radius
}

/// Bolt directly away from `threat` (world space)
///
/// Sets velocity to full flee speed and puts the target far along the
/// escape direction. Returns false, leaving the bug untouched, when the
/// threat sits exactly on the bug and no direction can be derived.
pub fn flee(bug: &mut Bug, threat: Vec2, config: &SimConfig) -> bool {
    let dir = safe_normalize(bug.position - threat);
    if dir == Vec2::ZERO {
        return false;
    }
    bug.velocity = dir * config.flee_speed;
    bug.target = bug.position + dir * config.flee_distance;
    true
}

/// Turn the heading toward the velocity direction without snapping
///
/// The step is a fraction `min(1, turn_rate * dt)` of the remaining arc and
/// never more than `turn_rate * dt` radians.
pub fn update_heading(bug: &mut Bug, config: &SimConfig, dt: f32) {
    if bug.velocity.x.abs() <= HEADING_MIN_SPEED && bug.velocity.y.abs() <= HEADING_MIN_SPEED {
        return;
    }
    let desired = angle_of(bug.velocity);
    let diff = angle_between(bug.heading, desired);
    let max_step = config.turn_rate * dt;
    let step = (diff * max_step.min(1.0)).clamp(-max_step, max_step);
    bug.heading = normalize_angle(bug.heading + step);
}
