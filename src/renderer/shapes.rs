//! Shape generation for the bug model
//!
//! The model is built in a local frame (pixels, +x forward, +y to the bug's
//! left), placed with the frame's [`Pose`] and mapped to NDC through the
//! camera.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_4, TAU};

use super::vertex::{Vertex, colors};
use crate::consts::LIMB_COUNT;
use crate::sim::{Camera, Pose};

/// Overall model scale
pub const MODEL_SCALE: f32 = 0.9;
/// Upper bound on vertices emitted by [`bug`]
pub const MAX_BUG_VERTICES: usize = 512;

const BODY_RADIUS: f32 = 5.0;
const BODY_HALF_LENGTH: f32 = 5.0;
const HEAD_RADIUS: f32 = 4.0;
const HEAD_OFFSET: f32 = 7.0;
const EYE_RADIUS: f32 = 1.5;
const EYE_OFFSET: Vec2 = Vec2::new(9.0, 2.5);
const LEG_LENGTH: f32 = 12.0;
const LEG_WIDTH: f32 = 0.8;
const LEG_SPACING: f32 = 5.0;
const ANTENNA_LENGTH: f32 = 8.0;
const ANTENNA_WIDTH: f32 = 0.4;
const ANTENNA_ROOT: Vec2 = Vec2::new(9.0, 2.0);

const BODY_SEGMENTS: u32 = 12;
const HEAD_SEGMENTS: u32 = 12;
const EYE_SEGMENTS: u32 = 8;

/// Local model space → NDC
#[derive(Debug, Clone, Copy)]
pub struct Transform<'a> {
    pub position: Vec2,
    pub rotation: Vec2,
    pub scale: f32,
    pub camera: &'a Camera,
}

impl<'a> Transform<'a> {
    pub fn new(pose: &Pose, camera: &'a Camera) -> Self {
        Self {
            position: pose.position,
            rotation: Vec2::from_angle(pose.rotation),
            scale: pose.scale * MODEL_SCALE,
            camera,
        }
    }

    pub fn apply(&self, local: Vec2) -> Vec2 {
        let world = self.position + self.rotation.rotate(local * self.scale);
        self.camera.world_to_ndc(world)
    }
}

/// All triangles for one bug pose. Empty when the pose is hidden or shrunk away.
pub fn bug(pose: &Pose, camera: &Camera) -> Vec<Vertex> {
    if !pose.visible || pose.scale <= 0.0 {
        return Vec::new();
    }
    let xf = Transform::new(pose, camera);
    let mut vertices = Vec::with_capacity(MAX_BUG_VERTICES);

    // Legs and antennae first so the body covers their roots
    for limb in 0..LIMB_COUNT {
        let pair = (limb / 2) as f32;
        let side = if limb % 2 == 0 { 1.0 } else { -1.0 };
        let root = Vec2::new(pair * LEG_SPACING - LEG_SPACING, side * BODY_RADIUS * 0.6);
        let angle = pose.leg_angle(limb) + side * FRAC_PI_4;
        let tip = root + Vec2::from_angle(angle) * LEG_LENGTH;
        vertices.extend(segment(root, tip, LEG_WIDTH, colors::LIMB, &xf));
    }

    let (left, right) = pose.antenna_angles();
    for (side, angle) in [(1.0, left), (-1.0, -right)] {
        let root = Vec2::new(ANTENNA_ROOT.x, side * ANTENNA_ROOT.y);
        let tip = root + Vec2::from_angle(angle) * ANTENNA_LENGTH;
        vertices.extend(segment(root, tip, ANTENNA_WIDTH, colors::LIMB, &xf));
    }

    vertices.extend(capsule(BODY_HALF_LENGTH, BODY_RADIUS, colors::BODY, &xf));
    vertices.extend(circle(Vec2::new(HEAD_OFFSET, 0.0), HEAD_RADIUS, colors::HEAD, HEAD_SEGMENTS, &xf));
    for side in [1.0, -1.0] {
        let center = Vec2::new(EYE_OFFSET.x, side * EYE_OFFSET.y);
        vertices.extend(circle(center, EYE_RADIUS, colors::EYE, EYE_SEGMENTS, &xf));
    }

    vertices
}

/// Filled circle as a triangle fan
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32, xf: &Transform) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let c = xf.apply(center);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let p1 = xf.apply(center + Vec2::from_angle(theta1) * radius);
        let p2 = xf.apply(center + Vec2::from_angle(theta2) * radius);

        vertices.push(Vertex::new(c.x, c.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Thick line from `a` to `b` as a quad
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4], xf: &Transform) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = dir.perp() * (width / 2.0);
    quad([a + perp, a - perp, b - perp, b + perp], color, xf)
}

/// Capsule along the local x axis: a box with round caps
pub fn capsule(half_length: f32, radius: f32, color: [f32; 4], xf: &Transform) -> Vec<Vertex> {
    let mut vertices = quad(
        [
            Vec2::new(-half_length, radius),
            Vec2::new(-half_length, -radius),
            Vec2::new(half_length, -radius),
            Vec2::new(half_length, radius),
        ],
        color,
        xf,
    );
    vertices.extend(circle(Vec2::new(-half_length, 0.0), radius, color, BODY_SEGMENTS, xf));
    vertices.extend(circle(Vec2::new(half_length, 0.0), radius, color, BODY_SEGMENTS, xf));
    vertices
}

fn quad(corners: [Vec2; 4], color: [f32; 4], xf: &Transform) -> Vec<Vertex> {
    let [p0, p1, p2, p3] = corners.map(|c| xf.apply(c));
    vec![
        Vertex::new(p0.x, p0.y, color),
        Vertex::new(p1.x, p1.y, color),
        Vertex::new(p2.x, p2.y, color),
        Vertex::new(p2.x, p2.y, color),
        Vertex::new(p3.x, p3.y, color),
        Vertex::new(p0.x, p0.y, color),
    ]
}
