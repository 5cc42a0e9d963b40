//! Simulation state and core types
//!
//! Everything the frame driver mutates lives in one owned
//! [`SimulationState`]; input handlers never touch it directly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

use super::camera::Camera;
use crate::config::SimConfig;
use crate::consts::{DEFAULT_BOUNDARY_INSET, LIMB_COUNT};

/// Lifecycle of the bug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BugState {
    /// Created but not yet started
    Idle,
    /// Wandering toward a random target
    Seeking,
    /// Running away from a threat
    Fleeing,
    /// Playing the shrink/spin sequence
    Caught,
    /// Invisible, waiting to reappear
    Respawning,
}

impl BugState {
    pub fn label(&self) -> &'static str {
        match self {
            BugState::Idle => "Idle",
            BugState::Seeking => "Seeking",
            BugState::Fleeing => "Fleeing",
            BugState::Caught => "Caught",
            BugState::Respawning => "Respawning",
        }
    }

    /// Whether steering and physics run in this state
    pub fn is_roaming(&self) -> bool {
        matches!(self, BugState::Seeking | BugState::Fleeing)
    }
}

/// Host viewport, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Margin kept between random targets and the edges
    pub boundary_inset: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_inset(width, height, DEFAULT_BOUNDARY_INSET)
    }

    /// Non-finite or negative sizes are clamped to zero
    pub fn with_inset(width: f32, height: f32, boundary_inset: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
            boundary_inset: sanitize(boundary_inset),
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest world-space corner `(x, y)` when keeping `margin` from the
    /// edges. Collapses to zero on an axis too small for the margin.
    pub fn inset_extents(&self, margin: f32) -> Vec2 {
        (self.half_extents() - Vec2::splat(margin)).max(Vec2::ZERO)
    }

    /// Extents of the rectangle random targets are drawn from
    pub fn target_extents(&self) -> Vec2 {
        self.inset_extents(self.boundary_inset)
    }
}

/// Per-frame drawing request handed to the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    /// Facing angle plus any caught spin (radians)
    pub rotation: f32,
    /// 1.0 normally, shrinking to 0.0 while caught
    pub scale: f32,
    pub limb_phases: [f32; LIMB_COUNT],
    /// Leg swing amplitude (radians)
    pub stride: f32,
    pub antenna_phase: f32,
    pub visible: bool,
}

impl Pose {
    /// Resting leg angle for `limb`; left legs (even) mirror right legs (odd)
    pub fn leg_angle(&self, limb: usize) -> f32 {
        let phase = self.limb_phases.get(limb).copied().unwrap_or(0.0);
        let angle = phase.sin() * self.stride + FRAC_PI_4;
        if limb % 2 == 0 { angle } else { -angle }
    }

    /// Left and right antenna angles
    pub fn antenna_angles(&self) -> (f32, f32) {
        (
            FRAC_PI_4 + self.antenna_phase.sin() * 0.1,
            FRAC_PI_4 + (self.antenna_phase + 0.5).sin() * 0.1,
        )
    }
}

/// The simulated creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    /// World position (origin at viewport centre, +y up)
    pub position: Vec2,
    pub velocity: Vec2,
    /// Smoothed facing angle (radians)
    pub heading: f32,
    /// Point currently being sought
    pub target: Vec2,
    pub state: BugState,
    /// Leg oscillator phases (radians, [0, 2π))
    pub limb_phase: [f32; LIMB_COUNT],
    pub antenna_phase: f32,
    /// Render scale (shrinks while caught)
    pub scale: f32,
    /// Extra rotation accumulated while caught
    pub spin: f32,
    /// Seconds spent in the current timed state
    pub timer: f32,
}

impl Bug {
    pub fn new(position: Vec2, target: Vec2) -> Self {
        // Stagger legs so they don't move in lockstep
        let mut limb_phase = [0.0; LIMB_COUNT];
        for (i, phase) in limb_phase.iter_mut().enumerate() {
            *phase = i as f32 * 0.6;
        }
        Self {
            position,
            velocity: Vec2::ZERO,
            heading: 0.0,
            target,
            state: BugState::Idle,
            limb_phase,
            antenna_phase: 0.0,
            scale: 1.0,
            spin: 0.0,
            timer: 0.0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Snapshot for drawing
    pub fn pose(&self, stride_speed: f32) -> Pose {
        let speed_factor = (self.speed() / stride_speed).min(1.0);
        Pose {
            position: self.position,
            rotation: self.heading + self.spin,
            scale: self.scale,
            limb_phases: self.limb_phase,
            stride: 0.2 + speed_factor * 0.2,
            antenna_phase: self.antenna_phase,
            visible: self.state != BugState::Respawning,
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    StateChanged { from: BugState, to: BugState },
    /// A click or touch was tested against the bug
    CatchAttempt { caught: bool, distance: f32 },
    /// A new wander target was chosen
    Retargeted { target: Vec2 },
    Respawned { position: Vec2 },
}

/// Complete simulation state (single owner, mutated only by `tick`)
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: SimConfig,
    pub viewport: Viewport,
    /// Camera as last pushed to the renderer
    pub camera: Camera,
    pub bug: Bug,
    /// Global pause gate; physics is frozen while false
    pub active: bool,
    /// Host-visible diagnostic overlay flag (no effect on the simulation)
    pub debug_visible: bool,
    /// Last pointer position seen, in world space
    pub last_pointer: Option<Vec2>,
    /// Last scroll value received from the host
    pub scroll_position: f32,
    /// Simulated time (seconds)
    pub time: f64,
    /// Events raised during the most recent tick
    pub events: Vec<SimEvent>,
    rng: Pcg32,
}

impl SimulationState {
    /// Create an `Idle` bug centred in the viewport with a random target
    pub fn new(config: SimConfig, viewport: Viewport, seed: u64) -> Self {
        let mut state = Self {
            camera: Camera::new(viewport.width, viewport.height),
            config,
            viewport,
            bug: Bug::new(Vec2::ZERO, Vec2::ZERO),
            active: true,
            debug_visible: false,
            last_pointer: None,
            scroll_position: 0.0,
            time: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.bug.target = state.random_target();
        state
    }

    /// Uniform random point inside the target rectangle
    pub fn random_target(&mut self) -> Vec2 {
        self.random_point(self.viewport.target_extents())
    }

    /// Uniform random point in the centred box `[-extents, extents]`
    pub fn random_point(&mut self, extents: Vec2) -> Vec2 {
        Vec2::new(
            self.rng.random_range(-1.0f32..=1.0) * extents.x,
            self.rng.random_range(-1.0f32..=1.0) * extents.y,
        )
    }

    /// Bernoulli trial with probability `chance`
    pub fn roll(&mut self, chance: f32) -> bool {
        chance > 0.0 && self.rng.random::<f32>() < chance
    }

    /// Move the bug to a new state, resetting its timer
    pub fn set_state(&mut self, to: BugState) {
        let from = self.bug.state;
        if from == to {
            return;
        }
        log::debug!("Bug {} -> {}", from.label(), to.label());
        self.bug.state = to;
        self.bug.timer = 0.0;
        self.events.push(SimEvent::StateChanged { from, to });
    }

    /// Pick and record a fresh wander target
    pub fn retarget(&mut self) {
        let target = self.random_target();
        self.bug.target = target;
        self.events.push(SimEvent::Retargeted { target });
    }

    /// Pose to draw this frame
    pub fn pose(&self) -> Pose {
        self.bug.pose(self.config.stride_speed)
    }
}
