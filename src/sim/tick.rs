//! Simulation tick
//!
//! One call per host frame: apply the frame's stimuli in arrival order, then
//! advance the state machine and (while roaming) the physics.

use std::f32::consts::TAU;

use glam::Vec2;

use super::boundary;
use super::camera::Projector;
use super::catch::{PointerKind, check_pointer};
use super::state::{Bug, BugState, SimEvent, SimulationState, Viewport};
use super::steering::{flee, reached_target, seek, update_heading};
use crate::config::SimConfig;
use crate::consts::{ANTENNA_RATE, LIMB_BASE_PERIOD_MS, LIMB_PERIOD_STEP_MS, RESPAWN_ATTEMPTS};
use crate::input::InputEvent;

/// Advance the simulation by `dt` seconds after applying `events`
///
/// `projector` is the renderer's live camera: catch tests project through it
/// and camera changes (resize, scroll) are pushed into it.
pub fn tick(state: &mut SimulationState, events: &[InputEvent], dt: f32, projector: &mut dyn Projector) {
    state.events.clear();

    let dt = if dt.is_finite() {
        dt.clamp(0.0, state.config.max_dt)
    } else {
        0.0
    };

    for event in events {
        handle_event(state, *event, projector);
    }

    // Paused: freeze everything, the driver keeps redrawing the last pose
    if !state.active {
        return;
    }

    match state.bug.state {
        BugState::Idle => state.begin(),
        BugState::Caught => advance_caught(state, dt),
        BugState::Respawning => {
            state.bug.timer += dt;
            if state.bug.timer >= state.config.respawn_delay {
                state.respawn();
            }
        }
        BugState::Seeking | BugState::Fleeing => step(state, dt),
    }

    state.time += dt as f64;
}

fn handle_event(state: &mut SimulationState, event: InputEvent, projector: &mut dyn Projector) {
    match event {
        InputEvent::Click(point) => handle_pointer(state, point, PointerKind::Click, projector),
        InputEvent::Touch(point) => handle_pointer(state, point, PointerKind::Touch, projector),
        InputEvent::PointerMove(point) => {
            let world = projector.screen_to_world(point);
            state.last_pointer = Some(world);
            if state.accepts_pointer() && state.roll(state.config.pointer_flee_chance) {
                log::trace!("Pointer move spooked the bug");
                state.flee_from(world);
            }
        }
        InputEvent::KeyToggleDebug => {
            state.debug_visible = !state.debug_visible;
            log::info!("Debug overlay {}", if state.debug_visible { "on" } else { "off" });
        }
        InputEvent::KeyToggleActive => {
            state.active = !state.active;
            log::info!("Bug {}", if state.active { "resumed" } else { "paused" });
        }
        InputEvent::Resize { width, height } => {
            state.resize(width, height);
            projector.sync_camera(&state.camera);
        }
        InputEvent::ScrollPosition(value) => {
            if value == state.scroll_position {
                return;
            }
            state.scroll_position = value;
            state.camera.offset.y = value / 1000.0 * state.config.scroll_parallax;
            projector.sync_camera(&state.camera);
            if state.active
                && state.bug.state == BugState::Seeking
                && state.roll(state.config.scroll_retarget_chance)
            {
                state.retarget();
            }
        }
        InputEvent::Panic(threat) => {
            if !state.panic(threat) {
                log::debug!("Panic ignored in state {}", state.bug.state.label());
            }
        }
        InputEvent::SetActive(active) => {
            if state.active != active {
                state.active = active;
                log::info!("Bug {}", if active { "resumed" } else { "paused" });
            }
        }
    }
}

fn handle_pointer(state: &mut SimulationState, point: Vec2, kind: PointerKind, projector: &mut dyn Projector) {
    if !state.accepts_pointer() {
        return;
    }
    let result = check_pointer(point, kind, state.bug.position, projector, &state.config);
    log::debug!(
        "{:?} at ({:.0}, {:.0}): distance {:.1}, caught {}",
        kind,
        point.x,
        point.y,
        result.distance,
        result.caught
    );
    state.events.push(SimEvent::CatchAttempt {
        caught: result.caught,
        distance: result.distance,
    });

    if result.caught {
        state.catch_bug();
    } else if result.is_near_miss(state.config.alert_radius) {
        let threat = projector.screen_to_world(point);
        state.flee_from(threat);
    }
}

/// One roaming physics step: timers, steering, integration, walls, animation
fn step(state: &mut SimulationState, dt: f32) {
    state.bug.timer += dt;

    if state.bug.state == BugState::Fleeing && state.bug.timer >= state.config.flee_timeout {
        state.set_state(BugState::Seeking);
        state.retarget();
    }

    if reached_target(&state.bug, &state.config) {
        if state.bug.state == BugState::Fleeing {
            state.set_state(BugState::Seeking);
        }
        state.retarget();
    }

    seek(&mut state.bug, &state.config, dt);
    let velocity = state.bug.velocity;
    state.bug.position += velocity * dt;
    boundary::apply(&mut state.bug.position, &mut state.bug.velocity, &state.viewport, &state.config);

    advance_limbs(&mut state.bug, &state.config, dt);
    update_heading(&mut state.bug, &state.config, dt);
}

fn advance_caught(state: &mut SimulationState, dt: f32) {
    let bug = &mut state.bug;
    bug.timer += dt;
    let progress = (bug.timer / state.config.caught_duration).min(1.0);
    bug.scale = 1.0 - progress;
    bug.spin += state.config.spin_rate * dt;

    if bug.timer >= state.config.caught_duration {
        bug.scale = 0.0;
        state.set_state(BugState::Respawning);
    }
}

/// Advance leg and antenna oscillators
///
/// Leg rates scale with speed (1.0 at `stride_speed`, no upper bound); only
/// the stride amplitude in [`Bug::pose`] saturates.
pub fn advance_limbs(bug: &mut Bug, config: &SimConfig, dt: f32) {
    let speed_factor = bug.speed() / config.stride_speed;
    for (i, phase) in bug.limb_phase.iter_mut().enumerate() {
        let rate = 1000.0 / (LIMB_BASE_PERIOD_MS + LIMB_PERIOD_STEP_MS * i as f32);
        *phase = (*phase + rate * speed_factor * dt).rem_euclid(TAU);
    }
    bug.antenna_phase = (bug.antenna_phase + ANTENNA_RATE * dt).rem_euclid(TAU);
}

impl SimulationState {
    /// Start roaming (`Idle -> Seeking`)
    pub fn begin(&mut self) {
        if self.bug.state == BugState::Idle {
            self.set_state(BugState::Seeking);
        }
    }

    /// Scare the bug away from `threat` (world space)
    ///
    /// With no threat it flees from the last known pointer position, or the
    /// middle of the visible viewport if the pointer was never seen. Returns
    /// whether a flee actually started.
    pub fn panic(&mut self, threat: Option<Vec2>) -> bool {
        if !self.accepts_pointer() {
            return false;
        }
        let threat = threat.or(self.last_pointer).unwrap_or(self.camera.offset);
        self.flee_from(threat)
    }

    /// Put the bug back on the page at a fresh random spot
    pub fn respawn(&mut self) {
        let caught_at = self.bug.position;
        let position = self.respawn_point(caught_at);

        let bug = &mut self.bug;
        bug.position = position;
        bug.velocity = Vec2::ZERO;
        bug.scale = 1.0;
        bug.spin = 0.0;

        log::info!("Bug respawned at ({:.0}, {:.0})", position.x, position.y);
        self.events.push(SimEvent::Respawned { position });
        self.retarget();
        self.set_state(BugState::Seeking);
    }

    /// Random point anywhere inside the wall margin, never `caught_at`
    fn respawn_point(&mut self, caught_at: Vec2) -> Vec2 {
        let extents = self.viewport.inset_extents(self.config.edge_margin);
        for _ in 0..RESPAWN_ATTEMPTS {
            let position = self.random_point(extents);
            if position != caught_at {
                return position;
            }
        }

        // Degenerate area: jump to the far side of the widest free axis
        if extents.x > 0.0 || extents.y > 0.0 {
            let away = |c: f32, e: f32| if c > 0.0 { -e } else { e };
            if extents.x >= extents.y {
                Vec2::new(away(caught_at.x, extents.x), caught_at.y)
            } else {
                Vec2::new(caught_at.x, away(caught_at.y, extents.y))
            }
        } else {
            // No room at all; the wall handler pulls it back next step
            caught_at + Vec2::new(self.config.edge_margin.max(1.0), 0.0)
        }
    }

    /// Pointer stimuli only matter while the bug is awake and roaming
    fn accepts_pointer(&self) -> bool {
        self.active && self.bug.state.is_roaming()
    }

    fn flee_from(&mut self, threat: Vec2) -> bool {
        if !flee(&mut self.bug, threat, &self.config) {
            return false;
        }
        self.set_state(BugState::Fleeing);
        // A fresh scare restarts the flee timeout
        self.bug.timer = 0.0;
        true
    }

    fn catch_bug(&mut self) {
        log::info!("Bug caught at ({:.0}, {:.0})", self.bug.position.x, self.bug.position.y);
        self.bug.velocity = Vec2::ZERO;
        self.bug.scale = 1.0;
        self.bug.spin = 0.0;
        self.set_state(BugState::Caught);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::with_inset(width, height, self.viewport.boundary_inset);
        self.camera.width = self.viewport.width;
        self.camera.height = self.viewport.height;
        if self.bug.state != BugState::Fleeing {
            let extents = self.viewport.target_extents();
            self.bug.target = self.bug.target.clamp(-extents, extents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn new_state(seed: u64) -> SimulationState {
        SimulationState::new(SimConfig::default(), Viewport::new(1000.0, 1000.0), seed)
    }

    fn run(state: &mut SimulationState, events: &[InputEvent], dt: f32) {
        let mut camera = state.camera;
        tick(state, events, dt, &mut camera);
    }

    fn roaming_state(seed: u64) -> SimulationState {
        let mut state = new_state(seed);
        state.begin();
        state
    }

    #[test]
    fn test_first_tick_starts_seeking() {
        let mut state = new_state(1);
        assert_eq!(state.bug.state, BugState::Idle);
        run(&mut state, &[], DT);
        assert_eq!(state.bug.state, BugState::Seeking);
        assert!(state.events.contains(&SimEvent::StateChanged {
            from: BugState::Idle,
            to: BugState::Seeking
        }));
    }

    #[test]
    fn test_click_on_bug_catches_in_same_tick() {
        let mut state = roaming_state(2);
        // Bug at world origin projects to (500, 500)
        run(&mut state, &[InputEvent::Click(Vec2::new(510.0, 505.0))], DT);
        assert_eq!(state.bug.state, BugState::Caught);
        assert_eq!(state.bug.velocity, Vec2::ZERO);
        assert!(state.events.iter().any(|e| matches!(
            e,
            SimEvent::CatchAttempt { caught: true, distance } if (*distance - 11.18).abs() < 0.01
        )));
    }

    #[test]
    fn test_near_miss_makes_bug_flee() {
        let mut state = roaming_state(3);
        run(&mut state, &[InputEvent::Click(Vec2::new(600.0, 600.0))], DT);
        assert_eq!(state.bug.state, BugState::Fleeing);
        // Threat is below-right on screen, so the bug runs up-left in world space
        assert!(state.bug.velocity.x < 0.0);
        assert!(state.bug.velocity.y > 0.0);
    }

    #[test]
    fn test_far_miss_is_ignored() {
        let mut state = roaming_state(4);
        run(&mut state, &[InputEvent::Click(Vec2::new(990.0, 990.0))], DT);
        assert_eq!(state.bug.state, BugState::Seeking);
    }

    #[test]
    fn test_touch_uses_wider_radius() {
        let mut state = roaming_state(5);
        run(&mut state, &[InputEvent::Touch(Vec2::new(545.0, 500.0))], DT);
        assert_eq!(state.bug.state, BugState::Caught);
    }

    #[test]
    fn test_catch_sequence_respawns_somewhere_else() {
        let mut state = roaming_state(6);
        run(&mut state, &[InputEvent::Click(Vec2::new(500.0, 500.0))], DT);
        let caught_at = state.bug.position;

        // Shrink and spin for a second
        for _ in 0..30 {
            run(&mut state, &[], DT);
        }
        assert_eq!(state.bug.state, BugState::Caught);
        assert!(state.bug.scale < 1.0 && state.bug.scale > 0.0);
        assert!(state.bug.spin > 0.0);
        assert_eq!(state.bug.position, caught_at);

        for _ in 0..31 {
            run(&mut state, &[], DT);
        }
        assert_eq!(state.bug.state, BugState::Respawning);
        assert!(!state.pose().visible);

        for _ in 0..61 {
            run(&mut state, &[], DT);
        }
        assert_eq!(state.bug.state, BugState::Seeking);
        assert_ne!(state.bug.position, caught_at);
        assert_eq!(state.bug.scale, 1.0);
        assert!(state.pose().visible);
    }

    #[test]
    fn test_clicks_ignored_while_caught() {
        let mut state = roaming_state(7);
        run(&mut state, &[InputEvent::Click(Vec2::new(500.0, 500.0))], DT);
        run(&mut state, &[InputEvent::Click(Vec2::new(500.0, 500.0))], DT);
        assert_eq!(state.bug.state, BugState::Caught);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pause_freezes_physics() {
        let mut state = roaming_state(8);
        for _ in 0..20 {
            run(&mut state, &[], DT);
        }
        run(&mut state, &[InputEvent::KeyToggleActive], DT);
        assert!(!state.active);
        let position = state.bug.position;
        let velocity = state.bug.velocity;

        for _ in 0..20 {
            run(&mut state, &[InputEvent::Click(Vec2::new(500.0, 500.0))], DT);
        }
        assert_eq!(state.bug.position, position);
        assert_eq!(state.bug.velocity, velocity);
        assert_eq!(state.bug.state, BugState::Seeking);

        run(&mut state, &[InputEvent::KeyToggleActive], DT);
        assert!(state.active);
        assert_ne!(state.bug.position, position);
    }

    #[test]
    fn test_flee_times_out() {
        let mut state = roaming_state(9);
        assert!(state.panic(Some(Vec2::new(-10.0, 0.0))));
        assert_eq!(state.bug.state, BugState::Fleeing);
        for _ in 0..100 {
            run(&mut state, &[], DT);
        }
        assert_eq!(state.bug.state, BugState::Seeking);
        assert!(state.bug.speed() <= state.config.max_speed + 1e-3);
    }

    #[test]
    fn test_panic_defaults_to_pointer_then_centre() {
        let mut state = roaming_state(10);
        state.bug.position = Vec2::new(100.0, 0.0);
        assert!(state.panic(None));
        assert!(state.bug.velocity.x > 0.0);
        assert!(state.bug.velocity.y.abs() < 1e-3);

        let mut state = roaming_state(10);
        state.bug.position = Vec2::new(100.0, 0.0);
        // Pointer at screen (700, 500) is world (200, 0): flee toward -x
        run(&mut state, &[InputEvent::PointerMove(Vec2::new(700.0, 500.0))], 0.0);
        assert_eq!(state.last_pointer, Some(Vec2::new(200.0, 0.0)));
        state.set_state(BugState::Seeking);
        assert!(state.panic(None));
        assert!(state.bug.velocity.x < 0.0);
    }

    #[test]
    fn test_panic_on_top_of_bug_is_skipped() {
        let mut state = roaming_state(11);
        assert!(!state.panic(Some(state.bug.position)));
        assert_eq!(state.bug.state, BugState::Seeking);
    }

    #[test]
    fn test_scroll_moves_camera() {
        let mut state = roaming_state(12);
        let mut camera = state.camera;
        tick(&mut state, &[InputEvent::ScrollPosition(2000.0)], DT, &mut camera);
        assert_eq!(state.scroll_position, 2000.0);
        assert!((state.camera.offset.y - 40.0).abs() < 1e-4);
        // The projector received the new camera
        assert_eq!(camera, state.camera);
    }

    #[test]
    fn test_resize_updates_viewport_and_camera() {
        let mut state = roaming_state(13);
        let mut camera = state.camera;
        state.bug.target = Vec2::new(390.0, -390.0);
        let resize = InputEvent::Resize {
            width: 400.0,
            height: 300.0,
        };
        tick(&mut state, &[resize], 0.0, &mut camera);
        assert_eq!(state.viewport.width, 400.0);
        assert_eq!(camera.width, 400.0);
        assert_eq!(camera.height, 300.0);
        assert_eq!(state.bug.target, Vec2::new(100.0, -50.0));
    }

    #[test]
    fn test_debug_toggle_does_not_affect_motion() {
        let mut a = roaming_state(14);
        let mut b = roaming_state(14);
        for i in 0..30 {
            let events: &[InputEvent] = if i == 5 { &[InputEvent::KeyToggleDebug] } else { &[] };
            run(&mut a, events, DT);
            run(&mut b, &[], DT);
        }
        assert!(a.debug_visible);
        assert!(!b.debug_visible);
        assert_eq!(a.bug.position, b.bug.position);
    }

    #[test]
    fn test_limbs_advance_with_speed() {
        let config = SimConfig::default();
        let mut bug = Bug::new(Vec2::ZERO, Vec2::ZERO);
        let still = bug.limb_phase;
        advance_limbs(&mut bug, &config, 0.1);
        assert_eq!(bug.limb_phase, still);
        assert!(bug.antenna_phase > 0.0);

        bug.velocity = Vec2::new(100.0, 0.0);
        for _ in 0..100 {
            advance_limbs(&mut bug, &config, 0.1);
        }
        for phase in bug.limb_phase {
            assert!((0.0..TAU).contains(&phase));
        }
        assert_ne!(bug.limb_phase, still);
    }

    #[test]
    fn test_faster_bug_moves_legs_faster() {
        let config = SimConfig::default();
        let mut walking = Bug::new(Vec2::ZERO, Vec2::ZERO);
        walking.velocity = Vec2::new(60.0, 0.0);
        let mut running = Bug::new(Vec2::ZERO, Vec2::ZERO);
        running.velocity = Vec2::new(200.0, 0.0);

        advance_limbs(&mut walking, &config, 0.01);
        advance_limbs(&mut running, &config, 0.01);
        // Leg 0: 12.5 rad/s at stride speed, 1.2x and 4x that here
        assert!((walking.limb_phase[0] - 0.15).abs() < 1e-4);
        assert!((running.limb_phase[0] - 0.5).abs() < 1e-4);
        // Stride amplitude still saturates
        assert_eq!(walking.pose(config.stride_speed).stride, running.pose(config.stride_speed).stride);
    }

    fn roaming_with(config: SimConfig, seed: u64) -> SimulationState {
        let mut state = SimulationState::new(config, Viewport::new(1000.0, 1000.0), seed);
        state.begin();
        // Far target, and dt 0 below keeps the bug in place, so arrival never retargets
        state.bug.target = Vec2::new(300.0, 300.0);
        state
    }

    const FAR_POINTER: Vec2 = Vec2::new(100.0, 100.0);

    #[test]
    fn test_pointer_moves_occasionally_spook_the_bug() {
        let mut state = roaming_with(SimConfig::default(), 21);
        let mut flees = 0;
        for _ in 0..2000 {
            run(&mut state, &[InputEvent::PointerMove(FAR_POINTER)], 0.0);
            if state.bug.state == BugState::Fleeing {
                flees += 1;
                state.set_state(BugState::Seeking);
            }
        }
        // 3% of 2000
        assert!((20..=120).contains(&flees), "{flees} flees");
    }

    #[test]
    fn test_pointer_flee_chance_extremes() {
        let never = SimConfig {
            pointer_flee_chance: 0.0,
            ..Default::default()
        };
        let mut state = roaming_with(never, 22);
        for _ in 0..500 {
            run(&mut state, &[InputEvent::PointerMove(FAR_POINTER)], 0.0);
        }
        assert_eq!(state.bug.state, BugState::Seeking);

        let always = SimConfig {
            pointer_flee_chance: 1.0,
            ..Default::default()
        };
        let mut state = roaming_with(always, 22);
        run(&mut state, &[InputEvent::PointerMove(FAR_POINTER)], 0.0);
        assert_eq!(state.bug.state, BugState::Fleeing);
    }

    #[test]
    fn test_pointer_moves_ignored_while_paused_or_caught() {
        let always = SimConfig {
            pointer_flee_chance: 1.0,
            ..Default::default()
        };
        let mut state = roaming_with(always.clone(), 23);
        run(&mut state, &[InputEvent::SetActive(false)], 0.0);
        for _ in 0..50 {
            run(&mut state, &[InputEvent::PointerMove(FAR_POINTER)], 0.0);
        }
        assert_eq!(state.bug.state, BugState::Seeking);

        let mut state = roaming_with(always, 23);
        run(&mut state, &[InputEvent::Click(Vec2::new(500.0, 500.0))], 0.0);
        for _ in 0..50 {
            run(&mut state, &[InputEvent::PointerMove(FAR_POINTER)], 0.0);
        }
        assert_eq!(state.bug.state, BugState::Caught);
    }

    fn retargeted(state: &SimulationState) -> bool {
        state.events.iter().any(|e| matches!(e, SimEvent::Retargeted { .. }))
    }

    #[test]
    fn test_scroll_occasionally_retargets() {
        let mut state = roaming_with(SimConfig::default(), 24);
        let mut retargets = 0;
        for i in 1..=2000 {
            run(&mut state, &[InputEvent::ScrollPosition(i as f32)], 0.0);
            if retargeted(&state) {
                retargets += 1;
            }
        }
        // 5% of 2000
        assert!((40..=180).contains(&retargets), "{retargets} retargets");

        // An unchanged value is not a scroll
        let always = SimConfig {
            scroll_retarget_chance: 1.0,
            ..Default::default()
        };
        let mut state = roaming_with(always, 24);
        run(&mut state, &[InputEvent::ScrollPosition(10.0)], 0.0);
        assert!(retargeted(&state));
        run(&mut state, &[InputEvent::ScrollPosition(10.0)], 0.0);
        assert!(!retargeted(&state));

        let never = SimConfig {
            scroll_retarget_chance: 0.0,
            ..Default::default()
        };
        let mut state = roaming_with(never, 24);
        for i in 1..=500 {
            run(&mut state, &[InputEvent::ScrollPosition(i as f32)], 0.0);
            assert!(!retargeted(&state));
        }
    }

    #[test]
    fn test_scroll_does_not_retarget_while_paused_or_caught() {
        let always = SimConfig {
            scroll_retarget_chance: 1.0,
            ..Default::default()
        };
        let mut state = roaming_with(always.clone(), 25);
        run(&mut state, &[InputEvent::SetActive(false)], 0.0);
        let target = state.bug.target;
        for i in 1..=50 {
            run(&mut state, &[InputEvent::ScrollPosition(i as f32 * 100.0)], 0.0);
            assert!(!retargeted(&state));
        }
        assert_eq!(state.bug.target, target);
        // The view still follows the page
        assert!((state.camera.offset.y - 100.0).abs() < 1e-4);

        let mut state = roaming_with(always, 25);
        run(&mut state, &[InputEvent::Click(Vec2::new(500.0, 500.0))], 0.0);
        for i in 1..=50 {
            run(&mut state, &[InputEvent::ScrollPosition(i as f32 * 100.0)], 0.0);
            assert!(!retargeted(&state));
        }
    }

    #[test]
    fn test_small_viewport_respawns_away_from_catch() {
        let mut state = SimulationState::new(SimConfig::default(), Viewport::new(180.0, 180.0), 26);
        state.begin();
        assert_eq!(state.viewport.target_extents(), Vec2::ZERO);
        run(&mut state, &[InputEvent::Click(Vec2::new(90.0, 90.0))], DT);
        assert_eq!(state.bug.state, BugState::Caught);
        let caught_at = state.bug.position;

        for _ in 0..200 {
            run(&mut state, &[], DT);
            if state.events.iter().any(|e| matches!(e, SimEvent::Respawned { .. })) {
                break;
            }
        }
        assert_eq!(state.bug.state, BugState::Seeking);
        assert_ne!(state.bug.position, caught_at);
        let bound = state.viewport.inset_extents(state.config.edge_margin);
        assert!(state.bug.position.abs().cmple(bound).all());
    }

    #[test]
    fn test_respawn_without_room_still_moves() {
        let mut state = SimulationState::new(SimConfig::default(), Viewport::new(30.0, 30.0), 27);
        state.begin();
        let caught_at = state.bug.position;
        state.respawn();
        assert_ne!(state.bug.position, caught_at);
        assert_eq!(state.bug.state, BugState::Seeking);
    }

    #[test]
    fn test_oversized_dt_is_clamped() {
        let mut a = roaming_state(15);
        let mut b = roaming_state(15);
        run(&mut a, &[], 5.0);
        run(&mut b, &[], 0.1);
        assert_eq!(a.bug.position, b.bug.position);
        assert!((a.time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = roaming_state(99);
        let mut b = roaming_state(99);
        for _ in 0..300 {
            run(&mut a, &[InputEvent::PointerMove(Vec2::new(100.0, 100.0))], DT);
            run(&mut b, &[InputEvent::PointerMove(Vec2::new(100.0, 100.0))], DT);
        }
        assert_eq!(a.bug.position, b.bug.position);
        assert_eq!(a.bug.state, b.bug.state);
    }

    fn event_strategy() -> impl Strategy<Value = InputEvent> {
        prop_oneof![
            (0.0f32..1000.0, 0.0f32..1000.0).prop_map(|(x, y)| InputEvent::Click(Vec2::new(x, y))),
            (0.0f32..1000.0, 0.0f32..1000.0).prop_map(|(x, y)| InputEvent::Touch(Vec2::new(x, y))),
            (0.0f32..1000.0, 0.0f32..1000.0)
                .prop_map(|(x, y)| InputEvent::PointerMove(Vec2::new(x, y))),
            (0.0f32..5000.0).prop_map(InputEvent::ScrollPosition),
        ]
    }

    proptest! {
        #[test]
        fn test_speed_and_position_stay_bounded(
            seed in any::<u64>(),
            frames in prop::collection::vec(
                (prop::collection::vec(event_strategy(), 0..3), 0.0f32..0.25),
                1..200,
            ),
        ) {
            let mut state = roaming_state(seed);
            let bound = state.viewport.inset_extents(state.config.edge_margin);
            for (events, dt) in frames {
                run(&mut state, &events, dt);
                let cap = state.config.speed_cap(state.bug.state == BugState::Fleeing);
                prop_assert!(state.bug.speed() <= cap + 1e-3, "speed {} over cap {}", state.bug.speed(), cap);
                prop_assert!(state.bug.position.x.abs() <= bound.x + 1e-3);
                prop_assert!(state.bug.position.y.abs() <= bound.y + 1e-3);
                prop_assert!(state.bug.heading.is_finite());
            }
        }
    }
}
