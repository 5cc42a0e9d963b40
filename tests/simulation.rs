//! End-to-end runs through the frame driver and the headless backend

use glam::Vec2;
use roaming_bug::renderer::HeadlessBackend;
use roaming_bug::sim::{BugState, SimEvent};
use roaming_bug::{FrameRequest, HostEvent, HostEventKind, InputEvent, Modifiers, SimConfig, Simulation, Viewport};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn mount(seed: u64) -> Simulation<HeadlessBackend> {
    Simulation::mount(
        HeadlessBackend::new(1000.0, 800.0),
        Viewport::new(1000.0, 800.0),
        SimConfig::default(),
        seed,
    )
    .expect("mount")
}

fn bug_on_screen(sim: &Simulation<HeadlessBackend>) -> Vec2 {
    let backend = sim.backend().expect("mounted");
    backend.camera().world_to_screen(sim.state().bug.position)
}

fn run_frames(sim: &mut Simulation<HeadlessBackend>, start: u32, count: u32) -> u32 {
    for frame in start..start + count {
        assert_eq!(sim.frame(frame as f64 * FRAME_MS), FrameRequest::Continue);
    }
    start + count
}

#[test]
fn test_full_catch_and_respawn_cycle() {
    let mut sim = mount(11);
    let mut frame = run_frames(&mut sim, 0, 90);
    assert_eq!(sim.state().bug.state, BugState::Seeking);

    let screen = bug_on_screen(&sim);
    sim.handle_host_event(&HostEvent::at(HostEventKind::Click, screen.x + 3.0, screen.y));
    frame = run_frames(&mut sim, frame, 1);
    assert_eq!(sim.state().bug.state, BugState::Caught);
    let caught_at = sim.state().bug.position;

    // Caught (1s) then respawning (1s)
    frame = run_frames(&mut sim, frame, 70);
    assert_eq!(sim.state().bug.state, BugState::Respawning);
    assert!(!sim.backend().and_then(|b| b.last_pose()).expect("pose").visible);

    run_frames(&mut sim, frame, 70);
    assert_eq!(sim.state().bug.state, BugState::Seeking);
    assert_ne!(sim.state().bug.position, caught_at);
    assert!(sim.backend().and_then(|b| b.last_pose()).expect("pose").visible);
}

#[test]
fn test_near_miss_then_calm_down() {
    let mut sim = mount(12);
    let mut frame = run_frames(&mut sim, 0, 30);
    let screen = bug_on_screen(&sim);
    sim.handle_host_event(&HostEvent::at(HostEventKind::Click, screen.x + 100.0, screen.y + 100.0));
    frame = run_frames(&mut sim, frame, 1);
    assert_eq!(sim.state().bug.state, BugState::Fleeing);
    assert!(sim.state().bug.speed() > sim.state().config.max_speed);

    run_frames(&mut sim, frame, 120);
    assert_eq!(sim.state().bug.state, BugState::Seeking);
    assert!(sim.state().bug.speed() <= sim.state().config.max_speed + 1e-3);
}

#[test]
fn test_keyboard_toggles() {
    let mut sim = mount(13);
    let ctrl = Modifiers {
        ctrl: true,
        ..Default::default()
    };
    sim.handle_host_event(&HostEvent::key("B", ctrl));
    sim.handle_host_event(&HostEvent::key("Escape", Modifiers::default()));
    run_frames(&mut sim, 0, 1);
    assert!(sim.is_debug_visible());
    assert!(!sim.state().active);
    let lines = sim.debug_snapshot().overlay_lines();
    assert_eq!(lines[1], "Active: No (Esc to resume)");

    let position = sim.state().bug.position;
    run_frames(&mut sim, 1, 60);
    assert_eq!(sim.state().bug.position, position);
    assert_eq!(sim.backend().map(|b| b.rendered.len()), Some(61));

    sim.set_active(true);
    run_frames(&mut sim, 61, 10);
    assert_ne!(sim.state().bug.position, position);
}

#[test]
fn test_scroll_shifts_projection() {
    let mut sim = mount(14);
    run_frames(&mut sim, 0, 1);
    let before = bug_on_screen(&sim);
    sim.push_event(InputEvent::ScrollPosition(1000.0));
    sim.set_active(false);
    run_frames(&mut sim, 1, 1);
    let after = bug_on_screen(&sim);
    // Camera moved up 20px in world space: the bug drops 20px on screen
    assert!((after.y - before.y - 20.0).abs() < 1e-3);
    assert!((after.x - before.x).abs() < 1e-3);
}

#[test]
fn test_host_scroll_event_moves_camera() {
    let mut sim = mount(18);
    run_frames(&mut sim, 0, 1);
    sim.handle_host_event(&HostEvent::new(HostEventKind::Scroll { position: 500.0 }));
    run_frames(&mut sim, 1, 1);
    assert_eq!(sim.state().scroll_position, 500.0);
    assert_eq!(sim.backend().map(|b| b.camera().offset.y), Some(10.0));
}

#[test]
fn test_panic_without_pointer_flees_from_centre() {
    let mut sim = mount(15);
    run_frames(&mut sim, 0, 60);
    let position = sim.state().bug.position;
    assert!(sim.panic(None));
    run_frames(&mut sim, 60, 1);
    assert_eq!(sim.state().bug.state, BugState::Fleeing);
    assert!(sim.state().events.contains(&SimEvent::StateChanged {
        from: BugState::Seeking,
        to: BugState::Fleeing
    }));
    let velocity = sim.state().bug.velocity;
    assert!(velocity.dot(position) > 0.0);
}

#[test]
fn test_events_are_reported_per_frame() {
    let mut sim = mount(16);
    run_frames(&mut sim, 0, 5);
    let screen = bug_on_screen(&sim);
    sim.handle_host_event(&HostEvent::at(HostEventKind::TouchStart, screen.x, screen.y + 45.0));
    run_frames(&mut sim, 5, 1);
    let events = &sim.state().events;
    assert!(events.iter().any(|e| matches!(e, SimEvent::CatchAttempt { caught: true, .. })));
    assert!(events.contains(&SimEvent::StateChanged {
        from: BugState::Seeking,
        to: BugState::Caught
    }));

    run_frames(&mut sim, 6, 1);
    assert!(sim.state().events.is_empty());
}

#[test]
fn test_unmount_stops_frames() {
    let mut sim = mount(17);
    run_frames(&mut sim, 0, 3);
    let backend = sim.unmount().expect("backend returned");
    assert_eq!(backend.disposals, 1);
    assert_eq!(backend.rendered.len(), 3);
    assert!(sim.unmount().is_none());
    assert_eq!(sim.frame(100.0), FrameRequest::Stop);
}
