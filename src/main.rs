//! Roaming Bug entry point
//!
//! On the web the crate is driven through `mount_bug` from JavaScript. The
//! native binary runs a scripted session against the headless backend and
//! logs what the bug does (`RUST_LOG=debug` for transitions).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use roaming_bug::renderer::HeadlessBackend;
    use roaming_bug::sim::{BugState, SimEvent};
    use roaming_bug::{FrameRequest, HostEvent, HostEventKind, Modifiers, SimConfig, Simulation, Viewport};

    env_logger::init();

    let (width, height) = (1280.0, 720.0);
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    log::info!("Roaming Bug (native, headless) starting with seed {}", seed);

    let mut sim = match Simulation::mount(
        HeadlessBackend::new(width, height),
        Viewport::new(width, height),
        SimConfig::default(),
        seed,
    ) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Mount failed: {}", e);
            std::process::exit(1);
        }
    };

    let frame_ms = 1000.0 / 60.0;
    let mut catches = 0;
    let mut flees = 0;
    for frame in 0..1800u32 {
        let now = frame as f64 * frame_ms;

        // Chase the bug every second: click right on it, or a little off
        if frame % 60 == 30 && sim.state().bug.state.is_roaming() {
            let bug = sim.backend().map(|b| b.camera().world_to_screen(sim.state().bug.position));
            if let Some(screen) = bug {
                let offset = if frame % 120 == 30 { Vec2::ZERO } else { Vec2::new(90.0, 60.0) };
                let target = screen + offset;
                sim.handle_host_event(&HostEvent::at(HostEventKind::Click, target.x, target.y));
            }
        }
        if frame % 10 == 0 {
            let t = frame as f32 / 60.0;
            let x = width / 2.0 + t.cos() * 300.0;
            let y = height / 2.0 + t.sin() * 200.0;
            sim.handle_host_event(&HostEvent::at(HostEventKind::PointerMove, x, y));
        }
        if frame % 240 == 0 {
            sim.handle_host_event(&HostEvent::new(HostEventKind::Scroll {
                position: frame as f32 * 2.0,
            }));
        }
        if frame == 900 {
            let ctrl = Modifiers {
                ctrl: true,
                ..Default::default()
            };
            sim.handle_host_event(&HostEvent::key("b", ctrl));
        }

        if sim.frame(now) == FrameRequest::Stop {
            break;
        }

        for event in &sim.state().events {
            match event {
                SimEvent::StateChanged { to: BugState::Caught, .. } => catches += 1,
                SimEvent::StateChanged { to: BugState::Fleeing, .. } => flees += 1,
                _ => {}
            }
        }
        if frame % 300 == 0 {
            for line in sim.debug_snapshot().overlay_lines() {
                log::info!("{}", line);
            }
        }
    }

    let snapshot = sim.debug_snapshot();
    log::info!(
        "Session over: {} catches, {} flees, bug {} at ({:.0}, {:.0})",
        catches,
        flees,
        snapshot.state.label(),
        snapshot.position.x,
        snapshot.position.y
    );
    match snapshot.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
    sim.unmount();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `mount_bug`, this is just to satisfy the compiler
}
