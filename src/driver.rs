//! Frame driver
//!
//! [`Simulation`] owns the simulation state, the input pipeline and the
//! rendering backend. The host calls [`Simulation::frame`] once per
//! animation frame and feeds raw events through
//! [`Simulation::handle_host_event`]; everything else happens inside `frame`.

use glam::Vec2;
use thiserror::Error;

use crate::config::{ConfigError, SimConfig};
use crate::debug::DebugSnapshot;
use crate::input::{HostEvent, InputAdapter, InputEvent, InputQueue};
use crate::platform::FrameClock;
use crate::renderer::{BackendError, RenderBackend};
use crate::sim::{SimulationState, Viewport, tick};

/// Why a mount failed
#[derive(Debug, Error)]
pub enum MountError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Schedule another frame
    Continue,
    /// Unmounted; stop scheduling
    Stop,
}

/// A mounted bug
pub struct Simulation<B: RenderBackend> {
    state: SimulationState,
    backend: Option<B>,
    adapter: InputAdapter,
    queue: InputQueue,
    clock: FrameClock,
    /// Timestamp of the latest frame (ms), used to time debounced input
    now_ms: f64,
    render_failing: bool,
}

impl<B: RenderBackend> Simulation<B> {
    /// Create the bug, hand its geometry to `backend` and start it roaming
    pub fn mount(mut backend: B, viewport: Viewport, config: SimConfig, seed: u64) -> Result<Self, MountError> {
        config.validate()?;

        let mut state = SimulationState::new(config, viewport, seed);
        backend.sync_camera(&state.camera);
        backend.create_entity_geometry()?;
        state.begin();

        log::info!(
            "Bug mounted in {}x{} viewport (seed {})",
            viewport.width,
            viewport.height,
            seed
        );

        Ok(Self {
            adapter: InputAdapter::new(&state.config, viewport.width, viewport.height),
            queue: InputQueue::new(state.config.queue_capacity),
            clock: FrameClock::new(state.config.max_dt),
            state,
            backend: Some(backend),
            now_ms: 0.0,
            render_failing: false,
        })
    }

    /// Tear down: stop frames, drop queued input, release the geometry and
    /// the backend. Returns the backend on the first call only.
    pub fn unmount(&mut self) -> Option<B> {
        let mut backend = self.backend.take()?;
        self.queue.clear();
        backend.dispose_geometry();
        log::info!("Bug unmounted after {:.1}s", self.state.time);
        Some(backend)
    }

    pub fn is_mounted(&self) -> bool {
        self.backend.is_some()
    }

    /// Run one animation frame at host time `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameRequest {
        let Some(backend) = self.backend.as_mut() else {
            return FrameRequest::Stop;
        };

        let dt = self.clock.tick(timestamp_ms);
        if timestamp_ms.is_finite() {
            self.now_ms = timestamp_ms;
        }
        if let Some(resize) = self.adapter.poll(self.now_ms) {
            self.queue.push(resize);
        }

        let events = self.queue.drain();
        tick(&mut self.state, &events, dt, backend);
        for event in &self.state.events {
            log::trace!("{:?}", event);
        }

        let pose = self.state.pose();
        match backend.set_pose(&pose).and_then(|()| backend.render()) {
            Ok(()) => {
                if self.render_failing {
                    log::info!("Rendering recovered");
                }
                self.render_failing = false;
            }
            Err(e) => {
                // Skip the frame; keep going
                if !self.render_failing {
                    log::warn!("Frame skipped: {}", e);
                }
                self.render_failing = true;
            }
        }

        FrameRequest::Continue
    }

    /// Feed a raw host event through the input adapter
    pub fn handle_host_event(&mut self, event: &HostEvent) {
        if !self.is_mounted() {
            return;
        }
        if let Some(input) = self.adapter.handle(event, self.now_ms) {
            self.queue.push(input);
        }
    }

    /// Queue an already-translated stimulus for the next frame
    pub fn push_event(&mut self, event: InputEvent) {
        if self.is_mounted() {
            self.queue.push(event);
        }
    }

    /// Pause or resume physics from the next frame; rendering continues
    /// either way
    pub fn set_active(&mut self, active: bool) {
        self.push_event(InputEvent::SetActive(active));
    }

    pub fn is_debug_visible(&self) -> bool {
        self.state.debug_visible
    }

    /// Make the bug bolt from `threat` (world space), or from the last
    /// pointer position / viewport centre when `None`
    ///
    /// Applied on the next frame. Returns false when the bug cannot be
    /// scared right now (unmounted, paused, caught or respawning).
    pub fn panic(&mut self, threat: Option<Vec2>) -> bool {
        if !self.is_mounted() || !self.state.active || !self.state.bug.state.is_roaming() {
            return false;
        }
        self.queue.push(InputEvent::Panic(threat));
        true
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot::from_state(&self.state)
    }

    /// Host pixel ratio and overlay origin used to convert event coordinates
    pub fn set_pointer_mapping(&mut self, pixel_ratio: f32, origin: Vec2) {
        self.adapter.pixel_ratio = pixel_ratio;
        self.adapter.origin = origin;
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }
}

impl<B: RenderBackend> Drop for Simulation<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}
