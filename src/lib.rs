//! Roaming Bug - a catchable critter that wanders over a web page
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, boundaries, catch tests, state machine)
//! - `input`: Host event translation and the per-frame event queue
//! - `driver`: Frame driver that owns the simulation and talks to the renderer
//! - `renderer`: Rendering backend trait plus WebGPU and headless backends
//! - `platform`: Browser/native glue (frame clock, debounce, DOM listeners)
//! - `config`: Tunable constants, loadable from JSON

pub mod config;
pub mod debug;
pub mod driver;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, KeyBindings, SimConfig};
pub use driver::{FrameRequest, MountError, Simulation};
pub use input::{HostEvent, HostEventKind, InputAdapter, InputEvent, InputQueue, Modifiers};
pub use renderer::{BackendError, RenderBackend};
pub use sim::{BugState, Pose, SimulationState, Viewport};

#[cfg(target_arch = "wasm32")]
pub use platform::web::{BugHandle, mount_bug};

/// Simulation constants that are not tunable at runtime
pub mod consts {
    /// Number of animated legs (three pairs)
    pub const LIMB_COUNT: usize = 6;
    /// Leg 0 swing period at full stride speed (ms); each later leg is slower
    pub const LIMB_BASE_PERIOD_MS: f32 = 80.0;
    /// Extra period per leg index (ms)
    pub const LIMB_PERIOD_STEP_MS: f32 = 20.0;
    /// Antenna sway rate (radians/sec)
    pub const ANTENNA_RATE: f32 = 2.0;
    /// Velocity magnitude below which heading is left alone
    pub const HEADING_MIN_SPEED: f32 = 0.1;
    /// Default margin between targets and the viewport edge (pixels)
    pub const DEFAULT_BOUNDARY_INSET: f32 = 100.0;
    /// Attempts at drawing a respawn point away from the catch position
    pub const RESPAWN_ATTEMPTS: u32 = 8;
    /// Upper bound on device pixel ratio used for the overlay canvas
    pub const MAX_PIXEL_RATIO: f64 = 2.0;
}
