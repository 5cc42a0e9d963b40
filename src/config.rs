//! Simulation tuning
//!
//! Every constant the bug's behaviour depends on lives in [`SimConfig`].
//! The host may hand in a JSON object overriding any subset of fields;
//! missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems detected while loading or validating
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must lie in [0, 1], got {value}")]
    NotUnit { field: &'static str, value: f32 },
    #[error("alert_radius ({alert}) must exceed both catch radii ({click}, {touch})")]
    AlertRadiusTooSmall { alert: f32, click: f32, touch: f32 },
}

/// Keyboard shortcuts understood by the input adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Key (as reported by `KeyboardEvent.key`) toggling the debug overlay
    pub toggle_debug: String,
    /// Whether Ctrl must be held for the debug toggle
    pub toggle_debug_ctrl: bool,
    /// Key pausing/resuming the bug
    pub toggle_active: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_debug: "b".to_string(),
            toggle_debug_ctrl: true,
            toggle_active: "Escape".to_string(),
        }
    }
}

/// Bug behaviour and timing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Steering ===
    /// Seek acceleration (pixels/sec²)
    pub accel: f32,
    /// Velocity multiplier applied every update
    pub damping: f32,
    /// Speed cap while wandering (pixels/sec)
    pub max_speed: f32,
    /// Speed set by a flee, and the cap while fleeing
    pub flee_speed: f32,
    /// How far ahead of the bug a flee target is placed
    pub flee_distance: f32,
    /// Seconds after which a flee gives up and the bug wanders again
    pub flee_timeout: f32,
    /// Distance at which a target counts as reached
    pub arrival_radius: f32,
    /// Heading interpolation rate (1/sec), also the max turn in radians/sec
    pub turn_rate: f32,

    // === Boundaries ===
    /// Distance the bug keeps from the viewport edge
    pub edge_margin: f32,
    /// Velocity factor on the axis that hit a wall (sign flipped)
    pub bounce_restitution: f32,
    /// Velocity factor on the other axis after a wall hit
    pub bounce_tangent_damping: f32,

    // === Catching ===
    /// Catch radius for mouse/pen clicks (screen pixels)
    pub click_catch_radius: f32,
    /// Catch radius for touches (screen pixels)
    pub touch_catch_radius: f32,
    /// Misses closer than this make the bug flee
    pub alert_radius: f32,
    /// Chance per pointer-move event that the bug bolts
    pub pointer_flee_chance: f32,

    // === Scroll ===
    /// Chance per scroll change that the bug picks a new target
    pub scroll_retarget_chance: f32,
    /// Camera offset per 1000 pixels of page scroll
    pub scroll_parallax: f32,

    // === Caught / respawn ===
    /// Length of the shrink-and-spin sequence (seconds)
    pub caught_duration: f32,
    /// Time spent invisible before respawning (seconds)
    pub respawn_delay: f32,
    /// Spin speed during the caught sequence (radians/sec)
    pub spin_rate: f32,

    // === Animation ===
    /// Speed at which legs reach full stride (pixels/sec)
    pub stride_speed: f32,
    /// Largest frame delta fed to the simulation (seconds)
    pub max_dt: f32,

    // === Host glue ===
    /// Resize coalescing window (milliseconds)
    pub resize_debounce_ms: f64,
    /// Events buffered between frames
    pub queue_capacity: usize,
    pub keys: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            accel: 100.0,
            damping: 0.92,
            max_speed: 150.0,
            flee_speed: 200.0,
            flee_distance: 500.0,
            flee_timeout: 1.5,
            arrival_radius: 10.0,
            turn_rate: 10.0,

            edge_margin: 20.0,
            bounce_restitution: 0.7,
            bounce_tangent_damping: 0.9,

            click_catch_radius: 40.0,
            touch_catch_radius: 50.0,
            alert_radius: 300.0,
            pointer_flee_chance: 0.03,

            scroll_retarget_chance: 0.05,
            scroll_parallax: 20.0,

            caught_duration: 1.0,
            respawn_delay: 1.0,
            spin_rate: 12.0,

            stride_speed: 50.0,
            max_dt: 0.1,

            resize_debounce_ms: 100.0,
            queue_capacity: 64,
            keys: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("accel", self.accel),
            ("max_speed", self.max_speed),
            ("flee_speed", self.flee_speed),
            ("flee_distance", self.flee_distance),
            ("flee_timeout", self.flee_timeout),
            ("arrival_radius", self.arrival_radius),
            ("turn_rate", self.turn_rate),
            ("click_catch_radius", self.click_catch_radius),
            ("touch_catch_radius", self.touch_catch_radius),
            ("caught_duration", self.caught_duration),
            ("respawn_delay", self.respawn_delay),
            ("stride_speed", self.stride_speed),
            ("max_dt", self.max_dt),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let unit = [
            ("damping", self.damping),
            ("bounce_restitution", self.bounce_restitution),
            ("bounce_tangent_damping", self.bounce_tangent_damping),
            ("pointer_flee_chance", self.pointer_flee_chance),
            ("scroll_retarget_chance", self.scroll_retarget_chance),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotUnit { field, value });
            }
        }

        if self.alert_radius <= self.click_catch_radius
            || self.alert_radius <= self.touch_catch_radius
        {
            return Err(ConfigError::AlertRadiusTooSmall {
                alert: self.alert_radius,
                click: self.click_catch_radius,
                touch: self.touch_catch_radius,
            });
        }

        Ok(())
    }

    /// Speed cap for the given flee status
    #[inline]
    pub fn speed_cap(&self, fleeing: bool) -> f32 {
        if fleeing { self.flee_speed } else { self.max_speed }
    }
}
