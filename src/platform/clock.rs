//! Frame timing
//!
//! Converts host frame timestamps into clamped simulation steps.

/// Turns successive frame timestamps (ms) into `dt` seconds
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]`
    ///
    /// The first frame after construction or [`FrameClock::reset`] yields 0,
    /// so a tab returning from the background never sees a huge step.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if timestamp_ms.is_finite() => ((timestamp_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_ms = Some(timestamp_ms);
        }
        dt.clamp(0.0, self.max_dt)
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
