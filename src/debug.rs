//! Diagnostic snapshot for the host's debug overlay
//!
//! The overlay itself is host UI; this module only decides what it shows.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{BugState, SimulationState, Viewport};

/// Read-only view of the simulation for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub debug_visible: bool,
    pub active: bool,
    pub state: BugState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub heading_degrees: f32,
    pub target: Vec2,
    pub viewport: Viewport,
    pub scroll_position: f32,
    pub time: f64,
}

impl DebugSnapshot {
    pub fn from_state(state: &SimulationState) -> Self {
        let bug = &state.bug;
        Self {
            debug_visible: state.debug_visible,
            active: state.active,
            state: bug.state,
            position: bug.position,
            velocity: bug.velocity,
            speed: bug.speed(),
            heading_degrees: bug.heading.to_degrees(),
            target: bug.target,
            viewport: state.viewport,
            scroll_position: state.scroll_position,
            time: state.time,
        }
    }

    /// Lines of overlay text, empty when the overlay is hidden
    pub fn overlay_lines(&self) -> Vec<String> {
        if !self.debug_visible {
            return Vec::new();
        }
        let active = if self.active {
            "Yes (Esc to pause)"
        } else {
            "No (Esc to resume)"
        };
        let status = match self.state {
            BugState::Caught | BugState::Respawning => "Bug caught! Respawning soon...",
            _ => "Bug is active - try to catch it!",
        };
        vec![
            "Debug Mode: ON (Ctrl+B to toggle)".to_string(),
            format!("Active: {active}"),
            status.to_string(),
            format!(
                "{} at ({:.0}, {:.0}), {:.0} px/s",
                self.state.label(),
                self.position.x,
                self.position.y,
                self.speed
            ),
        ]
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
