//! Input adapter
//!
//! Host events (pointer, touch, keyboard, resize, scroll) are translated into
//! simulation stimuli and buffered in an [`InputQueue`] that the frame driver
//! drains at the start of the next tick. Nothing here touches the
//! simulation state directly.

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::{KeyBindings, SimConfig};
use crate::platform::debounce::Debouncer;

/// Stimulus consumed by the simulation tick (transient, one frame)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse/pen click at a screen point (CSS pixels)
    Click(Vec2),
    /// Touch start at a screen point
    Touch(Vec2),
    /// Pointer moved to a screen point
    PointerMove(Vec2),
    KeyToggleDebug,
    KeyToggleActive,
    /// Viewport resized (already debounced)
    Resize { width: f32, height: f32 },
    /// Page scroll offset reported by the host
    ScrollPosition(f32),
    /// Host-requested scare, from a world-space threat or the last pointer
    Panic(Option<Vec2>),
    /// Host pause/resume
    SetActive(bool),
}

/// Modifier keys held during a host event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Raw event kinds delivered by the host UI
#[derive(Debug, Clone, PartialEq)]
pub enum HostEventKind {
    Click,
    TouchStart,
    PointerMove,
    KeyDown { key: String },
    Resize { width: f32, height: f32 },
    Scroll { position: f32 },
}

/// Raw host event; `position` is in host pixels (see [`InputAdapter::pixel_ratio`])
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub kind: HostEventKind,
    pub position: Vec2,
    pub modifiers: Modifiers,
}

impl HostEvent {
    pub fn new(kind: HostEventKind) -> Self {
        Self {
            kind,
            position: Vec2::ZERO,
            modifiers: Modifiers::default(),
        }
    }

    pub fn at(kind: HostEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Vec2::new(x, y),
            modifiers: Modifiers::default(),
        }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self {
            kind: HostEventKind::KeyDown {
                key: key.to_string(),
            },
            position: Vec2::ZERO,
            modifiers,
        }
    }
}

/// Bounded FIFO of pending stimuli
#[derive(Debug)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue, evicting the oldest pointer move (or else the oldest event)
    /// when full
    pub fn push(&mut self, event: InputEvent) {
        if self.events.len() >= self.capacity {
            let evict = self
                .events
                .iter()
                .position(|e| matches!(e, InputEvent::PointerMove(_)))
                .unwrap_or(0);
            if let Some(dropped) = self.events.remove(evict) {
                log::trace!("Input queue full, dropped {:?}", dropped);
            }
        }
        self.events.push_back(event);
    }

    /// Take all pending events in arrival order
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Translates host events into [`InputEvent`]s
#[derive(Debug)]
pub struct InputAdapter {
    /// Host pixels per CSS pixel
    pub pixel_ratio: f32,
    /// Top-left of the overlay, in CSS pixels
    pub origin: Vec2,
    keys: KeyBindings,
    viewport: Vec2,
    resize: Debouncer<Vec2>,
}

impl InputAdapter {
    pub fn new(config: &SimConfig, width: f32, height: f32) -> Self {
        Self {
            pixel_ratio: 1.0,
            origin: Vec2::ZERO,
            keys: config.keys.clone(),
            viewport: Vec2::new(width, height),
            resize: Debouncer::new(config.resize_debounce_ms),
        }
    }

    /// Convert host pixels to overlay-relative screen pixels
    ///
    /// Returns `None` for non-finite input; otherwise clamps to the viewport.
    pub fn to_screen(&self, raw: Vec2) -> Option<Vec2> {
        if !raw.is_finite() {
            return None;
        }
        let ratio = if self.pixel_ratio > 0.0 { self.pixel_ratio } else { 1.0 };
        let screen = raw / ratio - self.origin;
        Some(screen.clamp(Vec2::ZERO, self.viewport.max(Vec2::ZERO)))
    }

    /// Translate one host event. Resizes are held back for debouncing and
    /// come out of [`InputAdapter::poll`] instead.
    pub fn handle(&mut self, event: &HostEvent, now_ms: f64) -> Option<InputEvent> {
        match &event.kind {
            HostEventKind::Click => self.to_screen(event.position).map(InputEvent::Click),
            HostEventKind::TouchStart => self.to_screen(event.position).map(InputEvent::Touch),
            HostEventKind::PointerMove => {
                self.to_screen(event.position).map(InputEvent::PointerMove)
            }
            HostEventKind::KeyDown { key } => self.translate_key(key, event.modifiers),
            HostEventKind::Resize { width, height } => {
                if width.is_finite() && height.is_finite() {
                    self.resize.call(Vec2::new(*width, *height), now_ms);
                }
                None
            }
            HostEventKind::Scroll { position } => {
                position.is_finite().then_some(InputEvent::ScrollPosition(*position))
            }
        }
    }

    /// Emit a pending resize once the debounce window has passed
    pub fn poll(&mut self, now_ms: f64) -> Option<InputEvent> {
        let size = self.resize.poll(now_ms)?;
        self.viewport = size.max(Vec2::ZERO);
        log::debug!("Resize settled at {}x{}", size.x, size.y);
        Some(InputEvent::Resize {
            width: size.x,
            height: size.y,
        })
    }

    fn translate_key(&self, key: &str, modifiers: Modifiers) -> Option<InputEvent> {
        if key.eq_ignore_ascii_case(&self.keys.toggle_debug)
            && (modifiers.ctrl || !self.keys.toggle_debug_ctrl)
        {
            return Some(InputEvent::KeyToggleDebug);
        }
        if key == self.keys.toggle_active {
            return Some(InputEvent::KeyToggleActive);
        }
        None
    }
}
