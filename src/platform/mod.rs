//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (`clock`)
//! - Event coalescing (`debounce`)
//! - DOM mounting, listeners and the animation frame loop (`web`, wasm32 only)

pub mod clock;
pub mod debounce;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::FrameClock;
pub use debounce::Debouncer;
