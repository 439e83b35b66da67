//! Host-side systems
//!
//! Helpers for hosts that drive a viewer from their own loop.

mod frame_clock;

pub use frame_clock::FrameClock;
