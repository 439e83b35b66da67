//! Frame clock
//!
//! Measures the host time between two render-loop ticks, which is what
//! `Viewer::frame` expects.

use std::time::{Duration, Instant};

/// Longest frame time reported in one tick
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// Delta time source for a render loop
pub struct FrameClock {
    last_frame: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Time since the previous tick
    ///
    /// Capped at [`MAX_FRAME_TIME`] so a stalled host (first frame, window
    /// losing focus) does not skip the pulse animation ahead by seconds.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).min(MAX_FRAME_TIME);
        self.last_frame = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_capped() {
        let mut clock = FrameClock {
            last_frame: Instant::now() - Duration::from_secs(5),
        };
        assert_eq!(clock.tick(), MAX_FRAME_TIME);
        assert!(clock.tick() < MAX_FRAME_TIME);
    }
}
