//! Frame pacing.
//!
//! The consumer thread asks the [`FrameClock`] for a [`FrameDelta`] once per
//! frame and feeds that delta to every timer service and tween engine. Tests
//! skip the clock and build deltas with [`FrameDelta::fixed`].

use std::time::{Duration, Instant};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Longest delta handed out in one frame.
///
/// A stall (breakpoint, window drag) would otherwise finish every running
/// animation in a single jump.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

/// Time elapsed for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDelta {
    /// Delta fed to timers and tweens.
    pub delta: Duration,
    /// Frame number (starts at 1).
    pub frame: u64,
    /// True if the raw frame time exceeded the target.
    pub over_budget: bool,
}

impl FrameDelta {
    /// Builds a delta without a clock.
    #[must_use]
    pub const fn fixed(delta: Duration, frame: u64) -> Self {
        Self {
            delta,
            frame,
            over_budget: false,
        }
    }
}

/// Wall-clock frame timer.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame: u64,
    target: Duration,
}

impl FrameClock {
    /// Creates a clock targeting 60 FPS.
    #[must_use]
    pub fn new() -> Self {
        Self::with_target(TARGET_FRAME_TIME)
    }

    /// Creates a clock with a custom target frame time.
    #[must_use]
    pub fn with_target(target: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame: 0,
            target,
        }
    }

    /// Target frame time.
    #[must_use]
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Frames counted so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Measures the time since the previous call.
    pub fn tick(&mut self) -> FrameDelta {
        let now = Instant::now();
        let raw = now.duration_since(self.last);
        self.last = now;
        self.frame += 1;

        if raw > MAX_FRAME_TIME {
            tracing::debug!(frame = self.frame, raw_ms = raw.as_millis() as u64, "frame delta clamped");
        }

        FrameDelta {
            delta: raw.min(MAX_FRAME_TIME),
            frame: self.frame,
            over_budget: raw > self.target,
        }
    }

    /// Restarts measurement from now, so the next delta does not include a
    /// relayout or a context reset.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_counts_frames_and_clamps() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();

        assert_eq!(a.frame, 1);
        assert_eq!(b.frame, 2);
        assert!(b.delta <= MAX_FRAME_TIME);
    }

    #[test]
    fn test_fixed_delta() {
        let delta = FrameDelta::fixed(Duration::from_millis(16), 7);
        assert_eq!(delta.frame, 7);
        assert!(!delta.over_budget);
    }
}
