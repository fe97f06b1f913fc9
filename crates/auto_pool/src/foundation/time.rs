//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
///
/// Hosts feed [`Timer::delta_time`] into [`crate::PoolRegistry::update`].
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Manually advanced simulation clock
///
/// Pools schedule delayed despawns against this clock instead of wall time,
/// so a paused host never releases instances behind its back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameClock {
    elapsed: Duration,
}

impl GameClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta_seconds`; negative, NaN and infinite deltas are ignored
    ///
    /// The clock saturates at [`Duration::MAX`].
    pub fn advance(&mut self, delta_seconds: f32) {
        if let Some(delta) = seconds_to_duration(delta_seconds) {
            self.elapsed = self.elapsed.saturating_add(delta);
        }
    }

    /// Current simulation time
    pub fn now(&self) -> Duration {
        self.elapsed
    }

    /// The time `delay_seconds` from now, or `None` for a negative delay
    ///
    /// Saturates at [`Duration::MAX`].
    pub fn after(&self, delay_seconds: f32) -> Option<Duration> {
        seconds_to_duration(delay_seconds).map(|delay| self.elapsed.saturating_add(delay))
    }
}

/// Convert a host-facing seconds value to a `Duration`
///
/// Returns `None` for negative, NaN or infinite values. Finite values too
/// large for a `Duration` saturate at [`Duration::MAX`].
pub fn seconds_to_duration(seconds: f32) -> Option<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX))
}
