#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Gaps longer than this (a hidden tab, a debugger pause) are treated as a
/// single short frame so running tweens do not jump to their end.
const LAG_THRESHOLD: Duration = Duration::from_millis(500);
const LAG_FRAME: Duration = Duration::from_millis(33);

/// Frame timer with lag smoothing.
#[derive(Debug, Clone)]
pub struct Timer {
    last_update: Instant,
    /// Smoothed time since the last tick
    pub delta: Duration,
    /// Sum of smoothed deltas
    pub elapsed: Duration,
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_update);
        self.last_update = now;
    }

    /// Advances by a measured gap, applying lag smoothing.
    pub fn advance(&mut self, raw: Duration) {
        self.delta = if raw > LAG_THRESHOLD { LAG_FRAME } else { raw };
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
