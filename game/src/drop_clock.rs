use std::time::Duration;

/// Gravity timer: accumulates frame time and fires once the interval is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropClock {
    elapsed: Duration,
    interval: Duration,
}

impl DropClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            interval,
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns `true` when a gravity drop is due. At most one drop fires per call and the
    /// accumulator restarts from zero, so a long stall never produces a burst of drops.
    pub fn tick_if_running(&mut self, dt: Duration, running: bool) -> bool {
        if !running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed > self.interval {
            self.elapsed = Duration::ZERO;
            return true;
        }
        false
    }
}
