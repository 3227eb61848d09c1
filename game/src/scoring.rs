use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const BASE_LINE_POINTS: u32 = 10;
pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);
pub const DROP_INTERVAL_STEP: Duration = Duration::from_millis(20);
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// Line-clear scoring and gravity acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    pub base_points: u32,
    #[serde(with = "crate::serde_duration")]
    pub initial_drop_interval: Duration,
    #[serde(with = "crate::serde_duration")]
    pub drop_interval_step: Duration,
    #[serde(with = "crate::serde_duration")]
    pub min_drop_interval: Duration,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            base_points: BASE_LINE_POINTS,
            initial_drop_interval: INITIAL_DROP_INTERVAL,
            drop_interval_step: DROP_INTERVAL_STEP,
            min_drop_interval: MIN_DROP_INTERVAL,
        }
    }
}

impl ScoreRules {
    /// Points for one sweep: the first row is worth `base`, and each further row in the
    /// same sweep is worth double the previous one.
    pub fn sweep_points(&self, cleared: u32) -> u32 {
        let mut multiplier = 1u32;
        let mut total = 0u32;
        for _ in 0..cleared {
            total = total.saturating_add(self.base_points.saturating_mul(multiplier));
            multiplier = multiplier.saturating_mul(2);
        }
        total
    }

    /// Interval after `cleared` more rows, clamped at the configured floor.
    pub fn accelerate(&self, interval: Duration, cleared: u32) -> Duration {
        interval
            .saturating_sub(self.drop_interval_step.saturating_mul(cleared))
            .max(self.min_drop_interval)
    }
}
