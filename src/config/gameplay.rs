use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::{
    BASE_DROP_INTERVAL_MS, DROP_INTERVAL_STEP_MS, KEY_RELEASE_TIMEOUT_MS, MIN_DROP_INTERVAL_MS,
    SOFT_DROP_DELAY_MS, SOFT_DROP_INTERVAL_MS,
};

// Timing of gravity and soft drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub base_drop_interval_ms: u64,
    pub drop_interval_step_ms: u64,
    pub min_drop_interval_ms: u64,
    pub soft_drop_delay_ms: u64,
    pub soft_drop_interval_ms: u64,
    pub key_release_timeout_ms: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            base_drop_interval_ms: BASE_DROP_INTERVAL_MS,
            drop_interval_step_ms: DROP_INTERVAL_STEP_MS,
            min_drop_interval_ms: MIN_DROP_INTERVAL_MS,
            soft_drop_delay_ms: SOFT_DROP_DELAY_MS,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            key_release_timeout_ms: KEY_RELEASE_TIMEOUT_MS,
        }
    }
}

impl GameplayConfig {
    /// Gravity interval at `level`: `base - step * level`, never below the
    /// minimum and never zero.
    #[must_use]
    pub fn drop_interval(&self, level: u32) -> Duration {
        let reduction = self.drop_interval_step_ms.saturating_mul(u64::from(level));
        let ms = self
            .base_drop_interval_ms
            .saturating_sub(reduction)
            .max(self.min_drop_interval_ms)
            .max(1);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn soft_drop_delay(&self) -> Duration {
        Duration::from_millis(self.soft_drop_delay_ms)
    }

    #[must_use]
    pub fn soft_drop_interval(&self) -> Duration {
        Duration::from_millis(self.soft_drop_interval_ms.max(1))
    }

    #[must_use]
    pub fn key_release_timeout(&self) -> Duration {
        Duration::from_millis(self.key_release_timeout_ms)
    }
}

// Background music settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub music_enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_enabled: true,
            volume: 0.5,
        }
    }
}
