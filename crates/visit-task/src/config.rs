//! Task configuration from environment.

use std::env;
use std::time::Duration;

use visit_core::PlanSettings;

#[derive(Debug, Clone)]
pub struct TaskConfig {
    /// Raw points-to-visit list, lat/lon pairs in degrees
    pub points: String,
    /// Local system id that plan requests are addressed to
    pub system_id: u16,
    pub speed_mps: f32,
    pub depth_m: f32,
    pub poll_interval_ms: u64,
    pub queue_capacity: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            points: String::new(),
            system_id: 0,
            speed_mps: 1.6,
            depth_m: 0.0,
            poll_interval_ms: 1000,
            queue_capacity: 64,
        }
    }
}

impl TaskConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            points: env::var("PLAN_VISIT_POINTS").unwrap_or(defaults.points),
            system_id: env::var("PLAN_VISIT_SYSTEM_ID")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.system_id),
            speed_mps: env::var("PLAN_VISIT_SPEED_MPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.speed_mps),
            depth_m: env::var("PLAN_VISIT_DEPTH_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.depth_m),
            poll_interval_ms: env::var("PLAN_VISIT_POLL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.poll_interval_ms),
            queue_capacity: env::var("PLAN_VISIT_QUEUE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.queue_capacity),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Maneuver settings derived from this configuration.
    pub fn plan_settings(&self) -> PlanSettings {
        PlanSettings {
            speed: self.speed_mps,
            z: self.depth_m,
            ..PlanSettings::default()
        }
    }
}
