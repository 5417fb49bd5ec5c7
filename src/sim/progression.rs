//! Distance, difficulty and per-run statistics

use serde::{Deserialize, Serialize};

use crate::consts::{DIFFICULTY_PER_DISTANCE, DISTANCE_PER_SPEED_MS};

/// Difficulty for a distance travelled. Monotonic in `distance`.
pub fn difficulty_for_distance(distance: f32) -> f32 {
    1.0 + distance.max(0.0) * DIFFICULTY_PER_DISTANCE
}

/// Base downward speed of road entities, before the world scroll is added
pub fn entity_base_speed(difficulty: f32) -> f32 {
    1.5 + difficulty * 0.8
}

/// Running totals for the current run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Distance in km
    pub distance: f32,
    /// Highest speed reached, floored
    pub max_speed: u32,
    /// Fuel pickups collected
    pub fuel_collected: u32,
    /// Wall-clock time spent playing (ms)
    pub elapsed_ms: f64,
}

impl RunStats {
    /// Accumulate distance for `elapsed_ms` at `speed`; returns the gain
    pub fn travel(&mut self, speed: f32, elapsed_ms: f32, time_scale: f32, score_mult: f32) -> f32 {
        let gain = speed * DISTANCE_PER_SPEED_MS * elapsed_ms * time_scale * score_mult;
        self.distance += gain;
        self.elapsed_ms += f64::from(elapsed_ms);
        gain
    }

    pub fn record_speed(&mut self, speed: f32) {
        self.max_speed = self.max_speed.max(speed.max(0.0).floor() as u32);
    }
}
