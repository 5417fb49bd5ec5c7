//! Fuel economy

use serde::{Deserialize, Serialize};

use crate::tuning::FuelTuning;

/// Result of burning fuel for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelStatus {
    Ok,
    /// The tank just hit zero
    Empty,
}

/// The car's tank. Invariant: `0 <= current <= max`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelTank {
    current: f32,
    max: f32,
}

impl FuelTank {
    /// A full tank
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fill level in percent
    pub fn percent(&self) -> f32 {
        self.current / self.max * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Consumption rate for the given driving state (units per scaled ms)
    pub fn consumption_rate(tuning: &FuelTuning, speed: f32, accelerating: bool) -> f32 {
        let mut rate = tuning.base + speed * tuning.per_speed;
        if accelerating {
            rate += tuning.per_accel;
        }
        rate
    }

    /// Burn fuel for `elapsed_ms` of (time-scaled) driving.
    /// Lands on exactly zero when the tank runs dry.
    pub fn burn(
        &mut self,
        tuning: &FuelTuning,
        speed: f32,
        accelerating: bool,
        elapsed_ms: f32,
        time_scale: f32,
    ) -> FuelStatus {
        let rate = Self::consumption_rate(tuning, speed, accelerating);
        self.current -= rate * elapsed_ms * time_scale * tuning.time_scale;

        if self.current <= 0.0 {
            self.current = 0.0;
            FuelStatus::Empty
        } else {
            FuelStatus::Ok
        }
    }

    /// Add fuel, capped at the tank size; returns the amount actually added
    pub fn refill(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }
}
