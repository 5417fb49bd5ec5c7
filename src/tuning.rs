//! Data-driven game balance
//!
//! Every number the simulation uses lives here so the variants of the game
//! (instant-death vs. lives, strict vs. forgiving collisions) are presets of
//! one struct rather than copies of the code. Loadable from partial JSON:
//! missing sections and fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// How fatal collisions are paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DamageModel {
    /// First fatal hit ends the run
    #[default]
    InstantDeath,
    /// Fatal hits cost a life; the run ends when none are left
    Lives { initial: u8, max: u8 },
}

impl DamageModel {
    /// Starting life count (`None` for instant death)
    pub fn initial_lives(&self) -> Option<u8> {
        match self {
            DamageModel::InstantDeath => None,
            DamageModel::Lives { initial, .. } => Some(*initial),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub width: f32,
    pub height: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub brake_force: f32,
    /// Speed the car settles at when neither gas nor brake is held
    pub cruise_speed: f32,
    pub max_turn_speed: f32,
    pub turn_accel: f32,
    /// Turn speed multiplier applied per tick without steering input
    pub friction: f32,
    pub tilt_factor: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
            max_speed: CAR_MAX_SPEED,
            acceleration: CAR_ACCELERATION,
            deceleration: CAR_DECELERATION,
            brake_force: CAR_BRAKE_FORCE,
            cruise_speed: CAR_CRUISE_SPEED,
            max_turn_speed: CAR_MAX_TURN_SPEED,
            turn_accel: CAR_TURN_ACCEL,
            friction: CAR_FRICTION,
            tilt_factor: CAR_TILT_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTuning {
    pub max: f32,
    pub base: f32,
    pub per_speed: f32,
    pub per_accel: f32,
    /// Converts milliseconds into consumption units
    pub time_scale: f32,
}

impl Default for FuelTuning {
    fn default() -> Self {
        Self {
            max: FUEL_MAX,
            base: FUEL_BASE,
            per_speed: FUEL_PER_SPEED,
            per_accel: FUEL_PER_ACCEL,
            time_scale: FUEL_TIME_SCALE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadTuning {
    pub width: f32,
    pub lanes: u8,
}

impl Default for RoadTuning {
    fn default() -> Self {
        Self {
            width: ROAD_WIDTH,
            lanes: ROAD_LANES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub interval_ms: f32,
    pub interval_floor_ms: f32,
    pub interval_per_difficulty: f32,
    /// Difficulty above which a second obstacle may appear
    pub double_obstacle_difficulty: f32,
    pub double_obstacle_chance: f64,
    /// Vertical gap between the two obstacles of one spawn
    pub double_obstacle_offset: f32,
    pub bonus_chance: f64,
    /// Share of bonuses that are fuel cans
    pub fuel_bonus_share: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_ms: SPAWN_INTERVAL_MS,
            interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            interval_per_difficulty: SPAWN_INTERVAL_PER_DIFFICULTY,
            double_obstacle_difficulty: 2.0,
            double_obstacle_chance: 0.3,
            double_obstacle_offset: 350.0,
            bonus_chance: 0.5,
            fuel_bonus_share: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Fraction of each footprint that counts for collisions
    pub shrink: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            shrink: COLLISION_SHRINK,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Sideways tilt (degrees) that counts as steering
    pub tilt_steer_deg: f32,
    /// Forward tilt below this angle is gas
    pub tilt_gas_below_deg: f32,
    /// Backward tilt above this angle is brake
    pub tilt_brake_above_deg: f32,
    /// Wheel offset (px) that counts as a discrete turn
    pub wheel_dead_zone: f32,
    /// Wheel offset (px) for full lock
    pub wheel_max_offset: f32,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            tilt_steer_deg: 12.0,
            tilt_gas_below_deg: 45.0,
            tilt_brake_above_deg: 75.0,
            wheel_dead_zone: 10.0,
            wheel_max_offset: 40.0,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub vehicle: VehicleTuning,
    pub fuel: FuelTuning,
    pub road: RoadTuning,
    pub spawn: SpawnTuning,
    pub collision: CollisionTuning,
    pub input: InputTuning,
    pub damage: DamageModel,
    /// Clamp for a single tick's elapsed time
    pub max_frame_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            vehicle: VehicleTuning::default(),
            fuel: FuelTuning::default(),
            road: RoadTuning::default(),
            spawn: SpawnTuning::default(),
            collision: CollisionTuning::default(),
            input: InputTuning::default(),
            damage: DamageModel::default(),
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

impl Tuning {
    /// Instant death, forgiving 0.65 collision boxes
    pub fn classic() -> Self {
        Self::default()
    }

    /// Three lives (up to five), slightly tighter 0.7 collision boxes
    pub fn with_lives() -> Self {
        let mut tuning = Self::classic();
        tuning.damage = DamageModel::Lives { initial: 3, max: 5 };
        tuning.collision.shrink = 0.7;
        tuning
    }

    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> TuningError {
            TuningError::Invalid { field, reason }
        }

        if self.max_frame_ms <= 0.0 {
            return Err(invalid("max_frame_ms", "must be positive"));
        }
        if self.road.lanes == 0 {
            return Err(invalid("road.lanes", "must be at least 1"));
        }
        if self.road.width < self.vehicle.width {
            return Err(invalid("road.width", "must fit the vehicle"));
        }
        if self.vehicle.max_speed <= 0.0 {
            return Err(invalid("vehicle.max_speed", "must be positive"));
        }
        if self.vehicle.max_turn_speed < 0.0 {
            return Err(invalid("vehicle.max_turn_speed", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.vehicle.friction) {
            return Err(invalid("vehicle.friction", "must be within 0..=1"));
        }
        if self.fuel.max <= 0.0 {
            return Err(invalid("fuel.max", "must be positive"));
        }
        if self.spawn.interval_floor_ms <= 0.0 {
            return Err(invalid("spawn.interval_floor_ms", "must be positive"));
        }
        let chances = [
            ("spawn.double_obstacle_chance", self.spawn.double_obstacle_chance),
            ("spawn.bonus_chance", self.spawn.bonus_chance),
            ("spawn.fuel_bonus_share", self.spawn.fuel_bonus_share),
        ];
        for (field, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, "must be a probability"));
            }
        }
        if !(0.0..=1.0).contains(&self.collision.shrink) || self.collision.shrink == 0.0 {
            return Err(invalid("collision.shrink", "must be within (0, 1]"));
        }
        if self.input.wheel_max_offset <= 0.0 {
            return Err(invalid("input.wheel_max_offset", "must be positive"));
        }
        if let DamageModel::Lives { initial, max } = self.damage {
            if initial == 0 || initial > max {
                return Err(invalid("damage.initial", "must be within 1..=max"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_is_valid() {
        let tuning = Tuning::classic();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.damage, DamageModel::InstantDeath);
        assert_eq!(tuning.max_frame_ms, MAX_FRAME_MS);
    }

    #[test]
    fn test_with_lives_preset() {
        let tuning = Tuning::with_lives();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.damage.initial_lives(), Some(3));
        assert!((tuning.collision.shrink - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "vehicle": { "max_speed": 180.0 } }"#).unwrap();
        assert_eq!(tuning.vehicle.max_speed, 180.0);
        assert_eq!(tuning.vehicle.acceleration, CAR_ACCELERATION);
        assert_eq!(tuning.road.lanes, ROAD_LANES);
        assert_eq!(tuning.max_frame_ms, MAX_FRAME_MS);
    }

    #[test]
    fn test_damage_model_json() {
        let tuning =
            Tuning::from_json(r#"{ "damage": { "mode": "lives", "initial": 2, "max": 4 } }"#)
                .unwrap();
        assert_eq!(tuning.damage, DamageModel::Lives { initial: 2, max: 4 });
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Tuning::from_json(r#"{ "road": { "lanes": 0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "road.lanes", .. }));

        let err = Tuning::from_json(r#"{ "collision": { "shrink": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "collision.shrink", .. }));

        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
