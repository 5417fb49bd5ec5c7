//! Endless Racer - A multi-lane endless driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, effects)
//! - `game`: Frame controller tying input, simulation and the best record together
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best-distance record storage
//! - `platform`: Capability flags and frame clock
//! - `audio` / `renderer`: Browser presentation (event-driven, pull-only)

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, RunSummary};
pub use settings::{ControlMode, Settings};
pub use tuning::{DamageModel, Tuning, TuningError};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Nominal frame length in milliseconds (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest elapsed time a single tick may simulate
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Car footprint
    pub const CAR_WIDTH: f32 = 60.0;
    pub const CAR_HEIGHT: f32 = 100.0;
    /// Car sits at this fraction of the view height
    pub const CAR_SCREEN_Y: f32 = 0.82;

    /// Car handling (per-tick units)
    pub const CAR_MAX_SPEED: f32 = 220.0;
    pub const CAR_ACCELERATION: f32 = 1.2;
    pub const CAR_DECELERATION: f32 = 0.3;
    pub const CAR_BRAKE_FORCE: f32 = 1.5;
    pub const CAR_CRUISE_SPEED: f32 = 30.0;
    pub const CAR_MAX_TURN_SPEED: f32 = 19.0;
    pub const CAR_TURN_ACCEL: f32 = 1.3;
    pub const CAR_FRICTION: f32 = 0.88;
    pub const CAR_TILT_FACTOR: f32 = 0.04;

    /// Fuel
    pub const FUEL_MAX: f32 = 100.0;
    pub const FUEL_BASE: f32 = 0.015;
    pub const FUEL_PER_SPEED: f32 = 0.00008;
    pub const FUEL_PER_ACCEL: f32 = 0.02;
    pub const FUEL_TIME_SCALE: f32 = 0.1;

    /// Road
    pub const ROAD_WIDTH: f32 = 600.0;
    pub const ROAD_LANES: u8 = 5;
    pub const LANE_MARKING_PERIOD: f32 = 80.0;

    /// Spawning
    pub const SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f32 = 500.0;
    pub const SPAWN_INTERVAL_PER_DIFFICULTY: f32 = 40.0;

    /// Collision box shrink factor
    pub const COLLISION_SHRINK: f32 = 0.65;

    /// Effect strengths
    pub const BOOST_SPEED_MULTIPLIER: f32 = 1.5;
    pub const SLOWMO_TIME_SCALE: f32 = 0.5;
    pub const SLIPPERY_TURN_MULTIPLIER: f32 = 0.3;
    pub const SLIPPERY_DURATION_MS: f32 = 2000.0;
    pub const MAGNET_RADIUS: f32 = 300.0;

    /// Progression
    pub const DISTANCE_PER_SPEED_MS: f32 = 0.0001;
    pub const DIFFICULTY_PER_DISTANCE: f32 = 0.4;
    pub const WORLD_SPEED_FACTOR: f32 = 0.1;
}
