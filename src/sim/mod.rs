//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Elapsed time comes in from the caller, clamped per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod entity;
pub mod fuel;
pub mod input;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vehicle;
pub mod view;

pub use collision::{BonusOutcome, ObstacleOutcome, apply_bonus, overlaps, resolve_obstacle};
pub use effects::{ActiveEffect, ActiveEffects, EffectKind};
pub use entity::{
    Behavior, BonusDefinition, BonusKind, BonusReward, Entity, EntityKind, Motion, ObstacleKind,
    ObstacleTraits,
};
pub use fuel::{FuelStatus, FuelTank};
pub use input::{
    ControlMode, InputNormalizer, Intent, KeyState, RawInput, TiltReading, TouchState, WheelState,
};
pub use progression::{RunStats, difficulty_for_distance};
pub use spawn::{SpawnTimer, WaveContext, eligible_obstacles, spawn_interval, spawn_wave};
pub use state::{EndReason, GameEvent, GamePhase, RoadLayout, SimulationState, Viewport};
pub use tick::{magnet_pull, tick};
pub use vehicle::{DriveModifiers, RoadBounds, Vehicle};
pub use view::{EffectStatus, EntitySprite, HudView, RenderView, VehicleSprite};
