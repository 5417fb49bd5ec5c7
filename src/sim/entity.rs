//! Road entities: obstacles and bonuses
//!
//! Every entity shares one shape with an explicit [`EntityKind`]. What an
//! obstacle does on impact is a static property of its category
//! ([`ObstacleTraits`]), never a check for an optional field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;

/// Obstacle categories, ordered from the ones available at the start of a run
/// to the ones unlocked last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Concrete,
    Barrel,
    CarRed,
    CarBlue,
    Truck,
    Cone,
    RockSmall,
    RockBig,
    Puddle,
    Barrier,
}

/// Static behavior of an obstacle category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleTraits {
    /// Footprint (width, height)
    pub size: Vec2,
    /// Ends the run (or costs a life) on impact
    pub fatal: bool,
    /// Another vehicle: travels at its own speed relative to the road
    pub moving: bool,
    /// A moving vehicle that is slower than traffic
    pub slow: bool,
    /// Rolls and wobbles sideways
    pub rolling: bool,
    /// Reduces steering grip for a while
    pub slippery: bool,
    /// Multiplies the car's speed on impact
    pub slowdown: Option<f32>,
}

impl ObstacleTraits {
    const fn solid(w: f32, h: f32) -> Self {
        Self {
            size: Vec2::new(w, h),
            fatal: true,
            moving: false,
            slow: false,
            rolling: false,
            slippery: false,
            slowdown: None,
        }
    }

    const fn soft(w: f32, h: f32) -> Self {
        Self {
            fatal: false,
            ..Self::solid(w, h)
        }
    }
}

impl ObstacleKind {
    /// All categories in unlock order
    pub const ALL: [ObstacleKind; 10] = [
        ObstacleKind::Concrete,
        ObstacleKind::Barrel,
        ObstacleKind::CarRed,
        ObstacleKind::CarBlue,
        ObstacleKind::Truck,
        ObstacleKind::Cone,
        ObstacleKind::RockSmall,
        ObstacleKind::RockBig,
        ObstacleKind::Puddle,
        ObstacleKind::Barrier,
    ];

    pub const fn traits(self) -> ObstacleTraits {
        match self {
            ObstacleKind::Concrete => ObstacleTraits::solid(70.0, 50.0),
            ObstacleKind::Barrel => ObstacleTraits {
                rolling: true,
                ..ObstacleTraits::solid(40.0, 40.0)
            },
            ObstacleKind::CarRed | ObstacleKind::CarBlue => ObstacleTraits {
                moving: true,
                ..ObstacleTraits::solid(55.0, 90.0)
            },
            ObstacleKind::Truck => ObstacleTraits {
                moving: true,
                slow: true,
                ..ObstacleTraits::solid(70.0, 140.0)
            },
            ObstacleKind::Cone => ObstacleTraits::soft(30.0, 30.0),
            ObstacleKind::RockSmall => ObstacleTraits {
                slowdown: Some(0.5),
                ..ObstacleTraits::soft(35.0, 35.0)
            },
            ObstacleKind::RockBig => ObstacleTraits::solid(60.0, 55.0),
            ObstacleKind::Puddle => ObstacleTraits {
                slippery: true,
                ..ObstacleTraits::soft(80.0, 60.0)
            },
            ObstacleKind::Barrier => ObstacleTraits::solid(100.0, 25.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Concrete => "concrete",
            ObstacleKind::Barrel => "barrel",
            ObstacleKind::CarRed => "car_red",
            ObstacleKind::CarBlue => "car_blue",
            ObstacleKind::Truck => "truck",
            ObstacleKind::Cone => "cone",
            ObstacleKind::RockSmall => "rock_small",
            ObstacleKind::RockBig => "rock_big",
            ObstacleKind::Puddle => "puddle",
            ObstacleKind::Barrier => "barrier",
        }
    }
}

/// What picking up a bonus grants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BonusReward {
    /// Fuel units added to the tank
    Fuel(f32),
    /// One extra life (life-based runs only)
    ExtraLife,
    /// A timed effect, duration in milliseconds
    Effect { kind: EffectKind, duration_ms: f32 },
}

/// Immutable template for a bonus type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusDefinition {
    pub size: Vec2,
    pub reward: BonusReward,
    /// HUD glyph
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    FuelSmall,
    FuelMedium,
    FuelLarge,
    Boost,
    SlowMo,
    Shield,
    Magnet,
    Double,
    ExtraLife,
}

impl BonusKind {
    pub const FUEL: [BonusKind; 3] = [
        BonusKind::FuelSmall,
        BonusKind::FuelMedium,
        BonusKind::FuelLarge,
    ];

    pub const EFFECTS: [BonusKind; 5] = [
        BonusKind::Boost,
        BonusKind::SlowMo,
        BonusKind::Shield,
        BonusKind::Magnet,
        BonusKind::Double,
    ];

    /// Effect pool when runs have lives
    pub const EFFECTS_WITH_LIFE: [BonusKind; 6] = [
        BonusKind::Boost,
        BonusKind::SlowMo,
        BonusKind::Shield,
        BonusKind::Magnet,
        BonusKind::Double,
        BonusKind::ExtraLife,
    ];

    pub const fn definition(self) -> BonusDefinition {
        const fn effect(kind: EffectKind, duration_ms: f32, icon: &'static str) -> BonusDefinition {
            BonusDefinition {
                size: Vec2::new(35.0, 35.0),
                reward: BonusReward::Effect { kind, duration_ms },
                icon,
            }
        }

        match self {
            BonusKind::FuelSmall => BonusDefinition {
                size: Vec2::new(30.0, 30.0),
                reward: BonusReward::Fuel(10.0),
                icon: "⛽",
            },
            BonusKind::FuelMedium => BonusDefinition {
                size: Vec2::new(35.0, 35.0),
                reward: BonusReward::Fuel(25.0),
                icon: "⛽",
            },
            BonusKind::FuelLarge => BonusDefinition {
                size: Vec2::new(40.0, 40.0),
                reward: BonusReward::Fuel(50.0),
                icon: "⛽",
            },
            BonusKind::Boost => effect(EffectKind::Boost, 5000.0, "⚡"),
            BonusKind::SlowMo => effect(EffectKind::SlowMo, 4000.0, "⏱"),
            BonusKind::Shield => effect(EffectKind::Shield, 6000.0, "🛡"),
            BonusKind::Magnet => effect(EffectKind::Magnet, 5000.0, "🧲"),
            BonusKind::Double => effect(EffectKind::Double, 8000.0, "×2"),
            BonusKind::ExtraLife => BonusDefinition {
                size: Vec2::new(35.0, 35.0),
                reward: BonusReward::ExtraLife,
                icon: "❤",
            },
        }
    }

    pub fn is_fuel(self) -> bool {
        matches!(self.definition().reward, BonusReward::Fuel(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BonusKind::FuelSmall => "fuel_small",
            BonusKind::FuelMedium => "fuel_medium",
            BonusKind::FuelLarge => "fuel_large",
            BonusKind::Boost => "boost",
            BonusKind::SlowMo => "slowmo",
            BonusKind::Shield => "shield",
            BonusKind::Magnet => "magnet",
            BonusKind::Double => "double",
            BonusKind::ExtraLife => "extra_life",
        }
    }
}

/// Obstacle or bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Bonus(BonusKind),
}

/// Lateral movement pattern of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    Straight,
    /// Sine-wave weave across its lane
    Zigzag,
    /// Constant sideways drift
    Diagonal,
}

/// Per-instance motion state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Motion {
    pub behavior: Behavior,
    /// Relative speed against the world scroll (moving vehicles)
    pub speed_mod: f32,
    /// Oscillation phase (radians)
    pub phase: f32,
    /// Drift direction for diagonal movers (-1, 0, 1)
    pub drift: f32,
}

/// A live obstacle or bonus on the road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Center position in view coordinates (y grows toward the viewer)
    pub pos: Vec2,
    /// Footprint (width, height)
    pub size: Vec2,
    pub motion: Motion,
    /// Cosmetic spin (rolling obstacles, bonuses)
    pub rotation: f32,
    /// Bonus hover phase
    pub float_phase: f32,
    /// Bonus hover height (cosmetic)
    pub float_height: f32,
}

impl Entity {
    pub fn obstacle(id: u32, kind: ObstacleKind, pos: Vec2, motion: Motion) -> Self {
        Self {
            id,
            kind: EntityKind::Obstacle(kind),
            pos,
            size: kind.traits().size,
            motion,
            rotation: 0.0,
            float_phase: 0.0,
            float_height: 0.0,
        }
    }

    pub fn bonus(id: u32, kind: BonusKind, pos: Vec2, float_phase: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Bonus(kind),
            pos,
            size: kind.definition().size,
            motion: Motion::default(),
            rotation: 0.0,
            float_phase,
            float_height: 0.0,
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, EntityKind::Obstacle(_))
    }

    pub fn is_bonus(&self) -> bool {
        matches!(self.kind, EntityKind::Bonus(_))
    }
}
