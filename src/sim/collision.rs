//! Collision detection and outcome resolution
//!
//! Hit boxes are axis-aligned and shrunk around their centers so that a
//! graze which only clips a sprite's corner does not count.

use glam::Vec2;

use super::effects::{ActiveEffects, EffectKind};
use super::entity::{BonusKind, BonusReward, ObstacleKind};
use super::fuel::FuelTank;

/// Overlap test between two centered boxes after shrinking both by `shrink`
pub fn overlaps(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2, shrink: f32) -> bool {
    let half = (a_size + b_size) * shrink / 2.0;
    let d = (a_pos - b_pos).abs();
    d.x < half.x && d.y < half.y
}

/// What hitting an obstacle did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleOutcome {
    /// Shield absorbed the hit; obstacle destroyed
    ShieldBlocked,
    /// Run over
    Fatal,
    /// A life was spent; obstacle destroyed, run continues
    LifeLost { remaining: u8 },
    /// Speed multiplied by the factor; obstacle destroyed
    SlowedDown(f32),
    /// Grip lost for a while; obstacle destroyed
    Slipped,
    /// Cosmetic bump; obstacle stays on the road
    Bumped,
}

impl ObstacleOutcome {
    /// Whether the obstacle is removed from the road
    pub fn consumes_obstacle(self) -> bool {
        !matches!(self, ObstacleOutcome::Bumped | ObstacleOutcome::Fatal)
    }

    /// Camera shake to apply
    pub fn camera_shake(self) -> f32 {
        match self {
            ObstacleOutcome::ShieldBlocked | ObstacleOutcome::LifeLost { .. } => 5.0,
            ObstacleOutcome::SlowedDown(_) => 3.0,
            ObstacleOutcome::Bumped => 2.0,
            ObstacleOutcome::Fatal | ObstacleOutcome::Slipped => 0.0,
        }
    }
}

/// Decide what an obstacle hit does. Priority: shield, fatal, slowdown,
/// slippery, cosmetic. `lives` is `None` for instant-death runs.
pub fn resolve_obstacle(
    kind: ObstacleKind,
    effects: &ActiveEffects,
    lives: Option<u8>,
) -> ObstacleOutcome {
    let traits = kind.traits();

    if effects.is_active(EffectKind::Shield) {
        return ObstacleOutcome::ShieldBlocked;
    }

    if traits.fatal {
        return match lives {
            Some(n) if n > 1 => ObstacleOutcome::LifeLost { remaining: n - 1 },
            _ => ObstacleOutcome::Fatal,
        };
    }

    if let Some(factor) = traits.slowdown {
        ObstacleOutcome::SlowedDown(factor)
    } else if traits.slippery {
        ObstacleOutcome::Slipped
    } else {
        ObstacleOutcome::Bumped
    }
}

/// What picking up a bonus did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BonusOutcome {
    /// Fuel actually added (after capping)
    Refueled(f32),
    /// Lives after the pickup
    ExtraLife(u8),
    /// Effect started or refreshed
    Effect(EffectKind),
    /// Nothing to grant (extra life in an instant-death run)
    Ignored,
}

/// Grant a bonus. Fuel is capped at the tank size; extra lives at `max_lives`.
pub fn apply_bonus(
    kind: BonusKind,
    fuel: &mut FuelTank,
    effects: &mut ActiveEffects,
    lives: &mut Option<u8>,
    max_lives: u8,
) -> BonusOutcome {
    match kind.definition().reward {
        BonusReward::Fuel(amount) => BonusOutcome::Refueled(fuel.refill(amount)),
        BonusReward::ExtraLife => match lives {
            Some(n) => {
                *n = (*n + 1).min(max_lives);
                BonusOutcome::ExtraLife(*n)
            }
            None => BonusOutcome::Ignored,
        },
        BonusReward::Effect { kind, duration_ms } => {
            effects.activate(kind, duration_ms);
            BonusOutcome::Effect(kind)
        }
    }
}
