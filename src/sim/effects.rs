//! Timed bonus effects
//!
//! At most one live instance per [`EffectKind`]. Picking up a kind that is
//! already running resets its countdown to the full duration; durations never
//! stack. Countdowns run on wall-clock time, so slow motion does not stretch
//! them.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Raises top speed and the acceleration target
    Boost,
    /// Halves world time
    SlowMo,
    /// Destroys every obstacle it touches
    Shield,
    /// Pulls nearby bonuses toward the car
    Magnet,
    /// Doubles distance gain
    Double,
    /// Reduced steering grip after driving through a puddle
    Slippery,
}

impl EffectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Boost => "boost",
            EffectKind::SlowMo => "slowmo",
            EffectKind::Shield => "shield",
            EffectKind::Magnet => "magnet",
            EffectKind::Double => "double",
            EffectKind::Slippery => "slippery",
        }
    }
}

/// A running effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    /// Full duration (ms) of the latest activation
    pub duration: f32,
    /// Time left (ms)
    pub remaining: f32,
}

impl ActiveEffect {
    /// Remaining share of the full duration (0..=1)
    pub fn remaining_fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// The set of running effects, in activation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect, or refresh it to the full duration if already running
    pub fn activate(&mut self, kind: EffectKind, duration_ms: f32) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.duration = duration_ms;
            existing.remaining = duration_ms;
        } else {
            self.effects.push(ActiveEffect {
                kind,
                duration: duration_ms,
                remaining: duration_ms,
            });
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Advance every countdown by `elapsed_ms`; returns the kinds that expired
    pub fn countdown(&mut self, elapsed_ms: f32) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.remaining -= elapsed_ms;
            if effect.remaining <= 0.0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Target speed multiplier (boost)
    pub fn speed_multiplier(&self) -> f32 {
        if self.is_active(EffectKind::Boost) {
            BOOST_SPEED_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Steering grip multiplier (slippery)
    pub fn turn_multiplier(&self) -> f32 {
        if self.is_active(EffectKind::Slippery) {
            SLIPPERY_TURN_MULTIPLIER
        } else {
            1.0
        }
    }

    /// World time scale (slow motion)
    pub fn time_scale(&self) -> f32 {
        if self.is_active(EffectKind::SlowMo) {
            SLOWMO_TIME_SCALE
        } else {
            1.0
        }
    }

    /// Distance multiplier (double score)
    pub fn score_multiplier(&self) -> f32 {
        if self.is_active(EffectKind::Double) {
            2.0
        } else {
            1.0
        }
    }
}
