//! Canvas rendering module
//!
//! Draws a [`RenderView`](crate::sim::RenderView) as flat shapes. The colour
//! and layout helpers here are pure; the Canvas2D backend is WASM only.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::consts::LANE_MARKING_PERIOD;
use crate::sim::{BonusKind, EntityKind, ObstacleKind};

/// Length of one painted dash; the rest of the period is gap
pub const DASH_LENGTH: f32 = 40.0;

pub const GRASS_COLOR: &str = "#2d5a27";
pub const ROAD_COLOR: &str = "#3a3a3a";
pub const MARKING_COLOR: &str = "#f5f5f5";
pub const EDGE_COLOR: &str = "#f2c230";
pub const CAR_COLOR: &str = "#e63946";
pub const SHIELD_COLOR: &str = "rgba(80, 180, 255, 0.45)";

/// Fill colour for an obstacle or bonus
pub fn entity_color(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Obstacle(kind) => match kind {
            ObstacleKind::Concrete => "#9e9e9e",
            ObstacleKind::Barrel => "#c0392b",
            ObstacleKind::CarRed => "#d62828",
            ObstacleKind::CarBlue => "#1d4ed8",
            ObstacleKind::Truck => "#6b4f2a",
            ObstacleKind::Cone => "#ff7f11",
            ObstacleKind::RockSmall | ObstacleKind::RockBig => "#6d6d6d",
            ObstacleKind::Puddle => "rgba(60, 120, 200, 0.6)",
            ObstacleKind::Barrier => "#f4f4f4",
        },
        EntityKind::Bonus(kind) => match kind {
            BonusKind::FuelSmall | BonusKind::FuelMedium | BonusKind::FuelLarge => "#2ecc71",
            BonusKind::Boost => "#f1c40f",
            BonusKind::SlowMo => "#9b59b6",
            BonusKind::Shield => "#3498db",
            BonusKind::Magnet => "#e74c3c",
            BonusKind::Double => "#f39c12",
            BonusKind::ExtraLife => "#ff4d6d",
        },
    }
}

/// Fuel gauge colour: green when full, through yellow, to red when empty
pub fn fuel_color(percent: f32) -> String {
    let t = (percent / 100.0).clamp(0.0, 1.0);
    let (r, g) = if t > 0.5 {
        // Yellow to green
        let u = (t - 0.5) / 0.5;
        (1.0 - u, 1.0)
    } else {
        // Red to yellow
        (1.0, t / 0.5)
    };
    format!(
        "rgb({}, {}, 60)",
        (r * 255.0).round() as u8,
        (g * 220.0).round() as u8
    )
}

/// Top edges of the visible lane dashes for a scroll `offset`
pub fn dash_positions(offset: f32, height: f32) -> impl Iterator<Item = f32> {
    let start = offset.rem_euclid(LANE_MARKING_PERIOD) - LANE_MARKING_PERIOD;
    let count = (height / LANE_MARKING_PERIOD).ceil() as usize + 2;
    (0..count).map(move |i| start + i as f32 * LANE_MARKING_PERIOD)
}

/// Screen jitter for a shake of `magnitude` at animation time `t_ms`
pub fn shake_offset(magnitude: f32, t_ms: f64) -> Vec2 {
    if magnitude < 0.1 {
        return Vec2::ZERO;
    }
    let t = (t_ms * 0.001) as f32;
    Vec2::new((t * 91.7).sin(), (t * 67.3).cos()) * magnitude
}
