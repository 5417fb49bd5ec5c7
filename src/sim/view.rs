//! Read-only snapshots for the HUD and the renderer
//!
//! Observers pull these once per frame; nothing here mutates the simulation.

use glam::Vec2;

use super::effects::EffectKind;
use super::entity::EntityKind;
use super::state::{GamePhase, RoadLayout, SimulationState, Viewport};

/// One running effect as the HUD shows it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectStatus {
    pub kind: EffectKind,
    /// Remaining share of the full duration (0..=1)
    pub fraction: f32,
    /// Seconds left, rounded up
    pub seconds_left: u32,
}

/// Numbers the HUD displays
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub phase: GamePhase,
    /// km
    pub distance: f32,
    pub speed: u32,
    pub max_speed: u32,
    pub fuel_percent: f32,
    /// Below 25%: warn the driver
    pub fuel_low: bool,
    pub effects: Vec<EffectStatus>,
    pub lives: Option<u8>,
    pub best_distance: f32,
    /// Current speed over top speed, drives the engine tone
    pub speed_ratio: f32,
}

impl HudView {
    pub fn new(state: &SimulationState, best_distance: f32) -> Self {
        let fuel_percent = state.fuel.percent();
        let effects = state
            .effects
            .iter()
            .map(|e| EffectStatus {
                kind: e.kind,
                fraction: e.remaining_fraction(),
                seconds_left: (e.remaining / 1000.0).ceil().max(0.0) as u32,
            })
            .collect();

        Self {
            phase: state.phase,
            distance: state.stats.distance,
            speed: state.vehicle.speed.max(0.0).floor() as u32,
            max_speed: state.stats.max_speed,
            fuel_percent,
            fuel_low: fuel_percent < 25.0,
            effects,
            lives: state.lives,
            best_distance,
            speed_ratio: (state.vehicle.speed / state.tuning.vehicle.max_speed).clamp(0.0, 1.5),
        }
    }
}

/// The player's car as drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSprite {
    pub pos: Vec2,
    pub size: Vec2,
    pub tilt: f32,
    pub shielded: bool,
}

/// One obstacle or bonus as drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySprite {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    /// Hover offset for bonuses
    pub lift: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderView {
    pub viewport: Viewport,
    pub road: RoadLayout,
    /// Lane marking scroll
    pub marking_offset: f32,
    pub camera_shake: f32,
    pub vehicle: VehicleSprite,
    /// Farthest first (ascending y)
    pub entities: Vec<EntitySprite>,
    pub active_effects: Vec<EffectKind>,
}

impl RenderView {
    pub fn new(state: &SimulationState) -> Self {
        let mut entities: Vec<EntitySprite> = state
            .entities
            .iter()
            .map(|e| EntitySprite {
                kind: e.kind,
                pos: e.pos,
                size: e.size,
                rotation: e.rotation,
                lift: e.float_height,
            })
            .collect();
        entities.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        Self {
            viewport: state.viewport,
            road: state.layout,
            marking_offset: state.marking_offset,
            camera_shake: state.camera_shake,
            vehicle: VehicleSprite {
                pos: state.vehicle.pos,
                size: state.vehicle.size,
                tilt: state.vehicle.tilt,
                shielded: state.effects.is_active(EffectKind::Shield),
            },
            entities,
            active_effects: state.effects.iter().map(|e| e.kind).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{BonusKind, Entity, Motion, ObstacleKind};
    use crate::tuning::Tuning;

    #[test]
    fn test_hud_reflects_state() {
        let mut state = SimulationState::new(1, Tuning::with_lives(), Viewport::default());
        state.start_run(1);
        state.vehicle.speed = 110.7;
        state.effects.activate(EffectKind::Magnet, 5000.0);
        state.effects.countdown(1500.0);

        let hud = HudView::new(&state, 42.0);
        assert_eq!(hud.phase, GamePhase::Playing);
        assert_eq!(hud.speed, 110);
        assert_eq!(hud.lives, Some(3));
        assert_eq!(hud.best_distance, 42.0);
        assert_eq!(hud.fuel_percent, 100.0);
        assert!(!hud.fuel_low);
        assert_eq!(hud.effects.len(), 1);
        assert_eq!(hud.effects[0].seconds_left, 4);
        assert!((hud.effects[0].fraction - 0.7).abs() < 1e-6);
        assert!((hud.speed_ratio - 110.7 / 220.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_view_sorts_far_to_near() {
        let mut state = SimulationState::new(1, Tuning::classic(), Viewport::default());
        state.entities.push(Entity::obstacle(
            1,
            ObstacleKind::Cone,
            Vec2::new(160.0, 300.0),
            Motion::default(),
        ));
        state
            .entities
            .push(Entity::bonus(2, BonusKind::Double, Vec2::new(280.0, -100.0), 0.0));
        state.entities.push(Entity::obstacle(
            3,
            ObstacleKind::Truck,
            Vec2::new(400.0, 50.0),
            Motion::default(),
        ));

        let view = RenderView::new(&state);
        let ys: Vec<f32> = view.entities.iter().map(|e| e.pos.y).collect();
        assert_eq!(ys, vec![-100.0, 50.0, 300.0]);
        assert!(!view.vehicle.shielded);
        assert_eq!(view.road.left, 100.0);
    }
}
