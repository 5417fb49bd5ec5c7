//! Simulation state and run lifecycle
//!
//! Everything a run needs lives in [`SimulationState`]. Phase transitions
//! happen only through the methods here so the event stream stays consistent.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffects, EffectKind};
use super::entity::{BonusKind, Entity, ObstacleKind};
use super::fuel::FuelTank;
use super::progression::{RunStats, difficulty_for_distance};
use super::spawn::SpawnTimer;
use super::vehicle::{RoadBounds, Vehicle};
use crate::consts::CAR_SCREEN_Y;
use crate::tuning::{DamageModel, RoadTuning, Tuning};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulates
    Menu,
    /// Active driving
    Playing,
    /// Frozen mid-run
    Paused,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Fuel,
    Crash,
}

/// Something observers (audio, HUD, persistence) may react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    RunStarted,
    /// Fatal impact that ended the run
    Crash { kind: ObstacleKind },
    /// Non-fatal impact (slowdown, puddle, cosmetic bump)
    ObstacleHit { kind: ObstacleKind },
    /// Shield destroyed an obstacle
    ShieldBlocked { kind: ObstacleKind },
    /// Fatal impact absorbed by a spare life
    LifeLost { remaining: u8 },
    BonusCollected { kind: BonusKind },
    EffectExpired { kind: EffectKind },
    GameOver { reason: EndReason, distance: f32 },
    /// The finished run beat the stored best distance
    NewRecord { distance: f32 },
}

/// Size of the play area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fixed screen row of the player's car
    pub fn car_y(&self) -> f32 {
        self.height * CAR_SCREEN_Y
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Horizontal placement of the road, centered in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadLayout {
    /// Left edge of the asphalt
    pub left: f32,
    pub width: f32,
    pub lanes: u8,
}

impl RoadLayout {
    pub fn new(viewport: Viewport, road: &RoadTuning) -> Self {
        Self {
            left: (viewport.width - road.width) / 2.0,
            width: road.width,
            lanes: road.lanes.max(1),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn lane_width(&self) -> f32 {
        self.width / f32::from(self.lanes)
    }

    pub fn lane_center(&self, lane: u8) -> f32 {
        self.left + (f32::from(lane) + 0.5) * self.lane_width()
    }

    /// Band the center of something `width` wide can occupy on the asphalt
    pub fn bounds_for(&self, width: f32) -> RoadBounds {
        RoadBounds {
            min_x: self.left + width / 2.0,
            max_x: self.right() - width / 2.0,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub layout: RoadLayout,
    pub phase: GamePhase,
    /// Set once the run is over
    pub end_reason: Option<EndReason>,
    /// Run seed for reproducibility
    pub seed: u64,
    pub vehicle: Vehicle,
    pub fuel: FuelTank,
    /// Live obstacles and bonuses, in spawn order
    pub entities: Vec<Entity>,
    pub effects: ActiveEffects,
    pub stats: RunStats,
    pub difficulty: f32,
    pub spawn_timer: SpawnTimer,
    /// Current shake amplitude, decays every tick
    pub camera_shake: f32,
    /// Lane marking scroll, within `0..LANE_MARKING_PERIOD`
    pub marking_offset: f32,
    /// `None` when any fatal hit ends the run
    pub lives: Option<u8>,
    /// Ticks simulated this run
    pub ticks: u64,
    pub rng: Pcg32,
    /// Next entity ID
    pub(crate) next_id: u32,
    events: Vec<GameEvent>,
}

impl SimulationState {
    /// A state sitting on the menu, ready for [`start_run`](Self::start_run)
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let layout = RoadLayout::new(viewport, &tuning.road);
        let vehicle = Vehicle::new(
            Vec2::new(viewport.width / 2.0, viewport.car_y()),
            &tuning.vehicle,
        );
        let fuel = FuelTank::new(tuning.fuel.max);
        let lives = tuning.damage.initial_lives();

        Self {
            viewport,
            layout,
            phase: GamePhase::Menu,
            end_reason: None,
            seed,
            vehicle,
            fuel,
            entities: Vec::new(),
            effects: ActiveEffects::new(),
            stats: RunStats::default(),
            difficulty: difficulty_for_distance(0.0),
            spawn_timer: SpawnTimer::default(),
            camera_shake: 0.0,
            marking_offset: 0.0,
            lives,
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            events: Vec::new(),
            tuning,
        }
    }

    /// Begin a fresh run. Accepted from any phase; everything per-run is reset.
    pub fn start_run(&mut self, seed: u64) {
        let mut fresh = Self::new(seed, self.tuning.clone(), self.viewport);
        fresh.events = std::mem::take(&mut self.events);
        *self = fresh;

        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run started (seed {seed})");
    }

    /// Playing -> Paused. Returns whether the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    /// Paused -> Playing. Returns whether the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            true
        } else {
            false
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.pause() || self.resume()
    }

    /// Paused/GameOver -> Menu
    pub fn exit_to_menu(&mut self) -> bool {
        match self.phase {
            GamePhase::Paused | GamePhase::GameOver => {
                self.phase = GamePhase::Menu;
                true
            }
            _ => false,
        }
    }

    /// End the run. Only the first call while playing has any effect.
    pub fn finish(&mut self, reason: EndReason) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.events.push(GameEvent::GameOver {
            reason,
            distance: self.stats.distance,
        });
        log::info!(
            "Game over ({:?}): {:.2} km, max speed {}",
            reason,
            self.stats.distance,
            self.stats.max_speed
        );
        true
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Lateral band for the car's center
    pub fn road_bounds(&self) -> RoadBounds {
        self.layout.bounds_for(self.vehicle.size.x)
    }

    /// Cap on lives for pickups (0 in instant-death runs)
    pub fn max_lives(&self) -> u8 {
        match self.tuning.damage {
            DamageModel::Lives { max, .. } => max,
            DamageModel::InstantDeath => 0,
        }
    }

    /// Adapt to a new canvas size, keeping the car's place on the road
    pub fn resize(&mut self, viewport: Viewport) {
        let shift = (viewport.width - self.viewport.width) / 2.0;
        self.viewport = viewport;
        self.layout = RoadLayout::new(viewport, &self.tuning.road);
        self.vehicle.pos.x = self.road_bounds().clamp(self.vehicle.pos.x + shift);
        self.vehicle.pos.y = viewport.car_y();
        for entity in &mut self.entities {
            entity.pos.x += shift;
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
