//! Per-frame simulation tick
//!
//! Order within a tick: kinematics, fuel, progression, spawning, entity
//! movement and collisions, then effect countdowns.

use glam::Vec2;

use super::collision::{BonusOutcome, ObstacleOutcome, apply_bonus, overlaps, resolve_obstacle};
use super::effects::EffectKind;
use super::entity::{Behavior, EntityKind};
use super::fuel::FuelStatus;
use super::input::Intent;
use super::progression::{difficulty_for_distance, entity_base_speed};
use super::spawn::{WaveContext, spawn_wave};
use super::state::{EndReason, GameEvent, SimulationState};
use super::vehicle::DriveModifiers;
use crate::consts::*;

/// How far past the road edge obstacles may wander
const OBSTACLE_BORDER: f32 = 50.0;
/// Despawn margins below the view
const OBSTACLE_DESPAWN_MARGIN: f32 = 200.0;
const BONUS_DESPAWN_MARGIN: f32 = 100.0;

/// Advance the simulation by `dt_ms` of wall-clock time.
///
/// Does nothing unless the phase is `Playing`. `dt_ms` is clamped to
/// `0..=tuning.max_frame_ms`.
pub fn tick(state: &mut SimulationState, intent: &Intent, dt_ms: f32) {
    if !state.is_playing() {
        return;
    }

    let dt = dt_ms.clamp(0.0, state.tuning.max_frame_ms);
    let time_scale = state.effects.time_scale();
    state.ticks += 1;

    // Vehicle
    let mods = DriveModifiers {
        speed_multiplier: state.effects.speed_multiplier(),
        turn_multiplier: state.effects.turn_multiplier(),
        time_scale,
    };
    let bounds = state.road_bounds();
    state.vehicle.drive(intent, &state.tuning.vehicle, mods, bounds);
    let speed = state.vehicle.speed;

    // Fuel
    let status = state
        .fuel
        .burn(&state.tuning.fuel, speed, intent.accelerate, dt, time_scale);
    if status == FuelStatus::Empty {
        state.finish(EndReason::Fuel);
        return;
    }

    // Progression
    let score_mult = state.effects.score_multiplier();
    state.stats.travel(speed, dt, time_scale, score_mult);
    state.stats.record_speed(speed);
    state.difficulty = difficulty_for_distance(state.stats.distance).max(state.difficulty);

    // Spawning
    if state
        .spawn_timer
        .advance(dt * time_scale, state.difficulty, &state.tuning.spawn)
    {
        let ctx = WaveContext {
            difficulty: state.difficulty,
            layout: &state.layout,
            tuning: &state.tuning.spawn,
            lives_enabled: state.lives.is_some(),
        };
        let wave = spawn_wave(&mut state.rng, &mut state.next_id, &ctx);
        state.entities.extend(wave);
    }

    // Scenery
    let world_speed = speed * WORLD_SPEED_FACTOR;
    state.marking_offset =
        (state.marking_offset + world_speed * 2.0 * time_scale).rem_euclid(LANE_MARKING_PERIOD);
    state.camera_shake *= 0.9;
    if state.camera_shake < 0.01 {
        state.camera_shake = 0.0;
    }

    move_entities(state, world_speed, time_scale);

    if !collide_obstacles(state) {
        return;
    }
    collect_bonuses(state);

    // Effect countdowns run on wall-clock time
    for kind in state.effects.countdown(dt) {
        log::debug!("Effect expired: {}", kind.as_str());
        state.push_event(GameEvent::EffectExpired { kind });
    }
}

/// Scroll every entity toward the viewer and apply its own motion, then
/// drop the ones that left the bottom of the view.
fn move_entities(state: &mut SimulationState, world_speed: f32, time_scale: f32) {
    let base = entity_base_speed(state.difficulty);
    let bounds = state.road_bounds();
    let (min_x, max_x) = (bounds.min_x - OBSTACLE_BORDER, bounds.max_x + OBSTACLE_BORDER);
    let car = state.vehicle.pos;
    let magnet = state.effects.is_active(EffectKind::Magnet);

    for entity in &mut state.entities {
        match entity.kind {
            EntityKind::Obstacle(kind) => {
                let motion = &mut entity.motion;
                entity.pos.y += (base + world_speed * (1.0 + motion.speed_mod)) * time_scale;
                motion.phase += 0.03 * time_scale;

                match motion.behavior {
                    Behavior::Zigzag => entity.pos.x += (motion.phase * 3.0).sin() * 2.0,
                    Behavior::Diagonal => entity.pos.x += motion.drift * 1.5,
                    Behavior::Straight => {}
                }

                if kind.traits().rolling {
                    entity.rotation += world_speed * 0.1 * time_scale;
                    entity.pos.x += (motion.phase * 2.0).sin() * 1.5;
                }

                entity.pos.x = entity.pos.x.clamp(min_x, max_x);
            }
            EntityKind::Bonus(_) => {
                entity.pos.y += (base * 0.8 + world_speed) * time_scale;
                entity.rotation += 0.05 * time_scale;
                entity.float_phase += 0.1 * time_scale;
                entity.float_height = entity.float_phase.sin() * 5.0;

                if magnet {
                    entity.pos += magnet_pull(entity.pos, car);
                }
            }
        }
    }

    let bottom = state.viewport.height;
    state.entities.retain(|e| {
        let margin = if e.is_obstacle() {
            OBSTACLE_DESPAWN_MARGIN
        } else {
            BONUS_DESPAWN_MARGIN
        };
        e.pos.y <= bottom + margin
    });
}

/// Per-tick displacement of a bonus toward the car under the magnet effect
pub fn magnet_pull(bonus: Vec2, car: Vec2) -> Vec2 {
    let delta = car - bonus;
    let dist = delta.length();
    if dist > 0.0 && dist < MAGNET_RADIUS {
        let dir = delta / dist;
        Vec2::new(dir.x * 5.0, dir.y * 3.0)
    } else {
        Vec2::ZERO
    }
}

/// Resolve obstacle hits. Returns false once the run has ended; no further
/// hits are processed after that.
fn collide_obstacles(state: &mut SimulationState) -> bool {
    let shrink = state.tuning.collision.shrink;
    let (car_pos, car_size) = (state.vehicle.pos, state.vehicle.size);

    let mut i = 0;
    while i < state.entities.len() {
        let entity = &state.entities[i];
        let EntityKind::Obstacle(kind) = entity.kind else {
            i += 1;
            continue;
        };
        if !overlaps(car_pos, car_size, entity.pos, entity.size, shrink) {
            i += 1;
            continue;
        }

        let outcome = resolve_obstacle(kind, &state.effects, state.lives);
        let shake = outcome.camera_shake();
        if shake > 0.0 {
            state.camera_shake = shake;
        }

        match outcome {
            ObstacleOutcome::ShieldBlocked => {
                state.push_event(GameEvent::ShieldBlocked { kind });
            }
            ObstacleOutcome::Fatal => {
                if state.lives.is_some() {
                    state.lives = Some(0);
                }
                state.push_event(GameEvent::Crash { kind });
                state.finish(EndReason::Crash);
                return false;
            }
            ObstacleOutcome::LifeLost { remaining } => {
                state.lives = Some(remaining);
                log::info!("Life lost on {}, {} left", kind.as_str(), remaining);
                state.push_event(GameEvent::LifeLost { remaining });
            }
            ObstacleOutcome::SlowedDown(factor) => {
                state.vehicle.speed *= factor;
                state.push_event(GameEvent::ObstacleHit { kind });
            }
            ObstacleOutcome::Slipped => {
                state.effects.activate(EffectKind::Slippery, SLIPPERY_DURATION_MS);
                state.push_event(GameEvent::ObstacleHit { kind });
            }
            ObstacleOutcome::Bumped => {
                state.push_event(GameEvent::ObstacleHit { kind });
            }
        }

        if outcome.consumes_obstacle() {
            state.entities.remove(i);
        } else {
            i += 1;
        }
    }
    true
}

fn collect_bonuses(state: &mut SimulationState) {
    let shrink = state.tuning.collision.shrink;
    let (car_pos, car_size) = (state.vehicle.pos, state.vehicle.size);
    let max_lives = state.max_lives();

    let mut i = 0;
    while i < state.entities.len() {
        let entity = &state.entities[i];
        let EntityKind::Bonus(kind) = entity.kind else {
            i += 1;
            continue;
        };
        if !overlaps(car_pos, car_size, entity.pos, entity.size, shrink) {
            i += 1;
            continue;
        }

        state.entities.remove(i);
        let outcome = apply_bonus(
            kind,
            &mut state.fuel,
            &mut state.effects,
            &mut state.lives,
            max_lives,
        );
        if let BonusOutcome::Refueled(_) = outcome {
            state.stats.fuel_collected += 1;
        }
        log::debug!("Collected {} -> {:?}", kind.as_str(), outcome);
        state.push_event(GameEvent::BonusCollected { kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{BonusKind, Entity, Motion, ObstacleKind};
    use crate::sim::state::{GamePhase, Viewport};
    use crate::tuning::Tuning;

    const DT: f32 = 16.0;

    fn playing(tuning: Tuning) -> SimulationState {
        let mut state = SimulationState::new(11, tuning, Viewport::new(800.0, 600.0));
        state.start_run(11);
        state.drain_events();
        state
    }

    fn obstacle_on_car(state: &mut SimulationState, kind: ObstacleKind) {
        let pos = state.vehicle.pos;
        state
            .entities
            .push(Entity::obstacle(900, kind, pos, Motion::default()));
    }

    fn bonus_on_car(state: &mut SimulationState, kind: BonusKind) {
        let pos = state.vehicle.pos;
        state.entities.push(Entity::bonus(901, kind, pos, 0.0));
    }

    #[test]
    fn test_not_playing_is_frozen() {
        let mut state = SimulationState::new(1, Tuning::classic(), Viewport::default());
        tick(&mut state, &Intent::accelerate(), DT);
        assert_eq!(state.vehicle.speed, 0.0);
        assert_eq!(state.ticks, 0);

        state.start_run(1);
        state.pause();
        let fuel = state.fuel.current();
        tick(&mut state, &Intent::accelerate(), DT);
        assert_eq!(state.fuel.current(), fuel);
        assert_eq!(state.vehicle.speed, 0.0);
    }

    #[test]
    fn test_hold_gas_speed_ramp() {
        let mut state = playing(Tuning::classic());
        for n in 1..=200 {
            tick(&mut state, &Intent::accelerate(), DT);
            state.entities.clear();
            let expected = (1.2 * n as f32).min(220.0);
            assert!((state.vehicle.speed - expected).abs() < 1e-2);
        }
        assert_eq!(state.stats.max_speed, 220);
    }

    #[test]
    fn test_idle_cruise_fuel_and_single_game_over() {
        let mut state = playing(Tuning::classic());
        let per_tick = (0.015 + 30.0 * 0.00008) * DT * 0.1;

        for _ in 0..1000 {
            tick(&mut state, &Intent::default(), DT);
            state.entities.clear();
        }
        assert!((state.fuel.current() - (100.0 - per_tick * 1000.0)).abs() < 1e-2);

        let mut n = 1000;
        while state.phase == GamePhase::Playing {
            let before = state.fuel.current();
            tick(&mut state, &Intent::default(), DT);
            state.entities.clear();
            assert!(state.fuel.current() <= before);
            n += 1;
            assert!(n < 10_000);
        }
        let expected = (100.0 / per_tick).ceil() as i64;
        assert!((n - expected).abs() <= 1, "ran out after {n} ticks");
        assert_eq!(state.fuel.current(), 0.0);
        assert_eq!(state.end_reason, Some(EndReason::Fuel));

        tick(&mut state, &Intent::default(), DT);
        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_frame_time_is_clamped() {
        let mut a = playing(Tuning::classic());
        let mut b = playing(Tuning::classic());
        tick(&mut a, &Intent::default(), 5_000.0);
        tick(&mut b, &Intent::default(), 50.0);
        assert_eq!(a.fuel.current(), b.fuel.current());
        assert_eq!(a.stats.distance, b.stats.distance);
    }

    #[test]
    fn test_shield_absorbs_fatal_hit() {
        let mut state = playing(Tuning::classic());
        state.effects.activate(EffectKind::Shield, 500.0);
        obstacle_on_car(&mut state, ObstacleKind::Truck);

        tick(&mut state, &Intent::default(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.entities.iter().all(|e| e.id != 900));
        assert_eq!(state.camera_shake, 5.0);
        let shield = state.effects.get(EffectKind::Shield).unwrap();
        assert_eq!(shield.remaining, 484.0);
        assert!(state.drain_events().contains(&GameEvent::ShieldBlocked {
            kind: ObstacleKind::Truck
        }));
    }

    #[test]
    fn test_fatal_hit_ends_run() {
        let mut state = playing(Tuning::classic());
        obstacle_on_car(&mut state, ObstacleKind::Concrete);
        tick(&mut state, &Intent::default(), DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::Crash));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Crash {
            kind: ObstacleKind::Concrete
        }));
    }

    #[test]
    fn test_lives_absorb_fatal_hits() {
        let mut state = playing(Tuning::with_lives());
        assert_eq!(state.lives, Some(3));

        obstacle_on_car(&mut state, ObstacleKind::Barrier);
        tick(&mut state, &Intent::default(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, Some(2));
        assert!(state.entities.iter().all(|e| e.id != 900));

        state.lives = Some(1);
        obstacle_on_car(&mut state, ObstacleKind::Barrier);
        tick(&mut state, &Intent::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, Some(0));
    }

    #[test]
    fn test_only_one_fatal_outcome_per_tick() {
        let mut state = playing(Tuning::classic());
        obstacle_on_car(&mut state, ObstacleKind::Concrete);
        obstacle_on_car(&mut state, ObstacleKind::RockBig);
        tick(&mut state, &Intent::default(), DT);

        let crashes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Crash { .. }))
            .count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn test_soft_obstacles() {
        let mut state = playing(Tuning::classic());
        state.vehicle.speed = 100.0;
        obstacle_on_car(&mut state, ObstacleKind::RockSmall);
        tick(&mut state, &Intent::accelerate(), DT);
        assert!((state.vehicle.speed - 101.2 * 0.5).abs() < 1e-3);
        assert!(state.entities.iter().all(|e| e.id != 900));

        obstacle_on_car(&mut state, ObstacleKind::Puddle);
        tick(&mut state, &Intent::default(), DT);
        assert!(state.effects.is_active(EffectKind::Slippery));

        obstacle_on_car(&mut state, ObstacleKind::Cone);
        tick(&mut state, &Intent::default(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        // Cones stay where they are
        assert!(state.entities.iter().any(|e| e.id == 900));
    }

    #[test]
    fn test_bonus_pickups() {
        let mut state = playing(Tuning::classic());
        bonus_on_car(&mut state, BonusKind::Boost);
        tick(&mut state, &Intent::default(), DT);
        assert!(state.effects.is_active(EffectKind::Boost));
        assert!(state.drain_events().contains(&GameEvent::BonusCollected {
            kind: BonusKind::Boost
        }));

        bonus_on_car(&mut state, BonusKind::FuelSmall);
        tick(&mut state, &Intent::default(), DT);
        assert_eq!(state.stats.fuel_collected, 1);
        assert_eq!(state.fuel.current(), 100.0);
    }

    #[test]
    fn test_effects_count_down_on_wall_clock() {
        let mut state = playing(Tuning::classic());
        state.effects.activate(EffectKind::SlowMo, 40.0);
        tick(&mut state, &Intent::default(), 20.0);
        assert_eq!(state.effects.get(EffectKind::SlowMo).unwrap().remaining, 20.0);
        tick(&mut state, &Intent::default(), 20.0);
        assert!(!state.effects.is_active(EffectKind::SlowMo));
        assert!(state.drain_events().contains(&GameEvent::EffectExpired {
            kind: EffectKind::SlowMo
        }));
    }

    #[test]
    fn test_slowmo_halves_world_progress() {
        let mut normal = playing(Tuning::classic());
        let mut slow = playing(Tuning::classic());
        slow.effects.activate(EffectKind::SlowMo, 10_000.0);
        for _ in 0..10 {
            tick(&mut normal, &Intent::default(), DT);
            tick(&mut slow, &Intent::default(), DT);
        }
        assert!((normal.stats.distance - 2.0 * slow.stats.distance).abs() < 1e-5);
        let normal_used = 100.0 - normal.fuel.current();
        let slow_used = 100.0 - slow.fuel.current();
        assert!((normal_used - 2.0 * slow_used).abs() < 1e-3);
    }

    #[test]
    fn test_magnet_pull() {
        let car = Vec2::new(400.0, 500.0);
        let pull = magnet_pull(Vec2::new(400.0, 400.0), car);
        assert_eq!(pull, Vec2::new(0.0, 3.0));
        assert_eq!(magnet_pull(Vec2::new(400.0, 100.0), car), Vec2::ZERO);
        assert_eq!(magnet_pull(car, car), Vec2::ZERO);
    }

    #[test]
    fn test_entities_leave_the_road() {
        let mut state = playing(Tuning::classic());
        state.entities.push(Entity::obstacle(
            900,
            ObstacleKind::Cone,
            Vec2::new(160.0, 799.0),
            Motion::default(),
        ));
        state
            .entities
            .push(Entity::bonus(901, BonusKind::Shield, Vec2::new(160.0, 699.0), 0.0));
        tick(&mut state, &Intent::default(), DT);
        assert!(state.entities.iter().all(|e| e.id != 900 && e.id != 901));
    }

    #[test]
    fn test_obstacles_stay_near_the_road() {
        let mut state = playing(Tuning::classic());
        let motion = Motion {
            behavior: Behavior::Diagonal,
            drift: -1.0,
            ..Default::default()
        };
        state
            .entities
            .push(Entity::obstacle(900, ObstacleKind::Concrete, Vec2::new(130.0, -500.0), motion));
        for _ in 0..100 {
            tick(&mut state, &Intent::default(), DT);
        }
        let obstacle = state.entities.iter().find(|e| e.id == 900).unwrap();
        assert_eq!(obstacle.pos.x, 80.0);
    }
}
