//! End-to-end runs through the public `Game` API

use glam::Vec2;

use endless_racer::persistence::{MemoryStore, RecordStore};
use endless_racer::platform::Capabilities;
use endless_racer::sim::progression::entity_base_speed;
use endless_racer::sim::{
    EffectKind, EndReason, Entity, GameEvent, GamePhase, Intent, Motion, ObstacleKind, Viewport,
};
use endless_racer::{ControlMode, Game, Tuning};

const DT: f32 = 16.0;

fn new_game(tuning: Tuning, store: MemoryStore) -> Game<MemoryStore> {
    Game::new(
        tuning,
        Viewport::new(800.0, 600.0),
        Capabilities::none(),
        ControlMode::Touch,
        store,
    )
}

/// Step with an empty road so nothing but the driver matters
fn drive_clear(game: &mut Game<MemoryStore>, intent: Intent, ticks: usize) {
    for _ in 0..ticks {
        game.state_mut().entities.clear();
        game.step(&intent, DT);
    }
}

/// Put an obstacle where the car will be after the next tick's scroll
fn place_on_car(game: &mut Game<MemoryStore>, kind: ObstacleKind) {
    let state = game.state();
    let scroll = entity_base_speed(state.difficulty) + state.vehicle.speed * 0.1;
    let pos = state.vehicle.pos - Vec2::new(0.0, scroll);
    let id = 10_000 + game.state().ticks as u32;
    game.state_mut().entities.clear();
    game.state_mut()
        .entities
        .push(Entity::obstacle(id, kind, pos, Motion::default()));
}

fn count_game_overs(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count()
}

#[test]
fn test_gas_from_standstill() {
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    game.start(3);

    drive_clear(&mut game, Intent::accelerate(), 50);
    assert!((game.state().vehicle.speed - 60.0).abs() < 1e-3);

    drive_clear(&mut game, Intent::accelerate(), 200);
    assert_eq!(game.state().vehicle.speed, 220.0);
    assert_eq!(game.hud().max_speed, 220);
}

#[test]
fn test_idle_cruise_fuel() {
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    game.start(3);

    drive_clear(&mut game, Intent::default(), 1000);

    assert_eq!(game.state().vehicle.speed, 30.0);
    let expected = 100.0 - (0.015 + 30.0 * 0.00008) * 16_000.0 * 0.1;
    assert!((game.state().fuel.current() - expected).abs() < 0.05);
    assert_eq!(game.phase(), GamePhase::Playing);
}

#[test]
fn test_fuel_exhaustion_ends_run_once() {
    let tuning = Tuning::from_json(r#"{ "fuel": { "max": 1.0 } }"#).unwrap();
    let mut game = new_game(tuning, MemoryStore::new());
    game.start(3);

    let mut events = Vec::new();
    for _ in 0..200 {
        game.state_mut().entities.clear();
        game.step(&Intent::accelerate(), DT);
        events.extend(game.drain_events());
    }

    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.state().fuel.current(), 0.0);
    assert_eq!(count_game_overs(&events), 1);
    assert_eq!(game.summary().unwrap().reason, EndReason::Fuel);
}

#[test]
fn test_shield_absorbs_fatal_hit() {
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    game.start(3);
    drive_clear(&mut game, Intent::accelerate(), 20);
    game.drain_events();

    game.state_mut().effects.activate(EffectKind::Shield, 500.0);
    place_on_car(&mut game, ObstacleKind::Truck);
    game.step(&Intent::accelerate(), DT);

    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(game.state().entities.is_empty());
    assert!(game.state().effects.is_active(EffectKind::Shield));
    assert!(
        game.drain_events()
            .contains(&GameEvent::ShieldBlocked { kind: ObstacleKind::Truck })
    );
}

#[test]
fn test_crash_persists_only_a_better_record() {
    // First run beats the empty record
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    game.start(3);
    drive_clear(&mut game, Intent::accelerate(), 300);
    place_on_car(&mut game, ObstacleKind::Concrete);
    game.step(&Intent::accelerate(), DT);

    assert_eq!(game.phase(), GamePhase::GameOver);
    let first = game.summary().unwrap().clone();
    assert!(first.new_record);
    let stored = game.store().load_best_distance().unwrap();
    assert!((stored - first.distance).abs() < 0.01);

    // A shorter second run leaves it alone
    game.start(4);
    drive_clear(&mut game, Intent::accelerate(), 30);
    place_on_car(&mut game, ObstacleKind::Concrete);
    game.step(&Intent::accelerate(), DT);

    let second = game.summary().unwrap();
    assert!(!second.new_record);
    assert!(second.distance < first.distance);
    assert_eq!(game.store().load_best_distance(), Some(stored));
}

#[test]
fn test_lives_variant_survives_until_last_life() {
    let mut game = new_game(Tuning::with_lives(), MemoryStore::new());
    game.start(3);
    drive_clear(&mut game, Intent::accelerate(), 10);
    game.drain_events();

    let mut events = Vec::new();
    for expected in [2u8, 1] {
        place_on_car(&mut game, ObstacleKind::Barrier);
        game.step(&Intent::default(), DT);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().lives, Some(expected));
        events.extend(game.drain_events());
    }
    assert!(events.contains(&GameEvent::LifeLost { remaining: 1 }));

    place_on_car(&mut game, ObstacleKind::Barrier);
    game.step(&Intent::default(), DT);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.state().lives, Some(0));
    assert_eq!(count_game_overs(&game.drain_events()), 1);
}

#[test]
fn test_pause_freezes_the_road() {
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    game.start(3);
    drive_clear(&mut game, Intent::accelerate(), 30);

    assert!(game.pause());
    let distance = game.hud().distance;
    let fuel = game.state().fuel.current();
    for _ in 0..100 {
        game.step(&Intent::accelerate(), DT);
    }
    assert_eq!(game.hud().distance, distance);
    assert_eq!(game.state().fuel.current(), fuel);

    assert!(game.resume());
    drive_clear(&mut game, Intent::accelerate(), 1);
    assert!(game.hud().distance > distance);
}

#[test]
fn test_exit_to_menu_after_game_over() {
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    assert!(!game.exit_to_menu());
    game.start(3);
    assert!(!game.exit_to_menu());

    place_on_car(&mut game, ObstacleKind::RockBig);
    game.step(&Intent::default(), DT);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(game.exit_to_menu());
    assert_eq!(game.phase(), GamePhase::Menu);
}

#[test]
fn test_same_seed_same_run() {
    let mut a = new_game(Tuning::classic(), MemoryStore::new());
    let mut b = new_game(Tuning::classic(), MemoryStore::new());
    a.start(99);
    b.start(99);

    for i in 0..600 {
        let intent = Intent {
            accelerate: i % 7 != 0,
            steer_left: i % 90 < 30,
            steer_right: i % 90 > 60,
            ..Default::default()
        };
        a.step(&intent, DT);
        b.step(&intent, DT);
    }

    assert_eq!(a.render_view(), b.render_view());
    assert_eq!(a.hud(), b.hud());
    assert_eq!(a.drain_events(), b.drain_events());
}

#[test]
fn test_traffic_appears() {
    let mut game = new_game(Tuning::classic(), MemoryStore::new());
    game.start(5);
    // Two seconds of cruising is at least one spawn interval
    for _ in 0..130 {
        game.step(&Intent::default(), DT);
        if !game.state().entities.is_empty() {
            return;
        }
    }
    panic!("nothing spawned");
}
