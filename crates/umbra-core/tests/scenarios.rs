use std::collections::HashSet;

use glam::Vec3;
use umbra_core::config::{LightConfig, MonsterConfig, RoomConfig, SimConfig, VisionConfig};
use umbra_core::hazard::GrueState;
use umbra_core::light::{LightManager, LightSource, LightType};
use umbra_core::monster::{BehaviorState, MonsterKind, MonsterManager};
use umbra_core::rooms::{RoomId, RoomManager};
use umbra_core::vision::ViewCone;
use umbra_core::world::{EventLog, Pose};
use umbra_core::{GameMode, GameOverCause, GameRng, HorrorEvent, Simulation, TickInput};

fn calm() -> SimConfig {
    SimConfig {
        lights: LightConfig::calm(),
        ..SimConfig::default()
    }
}

/// Calm lights and a grue that never wakes, for tests about other systems.
fn no_grue() -> SimConfig {
    let mut config = calm();
    config.grue.activation_threshold = f32::MAX;
    config
}

fn cone(position: Vec3, facing: Vec3) -> ViewCone {
    ViewCone::new(Pose::new(position, facing), &VisionConfig::default())
}

// ============================================================================
// Rooms
// ============================================================================

#[test]
fn test_room_regenerates_exactly_once_per_unobserved_stretch() {
    let mut sim = Simulation::new(no_grue(), 11);
    sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 0.1));
    let room = sim.rooms().room_in_cell((0, 2)).expect("room ahead");
    let (id, center) = (room.id, room.center);

    for _ in 0..12 {
        sim.tick(TickInput::new(Vec3::ZERO, Vec3::NEG_Z, 1.0));
    }
    let room = sim.rooms().get(id).expect("still live");
    assert_eq!(room.id, id);
    assert_eq!(room.center, center);
    assert_eq!(room.regeneration_count, 1);

    // Looking back starts a new stretch.
    sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 0.1));
    for _ in 0..6 {
        sim.tick(TickInput::new(Vec3::ZERO, Vec3::NEG_Z, 1.0));
    }
    let room = sim.rooms().get(id).expect("still live");
    assert_eq!(room.regeneration_count, 2);
    assert_eq!(room.center, center);

    let shifted = sim
        .drain_events()
        .into_iter()
        .filter(|e| *e == HorrorEvent::RoomShifted { room: id })
        .count();
    assert_eq!(shifted, 2);
}

#[test]
fn test_occupied_room_is_neither_evicted_nor_regenerated() {
    // An eviction distance shorter than the player's offset from the center.
    let mut rooms = RoomManager::new(RoomConfig::default(), 1.0);
    let mut events = EventLog::new();
    rooms.update(&cone(Vec3::ZERO, Vec3::Z), 0.0, 0.1, &mut events);
    let home = rooms.room_in_cell((0, 0)).map(|r| r.id).expect("home room");

    let inside = Vec3::new(0.0, 0.0, 3.0);
    for i in 1..=15 {
        rooms.update(&cone(inside, Vec3::Z), f64::from(i), 1.0, &mut events);
    }

    let room = rooms.get(home).expect("occupied room kept");
    assert!(room.player_occupied);
    assert_eq!(room.regeneration_count, 0);
    assert_eq!(rooms.room_at(inside).map(|r| r.id), Some(home));
}

#[test]
fn test_room_grid_stays_unique_while_wandering() {
    let mut sim = Simulation::new(no_grue(), 4);
    let mut pose = Pose::default();
    let mut highest = RoomId::NONE;
    let mut seen_ids = HashSet::new();
    for step in 0..400 {
        pose.turn(if step % 50 < 25 { 0.15 } else { -0.1 });
        pose.advance(0.8);
        sim.tick(TickInput::from_pose(pose, 0.1));

        let cells: HashSet<_> = sim.rooms().rooms().map(|r| r.cell).collect();
        assert_eq!(cells.len(), sim.rooms().len());
        assert!(sim.rooms().len() <= sim.config().rooms.max_rooms);

        for room in sim.rooms().rooms() {
            if seen_ids.insert(room.id) {
                assert!(room.id > highest, "ids are never reused");
                highest = room.id;
            }
        }
    }
}

// ============================================================================
// Light & protection
// ============================================================================

#[test]
fn test_protection_follows_radius_and_ambient() {
    let mut lights = LightManager::new(LightConfig::calm(), GameRng::new(1));
    let torch = lights.add_source(LightSource::lit(LightType::Torch, Vec3::ZERO));
    lights.update(0.0);
    let radius = lights.source(torch).map(LightSource::radius).expect("torch active");
    assert!(radius > 0.0);

    assert!(lights.is_protected(Vec3::new(radius - 0.05, 0.0, 0.0)));
    assert!(!lights.is_protected(Vec3::new(0.0, 0.0, radius + 0.05)));
    assert!(lights.ambient() < lights.config().sufficient_ambient);

    lights.set_ambient(0.6);
    assert!(lights.is_protected(Vec3::new(500.0, 0.0, 500.0)));
}

#[test]
fn test_match_in_darkness() {
    let mut sim = Simulation::new(calm(), 8);
    let here = TickInput::new(Vec3::ZERO, Vec3::Z, 0.5);

    // Six units of darkness: the grue is already hunting.
    for _ in 0..12 {
        sim.tick(here);
    }
    assert_eq!(sim.grue().state(), GrueState::Active);
    assert!((sim.grue().darkness_time() - 6.0).abs() < 1e-4);
    assert!(!sim.mode().is_over());
    assert!(sim.drain_events().contains(&HorrorEvent::GrueAwakened));

    sim.add_light(LightType::Match, Vec3::ZERO, true);
    let report = sim.tick(here);
    assert!(report.protected);
    assert!(report.events.contains(&HorrorEvent::LightRestored));
    assert!(report.events.contains(&HorrorEvent::GrueRetreated));
    assert_eq!(sim.grue().state(), GrueState::Dormant);
    assert_eq!(sim.grue().darkness_time(), 0.0);
    assert!(sim.grue().position().distance(Vec3::ZERO) > 100.0);

    // Burn the match down.
    let mut burned_out = false;
    for _ in 0..60 {
        let report = sim.tick(here);
        if report
            .events
            .iter()
            .any(|e| matches!(e, HorrorEvent::LightBurnedOut { kind: LightType::Match, .. }))
        {
            burned_out = true;
            assert!(!report.protected);
            assert!(report.events.contains(&HorrorEvent::DarknessFell));
            break;
        }
        assert!(report.protected);
        assert_eq!(sim.grue().state(), GrueState::Dormant);
    }
    assert!(burned_out);
    assert!(sim.lights().is_empty(), "consumed match is removed");

    for _ in 0..8 {
        sim.tick(here);
    }
    assert!(!sim.grue().is_active());
    for _ in 0..4 {
        sim.tick(here);
    }
    assert!(sim.grue().is_active());
    assert!(sim.drain_events().contains(&HorrorEvent::GrueAwakened));
}

// ============================================================================
// Grue
// ============================================================================

#[test]
fn test_grue_activation_threshold() {
    let mut sim = Simulation::new(calm(), 2);
    sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 4.99));
    assert!(!sim.grue().is_active());
    sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 0.02));
    assert!(sim.grue().is_active());
}

#[test]
fn test_grue_deactivates_on_next_protected_tick() {
    let mut sim = Simulation::new(calm(), 2);
    sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 6.0));
    assert!(sim.grue().is_active());

    sim.add_light(LightType::Lantern, Vec3::ZERO, true);
    let report = sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 0.1));
    assert_eq!(sim.grue().state(), GrueState::Dormant);
    assert_eq!(sim.grue().darkness_time(), 0.0);
    assert!(report.events.contains(&HorrorEvent::GrueRetreated));
    assert_eq!(sim.mode(), GameMode::Playing);
}

#[test]
fn test_grue_catch_ends_the_game() {
    let mut config = calm();
    config.grue.min_spawn_distance = 2.0;
    config.grue.max_spawn_distance = 2.0;
    let mut sim = Simulation::new(config, 6);
    sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 5.0));
    for _ in 0..10 {
        sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 0.5));
    }
    assert!(sim.grue().has_killed());
    assert_eq!(sim.mode(), GameMode::GameOver(GameOverCause::CaughtByGrue));

    // Nothing advances after the game is over.
    let before = sim.now();
    let report = sim.tick(TickInput::new(Vec3::ZERO, Vec3::Z, 1.0));
    assert!(!report.advanced);
    assert_eq!(sim.now(), before);
    let caught = sim
        .drain_events()
        .into_iter()
        .filter(|e| *e == HorrorEvent::PlayerCaught)
        .count();
    assert_eq!(caught, 1);
}

// ============================================================================
// Look-based monsters
// ============================================================================

fn lone_watcher(position: Vec3) -> MonsterManager {
    let mut monsters = MonsterManager::new(MonsterConfig::default(), GameRng::new(21));
    monsters.spawn(MonsterKind::Watcher, position);
    monsters
}

fn state_of(monsters: &MonsterManager) -> BehaviorState {
    monsters.monsters().next().map(|m| m.state()).expect("one monster")
}

#[test]
fn test_monster_observation_loop() {
    let mut monsters = lone_watcher(Vec3::new(0.0, 0.0, 30.0));
    let mut events = EventLog::new();
    let mut now = 0.0;
    let mut tick = |monsters: &mut MonsterManager, view: &ViewCone, events: &mut EventLog| {
        now += 0.25;
        monsters.update(view, now, 0.25, events);
    };

    let watching = cone(Vec3::ZERO, Vec3::Z);
    tick(&mut monsters, &watching, &mut events);
    assert_eq!(state_of(&monsters), BehaviorState::Spawning);
    tick(&mut monsters, &watching, &mut events);
    assert_eq!(state_of(&monsters), BehaviorState::Spawning);
    tick(&mut monsters, &watching, &mut events);
    assert_eq!(state_of(&monsters), BehaviorState::Stalking);

    // Step up to it: inside chase distance on the very next evaluation.
    let close = cone(Vec3::new(0.0, 0.0, 25.0), Vec3::Z);
    tick(&mut monsters, &close, &mut events);
    assert_eq!(state_of(&monsters), BehaviorState::Chasing);

    for _ in 0..4 {
        tick(&mut monsters, &close, &mut events);
    }
    assert_eq!(state_of(&monsters), BehaviorState::Attacking);
    assert!(events.iter().any(|e| matches!(e, HorrorEvent::MonsterAttacked { .. })));

    // Flee far away and look the other way.
    let fled = cone(Vec3::new(0.0, 0.0, -20.0), Vec3::NEG_Z);
    let mut saw_searching = false;
    for _ in 0..60 {
        tick(&mut monsters, &fled, &mut events);
        saw_searching |= state_of(&monsters) == BehaviorState::Searching;
        if state_of(&monsters) == BehaviorState::Dormant {
            break;
        }
    }
    assert!(saw_searching);
    assert_eq!(state_of(&monsters), BehaviorState::Dormant);
    assert!(events.iter().any(|e| matches!(e, HorrorEvent::MonsterVanished { .. })));
}

#[test]
fn test_monster_respawns_dormant_in_band() {
    let config = MonsterConfig::default();
    let mut monsters = lone_watcher(Vec3::new(0.0, 0.0, 40.0));
    let mut events = EventLog::new();
    let watching = cone(Vec3::ZERO, Vec3::Z);
    let away = cone(Vec3::ZERO, Vec3::NEG_Z);

    monsters.update(&watching, 0.25, 0.25, &mut events);
    assert_eq!(state_of(&monsters), BehaviorState::Spawning);

    let mut now = 0.25;
    for _ in 0..200 {
        now += 0.25;
        monsters.update(&away, now, 0.25, &mut events);
        if state_of(&monsters) == BehaviorState::Dormant {
            break;
        }
    }
    assert_eq!(state_of(&monsters), BehaviorState::Dormant);
    let monster = monsters.monsters().next().expect("one monster");
    let distance = monster.position().length();
    assert!(distance >= config.min_spawn_distance - 1e-3);
    assert!(distance <= config.max_spawn_distance + 1e-3);
    assert!(!away.sees(monster.position()));
    assert_eq!(monster.last_observed_at(), None);
}

#[test]
fn test_same_seed_replays_identically() {
    let run = |seed| {
        let mut sim = Simulation::new(SimConfig::default(), seed);
        let mut pose = Pose::default();
        for step in 0..120 {
            pose.turn(0.05 * (step % 7) as f32);
            pose.advance(0.3);
            sim.tick(TickInput::from_pose(pose, 0.1));
        }
        (sim.snapshot(), sim.drain_events())
    };
    assert_eq!(run(17), run(17));
}
