//! The simulation facade
//!
//! Owns the clock and every system and advances them in a fixed order once
//! per tick: clock, lights, rooms, monsters, grue, then the game mode reacts
//! to what happened.

use glam::Vec3;
use log::{debug, warn};
use serde::Serialize;

use crate::config::SimConfig;
use crate::game_state::{GameMode, GameOverCause};
use crate::hazard::{Grue, GrueState};
use crate::light::{LightId, LightManager, LightSource, LightTickReport, LightType};
use crate::monster::{BehaviorState, MonsterId, MonsterKind, MonsterManager};
use crate::rng::{GameRng, mix_seed};
use crate::rooms::{Cell, RoomId, RoomManager, RoomPhase, RoomTickReport, RoomType, Theme};
use crate::vision::ViewCone;
use crate::world::{EventLog, HorrorEvent, Pose, SimClock, SimTime, sanitize_dt};

/// Per-subsystem stream ids mixed into the simulation seed
const LIGHT_STREAM: i64 = 1;
const MONSTER_STREAM: i64 = 2;
const GRUE_STREAM: i64 = 3;
const ROOM_STREAM: i64 = 4;

/// Events kept for `drain_events`; older ones are dropped if nobody drains
pub const EVENT_BACKLOG: usize = 256;

/// Player input for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub position: Vec3,
    /// Need not be normalized
    pub facing: Vec3,
    /// Elapsed time; negative or NaN is treated as 0
    pub dt: f32,
}

impl TickInput {
    pub fn new(position: Vec3, facing: Vec3, dt: f32) -> Self {
        Self {
            position,
            facing,
            dt,
        }
    }

    pub fn from_pose(pose: Pose, dt: f32) -> Self {
        Self::new(pose.position, pose.facing, dt)
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub now: SimTime,
    /// Step actually applied after sanitizing
    pub dt: f32,
    pub mode: GameMode,
    /// False when the mode was not `Playing` and nothing advanced
    pub advanced: bool,
    pub protected: bool,
    pub light_level: f32,
    pub lights: LightTickReport,
    pub rooms: RoomTickReport,
    pub events: Vec<HorrorEvent>,
}

/// Read-only view of the whole world for renderers and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub now: SimTime,
    pub ticks: u64,
    pub mode: GameMode,
    pub player: PlayerSnapshot,
    pub rooms: Vec<RoomSnapshot>,
    pub lights: Vec<LightSnapshot>,
    pub monsters: Vec<MonsterSnapshot>,
    pub grue: GrueSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    pub facing: Vec3,
    pub heading: f32,
    pub protected: bool,
    pub light_level: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub cell: Cell,
    pub center: Vec3,
    pub room_type: RoomType,
    pub theme: Theme,
    pub phase: RoomPhase,
    pub regeneration_count: u32,
    pub player_occupied: bool,
    pub doors: usize,
    pub items: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightSnapshot {
    pub id: LightId,
    pub kind: LightType,
    pub position: Vec3,
    pub lit: bool,
    pub fuel: f32,
    pub radius: f32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonsterSnapshot {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub state: BehaviorState,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrueSnapshot {
    pub state: GrueState,
    pub darkness_time: f32,
    pub position: Vec3,
    pub has_killed: bool,
}

/// The whole observation-gated world.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    seed: u64,
    clock: SimClock,
    mode: GameMode,
    pose: Pose,
    lights: LightManager,
    rooms: RoomManager,
    monsters: MonsterManager,
    grue: Grue,
    events: EventLog,
    was_protected: Option<bool>,
    populated: bool,
}

impl Simulation {
    /// Build a simulation in `Playing` mode. Every random stream is derived
    /// from `seed`, so equal seeds and inputs give equal runs.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut room_config = config.rooms;
        room_config.world_seed = mix_seed(config.rooms.world_seed, ROOM_STREAM, seed as i64);

        let mut mode = GameMode::default();
        mode.start();

        Self {
            lights: LightManager::new(config.lights, GameRng::new(mix_seed(seed, LIGHT_STREAM, 0))),
            rooms: RoomManager::new(room_config, config.eviction_distance()),
            monsters: MonsterManager::new(
                config.monsters,
                GameRng::new(mix_seed(seed, MONSTER_STREAM, 0)),
            ),
            grue: Grue::new(config.grue, GameRng::new(mix_seed(seed, GRUE_STREAM, 0))),
            config,
            seed,
            clock: SimClock::new(),
            mode,
            pose: Pose::default(),
            events: EventLog::bounded(EVENT_BACKLOG),
            was_protected: None,
            populated: false,
        }
    }

    /// Advance every system by one tick.
    pub fn tick(&mut self, input: TickInput) -> TickReport {
        if !(input.dt.is_finite() && input.dt >= 0.0) {
            warn!("invalid tick step {}, treating as 0", input.dt);
        }
        self.pose = Pose::new(input.position, input.facing);

        if !self.mode.is_playing() {
            return TickReport {
                now: self.clock.now(),
                mode: self.mode,
                protected: self.lights.is_protected(self.pose.position),
                light_level: self.lights.light_level_at(self.pose.position),
                ..TickReport::default()
            };
        }

        let dt = self.clock.advance(sanitize_dt(input.dt));
        let now = self.clock.now();
        let mut events = EventLog::new();

        let lights = self.lights.update(dt);
        self.forward_light_events(&lights, &mut events);
        let protected = self.lights.is_protected(self.pose.position);
        match self.was_protected {
            Some(false) if protected => events.push(HorrorEvent::LightRestored),
            Some(true) if !protected => events.push(HorrorEvent::DarknessFell),
            _ => {}
        }
        self.was_protected = Some(protected);

        let cone = ViewCone::new(self.pose, &self.config.vision);
        let rooms = self.rooms.update(&cone, now, dt, &mut events);

        if !self.populated {
            let placed = self.monsters.populate(&cone);
            debug!("placed {} dormant monsters", placed);
            self.populated = true;
        }
        self.monsters.update(&cone, now, dt, &mut events);

        self.grue.update(self.pose.position, &self.lights, dt, &mut events);

        if events.contains(&HorrorEvent::PlayerCaught) {
            self.mode.end(GameOverCause::CaughtByGrue);
        }

        let emitted = events.drain();
        self.events.extend(emitted.iter().cloned());

        TickReport {
            now,
            dt,
            mode: self.mode,
            advanced: true,
            protected,
            light_level: self.lights.light_level_at(self.pose.position),
            lights,
            rooms,
            events: emitted,
        }
    }

    fn forward_light_events(&self, report: &LightTickReport, events: &mut EventLog) {
        for (light, kind) in &report.burned_out {
            events.push(HorrorEvent::LightBurnedOut {
                light: *light,
                kind: *kind,
            });
        }
        for light in &report.power_flickers {
            events.push(HorrorEvent::PowerFlicker { light: *light });
        }
        for light in &report.snuffed {
            events.push(HorrorEvent::LightSnuffed { light: *light });
        }
    }

    /// Take the events emitted since the last drain, oldest first.
    ///
    /// Each tick's events are also returned in its `TickReport`; callers that
    /// read the report need never drain, as only the newest `EVENT_BACKLOG`
    /// events are retained.
    pub fn drain_events(&mut self) -> Vec<HorrorEvent> {
        self.events.drain()
    }

    /// Queue a light source; it joins the world at the start of the next tick.
    pub fn add_light(&mut self, kind: LightType, position: Vec3, lit: bool) -> LightId {
        let source = if lit {
            LightSource::lit(kind, position)
        } else {
            LightSource::new(kind, position)
        };
        self.lights.add_source(source)
    }

    pub fn remove_light(&mut self, id: LightId) {
        self.lights.remove_source(id);
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let position = self.pose.position;
        WorldSnapshot {
            now: self.clock.now(),
            ticks: self.clock.ticks(),
            mode: self.mode,
            player: PlayerSnapshot {
                position,
                facing: self.pose.facing,
                heading: self.pose.heading(),
                protected: self.lights.is_protected(position),
                light_level: self.lights.light_level_at(position),
            },
            rooms: self
                .rooms
                .rooms()
                .map(|room| RoomSnapshot {
                    id: room.id,
                    cell: room.cell,
                    center: room.center,
                    room_type: room.room_type,
                    theme: room.theme,
                    phase: room.phase(),
                    regeneration_count: room.regeneration_count,
                    player_occupied: room.player_occupied,
                    doors: room.doors.len(),
                    items: room.items.clone(),
                    description: room.description.clone(),
                })
                .collect(),
            lights: self
                .lights
                .sources()
                .map(|light| LightSnapshot {
                    id: light.id,
                    kind: light.kind,
                    position: light.position,
                    lit: light.is_lit(),
                    fuel: light.fuel(),
                    radius: light.radius(),
                    intensity: light.intensity(),
                })
                .collect(),
            monsters: self
                .monsters
                .monsters()
                .map(|monster| MonsterSnapshot {
                    id: monster.id,
                    kind: monster.kind,
                    state: monster.state(),
                    position: monster.position(),
                })
                .collect(),
            grue: GrueSnapshot {
                state: self.grue.state(),
                darkness_time: self.grue.darkness_time(),
                position: self.grue.position(),
                has_killed: self.grue.has_killed(),
            },
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn mode_mut(&mut self) -> &mut GameMode {
        &mut self.mode
    }

    pub fn lights(&self) -> &LightManager {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightManager {
        &mut self.lights
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn monsters(&self) -> &MonsterManager {
        &self.monsters
    }

    pub fn monsters_mut(&mut self) -> &mut MonsterManager {
        &mut self.monsters
    }

    pub fn grue(&self) -> &Grue {
        &self.grue
    }

    /// True if the player's position is currently protected by light.
    pub fn player_protected(&self) -> bool {
        self.lights.is_protected(self.pose.position)
    }
}
