//! A single look-based monster
//!
//! Each update evaluates the pure transition table, runs the on-enter action
//! for any new state, then moves toward the state's target.

use glam::Vec3;
use log::{debug, info};

use super::behavior::{BehaviorInputs, BehaviorState};
use super::kind::{MonsterId, MonsterKind};
use crate::config::MonsterConfig;
use crate::rng::GameRng;
use crate::vision::ViewCone;
use crate::world::{EventLog, HorrorEvent, SimTime, offset_on_ground};

/// Distance at which a wander or drift target counts as reached
const ARRIVAL_DISTANCE: f32 = 0.5;

/// Per-tick observer context shared by every monster
#[derive(Debug, Clone, Copy)]
pub struct MonsterTick<'a> {
    pub cone: &'a ViewCone,
    pub now: SimTime,
    pub dt: f32,
}

impl MonsterTick<'_> {
    fn player(&self) -> Vec3 {
        self.cone.pose.position
    }
}

/// A monster that only acts on whether the player is looking at it.
#[derive(Debug, Clone)]
pub struct LookBasedMonster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    state: BehaviorState,
    behavior_started_at: SimTime,
    last_observed_at: Option<SimTime>,
    position: Vec3,
    target: Vec3,
    spawn_position: Vec3,
    active_time: f32,
    last_attack_at: Option<SimTime>,
    last_seen_player: Vec3,
    orbit_angle: f32,
}

impl LookBasedMonster {
    /// A dormant monster waiting at `position`.
    pub fn new(id: MonsterId, kind: MonsterKind, position: Vec3) -> Self {
        Self {
            id,
            kind,
            state: BehaviorState::Dormant,
            behavior_started_at: 0.0,
            last_observed_at: None,
            position,
            target: position,
            spawn_position: position,
            active_time: 0.0,
            last_attack_at: None,
            last_seen_player: position,
            orbit_angle: 0.0,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    /// Time spent outside `Dormant` since the last respawn
    pub fn active_time(&self) -> f32 {
        self.active_time
    }

    pub fn last_observed_at(&self) -> Option<SimTime> {
        self.last_observed_at
    }

    pub fn last_attack_at(&self) -> Option<SimTime> {
        self.last_attack_at
    }

    pub fn behavior_started_at(&self) -> SimTime {
        self.behavior_started_at
    }

    /// Time since last observed at `now`; infinite if never observed.
    pub fn unobserved_for(&self, now: SimTime) -> f32 {
        match self.last_observed_at {
            Some(seen) => (now - seen).max(0.0) as f32,
            None => f32::INFINITY,
        }
    }

    /// Advance one tick.
    pub fn update(
        &mut self,
        tick: &MonsterTick<'_>,
        config: &MonsterConfig,
        rng: &mut GameRng,
        events: &mut EventLog,
    ) {
        let visibility = tick.cone.query(self.position);
        if visibility.in_view {
            self.last_observed_at = Some(tick.now);
            self.last_seen_player = tick.player();
        }

        let inputs = BehaviorInputs {
            observed: visibility.in_view,
            distance: visibility.distance,
            unobserved_for: self.unobserved_for(tick.now),
            time_in_state: (tick.now - self.behavior_started_at).max(0.0) as f32,
        };
        let next = self.state.next(inputs, config);
        self.enter(next, tick, config, rng, events);

        if self.state.is_active() {
            self.active_time += tick.dt;
        }

        self.steer(tick, config, rng);
        let speed = self.state.speed(config) * self.kind.stats().speed_multiplier;
        self.position = move_towards(self.position, self.target, speed * tick.dt);

        if self.state == BehaviorState::Attacking {
            self.strike(tick, config, events);
        }
    }

    /// On-enter actions. Re-entering the current state does nothing.
    fn enter(
        &mut self,
        next: BehaviorState,
        tick: &MonsterTick<'_>,
        config: &MonsterConfig,
        rng: &mut GameRng,
        events: &mut EventLog,
    ) {
        let previous = self.state;
        if next == previous {
            return;
        }
        self.state = next;
        self.behavior_started_at = tick.now;
        debug!("monster {} ({}): {} -> {}", self.id.0, self.kind, previous, next);

        match next {
            BehaviorState::Dormant => {
                self.position = out_of_view_point(tick.cone, config, rng);
                self.target = self.position;
                self.spawn_position = self.position;
                self.last_observed_at = None;
                self.last_attack_at = None;
                self.active_time = 0.0;
                events.push(HorrorEvent::MonsterVanished { monster: self.id });
            }
            BehaviorState::Spawning => {
                info!("{} {} spotted at {:?}", self.kind, self.id.0, self.position);
                events.push(HorrorEvent::MonsterSpotted {
                    monster: self.id,
                    kind: self.kind,
                });
            }
            BehaviorState::Stalking => {
                let offset = self.position - tick.player();
                self.orbit_angle = offset.x.atan2(offset.z);
            }
            BehaviorState::Chasing => {
                if previous != BehaviorState::Attacking {
                    events.push(HorrorEvent::MonsterChasing { monster: self.id });
                }
            }
            BehaviorState::Attacking => {}
            BehaviorState::Searching => {
                self.target = self.wander_point(config, rng);
            }
            BehaviorState::Despawning => {
                self.target = self.position;
            }
        }
    }

    /// Pick this tick's movement target.
    fn steer(&mut self, tick: &MonsterTick<'_>, config: &MonsterConfig, rng: &mut GameRng) {
        match self.state {
            BehaviorState::Dormant | BehaviorState::Spawning => {
                self.target = self.position;
            }
            BehaviorState::Stalking => {
                self.orbit_angle += config.orbit_rate * tick.dt;
                self.target = offset_on_ground(tick.player(), self.orbit_angle, config.orbit_radius);
            }
            BehaviorState::Chasing | BehaviorState::Attacking => {
                self.target = tick.player();
            }
            BehaviorState::Searching => {
                if self.position.distance(self.target) < ARRIVAL_DISTANCE {
                    self.target = self.wander_point(config, rng);
                }
            }
            BehaviorState::Despawning => {
                // Erratic drift: a fresh short hop in a random direction each tick.
                self.target = offset_on_ground(self.position, rng.angle(), rng.range_f32(0.5, 2.0));
            }
        }
    }

    fn wander_point(&self, config: &MonsterConfig, rng: &mut GameRng) -> Vec3 {
        let distance = rng.range_f32(0.0, config.search_radius);
        offset_on_ground(self.last_seen_player, rng.angle(), distance)
    }

    fn strike(&mut self, tick: &MonsterTick<'_>, config: &MonsterConfig, events: &mut EventLog) {
        if self.position.distance(tick.player()) > config.attack_distance {
            return;
        }
        let ready = self
            .last_attack_at
            .is_none_or(|at| tick.now - at >= f64::from(config.attack_cooldown));
        if ready {
            self.last_attack_at = Some(tick.now);
            events.push(HorrorEvent::MonsterAttacked {
                monster: self.id,
                damage: self.kind.stats().contact_damage,
            });
        }
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: BehaviorState, now: SimTime) {
        self.state = state;
        self.behavior_started_at = now;
    }
}

/// Step from `from` toward `to` by at most `step`, never overshooting.
pub fn move_towards(from: Vec3, to: Vec3, step: f32) -> Vec3 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= step || distance <= f32::EPSILON {
        to
    } else if step <= 0.0 {
        from
    } else {
        from + offset / distance * step
    }
}

/// Random point in the respawn band around the observer, preferring one the
/// observer cannot see. Falls back to a point directly behind them.
pub fn out_of_view_point(cone: &ViewCone, config: &MonsterConfig, rng: &mut GameRng) -> Vec3 {
    let origin = cone.pose.position;
    for _ in 0..config.respawn_attempts {
        let bearing = rng.angle();
        let distance = rng.range_f32(config.min_spawn_distance, config.max_spawn_distance);
        let candidate = offset_on_ground(origin, bearing, distance);
        if !cone.sees(candidate) {
            return candidate;
        }
    }
    let behind = cone.pose.heading() + std::f32::consts::PI;
    let distance = rng.range_f32(config.min_spawn_distance, config.max_spawn_distance);
    offset_on_ground(origin, behind, distance)
}
