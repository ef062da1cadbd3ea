//! The grue: a darkness hazard
//!
//! Accumulates time while the player's position is unprotected, wakes once
//! the darkness has lasted long enough, hunts the player, and is driven back
//! to dormancy the moment the player's position is lit again.

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::GrueConfig;
use crate::light::LightManager;
use crate::rng::GameRng;
use crate::world::{EventLog, HorrorEvent, offset_on_ground};

/// Grue behavior state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum GrueState {
    /// Hidden, no darkness accumulated
    #[default]
    Dormant,
    /// Darkness is accumulating at the player's position
    Activating,
    /// Hunting the player
    Active,
}

/// Inputs to the grue transition function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrueInputs {
    pub protected: bool,
    /// Darkness accumulated including this tick
    pub darkness: f32,
    pub activation_threshold: f32,
}

impl GrueState {
    /// Pure transition function.
    pub fn next(self, inputs: GrueInputs) -> GrueState {
        if inputs.protected {
            return GrueState::Dormant;
        }
        match self {
            GrueState::Active => GrueState::Active,
            GrueState::Dormant | GrueState::Activating => {
                if inputs.darkness >= inputs.activation_threshold {
                    GrueState::Active
                } else if inputs.darkness > 0.0 {
                    GrueState::Activating
                } else {
                    self
                }
            }
        }
    }
}

/// The singleton darkness hazard.
#[derive(Debug, Clone)]
pub struct Grue {
    config: GrueConfig,
    state: GrueState,
    darkness_time: f32,
    position: Vec3,
    last_known_player: Vec3,
    has_killed: bool,
    stirred: bool,
    warned: bool,
    rng: GameRng,
}

impl Grue {
    pub fn new(config: GrueConfig, rng: GameRng) -> Self {
        Self {
            position: config.hidden_position,
            config,
            state: GrueState::Dormant,
            darkness_time: 0.0,
            last_known_player: Vec3::ZERO,
            has_killed: false,
            stirred: false,
            warned: false,
            rng,
        }
    }

    pub fn state(&self) -> GrueState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == GrueState::Active
    }

    pub fn darkness_time(&self) -> f32 {
        self.darkness_time
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn has_killed(&self) -> bool {
        self.has_killed
    }

    pub fn config(&self) -> &GrueConfig {
        &self.config
    }

    /// Advance by `dt` given the player's position and the current lights.
    ///
    /// The grue only starts moving on the tick after it wakes.
    pub fn update(&mut self, player: Vec3, lights: &LightManager, dt: f32, events: &mut EventLog) {
        let was_active = self.state == GrueState::Active;
        let protected = lights.is_protected(player);
        if !protected {
            self.darkness_time += dt;
            self.last_known_player = player;
        }

        let next = self.state.next(GrueInputs {
            protected,
            darkness: self.darkness_time,
            activation_threshold: self.config.activation_threshold,
        });
        if next != self.state {
            self.enter(next, lights, events);
        }

        if self.state == GrueState::Activating
            && !self.stirred
            && self.darkness_time >= self.config.activation_threshold * 0.5
        {
            self.stirred = true;
            events.push(HorrorEvent::GrueStirring);
        }

        if was_active && self.state == GrueState::Active {
            self.hunt(lights, dt, events);
        }
    }

    /// On-enter actions for each state.
    fn enter(&mut self, next: GrueState, lights: &LightManager, events: &mut EventLog) {
        let previous = self.state;
        self.state = next;
        match next {
            GrueState::Dormant => {
                self.darkness_time = 0.0;
                self.position = self.config.hidden_position;
                self.stirred = false;
                self.warned = false;
                if previous == GrueState::Active {
                    info!("grue driven back by light");
                    events.push(HorrorEvent::GrueRetreated);
                } else {
                    debug!("darkness reset before the grue woke");
                }
            }
            GrueState::Activating => {
                debug!("darkness accumulating at the player's position");
            }
            GrueState::Active => {
                self.position = self.choose_spawn_point(lights);
                info!(
                    "grue awakened after {:.2} of darkness at {:?}",
                    self.darkness_time, self.position
                );
                events.push(HorrorEvent::GrueAwakened);
            }
        }
    }

    /// Random point in the spawn band around the player, preferring darkness.
    fn choose_spawn_point(&mut self, lights: &LightManager) -> Vec3 {
        let origin = self.last_known_player;
        let mut candidate = offset_on_ground(origin, 0.0, self.config.max_spawn_distance);
        for _ in 0..self.config.spawn_attempts.max(1) {
            let bearing = self.rng.angle();
            let distance = self
                .rng
                .range_f32(self.config.min_spawn_distance, self.config.max_spawn_distance);
            candidate = offset_on_ground(origin, bearing, distance);
            if !lights.is_protected(candidate) {
                return candidate;
            }
        }
        candidate
    }

    fn hunt(&mut self, lights: &LightManager, dt: f32, events: &mut EventLog) {
        let target = self.last_known_player;
        let offset = target - self.position;
        let distance = offset.length();
        if distance > f32::EPSILON {
            let step = (self.config.speed * dt).min(distance);
            self.position += offset / distance * step;
        }

        let distance = self.position.distance(target);
        if distance < self.config.contact_distance && !self.has_killed {
            self.has_killed = true;
            info!("the grue caught the player");
            events.push(HorrorEvent::PlayerCaught);
        }
        if !self.warned && distance < self.config.warning_distance {
            self.warned = true;
            events.push(HorrorEvent::GrueApproaching { distance });
        }

        for source in lights.lit_sources() {
            let away = self.position - source.position;
            let gap = away.length();
            if gap < self.config.light_clearance {
                let direction = if gap > f32::EPSILON { away / gap } else { Vec3::X };
                self.position += direction * (self.config.light_clearance - gap);
            }
        }
    }
}
