//! Look-based monster behavior states
//!
//! `BehaviorState::next` is the whole transition table. It is pure: movement,
//! relocation and events happen in the monster's on-enter actions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::MonsterConfig;

/// Monster behavior state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum BehaviorState {
    /// Waiting, unseen, at its spawn point
    #[default]
    Dormant,
    /// Playing the spawn animation after first being observed
    Spawning,
    /// Orbiting the player at a distance
    Stalking,
    Chasing,
    Attacking,
    /// Lost sight of the player; wandering near where it last saw them
    Searching,
    /// Playing the despawn animation before returning to dormancy
    Despawning,
}

impl BehaviorState {
    /// True for every state except `Dormant`.
    pub fn is_active(self) -> bool {
        self != BehaviorState::Dormant
    }

    /// Base movement speed in this state, before the kind multiplier.
    pub fn speed(self, config: &MonsterConfig) -> f32 {
        match self {
            BehaviorState::Dormant | BehaviorState::Spawning => 0.0,
            BehaviorState::Stalking => config.stalk_speed,
            BehaviorState::Chasing => config.chase_speed,
            BehaviorState::Attacking => config.attack_speed,
            BehaviorState::Searching => config.search_speed,
            BehaviorState::Despawning => config.despawn_speed,
        }
    }
}

/// Everything the transition function looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorInputs {
    /// Inside the player's view cone this tick
    pub observed: bool,
    /// Distance to the player
    pub distance: f32,
    /// Time since last observed; 0 while observed, infinite if never seen
    pub unobserved_for: f32,
    /// Time spent in the current state
    pub time_in_state: f32,
}

impl BehaviorState {
    /// Pure transition function. Returns `self` when no guard fires.
    pub fn next(self, inputs: BehaviorInputs, config: &MonsterConfig) -> BehaviorState {
        use BehaviorState::*;

        let BehaviorInputs {
            observed,
            distance,
            unobserved_for,
            time_in_state,
        } = inputs;

        match self {
            Dormant => {
                if observed {
                    Spawning
                } else {
                    Dormant
                }
            }
            Spawning => {
                if time_in_state >= config.spawn_delay {
                    Stalking
                } else {
                    Spawning
                }
            }
            Stalking => {
                if distance < config.chase_distance {
                    Chasing
                } else if unobserved_for > config.stalk_unobserved_limit {
                    Searching
                } else {
                    Stalking
                }
            }
            Chasing => {
                if distance < config.attack_distance {
                    Attacking
                } else if unobserved_for > config.aggression_cooldown {
                    Searching
                } else if distance > config.chase_distance * 1.5 {
                    Stalking
                } else {
                    Chasing
                }
            }
            Attacking => {
                if distance > config.attack_distance * 2.0 {
                    Chasing
                } else if unobserved_for > config.attack_unobserved_limit {
                    Searching
                } else {
                    Attacking
                }
            }
            Searching => {
                if observed || distance < config.chase_distance * 0.5 {
                    Chasing
                } else if unobserved_for >= config.despawn_threshold {
                    Despawning
                } else {
                    Searching
                }
            }
            Despawning => {
                if time_in_state >= config.despawn_delay {
                    Dormant
                } else {
                    Despawning
                }
            }
        }
    }
}
