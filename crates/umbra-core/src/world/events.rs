//! Outward horror/relief events
//!
//! The core never computes health, sanity or fear. It reports discrete named
//! events that an external survival layer consumes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::light::{LightId, LightType};
use crate::monster::{MonsterId, MonsterKind};
use crate::rooms::RoomId;

/// A discrete event raised during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum HorrorEvent {
    /// A dormant monster was seen for the first time since it last vanished
    MonsterSpotted { monster: MonsterId, kind: MonsterKind },
    /// A monster broke into a chase
    MonsterChasing { monster: MonsterId },
    /// Contact damage from an attacking monster
    MonsterAttacked { monster: MonsterId, damage: u32 },
    /// A monster finished despawning
    MonsterVanished { monster: MonsterId },
    /// Darkness has lasted half of the activation threshold
    GrueStirring,
    /// The grue became active
    GrueAwakened,
    /// The active grue came within warning distance
    GrueApproaching { distance: f32 },
    /// The grue was driven off by light
    GrueRetreated,
    /// Terminal: the grue reached the player. Raised at most once.
    PlayerCaught,
    /// The player's position became protected after being dark
    LightRestored,
    /// The player's position stopped being protected
    DarknessFell,
    /// A light source ran out of fuel
    LightBurnedOut { light: LightId, kind: LightType },
    /// Random power flicker on an electric light
    PowerFlicker { light: LightId },
    /// A light went out on its own
    LightSnuffed { light: LightId },
    /// A room's content was silently replaced
    RoomShifted { room: RoomId },
    /// A room was generated in view for the first time
    RoomDiscovered { room: RoomId },
}

impl HorrorEvent {
    /// Stable snake_case name for the event kind.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Whether this event ends the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HorrorEvent::PlayerCaught)
    }

    /// Whether this event relieves the player rather than threatening them.
    pub fn is_beneficial(&self) -> bool {
        matches!(
            self,
            HorrorEvent::LightRestored
                | HorrorEvent::GrueRetreated
                | HorrorEvent::RoomDiscovered { .. }
        )
    }
}

/// Buffer of events raised since the last drain.
///
/// A bounded log keeps only the newest `limit` events, so a caller that never
/// drains it holds a fixed amount of memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<HorrorEvent>,
    limit: Option<usize>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that drops its oldest event once `limit` are buffered.
    pub fn bounded(limit: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(limit),
            limit: Some(limit),
        }
    }

    pub fn push(&mut self, event: HorrorEvent) {
        log::trace!("event: {:?}", event);
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            if self.events.len() >= limit {
                self.events.pop_front();
            }
        }
        self.events.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = HorrorEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<HorrorEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HorrorEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, event: &HorrorEvent) -> bool {
        self.events.contains(event)
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
