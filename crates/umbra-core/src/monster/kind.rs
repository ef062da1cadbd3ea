//! Monster kinds and their static stats

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Unique identifier for monster instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const NONE: MonsterId = MonsterId(0);

    pub fn next(self) -> Self {
        MonsterId(self.0 + 1)
    }
}

/// Kinds of look-based monster
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum MonsterKind {
    /// Tall and patient; the baseline stalker
    Watcher,
    /// Fast, weak, hard to keep in view
    Shade,
    /// Slow but hits hard
    Mannequin,
    /// The most dangerous of the four
    Hollow,
}

/// Static stats for a monster kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterStats {
    /// 1 (unsettling) to 3 (lethal)
    pub threat_level: u8,
    /// Multiplies every state speed
    pub speed_multiplier: f32,
    /// Damage reported per contact tick while attacking
    pub contact_damage: u32,
    pub appearance: &'static str,
}

impl MonsterKind {
    pub fn stats(self) -> MonsterStats {
        match self {
            MonsterKind::Watcher => MonsterStats {
                threat_level: 1,
                speed_multiplier: 1.0,
                contact_damage: 5,
                appearance: "a gaunt figure standing too still at the edge of sight",
            },
            MonsterKind::Shade => MonsterStats {
                threat_level: 2,
                speed_multiplier: 1.3,
                contact_damage: 8,
                appearance: "a smear of darker dark that slides along the walls",
            },
            MonsterKind::Mannequin => MonsterStats {
                threat_level: 2,
                speed_multiplier: 0.8,
                contact_damage: 12,
                appearance: "a jointed dress form whose pose changes when you blink",
            },
            MonsterKind::Hollow => MonsterStats {
                threat_level: 3,
                speed_multiplier: 1.1,
                contact_damage: 15,
                appearance: "something wearing a coat, with nothing inside it",
            },
        }
    }

    /// Relative spawn weights used when populating the world
    pub const SPAWN_WEIGHTS: [(MonsterKind, u32); 4] = [
        (MonsterKind::Watcher, 40),
        (MonsterKind::Shade, 25),
        (MonsterKind::Mannequin, 20),
        (MonsterKind::Hollow, 15),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_has_weight() {
        for kind in MonsterKind::iter() {
            assert!(
                MonsterKind::SPAWN_WEIGHTS
                    .iter()
                    .any(|(k, w)| *k == kind && *w > 0)
            );
        }
    }

    #[test]
    fn test_stats_are_sane() {
        for kind in MonsterKind::iter() {
            let stats = kind.stats();
            assert!((1..=3).contains(&stats.threat_level));
            assert!(stats.speed_multiplier > 0.0);
            assert!(stats.contact_damage > 0);
            assert!(!stats.appearance.is_empty());
        }
    }
}
