//! Owns every look-based monster and drives them each tick.

use log::debug;

use super::behavior::BehaviorState;
use super::kind::{MonsterId, MonsterKind};
use super::stalker::{LookBasedMonster, MonsterTick, out_of_view_point};
use crate::config::MonsterConfig;
use crate::rng::GameRng;
use crate::vision::ViewCone;
use crate::world::{EventLog, SimTime};

#[derive(Debug, Clone)]
pub struct MonsterManager {
    config: MonsterConfig,
    monsters: Vec<LookBasedMonster>,
    next_id: MonsterId,
    rng: GameRng,
}

impl MonsterManager {
    pub fn new(config: MonsterConfig, rng: GameRng) -> Self {
        Self {
            config,
            monsters: Vec::new(),
            next_id: MonsterId::NONE,
            rng,
        }
    }

    pub fn config(&self) -> &MonsterConfig {
        &self.config
    }

    /// Fill up to `max_monsters` with dormant monsters placed out of view.
    /// Returns how many were created.
    pub fn populate(&mut self, cone: &ViewCone) -> usize {
        let mut created = 0;
        while self.monsters.len() < self.config.max_monsters {
            let kind = self
                .rng
                .choose_weighted(&MonsterKind::SPAWN_WEIGHTS)
                .copied()
                .unwrap_or(MonsterKind::Watcher);
            let position = out_of_view_point(cone, &self.config, &mut self.rng);
            if self.spawn(kind, position).is_none() {
                break;
            }
            created += 1;
        }
        created
    }

    /// Place a dormant monster. Returns `None` when the population is full.
    pub fn spawn(&mut self, kind: MonsterKind, position: glam::Vec3) -> Option<MonsterId> {
        if self.monsters.len() >= self.config.max_monsters {
            debug!("monster cap {} reached, {} not spawned", self.config.max_monsters, kind);
            return None;
        }
        self.next_id = self.next_id.next();
        let id = self.next_id;
        debug!("{} {} waiting at {:?}", kind, id.0, position);
        self.monsters.push(LookBasedMonster::new(id, kind, position));
        Some(id)
    }

    /// Update every monster against the player's view cone.
    pub fn update(&mut self, cone: &ViewCone, now: SimTime, dt: f32, events: &mut EventLog) {
        let tick = MonsterTick { cone, now, dt };
        for monster in &mut self.monsters {
            monster.update(&tick, &self.config, &mut self.rng, events);
        }
    }

    pub fn monsters(&self) -> impl Iterator<Item = &LookBasedMonster> {
        self.monsters.iter()
    }

    pub fn get(&self, id: MonsterId) -> Option<&LookBasedMonster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut LookBasedMonster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Number of monsters currently in `state`
    pub fn count_in(&self, state: BehaviorState) -> usize {
        self.monsters.iter().filter(|m| m.state() == state).count()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisionConfig;
    use crate::world::{HorrorEvent, Pose};
    use glam::Vec3;

    fn cone(facing: Vec3) -> ViewCone {
        ViewCone::new(Pose::new(Vec3::ZERO, facing), &VisionConfig::default())
    }

    fn manager() -> MonsterManager {
        MonsterManager::new(MonsterConfig::default(), GameRng::new(77))
    }

    #[test]
    fn test_populate_respects_cap_and_hides_monsters() {
        let mut monsters = manager();
        let forward = cone(Vec3::Z);
        assert_eq!(monsters.populate(&forward), 3);
        assert_eq!(monsters.populate(&forward), 0);
        assert_eq!(monsters.len(), 3);
        for monster in monsters.monsters() {
            assert_eq!(monster.state(), BehaviorState::Dormant);
            assert!(!forward.sees(monster.position()));
        }
    }

    #[test]
    fn test_spawn_ids_are_unique() {
        let mut monsters = manager();
        let a = monsters.spawn(MonsterKind::Shade, Vec3::new(0.0, 0.0, 30.0));
        let b = monsters.spawn(MonsterKind::Hollow, Vec3::new(0.0, 0.0, -30.0));
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);
        assert_eq!(monsters.get(b.unwrap_or(MonsterId::NONE)).map(|m| m.kind), Some(MonsterKind::Hollow));
    }

    #[test]
    fn test_spawn_over_cap_is_dropped() {
        let mut monsters = manager();
        for _ in 0..3 {
            assert!(monsters.spawn(MonsterKind::Watcher, Vec3::new(0.0, 0.0, -30.0)).is_some());
        }
        assert!(monsters.spawn(MonsterKind::Watcher, Vec3::new(0.0, 0.0, -30.0)).is_none());
        assert_eq!(monsters.len(), 3);
    }

    #[test]
    fn test_update_forwards_events() {
        let mut monsters = manager();
        monsters.spawn(MonsterKind::Watcher, Vec3::new(0.0, 0.0, 25.0));
        monsters.spawn(MonsterKind::Watcher, Vec3::new(0.0, 0.0, -25.0));
        let mut events = EventLog::new();
        monsters.update(&cone(Vec3::Z), 0.1, 0.1, &mut events);

        assert_eq!(monsters.count_in(BehaviorState::Spawning), 1);
        assert_eq!(monsters.count_in(BehaviorState::Dormant), 1);
        assert!(events.contains(&HorrorEvent::MonsterSpotted {
            monster: MonsterId(1),
            kind: MonsterKind::Watcher,
        }));
    }
}
