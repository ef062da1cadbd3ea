//! Room lifecycle manager
//!
//! Each tick scans the live rooms for observation, occupancy and distance,
//! then scans the candidate grid around the player for visible empty cells.
//! Spawns, regenerations and evictions found by the scans are staged and
//! applied together at the end of the tick.

use glam::Vec3;
use hashbrown::HashMap;
use log::{debug, info};

use super::content::{cell_center, cell_of};
use super::room::{Cell, Room, RoomId, RoomPhase, RoomPhaseInputs};
use crate::config::RoomConfig;
use crate::vision::ViewCone;
use crate::world::{EventLog, HorrorEvent, SimTime};

/// What changed during one room update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomTickReport {
    pub spawned: Vec<RoomId>,
    pub regenerated: Vec<RoomId>,
    pub evicted: Vec<RoomId>,
    /// Visible empty cells skipped because the room cap was reached
    pub skipped_at_cap: usize,
}

impl RoomTickReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.regenerated.is_empty() && self.evicted.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RoomManager {
    config: RoomConfig,
    eviction_distance: f32,
    /// Live rooms in ascending id order
    rooms: Vec<Room>,
    cells: HashMap<Cell, RoomId>,
    next_id: RoomId,
}

impl RoomManager {
    /// `eviction_distance` is normally `eviction_factor * max_view_distance`.
    pub fn new(config: RoomConfig, eviction_distance: f32) -> Self {
        Self {
            config,
            eviction_distance,
            rooms: Vec::new(),
            cells: HashMap::new(),
            next_id: RoomId::NONE,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn eviction_distance(&self) -> f32 {
        self.eviction_distance
    }

    /// Advance every room and grow or shrink the live set around the player.
    pub fn update(
        &mut self,
        cone: &ViewCone,
        now: SimTime,
        dt: f32,
        events: &mut EventLog,
    ) -> RoomTickReport {
        let player = cone.pose.position;
        let mut report = RoomTickReport::default();

        let mut to_regenerate = Vec::new();
        let mut to_evict = Vec::new();
        for room in &mut self.rooms {
            let occupied = room.contains(player);
            let visibility = cone.query(room.center);
            room.player_occupied = occupied;

            if visibility.in_view {
                room.unobserved_time = 0.0;
                room.last_observed_at = Some(now);
            } else {
                room.unobserved_time += dt;
            }

            room.phase = room.phase.next(RoomPhaseInputs {
                observed: visibility.in_view,
                occupied,
                unobserved_time: room.unobserved_time,
                regeneration_threshold: self.config.regeneration_threshold,
            });

            if !occupied && visibility.distance > self.eviction_distance {
                to_evict.push(room.id);
            } else if room.phase == RoomPhase::PendingRegeneration {
                to_regenerate.push(room.id);
            }
        }

        let mut to_spawn = Vec::new();
        let (px, pz) = cell_of(player, self.config.grid_spacing);
        let radius = self.config.grid_radius;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let cell = (px.saturating_add(dx), pz.saturating_add(dz));
                if self.cells.contains_key(&cell) {
                    continue;
                }
                if cone.sees(cell_center(cell, self.config.grid_spacing)) {
                    to_spawn.push(cell);
                }
            }
        }

        for id in to_evict {
            if let Some(room) = self.remove(id) {
                debug!("evicted room {} at {:?}", id.0, room.cell);
                report.evicted.push(id);
            }
        }

        for id in to_regenerate {
            if let Some(index) = self.index_of(id) {
                let room = &mut self.rooms[index];
                room.regenerate(&self.config);
                info!(
                    "room {} shifted into a {} ({} times)",
                    id.0, room.room_type, room.regeneration_count
                );
                events.push(HorrorEvent::RoomShifted { room: id });
                report.regenerated.push(id);
            }
        }

        for cell in to_spawn {
            if self.cells.contains_key(&cell) {
                continue;
            }
            if self.rooms.len() >= self.config.max_rooms {
                report.skipped_at_cap += 1;
                continue;
            }
            let id = self.spawn(cell);
            if let Some(room) = self.rooms.last_mut() {
                room.player_occupied = room.contains(player);
                room.last_observed_at = Some(now);
                room.phase = RoomPhase::Observed;
            }
            events.push(HorrorEvent::RoomDiscovered { room: id });
            report.spawned.push(id);
        }
        if report.skipped_at_cap > 0 {
            debug!(
                "room cap {} reached, skipped {} visible cells",
                self.config.max_rooms, report.skipped_at_cap
            );
        }

        report
    }

    fn spawn(&mut self, cell: Cell) -> RoomId {
        self.next_id = self.next_id.next();
        let id = self.next_id;
        let room = Room::generate(id, cell, &self.config);
        debug!("room {} generated in {:?}: {}", id.0, cell, room.description);
        self.cells.insert(cell, id);
        self.rooms.push(room);
        id
    }

    fn remove(&mut self, id: RoomId) -> Option<Room> {
        let index = self.index_of(id)?;
        let room = self.rooms.remove(index);
        self.cells.remove(&room.cell);
        Some(room)
    }

    fn index_of(&self, id: RoomId) -> Option<usize> {
        self.rooms.binary_search_by_key(&id, |r| r.id).ok()
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.index_of(id).and_then(|i| self.rooms.get(i))
    }

    /// Room whose footprint contains `position`
    pub fn room_at(&self, position: Vec3) -> Option<&Room> {
        self.room_in_cell(cell_of(position, self.config.grid_spacing))
            .filter(|room| room.contains(position))
    }

    pub fn room_in_cell(&self, cell: Cell) -> Option<&Room> {
        self.cells.get(&cell).and_then(|id| self.get(*id))
    }

    /// Live rooms in ascending id order
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rooms.len() >= self.config.max_rooms
    }
}
