//! Seeded room content generation
//!
//! The same seed always yields the same content, so a room's look is fixed
//! by its grid cell and regeneration count.

use glam::Vec3;
use strum::IntoEnumIterator;

use super::room::{
    Cell, Door, DoorDirection, EnvironmentFlags, Room, RoomId, RoomPhase, RoomType, Theme,
    describe,
};
use crate::config::RoomConfig;
use crate::rng::{GameRng, mix_seed};

/// Chance an unlocked door is found ajar
const OPEN_DOOR_CHANCE: f32 = 0.3;
/// Chance of one extra rare feature
const RARE_FEATURE_CHANCE: f32 = 0.25;

/// Content seed for `cell` after `generation` regenerations.
pub fn content_seed(world_seed: u64, cell: Cell, generation: u32) -> u64 {
    let cell_seed = mix_seed(world_seed, i64::from(cell.0), i64::from(cell.1));
    if generation == 0 {
        cell_seed
    } else {
        mix_seed(cell_seed, i64::from(generation), 0)
    }
}

/// World-space center of a grid cell
pub fn cell_center(cell: Cell, spacing: f32) -> Vec3 {
    Vec3::new(cell.0 as f32 * spacing, 0.0, cell.1 as f32 * spacing)
}

/// Largest cell index on either axis; positions beyond it share the edge cell.
pub const MAX_CELL: i32 = 1 << 24;

/// Grid cell containing `position`
pub fn cell_of(position: Vec3, spacing: f32) -> Cell {
    let axis = |v: f32| ((v / spacing).round() as i32).clamp(-MAX_CELL, MAX_CELL);
    (axis(position.x), axis(position.z))
}

/// Generated content for one room generation
#[derive(Debug, Clone, PartialEq)]
pub struct RoomContent {
    pub room_type: RoomType,
    pub theme: Theme,
    pub dimensions: Vec3,
    pub items: Vec<String>,
    pub documents: Vec<String>,
    pub features: EnvironmentFlags,
    pub doors: Vec<Door>,
    pub description: String,
}

/// Generate content for a room at `center` from `seed`.
pub fn generate(seed: u64, center: Vec3, config: &RoomConfig) -> RoomContent {
    let mut rng = GameRng::new(seed);

    let room_type = rng
        .choose_weighted(&RoomType::WEIGHTS)
        .copied()
        .unwrap_or_default();
    let theme = rng.choose_weighted(&Theme::WEIGHTS).copied().unwrap_or_default();
    let dimensions = room_type.dimensions();

    let item_count = 1 + rng.rn2(4) as usize;
    let items = pick_names(&mut rng, room_type.item_pool(), item_count);
    let document_count = 1 + rng.rn2(3) as usize;
    let documents = pick_names(&mut rng, room_type.document_pool(), document_count);

    let mut features = room_type.features() | theme.features();
    if rng.chance(RARE_FEATURE_CHANCE) {
        if let Some(extra) = rng.choose(&EnvironmentFlags::RARE) {
            features |= *extra;
        }
    }

    let doors = generate_doors(&mut rng, center, dimensions, theme, config);

    RoomContent {
        room_type,
        theme,
        dimensions,
        items,
        documents,
        features,
        doors,
        description: describe(room_type, theme),
    }
}

fn pick_names(rng: &mut GameRng, pool: &[&str], count: usize) -> Vec<String> {
    rng.pick_distinct(pool, count)
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn generate_doors(
    rng: &mut GameRng,
    center: Vec3,
    dimensions: Vec3,
    theme: Theme,
    config: &RoomConfig,
) -> Vec<Door> {
    let mut doors = Vec::new();
    for direction in DoorDirection::iter() {
        if !rng.chance(config.door_probability) {
            continue;
        }
        let (dx, dz) = direction.delta();
        let step = Vec3::new(dx as f32, 0.0, dz as f32);
        let wall = step * dimensions * 0.5;
        let locked = rng.chance(config.locked_door_probability);
        let required_key = locked.then(|| {
            format!(
                "{}_key_{}",
                theme.to_string().to_lowercase(),
                direction.to_string().to_lowercase()
            )
        });
        doors.push(Door {
            name: direction,
            position: center + wall,
            target: center + step * config.grid_spacing,
            open: !locked && rng.chance(OPEN_DOOR_CHANCE),
            locked,
            required_key,
        });
    }
    doors
}

impl Room {
    /// Create a room in `cell` with its first generation of content.
    pub fn generate(id: RoomId, cell: Cell, config: &RoomConfig) -> Self {
        let center = cell_center(cell, config.grid_spacing);
        let seed = content_seed(config.world_seed, cell, 0);
        let content = generate(seed, center, config);
        Self {
            id,
            cell,
            center,
            dimensions: content.dimensions,
            room_type: content.room_type,
            theme: content.theme,
            doors: content.doors,
            items: content.items,
            documents: content.documents,
            features: content.features,
            seed,
            description: content.description,
            player_occupied: false,
            last_observed_at: None,
            unobserved_time: 0.0,
            regeneration_count: 0,
            phase: RoomPhase::Unobserved,
        }
    }

    /// Replace all content in place. Id, cell and center are untouched.
    pub fn regenerate(&mut self, config: &RoomConfig) {
        self.regeneration_count += 1;
        self.seed = content_seed(config.world_seed, self.cell, self.regeneration_count);
        let content = generate(self.seed, self.center, config);
        self.dimensions = content.dimensions;
        self.room_type = content.room_type;
        self.theme = content.theme;
        self.doors = content.doors;
        self.items = content.items;
        self.documents = content.documents;
        self.features = content.features;
        self.description = content.description;
        self.unobserved_time = 0.0;
        self.phase = RoomPhase::Regenerated;
    }
}
