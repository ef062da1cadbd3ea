//! Room records, types, themes and lifecycle phase
//!
//! A room is pinned to one grid cell for its whole life. Regeneration swaps
//! its content, dimensions and seed but never its id or center.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::world::SimTime;

/// Unique identifier for rooms; monotonic and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub const NONE: RoomId = RoomId(0);

    pub fn next(self) -> Self {
        RoomId(self.0 + 1)
    }
}

/// Grid cell key `(x, z)`
pub type Cell = (i32, i32);

/// Room categories. Drive dimensions, item pools and document pools.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomType {
    /// Long and narrow
    #[default]
    Hallway,
    Bedroom,
    Study,
    Kitchen,
    Library,
    /// Low ceiling, below ground
    Cellar,
    /// Tall nave
    Chapel,
    Nursery,
}

impl RoomType {
    /// Relative generation weights
    pub const WEIGHTS: [(RoomType, u32); 8] = [
        (RoomType::Hallway, 25),
        (RoomType::Bedroom, 15),
        (RoomType::Study, 12),
        (RoomType::Kitchen, 12),
        (RoomType::Library, 10),
        (RoomType::Cellar, 10),
        (RoomType::Chapel, 6),
        (RoomType::Nursery, 10),
    ];

    /// Width (x), height (y) and depth (z). Every room fits inside one grid cell.
    pub fn dimensions(self) -> Vec3 {
        match self {
            RoomType::Hallway => Vec3::new(6.0, 3.0, 16.0),
            RoomType::Bedroom => Vec3::new(10.0, 3.0, 10.0),
            RoomType::Study => Vec3::new(8.0, 3.0, 8.0),
            RoomType::Kitchen => Vec3::new(12.0, 3.0, 10.0),
            RoomType::Library => Vec3::new(16.0, 5.0, 14.0),
            RoomType::Cellar => Vec3::new(14.0, 2.5, 14.0),
            RoomType::Chapel => Vec3::new(14.0, 8.0, 18.0),
            RoomType::Nursery => Vec3::new(9.0, 3.0, 9.0),
        }
    }

    /// Candidate item identifiers
    pub fn item_pool(self) -> &'static [&'static str] {
        match self {
            RoomType::Hallway => &["matchbook", "umbrella", "coat_hook", "candle", "walking_cane"],
            RoomType::Bedroom => &[
                "hand_mirror",
                "music_box",
                "candle",
                "pillow",
                "hairbrush",
                "pocket_watch",
            ],
            RoomType::Study => &[
                "fountain_pen",
                "magnifying_glass",
                "lantern",
                "letter_opener",
                "brass_key",
            ],
            RoomType::Kitchen => &[
                "matchbook",
                "cleaver",
                "tin_can",
                "lantern_oil",
                "rolling_pin",
                "kettle",
            ],
            RoomType::Library => &[
                "candle",
                "reading_glasses",
                "bookend",
                "lantern",
                "ladder_hook",
            ],
            RoomType::Cellar => &[
                "torch",
                "rusted_shovel",
                "wine_bottle",
                "batteries",
                "rope",
                "lantern_oil",
            ],
            RoomType::Chapel => &["candle", "censer", "rosary", "torch", "offering_bowl"],
            RoomType::Nursery => &[
                "porcelain_doll",
                "rocking_horse",
                "flashlight",
                "batteries",
                "wooden_blocks",
            ],
        }
    }

    /// Candidate document identifiers
    pub fn document_pool(self) -> &'static [&'static str] {
        match self {
            RoomType::Hallway => &["torn_notice", "visitor_log", "photograph"],
            RoomType::Bedroom => &["diary_page", "love_letter", "photograph", "prescription"],
            RoomType::Study => &["ledger", "unsent_letter", "map_fragment", "research_notes"],
            RoomType::Kitchen => &["recipe_card", "grocery_list", "newspaper_clipping"],
            RoomType::Library => &[
                "marginalia",
                "catalogue_card",
                "map_fragment",
                "loose_manuscript",
            ],
            RoomType::Cellar => &["inventory_sheet", "scrawled_warning", "newspaper_clipping"],
            RoomType::Chapel => &["hymnal_page", "burial_record", "sermon_notes"],
            RoomType::Nursery => &["child_drawing", "lullaby_sheet", "diary_page"],
        }
    }

    /// Features every room of this type carries
    pub fn features(self) -> EnvironmentFlags {
        match self {
            RoomType::Hallway => EnvironmentFlags::DRAFTY,
            RoomType::Bedroom => EnvironmentFlags::CREAKING_FLOOR,
            RoomType::Study => EnvironmentFlags::STOPPED_CLOCKS,
            RoomType::Kitchen => EnvironmentFlags::DRIPPING_WATER,
            RoomType::Library => EnvironmentFlags::DUSTY,
            RoomType::Cellar => EnvironmentFlags::DAMP | EnvironmentFlags::COLD,
            RoomType::Chapel => EnvironmentFlags::ECHOING,
            RoomType::Nursery => EnvironmentFlags::WHISPERS,
        }
    }

    fn blurb(self) -> &'static str {
        match self {
            RoomType::Hallway => "A corridor that seems longer than it should be.",
            RoomType::Bedroom => "The bed is made, as if someone is expected.",
            RoomType::Study => "Papers lie where they were dropped.",
            RoomType::Kitchen => "Something on the stove went cold long ago.",
            RoomType::Library => "The shelves lean in overhead.",
            RoomType::Cellar => "The ceiling presses down; the walls sweat.",
            RoomType::Chapel => "Pews face an altar with nothing on it.",
            RoomType::Nursery => "A mobile turns slowly without any draft.",
        }
    }
}

/// Cosmetic themes. Affect descriptions and features only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Theme {
    #[default]
    Victorian,
    Abandoned,
    Flooded,
    Overgrown,
    Burned,
    Sterile,
}

impl Theme {
    /// Relative generation weights
    pub const WEIGHTS: [(Theme, u32); 6] = [
        (Theme::Victorian, 30),
        (Theme::Abandoned, 25),
        (Theme::Flooded, 10),
        (Theme::Overgrown, 15),
        (Theme::Burned, 10),
        (Theme::Sterile, 10),
    ];

    pub fn adjective(self) -> &'static str {
        match self {
            Theme::Victorian => "wallpapered",
            Theme::Abandoned => "abandoned",
            Theme::Flooded => "flooded",
            Theme::Overgrown => "overgrown",
            Theme::Burned => "fire-scarred",
            Theme::Sterile => "white-tiled",
        }
    }

    /// Features every room of this theme carries
    pub fn features(self) -> EnvironmentFlags {
        match self {
            Theme::Victorian => EnvironmentFlags::empty(),
            Theme::Abandoned => EnvironmentFlags::DUSTY,
            Theme::Flooded => EnvironmentFlags::DAMP | EnvironmentFlags::DRIPPING_WATER,
            Theme::Overgrown => EnvironmentFlags::DAMP,
            Theme::Burned => EnvironmentFlags::SCORCHED,
            Theme::Sterile => EnvironmentFlags::COLD | EnvironmentFlags::FLICKERING_LIGHTS,
        }
    }
}

bitflags! {
    /// Environmental features of a room
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EnvironmentFlags: u16 {
        const DRAFTY            = 0x0001;
        const DAMP              = 0x0002;
        const COLD              = 0x0004;
        const DUSTY             = 0x0008;
        const CREAKING_FLOOR    = 0x0010;
        const STOPPED_CLOCKS    = 0x0020;
        const DRIPPING_WATER    = 0x0040;
        const ECHOING           = 0x0080;
        const WHISPERS          = 0x0100;
        const SCORCHED          = 0x0200;
        /// Fixtures stutter; cosmetic only, never counts as a light source
        const FLICKERING_LIGHTS = 0x0400;
        const BLOOD_STAINS      = 0x0800;
    }
}

impl EnvironmentFlags {
    /// Features that may appear on any room by chance
    pub const RARE: [EnvironmentFlags; 3] = [
        EnvironmentFlags::BLOOD_STAINS,
        EnvironmentFlags::WHISPERS,
        EnvironmentFlags::COLD,
    ];
}

/// Wall a door sits in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum DoorDirection {
    North,
    South,
    East,
    West,
}

impl DoorDirection {
    /// Unit step on the grid as `(dx, dz)`; north is +Z
    pub fn delta(self) -> Cell {
        match self {
            DoorDirection::North => (0, 1),
            DoorDirection::South => (0, -1),
            DoorDirection::East => (1, 0),
            DoorDirection::West => (-1, 0),
        }
    }
}

/// A door in one of a room's walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub name: DoorDirection,
    /// Point on the room wall
    pub position: Vec3,
    /// Center of the adjoining grid cell
    pub target: Vec3,
    pub open: bool,
    pub locked: bool,
    pub required_key: Option<String>,
}

/// Room lifecycle phase
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomPhase {
    /// In the player's view this tick
    #[default]
    Observed,
    /// Out of view, not yet due for regeneration
    Unobserved,
    /// Due for regeneration at the end of this tick
    PendingRegeneration,
    /// Content replaced; stays here until observed again
    Regenerated,
}

/// Inputs to the room phase transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomPhaseInputs {
    pub observed: bool,
    pub occupied: bool,
    /// Unobserved time including this tick
    pub unobserved_time: f32,
    pub regeneration_threshold: f32,
}

impl RoomPhase {
    /// Pure transition function.
    pub fn next(self, inputs: RoomPhaseInputs) -> RoomPhase {
        if inputs.observed {
            return RoomPhase::Observed;
        }
        match self {
            RoomPhase::Observed | RoomPhase::Unobserved => {
                if !inputs.occupied && inputs.unobserved_time >= inputs.regeneration_threshold {
                    RoomPhase::PendingRegeneration
                } else {
                    RoomPhase::Unobserved
                }
            }
            RoomPhase::PendingRegeneration => RoomPhase::PendingRegeneration,
            RoomPhase::Regenerated => RoomPhase::Regenerated,
        }
    }
}

/// A generated room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub cell: Cell,
    pub center: Vec3,
    pub dimensions: Vec3,
    pub room_type: RoomType,
    pub theme: Theme,
    pub doors: Vec<Door>,
    pub items: Vec<String>,
    pub documents: Vec<String>,
    pub features: EnvironmentFlags,
    /// Content seed for the current generation
    pub seed: u64,
    pub description: String,
    pub player_occupied: bool,
    pub last_observed_at: Option<SimTime>,
    pub unobserved_time: f32,
    pub regeneration_count: u32,
    pub(crate) phase: RoomPhase,
}

impl Room {
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn is_observed(&self) -> bool {
        self.phase == RoomPhase::Observed
    }

    pub fn needs_regeneration(&self) -> bool {
        self.phase == RoomPhase::PendingRegeneration
    }

    /// True if `position` lies inside the footprint on the ground plane.
    pub fn contains(&self, position: Vec3) -> bool {
        let half = self.dimensions * 0.5;
        (position.x - self.center.x).abs() <= half.x
            && (position.z - self.center.z).abs() <= half.z
    }

    pub fn has_feature(&self, flag: EnvironmentFlags) -> bool {
        self.features.contains(flag)
    }

    pub fn locked_doors(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().filter(|d| d.locked)
    }
}

/// One-line description built from type and theme
pub fn describe(room_type: RoomType, theme: Theme) -> String {
    format!(
        "A {} {}. {}",
        theme.adjective(),
        room_type.to_string().to_lowercase(),
        room_type.blurb()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn inputs(observed: bool, occupied: bool, unobserved_time: f32) -> RoomPhaseInputs {
        RoomPhaseInputs {
            observed,
            occupied,
            unobserved_time,
            regeneration_threshold: 5.0,
        }
    }

    #[test]
    fn test_phase_transitions() {
        use RoomPhase::*;
        assert_eq!(Unobserved.next(inputs(true, false, 9.0)), Observed);
        assert_eq!(Observed.next(inputs(false, false, 0.1)), Unobserved);
        assert_eq!(Unobserved.next(inputs(false, false, 4.9)), Unobserved);
        assert_eq!(Unobserved.next(inputs(false, false, 5.0)), PendingRegeneration);
        assert_eq!(Regenerated.next(inputs(false, false, 50.0)), Regenerated);
        assert_eq!(Regenerated.next(inputs(true, false, 0.0)), Observed);
    }

    #[test]
    fn test_occupied_room_never_pending() {
        assert_eq!(
            RoomPhase::Unobserved.next(inputs(false, true, 100.0)),
            RoomPhase::Unobserved
        );
    }

    #[test]
    fn test_rooms_fit_in_cell() {
        for room_type in RoomType::iter() {
            let dims = room_type.dimensions();
            assert!(dims.x < 20.0 && dims.z < 20.0, "{room_type}");
            assert!(!room_type.item_pool().is_empty());
            assert!(room_type.item_pool().len() >= 4);
            assert!(room_type.document_pool().len() >= 3);
        }
    }

    #[test]
    fn test_door_deltas_are_distinct_units() {
        let deltas: Vec<Cell> = DoorDirection::iter().map(DoorDirection::delta).collect();
        for (i, a) in deltas.iter().enumerate() {
            assert_eq!(a.0.abs() + a.1.abs(), 1);
            assert!(!deltas[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_describe_mentions_type() {
        let text = describe(RoomType::Library, Theme::Flooded);
        assert!(text.starts_with("A flooded library."));
    }
}
