//! Simulation configuration
//!
//! All thresholds live in immutable structs handed to each component at
//! construction, so scenarios and tests can vary them independently. Every
//! struct deserializes with `#[serde(default)]`, so a config file only needs
//! the fields it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::world::ConfigError;

/// View cone parameters shared by rooms and monsters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Targets farther than this are never visible
    pub max_view_distance: f32,
    /// Minimum dot product between facing and target direction (0.5 = ~120° cone)
    pub cone_threshold: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            max_view_distance: 50.0,
            cone_threshold: 0.5,
        }
    }
}

/// Room spawning, regeneration and eviction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Distance between candidate room centers
    pub grid_spacing: f32,
    /// Candidate cells extend this many cells on each side of the player's cell
    pub grid_radius: i32,
    /// Hard cap on active rooms
    pub max_rooms: usize,
    /// Unobserved time after which an unoccupied room regenerates
    pub regeneration_threshold: f32,
    /// Rooms farther than `eviction_factor * max_view_distance` are evicted
    pub eviction_factor: f32,
    /// Chance for each of the four walls to get a door
    pub door_probability: f32,
    /// Chance for a generated door to be locked
    pub locked_door_probability: f32,
    /// Base world seed mixed into every cell seed
    pub world_seed: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            grid_spacing: 20.0,
            grid_radius: 3,
            max_rooms: 40,
            regeneration_threshold: 5.0,
            eviction_factor: 1.5,
            door_probability: 0.6,
            locked_door_probability: 0.2,
            world_seed: 0x5EED_0F_D00D,
        }
    }
}

/// Light manager parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Hard cap on active sources; further additions are dropped
    pub max_sources: usize,
    /// Ambient level above which every position counts as protected
    pub sufficient_ambient: f32,
    /// Ambient level with no lit sources
    pub base_ambient: f32,
    /// Ambient gained per lit source
    pub ambient_per_source: f32,
    /// Upper bound of the ambient target
    pub ambient_max: f32,
    /// Ambient level change per time-unit while drifting toward the target
    pub ambient_drift_rate: f32,
    /// Inverse-square falloff coefficient for `light_level_at`
    pub falloff: f32,
    /// Flicker toggle rate per time-unit at full fuel
    pub flicker_rate: f32,
    /// Quality lost per time-unit while lit
    pub degradation_rate: f32,
    /// Enables the random atmosphere events below
    pub random_events: bool,
    /// Per time-unit chance of a power flicker on an electric light
    pub power_flicker_chance: f32,
    /// Per time-unit chance for a burning light to go out on its own
    pub snuff_chance: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            max_sources: 32,
            sufficient_ambient: 0.5,
            base_ambient: 0.05,
            ambient_per_source: 0.02,
            ambient_max: 0.4,
            ambient_drift_rate: 0.1,
            falloff: 0.15,
            flicker_rate: 0.05,
            degradation_rate: 0.0005,
            random_events: true,
            power_flicker_chance: 0.002,
            snuff_chance: 0.0005,
        }
    }
}

impl LightConfig {
    /// Deterministic configuration: no flicker and no random events.
    pub fn calm() -> Self {
        Self {
            flicker_rate: 0.0,
            random_events: false,
            ..Self::default()
        }
    }
}

/// Darkness hazard parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrueConfig {
    /// Continuous darkness needed before the grue activates
    pub activation_threshold: f32,
    /// Movement speed while hunting
    pub speed: f32,
    /// Distance at which the player is caught
    pub contact_distance: f32,
    pub min_spawn_distance: f32,
    pub max_spawn_distance: f32,
    /// Minimum distance kept from any lit source
    pub light_clearance: f32,
    /// Distance at which `GrueApproaching` is raised
    pub warning_distance: f32,
    /// Tries to find an unprotected spawn point before settling
    pub spawn_attempts: u32,
    /// Parking spot far outside the playable area
    pub hidden_position: Vec3,
}

impl Default for GrueConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 5.0,
            speed: 2.5,
            contact_distance: 1.0,
            min_spawn_distance: 12.0,
            max_spawn_distance: 20.0,
            light_clearance: 2.0,
            warning_distance: 6.0,
            spawn_attempts: 8,
            hidden_position: Vec3::new(10_000.0, -1_000.0, 10_000.0),
        }
    }
}

/// Look-based monster parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Monsters created by `MonsterManager::populate`
    pub max_monsters: usize,
    /// Spawning animation length
    pub spawn_delay: f32,
    pub chase_distance: f32,
    pub attack_distance: f32,
    /// Unobserved time that drops a stalker into searching
    pub stalk_unobserved_limit: f32,
    /// Unobserved time that drops a chaser into searching
    pub aggression_cooldown: f32,
    /// Unobserved time that drops an attacker into searching
    pub attack_unobserved_limit: f32,
    /// Unobserved time that sends a searcher into despawning
    pub despawn_threshold: f32,
    /// Despawning animation length
    pub despawn_delay: f32,
    /// Minimum time between contact damage ticks
    pub attack_cooldown: f32,
    pub min_spawn_distance: f32,
    pub max_spawn_distance: f32,
    pub stalk_speed: f32,
    pub chase_speed: f32,
    pub attack_speed: f32,
    pub search_speed: f32,
    pub despawn_speed: f32,
    /// Distance of the stalking orbit point from the player
    pub orbit_radius: f32,
    /// Angular speed of the stalking orbit, radians per time-unit
    pub orbit_rate: f32,
    /// Wander radius around the last-seen player position
    pub search_radius: f32,
    /// Tries to find an out-of-view respawn point before settling
    pub respawn_attempts: u32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            max_monsters: 3,
            spawn_delay: 0.5,
            chase_distance: 15.0,
            attack_distance: 2.0,
            stalk_unobserved_limit: 1.0,
            aggression_cooldown: 3.0,
            attack_unobserved_limit: 0.5,
            despawn_threshold: 5.0,
            despawn_delay: 1.0,
            attack_cooldown: 1.0,
            min_spawn_distance: 20.0,
            max_spawn_distance: 40.0,
            stalk_speed: 2.0,
            chase_speed: 5.0,
            attack_speed: 5.0,
            search_speed: 2.5,
            despawn_speed: 1.0,
            orbit_radius: 18.0,
            orbit_rate: 0.3,
            search_radius: 6.0,
            respawn_attempts: 8,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub vision: VisionConfig,
    pub rooms: RoomConfig,
    pub lights: LightConfig,
    pub grue: GrueConfig,
    pub monsters: MonsterConfig,
}

impl SimConfig {
    /// Load and validate a JSON config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Distance beyond which unoccupied rooms are evicted.
    pub fn eviction_distance(&self) -> f32 {
        self.vision.max_view_distance * self.rooms.eviction_factor
    }

    /// Reject configurations that would make the state machines meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vision;
        require_positive("vision.max_view_distance", v.max_view_distance)?;
        if !(-1.0..1.0).contains(&v.cone_threshold) {
            return Err(ConfigError::invalid(
                "vision.cone_threshold",
                format!("{} is outside -1.0..1.0", v.cone_threshold),
            ));
        }

        let r = &self.rooms;
        require_positive("rooms.grid_spacing", r.grid_spacing)?;
        if r.grid_radius < 0 {
            return Err(ConfigError::invalid("rooms.grid_radius", "must not be negative"));
        }
        require_positive("rooms.regeneration_threshold", r.regeneration_threshold)?;
        require_positive("rooms.eviction_factor", r.eviction_factor)?;
        require_probability("rooms.door_probability", r.door_probability)?;
        require_probability("rooms.locked_door_probability", r.locked_door_probability)?;

        let l = &self.lights;
        require_non_negative("lights.sufficient_ambient", l.sufficient_ambient)?;
        require_non_negative("lights.base_ambient", l.base_ambient)?;
        require_non_negative("lights.ambient_drift_rate", l.ambient_drift_rate)?;
        require_non_negative("lights.falloff", l.falloff)?;
        require_non_negative("lights.flicker_rate", l.flicker_rate)?;
        require_probability("lights.power_flicker_chance", l.power_flicker_chance)?;
        require_probability("lights.snuff_chance", l.snuff_chance)?;

        let g = &self.grue;
        require_positive("grue.activation_threshold", g.activation_threshold)?;
        require_non_negative("grue.speed", g.speed)?;
        require_positive("grue.contact_distance", g.contact_distance)?;
        require_range(
            "grue.max_spawn_distance",
            g.min_spawn_distance,
            g.max_spawn_distance,
        )?;

        let m = &self.monsters;
        require_positive("monsters.chase_distance", m.chase_distance)?;
        require_positive("monsters.attack_distance", m.attack_distance)?;
        if m.attack_distance >= m.chase_distance {
            return Err(ConfigError::invalid(
                "monsters.attack_distance",
                "must be smaller than chase_distance",
            ));
        }
        require_non_negative("monsters.spawn_delay", m.spawn_delay)?;
        require_non_negative("monsters.despawn_delay", m.despawn_delay)?;
        require_positive("monsters.despawn_threshold", m.despawn_threshold)?;
        require_range(
            "monsters.max_spawn_distance",
            m.min_spawn_distance,
            m.max_spawn_distance,
        )?;

        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} must be positive", value)))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} must not be negative", value)))
    }
}

fn require_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} is not a probability", value)))
    }
}

fn require_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    require_non_negative(field, min)?;
    if max.is_finite() && max >= min {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("range {}..{} is empty", min, max),
        ))
    }
}
