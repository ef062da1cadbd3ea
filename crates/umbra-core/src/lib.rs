//! umbra-core: observation-gated world simulation
//!
//! The world only changes where the player is not looking. Rooms regenerate
//! once they have been out of view long enough, look-based monsters close in
//! while watched and lose interest when ignored, and the grue hunts anyone
//! who lingers in the dark.
//!
//! Everything runs on a single simulation clock advanced by `Simulation::tick`.
//! The crate does no I/O apart from loading configuration files.

pub mod config;
pub mod game_state;
pub mod hazard;
pub mod light;
pub mod monster;
pub mod rooms;
pub mod simulation;
pub mod vision;
pub mod world;

mod rng;

pub use config::SimConfig;
pub use game_state::{GameMode, GameOverCause};
pub use rng::{GameRng, mix_seed};
pub use simulation::{Simulation, TickInput, TickReport, WorldSnapshot};
pub use vision::is_visible;
pub use world::{ConfigError, HorrorEvent};
