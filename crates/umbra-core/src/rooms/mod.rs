//! Shifting rooms
//!
//! Rooms appear in grid cells as the player looks at them and quietly
//! rearrange themselves once the player has looked away for long enough.

mod content;
mod manager;
mod room;

pub use content::{MAX_CELL, RoomContent, cell_center, cell_of, content_seed, generate};
pub use manager::{RoomManager, RoomTickReport};
pub use room::{
    Cell, Door, DoorDirection, EnvironmentFlags, Room, RoomId, RoomPhase, RoomPhaseInputs,
    RoomType, Theme, describe,
};
