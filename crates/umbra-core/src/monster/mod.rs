//! Look-based monsters
//!
//! Monsters that wake when seen, close in while watched, and lose interest
//! once the player has looked away long enough.

mod behavior;
mod kind;
mod manager;
mod stalker;

pub use behavior::{BehaviorInputs, BehaviorState};
pub use kind::{MonsterId, MonsterKind, MonsterStats};
pub use manager::MonsterManager;
pub use stalker::{LookBasedMonster, MonsterTick, move_towards, out_of_view_point};
