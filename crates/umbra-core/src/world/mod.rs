//! World-level primitives shared by every system: poses, the simulation
//! clock, outward events and configuration errors.

mod clock;
mod errors;
mod events;
mod pose;

pub use clock::{SimClock, SimTime, sanitize_dt};
pub use errors::ConfigError;
pub use events::{EventLog, HorrorEvent};
pub use pose::{Pose, heading_to_facing, offset_on_ground, position_from_slice};
