//! Environmental hazards driven by light and darkness.

mod grue;

pub use grue::{Grue, GrueInputs, GrueState};
