//! Light sources and the protection manager.

mod manager;
mod source;

pub use manager::{LightManager, LightTickReport, PEAK_LIGHT_LEVEL};
pub use source::{AgeOutcome, LightId, LightProperties, LightSource, LightType};
