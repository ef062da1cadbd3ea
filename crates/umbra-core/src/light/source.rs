//! Individual light sources
//!
//! Lighting, dousing and refuelling are triggered by external inventory code;
//! aging is driven by the manager each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::LightConfig;
use crate::rng::GameRng;

/// Unique identifier for light sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightId(pub u32);

impl LightId {
    /// Id of a source not yet handed to a manager
    pub const NONE: LightId = LightId(0);

    pub fn next(self) -> Self {
        LightId(self.0 + 1)
    }
}

/// Kinds of light source
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum LightType {
    Match,
    Candle,
    Torch,
    Fireplace,
    Flashlight,
    Lantern,
}

/// Static properties of a light type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProperties {
    /// Burn time from full fuel; None for permanent sources
    pub max_duration: Option<f32>,
    pub base_radius: f32,
    pub base_intensity: f32,
    /// Destroyed when fuel runs out
    pub consumable: bool,
    /// Accepts `add_fuel`
    pub refuelable: bool,
    /// Affected by power flickers
    pub electric: bool,
}

impl LightType {
    pub fn properties(self) -> LightProperties {
        match self {
            LightType::Match => LightProperties {
                max_duration: Some(20.0),
                base_radius: 3.0,
                base_intensity: 0.6,
                consumable: true,
                refuelable: false,
                electric: false,
            },
            LightType::Candle => LightProperties {
                max_duration: Some(180.0),
                base_radius: 4.0,
                base_intensity: 0.7,
                consumable: true,
                refuelable: false,
                electric: false,
            },
            LightType::Torch => LightProperties {
                max_duration: Some(300.0),
                base_radius: 6.0,
                base_intensity: 1.0,
                consumable: true,
                refuelable: false,
                electric: false,
            },
            LightType::Fireplace => LightProperties {
                max_duration: None,
                base_radius: 8.0,
                base_intensity: 1.0,
                consumable: false,
                refuelable: false,
                electric: false,
            },
            LightType::Flashlight => LightProperties {
                max_duration: Some(600.0),
                base_radius: 10.0,
                base_intensity: 1.2,
                consumable: false,
                refuelable: true,
                electric: true,
            },
            LightType::Lantern => LightProperties {
                max_duration: Some(1800.0),
                base_radius: 7.0,
                base_intensity: 0.9,
                consumable: false,
                refuelable: true,
                electric: false,
            },
        }
    }

    pub fn is_permanent(self) -> bool {
        self.properties().max_duration.is_none()
    }

    pub fn is_consumable(self) -> bool {
        self.properties().consumable
    }
}

/// Fuel fraction under which a source starts to dim
const LOW_FUEL: f32 = 0.25;
/// Intensity multiplier while the flicker flag is set
const FLICKER_DIM: f32 = 0.7;
/// Fuel floor used when scaling flicker frequency
const MIN_FLICKER_FUEL: f32 = 0.05;

/// What happened to a source during one aging step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeOutcome {
    /// Fuel reached zero this step
    pub burned_out: bool,
    /// The source is now permanently consumed
    pub consumed: bool,
    pub flicker_toggled: bool,
}

/// A light-emitting entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub id: LightId,
    pub kind: LightType,
    pub position: Vec3,
    lit: bool,
    /// Remaining fuel, 1.0 (full) to 0.0 (empty)
    fuel: f32,
    intensity: f32,
    radius: f32,
    consumed: bool,
    flickering: bool,
    /// Accumulated wear, 0.0 (new) to 1.0 (worn out)
    degradation: f32,
    base_radius: f32,
}

impl LightSource {
    /// Create an unlit source with full fuel.
    pub fn new(kind: LightType, position: Vec3) -> Self {
        let mut source = Self {
            id: LightId::NONE,
            kind,
            position,
            lit: false,
            fuel: 1.0,
            intensity: 0.0,
            radius: 0.0,
            consumed: false,
            flickering: false,
            degradation: 0.0,
            base_radius: kind.properties().base_radius,
        };
        source.refresh();
        source
    }

    /// Create a source that is already burning.
    pub fn lit(kind: LightType, position: Vec3) -> Self {
        let mut source = Self::new(kind, position);
        source.light();
        source
    }

    /// Override the type's base radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.base_radius = radius.max(0.0);
        self.refresh();
        self
    }

    /// Light the source. Returns false if it is already lit, consumed or empty.
    pub fn light(&mut self) -> bool {
        if self.consumed || self.lit {
            return false;
        }
        if !self.kind.is_permanent() && self.fuel <= 0.0 {
            return false;
        }
        self.lit = true;
        self.refresh();
        true
    }

    /// Put the source out. Returns false if it was not lit.
    pub fn extinguish(&mut self) -> bool {
        if !self.lit {
            return false;
        }
        self.lit = false;
        self.flickering = false;
        self.refresh();
        true
    }

    /// Add fuel as a fraction of a full load.
    ///
    /// Returns false for consumed, permanent or non-refuelable sources, for
    /// non-positive amounts, and when the tank is already full.
    pub fn add_fuel(&mut self, amount: f32) -> bool {
        let props = self.kind.properties();
        if self.consumed || !props.refuelable || props.max_duration.is_none() {
            return false;
        }
        if !(amount > 0.0) || self.fuel >= 1.0 {
            return false;
        }
        self.fuel = (self.fuel + amount).min(1.0);
        self.refresh();
        true
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn is_flickering(&self) -> bool {
        self.flickering
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn degradation(&self) -> f32 {
        self.degradation
    }

    /// Current intensity; zero while unlit.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Current effective radius; zero while unlit.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Burn time left at the current fuel level. None for permanent sources.
    pub fn fuel_remaining_seconds(&self) -> Option<f32> {
        self.kind
            .properties()
            .max_duration
            .map(|duration| duration * self.fuel)
    }

    /// True if `point` lies within the current effective radius of a lit source.
    pub fn illuminates(&self, point: Vec3) -> bool {
        self.lit && self.position.distance(point) <= self.radius
    }

    /// Light contributed at `point`: inverse-square falloff floored at 10% of
    /// this source's peak. Zero outside the radius or while unlit.
    pub fn contribution_at(&self, point: Vec3, falloff: f32) -> f32 {
        if !self.lit {
            return 0.0;
        }
        let distance = self.position.distance(point);
        if distance > self.radius {
            return 0.0;
        }
        let peak = self.intensity;
        let value = peak / (1.0 + falloff * distance * distance);
        value.max(peak * 0.1)
    }

    /// Age by `dt`: burn fuel, wear, and roll the flicker state.
    pub fn age(&mut self, dt: f32, config: &LightConfig, rng: &mut GameRng) -> AgeOutcome {
        let mut outcome = AgeOutcome::default();
        if !self.lit || dt <= 0.0 {
            return outcome;
        }

        let props = self.kind.properties();
        if let Some(duration) = props.max_duration {
            self.fuel = (self.fuel - dt / duration).max(0.0);
        }
        self.degradation = (self.degradation + dt * config.degradation_rate).min(1.0);

        if self.fuel <= 0.0 && props.max_duration.is_some() {
            self.lit = false;
            self.flickering = false;
            outcome.burned_out = true;
            if props.consumable {
                self.consumed = true;
                outcome.consumed = true;
            }
            self.refresh();
            return outcome;
        }

        let flicker_p = config.flicker_rate * dt / self.fuel.max(MIN_FLICKER_FUEL);
        if rng.chance(flicker_p) {
            self.flickering = !self.flickering;
            outcome.flicker_toggled = true;
        }

        self.refresh();
        outcome
    }

    /// Force the flicker flag on (power surge).
    pub(crate) fn force_flicker(&mut self) {
        if self.lit {
            self.flickering = true;
            self.refresh();
        }
    }

    fn fuel_scale(&self) -> f32 {
        if self.kind.is_permanent() || self.fuel >= LOW_FUEL {
            1.0
        } else {
            0.5 + 2.0 * self.fuel
        }
    }

    /// Recompute intensity and radius from fuel, wear and flicker.
    fn refresh(&mut self) {
        if !self.lit {
            self.intensity = 0.0;
            self.radius = 0.0;
            return;
        }
        let props = self.kind.properties();
        let scale = self.fuel_scale();
        let flicker = if self.flickering { FLICKER_DIM } else { 1.0 };
        self.intensity = props.base_intensity * scale * (1.0 - 0.5 * self.degradation) * flicker;
        self.radius = self.base_radius * scale * (1.0 - 0.25 * self.degradation);
    }
}
