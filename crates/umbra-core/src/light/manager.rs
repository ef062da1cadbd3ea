//! Light & protection manager
//!
//! Owns every active light source. Gameplay code may queue additions and
//! removals at any point in a frame; they are only applied at the start of
//! the manager's own update, so the live collection is never mutated while a
//! consumer is iterating or querying it.

use glam::Vec3;
use log::{debug, info};

use super::source::{LightId, LightSource, LightType};
use crate::config::LightConfig;
use crate::rng::GameRng;

/// Light level of a single unobstructed source at full strength.
pub const PEAK_LIGHT_LEVEL: f32 = 1.0;

/// What changed during one manager update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightTickReport {
    /// Pending sources that became active
    pub added: Vec<LightId>,
    /// Pending sources dropped because the cap was reached
    pub dropped: Vec<LightId>,
    /// Sources removed on request or after being consumed
    pub removed: Vec<LightId>,
    /// Sources whose fuel ran out this tick
    pub burned_out: Vec<(LightId, LightType)>,
    pub power_flickers: Vec<LightId>,
    /// Sources that went out on their own
    pub snuffed: Vec<LightId>,
}

/// Owner of all light sources and the ambient light level.
#[derive(Debug, Clone)]
pub struct LightManager {
    config: LightConfig,
    sources: Vec<LightSource>,
    pending_add: Vec<LightSource>,
    pending_remove: Vec<LightId>,
    next_id: LightId,
    ambient: f32,
    rng: GameRng,
}

impl LightManager {
    pub fn new(config: LightConfig, rng: GameRng) -> Self {
        Self {
            ambient: config.base_ambient,
            config,
            sources: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_id: LightId::NONE.next(),
            rng,
        }
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    /// Queue a source for addition and return the id it will carry.
    ///
    /// The source becomes active on the next `update`, unless the active cap is
    /// reached at that point, in which case it is dropped.
    pub fn add_source(&mut self, mut source: LightSource) -> LightId {
        let id = self.next_id;
        self.next_id = id.next();
        source.id = id;
        self.pending_add.push(source);
        id
    }

    /// Queue a source for removal on the next `update`.
    pub fn remove_source(&mut self, id: LightId) {
        self.pending_remove.push(id);
    }

    /// Apply queued removals, then queued additions up to the cap.
    fn apply_pending(&mut self, report: &mut LightTickReport) {
        for id in std::mem::take(&mut self.pending_remove) {
            let before = self.sources.len();
            self.sources.retain(|s| s.id != id);
            if self.sources.len() < before {
                report.removed.push(id);
            } else if let Some(idx) = self.pending_add.iter().position(|s| s.id == id) {
                // Removed before it ever became active
                self.pending_add.remove(idx);
            }
        }

        for source in std::mem::take(&mut self.pending_add) {
            if self.sources.len() >= self.config.max_sources {
                debug!(
                    "light cap {} reached, dropping {} {:?}",
                    self.config.max_sources, source.kind, source.id
                );
                report.dropped.push(source.id);
                continue;
            }
            report.added.push(source.id);
            self.sources.push(source);
        }
    }

    /// Advance every source by `dt` and drift the ambient level.
    pub fn update(&mut self, dt: f32) -> LightTickReport {
        let mut report = LightTickReport::default();
        self.apply_pending(&mut report);

        let config = self.config;
        for source in &mut self.sources {
            let outcome = source.age(dt, &config, &mut self.rng);
            if outcome.burned_out {
                debug!("{} {:?} burned out", source.kind, source.id);
                report.burned_out.push((source.id, source.kind));
            }

            if !config.random_events || !source.is_lit() {
                continue;
            }
            let props = source.kind.properties();
            if props.electric && self.rng.chance(config.power_flicker_chance * dt) {
                source.force_flicker();
                report.power_flickers.push(source.id);
            } else if !source.kind.is_permanent() && self.rng.chance(config.snuff_chance * dt) {
                info!("{} {:?} went out on its own", source.kind, source.id);
                source.extinguish();
                report.snuffed.push(source.id);
            }
        }

        let removed = &mut report.removed;
        self.sources.retain(|s| {
            if s.is_consumed() {
                removed.push(s.id);
                false
            } else {
                true
            }
        });

        self.drift_ambient(dt);
        report
    }

    fn drift_ambient(&mut self, dt: f32) {
        let target = (self.config.base_ambient
            + self.config.ambient_per_source * self.lit_count() as f32)
            .min(self.config.ambient_max);
        let step = self.config.ambient_drift_rate * dt;
        if self.ambient < target {
            self.ambient = (self.ambient + step).min(target);
        } else {
            self.ambient = (self.ambient - step).max(target);
        }
    }

    /// True if any lit source covers `position`, or ambient light alone suffices.
    pub fn is_protected(&self, position: Vec3) -> bool {
        self.ambient > self.config.sufficient_ambient
            || self.sources.iter().any(|s| s.illuminates(position))
    }

    /// Combined light level at `position`, capped at twice the peak level.
    pub fn light_level_at(&self, position: Vec3) -> f32 {
        let total: f32 = self.ambient
            + self
                .sources
                .iter()
                .map(|s| s.contribution_at(position, self.config.falloff))
                .sum::<f32>();
        total.min(2.0 * PEAK_LIGHT_LEVEL)
    }

    /// Closest lit source to `position`, if any.
    pub fn nearest_lit_source(&self, position: Vec3) -> Option<&LightSource> {
        self.lit_sources().min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        })
    }

    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    /// Override the ambient level (e.g. daylight through a window).
    ///
    /// The level keeps drifting toward its lit-source target afterwards.
    pub fn set_ambient(&mut self, level: f32) {
        self.ambient = level.max(0.0);
    }

    pub fn sources(&self) -> impl Iterator<Item = &LightSource> {
        self.sources.iter()
    }

    pub fn lit_sources(&self) -> impl Iterator<Item = &LightSource> {
        self.sources.iter().filter(|s| s.is_lit())
    }

    pub fn source(&self, id: LightId) -> Option<&LightSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Mutable access for `light`/`extinguish`/`add_fuel` on an active source.
    pub fn source_mut(&mut self, id: LightId) -> Option<&mut LightSource> {
        self.sources.iter_mut().find(|s| s.id == id)
    }

    pub fn lit_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_lit()).count()
    }

    /// Number of active sources (pending ones excluded).
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of queued additions and removals.
    pub fn pending_len(&self) -> usize {
        self.pending_add.len() + self.pending_remove.len()
    }

    pub fn is_full(&self) -> bool {
        self.sources.len() >= self.config.max_sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> LightManager {
        LightManager::new(LightConfig::calm(), GameRng::new(11))
    }

    #[test]
    fn test_additions_wait_for_update() {
        let mut lights = manager();
        let id = lights.add_source(LightSource::lit(LightType::Torch, Vec3::ZERO));
        assert_eq!(lights.len(), 0);
        assert_eq!(lights.pending_len(), 1);
        assert!(!lights.is_protected(Vec3::ZERO));

        let report = lights.update(0.0);
        assert_eq!(report.added, vec![id]);
        assert_eq!(lights.len(), 1);
        assert!(lights.is_protected(Vec3::ZERO));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut lights = manager();
        let a = lights.add_source(LightSource::new(LightType::Candle, Vec3::ZERO));
        let b = lights.add_source(LightSource::new(LightType::Candle, Vec3::ZERO));
        assert_ne!(a, b);
        assert_ne!(a, LightId::NONE);
    }

    #[test]
    fn test_cap_drops_additions_silently() {
        let config = LightConfig {
            max_sources: 2,
            ..LightConfig::calm()
        };
        let mut lights = LightManager::new(config, GameRng::new(1));
        for _ in 0..3 {
            lights.add_source(LightSource::lit(LightType::Candle, Vec3::ZERO));
        }
        let report = lights.update(0.1);
        assert_eq!(report.added.len(), 2);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(lights.len(), 2);
        assert!(lights.is_full());
    }

    #[test]
    fn test_remove_is_deferred() {
        let mut lights = manager();
        let id = lights.add_source(LightSource::lit(LightType::Torch, Vec3::ZERO));
        lights.update(0.0);
        lights.remove_source(id);
        assert!(lights.source(id).is_some());
        let report = lights.update(0.0);
        assert_eq!(report.removed, vec![id]);
        assert!(lights.source(id).is_none());
    }

    #[test]
    fn test_remove_before_activation() {
        let mut lights = manager();
        let id = lights.add_source(LightSource::lit(LightType::Torch, Vec3::ZERO));
        lights.remove_source(id);
        let report = lights.update(0.0);
        assert!(report.added.is_empty());
        assert!(lights.is_empty());
    }

    #[test]
    fn test_consumed_sources_are_removed() {
        let mut lights = manager();
        let id = lights.add_source(LightSource::lit(LightType::Match, Vec3::ZERO));
        lights.update(0.0);
        let report = lights.update(21.0);
        assert_eq!(report.burned_out, vec![(id, LightType::Match)]);
        assert!(report.removed.contains(&id));
        assert!(lights.is_empty());
    }

    #[test]
    fn test_protection_radius() {
        let mut lights = manager();
        lights.add_source(LightSource::lit(LightType::Candle, Vec3::new(10.0, 0.0, 0.0)));
        lights.update(0.0);
        assert!(lights.is_protected(Vec3::new(13.5, 0.0, 0.0)));
        assert!(!lights.is_protected(Vec3::new(14.5, 0.0, 0.0)));
    }

    #[test]
    fn test_unlit_source_does_not_protect() {
        let mut lights = manager();
        let id = lights.add_source(LightSource::new(LightType::Torch, Vec3::ZERO));
        lights.update(0.0);
        assert!(!lights.is_protected(Vec3::ZERO));
        assert!(lights.source_mut(id).unwrap().light());
        assert!(lights.is_protected(Vec3::ZERO));
    }

    #[test]
    fn test_sufficient_ambient_protects_everywhere() {
        let mut lights = manager();
        assert!(!lights.is_protected(Vec3::splat(100.0)));
        lights.set_ambient(0.9);
        assert!(lights.is_protected(Vec3::splat(100.0)));
    }

    #[test]
    fn test_light_level_is_capped() {
        let mut lights = manager();
        for _ in 0..10 {
            lights.add_source(LightSource::lit(LightType::Fireplace, Vec3::ZERO));
        }
        lights.update(0.0);
        assert_eq!(lights.light_level_at(Vec3::ZERO), 2.0 * PEAK_LIGHT_LEVEL);
    }

    #[test]
    fn test_light_level_includes_ambient() {
        let lights = manager();
        let level = lights.light_level_at(Vec3::ZERO);
        assert!((level - LightConfig::calm().base_ambient).abs() < 1e-6);
    }

    #[test]
    fn test_ambient_drifts_toward_lit_count() {
        let mut lights = manager();
        for _ in 0..5 {
            lights.add_source(LightSource::lit(LightType::Fireplace, Vec3::ZERO));
        }
        let start = lights.ambient();
        lights.update(0.1);
        assert!(lights.ambient() > start);
        for _ in 0..100 {
            lights.update(0.1);
        }
        let config = LightConfig::calm();
        let target = config.base_ambient + 5.0 * config.ambient_per_source;
        assert!((lights.ambient() - target).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_lit_source() {
        let mut lights = manager();
        let near = lights.add_source(LightSource::lit(LightType::Candle, Vec3::new(1.0, 0.0, 0.0)));
        lights.add_source(LightSource::lit(LightType::Candle, Vec3::new(9.0, 0.0, 0.0)));
        lights.add_source(LightSource::new(LightType::Candle, Vec3::ZERO));
        lights.update(0.0);
        assert_eq!(lights.nearest_lit_source(Vec3::ZERO).map(|s| s.id), Some(near));
    }

    #[test]
    fn test_random_events_stay_off_when_disabled() {
        let mut lights = manager();
        lights.add_source(LightSource::lit(LightType::Flashlight, Vec3::ZERO));
        for _ in 0..1000 {
            let report = lights.update(0.1);
            assert!(report.power_flickers.is_empty());
            assert!(report.snuffed.is_empty());
        }
    }
}
