use glam::Vec3;
use proptest::prelude::*;
use umbra_core::config::LightConfig;
use umbra_core::light::{LightManager, LightSource, LightType, PEAK_LIGHT_LEVEL};
use umbra_core::vision::check;
use umbra_core::world::heading_to_facing;
use umbra_core::{GameRng, is_visible};

fn coord() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn light_type() -> impl Strategy<Value = LightType> {
    prop_oneof![
        Just(LightType::Match),
        Just(LightType::Candle),
        Just(LightType::Torch),
        Just(LightType::Fireplace),
        Just(LightType::Flashlight),
        Just(LightType::Lantern),
    ]
}

proptest! {
    #[test]
    fn prop_straight_ahead_is_visible(
        observer in point(),
        heading in 0.0f32..std::f32::consts::TAU,
        distance in 0.01f32..50.0,
    ) {
        let facing = heading_to_facing(heading);
        let target = observer + facing * distance;
        prop_assert!(is_visible(observer, facing, target, 50.0 + 1e-3));
    }

    #[test]
    fn prop_straight_behind_is_hidden(
        observer in point(),
        heading in 0.0f32..std::f32::consts::TAU,
        distance in 0.01f32..50.0,
    ) {
        let facing = heading_to_facing(heading);
        let target = observer - facing * distance;
        prop_assert!(!is_visible(observer, facing, target, 60.0));
    }

    #[test]
    fn prop_beyond_range_is_hidden(
        observer in point(),
        target in point(),
        facing in point(),
    ) {
        let distance = observer.distance(target);
        prop_assume!(distance > 1.0);
        prop_assert!(!is_visible(observer, facing, target, distance - 0.5));
    }

    #[test]
    fn prop_visibility_ignores_facing_length(
        observer in point(),
        target in point(),
        facing in point(),
        scale in 0.01f32..100.0,
    ) {
        prop_assume!(facing.length() > 1e-3);
        let a = check(observer, facing, target, 500.0, 0.5);
        let b = check(observer, facing * scale, target, 500.0, 0.5);
        // Tolerate disagreement only right on the cone edge.
        let offset = (target - observer).normalize_or_zero();
        let margin = (offset.dot(facing.normalize()) - 0.5).abs();
        prop_assume!(margin > 1e-4);
        prop_assert_eq!(a.in_view, b.in_view);
    }

    #[test]
    fn prop_light_level_is_bounded(
        sources in prop::collection::vec((light_type(), point()), 0..12),
        probe in point(),
        ambient in 0.0f32..1.0,
    ) {
        let mut lights = LightManager::new(LightConfig::calm(), GameRng::new(1));
        for (kind, position) in sources {
            lights.add_source(LightSource::lit(kind, position));
        }
        lights.update(0.0);
        lights.set_ambient(ambient);

        let level = lights.light_level_at(probe);
        prop_assert!(level >= 0.0);
        prop_assert!(level <= 2.0 * PEAK_LIGHT_LEVEL + 1e-6);
        prop_assert!(level >= ambient.min(2.0 * PEAK_LIGHT_LEVEL) - 1e-6);
    }

    #[test]
    fn prop_protection_matches_radius(
        kind in light_type(),
        center in point(),
        heading in 0.0f32..std::f32::consts::TAU,
        fraction in 0.0f32..2.0,
    ) {
        prop_assume!((fraction - 1.0).abs() > 0.01);
        let mut lights = LightManager::new(LightConfig::calm(), GameRng::new(1));
        let id = lights.add_source(LightSource::lit(kind, center));
        lights.update(0.0);
        let radius = lights.source(id).map(LightSource::radius).unwrap_or(0.0);
        prop_assume!(radius > 0.0);

        let probe = center + heading_to_facing(heading) * radius * fraction;
        prop_assert_eq!(lights.is_protected(probe), fraction < 1.0);
    }
}
