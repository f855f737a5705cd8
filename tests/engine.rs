mod tests {
    use embassy_time::Instant;
    use lantern_light_core::{EffectEngine, Mode, StripBuffers, StripId};

    #[test]
    fn test_catalog_sizes() {
        let engine = EffectEngine::new();
        assert_eq!(engine.catalog_len(Mode::Ambient), 3);
        assert_eq!(engine.catalog_len(Mode::Gradient), 3);
        assert_eq!(engine.catalog_len(Mode::Animated), 3);
        assert_eq!(engine.catalog_len(Mode::Party), 6);
    }

    #[test]
    fn test_party_catalog_entries() {
        let engine = EffectEngine::new();
        let names: Vec<_> = (0..engine.catalog_len(Mode::Party))
            .map(|index| engine.effect_name(Mode::Party, index).unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "rainbow_forward",
                "rainbow_backward",
                "rainbow_mirrored",
                "confetti",
                "party_pulse",
                "candy",
            ]
        );
    }

    #[test]
    fn test_animated_catalog_includes_fire() {
        let engine = EffectEngine::new();
        let names: Vec<_> = (0..engine.catalog_len(Mode::Animated))
            .map(|index| engine.effect_name(Mode::Animated, index).unwrap())
            .collect();
        assert!(names.contains(&"fire"));
    }

    #[test]
    fn test_effect_name_out_of_range() {
        let engine = EffectEngine::new();
        assert_eq!(engine.effect_name(Mode::Ambient, 9), None);
    }

    #[test]
    fn test_update_renders_selected_effect() {
        let mut engine = EffectEngine::new();
        let mut strips = StripBuffers::new();
        // warm_white solid fills every strip
        engine.update(Mode::Ambient, 0, Instant::from_millis(0), &mut strips, false);
        for strip in StripId::ALL {
            assert!(strips.pixels(strip).iter().all(|p| p.r > 0));
        }
    }

    #[test]
    fn test_update_fire_targets_the_flame_animation() {
        let mut engine = EffectEngine::new();
        let mut strips = StripBuffers::new();
        assert!(engine.update_fire(Instant::from_millis(0), &mut strips, false));
        assert!(strips.pixels(StripId::Inner).iter().all(|p| p.b == 0));
        assert!(strips.pixels(StripId::Inner).iter().any(|p| p.r > 0));
    }

    #[test]
    fn test_off_mode_falls_back_to_ambient_catalog() {
        let engine = EffectEngine::new();
        assert_eq!(
            engine.catalog_len(Mode::Off),
            engine.catalog_len(Mode::Ambient)
        );
    }
}
