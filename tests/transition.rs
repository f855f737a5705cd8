mod tests {
    use embassy_time::{Duration, Instant};
    use lantern_light_core::transition::ValueTransition;

    #[test]
    fn test_value_transition() {
        let mut transition = ValueTransition::new(0);
        assert_eq!(transition.current(), 0);
        assert_eq!(transition.is_transitioning(), false);
        transition.set(100, Duration::from_millis(100), Instant::from_millis(0));
        assert_eq!(transition.is_transitioning(), true);

        transition.tick(Instant::from_millis(50));
        assert_eq!(transition.current(), 50);

        transition.tick(Instant::from_millis(100));
        assert_eq!(transition.current(), 100);
        assert_eq!(transition.is_transitioning(), false);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let mut transition = ValueTransition::new(10);
        transition.set(200, Duration::from_millis(0), Instant::from_millis(5));
        assert_eq!(transition.current(), 200);
        assert_eq!(transition.is_transitioning(), false);
    }
}
