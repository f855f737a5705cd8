mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use embassy_time::Instant;
    use lantern_light_core::color::Rgb;
    use lantern_light_core::strips::DEFAULT_BRIGHTNESS;
    use lantern_light_core::tick::TickScheduler;
    use lantern_light_core::{
        AmbientLightSensor, Delay, LanternController, Mode, RangeFinder, SettingsStore, StripId,
        StripOutput, TemperatureProbe, TouchChannel, TouchPanel, brightness_from_range,
    };

    const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

    #[derive(Default)]
    struct TouchState {
        touched: [bool; 5],
        new_touch: [bool; 5],
    }

    #[derive(Clone, Default)]
    struct FakeTouch(Rc<RefCell<TouchState>>);

    impl FakeTouch {
        fn press(&self, channel: TouchChannel) {
            let mut state = self.0.borrow_mut();
            state.touched[channel as usize] = true;
            state.new_touch[channel as usize] = true;
        }

        fn release(&self, channel: TouchChannel) {
            self.0.borrow_mut().touched[channel as usize] = false;
        }
    }

    impl TouchPanel for FakeTouch {
        fn is_touched(&mut self, channel: TouchChannel) -> bool {
            self.0.borrow().touched[channel as usize]
        }

        fn is_new_touch(&mut self, channel: TouchChannel) -> bool {
            let mut state = self.0.borrow_mut();
            core::mem::take(&mut state.new_touch[channel as usize])
        }

        fn is_new_release(&mut self, _channel: TouchChannel) -> bool {
            false
        }
    }

    #[derive(Clone)]
    struct FakeLight(Rc<Cell<u16>>);

    impl AmbientLightSensor for FakeLight {
        fn read_raw(&mut self) -> u16 {
            self.0.get()
        }
    }

    #[derive(Clone)]
    struct FakeTemp(Rc<Cell<f32>>);

    impl TemperatureProbe for FakeTemp {
        fn read_celsius(&mut self) -> f32 {
            self.0.get()
        }
    }

    #[derive(Clone)]
    struct FakeRange(Rc<Cell<i32>>);

    impl RangeFinder for FakeRange {
        fn read_mm(&mut self) -> i32 {
            self.0.get()
        }
    }

    #[derive(Clone, Default)]
    struct FakeStore(Rc<RefCell<HashMap<String, u32>>>);

    impl FakeStore {
        fn get(&self, key: &str) -> Option<u32> {
            self.0.borrow().get(key).copied()
        }

        fn put(&self, key: &str, value: u32) {
            self.0.borrow_mut().insert(key.to_owned(), value);
        }
    }

    impl SettingsStore for FakeStore {
        fn read(&mut self, key: &str) -> Option<u32> {
            self.get(key)
        }

        fn write(&mut self, key: &str, value: u32) {
            self.put(key, value);
        }
    }

    struct NullOutput;

    impl StripOutput for NullOutput {
        fn write(&mut self, _strip: StripId, _colors: &[Rgb]) {}
    }

    struct NoDelay;

    impl Delay for NoDelay {
        fn delay_ms(&mut self, _ms: u32) {}
    }

    struct Rig {
        touch: FakeTouch,
        light: Rc<Cell<u16>>,
        temp: Rc<Cell<f32>>,
        range: Rc<Cell<i32>>,
        store: FakeStore,
        controller: LanternController<FakeTouch, FakeLight, FakeTemp, FakeRange, FakeStore>,
    }

    fn rig_with_store(store: FakeStore) -> Rig {
        let touch = FakeTouch::default();
        let light = Rc::new(Cell::new(1_000u16));
        let temp = Rc::new(Cell::new(25.0f32));
        let range = Rc::new(Cell::new(-1i32));

        let mut controller = LanternController::new(
            touch.clone(),
            FakeLight(light.clone()),
            FakeTemp(temp.clone()),
            FakeRange(range.clone()),
            store.clone(),
        );
        controller.begin(&mut NullOutput, &mut NoDelay, Instant::from_millis(0));

        Rig {
            touch,
            light,
            temp,
            range,
            store,
            controller,
        }
    }

    fn rig() -> Rig {
        rig_with_store(FakeStore::default())
    }

    fn tick(rig: &mut Rig, at_ms: u64) {
        rig.controller
            .update(Instant::from_millis(at_ms), &mut NullOutput);
    }

    #[test]
    fn test_begin_powers_on_with_defaults() {
        let rig = rig();
        let state = rig.controller.state();
        assert!(state.powered);
        assert!(!state.winding_down);
        assert_eq!(state.mode, Mode::Ambient);
        assert_eq!(state.effect_index, 0);
        assert_eq!(state.temp_button_state, 0);
        assert_eq!(state.light_button_state, 0);
    }

    #[test]
    fn test_set_mode_resets_effect_and_persists() {
        let mut rig = rig();
        rig.controller.next_effect();
        assert_eq!(rig.controller.state().effect_index, 1);

        rig.controller.set_mode(Mode::Gradient);
        assert_eq!(rig.controller.state().mode, Mode::Gradient);
        assert_eq!(rig.controller.state().effect_index, 0);
        assert_eq!(rig.store.get("mode"), Some(2));
        assert_eq!(rig.store.get("effect"), Some(0));
    }

    #[test]
    fn test_mode_reentry_resumes_animation_state() {
        // Leaving a mode and coming back must not reset its animations; only
        // an effect change within the mode does that. Two controllers with
        // the same seed end up pixel-identical iff the flame field survived
        // the round trip.
        let mut toured = rig();
        toured.controller.set_mode(Mode::Animated);
        tick(&mut toured, 0);
        toured.controller.set_mode(Mode::Gradient);
        tick(&mut toured, 20);
        toured.controller.set_mode(Mode::Animated);
        tick(&mut toured, 40);

        let mut direct = rig();
        direct.controller.set_mode(Mode::Animated);
        tick(&mut direct, 0);
        tick(&mut direct, 40);

        for strip in [StripId::Inner, StripId::Outer] {
            assert_eq!(
                toured.controller.strips().pixels(strip),
                direct.controller.strips().pixels(strip)
            );
        }
    }

    #[test]
    fn test_button_feedback_owns_the_ring_for_its_window() {
        let mut rig = rig();
        tick(&mut rig, 0);
        let warm = rig.controller.strips().get(StripId::Ring, 0).unwrap();
        assert_ne!(warm, OFF);

        rig.touch.press(TouchChannel::Temperature);
        tick(&mut rig, 1_000);

        let strips = rig.controller.strips();
        // State 1 lights half the ring as a bar, the rest goes dark
        let bar = strips.get(StripId::Ring, 0).unwrap();
        assert_ne!(bar, OFF);
        assert_ne!(bar, warm);
        assert_ne!(strips.get(StripId::Ring, 30), Some(OFF));
        assert_eq!(strips.get(StripId::Ring, 31), Some(OFF));
        assert_eq!(strips.get(StripId::Ring, 61), Some(OFF));
        // The running animation keeps painting the other strips meanwhile
        assert_eq!(strips.get(StripId::Inner, 0), Some(warm));

        // Window elapsed: the animation takes the ring back
        tick(&mut rig, 2_300);
        let strips = rig.controller.strips();
        assert_eq!(strips.get(StripId::Ring, 0), Some(warm));
        assert_eq!(strips.get(StripId::Ring, 40), Some(warm));
    }

    #[test]
    fn test_next_effect_cycles_within_catalog() {
        let mut rig = rig();
        rig.controller.set_mode(Mode::Party);
        for expected in [1, 2, 3, 4, 5, 0] {
            rig.controller.next_effect();
            assert_eq!(rig.controller.state().effect_index, expected);
            assert_eq!(rig.store.get("effect"), Some(expected as u32));
        }
    }

    #[test]
    fn test_mode_and_effect_buttons_debounce() {
        let mut rig = rig();

        rig.touch.press(TouchChannel::Mode);
        tick(&mut rig, 1_000);
        assert_eq!(rig.controller.state().mode, Mode::Gradient);

        // Too soon after the accepted press
        rig.touch.press(TouchChannel::Mode);
        tick(&mut rig, 1_100);
        assert_eq!(rig.controller.state().mode, Mode::Gradient);

        rig.touch.press(TouchChannel::Mode);
        tick(&mut rig, 1_500);
        assert_eq!(rig.controller.state().mode, Mode::Animated);

        rig.touch.press(TouchChannel::Effect);
        tick(&mut rig, 2_000);
        assert_eq!(rig.controller.state().effect_index, 1);

        rig.touch.press(TouchChannel::Effect);
        tick(&mut rig, 2_100);
        assert_eq!(rig.controller.state().effect_index, 1);

        rig.touch.press(TouchChannel::Effect);
        tick(&mut rig, 2_600);
        assert_eq!(rig.controller.state().effect_index, 2);
    }

    #[test]
    fn test_power_hold_shuts_down_then_press_restores() {
        let mut rig = rig();

        rig.touch.press(TouchChannel::Power);
        tick(&mut rig, 1_000);
        assert!(rig.controller.state().powered);
        assert!(!rig.controller.state().winding_down);

        // Still short of the hold threshold
        tick(&mut rig, 2_900);
        assert!(!rig.controller.state().winding_down);

        tick(&mut rig, 3_000);
        assert!(rig.controller.state().winding_down);
        assert!(rig.controller.state().powered);

        rig.touch.release(TouchChannel::Power);
        let mut now = 3_000;
        for _ in 0..150 {
            now += 10;
            tick(&mut rig, now);
        }
        let state = rig.controller.state();
        assert!(!state.powered);
        assert!(!state.winding_down);
        assert_eq!(state.mode, Mode::Off);
        assert_eq!(rig.controller.strips().brightness(), DEFAULT_BRIGHTNESS);
        for strip in StripId::ALL {
            assert!(rig.controller.strips().pixels(strip).iter().all(|&p| p == OFF));
        }

        rig.touch.press(TouchChannel::Power);
        tick(&mut rig, 6_000);
        let state = rig.controller.state();
        assert!(state.powered);
        assert_eq!(state.mode, Mode::Ambient);
        assert_eq!(state.effect_index, 0);
    }

    #[test]
    fn test_short_power_press_keeps_running() {
        let mut rig = rig();
        rig.touch.press(TouchChannel::Power);
        tick(&mut rig, 1_000);
        rig.touch.release(TouchChannel::Power);
        tick(&mut rig, 1_500);
        tick(&mut rig, 4_000);
        assert!(rig.controller.state().powered);
        assert!(!rig.controller.state().winding_down);
    }

    #[test]
    fn test_wind_down_clears_from_the_tail() {
        let mut rig = rig();
        tick(&mut rig, 100);
        let warm = rig.controller.strips().get(StripId::Core, 0).unwrap();
        assert_ne!(warm, OFF);

        rig.controller.set_power(false, Instant::from_millis(200));
        tick(&mut rig, 220);

        let strips = rig.controller.strips();
        assert_eq!(strips.get(StripId::Core, 141), Some(OFF));
        assert_eq!(strips.get(StripId::Core, 0), Some(warm));
        // Every inner segment loses its tail pixel in the same step
        for segment in 0..3 {
            assert_eq!(strips.get(StripId::Inner, segment * 28 + 27), Some(OFF));
        }
        assert_ne!(strips.get(StripId::Inner, 0), Some(OFF));
    }

    #[test]
    fn test_auto_light_toggles_after_dwell() {
        let mut rig = rig();
        rig.touch.press(TouchChannel::LightSensitivity);
        tick(&mut rig, 0);
        assert_eq!(rig.controller.state().light_button_state, 1);

        // Bright room, lantern on: off after the dwell elapses
        for at in [1_000, 2_000, 3_000, 4_000] {
            tick(&mut rig, at);
            assert!(!rig.controller.state().winding_down);
        }
        tick(&mut rig, 5_000);
        assert!(rig.controller.state().winding_down);

        let mut now = 5_000;
        for _ in 0..170 {
            now += 10;
            tick(&mut rig, now);
        }
        assert!(!rig.controller.state().powered);

        // Dark room, lantern off: back on after the dwell elapses
        rig.light.set(100);
        tick(&mut rig, 10_000);
        assert!(!rig.controller.state().powered);
        tick(&mut rig, 15_000);
        assert!(rig.controller.state().powered);
    }

    #[test]
    fn test_auto_light_disabled_at_state_zero() {
        let mut rig = rig();
        for at in (0..20_000).step_by(1_000) {
            tick(&mut rig, at);
        }
        assert!(rig.controller.state().powered);
        assert!(!rig.controller.state().winding_down);
    }

    #[test]
    fn test_sensitivity_change_restarts_dwell() {
        let mut rig = rig();
        rig.touch.press(TouchChannel::LightSensitivity);
        tick(&mut rig, 0);

        // Just before the toggle, bump the sensitivity
        tick(&mut rig, 4_900);
        rig.touch.press(TouchChannel::LightSensitivity);
        tick(&mut rig, 4_950);
        assert_eq!(rig.controller.state().light_button_state, 2);

        tick(&mut rig, 5_100);
        assert!(!rig.controller.state().winding_down);

        tick(&mut rig, 9_950);
        assert!(rig.controller.state().winding_down);
    }

    #[test]
    fn test_restore_sanitizes_out_of_range_values() {
        let store = FakeStore::default();
        store.put("mode", 9);
        store.put("effect", 9);
        store.put("temp_button", 5);
        store.put("light_button", 2);

        let rig = rig_with_store(store);
        let state = rig.controller.state();
        assert_eq!(state.mode, Mode::Ambient);
        assert_eq!(state.effect_index, 0);
        assert_eq!(state.temp_button_state, 0);
        assert_eq!(state.light_button_state, 2);
    }

    #[test]
    fn test_restore_never_resumes_into_off() {
        let store = FakeStore::default();
        store.put("mode", 0);
        let rig = rig_with_store(store);
        assert_eq!(rig.controller.state().mode, Mode::Ambient);
    }

    #[test]
    fn test_restore_resumes_saved_selection() {
        let store = FakeStore::default();
        store.put("mode", 4);
        store.put("effect", 3);
        let rig = rig_with_store(store);
        assert_eq!(rig.controller.state().mode, Mode::Party);
        assert_eq!(rig.controller.state().effect_index, 3);
    }

    #[test]
    fn test_cold_temperature_overrides_animated_mode() {
        let mut rig = rig();
        rig.controller.set_mode(Mode::Animated);
        rig.controller.next_effect();

        // Selected animation is the blue breathing one
        tick(&mut rig, 50);
        assert!(
            rig.controller
                .strips()
                .pixels(StripId::Inner)
                .iter()
                .any(|p| p.b > 0)
        );

        // Enable the override and drop the temperature
        rig.temp.set(10.0);
        rig.touch.press(TouchChannel::Temperature);
        tick(&mut rig, 100);

        let strips = rig.controller.strips();
        assert!(strips.pixels(StripId::Inner).iter().all(|p| p.b == 0));
        assert!(strips.pixels(StripId::Inner).iter().any(|p| p.r > 0));
        // The selection itself is untouched
        assert_eq!(rig.controller.state().effect_index, 1);

        // Warm again: the selected animation returns
        rig.temp.set(25.0);
        tick(&mut rig, 200);
        assert!(
            rig.controller
                .strips()
                .pixels(StripId::Inner)
                .iter()
                .any(|p| p.b > 0)
        );
    }

    #[test]
    fn test_temp_button_cycles_back_to_zero() {
        let mut rig = rig();
        for (press, expected) in [1u8, 2, 3, 0].into_iter().enumerate() {
            rig.touch.press(TouchChannel::Temperature);
            tick(&mut rig, 1_000 + press as u64 * 400);
            assert_eq!(rig.controller.state().temp_button_state, expected);
            assert_eq!(rig.store.get("temp_button"), Some(u32::from(expected)));
        }
    }

    #[test]
    fn test_range_reading_drives_brightness() {
        let mut rig = rig();
        tick(&mut rig, 0);
        assert_eq!(rig.controller.strips().brightness(), DEFAULT_BRIGHTNESS);

        rig.range.set(550);
        tick(&mut rig, 100);
        assert_eq!(rig.controller.strips().brightness(), 127);

        rig.range.set(50);
        tick(&mut rig, 200);
        assert_eq!(rig.controller.strips().brightness(), 0);

        // No target: the last value stays in effect
        rig.range.set(-1);
        tick(&mut rig, 300);
        assert_eq!(rig.controller.strips().brightness(), 0);
    }

    #[test]
    fn test_brightness_from_range_mapping() {
        assert_eq!(brightness_from_range(-1), None);
        assert_eq!(brightness_from_range(0), Some(0));
        assert_eq!(brightness_from_range(99), Some(0));
        assert_eq!(brightness_from_range(100), Some(0));
        assert_eq!(brightness_from_range(550), Some(50));
        assert_eq!(brightness_from_range(1_000), Some(100));
        assert_eq!(brightness_from_range(1_001), None);
    }

    #[test]
    fn test_scheduler_paces_and_corrects_drift() {
        let rig = rig();
        let mut scheduler = TickScheduler::new(rig.controller, NullOutput);

        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.next_deadline, Instant::from_millis(8));
        assert_eq!(result.sleep_duration.as_millis(), 8);

        let result = scheduler.tick(Instant::from_millis(8));
        assert_eq!(result.next_deadline, Instant::from_millis(16));

        // A long stall resets the deadline instead of bursting
        let result = scheduler.tick(Instant::from_millis(1_000));
        assert_eq!(result.next_deadline, Instant::from_millis(1_008));
        assert!(scheduler.controller().state().powered);
    }
}
