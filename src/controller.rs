//! Lantern controller
//!
//! The top-level state machine: power, mode, active effect, debounced touch
//! buttons, auto-light timers, the wind-down shutdown sequence and settings
//! persistence. One tick of `update` polls sensors, advances timers and
//! delegates rendering to the effect engine; everything runs on a single
//! cooperative control loop with no blocking except the one-time startup
//! sweep in `begin`.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::Rgb;
use crate::engine::EffectEngine;
use crate::feedback::RingFeedback;
use crate::strips::{MAX_STRIP_LEN, SEGMENTS, StripBuffers, StripId};
use crate::{
    AmbientLightSensor, Delay, RangeFinder, SettingsStore, StripOutput, TemperatureProbe,
    TouchChannel, TouchPanel,
};

/// Hold time on the power channel before a powered lantern shuts down
pub const POWER_HOLD_MS: u64 = 2_000;

/// Minimum spacing between accepted mode/effect presses
pub const MODE_DEBOUNCE_MS: u64 = 400;
pub const EFFECT_DEBOUNCE_MS: u64 = 400;

/// Dwell before an ambient-light classification toggles power
pub const AUTO_LIGHT_DWELL_MS: u64 = 5_000;

/// Cadence of the wind-down animation
pub const WIND_DOWN_STEP_MS: u64 = 10;

/// Blocking pause between startup sweep steps
pub const STARTUP_STEP_MS: u32 = 5;

/// Raw ambient counts below which the room counts as dark, indexed by
/// sensitivity (light button state 1/2/3)
pub const AUTO_LIGHT_THRESHOLDS: [u16; 3] = [220, 520, 900];

/// At or below this temperature the ANIMATED mode is overridden with fire
pub const TEMP_OVERRIDE_CELSIUS: f32 = 18.0;

/// Below this the temperature-button feedback shows the cold color
pub const TEMP_COLD_FEEDBACK_CELSIUS: f32 = 21.0;

/// Distance mapping: closer than this switches the fixture dark
pub const RANGE_DEAD_ZONE_MM: i32 = 100;
/// Beyond this the reading is ignored
pub const RANGE_MAX_MM: i32 = 1_000;

const KEY_MODE: &str = "mode";
const KEY_EFFECT: &str = "effect";
const KEY_TEMP_BUTTON: &str = "temp_button";
const KEY_LIGHT_BUTTON: &str = "light_button";

const SWEEP_COLOR: Rgb = Rgb {
    r: 255,
    g: 150,
    b: 60,
};
const FEEDBACK_COLD: Rgb = Rgb {
    r: 80,
    g: 140,
    b: 255,
};
const FEEDBACK_WARM: Rgb = Rgb {
    r: 255,
    g: 120,
    b: 20,
};
const FEEDBACK_NEUTRAL: Rgb = Rgb {
    r: 220,
    g: 220,
    b: 220,
};
const FEEDBACK_LIGHT: Rgb = Rgb {
    r: 60,
    g: 220,
    b: 80,
};
const FEEDBACK_MODE: Rgb = Rgb {
    r: 180,
    g: 60,
    b: 255,
};
const FEEDBACK_EFFECT: Rgb = Rgb {
    r: 0,
    g: 200,
    b: 200,
};

/// Operating mode of the fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Ambient = 1,
    Gradient = 2,
    Animated = 3,
    Party = 4,
}

impl Mode {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Off,
            1 => Self::Ambient,
            2 => Self::Gradient,
            3 => Self::Animated,
            4 => Self::Party,
            _ => return None,
        })
    }

    /// Next mode in the user-facing cycle; never lands on OFF
    pub const fn next(self) -> Self {
        match self {
            Self::Off | Self::Party => Self::Ambient,
            Self::Ambient => Self::Gradient,
            Self::Gradient => Self::Animated,
            Self::Animated => Self::Party,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Ambient => "ambient",
            Self::Gradient => "gradient",
            Self::Animated => "animated",
            Self::Party => "party",
        }
    }
}

/// All controller state, in one visible place
///
/// Timers are plain instants advanced by the single tick; the power latch is
/// an explicit field rather than a hidden static so its lifecycle is part of
/// the state model.
#[derive(Debug, Clone)]
pub struct LanternState {
    pub powered: bool,
    pub winding_down: bool,
    pub mode: Mode,
    pub effect_index: usize,
    /// Temperature button setting, cycles 0..=3
    pub temp_button_state: u8,
    /// Light sensitivity setting, cycles 0..=3 (0 disables auto lighting)
    pub light_button_state: u8,
    /// Start of the current power-channel hold, while touched
    pub power_press_time: Option<Instant>,
    /// Set once a press has acted; cleared only by the next new touch
    pub power_latched: bool,
    /// Start of the current dark/bright dwell
    pub low_light_timer_start: Option<Instant>,
    /// Last dark/bright classification backing the dwell timer
    pub light_classification: Option<bool>,
    pub last_mode_change_time: Option<Instant>,
    pub last_effect_change_time: Option<Instant>,
    pub wind_down_position: usize,
    pub wind_down_last_tick: Instant,
}

impl Default for LanternState {
    fn default() -> Self {
        Self {
            powered: false,
            winding_down: false,
            mode: Mode::Ambient,
            effect_index: 0,
            temp_button_state: 0,
            light_button_state: 0,
            power_press_time: None,
            power_latched: false,
            low_light_timer_start: None,
            light_classification: None,
            last_mode_change_time: None,
            last_effect_change_time: None,
            wind_down_position: 0,
            wind_down_last_tick: Instant::from_millis(0),
        }
    }
}

/// Edge snapshot of the touch panel, taken once per tick
#[derive(Default, Clone, Copy)]
struct TouchEdges {
    temp_new: bool,
    light_new: bool,
    power_new: bool,
    power_held: bool,
    mode_new: bool,
    effect_new: bool,
}

pub struct LanternController<T, L, P, R, S> {
    touch: Option<T>,
    light: Option<L>,
    temp: Option<P>,
    range: Option<R>,
    store: S,
    strips: StripBuffers,
    engine: EffectEngine,
    feedback: RingFeedback,
    state: LanternState,
}

impl<T, L, P, R, S> LanternController<T, L, P, R, S>
where
    T: TouchPanel,
    L: AmbientLightSensor,
    P: TemperatureProbe,
    R: RangeFinder,
    S: SettingsStore,
{
    pub fn new(touch: T, light: L, temp: P, range: R, store: S) -> Self {
        Self {
            touch: Some(touch),
            light: Some(light),
            temp: Some(temp),
            range: Some(range),
            store,
            strips: StripBuffers::new(),
            engine: EffectEngine::new(),
            feedback: RingFeedback::new(),
            state: LanternState::default(),
        }
    }

    pub const fn state(&self) -> &LanternState {
        &self.state
    }

    pub const fn strips(&self) -> &StripBuffers {
        &self.strips
    }

    pub const fn engine(&self) -> &EffectEngine {
        &self.engine
    }

    /// One-time initialization: sensor probe round, blocking startup sweep,
    /// settings restore, then the ON state
    ///
    /// Each subsystem fails independently; a missing sensor disables only the
    /// paths that need it.
    pub fn begin(&mut self, out: &mut impl StripOutput, delay: &mut impl Delay, now: Instant) {
        if let Some(touch) = self.touch.as_mut() {
            if !touch.init() {
                #[cfg(feature = "esp32-log")]
                println!("lantern: touch controller missing, buttons disabled");
                self.touch = None;
            }
        }
        if let Some(light) = self.light.as_mut() {
            if !light.init() {
                #[cfg(feature = "esp32-log")]
                println!("lantern: light sensor missing, auto lighting disabled");
                self.light = None;
            }
        }
        if let Some(temp) = self.temp.as_mut() {
            if !temp.init() {
                #[cfg(feature = "esp32-log")]
                println!("lantern: temperature probe missing, override disabled");
                self.temp = None;
            }
        }
        if let Some(range) = self.range.as_mut() {
            if !range.init() {
                #[cfg(feature = "esp32-log")]
                println!("lantern: range finder missing, distance dimming disabled");
                self.range = None;
            }
        }

        self.startup_sweep(out, delay);
        self.restore_settings();
        self.state.powered = true;
        self.state.winding_down = false;
        self.state.wind_down_last_tick = now;
    }

    /// One control-loop tick
    pub fn update(&mut self, now: Instant, out: &mut impl StripOutput) {
        self.process_touch_inputs(now);
        self.handle_auto_lighting(now);

        if self.state.winding_down {
            self.update_wind_down(now, out);
            return;
        }
        if !self.state.powered {
            return;
        }

        self.apply_range_brightness();

        let skip_ring = self.feedback.is_active(now);
        self.render_effects(now, skip_ring);
        self.feedback.render(now, &mut self.strips);
        self.strips.show_all(out);
    }

    /// Switch mode, resetting the effect selection
    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        self.state.effect_index = 0;
        self.store.write(KEY_MODE, mode as u32);
        self.store.write(KEY_EFFECT, 0);
    }

    /// Advance cyclically through the four non-OFF modes
    pub fn next_mode(&mut self) {
        self.set_mode(self.state.mode.next());
    }

    /// Advance to the next effect within the current mode
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_effect(&mut self) {
        let len = self.engine.catalog_len(self.state.mode);
        if len == 0 {
            return;
        }
        self.state.effect_index = (self.state.effect_index + 1) % len;
        self.store
            .write(KEY_EFFECT, self.state.effect_index as u32);
        self.engine.reset(self.state.mode, self.state.effect_index);
    }

    /// Request a power state change
    ///
    /// Turning on restores the persisted settings. Turning off does not clear
    /// `powered` immediately; it starts the wind-down sequence and the actual
    /// transition happens when that completes.
    pub fn set_power(&mut self, on: bool, now: Instant) {
        if on {
            if self.state.powered {
                return;
            }
            self.restore_settings();
            self.state.powered = true;
            self.state.winding_down = false;
            #[cfg(feature = "esp32-log")]
            println!("lantern: power on ({})", self.state.mode.as_str());
        } else {
            if !self.state.powered || self.state.winding_down {
                return;
            }
            self.start_wind_down(now);
        }
    }

    fn start_wind_down(&mut self, now: Instant) {
        self.state.winding_down = true;
        self.state.wind_down_position = 0;
        self.state.wind_down_last_tick = now;
        #[cfg(feature = "esp32-log")]
        println!("lantern: wind-down started");
    }

    /// Advance the shutdown animation by at most one step
    ///
    /// Clears one pixel per step, counting inward from the tail end of every
    /// strip at once. Completion flips the device off for real.
    fn update_wind_down(&mut self, now: Instant, out: &mut impl StripOutput) {
        let elapsed = now.duration_since(self.state.wind_down_last_tick);
        if elapsed < Duration::from_millis(WIND_DOWN_STEP_MS) {
            return;
        }
        self.state.wind_down_last_tick = now;

        let off = Rgb { r: 0, g: 0, b: 0 };
        let pos = self.state.wind_down_position;

        for strip in [StripId::Core, StripId::Ring] {
            let len = strip.count();
            if pos < len {
                self.strips.set_physical(strip, len - 1 - pos, off);
            }
        }
        for strip in [StripId::Inner, StripId::Outer] {
            let segment_len = strip.segment_len();
            if pos < segment_len {
                for segment in 0..SEGMENTS {
                    self.strips
                        .set_physical(strip, segment * segment_len + segment_len - 1 - pos, off);
                }
            }
        }
        self.strips.show_all(out);

        self.state.wind_down_position += 1;
        if self.state.wind_down_position >= MAX_STRIP_LEN {
            self.state.winding_down = false;
            self.state.powered = false;
            self.state.mode = Mode::Off;
            self.strips.clear_all();
            self.strips.reset_brightness();
            self.strips.show_all(out);
            #[cfg(feature = "esp32-log")]
            println!("lantern: power off");
        }
    }

    /// Render the active animation, or the fire override
    ///
    /// The temperature override is a per-tick substitution: `effect_index`
    /// stays untouched and the skip-ring flag is forwarded as-is.
    fn render_effects(&mut self, now: Instant, skip_ring: bool) {
        if self.state.mode == Mode::Animated && self.state.temp_button_state > 0 {
            if let Some(temp) = self.temp.as_mut() {
                if temp.read_celsius() <= TEMP_OVERRIDE_CELSIUS
                    && self.engine.update_fire(now, &mut self.strips, skip_ring)
                {
                    return;
                }
            }
        }
        self.engine.update(
            self.state.mode,
            self.state.effect_index,
            now,
            &mut self.strips,
            skip_ring,
        );
    }

    fn process_touch_inputs(&mut self, now: Instant) {
        let Some(touch) = self.touch.as_mut() else {
            return;
        };
        let edges = TouchEdges {
            temp_new: touch.is_new_touch(TouchChannel::Temperature),
            light_new: touch.is_new_touch(TouchChannel::LightSensitivity),
            power_new: touch.is_new_touch(TouchChannel::Power),
            power_held: touch.is_touched(TouchChannel::Power),
            mode_new: touch.is_new_touch(TouchChannel::Mode),
            effect_new: touch.is_new_touch(TouchChannel::Effect),
        };

        if edges.temp_new {
            self.state.temp_button_state = (self.state.temp_button_state + 1) % 4;
            self.store
                .write(KEY_TEMP_BUTTON, u32::from(self.state.temp_button_state));
            let color = match self.temp.as_mut() {
                Some(temp) => {
                    if temp.read_celsius() <= TEMP_COLD_FEEDBACK_CELSIUS {
                        FEEDBACK_COLD
                    } else {
                        FEEDBACK_WARM
                    }
                }
                None => FEEDBACK_NEUTRAL,
            };
            self.feedback.show(self.state.temp_button_state, color, now);
        }

        if edges.light_new {
            self.state.light_button_state = (self.state.light_button_state + 1) % 4;
            self.store
                .write(KEY_LIGHT_BUTTON, u32::from(self.state.light_button_state));
            // Sensitivity changed: the dwell starts over from scratch
            self.state.low_light_timer_start = None;
            self.state.light_classification = None;
            self.feedback
                .show(self.state.light_button_state, FEEDBACK_LIGHT, now);
        }

        if edges.power_new {
            self.state.power_latched = false;
            if self.state.powered {
                self.state.power_press_time = Some(now);
            } else {
                self.set_power(true, now);
                self.state.power_latched = true;
            }
        }
        if edges.power_held && self.state.powered && !self.state.power_latched {
            if let Some(pressed_at) = self.state.power_press_time {
                if now.duration_since(pressed_at) >= Duration::from_millis(POWER_HOLD_MS) {
                    self.set_power(false, now);
                    self.state.power_latched = true;
                }
            }
        }

        if edges.mode_new && self.state.powered {
            let accept = match self.state.last_mode_change_time {
                Some(last) => now.duration_since(last) >= Duration::from_millis(MODE_DEBOUNCE_MS),
                None => true,
            };
            if accept {
                self.next_mode();
                self.state.last_mode_change_time = Some(now);
                let level = (self.state.mode as u8).saturating_sub(1);
                self.feedback.show(level, FEEDBACK_MODE, now);
            }
        }

        if edges.effect_new && self.state.powered {
            let accept = match self.state.last_effect_change_time {
                Some(last) => now.duration_since(last) >= Duration::from_millis(EFFECT_DEBOUNCE_MS),
                None => true,
            };
            if accept {
                self.next_effect();
                self.state.last_effect_change_time = Some(now);
                #[allow(clippy::cast_possible_truncation)]
                let level = (self.state.effect_index % 4) as u8;
                self.feedback.show(level, FEEDBACK_EFFECT, now);
            }
        }
    }

    /// Auto light: toggle power when a dark/bright classification holds for
    /// the full dwell window
    fn handle_auto_lighting(&mut self, now: Instant) {
        if self.state.light_button_state == 0 {
            return;
        }
        let Some(light) = self.light.as_mut() else {
            return;
        };
        let raw = light.read_raw();
        let threshold = AUTO_LIGHT_THRESHOLDS[usize::from(self.state.light_button_state - 1)];
        let dark = raw < threshold;

        if self.state.light_classification != Some(dark) {
            self.state.light_classification = Some(dark);
            self.state.low_light_timer_start = Some(now);
            return;
        }
        let Some(start) = self.state.low_light_timer_start else {
            self.state.low_light_timer_start = Some(now);
            return;
        };
        if now.duration_since(start) >= Duration::from_millis(AUTO_LIGHT_DWELL_MS) {
            if dark && !self.state.powered {
                self.set_power(true, now);
            } else if !dark && self.state.powered {
                self.set_power(false, now);
            }
            self.state.low_light_timer_start = Some(now);
        }
    }

    fn apply_range_brightness(&mut self) {
        let Some(range) = self.range.as_mut() else {
            return;
        };
        if let Some(percent) = brightness_from_range(range.read_mm()) {
            let brightness = ((u16::from(percent) * 255) / 100).min(255);
            #[allow(clippy::cast_possible_truncation)]
            self.strips.set_brightness(brightness as u8);
        }
    }

    /// One-time boot animation
    ///
    /// Deliberately blocking: lights every strip pixel by pixel with a short
    /// fixed pause per step. This is the only blocking phase in the runtime
    /// and never repeats after boot.
    fn startup_sweep(&mut self, out: &mut impl StripOutput, delay: &mut impl Delay) {
        self.strips.clear_all();
        for pos in 0..MAX_STRIP_LEN {
            for strip in StripId::ALL {
                if pos < strip.count() {
                    self.strips.set_logical(strip, pos, SWEEP_COLOR);
                }
            }
            self.strips.show_all(out);
            delay.delay_ms(STARTUP_STEP_MS);
        }
        self.strips.clear_all();
        self.strips.show_all(out);
    }

    /// Restore persisted settings, replacing out-of-range values with safe
    /// defaults
    #[allow(clippy::cast_possible_truncation)]
    fn restore_settings(&mut self) {
        let mode = self
            .store
            .read(KEY_MODE)
            .and_then(|raw| Mode::from_raw(raw.min(255) as u8))
            .filter(|mode| *mode != Mode::Off)
            .unwrap_or(Mode::Ambient);
        self.state.mode = mode;

        let effect = self.store.read(KEY_EFFECT).unwrap_or(0) as usize;
        self.state.effect_index = if effect < self.engine.catalog_len(mode) {
            effect
        } else {
            0
        };

        let temp_button = self.store.read(KEY_TEMP_BUTTON).unwrap_or(0);
        self.state.temp_button_state = if temp_button <= 3 { temp_button as u8 } else { 0 };

        let light_button = self.store.read(KEY_LIGHT_BUTTON).unwrap_or(0);
        self.state.light_button_state = if light_button <= 3 {
            light_button as u8
        } else {
            0
        };
    }
}

/// Map a distance reading to a brightness percentage
///
/// `None` leaves the current brightness unchanged: either the sensor reports
/// no target (negative sentinel) or the target is beyond the usable range.
/// Readings inside the near-field dead zone switch the fixture dark.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn brightness_from_range(mm: i32) -> Option<u8> {
    if mm < 0 {
        return None;
    }
    if mm < RANGE_DEAD_ZONE_MM {
        return Some(0);
    }
    if mm > RANGE_MAX_MM {
        return None;
    }
    let span = (RANGE_MAX_MM - RANGE_DEAD_ZONE_MM) as u32;
    let offset = (mm - RANGE_DEAD_ZONE_MM) as u32;
    Some(((offset * 100) / span) as u8)
}
