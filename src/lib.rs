#![no_std]

pub mod color;
pub mod controller;
pub mod effect;
pub mod engine;
pub mod feedback;
pub mod math8;
pub mod rng;
pub mod strips;
pub mod tick;
pub mod transition;

pub use controller::{LanternController, LanternState, Mode, brightness_from_range};
pub use engine::EffectEngine;
pub use strips::{StripBuffers, StripId, map};
pub use tick::TickScheduler;

pub use color::{Hsv, Rgb};
pub use math8::{blend8, progress8, scale8};
pub use embassy_time::{Duration, Instant};

/// Abstract LED strip output
///
/// Implement this trait to support different hardware platforms.
/// The lantern runtime flushes all four strips through it once per tick.
pub trait StripOutput {
    /// Write the pixel colors of one strip
    fn write(&mut self, strip: StripId, colors: &[Rgb]);
}

/// Blocking delay used only by the one-time startup sweep
///
/// The steady-state tick loop never blocks; this seam exists solely for the
/// boot animation.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Logical touch channels of the capacitive panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TouchChannel {
    Temperature = 0,
    LightSensitivity = 1,
    Power = 2,
    Mode = 3,
    Effect = 4,
}

/// Capacitive touch panel with per-channel edge detection
pub trait TouchPanel {
    /// Initialize the panel, returning `false` if the hardware is missing
    fn init(&mut self) -> bool {
        true
    }

    /// Current (level) state of a channel
    fn is_touched(&mut self, channel: TouchChannel) -> bool;

    /// True exactly once per press, on the tick the touch begins
    fn is_new_touch(&mut self, channel: TouchChannel) -> bool;

    /// True exactly once per press, on the tick the touch ends
    fn is_new_release(&mut self, channel: TouchChannel) -> bool;
}

/// Ambient light sensor returning a raw brightness count
pub trait AmbientLightSensor {
    fn init(&mut self) -> bool {
        true
    }

    fn read_raw(&mut self) -> u16;
}

/// Temperature probe in degrees Celsius
pub trait TemperatureProbe {
    fn init(&mut self) -> bool {
        true
    }

    fn read_celsius(&mut self) -> f32;
}

/// Distance sensor in millimeters
///
/// Returns `-1` when no target is in range.
pub trait RangeFinder {
    fn init(&mut self) -> bool {
        true
    }

    fn read_mm(&mut self) -> i32;
}

/// Persistent key-value store for small integers
///
/// Read once at power-on, written immediately on every change.
pub trait SettingsStore {
    fn read(&mut self, key: &str) -> Option<u32>;
    fn write(&mut self, key: &str, value: u32);
}
