//! Breathing effect
//!
//! One slow sinusoidal brightness oscillation over a fixed color. The phase
//! is derived from the tick instant, so the oscillator needs no per-frame
//! state beyond its throttle.

use embassy_time::{Duration, Instant};

use super::{Effect, FrameThrottle};
use crate::color::Rgb;
use crate::math8::scale8;
use crate::strips::{StripBuffers, StripId};

const FRAME_INTERVAL: Duration = Duration::from_millis(16); // ~60 Hz
const DEFAULT_PERIOD_MS: u64 = 4_000;

/// Floor of the oscillation so the fixture never fully blacks out
const MIN_LEVEL: u8 = 40;

#[derive(Debug, Clone)]
pub struct BreathingEffect {
    name: &'static str,
    color: Rgb,
    period_ms: u64,
    skip_ring: bool,
    throttle: FrameThrottle,
}

impl BreathingEffect {
    pub const fn new(name: &'static str, color: Rgb) -> Self {
        Self {
            name,
            color,
            period_ms: DEFAULT_PERIOD_MS,
            skip_ring: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    #[must_use]
    pub const fn with_period_ms(mut self, period_ms: u64) -> Self {
        self.period_ms = period_ms;
        self
    }

    /// Brightness level (0-255) for the current phase
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn level(&self, now: Instant) -> u8 {
        let phase_ms = now.as_millis() % self.period_ms.max(1);
        let phase = (phase_ms as f32 / self.period_ms.max(1) as f32) * core::f32::consts::TAU;
        // 0.0..=1.0 raised sine
        let wave = (libm::sinf(phase) + 1.0) * 0.5;
        let span = f32::from(255 - MIN_LEVEL);
        MIN_LEVEL + (wave * span) as u8
    }
}

impl Effect for BreathingEffect {
    fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.throttle.ready(now) {
            return;
        }

        let level = self.level(now);
        let color = Rgb {
            r: scale8(self.color.r, level),
            g: scale8(self.color.g, level),
            b: scale8(self.color.b, level),
        };

        for strip in StripId::ALL {
            if strip == StripId::Ring && self.skip_ring {
                continue;
            }
            for logical in 0..strip.count() {
                strips.set_logical(strip, logical, color);
            }
        }
    }

    fn reset(&mut self) {
        self.throttle.restart();
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn set_skip_ring(&mut self, skip: bool) {
        self.skip_ring = skip;
    }
}
