//! Solid color fill
//!
//! Fills the whole fixture with one color. The ambient catalog is built from
//! a few of these with different presets.

use embassy_time::{Duration, Instant};

use super::{Effect, FrameThrottle};
use crate::color::Rgb;
use crate::strips::{StripBuffers, StripId};

const FRAME_INTERVAL: Duration = Duration::from_millis(33); // ~30 Hz

#[derive(Debug, Clone)]
pub struct SolidEffect {
    name: &'static str,
    color: Rgb,
    skip_ring: bool,
    throttle: FrameThrottle,
}

impl SolidEffect {
    pub const fn new(name: &'static str, color: Rgb) -> Self {
        Self {
            name,
            color,
            skip_ring: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }
}

impl Effect for SolidEffect {
    fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.throttle.ready(now) {
            return;
        }

        for strip in StripId::ALL {
            if strip == StripId::Ring && self.skip_ring {
                continue;
            }
            for logical in 0..strip.count() {
                strips.set_logical(strip, logical, self.color);
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
