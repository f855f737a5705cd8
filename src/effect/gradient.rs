//! Static three-point gradient
//!
//! Each sub-strip segment runs the same base-to-tip gradient; the core strip
//! runs it over its full logical length and the ring wraps it around.

use embassy_time::{Duration, Instant};

use super::{Effect, FrameThrottle};
use crate::color::{Hsv, fill_gradient_three};
use crate::strips::{SEGMENTS, StripBuffers, StripId};

const FRAME_INTERVAL: Duration = Duration::from_millis(33); // ~30 Hz

#[derive(Clone)]
pub struct GradientEffect {
    name: &'static str,
    base: Hsv,
    middle: Hsv,
    tip: Hsv,
    skip_ring: bool,
    throttle: FrameThrottle,
}

impl core::fmt::Debug for GradientEffect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GradientEffect")
            .field("name", &self.name)
            .field("base_hue", &self.base.hue)
            .field("middle_hue", &self.middle.hue)
            .field("tip_hue", &self.tip.hue)
            .field("skip_ring", &self.skip_ring)
            .field("throttle", &self.throttle)
            .finish()
    }
}

impl GradientEffect {
    pub const fn new(name: &'static str, base: Hsv, middle: Hsv, tip: Hsv) -> Self {
        Self {
            name,
            base,
            middle,
            tip,
            skip_ring: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }
}

impl Effect for GradientEffect {
    fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.throttle.ready(now) {
            return;
        }

        fill_gradient_three(
            StripId::Core.count(),
            self.base,
            self.middle,
            self.tip,
            |logical, color| strips.set_logical(StripId::Core, logical, color),
        );

        for strip in [StripId::Inner, StripId::Outer] {
            for segment in 0..SEGMENTS {
                fill_gradient_three(
                    strip.segment_len(),
                    self.base,
                    self.middle,
                    self.tip,
                    |logical, color| strips.set_segment(strip, segment, logical, color),
                );
            }
        }

        if !self.skip_ring {
            fill_gradient_three(
                StripId::Ring.count(),
                self.base,
                self.middle,
                self.tip,
                |logical, color| strips.set_logical(StripId::Ring, logical, color),
            );
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
