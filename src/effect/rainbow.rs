//! Rainbow cycling effect
//!
//! Walks the hue circle over time while spreading it across each strip's
//! logical length. Three variants cover the forward, backward and mirrored
//! party presets.

use embassy_time::{Duration, Instant};

use super::{Effect, FrameThrottle};
use crate::color::{Hsv, hsv2rgb};
use crate::strips::{StripBuffers, StripId};

const FRAME_INTERVAL: Duration = Duration::from_millis(12); // ~80 Hz
const DEFAULT_CYCLE_MS: u64 = 9_000;

/// Hue span stretched across one strip
const HUE_SPREAD: u16 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainbowVariant {
    Forward,
    Backward,
    Mirrored,
}

#[derive(Debug, Clone)]
pub struct RainbowEffect {
    variant: RainbowVariant,
    cycle_ms: u64,
    skip_ring: bool,
    throttle: FrameThrottle,
}

impl RainbowEffect {
    pub const fn new(variant: RainbowVariant) -> Self {
        Self {
            variant,
            cycle_ms: DEFAULT_CYCLE_MS,
            skip_ring: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    #[must_use]
    pub const fn with_cycle_ms(mut self, cycle_ms: u64) -> Self {
        self.cycle_ms = cycle_ms;
        self
    }

    #[allow(clippy::cast_possible_truncation)]
    fn base_hue(&self, now: Instant) -> u8 {
        let cycle = self.cycle_ms.max(1);
        let progress = now.as_millis() % cycle;
        let hue = (progress * 255) / cycle;
        match self.variant {
            RainbowVariant::Backward => 255 - hue as u8,
            _ => hue as u8,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn hue_at(&self, base: u8, logical: usize, len: usize) -> u8 {
        let len = len.max(1);
        let pos = match self.variant {
            // Fold positions around the strip center
            RainbowVariant::Mirrored => {
                let half = len / 2;
                if logical >= half { len - 1 - logical } else { logical }
            }
            _ => logical,
        };
        let offset = (pos * usize::from(HUE_SPREAD)) / len;
        base.wrapping_add(offset as u8)
    }
}

impl Effect for RainbowEffect {
    fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.throttle.ready(now) {
            return;
        }

        let base = self.base_hue(now);
        for strip in StripId::ALL {
            if strip == StripId::Ring && self.skip_ring {
                continue;
            }
            let len = strip.count();
            for logical in 0..len {
                let color = hsv2rgb(Hsv {
                    hue: self.hue_at(base, logical, len),
                    sat: 255,
                    val: 255,
                });
                strips.set_logical(strip, logical, color);
            }
        }
    }

    fn reset(&mut self) {
        self.throttle.restart();
    }

    fn name(&self) -> &'static str {
        match self.variant {
            RainbowVariant::Forward => "rainbow_forward",
            RainbowVariant::Backward => "rainbow_backward",
            RainbowVariant::Mirrored => "rainbow_mirrored",
        }
    }

    fn set_skip_ring(&mut self, skip: bool) {
        self.skip_ring = skip;
    }
}
