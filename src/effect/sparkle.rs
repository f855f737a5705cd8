//! Spark-and-decay shimmer
//!
//! Random pixels ignite and fade back out. The ember variant keeps a warm
//! palette; confetti picks a random hue per spark.

use embassy_time::{Duration, Instant};

use super::{Effect, FrameThrottle};
use crate::color::{Hsv, Rgb, hsv2rgb};
use crate::math8::{qsub8, scale8};
use crate::rng::Rng;
use crate::strips::{CORE_LEN, INNER_LEN, OUTER_LEN, RING_LEN, StripBuffers, StripId};

const FRAME_INTERVAL: Duration = Duration::from_millis(22); // ~45 Hz

/// Brightness lost per frame by every lit pixel
const DECAY: u8 = 9;

/// New sparks per frame and strip, out of 255
const IGNITE_CHANCE: u8 = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparkleVariant {
    /// Warm amber sparks
    Ember,
    /// Random hue per spark
    Confetti,
}

#[derive(Debug, Clone)]
struct SparkleField<const N: usize> {
    level: [u8; N],
    hue: [u8; N],
}

impl<const N: usize> SparkleField<N> {
    const fn new() -> Self {
        Self {
            level: [0; N],
            hue: [0; N],
        }
    }

    fn clear(&mut self) {
        self.level = [0; N];
        self.hue = [0; N];
    }

    #[allow(clippy::cast_possible_truncation)]
    fn step(&mut self, rng: &mut Rng) {
        for level in &mut self.level {
            *level = qsub8(*level, DECAY);
        }
        if rng.next_u8() < IGNITE_CHANCE {
            let pos = usize::from(rng.next_below(N as u16));
            if let Some(level) = self.level.get_mut(pos) {
                *level = 180u8.saturating_add(rng.next_u8() % 76);
                self.hue[pos] = rng.next_u8();
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SparkleEffect {
    variant: SparkleVariant,
    core: SparkleField<CORE_LEN>,
    inner: SparkleField<INNER_LEN>,
    outer: SparkleField<OUTER_LEN>,
    ring: SparkleField<RING_LEN>,
    rng: Rng,
    skip_ring: bool,
    throttle: FrameThrottle,
}

impl SparkleEffect {
    pub const fn new(variant: SparkleVariant, seed: u64) -> Self {
        Self {
            variant,
            core: SparkleField::new(),
            inner: SparkleField::new(),
            outer: SparkleField::new(),
            ring: SparkleField::new(),
            rng: Rng::new(seed),
            skip_ring: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    fn color_for(&self, level: u8, hue: u8) -> Rgb {
        match self.variant {
            SparkleVariant::Ember => Rgb {
                r: level,
                g: scale8(level, 96),
                b: 0,
            },
            SparkleVariant::Confetti => hsv2rgb(Hsv {
                hue,
                sat: 240,
                val: level,
            }),
        }
    }
}

impl Effect for SparkleEffect {
    fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.throttle.ready(now) {
            return;
        }

        self.core.step(&mut self.rng);
        self.inner.step(&mut self.rng);
        self.outer.step(&mut self.rng);
        if !self.skip_ring {
            self.ring.step(&mut self.rng);
        }

        for logical in 0..CORE_LEN {
            let color = self.color_for(self.core.level[logical], self.core.hue[logical]);
            strips.set_logical(StripId::Core, logical, color);
        }
        for logical in 0..INNER_LEN {
            let color = self.color_for(self.inner.level[logical], self.inner.hue[logical]);
            strips.set_logical(StripId::Inner, logical, color);
        }
        for logical in 0..OUTER_LEN {
            let color = self.color_for(self.outer.level[logical], self.outer.hue[logical]);
            strips.set_logical(StripId::Outer, logical, color);
        }
        if !self.skip_ring {
            for logical in 0..RING_LEN {
                let color = self.color_for(self.ring.level[logical], self.ring.hue[logical]);
                strips.set_logical(StripId::Ring, logical, color);
            }
        }
    }

    fn reset(&mut self) {
        self.core.clear();
        self.inner.clear();
        self.outer.clear();
        self.ring.clear();
        self.throttle.restart();
    }

    fn name(&self) -> &'static str {
        match self.variant {
            SparkleVariant::Ember => "ember_sparkle",
            SparkleVariant::Confetti => "confetti",
        }
    }

    fn set_skip_ring(&mut self, skip: bool) {
        self.skip_ring = skip;
    }
}
