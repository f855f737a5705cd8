//! Heat-diffusion flame simulation
//!
//! One byte heat field per inner/outer segment; segments never diffuse into
//! each other. Every frame runs cooling, tip-ward diffusion, optional
//! sparking and isolated-ember suppression, then maps heat to a warm
//! four-band color ramp. The core strip carries no heat field and stays dark.

use embassy_time::{Duration, Instant};

use super::{Effect, FrameThrottle};
use crate::color::Rgb;
use crate::math8::{qadd8, qsub8, remap8};
use crate::rng::Rng;
use crate::strips::{
    INNER_SEGMENT_LEN, OUTER_SEGMENT_LEN, SEGMENTS, StripBuffers, StripId,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(8); // ~125 Hz

/// Heat bands written by `reset`: hot base / medium middle / cool tip
pub const RESET_BASE_HEAT: u8 = 204;
pub const RESET_MIDDLE_HEAT: u8 = 128;
pub const RESET_TIP_HEAT: u8 = 51;

/// Random cooling ceiling for the middle of a segment; halved near the base,
/// doubled near the tip
const COOLING_CEILING: u8 = 12;

/// Chance out of 255 that a segment sparks this frame
pub const DEFAULT_SPARK_CHANCE: u8 = 110;

/// Sparks land on one of this many pixels above the base
const SPARK_ZONE: usize = 5;
const SPARK_BOOST_MIN: u8 = 160;
const SPARK_BOOST_SPAN: u16 = 96;

/// Map a heat value onto the flame ramp
///
/// Four piecewise-linear bands: black, dark red, red with a touch of green,
/// full red with increasing green. Blue is never introduced.
pub const fn heat_color(heat: u8) -> Rgb {
    match heat {
        0 => Rgb { r: 0, g: 0, b: 0 },
        1..=84 => Rgb {
            r: remap8(heat, 1, 84, 40, 140),
            g: 0,
            b: 0,
        },
        85..=169 => Rgb {
            r: remap8(heat, 85, 169, 140, 255),
            g: remap8(heat, 85, 169, 0, 20),
            b: 0,
        },
        170..=255 => Rgb {
            r: 255,
            g: remap8(heat, 170, 255, 20, 110),
            b: 0,
        },
    }
}

/// Advance one segment's heat field by one simulation frame
fn step_heat(field: &mut [u8], rng: &mut Rng, spark_chance: u8) {
    let len = field.len();
    if len < 3 {
        return;
    }
    let base_zone = (len * 3) / 10;
    let tip_zone = len - (len * 3) / 10;

    // Cooling: faster far from the heat source
    for (k, heat) in field.iter_mut().enumerate() {
        let ceiling = if k < base_zone {
            COOLING_CEILING / 2
        } else if k >= tip_zone {
            COOLING_CEILING * 2
        } else {
            COOLING_CEILING
        };
        #[allow(clippy::cast_possible_truncation)]
        let loss = rng.next_below(u16::from(ceiling) + 1) as u8;
        *heat = qsub8(*heat, loss);
    }

    // Diffusion toward the tip, processed tip-to-base so lower neighbors
    // still hold this frame's cooled values
    #[allow(clippy::cast_possible_truncation)]
    for k in (1..len).rev() {
        let here = u16::from(field[k]);
        let below = u16::from(field[k - 1]);
        field[k] = if k >= 2 {
            let second = u16::from(field[k - 2]);
            ((here + 2 * below + second) / 4) as u8
        } else {
            ((here + 2 * below) / 3) as u8
        };
    }

    // Sparking near the base
    if spark_chance > 0 && rng.next_u8() < spark_chance {
        let zone = SPARK_ZONE.min(len);
        #[allow(clippy::cast_possible_truncation)]
        let pos = usize::from(rng.next_below(zone as u16));
        #[allow(clippy::cast_possible_truncation)]
        let boost = SPARK_BOOST_MIN.saturating_add(rng.next_below(SPARK_BOOST_SPAN) as u8);
        field[pos] = qadd8(field[pos], boost);
    }

    // Isolated-ember suppression near the tip: a lit pixel with nothing two
    // positions below it cannot plausibly be burning
    for k in tip_zone.max(2)..len {
        if field[k] > 0 && field[k - 2] == 0 {
            field[k] = 0;
        }
    }
}

fn reset_field(field: &mut [u8]) {
    let len = field.len();
    let third = len / 3;
    for (k, heat) in field.iter_mut().enumerate() {
        *heat = if k < third {
            RESET_BASE_HEAT
        } else if k < 2 * third {
            RESET_MIDDLE_HEAT
        } else {
            RESET_TIP_HEAT
        };
    }
}

#[derive(Debug, Clone)]
pub struct FireEffect {
    inner: [[u8; INNER_SEGMENT_LEN]; SEGMENTS],
    outer: [[u8; OUTER_SEGMENT_LEN]; SEGMENTS],
    rng: Rng,
    spark_chance: u8,
    skip_ring: bool,
    throttle: FrameThrottle,
}

impl FireEffect {
    pub fn new(seed: u64) -> Self {
        let mut fire = Self {
            inner: [[0; INNER_SEGMENT_LEN]; SEGMENTS],
            outer: [[0; OUTER_SEGMENT_LEN]; SEGMENTS],
            rng: Rng::new(seed),
            spark_chance: DEFAULT_SPARK_CHANCE,
            skip_ring: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        };
        fire.reset_fields();
        fire
    }

    #[must_use]
    pub fn with_spark_chance(mut self, chance: u8) -> Self {
        self.spark_chance = chance;
        self
    }

    /// Heat field of one segment (inner/outer only)
    pub fn heat(&self, strip: StripId, segment: usize) -> Option<&[u8]> {
        match strip {
            StripId::Inner => self.inner.get(segment).map(|s| s.as_slice()),
            StripId::Outer => self.outer.get(segment).map(|s| s.as_slice()),
            StripId::Core | StripId::Ring => None,
        }
    }

    /// Overwrite every heat field with one value
    pub fn fill_heat(&mut self, value: u8) {
        for field in &mut self.inner {
            field.fill(value);
        }
        for field in &mut self.outer {
            field.fill(value);
        }
    }

    fn reset_fields(&mut self) {
        for field in &mut self.inner {
            reset_field(field);
        }
        for field in &mut self.outer {
            reset_field(field);
        }
    }

    /// Run one simulation frame without waiting for the frame interval
    pub fn step(&mut self) {
        for field in &mut self.inner {
            step_heat(field, &mut self.rng, self.spark_chance);
        }
        for field in &mut self.outer {
            step_heat(field, &mut self.rng, self.spark_chance);
        }
    }

    fn paint(&self, strips: &mut StripBuffers) {
        // No heat field for the core; it stays dark in this animation
        strips.clear(StripId::Core);

        for (segment, field) in self.inner.iter().enumerate() {
            for (logical, &heat) in field.iter().enumerate() {
                strips.set_segment(StripId::Inner, segment, logical, heat_color(heat));
            }
        }
        for (segment, field) in self.outer.iter().enumerate() {
            for (logical, &heat) in field.iter().enumerate() {
                strips.set_segment(StripId::Outer, segment, logical, heat_color(heat));
            }
        }

        if !self.skip_ring {
            strips.clear(StripId::Ring);
        }
    }
}

impl Effect for FireEffect {
    fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.throttle.ready(now) {
            return;
        }
        self.step();
        self.paint(strips);
    }

    fn reset(&mut self) {
        self.reset_fields();
        self.throttle.restart();
    }

    fn name(&self) -> &'static str {
        "fire"
    }

    fn set_skip_ring(&mut self, skip: bool) {
        self.skip_ring = skip;
    }
}
