//! Effect engine
//!
//! Owns one ordered animation catalog per mode. All instances are built once
//! at startup and live for the process lifetime; switching the active effect
//! resets the newly selected instance, switching the mode does not.

use embassy_time::Instant;
use heapless::Vec;

use crate::color::{Hsv, Rgb};
use crate::controller::Mode;
use crate::effect::{
    BreathingEffect, EffectSlot, FireEffect, GradientEffect, RainbowEffect, RainbowVariant,
    SolidEffect, SparkleEffect, SparkleVariant,
};
use crate::strips::StripBuffers;

/// Upper bound on catalog length per mode
pub const MAX_CATALOG: usize = 8;

const FIRE_SEED: u64 = 0x6c61_6e74_6572_6e01;
const EMBER_SEED: u64 = 0x6c61_6e74_6572_6e02;
const CONFETTI_SEED: u64 = 0x6c61_6e74_6572_6e03;

const WARM_WHITE: Rgb = Rgb {
    r: 255,
    g: 147,
    b: 41,
};
const AMBER: Rgb = Rgb {
    r: 255,
    g: 126,
    b: 0,
};
const MOON_MIST: Rgb = Rgb {
    r: 120,
    g: 160,
    b: 255,
};
const COOL_BREATH: Rgb = Rgb {
    r: 40,
    g: 90,
    b: 255,
};
const PARTY_PINK: Rgb = Rgb {
    r: 255,
    g: 40,
    b: 160,
};

const fn hsv(hue: u8) -> Hsv {
    Hsv {
        hue,
        sat: 255,
        val: 255,
    }
}

pub struct EffectEngine {
    ambient: Vec<EffectSlot, MAX_CATALOG>,
    gradient: Vec<EffectSlot, MAX_CATALOG>,
    animated: Vec<EffectSlot, MAX_CATALOG>,
    party: Vec<EffectSlot, MAX_CATALOG>,
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectEngine {
    pub fn new() -> Self {
        let mut ambient: Vec<EffectSlot, MAX_CATALOG> = Vec::new();
        let _ = ambient.push(EffectSlot::Solid(SolidEffect::new("warm_white", WARM_WHITE)));
        let _ = ambient.push(EffectSlot::Solid(SolidEffect::new("amber", AMBER)));
        let _ = ambient.push(EffectSlot::Solid(SolidEffect::new("moon_mist", MOON_MIST)));

        let mut gradient: Vec<EffectSlot, MAX_CATALOG> = Vec::new();
        let _ = gradient.push(EffectSlot::Gradient(GradientEffect::new(
            "sunset",
            hsv(5),
            hsv(20),
            hsv(40),
        )));
        let _ = gradient.push(EffectSlot::Gradient(GradientEffect::new(
            "ocean",
            hsv(120),
            hsv(140),
            hsv(165),
        )));
        let _ = gradient.push(EffectSlot::Gradient(GradientEffect::new(
            "forest",
            hsv(90),
            hsv(110),
            hsv(130),
        )));

        let mut animated: Vec<EffectSlot, MAX_CATALOG> = Vec::new();
        let _ = animated.push(EffectSlot::Fire(FireEffect::new(FIRE_SEED)));
        let _ = animated.push(EffectSlot::Breathing(BreathingEffect::new(
            "cool_breath",
            COOL_BREATH,
        )));
        let _ = animated.push(EffectSlot::Sparkle(SparkleEffect::new(
            SparkleVariant::Ember,
            EMBER_SEED,
        )));

        let mut party: Vec<EffectSlot, MAX_CATALOG> = Vec::new();
        let _ = party.push(EffectSlot::Rainbow(RainbowEffect::new(
            RainbowVariant::Forward,
        )));
        let _ = party.push(EffectSlot::Rainbow(RainbowEffect::new(
            RainbowVariant::Backward,
        )));
        let _ = party.push(EffectSlot::Rainbow(RainbowEffect::new(
            RainbowVariant::Mirrored,
        )));
        let _ = party.push(EffectSlot::Sparkle(SparkleEffect::new(
            SparkleVariant::Confetti,
            CONFETTI_SEED,
        )));
        let _ = party.push(EffectSlot::Breathing(
            BreathingEffect::new("party_pulse", PARTY_PINK).with_period_ms(1_500),
        ));
        let _ = party.push(EffectSlot::Gradient(GradientEffect::new(
            "candy",
            hsv(200),
            hsv(230),
            hsv(5),
        )));

        Self {
            ambient,
            gradient,
            animated,
            party,
        }
    }

    fn catalog(&self, mode: Mode) -> &Vec<EffectSlot, MAX_CATALOG> {
        match mode {
            Mode::Off | Mode::Ambient => &self.ambient,
            Mode::Gradient => &self.gradient,
            Mode::Animated => &self.animated,
            Mode::Party => &self.party,
        }
    }

    fn catalog_mut(&mut self, mode: Mode) -> &mut Vec<EffectSlot, MAX_CATALOG> {
        match mode {
            Mode::Off | Mode::Ambient => &mut self.ambient,
            Mode::Gradient => &mut self.gradient,
            Mode::Animated => &mut self.animated,
            Mode::Party => &mut self.party,
        }
    }

    /// Number of animations registered for a mode
    pub fn catalog_len(&self, mode: Mode) -> usize {
        self.catalog(mode).len()
    }

    /// Name of one registered animation
    pub fn effect_name(&self, mode: Mode, index: usize) -> Option<&'static str> {
        self.catalog(mode).get(index).map(EffectSlot::name)
    }

    /// Reset one animation so it starts from a clean state
    pub fn reset(&mut self, mode: Mode, index: usize) {
        if let Some(slot) = self.catalog_mut(mode).get_mut(index) {
            slot.reset();
        }
    }

    /// Render one tick of the selected animation
    pub fn update(
        &mut self,
        mode: Mode,
        index: usize,
        now: Instant,
        strips: &mut StripBuffers,
        skip_ring: bool,
    ) {
        if let Some(slot) = self.catalog_mut(mode).get_mut(index) {
            slot.set_skip_ring(skip_ring);
            slot.update(now, strips);
        }
    }

    /// Render the fire-style animation registered under ANIMATED instead of
    /// the selected one (temperature override, single-tick hand-off)
    ///
    /// Returns false when no fire animation is registered.
    pub fn update_fire(&mut self, now: Instant, strips: &mut StripBuffers, skip_ring: bool) -> bool {
        let Some(slot) = self
            .animated
            .iter_mut()
            .find(|slot| slot.is_fire())
        else {
            return false;
        };
        slot.set_skip_ring(skip_ring);
        slot.update(now, strips);
        true
    }
}
