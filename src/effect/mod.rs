//! Animation contract and the concrete animations
//!
//! All animations are stored in an enum to avoid heap allocations. Each
//! animation implements the `Effect` trait and self-throttles: `update` is
//! called every control-loop tick, and the animation returns immediately when
//! its own frame interval has not elapsed yet.

mod breathing;
mod fire;
mod gradient;
mod rainbow;
mod solid;
mod sparkle;

use embassy_time::{Duration, Instant};

pub use breathing::BreathingEffect;
pub use fire::{FireEffect, heat_color};
pub use gradient::GradientEffect;
pub use rainbow::{RainbowEffect, RainbowVariant};
pub use solid::SolidEffect;
pub use sparkle::{SparkleEffect, SparkleVariant};

use crate::strips::StripBuffers;

pub trait Effect {
    /// Render a single frame into the strip buffers
    ///
    /// Must honor the animation's own frame interval and the skip-ring flag:
    /// while skip-ring is set, ring pixels are left untouched (not zeroed).
    fn update(&mut self, now: Instant, strips: &mut StripBuffers);

    /// Reset animation state
    fn reset(&mut self) {}

    /// Human-readable animation name
    fn name(&self) -> &'static str {
        "effect"
    }

    /// One-way signal: suppress ring-strip writes for the current tick
    fn set_skip_ring(&mut self, _skip: bool) {}
}

/// Per-animation frame pacing
///
/// The engine imposes no global frame limiter; every animation gates itself
/// on its own target interval.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameThrottle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns true when a new frame is due, advancing the gate
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last frame time so the next `ready` fires immediately
    pub fn restart(&mut self) {
        self.last = None;
    }
}

/// Animation slot - enum containing all possible animations
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Solid single-color fill
    Solid(SolidEffect),
    /// Static three-point gradient
    Gradient(GradientEffect),
    /// Slow whole-fixture brightness oscillation
    Breathing(BreathingEffect),
    /// Cycling rainbow
    Rainbow(RainbowEffect),
    /// Random spark-and-decay shimmer
    Sparkle(SparkleEffect),
    /// Heat-diffusion flame simulation
    Fire(FireEffect),
}

impl EffectSlot {
    /// Render the current animation
    pub fn update(&mut self, now: Instant, strips: &mut StripBuffers) {
        match self {
            Self::Solid(effect) => effect.update(now, strips),
            Self::Gradient(effect) => effect.update(now, strips),
            Self::Breathing(effect) => effect.update(now, strips),
            Self::Rainbow(effect) => effect.update(now, strips),
            Self::Sparkle(effect) => effect.update(now, strips),
            Self::Fire(effect) => effect.update(now, strips),
        }
    }

    /// Reset the animation state
    pub fn reset(&mut self) {
        match self {
            Self::Solid(effect) => Effect::reset(effect),
            Self::Gradient(effect) => Effect::reset(effect),
            Self::Breathing(effect) => Effect::reset(effect),
            Self::Rainbow(effect) => Effect::reset(effect),
            Self::Sparkle(effect) => Effect::reset(effect),
            Self::Fire(effect) => Effect::reset(effect),
        }
    }

    /// Animation name for external observation
    pub fn name(&self) -> &'static str {
        match self {
            Self::Solid(effect) => effect.name(),
            Self::Gradient(effect) => effect.name(),
            Self::Breathing(effect) => effect.name(),
            Self::Rainbow(effect) => effect.name(),
            Self::Sparkle(effect) => effect.name(),
            Self::Fire(effect) => effect.name(),
        }
    }

    /// Forward the skip-ring flag
    pub fn set_skip_ring(&mut self, skip: bool) {
        match self {
            Self::Solid(effect) => effect.set_skip_ring(skip),
            Self::Gradient(effect) => effect.set_skip_ring(skip),
            Self::Breathing(effect) => effect.set_skip_ring(skip),
            Self::Rainbow(effect) => effect.set_skip_ring(skip),
            Self::Sparkle(effect) => effect.set_skip_ring(skip),
            Self::Fire(effect) => effect.set_skip_ring(skip),
        }
    }

    /// True for the fire-style animation the temperature override targets
    pub const fn is_fire(&self) -> bool {
        matches!(self, Self::Fire(_))
    }
}
