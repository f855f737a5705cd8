//! Transient ring feedback overlay
//!
//! Button presses briefly take over the ring strip to show the new setting
//! level as a bar that fades back out. While the overlay is active the
//! controller raises the skip-ring flag on the running animation.

use embassy_time::{Duration, Instant};

use crate::color::Rgb;
use crate::math8::scale8;
use crate::strips::{RING_LEN, StripBuffers, StripId};
use crate::transition::ValueTransition;

/// How long a button press owns the ring
pub const FEEDBACK_WINDOW_MS: u64 = 1_200;

#[derive(Debug, Clone)]
pub struct RingFeedback {
    started: Option<Instant>,
    level: u8,
    color: Rgb,
    fade: ValueTransition,
}

impl Default for RingFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl RingFeedback {
    pub const fn new() -> Self {
        Self {
            started: None,
            level: 0,
            color: Rgb { r: 0, g: 0, b: 0 },
            fade: ValueTransition::new(0),
        }
    }

    /// Start a feedback window showing `level` (0-3) in `color`
    pub fn show(&mut self, level: u8, color: Rgb, now: Instant) {
        self.started = Some(now);
        self.level = level.min(3);
        self.color = color;
        self.fade.set(255, Duration::from_millis(0), now);
        self.fade
            .set(0, Duration::from_millis(FEEDBACK_WINDOW_MS), now);
    }

    /// True while the overlay owns the ring
    pub fn is_active(&self, now: Instant) -> bool {
        match self.started {
            Some(started) => {
                now.duration_since(started) < Duration::from_millis(FEEDBACK_WINDOW_MS)
            }
            None => false,
        }
    }

    /// Paint the level bar onto the ring
    pub fn render(&mut self, now: Instant, strips: &mut StripBuffers) {
        if !self.is_active(now) {
            self.started = None;
            return;
        }
        self.fade.tick(now);
        let intensity = self.fade.current();

        let lit = (RING_LEN * usize::from(self.level + 1)) / 4;
        for index in 0..RING_LEN {
            let color = if index < lit {
                Rgb {
                    r: scale8(self.color.r, intensity),
                    g: scale8(self.color.g, intensity),
                    b: scale8(self.color.b, intensity),
                }
            } else {
                Rgb { r: 0, g: 0, b: 0 }
            };
            strips.set_physical(StripId::Ring, index, color);
        }
    }
}
