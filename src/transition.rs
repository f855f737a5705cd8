use embassy_time::{Duration, Instant};

use crate::math8::{blend8, progress8};

/// Time-based transition between two u8 values
///
/// Used for the ring feedback fade; tick once per frame with the current
/// instant.
#[derive(Debug, Clone)]
pub struct ValueTransition {
    /// Current interpolated value
    current: u8,
    /// Value at the start of transition
    source: u8,
    /// Target value (None if no transition in progress)
    target: Option<u8>,
    /// Total transition duration
    duration: Duration,
    /// Time at which the transition started
    start_time: Instant,
}

impl ValueTransition {
    /// Create a new value transition
    pub const fn new(initial: u8) -> Self {
        Self {
            current: initial,
            source: initial,
            target: None,
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
        }
    }

    /// Get current value
    pub const fn current(&self) -> u8 {
        self.current
    }

    /// Check if a transition is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Set value for transition
    pub fn set(&mut self, value: u8, duration: Duration, start_time: Instant) {
        self.start_time = start_time;
        if duration.as_millis() == 0 {
            // Immediate
            self.current = value;
            self.source = value;
            self.target = None;
            self.duration = Duration::from_millis(0);
        } else {
            // Smooth
            self.source = self.current;
            self.target = Some(value);
            self.duration = duration;
        }
    }

    /// Update transition state
    ///
    /// Call this once per frame with the current instant.
    pub fn tick(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let elapsed = now.duration_since(self.start_time);
        if elapsed >= self.duration {
            self.current = target;
            self.source = target;
            self.target = None;
            return;
        }

        let progress = progress8(elapsed, self.duration);
        self.current = blend8(self.source, target, progress);
    }
}
