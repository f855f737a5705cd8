//! Control-loop pacing
//!
//! Portable tick pacing without async/await or platform timers. The caller
//! owns the loop and the sleep; this scheduler owns the deadline bookkeeping
//! and drives the controller once per tick.

use embassy_time::{Duration, Instant};

use crate::controller::LanternController;
use crate::{AmbientLightSensor, RangeFinder, SettingsStore, StripOutput, TemperatureProbe, TouchPanel};

/// Default control-loop rate
pub const DEFAULT_TICK_HZ: u32 = 125;

/// Default tick duration based on the loop rate
pub const DEFAULT_TICK_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_TICK_HZ as u64);

/// Result of one scheduler tick
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// Deadline for the next tick
    pub next_deadline: Instant,
    /// How long to wait until that deadline (zero when behind schedule)
    pub sleep_duration: Duration,
}

/// Paces the lantern control loop with drift correction
///
/// Falling behind by more than two ticks resets the deadline to now instead
/// of running a catch-up burst.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = TickScheduler::new(controller, output);
///
/// loop {
///     let result = scheduler.tick(Instant::from_millis(now_ms()));
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct TickScheduler<T, L, P, R, S, O> {
    controller: LanternController<T, L, P, R, S>,
    output: O,
    next_tick: Instant,
    tick_duration: Duration,
}

impl<T, L, P, R, S, O> TickScheduler<T, L, P, R, S, O>
where
    T: TouchPanel,
    L: AmbientLightSensor,
    P: TemperatureProbe,
    R: RangeFinder,
    S: SettingsStore,
    O: StripOutput,
{
    pub fn new(controller: LanternController<T, L, P, R, S>, output: O) -> Self {
        Self::with_tick_duration(controller, output, DEFAULT_TICK_DURATION)
    }

    pub fn with_tick_duration(
        controller: LanternController<T, L, P, R, S>,
        output: O,
        tick_duration: Duration,
    ) -> Self {
        Self {
            controller,
            output,
            next_tick: Instant::from_millis(0),
            tick_duration,
        }
    }

    /// Run one controller tick and return timing information
    pub fn tick(&mut self, now: Instant) -> TickResult {
        let max_drift = Duration::from_millis(self.tick_duration.as_millis() * 2);
        if now.as_millis() > self.next_tick.as_millis() + max_drift.as_millis() {
            self.next_tick = now;
        }

        self.controller.update(now, &mut self.output);

        self.next_tick += self.tick_duration;

        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
        }
    }

    pub const fn controller(&self) -> &LanternController<T, L, P, R, S> {
        &self.controller
    }

    pub const fn controller_mut(&mut self) -> &mut LanternController<T, L, P, R, S> {
        &mut self.controller
    }
}
