// src/navigation/clock.rs
// Time sources for the open-loop primitives and a fixed-rate sleeper.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source the primitives integrate against
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;

    /// Block for the given duration
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at the current instant
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that only moves when slept on.
///
/// Lets whole maneuvers run instantly and deterministically.
#[derive(Debug, Default)]
pub struct SimulatedClock {
    now: Cell<Duration>,
}

impl SimulatedClock {
    /// Starts a virtual clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward without sleeping
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Keeps a loop at a fixed period.
///
/// Each `sleep` waits until the end of the current cycle. A loop that falls
/// more than one full period behind restarts its cycle from now instead of
/// trying to catch up.
#[derive(Debug, Clone)]
pub struct Rate {
    period: Duration,
    cycle_start: Duration,
}

impl Rate {
    /// Creates a rate whose first cycle starts at `now`
    pub fn new(period: Duration, now: Duration) -> Self {
        Rate {
            period,
            cycle_start: now,
        }
    }

    /// Sleeps until the end of the current cycle. Returns `false` if the
    /// cycle had already overrun.
    pub fn sleep<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        let now = clock.now();
        if now < self.cycle_start {
            self.cycle_start = now;
        }

        let cycle_end = self.cycle_start + self.period;
        self.cycle_start = cycle_end;

        if now < cycle_end {
            clock.sleep(cycle_end - now);
            return true;
        }

        if now > cycle_end + self.period {
            self.cycle_start = now;
        }
        false
    }
}
