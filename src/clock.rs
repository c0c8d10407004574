use std::cell::Cell;
use std::time::Instant;

/// Milliseconds since the clock's epoch.
pub type Millis = u64;

/// Source of "now" for every timing rule in the game.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock measured from the moment it was created.
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.epoch.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock for deterministic tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn starting_at(now: Millis) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now.max(self.now.get()));
    }

    pub fn advance(&self, by: Millis) -> Millis {
        let next = self.now.get() + by;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

/// Milliseconds between two readings, zero if `later` is not after `earlier`.
pub fn elapsed(earlier: Millis, later: Millis) -> Millis {
    later.saturating_sub(earlier)
}

/// Fraction of `duration` covered between `start` and `now`, clamped to 0..=1.
pub fn progress(start: Millis, now: Millis, duration: Millis) -> f64 {
    if duration == 0 {
        return 1.0;
    }
    (elapsed(start, now) as f64 / duration as f64).clamp(0.0, 1.0)
}
