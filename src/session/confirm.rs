use tracing::debug;

use crate::clock::{Millis, elapsed, progress};
use crate::engine::rules::ConfirmationRules;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldState {
    Idle,
    Holding { started_at: Millis },
    Confirmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldOutcome {
    Pending,
    Confirmed,
    Aborted,
}

/// The final press that has to be held for the whole duration.
#[derive(Clone, Debug)]
pub struct ConfirmationHold {
    state: HoldState,
    rules: ConfirmationRules,
}

impl ConfirmationHold {
    pub fn new(rules: ConfirmationRules) -> Self {
        Self {
            state: HoldState::Idle,
            rules,
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, HoldState::Holding { .. })
    }

    pub fn progress(&self, now: Millis) -> f64 {
        match self.state {
            HoldState::Idle => 0.0,
            HoldState::Holding { started_at } => progress(started_at, now, self.rules.hold_ms),
            HoldState::Confirmed => 1.0,
        }
    }

    /// Returns false if a hold is already running or finished.
    pub fn begin(&mut self, now: Millis) -> bool {
        if self.state != HoldState::Idle {
            return false;
        }
        debug!(now, "confirmation hold started");
        self.state = HoldState::Holding { started_at: now };
        true
    }

    pub fn release(&mut self, now: Millis) -> HoldOutcome {
        let HoldState::Holding { started_at } = self.state else {
            return HoldOutcome::Pending;
        };

        if elapsed(started_at, now) < self.rules.hold_ms {
            debug!(held_for = elapsed(started_at, now), "confirmation released early");
            self.state = HoldState::Idle;
            HoldOutcome::Aborted
        } else {
            self.state = HoldState::Confirmed;
            HoldOutcome::Confirmed
        }
    }

    pub fn tick(&mut self, now: Millis) -> HoldOutcome {
        if self.is_holding() && self.progress(now) >= 1.0 {
            self.state = HoldState::Confirmed;
            return HoldOutcome::Confirmed;
        }
        HoldOutcome::Pending
    }

    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Millis = 50_000;

    fn hold() -> ConfirmationHold {
        ConfirmationHold::new(ConfirmationRules::default())
    }

    #[test]
    fn test_early_release_aborts() {
        let mut h = hold();
        assert!(h.begin(T0));
        assert_eq!(h.release(T0 + 4000), HoldOutcome::Aborted);
        assert_eq!(h.state(), HoldState::Idle);
    }

    #[test]
    fn test_full_hold_confirms_on_tick() {
        let mut h = hold();
        h.begin(T0);
        assert_eq!(h.tick(T0 + 2500), HoldOutcome::Pending);
        assert_eq!(h.progress(T0 + 2500), 0.5);
        assert_eq!(h.tick(T0 + 5000), HoldOutcome::Confirmed);
        assert_eq!(h.state(), HoldState::Confirmed);
    }

    #[test]
    fn test_release_after_duration_confirms() {
        let mut h = hold();
        h.begin(T0);
        assert_eq!(h.release(T0 + 5000), HoldOutcome::Confirmed);
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut h = hold();
        assert!(h.begin(T0));
        assert!(!h.begin(T0 + 10));
        assert_eq!(h.state(), HoldState::Holding { started_at: T0 });
    }

    #[test]
    fn test_release_without_hold_is_noop() {
        let mut h = hold();
        assert_eq!(h.release(T0), HoldOutcome::Pending);
        assert_eq!(h.tick(T0), HoldOutcome::Pending);
        assert_eq!(h.progress(T0), 0.0);
    }
}
