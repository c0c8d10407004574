use tracing::debug;

use crate::clock::{Millis, elapsed};
use crate::engine::Status;
use crate::engine::rules::RhythmRules;
use crate::error::FailureReason;

/// Tap at a steady interval, within a tolerance window, a fixed number of times.
#[derive(Clone, Debug)]
pub struct RhythmTap {
    taps_done: u32,
    last_tap_at: Millis,
    rules: RhythmRules,
    status: Status,
}

impl RhythmTap {
    pub fn start(now: Millis, rules: RhythmRules) -> Self {
        Self {
            taps_done: 0,
            last_tap_at: now,
            rules,
            status: Status::Pending,
        }
    }

    pub fn taps_done(&self) -> u32 {
        self.taps_done
    }

    pub fn remaining(&self) -> u32 {
        self.rules.taps.saturating_sub(self.taps_done)
    }

    pub fn last_tap_at(&self) -> Millis {
        self.last_tap_at
    }

    pub fn rules(&self) -> &RhythmRules {
        &self.rules
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn since_last_tap(&self, now: Millis) -> Millis {
        elapsed(self.last_tap_at, now)
    }

    pub fn tap(&mut self, at: Millis) -> Status {
        if self.status != Status::Pending {
            return self.status;
        }

        let since = self.since_last_tap(at);
        if (self.rules.earliest()..=self.rules.latest()).contains(&since) {
            self.taps_done += 1;
            self.last_tap_at = at;
            debug!(taps = self.taps_done, since, "rhythm tap accepted");
            if self.taps_done >= self.rules.taps {
                self.status = Status::Succeeded;
            }
        } else {
            debug!(since, "rhythm tap out of window");
            self.status = Status::Failed(FailureReason::SynchronizationError);
        }
        self.status
    }

    pub fn tick(&mut self, now: Millis) -> Status {
        if self.status == Status::Pending && self.since_last_tap(now) > self.rules.timeout() {
            debug!(since = self.since_last_tap(now), "rhythm timed out");
            self.status = Status::Failed(FailureReason::RhythmTimeout);
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Millis = 10_000;

    fn rhythm() -> RhythmTap {
        RhythmTap::start(T0, RhythmRules::default())
    }

    #[test]
    fn test_on_beat_tap_counts() {
        let mut r = rhythm();
        assert_eq!(r.tap(T0 + 1500), Status::Pending);
        assert_eq!(r.taps_done(), 1);
        assert_eq!(r.last_tap_at(), T0 + 1500);
        assert_eq!(r.remaining(), 4);
    }

    #[test]
    fn test_late_tap_fails() {
        let mut r = rhythm();
        assert_eq!(
            r.tap(T0 + 2200),
            Status::Failed(FailureReason::SynchronizationError)
        );
    }

    #[test]
    fn test_early_tap_fails() {
        let mut r = rhythm();
        assert_eq!(
            r.tap(T0 + 600),
            Status::Failed(FailureReason::SynchronizationError)
        );
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let mut r = rhythm();
        assert_eq!(r.tap(T0 + 1200), Status::Pending);
        assert_eq!(r.tap(T0 + 1200 + 1800), Status::Pending);
        assert_eq!(r.taps_done(), 2);
    }

    #[test]
    fn test_timeout_without_tap() {
        let mut r = rhythm();
        assert_eq!(r.tick(T0 + 2000), Status::Pending);
        assert_eq!(
            r.tick(T0 + 2001),
            Status::Failed(FailureReason::RhythmTimeout)
        );
    }

    #[test]
    fn test_timeout_measured_from_last_tap() {
        let mut r = rhythm();
        r.tap(T0 + 1500);
        assert_eq!(r.tick(T0 + 3400), Status::Pending);
        assert_eq!(
            r.tick(T0 + 3501),
            Status::Failed(FailureReason::RhythmTimeout)
        );
    }

    #[test]
    fn test_five_taps_succeed() {
        let mut r = rhythm();
        let mut at = T0;
        for _ in 0..4 {
            at += 1500;
            r.tick(at);
            assert_eq!(r.tap(at), Status::Pending);
        }
        at += 1450;
        assert_eq!(r.tap(at), Status::Succeeded);
        assert_eq!(r.remaining(), 0);
    }
}
