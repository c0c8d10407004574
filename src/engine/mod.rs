pub mod calibration;
pub mod memory;
pub mod pursuit;
pub mod rhythm;
pub mod rules;
pub mod selector;

use rand::Rng;

use crate::clock::Millis;
use crate::error::FailureReason;

use calibration::Calibration;
use memory::{MemorySequence, Symbol};
use pursuit::{Point, PointerAction, PursuitTracking};
use rhythm::RhythmTap;
use rules::Rules;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    Calibration,
    MemorySequence,
    RhythmTap,
    PursuitTracking,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 4] = [
        ChallengeKind::Calibration,
        ChallengeKind::MemorySequence,
        ChallengeKind::RhythmTap,
        ChallengeKind::PursuitTracking,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChallengeKind::Calibration => "CALIBRATION",
            ChallengeKind::MemorySequence => "REVERSE MEMORY",
            ChallengeKind::RhythmTap => "SYNCHRONIZATION",
            ChallengeKind::PursuitTracking => "TRACKING",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Pending,
    Succeeded,
    Failed(FailureReason),
}

/// Raw input routed to whichever challenge is running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChallengeInput {
    Slider { index: usize, value: f64 },
    Symbol(Symbol),
    Tap,
    Pointer { action: PointerAction, pos: Point },
}

/// State of the one running challenge. Built fresh per activation.
#[derive(Clone, Debug)]
pub enum ChallengeState {
    Calibration(Calibration),
    MemorySequence(MemorySequence),
    RhythmTap(RhythmTap),
    PursuitTracking(PursuitTracking),
}

impl ChallengeState {
    pub fn start<R: Rng + ?Sized>(
        kind: ChallengeKind,
        now: Millis,
        rules: &Rules,
        rng: &mut R,
    ) -> Self {
        match kind {
            ChallengeKind::Calibration => {
                ChallengeState::Calibration(Calibration::start(rules.calibration, rng))
            }
            ChallengeKind::MemorySequence => {
                ChallengeState::MemorySequence(MemorySequence::start(now, rules.memory, rng))
            }
            ChallengeKind::RhythmTap => ChallengeState::RhythmTap(RhythmTap::start(now, rules.rhythm)),
            ChallengeKind::PursuitTracking => {
                ChallengeState::PursuitTracking(PursuitTracking::start(rules.pursuit))
            }
        }
    }

    pub fn kind(&self) -> ChallengeKind {
        match self {
            ChallengeState::Calibration(_) => ChallengeKind::Calibration,
            ChallengeState::MemorySequence(_) => ChallengeKind::MemorySequence,
            ChallengeState::RhythmTap(_) => ChallengeKind::RhythmTap,
            ChallengeState::PursuitTracking(_) => ChallengeKind::PursuitTracking,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ChallengeState::Calibration(c) => c.status(),
            ChallengeState::MemorySequence(m) => m.status(),
            ChallengeState::RhythmTap(r) => r.status(),
            ChallengeState::PursuitTracking(p) => p.status(),
        }
    }

    /// Feed one input event. Inputs meant for another kind are ignored.
    pub fn input(&mut self, input: ChallengeInput, now: Millis) -> Status {
        match (self, input) {
            (ChallengeState::Calibration(c), ChallengeInput::Slider { index, value }) => {
                c.set(index, value)
            }
            (ChallengeState::MemorySequence(m), ChallengeInput::Symbol(symbol)) => {
                m.tap(symbol, now)
            }
            (ChallengeState::RhythmTap(r), ChallengeInput::Tap) => r.tap(now),
            (ChallengeState::PursuitTracking(p), ChallengeInput::Pointer { action, pos }) => {
                p.pointer(action, pos, now)
            }
            (state, _) => state.status(),
        }
    }

    pub fn tick(&mut self, now: Millis) -> Status {
        match self {
            ChallengeState::Calibration(c) => c.status(),
            ChallengeState::MemorySequence(m) => m.tick(now),
            ChallengeState::RhythmTap(r) => r.tick(now),
            ChallengeState::PursuitTracking(p) => p.tick(now),
        }
    }
}
