pub mod confirm;
pub mod letters;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::clock::Millis;
use crate::engine::rules::Rules;
use crate::engine::selector;
use crate::engine::{ChallengeInput, ChallengeKind, ChallengeState, Status};
use crate::error::{FailureReason, SessionError};

use confirm::{ConfirmationHold, HoldOutcome};
use letters::LetterSlot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InProgress,
    ChallengeActive,
    ReadyToSubmit,
    Confirming,
}

/// Notifications for the presentation layer, returned by the call that caused them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    ChallengeStarted { index: usize, kind: ChallengeKind },
    LetterAccepted { index: usize, ch: char },
    Failed(FailureReason),
    Confirmed,
}

#[derive(Clone, Debug)]
pub struct ActiveChallenge {
    pub letter_index: usize,
    pub state: ChallengeState,
}

impl ActiveChallenge {
    pub fn kind(&self) -> ChallengeKind {
        self.state.kind()
    }
}

/// One attempt at spelling a target word.
pub struct Session<R = SmallRng> {
    letters: Vec<LetterSlot>,
    typed: Vec<char>,
    active: Option<ActiveChallenge>,
    last_kind: Option<ChallengeKind>,
    hold: ConfirmationHold,
    rules: Rules,
    rng: R,
}

impl Session<SmallRng> {
    pub fn new(rules: Rules, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(rules, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(rules: Rules, rng: R) -> Self {
        Self {
            letters: Vec::new(),
            typed: Vec::new(),
            active: None,
            last_kind: None,
            hold: ConfirmationHold::new(rules.confirmation),
            rules,
            rng,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        if self.letters.is_empty() {
            Phase::Idle
        } else if self.active.is_some() {
            Phase::ChallengeActive
        } else if self.hold.is_holding() {
            Phase::Confirming
        } else if self.typed.len() == self.letters.len() {
            Phase::ReadyToSubmit
        } else {
            Phase::InProgress
        }
    }

    pub fn letters(&self) -> &[LetterSlot] {
        &self.letters
    }

    pub fn target(&self) -> String {
        self.letters.iter().map(|slot| slot.ch).collect()
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn typed_text(&self) -> String {
        self.typed.iter().collect()
    }

    /// Index and character of the first unsolved letter.
    pub fn next_letter(&self) -> Option<(usize, char)> {
        self.letters
            .iter()
            .enumerate()
            .find(|(_, slot)| !slot.solved)
            .map(|(i, slot)| (i, slot.ch))
    }

    pub fn active(&self) -> Option<&ActiveChallenge> {
        self.active.as_ref()
    }

    pub fn last_kind(&self) -> Option<ChallengeKind> {
        self.last_kind
    }

    pub fn confirmation(&self) -> &ConfirmationHold {
        &self.hold
    }

    /// Start over with a new word. Rejects words that are blank after trimming.
    pub fn set_target(&mut self, word: &str) -> Result<(), SessionError> {
        let word = letters::normalize_target(word);
        if word.is_empty() {
            return Err(SessionError::InvalidTarget);
        }
        info!(target_word = %word, "new target");
        self.letters = letters::slots_for(&word);
        self.typed.clear();
        self.active = None;
        self.last_kind = None;
        self.hold.reset();
        Ok(())
    }

    pub fn press_letter(&mut self, ch: char, now: Millis) -> Option<SessionEvent> {
        if self.phase() != Phase::InProgress {
            return None;
        }
        let (index, expected) = self.next_letter()?;
        if letters::normalize_key(ch) != Some(expected) {
            return None;
        }

        let kind = selector::select(self.last_kind, &mut self.rng);
        self.last_kind = Some(kind);
        let state = ChallengeState::start(kind, now, &self.rules, &mut self.rng);
        debug!(index, letter = %expected, ?kind, "challenge started");
        self.active = Some(ActiveChallenge {
            letter_index: index,
            state,
        });
        Some(SessionEvent::ChallengeStarted { index, kind })
    }

    pub fn challenge_input(&mut self, input: ChallengeInput, now: Millis) -> Option<SessionEvent> {
        let status = self.active.as_mut()?.state.input(input, now);
        self.apply(status)
    }

    pub fn challenge_succeeded(&mut self) -> Option<SessionEvent> {
        let active = self.active.take()?;
        let slot = &mut self.letters[active.letter_index];
        slot.solved = true;
        self.typed.push(slot.ch);
        info!(
            index = active.letter_index,
            letter = %slot.ch,
            typed = self.typed.len(),
            "letter accepted"
        );
        Some(SessionEvent::LetterAccepted {
            index: active.letter_index,
            ch: slot.ch,
        })
    }

    pub fn challenge_failed(&mut self, reason: FailureReason) -> Option<SessionEvent> {
        self.active.as_ref()?;
        Some(self.fail(reason))
    }

    pub fn tick(&mut self, now: Millis) -> Option<SessionEvent> {
        if let Some(active) = self.active.as_mut() {
            let status = active.state.tick(now);
            return self.apply(status);
        }
        match self.hold.tick(now) {
            HoldOutcome::Confirmed => Some(self.confirm()),
            _ => None,
        }
    }

    /// Start the final hold. Only allowed once every letter is solved.
    pub fn begin_confirmation(&mut self, now: Millis) -> bool {
        if self.phase() != Phase::ReadyToSubmit {
            return false;
        }
        self.hold.begin(now)
    }

    pub fn release_confirmation(&mut self, now: Millis) -> Option<SessionEvent> {
        match self.hold.release(now) {
            HoldOutcome::Pending => None,
            HoldOutcome::Aborted => Some(self.fail(FailureReason::ConfirmationAborted)),
            HoldOutcome::Confirmed => Some(self.confirm()),
        }
    }

    /// Clear all progress on the current word. `last_kind` survives.
    pub fn full_reset(&mut self) {
        for slot in &mut self.letters {
            slot.solved = false;
        }
        self.typed.clear();
        self.active = None;
        self.hold.reset();
    }

    fn apply(&mut self, status: Status) -> Option<SessionEvent> {
        match status {
            Status::Pending => None,
            Status::Succeeded => self.challenge_succeeded(),
            Status::Failed(reason) => self.challenge_failed(reason),
        }
    }

    fn fail(&mut self, reason: FailureReason) -> SessionEvent {
        warn!(%reason, typed = self.typed.len(), "full reset");
        self.full_reset();
        SessionEvent::Failed(reason)
    }

    fn confirm(&mut self) -> SessionEvent {
        info!(target_word = %self.target(), "session confirmed");
        self.letters.clear();
        self.typed.clear();
        self.active = None;
        self.hold.reset();
        SessionEvent::Confirmed
    }
}
