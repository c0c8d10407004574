use rand::Rng;
use tracing::debug;

use crate::clock::{Millis, elapsed};
use crate::engine::Status;
use crate::engine::rules::MemoryRules;
use crate::error::FailureReason;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::Red, Symbol::Blue, Symbol::Green, Symbol::Yellow];

    pub fn index(self) -> usize {
        match self {
            Symbol::Red => 0,
            Symbol::Blue => 1,
            Symbol::Green => 2,
            Symbol::Yellow => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Red => "RED",
            Symbol::Blue => "BLUE",
            Symbol::Green => "GREEN",
            Symbol::Yellow => "YELLOW",
        }
    }
}

/// Watch a sequence play back, then enter it in reverse.
#[derive(Clone, Debug)]
pub struct MemorySequence {
    target: Vec<Symbol>,
    input: Vec<Symbol>,
    displaying: bool,
    reveal_started_at: Millis,
    rules: MemoryRules,
    status: Status,
}

impl MemorySequence {
    pub fn start<R: Rng + ?Sized>(now: Millis, rules: MemoryRules, rng: &mut R) -> Self {
        let target = (0..rules.length)
            .map(|_| Symbol::ALL[rng.gen_range(0..Symbol::ALL.len())])
            .collect();
        Self::with_sequence(target, now, rules)
    }

    pub fn with_sequence(target: Vec<Symbol>, now: Millis, rules: MemoryRules) -> Self {
        Self {
            target,
            input: Vec::new(),
            displaying: true,
            reveal_started_at: now,
            rules,
            status: Status::Pending,
        }
    }

    pub fn target(&self) -> &[Symbol] {
        &self.target
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    pub fn is_displaying(&self) -> bool {
        self.displaying
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The symbol on screen at `now`, if the reveal is still running.
    pub fn shown(&self, now: Millis) -> Option<Symbol> {
        if !self.displaying {
            return None;
        }
        self.target.get(self.reveal_index(now)).copied()
    }

    /// The symbol the next tap has to match.
    pub fn expected(&self) -> Option<Symbol> {
        let remaining = self.target.len().checked_sub(self.input.len() + 1)?;
        self.target.get(remaining).copied()
    }

    pub fn tick(&mut self, now: Millis) -> Status {
        if self.displaying && self.reveal_index(now) >= self.target.len() {
            debug!(sequence = ?self.target, "memory reveal finished");
            self.displaying = false;
        }
        self.status
    }

    pub fn tap(&mut self, symbol: Symbol, now: Millis) -> Status {
        self.tick(now);
        if self.displaying || self.status != Status::Pending {
            return self.status;
        }

        match self.expected() {
            Some(expected) if expected == symbol => {
                self.input.push(symbol);
                if self.input.len() == self.target.len() {
                    self.status = Status::Succeeded;
                }
            }
            _ => {
                debug!(?symbol, expected = ?self.expected(), "memory sequence mismatch");
                self.status = Status::Failed(FailureReason::SequenceMismatch);
            }
        }
        self.status
    }

    fn reveal_index(&self, now: Millis) -> usize {
        (elapsed(self.reveal_started_at, now) / self.rules.symbol_ms) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn sequence() -> MemorySequence {
        MemorySequence::with_sequence(vec![Red, Blue, Green, Yellow], 0, MemoryRules::default())
    }

    #[test]
    fn test_reveal_shows_one_symbol_per_second() {
        let mut m = sequence();
        assert_eq!(m.shown(0), Some(Red));
        assert_eq!(m.shown(999), Some(Red));
        assert_eq!(m.shown(1000), Some(Blue));
        assert_eq!(m.shown(3500), Some(Yellow));
        m.tick(3999);
        assert!(m.is_displaying());
        m.tick(4000);
        assert!(!m.is_displaying());
        assert_eq!(m.shown(4000), None);
    }

    #[test]
    fn test_taps_during_reveal_are_ignored() {
        let mut m = sequence();
        assert_eq!(m.tap(Yellow, 500), Status::Pending);
        assert!(m.input().is_empty());
    }

    #[test]
    fn test_reverse_order_succeeds() {
        let mut m = sequence();
        m.tick(4000);
        assert_eq!(m.tap(Yellow, 4100), Status::Pending);
        assert_eq!(m.tap(Green, 4200), Status::Pending);
        assert_eq!(m.tap(Blue, 4300), Status::Pending);
        assert_eq!(m.tap(Red, 4400), Status::Succeeded);
    }

    #[test]
    fn test_tap_refreshes_reveal_without_tick() {
        let mut m = sequence();
        assert_eq!(m.tap(Yellow, 4000), Status::Pending);
        assert_eq!(m.input(), &[Yellow]);
    }

    #[test]
    fn test_wrong_third_tap_fails() {
        let mut m = sequence();
        m.tick(4000);
        m.tap(Yellow, 4100);
        m.tap(Green, 4200);
        assert_eq!(
            m.tap(Red, 4300),
            Status::Failed(FailureReason::SequenceMismatch)
        );
        // no retry within the same attempt
        assert_eq!(
            m.tap(Blue, 4400),
            Status::Failed(FailureReason::SequenceMismatch)
        );
    }

    #[test]
    fn test_forward_order_fails_immediately() {
        let mut m = sequence();
        m.tick(4000);
        assert_eq!(
            m.tap(Red, 4100),
            Status::Failed(FailureReason::SequenceMismatch)
        );
    }

    #[test]
    fn test_random_sequence_has_configured_length() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(3);
        let m = MemorySequence::start(10, MemoryRules::default(), &mut rng);
        assert_eq!(m.target().len(), 4);
        assert_eq!(m.expected(), m.target().last().copied());
    }

    #[test]
    fn test_symbol_index_roundtrip() {
        for (i, s) in Symbol::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(Symbol::from_index(i), Some(*s));
        }
        assert_eq!(Symbol::from_index(4), None);
    }
}
