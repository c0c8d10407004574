use spellgate::engine::memory::Symbol;
use spellgate::engine::pursuit::PointerAction;
use spellgate::engine::rules::Rules;
use spellgate::{
    ChallengeInput, ChallengeKind, ChallengeState, Clock, FailureReason, ManualClock, Phase,
    Session, SessionEvent,
};

const FRAME: u64 = 20;

fn new_session(word: &str, seed: u64) -> Session {
    let mut session = Session::new(Rules::default(), Some(seed));
    session.set_target(word).unwrap();
    session
}

fn assert_buffer_invariant(session: &Session) {
    let prefix: Vec<char> = session
        .letters()
        .iter()
        .take_while(|slot| slot.solved)
        .map(|slot| slot.ch)
        .collect();
    assert_eq!(session.typed(), prefix.as_slice());
    let solved = session.letters().iter().filter(|slot| slot.solved).count();
    assert_eq!(session.typed().len(), solved);
}

/// Advance one frame and tick.
fn frame(session: &mut Session, clock: &ManualClock) -> Option<SessionEvent> {
    let now = clock.advance(FRAME);
    session.tick(now)
}

/// Play whatever challenge is active the way a perfect player would.
fn solve_active(session: &mut Session, clock: &ManualClock) -> SessionEvent {
    let state = session.active().expect("no active challenge").state.clone();
    match state {
        ChallengeState::Calibration(c) => {
            let targets = *c.targets();
            let mut last = None;
            for (index, value) in targets.into_iter().enumerate() {
                last = session.challenge_input(ChallengeInput::Slider { index, value }, clock.now());
            }
            last.expect("calibration did not finish")
        }
        ChallengeState::MemorySequence(m) => {
            while session
                .active()
                .is_some_and(|a| matches!(&a.state, ChallengeState::MemorySequence(m) if m.is_displaying()))
            {
                assert_eq!(frame(session, clock), None);
            }
            let mut last = None;
            for &symbol in m.target().iter().rev() {
                last = session.challenge_input(ChallengeInput::Symbol(symbol), clock.now());
            }
            last.expect("memory did not finish")
        }
        ChallengeState::RhythmTap(r) => {
            let interval = r.rules().interval_ms;
            loop {
                for _ in 0..interval / FRAME {
                    assert_eq!(frame(session, clock), None);
                }
                if let Some(event) = session.challenge_input(ChallengeInput::Tap, clock.now()) {
                    return event;
                }
            }
        }
        ChallengeState::PursuitTracking(p) => {
            let now = clock.now();
            session.challenge_input(
                ChallengeInput::Pointer {
                    action: PointerAction::Down,
                    pos: p.target(now),
                },
                now,
            );
            loop {
                let now = clock.advance(FRAME);
                let pos = p.target(now);
                session.challenge_input(
                    ChallengeInput::Pointer {
                        action: PointerAction::Move,
                        pos,
                    },
                    now,
                );
                if let Some(event) = session.tick(now) {
                    return event;
                }
            }
        }
    }
}

fn start_next(session: &mut Session, clock: &ManualClock) -> ChallengeKind {
    let (_, ch) = session.next_letter().unwrap();
    match session.press_letter(ch.to_ascii_lowercase(), clock.now()) {
        Some(SessionEvent::ChallengeStarted { kind, .. }) => kind,
        other => panic!("expected a challenge to start, got {other:?}"),
    }
}

#[test]
fn spelling_a_word_then_holding_confirms() {
    let clock = ManualClock::starting_at(1_000);
    let mut session = new_session("gauntlet", 2024);
    let mut kinds = Vec::new();

    for (index, expected) in "GAUNTLET".chars().enumerate() {
        assert_eq!(session.phase(), Phase::InProgress);
        kinds.push(start_next(&mut session, &clock));
        assert_eq!(session.phase(), Phase::ChallengeActive);
        let event = solve_active(&mut session, &clock);
        assert_eq!(event, SessionEvent::LetterAccepted { index, ch: expected });
        assert_buffer_invariant(&session);
    }

    for pair in kinds.windows(2) {
        assert_ne!(pair[0], pair[1], "kind repeated: {kinds:?}");
    }

    assert_eq!(session.phase(), Phase::ReadyToSubmit);
    assert_eq!(session.typed_text(), "GAUNTLET");
    assert_eq!(session.press_letter('g', clock.now()), None);

    let t0 = clock.now();
    assert!(session.begin_confirmation(t0));
    assert_eq!(session.phase(), Phase::Confirming);
    let mut confirmed = None;
    while confirmed.is_none() {
        confirmed = frame(&mut session, &clock);
    }
    assert_eq!(confirmed, Some(SessionEvent::Confirmed));
    assert_eq!(clock.now() - t0, 5000);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn early_release_wipes_the_whole_word() {
    let clock = ManualClock::starting_at(0);
    let mut session = new_session("ok", 7);
    for _ in 0..2 {
        start_next(&mut session, &clock);
        solve_active(&mut session, &clock);
    }

    let t0 = clock.now();
    assert!(session.begin_confirmation(t0));
    for _ in 0..(4000 / FRAME) {
        assert_eq!(frame(&mut session, &clock), None);
    }
    assert!((session.confirmation().progress(clock.now()) - 0.8).abs() < 1e-9);
    assert_eq!(
        session.release_confirmation(t0 + 4000),
        Some(SessionEvent::Failed(FailureReason::ConfirmationAborted))
    );
    assert_eq!(session.phase(), Phase::InProgress);
    assert!(session.typed().is_empty());
    assert_eq!(session.next_letter(), Some((0, 'O')));
    assert_buffer_invariant(&session);
}

#[test]
fn engine_failure_resets_and_keeps_no_repeat_memory() {
    let clock = ManualClock::starting_at(0);
    let mut session = new_session("abcdefghijklmnopqrstuvwxyz", 31);

    // Solve letters until a challenge that can fail shows up on a later letter.
    let failing_kind = loop {
        let kind = start_next(&mut session, &clock);
        let index = session.active().unwrap().letter_index;
        if index > 0 && matches!(kind, ChallengeKind::MemorySequence | ChallengeKind::RhythmTap) {
            break kind;
        }
        solve_active(&mut session, &clock);
    };

    let event = match failing_kind {
        ChallengeKind::MemorySequence => {
            let wrong = match &session.active().unwrap().state {
                ChallengeState::MemorySequence(m) => {
                    let expected = *m.target().last().unwrap();
                    Symbol::ALL.into_iter().find(|&s| s != expected).unwrap()
                }
                _ => unreachable!(),
            };
            let after_reveal = clock.advance(4000);
            session.challenge_input(ChallengeInput::Symbol(wrong), after_reveal)
        }
        _ => {
            let early = clock.advance(400);
            session.challenge_input(ChallengeInput::Tap, early)
        }
    };

    let expected_reason = match failing_kind {
        ChallengeKind::MemorySequence => FailureReason::SequenceMismatch,
        _ => FailureReason::SynchronizationError,
    };
    assert_eq!(event, Some(SessionEvent::Failed(expected_reason)));
    assert!(session.typed().is_empty());
    assert!(session.letters().iter().all(|slot| !slot.solved));
    assert_eq!(session.last_kind(), Some(failing_kind));

    let next = start_next(&mut session, &clock);
    assert_ne!(next, failing_kind);
    assert_eq!(session.active().unwrap().letter_index, 0);
}

#[test]
fn rhythm_times_out_from_ticks_alone() {
    let clock = ManualClock::starting_at(0);
    let mut session = new_session("abcdefghijklmnopqrstuvwxyz", 5);

    loop {
        let kind = start_next(&mut session, &clock);
        if kind == ChallengeKind::RhythmTap {
            break;
        }
        solve_active(&mut session, &clock);
    }

    let t0 = clock.now();
    let mut event = None;
    while event.is_none() {
        event = frame(&mut session, &clock);
    }
    assert_eq!(event, Some(SessionEvent::Failed(FailureReason::RhythmTimeout)));
    assert!(clock.now() - t0 > 2000);
    assert!(clock.now() - t0 <= 2000 + FRAME);
    assert!(session.typed().is_empty());
}

#[test]
fn same_seed_same_challenge_order() {
    let order = |seed| {
        let clock = ManualClock::starting_at(0);
        let mut session = new_session("seeded", seed);
        let mut kinds = Vec::new();
        while session.phase() == Phase::InProgress {
            kinds.push(start_next(&mut session, &clock));
            solve_active(&mut session, &clock);
        }
        kinds
    };
    assert_eq!(order(77), order(77));
}

#[test]
fn wrong_keys_never_start_challenges() {
    let clock = ManualClock::starting_at(0);
    let mut session = new_session("xyz", 3);
    for ch in ['a', 'y', 'z', ' ', '1'] {
        assert_eq!(session.press_letter(ch, clock.now()), None);
    }
    assert_eq!(session.phase(), Phase::InProgress);
    assert!(session.last_kind().is_none());
}
