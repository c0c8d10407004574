use ratatui::layout::{Position, Rect};
use tracing::debug;

use spellgate::config::Config;
use spellgate::engine::calibration::SLIDER_COUNT;
use spellgate::engine::memory::Symbol;
use spellgate::engine::pursuit::PointerAction;
use spellgate::session::confirm::HoldState;
use spellgate::{
    ChallengeInput, ChallengeState, Clock, FailureReason, Millis, Phase, Session, SessionEvent,
    SystemClock,
};

use crate::keyboard::layout::KeyboardLayout;
use crate::ui::components::challenge_panel;
use crate::ui::layout::BoardLayout;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub const EMPTY_NAME_ERROR: &str = "ERROR: enter a name to start the protocol.";
const MAX_NAME_CHARS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Intro,
    Board,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    Failure(FailureReason),
    Confirmed,
}

impl Alert {
    pub fn lines(self) -> Vec<String> {
        match self {
            Alert::Failure(reason) => vec![
                "CRITICAL SYSTEM ERROR".to_string(),
                format!("Cause: {reason}"),
                "Full buffer reset.".to_string(),
            ],
            Alert::Confirmed => vec!["Input confirmed. Closing.".to_string()],
        }
    }
}

/// What is holding the submit button down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldSource {
    Mouse,
    Key,
}

pub struct App<C: Clock = SystemClock> {
    pub screen: AppScreen,
    pub session: Session,
    pub clock: C,
    pub theme: &'static Theme,
    pub keyboard: KeyboardLayout,
    pub name_input: LineInput,
    pub intro_error: Option<String>,
    pub alert: Option<Alert>,
    pub selected_slider: usize,
    pub area: Rect,
    pub keyboard_enhanced: bool,
    pub should_quit: bool,
    dragging_slider: Option<usize>,
    hold_source: Option<HoldSource>,
}

impl App<SystemClock> {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        Self::with_clock(config, theme, SystemClock::new())
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(config: Config, theme: &'static Theme, clock: C) -> Self {
        let session = Session::new(config.rules, config.seed);
        let keyboard = KeyboardLayout::from_name(&config.keyboard_layout);
        Self {
            screen: AppScreen::Intro,
            session,
            clock,
            theme,
            keyboard,
            name_input: LineInput::new("", MAX_NAME_CHARS),
            intro_error: None,
            alert: None,
            selected_slider: 0,
            area: Rect::default(),
            keyboard_enhanced: false,
            should_quit: false,
            dragging_slider: None,
            hold_source: None,
        }
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn board(&self) -> BoardLayout {
        BoardLayout::new(self.area)
    }

    pub fn start(&mut self, word: &str) {
        match self.session.set_target(word) {
            Ok(()) => {
                self.screen = AppScreen::Board;
                self.intro_error = None;
                self.selected_slider = 0;
                self.dragging_slider = None;
                self.hold_source = None;
            }
            Err(err) => {
                debug!(%err, "target rejected");
                self.intro_error = Some(EMPTY_NAME_ERROR.to_string());
            }
        }
    }

    pub fn submit_intro(&mut self) {
        let word = self.name_input.value().to_string();
        self.start(&word);
    }

    pub fn type_letter(&mut self, ch: char) {
        if self.alert.is_some() {
            return;
        }
        let now = self.now();
        let event = self.session.press_letter(ch, now);
        self.notify(event);
    }

    pub fn select_slider(&mut self, delta: isize) {
        let count = SLIDER_COUNT as isize;
        self.selected_slider = (self.selected_slider as isize + delta).rem_euclid(count) as usize;
    }

    /// Move the selected slider by `steps` increments of the configured step.
    pub fn nudge_slider(&mut self, steps: f64) {
        let current = match self.session.active().map(|a| &a.state) {
            Some(ChallengeState::Calibration(c)) => {
                c.current()[self.selected_slider] + steps * c.rules().step
            }
            _ => return,
        };
        self.set_slider(self.selected_slider, current);
    }

    pub fn set_slider(&mut self, index: usize, value: f64) {
        self.challenge_input(ChallengeInput::Slider { index, value });
    }

    pub fn tap_symbol(&mut self, symbol: Symbol) {
        self.challenge_input(ChallengeInput::Symbol(symbol));
    }

    pub fn tap_rhythm(&mut self) {
        self.challenge_input(ChallengeInput::Tap);
    }

    fn challenge_input(&mut self, input: ChallengeInput) {
        if self.alert.is_some() {
            return;
        }
        let now = self.now();
        let event = self.session.challenge_input(input, now);
        self.notify(event);
    }

    pub fn begin_confirmation(&mut self, source: HoldSource) {
        if self.alert.is_some() || self.hold_source.is_some() {
            return;
        }
        let now = self.now();
        if self.session.begin_confirmation(now) {
            debug!(?source, "confirmation hold started");
            self.hold_source = Some(source);
        }
    }

    /// Releases only count when they come from whatever started the hold.
    pub fn release_confirmation(&mut self, source: HoldSource) {
        if self.hold_source != Some(source) {
            return;
        }
        self.hold_source = None;
        let now = self.now();
        let event = self.session.release_confirmation(now);
        self.notify(event);
    }

    pub fn confirmation_progress(&self) -> Option<f64> {
        match self.session.confirmation().state() {
            HoldState::Holding { .. } => Some(self.session.confirmation().progress(self.now())),
            _ => None,
        }
    }

    pub fn tick(&mut self) {
        let now = self.now();
        let event = self.session.tick(now);
        self.notify(event);
    }

    pub fn dismiss_alert(&mut self) {
        if let Some(Alert::Confirmed) = self.alert.take() {
            self.screen = AppScreen::Intro;
            self.name_input.clear();
        }
    }

    fn notify(&mut self, event: Option<SessionEvent>) {
        let Some(event) = event else {
            return;
        };
        match event {
            SessionEvent::ChallengeStarted { .. } | SessionEvent::LetterAccepted { .. } => {
                self.selected_slider = 0;
                self.dragging_slider = None;
            }
            SessionEvent::Failed(reason) => {
                debug!(%reason, "showing failure alert");
                self.hold_source = None;
                self.dragging_slider = None;
                self.alert = Some(Alert::Failure(reason));
            }
            SessionEvent::Confirmed => {
                self.hold_source = None;
                self.alert = Some(Alert::Confirmed);
            }
        }
    }

    pub fn mouse_down(&mut self, column: u16, row: u16) {
        if self.alert.is_some() {
            self.dismiss_alert();
            return;
        }
        if self.screen != AppScreen::Board {
            return;
        }

        let board = self.board();
        let at = Position::new(column, row);
        let Some(state) = self.session.active().map(|a| &a.state) else {
            if let Some(key) = self.keyboard.key_at(board.keyboard, column, row) {
                self.type_letter(key);
            } else if board.submit.contains(at) && self.session.phase() == Phase::ReadyToSubmit {
                self.begin_confirmation(HoldSource::Mouse);
            }
            return;
        };

        match state {
            ChallengeState::Calibration(c) => {
                let tracks = challenge_panel::calibration_tracks(board.panel);
                if let Some(index) = tracks.iter().position(|t| t.contains(at)) {
                    let value = challenge_panel::track_value(tracks[index], c.rules(), column);
                    self.selected_slider = index;
                    self.dragging_slider = Some(index);
                    self.set_slider(index, value);
                }
            }
            ChallengeState::MemorySequence(_) => {
                let buttons = challenge_panel::memory_buttons(board.panel);
                if let Some(symbol) = buttons
                    .iter()
                    .position(|b| b.contains(at))
                    .and_then(Symbol::from_index)
                {
                    self.tap_symbol(symbol);
                }
            }
            ChallengeState::RhythmTap(_) => {
                if challenge_panel::rhythm_button(board.panel).contains(at) {
                    self.tap_rhythm();
                }
            }
            ChallengeState::PursuitTracking(_) => {
                self.pointer(PointerAction::Down, column, row);
            }
        }
    }

    pub fn mouse_drag(&mut self, column: u16, row: u16) {
        if self.alert.is_some() {
            return;
        }
        let board = self.board();
        match self.session.active().map(|a| &a.state) {
            Some(ChallengeState::Calibration(c)) => {
                if let Some(index) = self.dragging_slider {
                    let track = challenge_panel::calibration_tracks(board.panel)[index];
                    let value = challenge_panel::track_value(track, c.rules(), column);
                    self.set_slider(index, value);
                }
            }
            Some(ChallengeState::PursuitTracking(_)) => {
                self.pointer(PointerAction::Move, column, row);
            }
            _ => {}
        }
    }

    pub fn mouse_moved(&mut self, column: u16, row: u16) {
        if let Some(ChallengeState::PursuitTracking(_)) = self.session.active().map(|a| &a.state) {
            self.pointer(PointerAction::Move, column, row);
        }
    }

    pub fn mouse_up(&mut self, column: u16, row: u16) {
        self.dragging_slider = None;
        if let Some(ChallengeState::PursuitTracking(_)) = self.session.active().map(|a| &a.state) {
            self.pointer(PointerAction::Up, column, row);
        }
        self.release_confirmation(HoldSource::Mouse);
    }

    fn pointer(&mut self, action: PointerAction, column: u16, row: u16) {
        let arena = challenge_panel::pursuit_arena(self.board().panel);
        let pos =
            challenge_panel::cell_to_arena(arena, &self.session.rules().pursuit, column, row);
        self.challenge_input(ChallengeInput::Pointer { action, pos });
    }
}
