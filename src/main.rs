mod app;
mod event;
mod keyboard;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use spellgate::config::Config;
use spellgate::engine::memory::Symbol;
use spellgate::{ChallengeKind, ChallengeState, Phase};

use app::{Alert, App, AppScreen, HoldSource};
use event::{AppEvent, EventHandler};
use ui::components::alert::{AlertKind, AlertPopup};
use ui::components::challenge_panel::ChallengePanel;
use ui::components::header::Header;
use ui::components::intro::IntroScreen;
use ui::components::keyboard_diagram::KeyboardDiagram;
use ui::components::submit_button::{ConfirmOverlay, SubmitButton};
use ui::layout::{BoardLayout, pack_hint_lines};
use ui::line_input::InputResult;
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "spellgate",
    version,
    about = "Terminal spelling gauntlet: every letter is guarded by a timed mini-challenge"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Keyboard layout (es, us)")]
    layout: Option<String>,

    #[arg(short, long, help = "Skip the intro and start with this word")]
    word: Option<String>,

    #[arg(short, long, help = "Fixed seed for challenge selection")]
    seed: Option<u64>,

    #[arg(long, help = "Tick interval in milliseconds")]
    tick_ms: Option<u64>,

    #[arg(long, help = "Verbose logging")]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.debug) {
        eprintln!("Logging disabled: {err:?}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        error!(?err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(layout) = cli.layout {
        config.keyboard_layout = layout;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_rate_ms = tick_ms;
    }
    config.normalize();

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            requested = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    info!(theme = %theme.name, tick_ms = config.tick_rate_ms, "starting");

    let mut app = App::new(config, theme);
    if let Some(word) = cli.word {
        app.start(&word);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Only trust the Enter key for the submit hold when release events will arrive.
    app.keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if app.keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!(keyboard_enhanced = app.keyboard_enhanced, "terminal ready");

    let enhanced = app.keyboard_enhanced;
    chain_panic_hook(move || restore_terminal(enhanced));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.area = Rect::new(0, 0, size.width, size.height);

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    restore_terminal(app.keyboard_enhanced);

    if let Err(err) = result {
        error!(?err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Put the terminal back the way the shell expects it. Safe to call twice.
fn restore_terminal(keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        cursor::Show
    );
}

/// Run `restore` before the previously installed panic hook.
fn chain_panic_hook<F>(restore: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore();
        error!(%info, "panic");
        previous(info);
    }));
}

fn init_logging(debug: bool) -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spellgate");
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("spellgate.log"))?;

    let default_directive = if debug {
        "spellgate=debug"
    } else {
        "spellgate=info"
    };
    let filter = EnvFilter::try_from_env("SPELLGATE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Resize(w, h) => app.area = Rect::new(0, 0, w, h),
            AppEvent::Tick => {}
        }
        // Input floods must not starve the timeouts.
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        if key.code == KeyCode::Enter {
            app.release_confirmation(HoldSource::Key);
        }
        return;
    }
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.alert.is_some() {
        app.dismiss_alert();
        return;
    }

    match app.screen {
        AppScreen::Intro => handle_intro_key(app, key),
        AppScreen::Board => handle_board_key(app, key),
    }
}

fn handle_intro_key(app: &mut App, key: KeyEvent) {
    match app.name_input.handle(key) {
        InputResult::Submit => app.submit_intro(),
        InputResult::Cancel => app.should_quit = true,
        InputResult::Continue => {}
    }
}

fn handle_board_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.should_quit = true;
        return;
    }

    let Some(kind) = app.session.active().map(|a| a.kind()) else {
        match key.code {
            KeyCode::Enter if app.keyboard_enhanced => app.begin_confirmation(HoldSource::Key),
            KeyCode::Char(ch) => app.type_letter(ch),
            _ => {}
        }
        return;
    };

    match (kind, key.code) {
        (ChallengeKind::Calibration, KeyCode::Tab | KeyCode::Down) => app.select_slider(1),
        (ChallengeKind::Calibration, KeyCode::BackTab | KeyCode::Up) => app.select_slider(-1),
        (ChallengeKind::Calibration, KeyCode::Right) => app.nudge_slider(1.0),
        (ChallengeKind::Calibration, KeyCode::Left) => app.nudge_slider(-1.0),
        (ChallengeKind::MemorySequence, KeyCode::Char(ch @ '1'..='4')) => {
            let index = ch as usize - '1' as usize;
            if let Some(symbol) = Symbol::from_index(index) {
                app.tap_symbol(symbol);
            }
        }
        (ChallengeKind::RhythmTap, KeyCode::Char(' ') | KeyCode::Enter) => app.tap_rhythm(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(col, row),
        MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(col, row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(col, row),
        MouseEventKind::Moved => app.mouse_moved(col, row),
        _ => {}
    }
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Intro => frame.render_widget(
            IntroScreen::new(&app.name_input, app.intro_error.as_deref(), app.theme),
            area,
        ),
        AppScreen::Board => render_board(frame, app),
    }

    if let Some(alert) = app.alert {
        let kind = match alert {
            Alert::Failure(_) => AlertKind::Error,
            Alert::Confirmed => AlertKind::Info,
        };
        frame.render_widget(AlertPopup::new(kind, alert.lines(), app.theme), area);
    }
}

fn render_board(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = BoardLayout::new(area);
    let colors = &app.theme.colors;
    let session = &app.session;
    let phase = session.phase();
    let now = app.now();

    let target = session.target();
    frame.render_widget(
        Header::new(&target, session.typed(), app.theme),
        layout.header,
    );

    let instruction = match phase {
        Phase::InProgress => session
            .next_letter()
            .map(|(_, ch)| format!(">>> START SEQUENCE: {ch} <<<"))
            .unwrap_or_default(),
        Phase::ReadyToSubmit if app.keyboard_enhanced => {
            "Hold ENTER to transmit.".to_string()
        }
        Phase::ReadyToSubmit => "Hold the ENTER button to transmit.".to_string(),
        _ => String::new(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            instruction,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        layout.instructions,
    );

    let next_key = match phase {
        Phase::InProgress => session.next_letter().map(|(_, ch)| ch),
        _ => None,
    };
    let active_key = session
        .active()
        .and_then(|a| session.letters().get(a.letter_index))
        .map(|slot| slot.ch);
    frame.render_widget(
        KeyboardDiagram::new(
            &app.keyboard,
            next_key,
            active_key,
            session.typed(),
            app.theme,
        ),
        layout.keyboard,
    );

    if matches!(phase, Phase::ReadyToSubmit | Phase::Confirming) {
        frame.render_widget(
            SubmitButton::new(true, app.confirmation_progress(), app.theme),
            layout.submit,
        );
    }

    let hints: &[&str] = match session.active().map(|a| &a.state) {
        Some(ChallengeState::Calibration(_)) => &[
            "[Tab/↑↓] Select",
            "[←/→] Adjust",
            "[Mouse] Drag slider",
            "[Esc] Quit",
        ],
        Some(ChallengeState::MemorySequence(_)) => &["[1-4] Symbol", "[Mouse] Click", "[Esc] Quit"],
        Some(ChallengeState::RhythmTap(_)) => &["[Space] Execute", "[Mouse] Click", "[Esc] Quit"],
        Some(ChallengeState::PursuitTracking(_)) => &["[Mouse] Hold and track", "[Esc] Quit"],
        None => &["[A-Z] Type", "[Mouse] Click keys", "[Esc] Quit"],
    };
    let footer = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer,
            Style::default().fg(colors.text_pending()),
        ))),
        layout.footer,
    );

    if let Some(active) = session.active() {
        frame
            .buffer_mut()
            .set_style(area, Style::default().bg(colors.dimmed()).add_modifier(Modifier::DIM));
        frame.render_widget(
            ChallengePanel::new(&active.state, now, app.selected_slider, app.theme),
            layout.panel,
        );
    } else if let Some(progress) = app.confirmation_progress() {
        frame
            .buffer_mut()
            .set_style(area, Style::default().bg(colors.dimmed()).add_modifier(Modifier::DIM));
        frame.render_widget(ConfirmOverlay::new(progress, app.theme), layout.panel);
    }
}
