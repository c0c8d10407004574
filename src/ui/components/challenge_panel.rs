use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use spellgate::Millis;
use spellgate::engine::ChallengeState;
use spellgate::engine::calibration::{Calibration, SLIDER_COUNT};
use spellgate::engine::memory::{MemorySequence, Symbol};
use spellgate::engine::pursuit::{Point, PursuitTracking};
use spellgate::engine::rhythm::RhythmTap;
use spellgate::engine::rules::{CalibrationRules, PursuitRules};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

const HEADER_ROWS: u16 = 3;
const MEMORY_BUTTON_WIDTH: u16 = 10;
const MEMORY_BUTTON_GAP: u16 = 2;
const RHYTHM_BUTTON_WIDTH: u16 = 16;

/// Area inside the panel border, below the title and instruction rows.
pub fn body(panel: Rect) -> Rect {
    let inner = Block::bordered().inner(panel);
    Rect::new(
        inner.x,
        inner.y + HEADER_ROWS.min(inner.height),
        inner.width,
        inner.height.saturating_sub(HEADER_ROWS),
    )
}

pub fn calibration_tracks(panel: Rect) -> [Rect; SLIDER_COUNT] {
    let body = body(panel);
    let column = body.width / SLIDER_COUNT as u16;
    let y = body.y + 2;
    std::array::from_fn(|i| {
        Rect::new(
            body.x + i as u16 * column + 1,
            y,
            column.saturating_sub(2),
            1,
        )
    })
}

pub fn track_value(track: Rect, rules: &CalibrationRules, column: u16) -> f64 {
    let span = track.width.saturating_sub(1).max(1) as f64;
    let offset = column.saturating_sub(track.x).min(track.width.saturating_sub(1)) as f64;
    rules.min_value + offset / span * (rules.max_value - rules.min_value)
}

pub fn track_column(track: Rect, rules: &CalibrationRules, value: f64) -> u16 {
    let span = track.width.saturating_sub(1) as f64;
    let ratio = ((value - rules.min_value) / (rules.max_value - rules.min_value)).clamp(0.0, 1.0);
    track.x + (ratio * span).round() as u16
}

pub fn memory_buttons(panel: Rect) -> [Rect; 4] {
    let body = body(panel);
    // Narrow panels shrink the buttons instead of pushing them off screen.
    let width = MEMORY_BUTTON_WIDTH.min(body.width.saturating_sub(3 * MEMORY_BUTTON_GAP) / 4);
    let total = 4 * width + 3 * MEMORY_BUTTON_GAP;
    let left = body.x + body.width.saturating_sub(total) / 2;
    let y = body.y + body.height.saturating_sub(3) / 2;
    std::array::from_fn(|i| {
        Rect::new(left + i as u16 * (width + MEMORY_BUTTON_GAP), y, width, 3)
    })
}

pub fn rhythm_button(panel: Rect) -> Rect {
    let body = body(panel);
    let width = RHYTHM_BUTTON_WIDTH.min(body.width);
    Rect::new(
        body.x + (body.width - width) / 2,
        body.y + body.height.saturating_sub(3) / 2,
        width,
        3,
    )
}

/// Playfield for the pursuit target. The progress bar sits underneath.
pub fn pursuit_arena(panel: Rect) -> Rect {
    let body = body(panel);
    Rect::new(body.x, body.y, body.width, body.height.saturating_sub(3))
}

pub fn cell_to_arena(arena: Rect, rules: &PursuitRules, column: u16, row: u16) -> Point {
    let w = arena.width.max(1) as f64;
    let h = arena.height.max(1) as f64;
    Point::new(
        (column as f64 - arena.x as f64 + 0.5) / w * rules.arena_width,
        (row as f64 - arena.y as f64 + 0.5) / h * rules.arena_height,
    )
}

pub fn arena_to_cell(arena: Rect, rules: &PursuitRules, point: Point) -> Option<(u16, u16)> {
    let col = (point.x / rules.arena_width * arena.width as f64).floor();
    let row = (point.y / rules.arena_height * arena.height as f64).floor();
    if col < 0.0 || row < 0.0 || col >= arena.width as f64 || row >= arena.height as f64 {
        return None;
    }
    Some((arena.x + col as u16, arena.y + row as u16))
}

pub struct ChallengePanel<'a> {
    state: &'a ChallengeState,
    now: Millis,
    selected_slider: usize,
    theme: &'a Theme,
}

impl<'a> ChallengePanel<'a> {
    pub fn new(
        state: &'a ChallengeState,
        now: Millis,
        selected_slider: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            state,
            now,
            selected_slider,
            theme,
        }
    }

    fn instruction(&self) -> String {
        match self.state {
            ChallengeState::Calibration(_) => {
                "Align every parameter with its target value.".to_string()
            }
            ChallengeState::MemorySequence(m) if m.is_displaying() => {
                "ACQUIRING SEQUENCE...".to_string()
            }
            ChallengeState::MemorySequence(_) => "ENTER THE SEQUENCE IN REVERSE ORDER".to_string(),
            ChallengeState::RhythmTap(r) => format!(
                "One press every {:.2} seconds.  REMAINING: {}",
                r.rules().interval_ms as f64 / 1000.0,
                r.remaining()
            ),
            ChallengeState::PursuitTracking(p) => format!(
                "Keep the pointer on the target ({}s).",
                p.rules().sustain_ms / 1000
            ),
        }
    }

    fn render_calibration(&self, c: &Calibration, panel: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rules = c.rules();

        // Label, track and readout rows all have to fit inside the body.
        if calibration_tracks(panel)[0].y + 1 >= body(panel).bottom() {
            return;
        }

        for (i, track) in calibration_tracks(panel).into_iter().enumerate() {
            if track.width == 0 {
                continue;
            }
            let selected = i == self.selected_slider;
            let target = c.targets()[i];
            let current = c.current()[i];

            let label = Style::default().fg(colors.text_pending());
            buf.set_string(track.x, track.y - 1, format!("TARGET: {target:.1}"), label);

            for x in track.x..track.x + track.width {
                buf[(x, track.y)]
                    .set_symbol("─")
                    .set_style(Style::default().fg(colors.border()));
            }
            let target_x = track_column(track, rules, target);
            buf[(target_x, track.y)]
                .set_symbol("┴")
                .set_style(Style::default().fg(colors.text_pending()));

            let knob_x = track_column(track, rules, current);
            let mut knob = Style::default().fg(if c.is_aligned(i) {
                colors.success()
            } else {
                colors.key_active()
            });
            if selected {
                knob = knob.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            buf[(knob_x, track.y)].set_symbol("█").set_style(knob);

            let value_style = Style::default().fg(if c.is_aligned(i) {
                colors.key_solved()
            } else {
                colors.key_active()
            });
            let marker = if selected { ">" } else { " " };
            buf.set_string(
                track.x,
                track.y + 1,
                format!("{marker}CURRENT: {current:.2}"),
                value_style,
            );
        }
    }

    fn render_memory(&self, m: &MemorySequence, panel: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        if let Some(shown) = m.shown(self.now) {
            let b = body(panel);
            let rect = Rect::new(
                b.x + b.width.saturating_sub(12) / 2,
                b.y + b.height.saturating_sub(5) / 2,
                12.min(b.width),
                5.min(b.height),
            );
            Block::bordered()
                .border_style(Style::default().fg(colors.fg()))
                .style(Style::default().bg(colors.symbol(shown)))
                .render(rect, buf);
            return;
        }

        let b = body(panel);
        for (i, rect) in memory_buttons(panel).into_iter().enumerate() {
            let Some(symbol) = Symbol::from_index(i) else {
                continue;
            };
            if rect.intersection(b) != rect {
                continue;
            }
            let block = Block::bordered()
                .border_style(Style::default().fg(colors.panel_bg()).bg(colors.symbol(symbol)))
                .style(Style::default().bg(colors.symbol(symbol)));
            let inner = block.inner(rect);
            block.render(rect, buf);
            Paragraph::new(Line::from(Span::styled(
                format!("{}", i + 1),
                Style::default().fg(colors.text_dark()).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
        }

        let status = format!("BUFFER: {}/{}", m.input().len(), m.target().len());
        let y = b.y + b.height.saturating_sub(1);
        Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().fg(colors.text_pending()),
        )))
        .alignment(Alignment::Center)
        .render(Rect::new(b.x, y, b.width, 1), buf);
    }

    fn render_rhythm(&self, r: &RhythmTap, panel: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let b = body(panel);
        let button = rhythm_button(panel);
        if button.intersection(b) != button {
            return;
        }
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.key_base()));
        let inner = block.inner(button);
        block.render(button, buf);
        Paragraph::new(Line::from(Span::styled(
            "EXECUTE",
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(inner, buf);

        // Bar fills over one interval; the right edge is the beat.
        let bar_width = 40.min(b.width.saturating_sub(2));
        let bar_x = b.x + (b.width - bar_width) / 2;
        let bar_y = button.bottom() + 1;
        if bar_y >= b.bottom() || bar_width == 0 {
            return;
        }
        let since = r.since_last_tap(self.now) as f64;
        let interval = r.rules().interval_ms.max(1) as f64;
        let filled = ((since / interval) * bar_width as f64).min(bar_width as f64) as u16;
        let overdue = since > interval;
        for x in bar_x..bar_x + bar_width {
            let bg = if x < bar_x + filled {
                if overdue { colors.key_active() } else { colors.key_solved() }
            } else {
                colors.bar_empty()
            };
            buf[(x, bar_y)].set_symbol(" ").set_style(Style::default().bg(bg));
        }
        buf[(bar_x + bar_width - 1, bar_y)]
            .set_symbol("│")
            .set_style(Style::default().fg(colors.fg()));
    }

    fn render_pursuit(&self, p: &PursuitTracking, panel: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rules = p.rules();
        let arena = pursuit_arena(panel);
        let target = p.target(self.now);

        for row in arena.y..arena.bottom() {
            for col in arena.x..arena.right() {
                let d = cell_to_arena(arena, rules, col, row).distance(target);
                if d <= rules.engage_radius / 2.0 {
                    buf[(col, row)]
                        .set_symbol("█")
                        .set_style(Style::default().fg(colors.key_active()));
                } else if d >= rules.engage_radius && d <= rules.disengage_radius {
                    buf[(col, row)]
                        .set_symbol("·")
                        .set_style(Style::default().fg(colors.key_active()));
                }
            }
        }

        if let Some((col, row)) = p
            .pointer_position()
            .and_then(|pos| arena_to_cell(arena, rules, pos))
        {
            let style = if p.is_engaged() {
                Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            buf[(col, row)].set_symbol("+").set_style(style);
        }

        let bar_area = Rect::new(
            arena.x + arena.width / 4,
            arena.bottom(),
            arena.width / 2,
            3.min(body(panel).bottom().saturating_sub(arena.bottom())),
        );
        if bar_area.height == 3 {
            let fill = if p.is_engaged() {
                colors.success()
            } else {
                colors.bar_filled()
            };
            ProgressBar::new("LOCK", p.progress(self.now), self.theme)
                .fill(fill)
                .render(bar_area, buf);
        }
    }
}

impl Widget for ChallengePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" /// MODULE: {} /// ", self.state.kind().title()))
            .title_alignment(Alignment::Center)
            .title_style(Style::default().fg(colors.key_active()).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.panel_bg()).fg(colors.fg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height <= HEADER_ROWS || inner.width < 20 {
            return;
        }

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(self.instruction(), Style::default().fg(colors.fg()))),
        ])
        .alignment(Alignment::Center)
        .render(Rect::new(inner.x, inner.y, inner.width, HEADER_ROWS), buf);

        match self.state {
            ChallengeState::Calibration(c) => self.render_calibration(c, area, buf),
            ChallengeState::MemorySequence(m) => self.render_memory(m, area, buf),
            ChallengeState::RhythmTap(r) => self.render_rhythm(r, area, buf),
            ChallengeState::PursuitTracking(p) => self.render_pursuit(p, area, buf),
        }
    }
}
