use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::components::progress_bar::{ProgressBar, percent};
use crate::ui::theme::Theme;

/// Hold-to-submit button. While held, the fill grows left to right.
pub struct SubmitButton<'a> {
    enabled: bool,
    progress: Option<f64>,
    theme: &'a Theme,
}

impl<'a> SubmitButton<'a> {
    pub fn new(enabled: bool, progress: Option<f64>, theme: &'a Theme) -> Self {
        Self {
            enabled,
            progress,
            theme,
        }
    }
}

impl Widget for SubmitButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (bg, fg) = if self.enabled {
            (colors.key_active(), colors.text_dark())
        } else {
            (colors.key_base(), colors.text_pending())
        };

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(ratio) = self.progress {
            let filled = (inner.width as f64 * ratio.clamp(0.0, 1.0)) as u16;
            for x in inner.x..inner.x + filled {
                buf[(x, inner.y)].set_style(Style::default().bg(colors.success()));
            }
        }

        let label = match self.progress {
            Some(ratio) => format!("HOLD... {}%", percent(ratio)),
            None => "ENTER".to_string(),
        };
        Paragraph::new(Line::from(Span::styled(
            label,
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(inner, buf);
    }
}

/// Panel shown while the submit hold is in progress.
pub struct ConfirmOverlay<'a> {
    progress: f64,
    theme: &'a Theme,
}

impl<'a> ConfirmOverlay<'a> {
    pub fn new(progress: f64, theme: &'a Theme) -> Self {
        Self { progress, theme }
    }
}

impl Widget for ConfirmOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.key_active()))
            .style(Style::default().bg(colors.panel_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                ">>> FINALIZING PROTOCOL <<<",
                Style::default().fg(colors.key_active()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Keep holding to confirm.",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);

        if inner.height >= 8 {
            let bar = Rect::new(
                inner.x + inner.width / 6,
                inner.y + inner.height / 2 + 1,
                inner.width * 2 / 3,
                3,
            );
            ProgressBar::new("CONFIRM", self.progress, self.theme)
                .fill(colors.key_active())
                .render(bar, buf);
        }
    }
}
