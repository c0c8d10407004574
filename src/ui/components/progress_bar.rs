use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Whole percent shown for a ratio. Never rounds up, so 100% means done.
pub fn percent(ratio: f64) -> u32 {
    (ratio.clamp(0.0, 1.0) * 100.0).floor() as u32
}

/// Titled gauge for the timed holds (pursuit lock and submit confirmation).
pub struct ProgressBar<'a> {
    title: &'a str,
    ratio: f64,
    fill: Option<Color>,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(title: &'a str, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            title,
            ratio: ratio.clamp(0.0, 1.0),
            fill: None,
            theme,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        let fill = self.fill.unwrap_or(colors.bar_filled());
        let cut = inner.x + (self.ratio * inner.width as f64) as u16;
        for x in inner.left()..inner.right() {
            let bg = if x < cut { fill } else { colors.bar_empty() };
            buf[(x, inner.y)].set_symbol(" ").set_bg(bg);
        }

        let text = format!("{}%", percent(self.ratio));
        let x = inner.x + inner.width.saturating_sub(text.len() as u16) / 2;
        for (offset, ch) in text.chars().enumerate() {
            let cell_x = x + offset as u16;
            if cell_x >= inner.right() {
                break;
            }
            buf[(cell_x, inner.y)]
                .set_char(ch)
                .set_fg(colors.fg())
                .set_style(Style::default().add_modifier(Modifier::BOLD));
        }
    }
}
