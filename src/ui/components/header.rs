use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Target word and the typed buffer, with unsolved positions shown as `_`.
pub struct Header<'a> {
    target: &'a str,
    typed: &'a [char],
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(target: &'a str, typed: &'a [char], theme: &'a Theme) -> Self {
        Self {
            target,
            typed,
            theme,
        }
    }
}

pub fn masked_buffer(target: &str, typed: &[char]) -> String {
    target
        .chars()
        .enumerate()
        .map(|(i, _)| typed.get(i).copied().unwrap_or('_'))
        .collect()
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.text_pending());
        let big = Style::default().add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(Span::styled("[TARGET]", label)),
            Line::from(Span::styled(self.target, big.fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled("[BUFFER]", label)),
            Line::from(Span::styled(
                masked_buffer(self.target, self.typed),
                big.fg(colors.key_active()),
            )),
        ];

        let block = Block::default()
            .borders(ratatui::widgets::Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
