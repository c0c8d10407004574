use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Info,
}

/// Modal message box. Any key or click dismisses it.
pub struct AlertPopup<'a> {
    kind: AlertKind,
    lines: Vec<String>,
    theme: &'a Theme,
}

impl<'a> AlertPopup<'a> {
    pub fn new(kind: AlertKind, lines: Vec<String>, theme: &'a Theme) -> Self {
        Self { kind, lines, theme }
    }

    pub fn area(&self, screen: Rect) -> Rect {
        let longest = self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let width = (longest + 8).max(32).min(screen.width);
        let height = (self.lines.len() as u16 + 6).min(screen.height);
        Rect::new(
            screen.x + (screen.width - width) / 2,
            screen.y + (screen.height - height) / 2,
            width,
            height,
        )
    }
}

impl Widget for AlertPopup<'_> {
    fn render(self, screen: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let area = self.area(screen);
        let accent = match self.kind {
            AlertKind::Error => colors.error(),
            AlertKind::Info => colors.success(),
        };

        Clear.render(area, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(colors.panel_bg()).fg(colors.fg()));

        let mut lines: Vec<Line> = vec![Line::from("")];
        for (i, text) in self.lines.iter().enumerate() {
            let style = if i == 0 {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(text.as_str(), style)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[any key] OK",
            Style::default().fg(colors.text_pending()),
        )));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
