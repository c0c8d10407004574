use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Name entry screen shown before each run.
pub struct IntroScreen<'a> {
    input: &'a LineInput,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> IntroScreen<'a> {
    pub fn new(input: &'a LineInput, error: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            input,
            error,
            theme,
        }
    }
}

impl Widget for IntroScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Block::default()
            .style(Style::default().bg(colors.bg()))
            .render(area, buf);

        let (before, cursor, after) = self.input.render_parts();
        let cursor_style = Style::default().fg(colors.text_dark()).bg(colors.fg());
        let field_style = Style::default().fg(colors.fg());

        let mut input_spans = vec![
            Span::styled("> ", Style::default().fg(colors.key_active())),
            Span::styled(before, field_style),
        ];
        match cursor {
            Some(ch) => input_spans.push(Span::styled(ch.to_string(), cursor_style)),
            None => input_spans.push(Span::styled(" ", cursor_style)),
        }
        input_spans.push(Span::styled(after, field_style));

        let mut lines = vec![
            Line::from(Span::styled(
                "SPELLGATE",
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Every letter is guarded. Enter the name to transmit:",
                Style::default().fg(colors.text_pending()),
            )),
            Line::from(""),
            Line::from(input_spans),
            Line::from(""),
        ];
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(
                error,
                Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] Start  [Ctrl-C] Quit",
            Style::default().fg(colors.text_pending()),
        )));

        let height = (lines.len() as u16).min(area.height);
        let rect = Rect::new(
            area.x,
            area.y + area.height.saturating_sub(height) / 2,
            area.width,
            height,
        );
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(rect, buf);
    }
}
