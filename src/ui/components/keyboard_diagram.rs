use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::layout::KeyboardLayout;
use crate::ui::theme::Theme;

pub struct KeyboardDiagram<'a> {
    pub layout: &'a KeyboardLayout,
    /// Letter the player has to press next, if it is pressable right now.
    pub next_key: Option<char>,
    /// Letter whose challenge is running.
    pub active_key: Option<char>,
    pub solved_keys: &'a [char],
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        layout: &'a KeyboardLayout,
        next_key: Option<char>,
        active_key: Option<char>,
        solved_keys: &'a [char],
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            next_key,
            active_key,
            solved_keys,
            theme,
        }
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        if area.height > 0 && area.width > 2 {
            buf.set_stringn(
                area.x + 1,
                area.y,
                format!("[{}]", self.layout.name),
                (area.width - 1) as usize,
                Style::default().fg(colors.text_pending()),
            );
        }

        for (key, rect) in self.layout.key_rects(area) {
            let is_solved = self.solved_keys.contains(&key);
            let is_hot = self.next_key == Some(key) || self.active_key == Some(key);

            let (bg, fg, border) = if is_hot {
                (colors.key_active(), colors.text_dark(), colors.fg())
            } else if is_solved {
                (colors.key_solved(), colors.fg(), colors.border())
            } else {
                (colors.key_base(), colors.fg(), colors.border())
            };

            let block = Block::bordered()
                .border_style(Style::default().fg(border).bg(bg))
                .style(Style::default().bg(bg));
            let inner = block.inner(rect);
            block.render(rect, buf);

            let mut label_style = Style::default().fg(fg).bg(bg);
            if is_hot {
                label_style = label_style.add_modifier(Modifier::BOLD);
            }
            let label_x = inner.x + inner.width.saturating_sub(1) / 2;
            buf.set_string(label_x, inner.y, key.to_string(), label_style);
        }
    }
}
