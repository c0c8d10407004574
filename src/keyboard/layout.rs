use ratatui::layout::Rect;

/// On-screen keyboard rows, uppercase, as the board draws them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardLayout {
    pub name: String,
    pub rows: Vec<Vec<char>>,
}

pub const KEY_WIDTH: u16 = 5;
pub const KEY_HEIGHT: u16 = 3;
const KEY_GAP: u16 = 1;

impl KeyboardLayout {
    pub fn spanish() -> Self {
        Self {
            name: "ES".to_string(),
            rows: vec![
                "QWERTYUIOP".chars().collect(),
                "ASDFGHJKLÑ".chars().collect(),
                "ZXCVBNM".chars().collect(),
            ],
        }
    }

    pub fn qwerty() -> Self {
        Self {
            name: "US".to_string(),
            rows: vec![
                "QWERTYUIOP".chars().collect(),
                "ASDFGHJKL".chars().collect(),
                "ZXCVBNM".chars().collect(),
            ],
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "us" | "qwerty" => Self::qwerty(),
            _ => Self::spanish(),
        }
    }

    fn widest_row(&self) -> u16 {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0) as u16
    }

    /// Size the board needs to draw every key.
    pub fn footprint(&self) -> (u16, u16) {
        let cols = self.widest_row();
        let rows = self.rows.len() as u16;
        (
            cols * (KEY_WIDTH + KEY_GAP),
            rows * KEY_HEIGHT + rows.saturating_sub(1),
        )
    }

    /// Cell rectangle of every key when the board is centred in `area`.
    /// Keys that do not fit are left out.
    pub fn key_rects(&self, area: Rect) -> Vec<(char, Rect)> {
        let (width, height) = self.footprint();
        let left = area.x + area.width.saturating_sub(width) / 2;
        let top = area.y + area.height.saturating_sub(height) / 2;
        let widest = self.widest_row();
        let mut rects = Vec::new();

        for (row_idx, row) in self.rows.iter().enumerate() {
            let y = top + row_idx as u16 * (KEY_HEIGHT + 1);
            let indent = (widest - row.len() as u16) * (KEY_WIDTH + KEY_GAP) / 2;
            for (col_idx, &key) in row.iter().enumerate() {
                let x = left + indent + col_idx as u16 * (KEY_WIDTH + KEY_GAP);
                let rect = Rect::new(x, y, KEY_WIDTH, KEY_HEIGHT);
                if rect.right() <= area.right() && rect.bottom() <= area.bottom() {
                    rects.push((key, rect));
                }
            }
        }
        rects
    }

    pub fn key_at(&self, area: Rect, column: u16, row: u16) -> Option<char> {
        self.key_rects(area)
            .into_iter()
            .find(|(_, rect)| rect.contains((column, row).into()))
            .map(|(key, _)| key)
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::spanish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_layout_has_enye() {
        let layout = KeyboardLayout::spanish();
        assert!(layout.rows[1].contains(&'Ñ'));
        assert_eq!(KeyboardLayout::from_name("us"), KeyboardLayout::qwerty());
        assert_eq!(KeyboardLayout::from_name("anything"), layout);
    }

    #[test]
    fn test_key_rects_cover_every_key_when_room() {
        let layout = KeyboardLayout::spanish();
        let rects = layout.key_rects(Rect::new(0, 0, 100, 20));
        assert_eq!(rects.len(), 27);
    }

    #[test]
    fn test_key_at_hits_first_key() {
        let layout = KeyboardLayout::spanish();
        let area = Rect::new(0, 0, 100, 20);
        let (_, q) = layout.key_rects(area)[0];
        assert_eq!(layout.key_at(area, q.x + 2, q.y + 1), Some('Q'));
        assert_eq!(layout.key_at(area, 0, 0), None);
    }

    #[test]
    fn test_short_rows_are_centred() {
        let layout = KeyboardLayout::spanish();
        let area = Rect::new(0, 0, 100, 20);
        let rects = layout.key_rects(area);
        let q = rects.iter().find(|(k, _)| *k == 'Q').unwrap().1;
        let z = rects.iter().find(|(k, _)| *k == 'Z').unwrap().1;
        assert!(z.x > q.x);
    }
}
