use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use spellgate::engine::memory::Symbol;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dark: String,
    pub text_pending: String,
    pub panel_bg: String,
    pub key_base: String,
    pub key_active: String,
    pub key_solved: String,
    pub border: String,
    pub dimmed: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub success: String,
    pub symbol_red: String,
    pub symbol_blue: String,
    pub symbol_green: String,
    pub symbol_yellow: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("spellgate")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        if let Some(file) = ThemeAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                if let Ok(theme) = toml::from_str::<Theme>(content) {
                    return Some(theme);
                }
            }
        }

        None
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("slate").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#6B7A8F".to_string(),
            fg: "#E6E9ED".to_string(),
            text_dark: "#2C3E50".to_string(),
            text_pending: "#8CA0B3".to_string(),
            panel_bg: "#3E4C5E".to_string(),
            key_base: "#526175".to_string(),
            key_active: "#D98E5F".to_string(),
            key_solved: "#4A6C96".to_string(),
            border: "#8CA0B3".to_string(),
            dimmed: "#1E2832".to_string(),
            bar_filled: "#4A6C96".to_string(),
            bar_empty: "#3E4C5E".to_string(),
            error: "#E74C3C".to_string(),
            success: "#2ECC71".to_string(),
            symbol_red: "#E74C3C".to_string(),
            symbol_blue: "#3498DB".to_string(),
            symbol_green: "#2ECC71".to_string(),
            symbol_yellow: "#F1C40F".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dark(&self) -> Color { Self::parse_color(&self.text_dark) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn panel_bg(&self) -> Color { Self::parse_color(&self.panel_bg) }
    pub fn key_base(&self) -> Color { Self::parse_color(&self.key_base) }
    pub fn key_active(&self) -> Color { Self::parse_color(&self.key_active) }
    pub fn key_solved(&self) -> Color { Self::parse_color(&self.key_solved) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn dimmed(&self) -> Color { Self::parse_color(&self.dimmed) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }

    pub fn symbol(&self, symbol: Symbol) -> Color {
        Self::parse_color(match symbol {
            Symbol::Red => &self.symbol_red,
            Symbol::Blue => &self.symbol_blue,
            Symbol::Green => &self.symbol_green,
            Symbol::Yellow => &self.symbol_yellow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"slate".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#D98E5F"), Color::Rgb(0xD9, 0x8E, 0x5F));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }
}
