use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::rules::Rules;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rules: Rules,
}

fn default_theme() -> String {
    "slate".to_string()
}
fn default_tick_rate_ms() -> u64 {
    50
}
fn default_keyboard_layout() -> String {
    "es".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
            keyboard_layout: default_keyboard_layout(),
            seed: None,
            rules: Rules::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spellgate")
            .join("config.toml")
    }

    /// Pull out-of-range values back to something playable.
    pub fn normalize(&mut self) {
        // Ticks must stay well inside the rhythm window.
        if self.tick_rate_ms == 0 || self.tick_rate_ms > 100 {
            self.tick_rate_ms = default_tick_rate_ms();
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        self.rules.normalize();
    }
}
