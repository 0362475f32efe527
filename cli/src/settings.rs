use std::path::Path;

use anyhow::Context;
use cardify::{Separator, SeparatorPreset};
use serde::{Deserialize, Serialize};

/// File name of the settings file inside a vault.
pub const SETTINGS_FILE: &str = ".cardify.toml";

/// Persisted user settings. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name of the active separator.
    pub separator_name: String,
    /// Regex matching the text between two cards.
    pub separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        let preset = SeparatorPreset::default();
        Settings {
            separator_name: preset.name().to_string(),
            separator: preset.pattern().to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read '{}'", path.display()));
            }
        };
        toml::from_str(&text).with_context(|| format!("invalid settings in '{}'", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("cannot write '{}'", path.display()))
    }

    /// Switch to a preset, keeping name and pattern in sync.
    pub fn select(&mut self, preset: SeparatorPreset) {
        self.separator_name = preset.name().to_string();
        self.separator = preset.pattern().to_string();
    }

    /// The preset the stored pattern corresponds to, if any.
    pub fn preset(&self) -> Option<SeparatorPreset> {
        SeparatorPreset::from_pattern(&self.separator)
    }

    pub fn to_separator(&self) -> anyhow::Result<Separator> {
        Ok(Separator::new(&self.separator_name, &self.separator)?)
    }
}
