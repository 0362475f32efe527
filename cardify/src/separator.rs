use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::UserInputError;

/// The two built-in ways of separating cards in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorPreset {
    /// One or more blank lines.
    #[default]
    EmptyLine,
    /// A `---` rule on its own line, surrounding whitespace tolerated.
    Rule,
}

impl SeparatorPreset {
    pub const ALL: [SeparatorPreset; 2] = [SeparatorPreset::EmptyLine, SeparatorPreset::Rule];

    /// Name shown to the user and stored in settings.
    pub fn name(self) -> &'static str {
        match self {
            SeparatorPreset::EmptyLine => "empty line",
            SeparatorPreset::Rule => "---",
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            SeparatorPreset::EmptyLine => r"\n{2,}",
            SeparatorPreset::Rule => r"\n+---\s*(?:\n+|\n*?)",
        }
    }

    /// The preset whose pattern is exactly `pattern`, if any.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.pattern() == pattern)
    }
}

impl fmt::Display for SeparatorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeparatorPreset {
    type Err = UserInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "empty line" | "blank-line" | "empty-line" => Ok(SeparatorPreset::EmptyLine),
            "---" | "rule" => Ok(SeparatorPreset::Rule),
            other => Err(UserInputError::UnknownPreset(other.to_string())),
        }
    }
}

/// The active card separator: a compiled pattern plus its display name.
/// Passed explicitly into every segmentation call.
#[derive(Debug, Clone)]
pub struct Separator {
    name: String,
    regex: Regex,
}

impl Separator {
    /// Compile a separator from a user-supplied pattern.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, UserInputError> {
        let regex = Regex::new(pattern).map_err(|e| UserInputError::InvalidSeparator {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if regex.is_match("") {
            return Err(UserInputError::InvalidSeparator {
                pattern: pattern.to_string(),
                reason: "pattern matches the empty string".to_string(),
            });
        }
        Ok(Separator {
            name: name.into(),
            regex,
        })
    }

    pub fn preset(preset: SeparatorPreset) -> Self {
        // Preset patterns are constants known to compile and never match "".
        Separator {
            name: preset.name().to_string(),
            regex: Regex::new(preset.pattern()).unwrap(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Default for Separator {
    fn default() -> Self {
        Separator::preset(SeparatorPreset::default())
    }
}

impl From<SeparatorPreset> for Separator {
    fn from(preset: SeparatorPreset) -> Self {
        Separator::preset(preset)
    }
}
