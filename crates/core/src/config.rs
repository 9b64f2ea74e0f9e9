//! Parser configuration.
//!
//! Every field has a default, so a JSON file only needs to list what it
//! changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Substrings that mark a line as organisational noise rather than a name.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "Anabilim",
    "Bilim",
    "Kurulu",
    "Programı",
    "Saat",
    "Zoom",
    "Tasarım",
    "Baskı",
    "Cihan",
    "Balcı",
    "Vaka Sunumları",
    "Başkanı",
    "Müdürü",
    "Rektörü",
    "Dekanı",
];

/// Academic title abbreviations; a speaker line must contain one.
pub const DEFAULT_ALLOWLIST: &[&str] = &["Prof", "Doç", "Uzm", "Dr", "Arş", "Öğr"];

/// Shortest accepted speaker line, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 5;

/// Year token that only shows up in header/footer noise.
pub const DEFAULT_YEAR_TOKEN: &str = "2025";

/// Label stripped from speaker entries after filtering.
pub const DEFAULT_SPEAKER_PREFIX: &str = "Vaka Sunumları:";

/// Vocabulary for the speaker validation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Reject candidates containing any of these.
    pub denylist: Vec<String>,
    /// Accept only candidates containing at least one of these.
    pub allowlist: Vec<String>,
    /// Reject candidates shorter than this many characters.
    pub min_length: usize,
    /// Reject candidates containing this token. `None` disables the check.
    pub year_token: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            allowlist: DEFAULT_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
            min_length: DEFAULT_MIN_LENGTH,
            year_token: Some(DEFAULT_YEAR_TOKEN.to_string()),
        }
    }
}

/// Top-level parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Speaker validation vocabulary.
    pub validator: ValidatorConfig,
    /// Prefix removed from speaker entries during cleanup.
    pub speaker_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            speaker_prefix: DEFAULT_SPEAKER_PREFIX.to_string(),
        }
    }
}

impl ParserConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Replace the denylist.
    pub fn with_denylist<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validator.denylist = words.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowlist.
    pub fn with_allowlist<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validator.allowlist = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Set the minimum speaker length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.validator.min_length = min_length;
        self
    }

    /// Set or clear the rejected year token.
    pub fn with_year_token(mut self, token: Option<&str>) -> Self {
        self.validator.year_token = token.map(str::to_string);
        self
    }

    /// Set the speaker prefix stripped during cleanup.
    pub fn with_speaker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.speaker_prefix = prefix.into();
        self
    }
}
