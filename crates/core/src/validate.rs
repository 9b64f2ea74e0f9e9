//! Speaker-name validation gate.
//!
//! A heuristic, not a name parser: a line is taken as a speaker when it is
//! long enough, carries an academic title, and contains none of the
//! organisational noise words that show up around names in schedule PDFs.

use crate::config::ValidatorConfig;

/// Accepts or rejects candidate speaker lines.
#[derive(Debug, Clone, Default)]
pub struct SpeakerValidator {
    config: ValidatorConfig,
}

impl SpeakerValidator {
    /// Create a validator with the default vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator from explicit configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// The vocabulary in use.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Whether `candidate` looks like a speaker name.
    pub fn is_valid(&self, candidate: &str) -> bool {
        if candidate.chars().count() < self.config.min_length {
            return false;
        }

        if self
            .config
            .denylist
            .iter()
            .any(|word| candidate.contains(word.as_str()))
        {
            return false;
        }

        if let Some(token) = &self.config.year_token {
            if candidate.contains(token.as_str()) {
                return false;
            }
        }

        self.config
            .allowlist
            .iter()
            .any(|title| candidate.contains(title.as_str()))
    }
}
