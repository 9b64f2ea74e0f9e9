//! End-to-end extraction: raw schedule text in, sorted period records out.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::filter::{sort_by_day, RecordFilter};
use crate::normalize::TextNormalizer;
use crate::segment::Segmenter;
use crate::types::EventRecord;
use crate::validate::SpeakerValidator;
use std::path::{Path, PathBuf};

/// Something that turns a schedule document into flat text.
///
/// Implementations return every page's text in page order, each followed by
/// a newline.
pub trait TextSource {
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Runs normalization, segmentation and filtering for one period.
#[derive(Debug, Clone, Default)]
pub struct ScheduleExtractor {
    normalizer: TextNormalizer,
    segmenter: Segmenter,
    filter: RecordFilter,
}

impl ScheduleExtractor {
    /// Create an extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from explicit configuration.
    pub fn with_config(config: &ParserConfig) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            segmenter: Segmenter::with_validator(SpeakerValidator::with_config(
                config.validator.clone(),
            )),
            filter: RecordFilter::new().with_speaker_prefix(config.speaker_prefix.clone()),
        }
    }

    /// Parse every record in `text`, without period filtering.
    pub fn parse(&self, text: &str) -> Vec<EventRecord> {
        let lines = self.normalizer.split_lines(text);
        self.segmenter.segment(&lines)
    }

    /// Parse `text` and keep the records of `period`, sorted by day.
    pub fn extract(&self, text: &str, period: &str) -> Vec<EventRecord> {
        self.filter.apply(self.parse(text), period)
    }

    /// Extract `period` records from every input, one after another.
    ///
    /// An input whose text cannot be read contributes no records. The
    /// combined list is sorted by day again.
    pub fn extract_all<T: TextSource + ?Sized>(
        &self,
        source: &T,
        inputs: &[PathBuf],
        period: &str,
    ) -> Vec<EventRecord> {
        let mut all = Vec::new();

        for input in inputs {
            let text = match source.extract_text(input) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Skipping {}: {}", input.display(), e);
                    continue;
                }
            };

            let records = self.extract(&text, period);
            log::info!(
                "{}: {} record(s) for {}",
                input.display(),
                records.len(),
                period
            );
            all.extend(records);
        }

        sort_by_day(&mut all);
        all
    }
}
