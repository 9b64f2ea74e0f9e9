//! Period filtering, speaker cleanup and day ordering of parsed records.

use crate::config::DEFAULT_SPEAKER_PREFIX;
use crate::normalize::TextNormalizer;
use crate::types::EventRecord;

/// Keeps the records of one period and puts them in day order.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    normalizer: TextNormalizer,
    speaker_prefix: String,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            speaker_prefix: DEFAULT_SPEAKER_PREFIX.to_string(),
        }
    }
}

impl RecordFilter {
    /// Create a filter with the default speaker prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label stripped from speaker entries.
    pub fn with_speaker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.speaker_prefix = prefix.into();
        self
    }

    /// Filter to `period`, clean speakers, then sort by day.
    pub fn apply(&self, records: Vec<EventRecord>, period: &str) -> Vec<EventRecord> {
        let mut kept: Vec<EventRecord> = self
            .filter_by_period(records, period)
            .into_iter()
            .map(|record| self.clean_speakers(record))
            .collect();

        sort_by_day(&mut kept);
        kept
    }

    /// Keep records whose date mentions `period`, ignoring Turkish casing.
    pub fn filter_by_period(&self, records: Vec<EventRecord>, period: &str) -> Vec<EventRecord> {
        records
            .into_iter()
            .filter(|record| self.normalizer.contains_folded(&record.date, period))
            .collect()
    }

    /// Strip the speaker prefix from every speaker and drop entries left empty.
    pub fn clean_speakers(&self, mut record: EventRecord) -> EventRecord {
        record.speakers = record
            .speakers
            .iter()
            .map(|s| s.replace(self.speaker_prefix.as_str(), "").trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        record
    }
}

/// Sort records by their leading day number.
///
/// All-or-nothing: if any date does not start with a number the slice is left
/// untouched. Returns whether the sort happened.
pub fn sort_by_day(records: &mut [EventRecord]) -> bool {
    if records.iter().any(|r| r.day().is_none()) {
        log::debug!("Skipping day sort: unparseable day number");
        return false;
    }

    records.sort_by_key(|r| r.day().unwrap_or_default());
    true
}
