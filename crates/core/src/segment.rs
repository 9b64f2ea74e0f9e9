//! Record segmentation.
//!
//! Walks the line stream once, front to back, and rebuilds event records from
//! it. The walk is a small state machine: each transition looks at the line
//! under the cursor (and, for labels, the lines right after it) and says how
//! far the cursor moves.
//!
//! ```text
//! NoActiveRecord --date--> AccumulatingTopic --label--> RecordHasChairOrSpeaker
//!                          (plain: topic line)          (plain: ignored)
//!                          <------ date: finalize previous, start new ------
//! ```

use crate::classify::{classify, is_boundary, LineKind};
use crate::types::EventRecord;
use crate::validate::SpeakerValidator;

/// Quote characters stripped from the ends of an assembled topic.
const TOPIC_QUOTES: &[char] = &['"', '\u{201C}', '\u{201D}'];

/// Plain lines this short never become topic text.
const MIN_TOPIC_LINE_CHARS: usize = 4;

/// The record being built, plus topic lines not yet merged into it.
#[derive(Debug)]
struct PendingRecord {
    record: EventRecord,
    topic_lines: Vec<String>,
}

impl PendingRecord {
    fn new(date: &str) -> Self {
        Self {
            record: EventRecord::new(date),
            topic_lines: Vec::new(),
        }
    }

    /// Completeness test used when a new date header closes this record.
    fn is_complete(&self) -> bool {
        !self.record.topic.is_empty() && self.record.has_chair_or_speaker()
    }

    /// Completeness test used when input runs out.
    fn is_complete_at_end(&self) -> bool {
        !self.record.topic.is_empty()
    }

    fn merge_topic(&mut self) {
        if self.topic_lines.is_empty() {
            return;
        }

        let joined = self.topic_lines.join(" ");
        self.record.topic = strip_topic_quotes(joined.trim()).to_string();
        self.topic_lines.clear();
    }
}

/// Segmenter state. Every state but the first owns the record in progress.
#[derive(Debug)]
enum State {
    NoActiveRecord,
    AccumulatingTopic(PendingRecord),
    RecordHasChairOrSpeaker(PendingRecord),
}

impl State {
    /// State to continue in after a label line touched the record.
    fn after_label(pending: PendingRecord) -> Self {
        if pending.record.has_chair_or_speaker() {
            State::RecordHasChairOrSpeaker(pending)
        } else {
            State::AccumulatingTopic(pending)
        }
    }

    fn into_pending(self) -> Option<PendingRecord> {
        match self {
            State::NoActiveRecord => None,
            State::AccumulatingTopic(p) | State::RecordHasChairOrSpeaker(p) => Some(p),
        }
    }
}

/// Splits a schedule's line stream into event records.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    validator: SpeakerValidator,
}

impl Segmenter {
    /// Create a segmenter with the default speaker validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter using the given speaker validator.
    pub fn with_validator(validator: SpeakerValidator) -> Self {
        Self { validator }
    }

    /// Segment trimmed, non-empty lines into records, in document order.
    pub fn segment<S: AsRef<str>>(&self, lines: &[S]) -> Vec<EventRecord> {
        let mut records = Vec::new();
        let mut state = State::NoActiveRecord;
        let mut cursor = 0;

        while cursor < lines.len() {
            let (next, advance) = self.step(state, lines, cursor, &mut records);
            state = next;
            cursor += advance;
        }

        if let Some(pending) = state.into_pending() {
            if pending.is_complete_at_end() {
                records.push(pending.record);
            } else {
                log::debug!("Dropping trailing record '{}'", pending.record.date);
            }
        }

        records
    }

    /// Apply one transition for the line at `cursor`, returning the new state
    /// and how many lines were consumed.
    fn step<S: AsRef<str>>(
        &self,
        state: State,
        lines: &[S],
        cursor: usize,
        records: &mut Vec<EventRecord>,
    ) -> (State, usize) {
        let line = lines[cursor].as_ref();

        match (state, classify(line)) {
            (state, LineKind::DateHeader) => {
                if let Some(pending) = state.into_pending() {
                    if pending.is_complete() {
                        records.push(pending.record);
                    } else {
                        log::debug!("Dropping incomplete record '{}'", pending.record.date);
                    }
                }
                (State::AccumulatingTopic(PendingRecord::new(line)), 1)
            }
            (State::NoActiveRecord, _) => (State::NoActiveRecord, 1),
            (
                State::AccumulatingTopic(mut pending) | State::RecordHasChairOrSpeaker(mut pending),
                LineKind::ChairLabel { value },
            ) => {
                let advance = self.take_chair(&mut pending, value, lines, cursor);
                (State::after_label(pending), advance)
            }
            (
                State::AccumulatingTopic(mut pending) | State::RecordHasChairOrSpeaker(mut pending),
                LineKind::SpeakerLabel { plural, value },
            ) => {
                let advance = if plural {
                    self.take_speaker_list(&mut pending, value, lines, cursor)
                } else {
                    self.take_single_speaker(&mut pending, value, lines, cursor)
                };
                (State::after_label(pending), advance)
            }
            (State::AccumulatingTopic(mut pending), LineKind::Plain) => {
                if line.chars().count() >= MIN_TOPIC_LINE_CHARS {
                    pending.topic_lines.push(line.to_string());
                }
                (State::AccumulatingTopic(pending), 1)
            }
            (state @ State::RecordHasChairOrSpeaker(_), LineKind::Plain) => (state, 1),
        }
    }

    /// Chair label: the name is inline, or else on the next line.
    fn take_chair<S: AsRef<str>>(
        &self,
        pending: &mut PendingRecord,
        inline: &str,
        lines: &[S],
        cursor: usize,
    ) -> usize {
        let mut advance = 1;
        let mut chair = inline.to_string();

        if chair.is_empty() {
            if let Some(next) = lines.get(cursor + 1) {
                chair = next.as_ref().trim().to_string();
                advance = 2;
            }
        }

        pending.record.chair = chair;
        pending.merge_topic();
        advance
    }

    /// Singular speaker label: the inline value, or else exactly one line of
    /// lookahead.
    fn take_single_speaker<S: AsRef<str>>(
        &self,
        pending: &mut PendingRecord,
        inline: &str,
        lines: &[S],
        cursor: usize,
    ) -> usize {
        if self.push_if_valid(pending, inline) {
            return 1;
        }

        // speakers gathered by earlier labels do not cancel the lookahead
        match lines.get(cursor + 1) {
            Some(next) => {
                self.push_if_valid(pending, next.as_ref().trim());
                2
            }
            None => 1,
        }
    }

    /// Plural speaker label: the inline value, then every following line up
    /// to the first one that is a boundary or fails validation.
    fn take_speaker_list<S: AsRef<str>>(
        &self,
        pending: &mut PendingRecord,
        inline: &str,
        lines: &[S],
        cursor: usize,
    ) -> usize {
        self.push_if_valid(pending, inline);

        let mut advance = 1;
        for next in &lines[cursor + 1..] {
            let next = next.as_ref();
            if is_boundary(next) || !self.push_if_valid(pending, next.trim()) {
                break;
            }
            advance += 1;
        }
        advance
    }

    fn push_if_valid(&self, pending: &mut PendingRecord, candidate: &str) -> bool {
        if candidate.is_empty() || !self.validator.is_valid(candidate) {
            return false;
        }
        pending.record.speakers.push(candidate.to_string());
        true
    }
}

/// Strip one quote character from each end of a topic.
fn strip_topic_quotes(topic: &str) -> &str {
    let topic = topic.strip_prefix(TOPIC_QUOTES).unwrap_or(topic);
    let topic = topic.strip_suffix(TOPIC_QUOTES).unwrap_or(topic);
    topic.trim()
}
