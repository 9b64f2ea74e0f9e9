//! Line classification for schedule text.
//!
//! Every non-empty line is one of: a date header that opens a new event, a
//! chair label, a speaker label, or plain text.

use regex::Regex;
use std::sync::LazyLock;

/// Day number, month name, four-digit year, weekday name.
static DATE_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}\s+[A-Za-zÇĞİÖŞÜçğıöşü]+\s+\d{4}\s+[A-Za-zÇĞİÖŞÜçğıöşü]+").unwrap()
});

/// "Başkan" / "Başkanlar", colon optional. The word boundary keeps
/// "Başkanı" and "Başkanlığı" out.
static CHAIR_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^başkan(?:lar)?\b\s*:?\s*(?P<value>.*)$").unwrap()
});

/// "Konuşmacı" / "Konuşmacılar", colon required.
static SPEAKER_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^konuşmac[ıiİ](?P<plural>lar)?\s*:\s*(?P<value>.*)$").unwrap()
});

/// The role a single line plays in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Opens a new event record.
    DateHeader,
    /// Chair label, with whatever follows the label on the same line.
    ChairLabel { value: &'a str },
    /// Speaker label; `plural` marks the "Konuşmacılar" form.
    SpeakerLabel { plural: bool, value: &'a str },
    /// Anything else.
    Plain,
}

impl LineKind<'_> {
    /// Whether this line starts a new record or a labelled field.
    pub fn is_boundary(&self) -> bool {
        !matches!(self, LineKind::Plain)
    }
}

/// Classify a trimmed, non-empty line.
pub fn classify(line: &str) -> LineKind<'_> {
    if DATE_HEADER_REGEX.is_match(line) {
        return LineKind::DateHeader;
    }

    if let Some(caps) = CHAIR_LABEL_REGEX.captures(line) {
        let value = caps.name("value").map(|m| m.as_str().trim()).unwrap_or("");
        return LineKind::ChairLabel { value };
    }

    if let Some(caps) = SPEAKER_LABEL_REGEX.captures(line) {
        let plural = caps.name("plural").is_some();
        let value = caps.name("value").map(|m| m.as_str().trim()).unwrap_or("");
        return LineKind::SpeakerLabel { plural, value };
    }

    LineKind::Plain
}

/// Whether the line is a date header or a chair/speaker label.
pub fn is_boundary(line: &str) -> bool {
    classify(line).is_boundary()
}
