//! Domain types for representing parsed schedule content.

use crate::error::Error;
use crate::normalize::TextNormalizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One parsed schedule entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The date-header line, verbatim (e.g. "12 Ekim 2024 Cumartesi").
    pub date: String,

    /// Session topic, assembled from the lines before the chair label.
    pub topic: String,

    /// Session chair(s). May be empty.
    pub chair: String,

    /// Speaker names in order of appearance.
    pub speakers: Vec<String>,
}

impl EventRecord {
    /// Create a new record for the given date-header line.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    /// Whether the record carries any chair or speaker content.
    pub fn has_chair_or_speaker(&self) -> bool {
        !self.chair.is_empty() || !self.speakers.is_empty()
    }

    /// Leading day number of the date line, if it parses.
    pub fn day(&self) -> Option<u32> {
        self.date.split_whitespace().next()?.parse().ok()
    }
}

/// A schedule period: one of the ten months of the academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Eylul,
    Ekim,
    Kasim,
    Aralik,
    Ocak,
    Subat,
    Mart,
    Nisan,
    Mayis,
    Haziran,
}

impl Period {
    /// All periods in academic-year order.
    pub const ALL: [Period; 10] = [
        Period::Eylul,
        Period::Ekim,
        Period::Kasim,
        Period::Aralik,
        Period::Ocak,
        Period::Subat,
        Period::Mart,
        Period::Nisan,
        Period::Mayis,
        Period::Haziran,
    ];

    /// The month name as it appears in schedule date lines.
    pub fn name(&self) -> &'static str {
        match self {
            Period::Eylul => "Eylül",
            Period::Ekim => "Ekim",
            Period::Kasim => "Kasım",
            Period::Aralik => "Aralık",
            Period::Ocak => "Ocak",
            Period::Subat => "Şubat",
            Period::Mart => "Mart",
            Period::Nisan => "Nisan",
            Period::Mayis => "Mayıs",
            Period::Haziran => "Haziran",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalizer = TextNormalizer::new();
        let wanted = normalizer.lowercase(s.trim());

        Period::ALL
            .into_iter()
            .find(|p| normalizer.lowercase(p.name()) == wanted)
            .ok_or_else(|| Error::UnknownPeriod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_day() {
        assert_eq!(EventRecord::new("12 Ekim 2024 Cumartesi").day(), Some(12));
        assert_eq!(EventRecord::new("3 Kasım 2024 Pazar").day(), Some(3));
        assert_eq!(EventRecord::new("Ekim 2024").day(), None);
        assert_eq!(EventRecord::new("").day(), None);
    }

    #[test]
    fn test_has_chair_or_speaker() {
        let mut record = EventRecord::new("1 Ekim 2024 Salı");
        assert!(!record.has_chair_or_speaker());

        record.chair = "Prof. Dr. A".to_string();
        assert!(record.has_chair_or_speaker());

        record.chair.clear();
        record.speakers.push("Dr. B".to_string());
        assert!(record.has_chair_or_speaker());
    }

    #[test]
    fn test_period_from_str_turkish_casing() {
        assert_eq!("Kasım".parse::<Period>().unwrap(), Period::Kasim);
        assert_eq!("KASIM".parse::<Period>().unwrap(), Period::Kasim);
        assert_eq!("ekim".parse::<Period>().unwrap(), Period::Ekim);
        assert_eq!("EKİM".parse::<Period>().unwrap(), Period::Ekim);
        assert_eq!(" şubat ".parse::<Period>().unwrap(), Period::Subat);
    }

    #[test]
    fn test_period_from_str_rejects_unknown() {
        assert!("Temmuz".parse::<Period>().is_err());
        assert!("".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_display_and_order() {
        assert_eq!(Period::Eylul.to_string(), "Eylül");
        assert_eq!(Period::ALL.first(), Some(&Period::Eylul));
        assert_eq!(Period::ALL.last(), Some(&Period::Haziran));
    }
}
