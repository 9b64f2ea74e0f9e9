//! Text normalization for schedule text.
//!
//! Handles Turkish-aware lowercasing for period matching, and turns raw
//! extracted page text into the trimmed, non-empty line stream the segmenter
//! works on.

use unicode_normalization::UnicodeNormalization;

/// Uppercase letters whose generic lowercase mapping is wrong for Turkish.
///
/// `I` must become dotless `ı`, and `İ` must become a plain `i` rather than
/// `i` followed by a combining dot.
const TURKISH_CASE_MAP: &[(char, char)] = &[
    ('I', 'ı'),
    ('İ', 'i'),
    ('Ş', 'ş'),
    ('Ğ', 'ğ'),
    ('Ü', 'ü'),
    ('Ö', 'ö'),
    ('Ç', 'ç'),
];

/// Text normalizer for schedule text.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Create a new text normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Lowercase text using Turkish casing rules.
    ///
    /// Only meant for comparisons; stored record values keep their casing.
    pub fn lowercase(&self, text: &str) -> String {
        text.nfc()
            .map(|c| {
                TURKISH_CASE_MAP
                    .iter()
                    .find(|(upper, _)| *upper == c)
                    .map(|(_, lower)| *lower)
                    .unwrap_or(c)
            })
            .collect::<String>()
            .to_lowercase()
    }

    /// Case-insensitive containment check using Turkish casing rules.
    pub fn contains_folded(&self, haystack: &str, needle: &str) -> bool {
        self.lowercase(haystack).contains(&self.lowercase(needle))
    }

    /// Split raw extracted text into trimmed, non-empty lines.
    ///
    /// The text is composed to NFC first so decomposed letters coming out of
    /// PDF extraction compare equal to their precomposed forms.
    pub fn split_lines(&self, text: &str) -> Vec<String> {
        let composed: String = text.nfc().collect();

        composed
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_dotted_and_dotless_i() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.lowercase("İZMİR"), "izmir");
        assert_eq!(normalizer.lowercase("KASIM"), "kasım");
        assert_eq!(normalizer.lowercase("ISPARTA"), "ısparta");
    }

    #[test]
    fn test_lowercase_other_turkish_letters() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.lowercase("EYLÜL"), "eylül");
        assert_eq!(normalizer.lowercase("ŞUBAT"), "şubat");
        assert_eq!(normalizer.lowercase("ÇĞÖ"), "çğö");
        assert_eq!(normalizer.lowercase("Mayıs"), "mayıs");
    }

    #[test]
    fn test_lowercase_decomposed_input() {
        let normalizer = TextNormalizer::new();

        // I + COMBINING DOT ABOVE composes to İ before mapping
        assert_eq!(normalizer.lowercase("I\u{0307}ZMI\u{0307}R"), "izmir");
    }

    #[test]
    fn test_contains_folded() {
        let normalizer = TextNormalizer::new();

        assert!(normalizer.contains_folded("12 KASIM 2024 Salı", "Kasım"));
        assert!(normalizer.contains_folded("3 Ekim 2024 Perşembe", "EKİM"));
        assert!(!normalizer.contains_folded("3 Ekim 2024 Perşembe", "Kasım"));
    }

    #[test]
    fn test_split_lines_trims_and_filters_empty() {
        let normalizer = TextNormalizer::new();

        let lines = normalizer.split_lines("  Hello  \n\n\t\nWorld\r\nAgain\r");
        assert_eq!(lines, vec!["Hello", "World", "Again"]);
    }

    #[test]
    fn test_split_lines_preserves_casing() {
        let normalizer = TextNormalizer::new();

        let lines = normalizer.split_lines("Başkan: Prof. Dr. ALİ VELİ\n");
        assert_eq!(lines, vec!["Başkan: Prof. Dr. ALİ VELİ"]);
    }

    #[test]
    fn test_split_lines_composes_to_nfc() {
        let normalizer = TextNormalizer::new();

        let lines = normalizer.split_lines("Konus\u{0327}macı: Dr. X");
        assert_eq!(lines, vec!["Konuşmacı: Dr. X"]);
    }
}
