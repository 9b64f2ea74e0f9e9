//! Template layout selection by speaker count.
//!
//! The template's first slides are the layout variants, in order: one
//! speaker, two speakers, a panel of up to four. When a template ships fewer
//! variants the choice falls back to the largest one it has.

use serde::{Deserialize, Serialize};

/// A template slide design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutVariant {
    /// One speaker.
    Single,
    /// Two speakers.
    Pair,
    /// Panel: no speakers, or three and more.
    Panel,
}

impl LayoutVariant {
    /// Index of this variant's slide in the template.
    pub fn template_index(&self) -> usize {
        match self {
            LayoutVariant::Single => 0,
            LayoutVariant::Pair => 1,
            LayoutVariant::Panel => 2,
        }
    }

    /// How many numbered speaker placeholders this layout carries.
    pub fn speaker_slots(&self) -> usize {
        match self {
            LayoutVariant::Single => 1,
            LayoutVariant::Pair => 2,
            LayoutVariant::Panel => 4,
        }
    }
}

/// Speaker-count bucket used as the first key of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerBucket {
    One,
    Two,
    Many,
}

impl SpeakerBucket {
    pub fn from_count(count: usize) -> Self {
        match count {
            1 => SpeakerBucket::One,
            2 => SpeakerBucket::Two,
            _ => SpeakerBucket::Many,
        }
    }
}

/// Pick the layout for a record with `speaker_count` speakers, given how many
/// variant slides the template has. `None` when the template has none.
pub fn select_layout(speaker_count: usize, available: usize) -> Option<LayoutVariant> {
    use LayoutVariant::*;
    use SpeakerBucket::*;

    let variant = match (SpeakerBucket::from_count(speaker_count), available) {
        (_, 0) => return None,
        (_, 1) => Single,
        (One, _) => Single,
        (Two, _) => Pair,
        (Many, 2) => Pair,
        (Many, _) => Panel,
    };

    Some(variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_template() {
        assert_eq!(select_layout(1, 3), Some(LayoutVariant::Single));
        assert_eq!(select_layout(2, 3), Some(LayoutVariant::Pair));
        assert_eq!(select_layout(3, 3), Some(LayoutVariant::Panel));
        assert_eq!(select_layout(4, 5), Some(LayoutVariant::Panel));
        assert_eq!(select_layout(7, 3), Some(LayoutVariant::Panel));
    }

    #[test]
    fn test_zero_speakers_use_panel_bucket() {
        assert_eq!(select_layout(0, 3), Some(LayoutVariant::Panel));
        assert_eq!(select_layout(0, 2), Some(LayoutVariant::Pair));
    }

    #[test]
    fn test_panel_falls_back_to_pair() {
        assert_eq!(select_layout(3, 2), Some(LayoutVariant::Pair));
        assert_eq!(select_layout(2, 2), Some(LayoutVariant::Pair));
        assert_eq!(select_layout(1, 2), Some(LayoutVariant::Single));
    }

    #[test]
    fn test_single_slide_template() {
        for count in 0..5 {
            assert_eq!(select_layout(count, 1), Some(LayoutVariant::Single));
        }
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(select_layout(1, 0), None);
        assert_eq!(select_layout(3, 0), None);
    }

    #[test]
    fn test_template_index() {
        assert_eq!(LayoutVariant::Single.template_index(), 0);
        assert_eq!(LayoutVariant::Pair.template_index(), 1);
        assert_eq!(LayoutVariant::Panel.template_index(), 2);
    }

    #[test]
    fn test_speaker_bucket() {
        assert_eq!(SpeakerBucket::from_count(0), SpeakerBucket::Many);
        assert_eq!(SpeakerBucket::from_count(1), SpeakerBucket::One);
        assert_eq!(SpeakerBucket::from_count(2), SpeakerBucket::Two);
        assert_eq!(SpeakerBucket::from_count(9), SpeakerBucket::Many);
    }
}
