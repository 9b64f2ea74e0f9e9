//! Placeholder substitution inside a slide's shapes.
//!
//! A paragraph whose text is exactly a placeholder token gets the record's
//! value: the first text run takes the value and every other run is blanked,
//! so the first run's formatting survives.

use crate::package::{local_name, write_event};
use msep_core::{EventRecord, LayoutVariant, Result};
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};

/// Placeholder tokens the template's shapes carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderSet {
    pub date: String,
    pub topic: String,
    pub chair: String,
    /// Speaker token of the single-speaker layout.
    pub speaker: String,
    /// Numbered speaker tokens of the pair and panel layouts.
    pub numbered_speakers: Vec<String>,
    /// Shape text marking the speaker box of the single-speaker layout.
    pub speaker_heading: String,
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self {
            date: "tarih".to_string(),
            topic: "Konu adı".to_string(),
            chair: "Başkan adı".to_string(),
            speaker: "Konuşmacı adı".to_string(),
            numbered_speakers: (1..=4).map(|n| format!("{}. Konuşmacı adı", n)).collect(),
            speaker_heading: "KONUŞMACI".to_string(),
        }
    }
}

impl PlaceholderSet {
    /// Value for `token` in a shape of the given layout, if any.
    ///
    /// `in_speaker_box` is whether the shape's text contains the speaker
    /// heading.
    pub fn value_for<'r>(
        &self,
        token: &str,
        record: &'r EventRecord,
        variant: LayoutVariant,
        in_speaker_box: bool,
    ) -> Option<&'r str> {
        if token == self.date {
            return Some(&record.date);
        }
        if token == self.topic {
            return Some(&record.topic);
        }
        if token == self.chair {
            if variant == LayoutVariant::Single && in_speaker_box {
                if let Some(first) = record.speakers.first() {
                    return Some(first);
                }
            }
            return Some(&record.chair);
        }

        match variant {
            LayoutVariant::Single => {
                if token == self.speaker {
                    return record.speakers.first().map(String::as_str);
                }
            }
            LayoutVariant::Pair | LayoutVariant::Panel => {
                let slot = self
                    .numbered_speakers
                    .iter()
                    .take(variant.speaker_slots())
                    .position(|t| t == token)?;
                return record.speakers.get(slot).map(String::as_str);
            }
        }

        None
    }

    /// Fill every placeholder paragraph of `slide_xml` from `record`.
    pub fn fill_slide(
        &self,
        slide_xml: &str,
        record: &EventRecord,
        variant: LayoutVariant,
    ) -> Result<String> {
        let mut reader = Reader::from_str(slide_xml);
        let mut writer = Writer::new(Vec::new());
        let mut shape: Option<Vec<Event<'static>>> = None;
        let mut shape_depth = 0usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| msep_core::Error::XmlError(format!("Error reading slide: {}", e)))?;

            if let Event::Eof = event {
                break;
            }

            match shape.as_mut() {
                None => {
                    if matches!(&event, Event::Start(e) if local_name(e.name().as_ref()) == b"sp")
                    {
                        shape = Some(vec![event.into_owned()]);
                        shape_depth = 1;
                    } else {
                        write_event(&mut writer, event)?;
                    }
                }
                Some(buffer) => {
                    match &event {
                        Event::Start(_) => shape_depth += 1,
                        Event::End(_) => shape_depth -= 1,
                        _ => {}
                    }
                    buffer.push(event.into_owned());

                    if shape_depth == 0 {
                        let events = shape.take().unwrap_or_default();
                        for filled in self.fill_shape(events, record, variant) {
                            write_event(&mut writer, filled)?;
                        }
                    }
                }
            }
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| msep_core::Error::XmlError(format!("Slide is not UTF-8: {}", e)))
    }

    fn fill_shape(
        &self,
        events: Vec<Event<'static>>,
        record: &EventRecord,
        variant: LayoutVariant,
    ) -> Vec<Event<'static>> {
        let paragraphs = paragraph_ranges(&events);
        let in_speaker_box = paragraphs
            .iter()
            .any(|range| paragraph_text(&events[range.clone()]).contains(&self.speaker_heading));

        let mut replacements = Vec::new();
        for range in paragraphs {
            let text = paragraph_text(&events[range.clone()]);
            if let Some(value) = self.value_for(text.trim(), record, variant, in_speaker_box) {
                replacements.push((range, value.to_string()));
            }
        }

        if replacements.is_empty() {
            return events;
        }

        let mut out = Vec::with_capacity(events.len());
        let mut next = 0;
        for (range, value) in replacements {
            out.extend(events[next..range.start].iter().cloned());
            out.extend(replace_runs(&events[range.clone()], &value));
            next = range.end;
        }
        out.extend(events[next..].iter().cloned());
        out
    }
}

/// Index ranges of the `a:p` elements in a shape's events, end tag included.
fn paragraph_ranges(events: &[Event<'_>]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = None;

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(e) if local_name(e.name().as_ref()) == b"p" => start = Some(i),
            Event::End(e) if local_name(e.name().as_ref()) == b"p" => {
                if let Some(s) = start.take() {
                    ranges.push(s..i + 1);
                }
            }
            _ => {}
        }
    }

    ranges
}

/// Concatenated text of the `a:t` runs in a paragraph.
fn paragraph_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    let mut in_text = false;

    for event in events {
        match event {
            Event::Start(e) if local_name(e.name().as_ref()) == b"t" => in_text = true,
            Event::End(e) if local_name(e.name().as_ref()) == b"t" => in_text = false,
            Event::Text(t) if in_text => match t.unescape() {
                Ok(s) => text.push_str(&s),
                Err(_) => text.push_str(&String::from_utf8_lossy(t)),
            },
            Event::CData(c) if in_text => text.push_str(&String::from_utf8_lossy(c)),
            _ => {}
        }
    }

    text
}

/// Put `value` in the paragraph's first run and blank the rest.
fn replace_runs(events: &[Event<'static>], value: &str) -> Vec<Event<'static>> {
    let mut out = Vec::with_capacity(events.len() + 1);
    let mut filled = false;
    let mut in_text = false;

    for event in events {
        match event {
            Event::Start(e) if local_name(e.name().as_ref()) == b"t" => {
                out.push(event.clone());
                if !filled {
                    out.push(Event::Text(BytesText::new(value).into_owned()));
                    filled = true;
                }
                in_text = true;
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == b"t" => {
                if filled {
                    out.push(event.clone());
                } else {
                    out.push(Event::Start(e.clone()));
                    out.push(Event::Text(BytesText::new(value).into_owned()));
                    out.push(Event::End(e.to_end().into_owned()));
                    filled = true;
                }
            }
            Event::End(e) if local_name(e.name().as_ref()) == b"t" => {
                in_text = false;
                out.push(event.clone());
            }
            Event::Text(_) | Event::CData(_) if in_text => {}
            _ => out.push(event.clone()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(paragraphs: &[&[&str]]) -> String {
        let mut xml = String::from("<p:sp><p:txBody>");
        for runs in paragraphs {
            xml.push_str("<a:p>");
            for run in *runs {
                xml.push_str(&format!("<a:r><a:rPr b=\"1\"/><a:t>{}</a:t></a:r>", run));
            }
            xml.push_str("</a:p>");
        }
        xml.push_str("</p:txBody></p:sp>");
        xml
    }

    fn slide(shapes: &[String]) -> String {
        format!(
            "<p:sld xmlns:a=\"a\" xmlns:p=\"p\"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
            shapes.concat()
        )
    }

    fn record(speakers: &[&str]) -> EventRecord {
        EventRecord {
            date: "12 Ekim 2024 Cumartesi".to_string(),
            topic: "Akut Koroner Sendrom".to_string(),
            chair: "Prof. Dr. Ali Veli".to_string(),
            speakers: speakers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_fills_date_topic_chair() {
        let xml = slide(&[
            shape(&[&["tarih"]]),
            shape(&[&["Konu adı"]]),
            shape(&[&["BAŞKAN"], &["Başkan adı"]]),
        ]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &record(&["Dr. A"]), LayoutVariant::Pair)
            .unwrap();

        assert!(filled.contains("<a:t>12 Ekim 2024 Cumartesi</a:t>"));
        assert!(filled.contains("<a:t>Akut Koroner Sendrom</a:t>"));
        assert!(filled.contains("<a:t>Prof. Dr. Ali Veli</a:t>"));
        assert!(filled.contains("<a:t>BAŞKAN</a:t>"));
        assert!(!filled.contains("tarih"));
    }

    #[test]
    fn test_split_runs_keep_first_run() {
        let xml = slide(&[shape(&[&["Konu ", "adı"]])]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &record(&[]), LayoutVariant::Panel)
            .unwrap();

        assert!(filled.contains(
            "<a:r><a:rPr b=\"1\"/><a:t>Akut Koroner Sendrom</a:t></a:r><a:r><a:rPr b=\"1\"/><a:t></a:t></a:r>"
        ));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut r = record(&[]);
        r.topic = "Kalp & Damar <Acil>".to_string();
        let xml = slide(&[shape(&[&["Konu adı"]])]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &r, LayoutVariant::Panel)
            .unwrap();

        assert!(filled.contains("Kalp &amp; Damar &lt;Acil&gt;"));
    }

    #[test]
    fn test_numbered_speakers_follow_slots() {
        let xml = slide(&[shape(&[
            &["1. Konuşmacı adı"],
            &["2. Konuşmacı adı"],
            &["3. Konuşmacı adı"],
        ])]);
        let placeholders = PlaceholderSet::default();

        let pair = placeholders
            .fill_slide(&xml, &record(&["Dr. A", "Dr. B", "Dr. C"]), LayoutVariant::Pair)
            .unwrap();
        assert!(pair.contains("<a:t>Dr. A</a:t>"));
        assert!(pair.contains("<a:t>Dr. B</a:t>"));
        assert!(pair.contains("<a:t>3. Konuşmacı adı</a:t>"));

        let panel = placeholders
            .fill_slide(&xml, &record(&["Dr. A", "Dr. B", "Dr. C"]), LayoutVariant::Panel)
            .unwrap();
        assert!(panel.contains("<a:t>Dr. C</a:t>"));
    }

    #[test]
    fn test_missing_speaker_leaves_placeholder() {
        let xml = slide(&[shape(&[&["1. Konuşmacı adı"], &["2. Konuşmacı adı"]])]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &record(&["Dr. A"]), LayoutVariant::Panel)
            .unwrap();

        assert!(filled.contains("<a:t>Dr. A</a:t>"));
        assert!(filled.contains("<a:t>2. Konuşmacı adı</a:t>"));
    }

    #[test]
    fn test_single_layout_speaker_box_takes_first_speaker() {
        let xml = slide(&[
            shape(&[&["BAŞKAN"], &["Başkan adı"]]),
            shape(&[&["KONUŞMACI"], &["Başkan adı"]]),
        ]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &record(&["Uzm. Dr. Can Ak"]), LayoutVariant::Single)
            .unwrap();

        assert!(filled.contains("<a:t>Prof. Dr. Ali Veli</a:t>"));
        assert!(filled.contains("<a:t>Uzm. Dr. Can Ak</a:t>"));
    }

    #[test]
    fn test_speaker_box_quirk_only_on_single_layout() {
        let xml = slide(&[shape(&[&["KONUŞMACI"], &["Başkan adı"]])]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &record(&["Dr. A", "Dr. B"]), LayoutVariant::Pair)
            .unwrap();

        assert!(filled.contains("<a:t>Prof. Dr. Ali Veli</a:t>"));
        assert!(!filled.contains("Dr. A<"));
    }

    #[test]
    fn test_single_speaker_token() {
        let xml = slide(&[shape(&[&["Konuşmacı adı"]])]);
        let placeholders = PlaceholderSet::default();

        let filled = placeholders
            .fill_slide(&xml, &record(&["Dr. A"]), LayoutVariant::Single)
            .unwrap();
        assert!(filled.contains("<a:t>Dr. A</a:t>"));

        let empty = placeholders
            .fill_slide(&xml, &record(&[]), LayoutVariant::Single)
            .unwrap();
        assert!(empty.contains("<a:t>Konuşmacı adı</a:t>"));
    }

    #[test]
    fn test_untouched_slide_round_trips() {
        let xml = slide(&[shape(&[&["Başlık"]])]);
        let filled = PlaceholderSet::default()
            .fill_slide(&xml, &record(&[]), LayoutVariant::Single)
            .unwrap();

        assert_eq!(filled, xml);
    }

    #[test]
    fn test_placeholders_from_json() {
        let set: PlaceholderSet =
            serde_json::from_str(r#"{"date": "DATE", "topic": "TOPIC"}"#).unwrap();

        assert_eq!(set.date, "DATE");
        assert_eq!(set.topic, "TOPIC");
        assert_eq!(set.chair, "Başkan adı");
        assert_eq!(set.numbered_speakers.len(), 4);
    }
}
