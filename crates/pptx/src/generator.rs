//! Builds the finished presentation: one filled slide per record, template
//! slides removed.

use crate::package::{
    parse_relationships, plain_attr, relationship_attr, resolve_target, rewrite_list,
    trailing_number, write_package, SlidePart, Template, CONTENT_TYPES_PART, PRESENTATION_PART,
    PRESENTATION_RELS_PART, SLIDE_CONTENT_TYPE, SLIDE_REL_TYPE,
};
use crate::placeholder::PlaceholderSet;
use msep_core::{select_layout, Error, EventRecord, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};

const NOTES_SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

/// Slide ids below this are reserved by PresentationML.
const MIN_SLIDE_ID: u32 = 256;

/// A slide added to the output package.
#[derive(Debug)]
struct NewSlide {
    number: u32,
    rel_id: String,
    slide_id: u32,
}

impl NewSlide {
    fn path(&self) -> String {
        format!("ppt/slides/slide{}.xml", self.number)
    }

    fn rels_path(&self) -> String {
        format!("ppt/slides/_rels/slide{}.xml.rels", self.number)
    }
}

/// Fills template slides from event records.
#[derive(Debug, Clone, Default)]
pub struct SlideGenerator {
    placeholders: PlaceholderSet,
}

impl SlideGenerator {
    /// Create a generator with the default placeholder tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom placeholder tokens.
    pub fn with_placeholders(mut self, placeholders: PlaceholderSet) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Generate a presentation with one slide per record, in record order.
    ///
    /// Each record's slide is a copy of the template slide its layout
    /// selects. The template slides themselves, with their notes, are left
    /// out of the result.
    pub fn generate(&self, template: &Template, records: &[EventRecord]) -> Result<Vec<u8>> {
        let available = template.slide_count();
        if available == 0 {
            return Err(Error::InvalidTemplate(
                "Template has no slides".to_string(),
            ));
        }

        let presentation_rels = parse_relationships(&template.part_str(PRESENTATION_RELS_PART)?)?;
        let presentation = template.part_str(PRESENTATION_PART)?;

        let mut next_number = template
            .parts()
            .iter()
            .filter(|(name, _)| is_slide_part(name))
            .filter_map(|(name, _)| trailing_number(name))
            .max()
            .unwrap_or(0)
            + 1;
        let mut next_rel = presentation_rels
            .iter()
            .filter_map(|r| trailing_number(&r.id))
            .max()
            .unwrap_or(0)
            + 1;
        let mut next_slide_id =
            max_slide_id(&presentation)?.map_or(MIN_SLIDE_ID, |id| (id + 1).max(MIN_SLIDE_ID));

        let mut added: Vec<(String, Vec<u8>)> = Vec::new();
        let mut new_slides = Vec::with_capacity(records.len());

        for record in records {
            let Some(variant) = select_layout(record.speakers.len(), available) else {
                continue;
            };
            let source = &template.slides()[variant.template_index()];
            let slide = NewSlide {
                number: next_number,
                rel_id: format!("rId{}", next_rel),
                slide_id: next_slide_id,
            };
            next_number += 1;
            next_rel += 1;
            next_slide_id += 1;

            log::debug!(
                "{} -> {:?} layout ({} speaker(s))",
                record.date,
                variant,
                record.speakers.len()
            );

            let xml = template.part_str(&source.path)?;
            let filled = self.placeholders.fill_slide(&xml, record, variant)?;
            added.push((slide.path(), filled.into_bytes()));

            if template.part(&source.rels_path()).is_some() {
                let rels = slide_rels_without_notes(&template.part_str(&source.rels_path())?)?;
                added.push((slide.rels_path(), rels.into_bytes()));
            }

            new_slides.push(slide);
        }

        let removed_parts = template_parts(template)?;
        let removed_rels: HashSet<&str> =
            template.slides().iter().map(|s| s.rel_id.as_str()).collect();

        let presentation = rewrite_list(
            &presentation,
            b"sldIdLst",
            b"sldId",
            |e| {
                relationship_attr(e)
                    .map_or(true, |id| !removed_rels.contains(id.as_str()))
            },
            |prefix| {
                new_slides
                    .iter()
                    .map(|slide| {
                        let mut e = BytesStart::new(format!("{}sldId", prefix));
                        e.push_attribute(("id", slide.slide_id.to_string().as_str()));
                        e.push_attribute(("r:id", slide.rel_id.as_str()));
                        e
                    })
                    .collect()
            },
        )?;

        let presentation_rels = rewrite_list(
            &template.part_str(PRESENTATION_RELS_PART)?,
            b"Relationships",
            b"Relationship",
            |e| plain_attr(e, b"Id").map_or(true, |id| !removed_rels.contains(id.as_str())),
            |prefix| {
                new_slides
                    .iter()
                    .map(|slide| {
                        let mut e = BytesStart::new(format!("{}Relationship", prefix));
                        e.push_attribute(("Id", slide.rel_id.as_str()));
                        e.push_attribute(("Type", SLIDE_REL_TYPE));
                        e.push_attribute((
                            "Target",
                            format!("slides/slide{}.xml", slide.number).as_str(),
                        ));
                        e
                    })
                    .collect()
            },
        )?;

        let content_types = rewrite_list(
            &template.part_str(CONTENT_TYPES_PART)?,
            b"Types",
            b"Override",
            |e| {
                plain_attr(e, b"PartName").map_or(true, |name| {
                    !removed_parts.contains(name.trim_start_matches('/'))
                })
            },
            |prefix| {
                new_slides
                    .iter()
                    .map(|slide| {
                        let mut e = BytesStart::new(format!("{}Override", prefix));
                        e.push_attribute(("PartName", format!("/{}", slide.path()).as_str()));
                        e.push_attribute(("ContentType", SLIDE_CONTENT_TYPE));
                        e
                    })
                    .collect()
            },
        )?;

        let replaced: HashMap<&str, &[u8]> = HashMap::from([
            (PRESENTATION_PART, presentation.as_bytes()),
            (PRESENTATION_RELS_PART, presentation_rels.as_bytes()),
            (CONTENT_TYPES_PART, content_types.as_bytes()),
        ]);

        let kept = template
            .parts()
            .iter()
            .filter(|(name, _)| !removed_parts.contains(name.as_str()))
            .map(|(name, content)| {
                let content = replaced
                    .get(name.as_str())
                    .copied()
                    .unwrap_or(content.as_slice());
                (name.as_str(), content)
            });
        let new = added
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_slice()));

        log::info!(
            "Generated {} slide(s), removed {} template slide(s)",
            new_slides.len(),
            available
        );

        write_package(kept.chain(new))
    }
}

/// Whether `name` is a slide part ("ppt/slides/slideN.xml").
fn is_slide_part(name: &str) -> bool {
    name.strip_prefix("ppt/slides/slide")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Highest `id` in the presentation's slide id list.
fn max_slide_id(presentation: &str) -> Result<Option<u32>> {
    let mut max = None;
    let mut reader = Reader::from_str(presentation);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if crate::package::local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = plain_attr(e, b"id").and_then(|id| id.parse::<u32>().ok()) {
                    max = max.max(Some(id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(max)
}

/// A slide's relationships with the notes slide link dropped.
fn slide_rels_without_notes(xml: &str) -> Result<String> {
    rewrite_list(
        xml,
        b"Relationships",
        b"Relationship",
        |e| plain_attr(e, b"Type").as_deref() != Some(NOTES_SLIDE_REL_TYPE),
        |_| Vec::new(),
    )
}

/// Parts that go away with the template slides: each slide, its
/// relationships, and its notes slide with that one's relationships.
fn template_parts(template: &Template) -> Result<HashSet<String>> {
    let mut parts = HashSet::new();

    for slide in template.slides() {
        parts.insert(slide.path.clone());
        let rels_path = slide.rels_path();
        if template.part(&rels_path).is_some() {
            for rel in parse_relationships(&template.part_str(&rels_path)?)? {
                if rel.rel_type == NOTES_SLIDE_REL_TYPE {
                    let notes = resolve_target(slide_dir(slide), &rel.target);
                    parts.insert(crate::package::rels_path_for(&notes));
                    parts.insert(notes);
                }
            }
            parts.insert(rels_path);
        }
    }

    Ok(parts)
}

fn slide_dir(slide: &SlidePart) -> &str {
    slide.path.rsplit_once('/').map_or("", |(dir, _)| dir)
}
