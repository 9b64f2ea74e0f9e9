//! PPTX package access: loading a template, resolving slide order, and
//! rewriting the package's list-like XML parts.

use msep_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub(crate) const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub(crate) const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Relationship type of a slide, as referenced from the presentation.
pub(crate) const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// Content type of a slide part.
pub(crate) const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// A slide of the template, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePart {
    /// Relationship id in `presentation.xml.rels` (e.g. "rId2").
    pub rel_id: String,
    /// Part name inside the package (e.g. "ppt/slides/slide1.xml").
    pub path: String,
}

impl SlidePart {
    /// Part name of this slide's relationships.
    pub fn rels_path(&self) -> String {
        rels_path_for(&self.path)
    }
}

/// One entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// A PPTX template held in memory.
#[derive(Debug, Clone)]
pub struct Template {
    /// Package parts in archive order.
    parts: Vec<(String, Vec<u8>)>,
    /// Slides in presentation order.
    slides: Vec<SlidePart>,
}

impl Template {
    /// Open a template from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a template from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", index, e)))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            parts.push((name, content));
        }

        let mut template = Self {
            parts,
            slides: Vec::new(),
        };
        template.slides = template.read_slide_order()?;

        log::debug!("Template has {} slide(s)", template.slides.len());
        Ok(template)
    }

    /// Read a template from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Template slides in presentation order.
    pub fn slides(&self) -> &[SlidePart] {
        &self.slides
    }

    /// Number of template slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// All parts, in archive order.
    pub(crate) fn parts(&self) -> &[(String, Vec<u8>)] {
        &self.parts
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn part_str(&self, name: &str) -> Result<String> {
        let bytes = self.part(name).ok_or_else(|| {
            Error::InvalidTemplate(format!("File not found in archive '{}'", name))
        })?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::XmlError(format!("'{}' is not UTF-8: {}", name, e)))
    }

    /// Resolve slide order from the presentation's slide id list.
    fn read_slide_order(&self) -> Result<Vec<SlidePart>> {
        let rels = parse_relationships(&self.part_str(PRESENTATION_RELS_PART)?)?;
        let presentation = self.part_str(PRESENTATION_PART)?;

        let mut slides = Vec::new();
        let mut reader = Reader::from_str(&presentation);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let Some(rel_id) = relationship_attr(e) else {
                        continue;
                    };
                    let rel = rels.iter().find(|r| r.id == rel_id).ok_or_else(|| {
                        Error::InvalidTemplate(format!("Slide relationship '{}' is missing", rel_id))
                    })?;
                    slides.push(SlidePart {
                        rel_id,
                        path: resolve_target("ppt", &rel.target),
                    });
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

        Ok(slides)
    }
}

/// Parse the entries of a `.rels` part.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                };

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => {
                            rel.rel_type = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Target" => {
                            rel.target = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Id" => {
                            rel.id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        _ => {}
                    }
                }

                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Copy `xml`, dropping every `element` child for which `keep` says no and
/// appending the elements built by `extra` just before `parent` closes.
///
/// `extra` receives the namespace prefix of `parent` ("" or e.g. "p:").
pub(crate) fn rewrite_list<K, X>(
    xml: &str,
    parent: &[u8],
    element: &[u8],
    keep: K,
    extra: X,
) -> Result<String>
where
    K: Fn(&BytesStart) -> bool,
    X: Fn(&str) -> Vec<BytesStart<'static>>,
{
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut skip_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlError(format!("Error reading XML: {}", e)))?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match &event {
            Event::Empty(e) if local_name(e.name().as_ref()) == element && !keep(e) => continue,
            Event::Start(e) if local_name(e.name().as_ref()) == element && !keep(e) => {
                skip_depth = 1;
                continue;
            }
            Event::End(e) if local_name(e.name().as_ref()) == parent => {
                let prefix = name_prefix(e.name().as_ref());
                for added in extra(&prefix) {
                    write_event(&mut writer, Event::Empty(added))?;
                }
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == parent => {
                // an empty list element has to be opened up to take children
                let added = extra(&name_prefix(e.name().as_ref()));
                if !added.is_empty() {
                    write_event(&mut writer, Event::Start(e.clone()))?;
                    for child in added {
                        write_event(&mut writer, Event::Empty(child))?;
                    }
                    write_event(&mut writer, Event::End(e.to_end()))?;
                    continue;
                }
            }
            Event::Eof => break,
            _ => {}
        }

        write_event(&mut writer, event)?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("Rewritten XML is not UTF-8: {}", e)))
}

pub(crate) fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::XmlError(format!("Error writing XML: {}", e)))
}

/// Write `parts` as a deflated ZIP archive.
pub(crate) fn write_package<'a, I>(parts: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in parts {
        writer
            .start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
        writer.write_all(content)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
    Ok(cursor.into_inner())
}

/// The `r:id`-style attribute of an element (any prefix, local name "id").
pub(crate) fn relationship_attr(e: &BytesStart) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key.as_ref();
        (key != b"id" && local_name(key) == b"id")
            .then(|| String::from_utf8_lossy(&attr.value).to_string())
    })
}

/// Value of an unprefixed attribute.
pub(crate) fn plain_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Part name of the relationships of `part` ("a/b.xml" -> "a/_rels/b.xml.rels").
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Namespace prefix of a qualified name, colon included ("p:sldIdLst" -> "p:").
fn name_prefix(name: &[u8]) -> String {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => String::from_utf8_lossy(&name[..=pos]).to_string(),
        None => String::new(),
    }
}

/// Extract a trailing number from a string like "rId2" or "slide3.xml".
pub(crate) fn trailing_number(s: &str) -> Option<u32> {
    // Remove common extensions first
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
