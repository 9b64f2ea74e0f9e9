//! PDF text extraction.

use lopdf::Document;
use msep_core::{Error, Result, TextSource};
use std::path::Path;

/// Extracts the text of every page of a PDF.
pub struct PdfTextSource;

impl PdfTextSource {
    /// Create a new PDF text source.
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes already in memory.
    pub fn extract_text_from_bytes(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| Error::PdfError(format!("Failed to load PDF: {}", e)))?;
        self.extract_document_text(doc, "<memory>")
    }

    /// Concatenate page texts in page order, a newline after each page.
    ///
    /// Encrypted documents are opened with the empty user password first.
    fn extract_document_text(&self, mut doc: Document, name: &str) -> Result<String> {
        if doc.is_encrypted() {
            log::debug!("'{}' is encrypted, trying the empty password", name);
            doc.decrypt("").map_err(|e| {
                Error::PdfError(format!("'{}' is encrypted and could not be decrypted: {}", name, e))
            })?;
        }

        let pages = doc.get_pages();
        // get_pages is keyed by 1-based page number, already in order
        let text = join_pages(pages.keys().copied(), |n| doc.extract_text(&[n]))
            .map_err(|e| match e {
                Error::PdfError(msg) => Error::PdfError(format!("'{}': {}", name, msg)),
                other => other,
            })?;

        log::debug!(
            "Extracted {} chars from {} page(s) of '{}'",
            text.len(),
            pages.len(),
            name
        );

        Ok(text)
    }
}

/// Join page texts, a newline after each. One unreadable page makes the
/// whole document unreadable.
fn join_pages<I, F>(page_numbers: I, mut extract: F) -> Result<String>
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> lopdf::Result<String>,
{
    let mut text = String::new();
    for page_number in page_numbers {
        let page_text = extract(page_number).map_err(|e| {
            Error::PdfError(format!("Could not extract text from page {}: {}", page_number, e))
        })?;
        text.push_str(&page_text);
        text.push('\n');
    }
    Ok(text)
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdfTextSource {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let doc = Document::load(path).map_err(|e| {
            Error::PdfError(format!("Failed to load '{}': {}", path.display(), e))
        })?;
        self.extract_document_text(doc, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a one-font PDF with one page per entry, each page showing its
    /// lines as separate text objects.
    fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (i, line) in lines.iter().enumerate() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new(
                    "Td",
                    vec![72.into(), (700 - 20 * i as i64).into()],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = build_pdf(&[
            &["12 Ekim 2024 Cumartesi", "Akut Koroner Sendrom"],
            &["Baskan: Prof. Dr. Ali Veli"],
        ]);

        let text = PdfTextSource::new().extract_text_from_bytes(&bytes).unwrap();

        let first = text.find("12 Ekim 2024").unwrap();
        let second = text.find("Akut Koroner").unwrap();
        let third = text.find("Prof. Dr. Ali Veli").unwrap();
        assert!(first < second && second < third);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = PdfTextSource::new()
            .extract_text_from_bytes(b"definitely not a pdf")
            .unwrap_err();
        assert!(matches!(err, Error::PdfError(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = PdfTextSource::new()
            .extract_text(Path::new("/nonexistent/program.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::PdfError(_)));
    }

    #[test]
    fn test_unreadable_page_fails_whole_document() {
        let bytes = build_pdf(&[&["12 Ekim 2024 Cumartesi"]]);
        let doc = Document::load_mem(&bytes).unwrap();

        let text = join_pages([1], |n| doc.extract_text(&[n])).unwrap();
        assert!(text.contains("12 Ekim 2024 Cumartesi"));

        // page 2 does not exist
        let err = join_pages([1, 2], |n| doc.extract_text(&[n])).unwrap_err();
        assert!(matches!(err, Error::PdfError(msg) if msg.contains("page 2")));
    }

    #[test]
    fn test_encrypted_without_empty_password_is_an_error() {
        let bytes = build_pdf(&[&["12 Ekim 2024 Cumartesi"]]);
        let mut doc = Document::load_mem(&bytes).unwrap();
        doc.trailer.set(
            "Encrypt",
            dictionary! {
                "Filter" => "Standard",
                "V" => 1,
                "R" => 2,
                "O" => Object::string_literal(vec![0x11u8; 32]),
                "U" => Object::string_literal(vec![0x22u8; 32]),
                "P" => -4,
            },
        );
        let mut encrypted = Vec::new();
        doc.save_to(&mut encrypted).unwrap();

        let err = PdfTextSource::new()
            .extract_text_from_bytes(&encrypted)
            .unwrap_err();
        assert!(matches!(err, Error::PdfError(msg) if msg.contains("encrypted")));
    }
}
