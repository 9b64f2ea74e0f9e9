//! PDF text source for schedule parsing.
//!
//! Reads schedule PDFs with lopdf and hands their text to the parser as one
//! flat string, page after page.

pub mod source;

pub use source::PdfTextSource;
