//! Core domain types, schedule text parsing and record filtering for
//! building MSEP presentations from schedule PDFs.

pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod layout;
pub mod normalize;
pub mod pipeline;
pub mod segment;
pub mod types;
pub mod validate;

pub use classify::{classify, LineKind};
pub use config::{ParserConfig, ValidatorConfig};
pub use error::{Error, Result};
pub use filter::{sort_by_day, RecordFilter};
pub use layout::{select_layout, LayoutVariant};
pub use normalize::TextNormalizer;
pub use pipeline::{ScheduleExtractor, TextSource};
pub use segment::Segmenter;
pub use types::{EventRecord, Period};
pub use validate::SpeakerValidator;
