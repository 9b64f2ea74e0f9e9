//! PPTX (Office Open XML) slide generation for schedule records.
//!
//! A template's first slides are layout variants carrying placeholder
//! tokens. Each record gets a filled copy of its variant; the variants
//! themselves are left out of the result.

pub mod generator;
pub mod package;
pub mod placeholder;

pub use generator::SlideGenerator;
pub use package::{SlidePart, Template};
pub use placeholder::PlaceholderSet;
