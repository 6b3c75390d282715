//! Markup parsing module.

mod markup;
mod options;
mod sections;

pub use markup::{MarkupParser, Token, Tokenizer};
pub use options::ParseOptions;
pub use sections::{ReportSection, Section, SectionDetector};
