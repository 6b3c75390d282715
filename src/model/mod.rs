//! Document model types for the rendering pipeline.
//!
//! This module defines the intermediate representation shared by the
//! parser, the pagination engine and the renderers. A [`ParsedDocument`] is
//! built once per input and never mutated; pages and paragraphs are derived
//! views over it.

mod document;
mod flow;
mod metadata;
mod page;
mod run;

pub use document::{Outline, OutlineItem, PaginatedDocument};
pub use flow::{FlowDocument, ParagraphKind, ParagraphNode};
pub use metadata::{ReportMetadata, ReportType};
pub use page::{DrawCommand, Page, PageGeometry, PositionedLine, RenderedPage};
pub use run::{Line, ParsedDocument, Run};
