//! Rendering module turning parsed documents into output models.
//!
//! [`PdfRenderer`] produces positioned draw commands from paginated lines;
//! [`FlowRenderer`] produces the paragraph/run tree used by flowing formats.

mod flow;
mod json;
pub mod metrics;
mod options;
mod pdf;
mod text;

pub use flow::FlowRenderer;
pub use json::{to_json, JsonFormat};
pub use metrics::{text_width, FontFace};
pub use options::RenderOptions;
pub use pdf::PdfRenderer;
pub use text::{pages_to_text, to_text};
