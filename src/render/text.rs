//! Plain text rendering.

use crate::model::{FlowDocument, PaginatedDocument};

/// Flow document as plain text, one line per paragraph.
pub fn to_text(doc: &FlowDocument) -> String {
    doc.plain_text()
}

/// Paginated document as plain text; pages are separated by a form feed.
pub fn pages_to_text(doc: &PaginatedDocument) -> String {
    doc.pages
        .iter()
        .map(|page| {
            let mut lines: Vec<String> = page.header_lines().into_iter().map(String::from).collect();
            lines.push(String::new());
            lines.extend(page.line_texts());
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\x0c\n")
}
