//! Paginated document and outline types.

use super::{PageGeometry, RenderedPage, ReportMetadata};
use serde::{Deserialize, Serialize};

/// A fully paginated report ready for a fixed-layout writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedDocument {
    /// Report metadata (also printed in every page header)
    pub metadata: ReportMetadata,

    /// Geometry the pages were laid out with
    pub geometry: PageGeometry,

    /// Rendered pages in order
    pub pages: Vec<RenderedPage>,

    /// Section bookmarks
    pub outline: Outline,
}

impl PaginatedDocument {
    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&RenderedPage> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Total number of content lines that produced at least one command.
    pub fn content_line_count(&self) -> usize {
        self.pages.iter().map(|p| p.line_texts().len()).sum()
    }
}

/// Document outline (bookmarks).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Bookmarks in document order
    pub items: Vec<OutlineItem>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the outline.
    pub fn add_item(&mut self, item: OutlineItem) {
        self.items.push(item);
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of bookmarks.
    pub fn total_items(&self) -> usize {
        self.items.len()
    }
}

/// A single outline item (bookmark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Item title
    pub title: String,

    /// Target page number (1-indexed)
    pub page: u32,

    /// Vertical position of the target line on that page
    pub y: f32,

    /// Heading level of the section (1 = top level)
    pub level: u8,
}

impl OutlineItem {
    /// Create a new outline item.
    pub fn new(title: impl Into<String>, page: u32, y: f32, level: u8) -> Self {
        Self {
            title: title.into(),
            page,
            y,
            level,
        }
    }
}
