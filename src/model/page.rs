//! Page-level types: geometry, paginated lines and rendered pages.

use super::Line;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Numeric layout parameters governing how many lines fit on a page.
///
/// All values are in points (1 point = 1/72 inch) and measured from the top
/// edge of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,

    /// Space above the header band
    pub margin_top: f32,

    /// Space kept free at the bottom of the page
    pub margin_bottom: f32,

    /// Left edge of every line of text
    pub margin_left: f32,

    /// Vertical advance per line
    pub line_height: f32,

    /// Height of the header band repeated on every page
    pub header_height: f32,
}

impl PageGeometry {
    /// US Letter (8.5 x 11 inches) with one-inch margins.
    pub fn letter() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            line_height: 16.0,
            header_height: 72.0,
        }
    }

    /// A4 (210 x 297 mm) with one-inch margins.
    pub fn a4() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            ..Self::letter()
        }
    }

    /// Set the vertical advance per line.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the header band height.
    pub fn with_header_height(mut self, header_height: f32) -> Self {
        self.header_height = header_height;
        self
    }

    /// Set top and bottom margins.
    pub fn with_vertical_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Set the page height.
    pub fn with_page_height(mut self, page_height: f32) -> Self {
        self.page_height = page_height;
        self
    }

    /// Vertical position of the first content line on any page.
    pub fn content_top(&self) -> f32 {
        self.margin_top + self.header_height
    }

    /// Lowest position a line may end at.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Height left for content once margins and header are reserved.
    pub fn usable_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom - self.header_height
    }

    /// Rounding slack for comparing positions on this page.
    ///
    /// Sums of decimal margins land a few ulps off in f32, so an exact fit
    /// could otherwise read as an overflow.
    pub fn tolerance(&self) -> f32 {
        self.page_height.abs() * f32::EPSILON * 8.0
    }

    /// Top of the content line in `slot` (zero-based) on any page.
    pub fn line_y(&self, slot: usize) -> f32 {
        self.content_top() + slot as f32 * self.line_height
    }

    /// Whether a line in `slot` ends above the bottom margin.
    pub fn fits(&self, slot: usize) -> bool {
        self.line_y(slot) + self.line_height <= self.content_bottom() + self.tolerance()
    }

    /// Number of lines a full page holds.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.usable_height();
        if self.line_height.is_nan() || self.line_height <= 0.0 || !usable.is_finite() || usable <= 0.0 {
            return 0;
        }
        let mut count = 0;
        while self.fits(count) {
            count += 1;
        }
        count
    }

    /// Check the geometry before any pagination is attempted.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("lineHeight", self.line_height),
            ("headerHeight", self.header_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidGeometry(format!("{} is not finite", name)));
            }
        }

        let positive = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("lineHeight", self.line_height),
            ("headerHeight", self.header_height),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(Error::InvalidGeometry(format!(
                    "{} must be positive (got {})",
                    name, value
                )));
            }
        }
        if self.margin_left < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "marginLeft must not be negative (got {})",
                self.margin_left
            )));
        }
        if self.margin_left >= self.page_width {
            return Err(Error::InvalidGeometry(format!(
                "marginLeft {} leaves no horizontal space on a {} pt page",
                self.margin_left, self.page_width
            )));
        }

        let usable = self.usable_height();
        if usable <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "margins and header ({} pt) leave no usable height on a {} pt page",
                self.margin_top + self.margin_bottom + self.header_height,
                self.page_height
            )));
        }
        if usable + self.tolerance() < self.line_height {
            return Err(Error::InvalidGeometry(format!(
                "usable height {} pt cannot hold a {} pt line",
                usable, self.line_height
            )));
        }

        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// A line with its assigned vertical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedLine {
    /// The line being placed
    pub line: Line,

    /// Top of the line, measured from the top edge of the page
    pub y: f32,

    /// Zero-based page index
    pub page_index: usize,
}

/// One page of positioned lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based page index
    pub index: usize,

    /// Lines in document order
    pub lines: Vec<PositionedLine>,
}

impl Page {
    /// Create an empty page.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            lines: Vec::new(),
        }
    }

    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.index as u32 + 1
    }

    /// Number of content lines on the page.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if the page holds no content lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A single text-drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    /// Left edge of the text in points
    pub x: f32,

    /// Top of the text line, measured from the top edge of the page
    pub y: f32,

    /// Text to draw
    pub text: String,

    /// Whether the bold face is used
    pub bold: bool,

    /// Font size in points
    pub font_size: f32,
}

/// Draw commands for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Zero-based page index
    pub index: usize,

    /// Header commands, identical on every page of a document
    pub header: Vec<DrawCommand>,

    /// Content commands in reading order
    pub body: Vec<DrawCommand>,
}

impl RenderedPage {
    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.index as u32 + 1
    }

    /// All commands, header first.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.header.iter().chain(self.body.iter())
    }

    /// Header text, one entry per header command.
    pub fn header_lines(&self) -> Vec<&str> {
        self.header.iter().map(|c| c.text.as_str()).collect()
    }

    /// Body text grouped by baseline, concatenating runs of one line.
    pub fn line_texts(&self) -> Vec<String> {
        let mut lines: Vec<(f32, String)> = Vec::new();
        for cmd in &self.body {
            match lines.last_mut() {
                Some((y, text)) if *y == cmd.y => text.push_str(&cmd.text),
                _ => lines.push((cmd.y, cmd.text.clone())),
            }
        }
        lines.into_iter().map(|(_, text)| text).collect()
    }
}
