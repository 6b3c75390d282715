//! Rendering options and configuration.

/// Options for producing draw commands.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Font size of content text in points
    pub font_size: f32,

    /// Font size of header text in points
    pub header_font_size: f32,

    /// Render pages in parallel
    pub parallel: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the header font size.
    pub fn with_header_font_size(mut self, size: f32) -> Self {
        self.header_font_size = size;
        self
    }

    /// Enable or disable parallel page rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            header_font_size: 12.0,
            parallel: true,
        }
    }
}
