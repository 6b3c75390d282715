//! Parsing options and configuration.

use crate::error::{Error, Result};

/// Options for parsing marked-up report text.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Character that opens and closes a bold span
    pub delimiter: char,

    /// Apply Unicode NFC normalization before tokenizing
    pub normalize_unicode: bool,

    /// Strip trailing whitespace from every line before tokenizing
    pub trim_trailing_whitespace: bool,

    /// Treat fully bold lines as unnumbered section headers
    pub detect_bold_headers: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bold delimiter character.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable or disable trailing whitespace trimming.
    pub fn with_trailing_whitespace_trimmed(mut self, trim: bool) -> Self {
        self.trim_trailing_whitespace = trim;
        self
    }

    /// Enable or disable bold-line header detection.
    pub fn with_bold_headers(mut self, detect: bool) -> Self {
        self.detect_bold_headers = detect;
        self
    }

    /// Reject delimiters that would collide with ordinary text.
    pub fn validate(&self) -> Result<()> {
        let d = self.delimiter;
        if d.is_alphanumeric() || d.is_whitespace() || d.is_control() {
            return Err(Error::InvalidOptions(format!(
                "{:?} cannot be used as a bold delimiter",
                d
            )));
        }
        Ok(())
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: '*',
            normalize_unicode: false,
            trim_trailing_whitespace: false,
            detect_bold_headers: true,
        }
    }
}
