//! Tokenizer and parser for delimiter-marked bold text.
//!
//! Each input line is scanned into a stream of [`Token`]s, then folded into
//! runs with strictly alternating bold state. An unterminated bold span is
//! closed implicitly at the end of its line.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use super::ParseOptions;
use crate::error::Result;
use crate::model::{Line, ParsedDocument, Run};

/// A lexical unit of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text between delimiters (never empty)
    Text(&'a str),
    /// One bold delimiter
    Delimiter,
}

/// Splits a line into text and delimiter tokens.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
    delimiter: char,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over a single line.
    pub fn new(line: &'a str, delimiter: char) -> Self {
        Self {
            rest: line,
            delimiter,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        if let Some(after) = self.rest.strip_prefix(self.delimiter) {
            self.rest = after;
            return Some(Token::Delimiter);
        }

        let end = self.rest.find(self.delimiter).unwrap_or(self.rest.len());
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Token::Text(text))
    }
}

/// Parser turning raw report text into a [`ParsedDocument`].
#[derive(Debug, Clone, Default)]
pub struct MarkupParser {
    options: ParseOptions,
}

impl MarkupParser {
    /// Create a parser with default options (`*` delimiter).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse raw text into lines of runs.
    ///
    /// Empty input yields a document with zero lines. Otherwise every piece
    /// between line breaks (`\n`, `\r\n` or a lone `\r`) becomes one line,
    /// including blank ones.
    pub fn parse(&self, raw: &str) -> ParsedDocument {
        if raw.is_empty() {
            return ParsedDocument::default();
        }

        let text: Cow<'_, str> = if self.options.normalize_unicode {
            Cow::Owned(raw.nfc().collect())
        } else {
            Cow::Borrowed(raw)
        };

        let lines: Vec<Line> = split_lines(&text)
            .enumerate()
            .map(|(idx, line)| {
                let line = if self.options.trim_trailing_whitespace {
                    line.trim_end()
                } else {
                    line
                };
                let (parsed, balanced) = self.parse_line_checked(line);
                if !balanced {
                    log::warn!(
                        "line {}: unmatched {:?}, bold span closed at end of line",
                        idx + 1,
                        self.options.delimiter
                    );
                }
                parsed
            })
            .collect();

        log::debug!(
            "parsed {} bytes into {} lines",
            raw.len(),
            lines.len()
        );
        ParsedDocument::new(lines)
    }

    /// Parse a single line (no line breaks expected).
    pub fn parse_line(&self, line: &str) -> Line {
        self.parse_line_checked(line).0
    }

    /// Parse a line, also reporting whether its delimiters were balanced.
    fn parse_line_checked(&self, line: &str) -> (Line, bool) {
        let mut runs = Vec::new();
        let mut bold = false;
        let mut pending: Option<&str> = None;
        let mut seen_delimiter = false;

        for token in Tokenizer::new(line, self.options.delimiter) {
            match token {
                Token::Text(text) => pending = Some(text),
                Token::Delimiter => {
                    let text = pending.take().unwrap_or("");
                    // Leading empty text is dropped; empty text between two
                    // delimiters becomes a zero-length run.
                    if !text.is_empty() || seen_delimiter {
                        runs.push(Run::new(text, bold));
                    }
                    seen_delimiter = true;
                    bold = !bold;
                }
            }
        }

        if let Some(text) = pending {
            runs.push(Run::new(text, bold));
        }

        (Line::from_runs(runs), !bold)
    }
}

/// Split on `\n`, `\r\n` and lone `\r`.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut pieces = text.split('\n').peekable();
    std::iter::from_fn(move || {
        let piece = pieces.next()?;
        // A `\r` is only half of a CRLF when a `\n` follows it.
        if pieces.peek().is_some() {
            Some(piece.strip_suffix('\r').unwrap_or(piece))
        } else {
            Some(piece)
        }
    })
    .flat_map(|piece| piece.split('\r'))
}
