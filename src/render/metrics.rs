//! Glyph advance widths for the standard Helvetica faces.
//!
//! Widths are in 1/1000 em for the printable ASCII range (32..=126), taken
//! from the Adobe Core 14 AFM files. Regular and bold faces differ, and
//! measuring a bold run with regular widths makes the following run overlap
//! it.

/// A font face used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl FontFace {
    /// Face for a run's bold flag.
    pub fn for_bold(bold: bool) -> Self {
        if bold {
            FontFace::Bold
        } else {
            FontFace::Regular
        }
    }

    /// PostScript name of the standard Type1 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used in PDF content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            FontFace::Regular => &HELVETICA_WIDTHS,
            FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    fn fallback_width(&self) -> u16 {
        match self {
            FontFace::Regular => 556,
            FontFace::Bold => 611,
        }
    }

    /// Advance width of one character in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        match c as u32 {
            code @ 32..=126 => self.widths()[(code - 32) as usize],
            // no-break space
            0xA0 => self.widths()[0],
            _ => self.fallback_width(),
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }
}

/// Width of `text` in points, measured with the face matching `bold`.
pub fn text_width(text: &str, bold: bool, font_size: f32) -> f32 {
    FontFace::for_bold(bold).text_width(text, font_size)
}

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    333, 333, 584, 584, 584, 611, 975,
    // A-Z
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    333, 278, 333, 584, 556, 333,
    // a-z
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // { | } ~
    389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(FontFace::Regular.char_width(' '), 278);
        assert_eq!(FontFace::Regular.char_width('A'), 667);
        assert_eq!(FontFace::Bold.char_width('A'), 722);
        assert_eq!(FontFace::Regular.char_width('z'), 500);
        assert_eq!(FontFace::Bold.char_width('~'), 584);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Revenue grew 10%";
        assert!(text_width(text, true, 11.0) > text_width(text, false, 11.0));
    }

    #[test]
    fn test_width_scales_with_size() {
        let w10 = text_width("abc", false, 10.0);
        let w20 = text_width("abc", false, 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-4);
        // a=556 b=556 c=500
        assert!((w10 - 16.12).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_has_no_width() {
        assert_eq!(text_width("", true, 12.0), 0.0);
    }

    #[test]
    fn test_non_ascii_fallback() {
        assert_eq!(FontFace::Regular.char_width('\u{e9}'), 556);
        assert_eq!(FontFace::Bold.char_width('\u{20ac}'), 611);
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(FontFace::for_bold(false).base_font(), "Helvetica");
        assert_eq!(FontFace::for_bold(true).resource_name(), "F2");
    }
}
