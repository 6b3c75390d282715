//! Line-atomic pagination.
//!
//! Lines are placed top to bottom with a fixed advance. A line that would
//! cross the bottom margin starts a new page; lines are never split and
//! words are never reflowed across a page boundary.

use crate::error::Result;
use crate::model::{Page, PageGeometry, ParsedDocument, PositionedLine};

/// Assigns every line of a document to a page and a vertical position.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    geometry: PageGeometry,
}

impl Paginator {
    /// Create a paginator, validating the geometry up front.
    pub fn new(geometry: PageGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    /// Geometry in use.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lay out a document.
    ///
    /// Always returns at least one page; a document with zero lines yields a
    /// single empty page so the header is rendered once.
    pub fn paginate(&self, doc: &ParsedDocument) -> Vec<Page> {
        let g = &self.geometry;

        let mut pages = Vec::new();
        let mut current = Page::new(0);
        let mut slot = 0;

        for line in doc.lines() {
            if !g.fits(slot) && !current.is_empty() {
                let next_index = current.index + 1;
                pages.push(std::mem::replace(&mut current, Page::new(next_index)));
                slot = 0;
            }

            current.lines.push(PositionedLine {
                line: line.clone(),
                y: g.line_y(slot),
                page_index: current.index,
            });
            slot += 1;
        }
        pages.push(current);

        log::debug!(
            "paginated {} lines onto {} pages ({} lines per page)",
            doc.line_count(),
            pages.len(),
            g.lines_per_page()
        );
        pages
    }
}

/// Validate `geometry` and paginate `doc` with it.
pub fn paginate(doc: &ParsedDocument, geometry: &PageGeometry) -> Result<Vec<Page>> {
    Ok(Paginator::new(*geometry)?.paginate(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Line, Run};

    fn doc_with_lines(n: usize) -> ParsedDocument {
        ParsedDocument::new(
            (0..n)
                .map(|i| Line::from_runs(vec![Run::plain(format!("line {}", i))]))
                .collect(),
        )
    }

    fn small_geometry() -> PageGeometry {
        // usable height 60, three lines of 20 per page
        PageGeometry::letter()
            .with_page_height(100.0)
            .with_vertical_margins(10.0, 10.0)
            .with_header_height(20.0)
            .with_line_height(20.0)
    }

    #[test]
    fn test_zero_lines_yield_one_empty_page() {
        let pages = paginate(&ParsedDocument::default(), &PageGeometry::letter()).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
        assert_eq!(pages[0].index, 0);
    }

    #[test]
    fn test_line_count_preserved() {
        for n in [1, 2, 3, 4, 7, 10, 31] {
            let doc = doc_with_lines(n);
            let pages = paginate(&doc, &small_geometry()).unwrap();
            let total: usize = pages.iter().map(Page::line_count).sum();
            assert_eq!(total, n);
            assert_eq!(pages.len(), n.div_ceil(3));
        }
    }

    #[test]
    fn test_positions_reset_per_page() {
        let pages = paginate(&doc_with_lines(5), &small_geometry()).unwrap();
        assert_eq!(pages.len(), 2);

        let ys: Vec<f32> = pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![30.0, 50.0, 70.0]);
        let ys: Vec<f32> = pages[1].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![30.0, 50.0]);

        assert!(pages[1].lines.iter().all(|l| l.page_index == 1));
    }

    #[test]
    fn test_order_preserved() {
        let doc = doc_with_lines(8);
        let pages = paginate(&doc, &small_geometry()).unwrap();
        let flattened: Vec<String> = pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.line.plain_text()))
            .collect();
        let expected: Vec<String> = doc.lines().iter().map(Line::plain_text).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_exactly_one_line_per_page() {
        let g = PageGeometry::letter()
            .with_page_height(100.0)
            .with_vertical_margins(10.0, 10.0)
            .with_header_height(60.0)
            .with_line_height(20.0);
        let pages = paginate(&doc_with_lines(4), &g).unwrap();
        assert_eq!(pages.len(), 4);
        assert!(pages.iter().all(|p| p.line_count() == 1));
        assert!(pages.iter().all(|p| p.lines[0].y == 70.0));
    }

    #[test]
    fn test_exact_fit_with_decimal_margins() {
        let g = PageGeometry::letter()
            .with_page_height(100.0)
            .with_vertical_margins(0.3, 0.3)
            .with_header_height(10.1)
            .with_line_height(89.3);
        let pages = paginate(&doc_with_lines(3), &g).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.line_count() == 1));
    }

    #[test]
    fn test_positions_do_not_drift() {
        // usable height 60, six hundred lines of 0.1 per page
        let g = small_geometry().with_line_height(0.1);
        let pages = paginate(&doc_with_lines(2000), &g).unwrap();
        assert_eq!(g.lines_per_page(), 600);
        assert_eq!(pages.len(), 4);
        assert!(pages[..3].iter().all(|p| p.line_count() == 600));
        for page in &pages {
            for (slot, line) in page.lines.iter().enumerate() {
                assert_eq!(line.y, g.line_y(slot));
            }
        }
    }

    #[test]
    fn test_blank_lines_consume_space() {
        let doc = ParsedDocument::new(vec![Line::new(); 4]);
        let pages = paginate(&doc, &small_geometry()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].line_count(), 1);
    }

    #[test]
    fn test_deterministic() {
        let doc = doc_with_lines(20);
        let a = paginate(&doc, &small_geometry()).unwrap();
        let b = paginate(&doc, &small_geometry()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_geometry_fails_before_layout() {
        let g = small_geometry().with_line_height(0.0);
        let result = paginate(&doc_with_lines(3), &g);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }
}
