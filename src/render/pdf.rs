//! Draw-command generation for paginated output.

use rayon::prelude::*;

use super::metrics::text_width;
use super::RenderOptions;
use crate::model::{DrawCommand, Page, PageGeometry, PositionedLine, RenderedPage, ReportMetadata};

/// Turns positioned lines into per-page draw commands.
///
/// Runs are placed left to right from the geometry's left margin, each
/// advancing the pen by its width in the matching face. Every page starts
/// with the same header commands.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    geometry: PageGeometry,
    options: RenderOptions,
}

impl PdfRenderer {
    /// Create a renderer for pages laid out with `geometry`.
    pub fn new(geometry: PageGeometry, options: RenderOptions) -> Self {
        Self { geometry, options }
    }

    /// Render all pages, in page order.
    pub fn render(&self, pages: &[Page], metadata: &ReportMetadata) -> Vec<RenderedPage> {
        let header = self.header_commands(metadata);

        let rendered: Vec<RenderedPage> = if self.options.parallel && pages.len() > 1 {
            pages
                .par_iter()
                .map(|page| self.render_page(page, &header))
                .collect()
        } else {
            pages
                .iter()
                .map(|page| self.render_page(page, &header))
                .collect()
        };

        log::debug!(
            "rendered {} pages, {} draw commands",
            rendered.len(),
            rendered.iter().map(|p| p.body.len() + p.header.len()).sum::<usize>()
        );
        rendered
    }

    /// Smallest header band that keeps `line_count` header lines apart.
    pub fn min_header_height(&self, line_count: usize) -> f32 {
        line_count as f32 * self.options.header_font_size
    }

    /// Header commands stacked evenly inside the reserved header band.
    ///
    /// A band shorter than [`min_header_height`](Self::min_header_height)
    /// still fits every line inside it, but the lines overlap.
    pub fn header_commands(&self, metadata: &ReportMetadata) -> Vec<DrawCommand> {
        let lines = metadata.header_lines();
        let spacing = self.geometry.header_height / lines.len().max(1) as f32;

        let min = self.min_header_height(lines.len());
        if self.geometry.header_height < min {
            log::warn!(
                "header band of {} pt is too small for {} lines at {} pt (need {} pt), header text will overlap",
                self.geometry.header_height,
                lines.len(),
                self.options.header_font_size,
                min
            );
        }

        lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| DrawCommand {
                x: self.geometry.margin_left,
                y: self.geometry.margin_top + i as f32 * spacing,
                text,
                bold: true,
                font_size: self.options.header_font_size,
            })
            .collect()
    }

    fn render_page(&self, page: &Page, header: &[DrawCommand]) -> RenderedPage {
        RenderedPage {
            index: page.index,
            header: header.to_vec(),
            body: page
                .lines
                .iter()
                .flat_map(|line| self.render_line(line))
                .collect(),
        }
    }

    /// Commands for one line; zero-length runs emit nothing.
    pub fn render_line(&self, line: &PositionedLine) -> Vec<DrawCommand> {
        let size = self.options.font_size;
        let mut x = self.geometry.margin_left;
        let mut commands = Vec::with_capacity(line.line.runs.len());

        for run in &line.line.runs {
            if run.is_empty() {
                continue;
            }
            commands.push(DrawCommand {
                x,
                y: line.y,
                text: run.text.clone(),
                bold: run.bold,
                font_size: size,
            });
            x += text_width(&run.text, run.bold, size);
        }

        if x > self.geometry.page_width {
            log::warn!(
                "line at y={} on page {} overflows the page width ({:.1} > {})",
                line.y,
                line.page_index + 1,
                x,
                self.geometry.page_width
            );
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate;
    use crate::model::{Line, ParsedDocument, ReportType, Run};

    fn positioned(runs: Vec<Run>) -> PositionedLine {
        PositionedLine {
            line: Line::from_runs(runs),
            y: 144.0,
            page_index: 0,
        }
    }

    #[test]
    fn test_runs_advance_by_measured_width() {
        let renderer = PdfRenderer::new(PageGeometry::letter(), RenderOptions::default());
        let cmds = renderer.render_line(&positioned(vec![
            Run::bold("Net"),
            Run::plain(" income"),
        ]));

        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].x, 72.0);
        assert!(cmds[0].bold);
        let expected = 72.0 + text_width("Net", true, 11.0);
        assert!((cmds[1].x - expected).abs() < 1e-4);
        assert!(cmds.iter().all(|c| c.y == 144.0));
    }

    #[test]
    fn test_bold_metric_used_for_bold_runs() {
        let renderer = PdfRenderer::new(PageGeometry::letter(), RenderOptions::default());
        let bold = renderer.render_line(&positioned(vec![Run::bold("ab"), Run::plain("x")]));
        let plain = renderer.render_line(&positioned(vec![Run::plain("ab"), Run::plain("x")]));
        assert!(bold[1].x > plain[1].x);
    }

    #[test]
    fn test_zero_length_runs_are_skipped() {
        let renderer = PdfRenderer::new(PageGeometry::letter(), RenderOptions::default());
        let cmds = renderer.render_line(&positioned(vec![
            Run::bold(""),
            Run::plain("text"),
            Run::bold(""),
        ]));
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].x, 72.0);
    }

    #[test]
    fn test_header_on_every_page() {
        let geometry = PageGeometry::letter()
            .with_page_height(300.0)
            .with_vertical_margins(20.0, 20.0)
            .with_header_height(80.0)
            .with_line_height(20.0);
        let doc = ParsedDocument::new(
            (0..25)
                .map(|i| Line::from_runs(vec![Run::plain(format!("row {}", i))]))
                .collect(),
        );
        let pages = paginate(&doc, &geometry).unwrap();
        assert!(pages.len() > 1);

        let meta = ReportMetadata::new("Acme", ReportType::Quarterly);
        let rendered = PdfRenderer::new(geometry, RenderOptions::default()).render(&pages, &meta);

        assert_eq!(rendered.len(), pages.len());
        for page in &rendered {
            assert_eq!(page.header, rendered[0].header);
            assert_eq!(page.header_lines(), meta.header_lines());
            assert!(page.header.iter().all(|c| c.y >= 20.0 && c.y < 100.0));
        }
    }

    #[test]
    fn test_header_stays_inside_band() {
        let meta = ReportMetadata::new("Acme", ReportType::Annual);
        for header_height in [20.0, 48.0, 72.0, 120.0] {
            let geometry = PageGeometry::letter().with_header_height(header_height);
            let renderer = PdfRenderer::new(geometry, RenderOptions::default());
            let header = renderer.header_commands(&meta);

            assert_eq!(header.len(), 4);
            assert_eq!(header[0].y, geometry.margin_top);
            for pair in header.windows(2) {
                assert!(pair[0].y < pair[1].y);
            }
            // the last header line starts before the first content line
            assert!(header[3].y < geometry.content_top());
        }
    }

    #[test]
    fn test_min_header_height() {
        let renderer = PdfRenderer::new(PageGeometry::letter(), RenderOptions::default());
        assert_eq!(renderer.min_header_height(4), 48.0);
        assert!(PageGeometry::letter().header_height >= renderer.min_header_height(4));

        let large = PdfRenderer::new(
            PageGeometry::letter(),
            RenderOptions::new().with_header_font_size(20.0),
        );
        assert_eq!(large.min_header_height(4), 80.0);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let geometry = PageGeometry::letter();
        let doc = ParsedDocument::new(
            (0..200)
                .map(|i| Line::from_runs(vec![Run::new(format!("row {}", i), i % 3 == 0)]))
                .collect(),
        );
        let pages = paginate(&doc, &geometry).unwrap();
        let meta = ReportMetadata::default();

        let par = PdfRenderer::new(geometry, RenderOptions::default()).render(&pages, &meta);
        let seq = PdfRenderer::new(geometry, RenderOptions::new().sequential()).render(&pages, &meta);
        assert_eq!(par, seq);
    }
}
