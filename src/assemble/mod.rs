//! Document assembly: flows segments onto pages and emits the PDF.
//!
//! Layout works in a top-down coordinate system (y grows downward from the
//! page top, like the cursor of a typewriter) and converts to PDF's
//! bottom-up coordinates only when emitting operators. Pages are built
//! greedily; footers are stamped in a second pass once the total page count
//! is known.

pub mod fonts;
pub mod layout;
mod writer;

use pdf_writer::{Content, Name, Str};

use crate::error::Result;
use crate::options::DocumentOptions;
use crate::segment::{Segment, SegmentKind};
use crate::typeset::{MathMode, MathRenderer, SUPERSAMPLE};
use fonts::Face;
use writer::PendingImage;

/// Title heading size in points.
const TITLE_SIZE: f32 = 16.0;
/// Footer size in points.
const FOOTER_SIZE: f32 = 10.0;
/// Vertical gap inserted above a display math block.
const GAP_BEFORE_DISPLAY: f32 = 10.0;
/// Vertical gap left below a display math block.
const GAP_AFTER_DISPLAY: f32 = 15.0;
/// Vertical gap left below an inline math raster.
const GAP_AFTER_INLINE: f32 = 5.0;

/// Physical page dimensions and margins, in points.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with the given margin.
    pub fn a4(margin: f32) -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin,
        }
    }

    /// Horizontal space available to content.
    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest top-down y a content element may reach before a page break.
    /// Reserves footer clearance below the bottom margin.
    pub fn content_limit(&self) -> f32 {
        self.page_height - 2.0 * self.margin - 20.0
    }
}

/// Flow segments onto A4 pages and serialize the finished PDF.
///
/// Math segments are rendered through `renderer`; a segment whose render
/// fails is substituted with its source wrapped as `[Math: ...]` text so the
/// document always completes.
pub fn assemble(
    segments: &[Segment],
    renderer: &dyn MathRenderer,
    options: &DocumentOptions,
) -> Result<Vec<u8>> {
    options.validate()?;
    let geometry = PageGeometry::a4(options.margin_pt);
    let mut doc = Assembler::new(geometry, options);

    doc.title_block(&options.title);

    for segment in segments {
        match segment.kind {
            SegmentKind::Text => doc.flow_text(&segment.content),
            SegmentKind::InlineMath => doc.place_math(renderer, &segment.content, MathMode::Inline),
            SegmentKind::DisplayMath => {
                doc.place_math(renderer, &segment.content, MathMode::Display)
            }
        }
    }

    doc.stamp_footers();
    let Assembler {
        pages, images, ..
    } = doc;
    writer::serialize(pages, images, &geometry, options)
}

/// Page-building state: open content streams, pending images, and the
/// top-down layout cursor on the current page.
struct Assembler<'a> {
    geometry: PageGeometry,
    options: &'a DocumentOptions,
    pages: Vec<Content>,
    images: Vec<PendingImage>,
    /// Top-down cursor on the current page
    y: f32,
}

impl<'a> Assembler<'a> {
    fn new(geometry: PageGeometry, options: &'a DocumentOptions) -> Self {
        Self {
            geometry,
            options,
            pages: vec![Content::new()],
            images: Vec::new(),
            y: geometry.margin,
        }
    }

    fn line_height(&self) -> f32 {
        self.options.font_size_pt * self.options.line_height
    }

    /// Convert a top-down y to the PDF coordinate space.
    fn pdf_y(&self, y: f32) -> f32 {
        self.geometry.page_height - y
    }

    fn current(&mut self) -> &mut Content {
        // pages is never empty; new() seeds the first page
        self.pages.last_mut().unwrap_or_else(|| unreachable!())
    }

    fn new_page(&mut self) {
        self.pages.push(Content::new());
        self.y = self.geometry.margin;
        log::debug!("page break, now on page {}", self.pages.len());
    }

    /// Draw one line of text with its baseline at top-down `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, face: Face) {
        let bytes = fonts::to_winansi_bytes(text);
        let baseline = self.pdf_y(y);
        let content = self.current();
        content.begin_text();
        content.set_font(Name(face.resource_name()), size);
        content.next_line(x, baseline);
        content.show(Str(&bytes));
        content.end_text();
    }

    /// Title heading, separator rule, and initial cursor position.
    fn title_block(&mut self, title: &str) {
        let margin = self.geometry.margin;
        self.draw_text(title, margin, margin + 10.0, TITLE_SIZE, Face::Bold);

        let rule_y = self.pdf_y(margin + 15.0);
        let right = self.geometry.page_width - margin;
        let content = self.current();
        content.set_line_width(0.5);
        content.move_to(margin, rule_y);
        content.line_to(right, rule_y);
        content.stroke();

        self.y = margin + 25.0;
    }

    /// Word-wrap prose and flow it line by line, breaking pages as needed.
    fn flow_text(&mut self, text: &str) {
        let size = self.options.font_size_pt;
        let lines = layout::wrap_words(text, self.geometry.usable_width(), size, Face::Regular);
        let line_height = self.line_height();
        let margin = self.geometry.margin;

        for line in lines {
            if self.y > self.geometry.content_limit() {
                self.new_page();
            }
            self.draw_text(&line, margin, self.y, size, Face::Regular);
            self.y += line_height;
        }
    }

    /// Render one math segment and place its raster, or fall back to text.
    fn place_math(&mut self, renderer: &dyn MathRenderer, source: &str, mode: MathMode) {
        let rendered = match renderer.render(source, mode) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::warn!("math render failed, substituting source text: {e}");
                self.flow_text(&format!("[Math: {source}]"));
                return;
            }
        };

        if mode == MathMode::Display {
            self.y += GAP_BEFORE_DISPLAY;
        }

        // Natural size in points, undoing the rasterization supersampling,
        // shrunk to the text column if the expression is wider.
        let natural_width = rendered.width_px as f32 / SUPERSAMPLE;
        let natural_height = rendered.height_px as f32 / SUPERSAMPLE;
        let width = natural_width.min(self.geometry.usable_width());
        let height = natural_height * (width / natural_width);

        if self.y + height > self.geometry.content_limit() {
            self.new_page();
        }

        let name = format!("Im{}", self.images.len() + 1);
        let x = self.geometry.margin;
        let bottom = self.pdf_y(self.y + height);
        let content = self.current();
        content.save_state();
        content.transform([width, 0.0, 0.0, height, x, bottom]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();

        self.images.push(PendingImage {
            name,
            png: rendered.png,
        });

        self.y += height
            + match mode {
                MathMode::Display => GAP_AFTER_DISPLAY,
                MathMode::Inline => GAP_AFTER_INLINE,
            };
    }

    /// Second pass: stamp `Page X of N` on every page now that N is known.
    fn stamp_footers(&mut self) {
        let total = self.pages.len();
        let x = self.geometry.page_width - self.geometry.margin - 30.0;
        let baseline = 10.0;

        for (i, content) in self.pages.iter_mut().enumerate() {
            let label = fonts::to_winansi_bytes(&format!("Page {} of {}", i + 1, total));
            content.begin_text();
            content.set_font(Name(Face::Regular.resource_name()), FOOTER_SIZE);
            content.next_line(x, baseline);
            content.show(Str(&label));
            content.end_text();
        }
    }
}
