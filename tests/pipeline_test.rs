//! Integration tests for the full text-to-PDF pipeline.

use mathpress::{
    looks_like_latex_document, DocumentOptions, Error, MathMode, MathRenderer, Pipeline,
    RenderedMath, Result, SegmentKind,
};

/// Renderer producing a fixed-size black rectangle, standing in for the
/// typesetting engine so tests run without it.
struct BlockRenderer {
    width_px: u32,
    height_px: u32,
}

impl BlockRenderer {
    fn new() -> Self {
        Self {
            width_px: 240,
            height_px: 64,
        }
    }
}

impl MathRenderer for BlockRenderer {
    fn render(&self, source: &str, _mode: MathMode) -> Result<RenderedMath> {
        let img = image::RgbaImage::from_pixel(
            self.width_px,
            self.height_px,
            image::Rgba([0, 0, 0, 255]),
        );
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| Error::Render(e.to_string()))?;
        Ok(RenderedMath {
            source: source.to_string(),
            width_px: self.width_px,
            height_px: self.height_px,
            png: buf.into_inner(),
        })
    }
}

/// Renderer that always fails, exercising the textual fallback.
struct BrokenRenderer;

impl MathRenderer for BrokenRenderer {
    fn render(&self, _source: &str, _mode: MathMode) -> Result<RenderedMath> {
        Err(Error::Render("engine unavailable".to_string()))
    }
}

/// Inflate every FlateDecode stream in the document and return the combined
/// text, so assertions can look at drawn strings.
fn inflate_streams(pdf: &[u8]) -> String {
    let mut out = String::new();
    let mut pos = 0;
    while let Some(offset) = find(&pdf[pos..], b"stream") {
        let start = pos + offset + b"stream".len();
        // Skip the EOL after the stream keyword.
        let data_start = start + pdf[start..].iter().take_while(|&&b| b == b'\r' || b == b'\n').count();
        if let Some(end_offset) = find(&pdf[data_start..], b"endstream") {
            let data = &pdf[data_start..data_start + end_offset];
            if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(data) {
                out.push_str(&String::from_utf8_lossy(&raw));
            }
            // Skip past the endstream keyword so its "stream" substring is
            // not picked up as the start of the next stream.
            pos = data_start + end_offset + b"endstream".len();
        } else {
            break;
        }
    }
    out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[test]
fn test_plain_text_single_page() {
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()));
    let pdf = pipeline.produce("A single short paragraph.").unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
    let text = inflate_streams(&pdf);
    assert!(text.contains("A single short paragraph."));
    assert!(text.contains("Page 1 of 1"));
}

#[test]
fn test_title_drawn_on_first_page() {
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()))
        .with_options(DocumentOptions::new().with_title("Problem Set 4"));
    let pdf = pipeline.produce("Exercises follow.").unwrap();

    let text = inflate_streams(&pdf);
    assert!(text.contains("Problem Set 4"));
}

#[test]
fn test_long_document_paginates_with_footers() {
    let body = "The proof proceeds by induction on the number of vertices. ".repeat(300);
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()));
    let pdf = pipeline.produce(&body).unwrap();

    let text = inflate_streams(&pdf);
    // More than one page, and every footer carries the same total.
    assert!(text.contains("Page 1 of"));
    assert!(text.contains("Page 2 of"));
    let total_pages = text.matches("Page 1 of ").count();
    assert_eq!(total_pages, 1);
}

#[test]
fn test_mixed_math_document_embeds_images() {
    let doc = r"Euler's identity \[ e^{i\pi} + 1 = 0 \] combines five constants. Also $a^2 + b^2 = c^2$ holds.";
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()));
    let pdf = pipeline.produce(doc).unwrap();

    assert!(pdf.starts_with(b"%PDF-"));
    let text = inflate_streams(&pdf);
    // One XObject per math segment, painted by name.
    assert!(text.contains("/Im1"));
    assert!(text.contains("/Im2"));
}

#[test]
fn test_failed_math_falls_back_to_source_text() {
    let pipeline = Pipeline::new(Box::new(BrokenRenderer));
    let pdf = pipeline
        .produce("Broken: $\\frac{unclosed$ end.")
        .unwrap();

    let text = inflate_streams(&pdf);
    assert!(text.contains("[Math:"));
}

#[test]
fn test_segmentation_through_pipeline() {
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()));
    let segments = pipeline.segment("Solve: $x^2 + 1 = 0$ for real x.");

    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].kind, SegmentKind::Text);
    assert_eq!(segments[1].kind, SegmentKind::InlineMath);
    assert_eq!(segments[1].content, "x^2 + 1 = 0");
    assert_eq!(segments[2].kind, SegmentKind::Text);
}

#[test]
fn test_scaffolded_document_segments_cleanly() {
    let doc = "\\documentclass{article}\n\\usepackage{amsmath}\n\\begin{document}\nLet \\( n \\) be even.\n\\end{document}";
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()));
    let pdf = pipeline.produce(doc).unwrap();

    let text = inflate_streams(&pdf);
    assert!(text.contains("Let"));
    assert!(!text.contains("documentclass"));
}

#[test]
fn test_remote_heuristic() {
    assert!(looks_like_latex_document("\\documentclass{article}"));
    assert!(looks_like_latex_document(r"\begin{align*} x \end{align*}"));
    assert!(looks_like_latex_document(r"$\sum_{i=0}^{n} i$"));
    // Bare dollar math is handled locally.
    assert!(!looks_like_latex_document("$x^2$ is small"));
}

#[test]
fn test_written_file_round_trip() {
    let pipeline = Pipeline::new(Box::new(BlockRenderer::new()));
    let pdf = pipeline.produce("Saved to disk and read back.").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    std::fs::write(&path, &pdf).unwrap();
    let read_back = std::fs::read(&path).unwrap();
    assert_eq!(read_back, pdf);
}

#[test]
fn test_invalid_options_surface_before_rendering() {
    let pipeline = Pipeline::new(Box::new(BrokenRenderer))
        .with_options(DocumentOptions::new().with_line_height(-1.0));
    let result = pipeline.produce("text");
    assert!(matches!(result, Err(Error::InvalidOptions(_))));
}
