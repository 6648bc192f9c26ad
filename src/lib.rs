//! # mathpress
//!
//! Math-aware PDF generation library for Rust.
//!
//! This library turns raw text containing LaTeX math into paginated PDF
//! documents: math spans are detected, typeset to rasters, and flowed onto
//! A4 pages together with the surrounding prose.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mathpress::{generate_pdf, DocumentOptions};
//!
//! fn main() -> mathpress::Result<()> {
//!     let options = DocumentOptions::new().with_title("Homework 3");
//!     let pdf = generate_pdf("Solve: $x^2 + 1 = 0$ for real x.", &options)?;
//!     std::fs::write("homework.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Four math conventions**: `$...$`, `\(...\)`, `\[...\]`, `align*`
//! - **Raster typesetting**: MicroTeX layout rendered through resvg
//! - **Automatic pagination**: word wrap, page breaks, `Page X of N` footers
//! - **Graceful degradation**: failed math renders fall back to source text
//! - **Remote compilation**: optional LaTeX service path for full documents
//! - **Handwriting OCR**: optional image-to-text service client

pub mod assemble;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod remote;
pub mod segment;
pub mod typeset;

// Re-export commonly used types
pub use assemble::PageGeometry;
pub use error::{Error, Result};
pub use options::DocumentOptions;
pub use pipeline::Pipeline;
pub use remote::{looks_like_latex_document, OcrResult, RemoteClient};
pub use segment::{Segment, SegmentDetector, SegmentKind};
pub use typeset::{MathMode, MathRenderer, RenderedMath};

#[cfg(feature = "typeset")]
pub use typeset::TypesetRenderer;

/// Segment a document into prose and math parts.
///
/// # Example
///
/// ```
/// use mathpress::{segment_text, SegmentKind};
///
/// let segments = segment_text("Let $x$ be a root.");
/// assert_eq!(segments[1].kind, SegmentKind::InlineMath);
/// ```
pub fn segment_text(document: &str) -> Vec<Segment> {
    SegmentDetector::new().segment(document)
}

/// Generate a PDF from raw text using the built-in typesetting engine.
///
/// # Arguments
///
/// * `document` - Raw text, possibly containing LaTeX math spans
/// * `options` - Layout and metadata options
///
/// # Example
///
/// ```no_run
/// use mathpress::{generate_pdf, DocumentOptions};
///
/// let pdf = generate_pdf("Euler: \\[ e^{i\\pi} + 1 = 0 \\]", &DocumentOptions::default()).unwrap();
/// std::fs::write("euler.pdf", pdf).unwrap();
/// ```
#[cfg(feature = "typeset")]
pub fn generate_pdf(document: &str, options: &DocumentOptions) -> Result<Vec<u8>> {
    Pipeline::new(Box::new(TypesetRenderer::new()))
        .with_options(options.clone())
        .produce(document)
}

/// Generate a PDF, preferring a remote LaTeX compilation service for inputs
/// that look like full LaTeX documents.
///
/// The remote path is best-effort: any service failure falls back to the
/// local pipeline.
///
/// # Example
///
/// ```no_run
/// use mathpress::{generate_pdf_with_remote, DocumentOptions};
///
/// let pdf = generate_pdf_with_remote(
///     "\\documentclass{article}\\begin{document}Hi\\end{document}",
///     &DocumentOptions::default(),
///     "http://localhost:8000",
/// ).unwrap();
/// ```
#[cfg(feature = "typeset")]
pub fn generate_pdf_with_remote(
    document: &str,
    options: &DocumentOptions,
    service_url: &str,
) -> Result<Vec<u8>> {
    let client = RemoteClient::new(service_url)?;
    Pipeline::new(Box::new(TypesetRenderer::new()))
        .with_options(options.clone())
        .with_remote(client)
        .produce(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_text_plain() {
        let segments = segment_text("no math here");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Text);
    }

    #[test]
    fn test_segment_text_mixed() {
        let segments = segment_text("Let $x$ be a root.");
        assert_eq!(segments.len(), 3);
        assert!(segments[1].kind.is_math());
    }
}
