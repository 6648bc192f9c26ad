//! End-to-end document production.
//!
//! Wires the segment detector, math renderer, and assembler together, with
//! an optional remote compilation path tried first for documents that look
//! like full LaTeX sources.

use crate::assemble;
use crate::error::Result;
use crate::options::DocumentOptions;
use crate::remote::{looks_like_latex_document, RemoteClient};
use crate::segment::{Segment, SegmentDetector};
use crate::typeset::MathRenderer;

/// Produces PDF documents from raw text.
pub struct Pipeline {
    detector: SegmentDetector,
    renderer: Box<dyn MathRenderer>,
    remote: Option<RemoteClient>,
    options: DocumentOptions,
}

impl Pipeline {
    /// Create a pipeline with default options and no remote compiler.
    pub fn new(renderer: Box<dyn MathRenderer>) -> Self {
        Self {
            detector: SegmentDetector::new(),
            renderer,
            remote: None,
            options: DocumentOptions::default(),
        }
    }

    /// Attach a remote compilation service, tried before local assembly for
    /// inputs that look like whole LaTeX documents.
    pub fn with_remote(mut self, client: RemoteClient) -> Self {
        self.remote = Some(client);
        self
    }

    /// Replace the layout and metadata options.
    pub fn with_options(mut self, options: DocumentOptions) -> Self {
        self.options = options;
        self
    }

    /// The active options.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Segment a document without producing a PDF.
    pub fn segment(&self, document: &str) -> Vec<Segment> {
        self.detector.segment(document)
    }

    /// Produce the final PDF bytes for a document.
    ///
    /// When a remote compiler is attached and the input carries LaTeX
    /// document or math markers, remote compilation is attempted first; its
    /// failure is not fatal and the local pipeline takes over.
    pub fn produce(&self, document: &str) -> Result<Vec<u8>> {
        if let Some(remote) = &self.remote {
            if looks_like_latex_document(document) {
                log::info!("input has LaTeX markers, trying remote compilation");
                if let Some(bytes) = remote.try_compile_latex(document) {
                    return Ok(bytes);
                }
            }
        }

        let segments = self.detector.segment(document);
        log::debug!("segmented input into {} parts", segments.len());
        assemble::assemble(&segments, self.renderer.as_ref(), &self.options)
    }
}
