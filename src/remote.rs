//! Remote service clients: LaTeX compilation and handwriting OCR.
//!
//! Both services are black-box HTTP contracts. Remote compilation is a
//! complete substitute for the local pipeline when it succeeds; any failure
//! is logged and the caller falls back to local segmentation and assembly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default bound on the remote round-trip so a hung service cannot stall
/// document production indefinitely.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Markers that identify a whole LaTeX document or math-heavy content worth
/// sending to the remote compiler.
const DOCUMENT_MARKERS: &[&str] = &[
    "\\documentclass",
    "\\usepackage",
    "\\begin{document}",
    "\\end{document}",
];
const MATH_COMMAND_MARKERS: &[&str] = &["\\sum", "\\frac", "\\leq", "\\geq"];
const DELIMITER_MARKERS: &[&str] = &["\\(", "\\[", "\\begin{align*}"];

/// Decide whether the input looks like a full typesetting document (or is
/// math-heavy enough) to justify the remote compilation path.
///
/// Bare `$...$` spans do not qualify; those are handled by the local
/// segment-based pipeline.
pub fn looks_like_latex_document(text: &str) -> bool {
    DOCUMENT_MARKERS
        .iter()
        .chain(MATH_COMMAND_MARKERS)
        .chain(DELIMITER_MARKERS)
        .any(|marker| text.contains(marker))
}

/// Request body for the LaTeX compilation service.
#[derive(Debug, Serialize)]
struct CompileRequest<'a> {
    latex_content: &'a str,
}

/// Response body of the OCR service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Raw recognized text
    pub raw_text: String,
    /// Cleaned-up text suitable for the document pipeline
    pub beautified_text: String,
    /// Non-fatal service-side diagnostic (e.g. beautification failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResult {
    /// The text the pipeline should consume: beautified when available,
    /// otherwise the raw recognition.
    pub fn best_text(&self) -> &str {
        if self.beautified_text.trim().is_empty() {
            &self.raw_text
        } else {
            &self.beautified_text
        }
    }
}

/// Blocking HTTP client for the compilation and OCR services.
pub struct RemoteClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    /// Create a client for the given service base URL with the default
    /// request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::RemoteCompile(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The configured service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Compile a full LaTeX document to PDF bytes.
    ///
    /// `POST {base}/compile-latex` with JSON `{ "latex_content": ... }`;
    /// a 200 response body is the finished PDF. Any non-200 status is an
    /// [`Error::RemoteCompile`] carrying the response body as diagnostics.
    pub fn compile_latex(&self, document: &str) -> Result<Vec<u8>> {
        let url = format!("{}/compile-latex", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CompileRequest {
                latex_content: document,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::RemoteCompile(format!(
                "compiler returned {status}: {body}"
            )));
        }

        let bytes = response.bytes()?.to_vec();
        if bytes.is_empty() {
            return Err(Error::RemoteCompile("compiler returned an empty body".into()));
        }
        log::info!("remote compilation produced {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Try remote compilation, degrading to `None` on any failure.
    ///
    /// The failure cause is logged; it is never surfaced as a hard error
    /// because the local pipeline remains available.
    pub fn try_compile_latex(&self, document: &str) -> Option<Vec<u8>> {
        match self.compile_latex(document) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("remote compilation failed, falling back to local pipeline: {e}");
                None
            }
        }
    }

    /// Submit one image to the OCR service.
    ///
    /// `POST {base}/convert-image` as multipart form data with a single
    /// `file` field. A 200 response is JSON
    /// `{ raw_text, beautified_text, error? }`; any other status is an
    /// [`Error::Ocr`] carrying the response body.
    pub fn convert_image(&self, image: Vec<u8>, file_name: &str) -> Result<OcrResult> {
        let mime = guess_image_mime(file_name).ok_or_else(|| {
            Error::Ocr(format!("'{file_name}' does not look like an image file"))
        })?;

        let part = reqwest::blocking::multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| Error::Ocr(format!("invalid MIME type: {e}")))?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);

        let url = format!("{}/convert-image", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| Error::Ocr(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Ocr(format!("OCR service returned {status}: {body}")));
        }

        let result: OcrResult = response
            .json()
            .map_err(|e| Error::Ocr(format!("malformed OCR response: {e}")))?;
        if let Some(ref warning) = result.error {
            log::warn!("OCR service reported: {warning}");
        }
        Ok(result)
    }
}

/// Map an image file extension to its MIME type; `None` for non-images.
fn guess_image_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_scaffolding_triggers_remote() {
        assert!(looks_like_latex_document(
            "\\documentclass{article}\\begin{document}Hi\\end{document}"
        ));
        assert!(looks_like_latex_document("\\usepackage{amsmath} only"));
    }

    #[test]
    fn test_math_commands_trigger_remote() {
        assert!(looks_like_latex_document(r"$\sum_{i=1}^n i$"));
        assert!(looks_like_latex_document(r"a \frac{1}{2} b"));
        assert!(looks_like_latex_document(r"k \geq 1"));
    }

    #[test]
    fn test_backslash_delimiters_trigger_remote() {
        assert!(looks_like_latex_document(r"inline \( x \) math"));
        assert!(looks_like_latex_document(r"display \[ x \] math"));
    }

    #[test]
    fn test_bare_dollar_math_stays_local() {
        assert!(!looks_like_latex_document("$x^2$"));
        assert!(!looks_like_latex_document("plain prose, no math at all"));
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = RemoteClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_guess_image_mime() {
        assert_eq!(guess_image_mime("scan.PNG"), Some("image/png"));
        assert_eq!(guess_image_mime("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(guess_image_mime("notes.pdf"), None);
        assert_eq!(guess_image_mime("noextension"), None);
    }

    #[test]
    fn test_ocr_best_text_prefers_beautified() {
        let result = OcrResult {
            raw_text: "raw".into(),
            beautified_text: "clean".into(),
            error: None,
        };
        assert_eq!(result.best_text(), "clean");

        let result = OcrResult {
            raw_text: "raw".into(),
            beautified_text: "  ".into(),
            error: Some("Beautification failed".into()),
        };
        assert_eq!(result.best_text(), "raw");
    }
}
