//! Document generation options.

use serde::{Deserialize, Serialize};

/// Options controlling page layout and PDF metadata.
///
/// All fields have defaults matching the reference output; unknown fields in
/// deserialized input are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Body font size in points
    pub font_size_pt: f32,

    /// Line height as a multiple of the font size
    pub line_height: f32,

    /// Page margin in points (applied on all four sides)
    pub margin_pt: f32,

    /// Document title (also rendered as the page-1 header)
    pub title: String,

    /// Author metadata field
    pub author: String,

    /// Subject metadata field
    pub subject: String,

    /// Keywords metadata field
    pub keywords: String,
}

impl DocumentOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body font size in points.
    pub fn with_font_size(mut self, size_pt: f32) -> Self {
        self.font_size_pt = size_pt;
        self
    }

    /// Set the line height multiplier.
    pub fn with_line_height(mut self, multiplier: f32) -> Self {
        self.line_height = multiplier;
        self
    }

    /// Set the page margin in points.
    pub fn with_margin(mut self, margin_pt: f32) -> Self {
        self.margin_pt = margin_pt;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the author metadata field.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the subject metadata field.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the keywords metadata field.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Validate that the layout numbers describe a usable page.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.font_size_pt <= 0.0 {
            return Err(crate::error::Error::InvalidOptions(format!(
                "font size must be positive, got {}",
                self.font_size_pt
            )));
        }
        if self.line_height <= 0.0 {
            return Err(crate::error::Error::InvalidOptions(format!(
                "line height must be positive, got {}",
                self.line_height
            )));
        }
        if self.margin_pt < 0.0 {
            return Err(crate::error::Error::InvalidOptions(format!(
                "margin must not be negative, got {}",
                self.margin_pt
            )));
        }
        Ok(())
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            font_size_pt: 12.0,
            line_height: 1.4,
            margin_pt: 20.0,
            title: "OCR Document".to_string(),
            author: "OCR System".to_string(),
            subject: "OCR Generated Document".to_string(),
            keywords: "OCR, Text Recognition, Document".to_string(),
        }
    }
}
